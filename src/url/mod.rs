//! URL handling module
//!
//! This module provides href sanitization, canonical dedup keys, and crawl
//! scope checks. The same normalization backs both the visited-set keys and
//! the printed output, so a link can never be printed in one form and
//! deduplicated in another.

mod normalize;
mod scope;

pub use normalize::{canonical_key, sanitize};
pub use scope::{host_of, in_scope};
