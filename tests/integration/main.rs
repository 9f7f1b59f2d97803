//! Integration tests for the crawler
//!
//! These tests run the full crawl cycle against wiremock servers: real HTTP,
//! real redirects, real content-type headers.

mod common;
mod fetch_tests;
