use std::io::{self, Write};

use serde::Serialize;

/// One page in record mode.
///
/// `links` is always present, an empty list rather than null; `error` only
/// appears on failed pages.
#[derive(Debug, Serialize)]
pub struct PageRecord<'a> {
    pub url: &'a str,
    pub links: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Writes one page in text mode.
///
/// Failed pages are written the same way with an empty link list, so every
/// visited URL appears in the output exactly once regardless of outcome.
pub fn write_text<W: Write>(writer: &mut W, page_url: &str, links: &[String]) -> io::Result<()> {
    writeln!(writer, "Visited: {}", page_url)?;
    writeln!(writer, "Links found:")?;
    for link in links {
        writeln!(writer, "{}", link)?;
    }
    Ok(())
}

/// Writes one page as a newline-delimited JSON record.
pub fn write_record<W: Write>(
    writer: &mut W,
    page_url: &str,
    links: &[String],
    error: Option<String>,
) -> io::Result<()> {
    let record = PageRecord {
        url: page_url,
        links,
        error,
    };
    serde_json::to_writer(&mut *writer, &record).map_err(io::Error::from)?;
    writeln!(writer)
}
