// src/sitemap/render.rs
// =============================================================================
// This module writes the sitemap XML.
//
// We use quick-xml's Writer, which:
// - Streams events (start tag, text, end tag) into any io::Write
// - Escapes text for us (a '&' in a query string becomes "&amp;")
// - Can pretty-print with a fixed indent
//
// URLs are written exactly as the crawler stored them. Set iteration order
// is random, so we sort first to make the output reproducible.
// =============================================================================

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

// Where the finished sitemap goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl From<Option<PathBuf>> for Destination {
    fn from(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Destination::File(path),
            None => Destination::Stdout,
        }
    }
}

// Renders the sitemap document as a string
//
// Parameters:
//   urls: the visited URLs, one <url><loc> entry each
//   with_declaration: prepend <?xml version="1.0" encoding="UTF-8"?>
pub fn render(urls: &HashSet<String>, with_declaration: bool) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if with_declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    let urlset = BytesStart::new("urlset")
        .with_attributes([("xmlns", SITEMAP_NS), ("xmlns:xsi", XSI_NS)]);
    writer.write_event(Event::Start(urlset))?;

    let mut sorted: Vec<&String> = urls.iter().collect();
    sorted.sort();

    for url in sorted {
        writer.write_event(Event::Start(BytesStart::new("url")))?;
        writer.write_event(Event::Start(BytesStart::new("loc")))?;
        writer.write_event(Event::Text(BytesText::new(url)))?;
        writer.write_event(Event::End(BytesEnd::new("loc")))?;
        writer.write_event(Event::End(BytesEnd::new("url")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner()).context("sitemap is not valid UTF-8")?;
    xml.push('\n');
    Ok(xml)
}

// Renders the sitemap and sends it to `destination`
//
// Files get the XML declaration; stdout gets just the document.
pub fn write_sitemap(urls: &HashSet<String>, destination: &Destination) -> Result<()> {
    match destination {
        Destination::File(path) => {
            let xml = render(urls, true)?;
            std::fs::write(path, xml)
                .with_context(|| format!("failed to write sitemap to {}", path.display()))?;
        }
        Destination::Stdout => {
            let xml = render(urls, false)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write sitemap to stdout")?;
        }
    }
    Ok(())
}
