//! Topology document serialization.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::types::EdgeDevices;

/// Default output file name, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "edge_devices.xml";

/// Declaration written ahead of the document
pub const XML_DECLARATION: &str = "<?xml version='1.0' encoding='us-ascii'?>\n";

/// Serialize the document: declaration, then the compact document with no
/// trailing newline. Empty elements are written as `<name />`, and non-ASCII
/// text becomes decimal character references so the output matches its
/// us-ascii declaration.
pub fn to_xml_string(doc: &EdgeDevices) -> Result<String> {
    let body = quick_xml::se::to_string(doc).wrap_err("Failed to serialize edge devices")?;
    let body = spaced_empty_tags(&body);

    let mut xml = String::with_capacity(XML_DECLARATION.len() + body.len());
    xml.push_str(XML_DECLARATION);
    xml.push_str(&ascii_char_refs(&body));
    Ok(xml)
}

/// Write the document to `path`, replacing any existing file
pub fn write_topology(doc: &EdgeDevices, path: &Path) -> Result<()> {
    let xml = to_xml_string(doc)?;
    fs::write(path, xml.as_bytes())
        .wrap_err_with(|| format!("Failed to write topology to '{}'", path.display()))?;
    info!(
        "Wrote {} datacenters ({} bytes) to {:?}",
        doc.datacenters.len(),
        xml.len(),
        path
    );
    Ok(())
}

/// Rewrite `<name/>` as `<name />`, leaving attribute values untouched
fn spaced_empty_tags(xml: &str) -> Cow<'_, str> {
    if !xml.contains("/>") {
        return Cow::Borrowed(xml);
    }
    let mut out = String::with_capacity(xml.len() + 64);
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    let mut chars = xml.chars().peekable();
    while let Some(c) = chars.next() {
        match (in_tag, quote, c) {
            (_, Some(q), _) if c == q => quote = None,
            (_, Some(_), _) => {}
            (false, None, '<') => in_tag = true,
            (true, None, '"') | (true, None, '\'') => quote = Some(c),
            (true, None, '>') => in_tag = false,
            (true, None, '/') if chars.peek() == Some(&'>') && !out.ends_with(' ') => {
                out.push(' ');
            }
            _ => {}
        }
        out.push(c);
    }
    Cow::Owned(out)
}

fn ascii_char_refs(text: &str) -> Cow<'_, str> {
    if text.is_ascii() {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            // Writing to a String cannot fail
            let _ = write!(out, "&#{};", c as u32);
        }
    }
    Cow::Owned(out)
}
