//! The script payload the citation widget loads: `CALLBACK(<record>, '<template>', '<kind>')`.

use crate::{record::CitationRecord, resolver::IdentifierKind};

pub fn render(
    callback: &str,
    record: &CitationRecord,
    template: &str,
    kind: IdentifierKind,
) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(record)?;
    Ok(format!(
        "{callback}({json}, '{}', '{kind}')",
        quote_js(template)
    ))
}

/// Escape text for a single-quoted JavaScript string literal.
fn quote_js(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\x3C"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}
