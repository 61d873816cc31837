use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::{
    date::compose_date,
    error::LookupError,
    name::{self, NameStyle},
    record::{Author, CitationRecord, Field},
    source::{Request, Source, parse_url},
};

const XISBN_URL: &str = "http://xisbn.worldcat.org/webservices/xid/isbn/";

/// The legacy xISBN-style library metadata service.
///
/// Responses look like `{"stat": "ok", "list": [{"title": ..., "author": ..., "year": ...}]}`.
#[derive(Default)]
pub struct LegacyIsbn;

const FIELDS: &[(&str, Field)] = &[
    ("title", Field::Title),
    ("publisher", Field::Publisher),
    ("city", Field::Location),
    ("ed", Field::Edition),
];

/// Split a free-text author line such as "by Jane Doe, John Roe and Max Poe." into names.
fn split_authors(line: &str) -> Vec<&str> {
    let line = line.strip_prefix("by ").unwrap_or(line);
    let line = line.trim_end_matches('.');

    let segments: Vec<&str> = line.split(" and ").collect();
    if let [head, last] = segments.as_slice()
        && head.contains(", ")
    {
        return head.split(", ").chain([*last]).collect();
    }
    segments
}

impl Source for LegacyIsbn {
    fn name(&self) -> &'static str {
        "legacy-isbn"
    }

    fn request(&self, identifier: &str) -> Result<Request, LookupError> {
        let id = utf8_percent_encode(identifier, NON_ALPHANUMERIC);
        let mut url = parse_url(&format!("{XISBN_URL}{id}"))?;
        url.query_pairs_mut()
            .append_pair("method", "getMetadata")
            .append_pair("format", "json")
            .append_pair("fl", "*");
        Ok(Request {
            url,
            follow_redirects: false,
        })
    }

    fn normalize(&self, body: &str, _template: &str) -> Result<CitationRecord, LookupError> {
        let data: Value = serde_json::from_str(body)?;
        let stat = data.get("stat").and_then(Value::as_str).unwrap_or_default();
        if stat != "ok" {
            return Err(LookupError::malformed(format!("lookup status {stat:?}")));
        }
        let item = data
            .get("list")
            .and_then(|l| l.get(0))
            .and_then(Value::as_object)
            .ok_or_else(|| LookupError::malformed("lookup returned an empty list"))?;

        let text = |key: &str| {
            item.get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
        };

        let mut record = CitationRecord::default();
        for (key, field) in FIELDS {
            if let Some(v) = text(*key) {
                record.set(*field, v);
            }
        }
        if let Some(year) = text("year") {
            record.set_date(compose_date(year, None, None));
        }
        if let Some(line) = text("author") {
            record.touch_authors();
            for raw in split_authors(line) {
                let author = match name::parse(raw, NameStyle::Simple) {
                    Some(n) if n.is_split() => Author::new(n.family, n.given),
                    _ => Author::new(raw, ""),
                };
                record.push_author(author);
            }
        }
        Ok(record)
    }
}
