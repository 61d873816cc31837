use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::LookupError,
    name::{self, NamePolicy, NameStyle},
    record::{Author, CitationRecord, Field},
    source::{Request, Source, parse_url},
};

const CITATION_URL: &str =
    "https://en.wikipedia.org/api/rest_v1/data/citation/mediawiki-basefields/";

/// Everything except what form encoders leave alone.
const ID_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// The REST citation service, which resolves ISBNs, DOIs and URLs into Zotero-style items.
pub struct Citation {
    encode_ids: bool,
    policy: NamePolicy,
}

/// Where a value goes in the record.
#[derive(Clone, Copy)]
enum Target {
    Field(Field),
    /// A work title whose destination depends on whether a book section is being cited as a book.
    Work { default: Field, in_book: Field },
}

#[derive(Clone, Copy)]
enum Transform {
    Text,
    Edition,
    FirstOf,
}

const FIELDS: &[(&str, Target, Transform)] = &[
    (
        "publicationTitle",
        Target::Work {
            default: Field::Journal,
            in_book: Field::Title,
        },
        Transform::Text,
    ),
    (
        "title",
        Target::Work {
            default: Field::Title,
            in_book: Field::Chapter,
        },
        Transform::Text,
    ),
    // All work titles collapse into `journal`.
    ("websiteTitle", Target::Field(Field::Journal), Transform::Text),
    ("volume", Target::Field(Field::Volume), Transform::Text),
    ("issue", Target::Field(Field::Issue), Transform::Text),
    ("edition", Target::Field(Field::Edition), Transform::Edition),
    ("publisher", Target::Field(Field::Publisher), Transform::Text),
    ("pages", Target::Field(Field::Pages), Transform::Text),
    ("ISBN", Target::Field(Field::Isbn), Transform::FirstOf),
    ("ISSN", Target::Field(Field::Issn), Transform::FirstOf),
    ("date", Target::Field(Field::Date), Transform::Text),
    ("DOI", Target::Field(Field::Doi), Transform::Text),
    ("language", Target::Field(Field::Language), Transform::Text),
    ("place", Target::Field(Field::Location), Transform::Text),
];

impl Transform {
    fn apply(self, value: &Value) -> Option<String> {
        match self {
            Transform::Text => value.as_str().map(str::to_string),
            Transform::Edition => value.as_str().map(|s| strip_edition(s).to_string()),
            Transform::FirstOf => match value {
                Value::Array(items) => items.first()?.as_str().map(str::to_string),
                Value::String(s) => Some(s.clone()),
                _ => None,
            },
        }
    }
}

/// The service reports "2nd edition"; templates want just "2nd".
fn strip_edition(s: &str) -> &str {
    [" edition", " ed.", " ed"]
        .iter()
        .find_map(|suffix| s.strip_suffix(suffix))
        .unwrap_or(s)
}

impl Citation {
    pub fn new(encode_ids: bool, policy: NamePolicy) -> Self {
        Citation { encode_ids, policy }
    }

    fn encode_identifier(&self, identifier: &str) -> String {
        if self.encode_ids && identifier.contains([':', '/']) {
            utf8_percent_encode(identifier, ID_ENCODE_SET).to_string()
        } else {
            identifier.to_string()
        }
    }

    fn authors(&self, item: &Map<String, Value>, authors: &[Value], record: &mut CitationRecord) {
        let from_catalog = item
            .get("source")
            .and_then(|s| s.get(0))
            .and_then(Value::as_str)
            == Some("WorldCat");

        record.touch_authors();
        for entry in authors {
            let part = |i: usize| entry.get(i).and_then(Value::as_str).unwrap_or_default();
            let (mut given, mut family) = (part(0).to_string(), part(1).to_string());

            // Catalog lookups leave the given name blank and put a whole citation-style name
            // in the family slot.
            if given.is_empty() && from_catalog && family.find(',').is_some_and(|i| i > 0) {
                match name::parse(&family, NameStyle::Catalog) {
                    Some(n) => (given, family) = (n.given, n.family),
                    None => (given, family) = (String::new(), String::new()),
                }
            }

            if given.is_empty()
                || family.is_empty()
                || !self.policy.accepts_part(&given)
                || !self.policy.accepts_part(&family)
            {
                debug!(%given, %family, "dropping unusable author");
                continue;
            }
            record.push_author(Author::new(family, given));
        }
    }
}

impl Source for Citation {
    fn name(&self) -> &'static str {
        "citation"
    }

    fn request(&self, identifier: &str) -> Result<Request, LookupError> {
        let url = parse_url(&format!(
            "{CITATION_URL}{}",
            self.encode_identifier(identifier)
        ))?;
        Ok(Request {
            url,
            follow_redirects: true,
        })
    }

    fn normalize(&self, body: &str, template: &str) -> Result<CitationRecord, LookupError> {
        let data: Value = serde_json::from_str(body)?;
        let item = data
            .get(0)
            .and_then(Value::as_object)
            .ok_or_else(|| LookupError::malformed("citation response has no item"))?;

        let as_book = item.get("itemType").and_then(Value::as_str) == Some("bookSection")
            && template == "book";

        let mut record = CitationRecord::default();
        for (key, target, transform) in FIELDS {
            let Some(value) = item.get(*key).and_then(|v| transform.apply(v)) else {
                continue;
            };
            let field = match *target {
                Target::Field(f) => f,
                Target::Work { in_book, .. } if as_book => in_book,
                Target::Work { default, .. } => default,
            };
            record.set(field, value);
        }

        if let Some(authors) = item.get("author").and_then(Value::as_array) {
            self.authors(item, authors, &mut record);
        }
        Ok(record)
    }
}
