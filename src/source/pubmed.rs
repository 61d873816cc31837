use tracing::debug;

use crate::{
    date::compose_date,
    error::LookupError,
    name::{self, NameStyle},
    record::{Author, CitationRecord, Field},
    source::{Request, Source, parse_url},
    xml::Element,
};

const ESUMMARY_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi";

/// NCBI ESummary lookups by PubMed ID.
pub struct PubMed {
    tool: String,
    email: Option<String>,
    with_doi: bool,
}

#[derive(Clone, Copy)]
enum Rule {
    Text(Field),
    PubDate,
    Doi,
    Authors,
}

/// `Item` names in a `DocSum` and what to do with them. Anything else is ignored.
const ITEMS: &[(&str, Rule)] = &[
    ("PubDate", Rule::PubDate),
    ("FullJournalName", Rule::Text(Field::Journal)),
    ("Title", Rule::Text(Field::Title)),
    ("Volume", Rule::Text(Field::Volume)),
    ("Issue", Rule::Text(Field::Issue)),
    ("Pages", Rule::Text(Field::Pages)),
    ("DOI", Rule::Doi),
    ("AuthorList", Rule::Authors),
];

impl PubMed {
    pub fn new(tool: impl Into<String>, email: Option<String>, with_doi: bool) -> Self {
        PubMed {
            tool: tool.into(),
            email,
            with_doi,
        }
    }

    fn apply(&self, rule: Rule, item: &Element, record: &mut CitationRecord) {
        let text = item.text();
        match rule {
            Rule::Text(field) if !text.is_empty() => record.set(field, text),
            Rule::Doi if self.with_doi && !text.is_empty() => record.set(Field::Doi, text),
            Rule::PubDate if !text.is_empty() => {
                let mut parts = text.split(' ');
                let year = parts.next().unwrap_or_default();
                let month = parts.next();
                let day = parts.next();
                record.set_date(compose_date(year, month, day));
            }
            Rule::Authors => {
                record.touch_authors();
                for author in item.children_named("Item") {
                    record.push_author(split_author(author.text()));
                }
            }
            _ => {}
        }
    }
}

/// PubMed already lists authors as "Family Initials"; keep the two halves in that order.
fn split_author(raw: &str) -> Author {
    match name::parse(raw, NameStyle::Simple) {
        Some(n) if n.is_split() => Author::new(n.given, n.family),
        _ => Author::new(raw, ""),
    }
}

impl Source for PubMed {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    fn request(&self, identifier: &str) -> Result<Request, LookupError> {
        let mut url = parse_url(ESUMMARY_URL)?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("db", "pubmed").append_pair("tool", &self.tool);
            if let Some(email) = &self.email {
                q.append_pair("email", email);
            }
            q.append_pair("id", identifier).append_pair("retmode", "xml");
        }
        Ok(Request {
            url,
            follow_redirects: true,
        })
    }

    fn normalize(&self, body: &str, _template: &str) -> Result<CitationRecord, LookupError> {
        let root = Element::parse(body)?;
        let doc = root
            .child("DocSum")
            .ok_or_else(|| LookupError::malformed("ESummary result has no DocSum"))?;
        if doc.child("Item").is_none() {
            return Err(LookupError::malformed("DocSum has no items"));
        }

        let mut record = CitationRecord::default();
        for item in doc.children_named("Item") {
            let Some(item_name) = item.attr("Name") else {
                continue;
            };
            match ITEMS.iter().find(|(n, _)| *n == item_name) {
                Some((_, rule)) => self.apply(*rule, item, &mut record),
                None => debug!(item = item_name, "ignoring ESummary item"),
            }
        }
        Ok(record)
    }
}
