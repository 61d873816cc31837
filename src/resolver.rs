use std::{fmt, str::FromStr};

use anyhow::bail;
use tracing::{info, warn};

use crate::{
    config::{Config, DoiSource, IsbnSource},
    error::LookupError,
    fetch::Fetch,
    record::CitationRecord,
    source::{
        Source, citation::Citation, crossref::CrossRef, legacy_isbn::LegacyIsbn, pubmed::PubMed,
    },
};

/// The kinds of identifier the widget can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentifierKind {
    Pmid,
    Isbn,
    Doi,
    Url,
}

impl IdentifierKind {
    pub fn as_str(self) -> &'static str {
        match self {
            IdentifierKind::Pmid => "pmid",
            IdentifierKind::Isbn => "isbn",
            IdentifierKind::Doi => "doi",
            IdentifierKind::Url => "url",
        }
    }
}

impl FromStr for IdentifierKind {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pmid" => Ok(IdentifierKind::Pmid),
            "isbn" => Ok(IdentifierKind::Isbn),
            "doi" => Ok(IdentifierKind::Doi),
            "url" => Ok(IdentifierKind::Url),
            other => Err(LookupError::UnrecognizedIdentifierKind(other.to_string())),
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated lookup request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: IdentifierKind,
    pub id: String,
    pub template: String,
}

impl Query {
    pub fn new(kind: &str, id: &str, template: &str) -> Result<Self, LookupError> {
        Ok(Query {
            kind: kind.parse()?,
            id: id.trim().to_string(),
            template: template.to_string(),
        })
    }

    /// Parse a gateway query string such as `isbn=9781848449510&template=book`.
    ///
    /// The first parameter names the identifier kind, whatever it is.
    pub fn from_query_string(qs: &str) -> Result<Self, LookupError> {
        let qs = qs.strip_prefix('?').unwrap_or(qs);
        let mut pairs = url::form_urlencoded::parse(qs.as_bytes());
        let (kind, id) = pairs
            .next()
            .ok_or_else(|| LookupError::UnrecognizedIdentifierKind(String::new()))?;
        let template = pairs
            .find(|(k, _)| k == "template")
            .map(|(_, v)| v.into_owned())
            .unwrap_or_default();
        Query::new(&kind, &id, &template)
    }
}

/// Outcome of one lookup, ready for the output boundary.
#[derive(Debug, Clone)]
pub struct Lookup {
    pub query: Query,
    pub record: CitationRecord,
    /// The upstream answered with a usable document, even if it held few fields.
    pub succeeded: bool,
}

/// Routes each identifier kind to its source and runs the lookup.
pub struct Resolver<F> {
    pubmed: PubMed,
    citation: Citation,
    isbn: Box<dyn Source>,
    doi: Box<dyn Source>,
    fetcher: F,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(config: &Config, fetcher: F) -> anyhow::Result<Self> {
        let caps = config.capabilities();
        let citation = || Citation::new(caps.encode_citation_ids, caps.name_policy());

        let isbn: Box<dyn Source> = match config.isbn_source {
            IsbnSource::Citation => Box::new(citation()),
            IsbnSource::Legacy => Box::new(LegacyIsbn),
        };
        let doi: Box<dyn Source> = match config.doi_source {
            DoiSource::Citation => Box::new(citation()),
            DoiSource::Crossref => {
                if config.crossref_pid.is_none() {
                    bail!("--doi-source crossref requires --crossref-pid");
                }
                Box::new(CrossRef::new(config.crossref_pid.clone()))
            }
        };

        Ok(Resolver {
            pubmed: PubMed::new(
                config.pubmed_tool.clone(),
                config.pubmed_email.clone(),
                caps.pubmed_doi,
            ),
            citation: citation(),
            isbn,
            doi,
            fetcher,
        })
    }

    pub fn source_for(&self, kind: IdentifierKind) -> &dyn Source {
        match kind {
            IdentifierKind::Pmid => &self.pubmed,
            IdentifierKind::Isbn => self.isbn.as_ref(),
            IdentifierKind::Doi => self.doi.as_ref(),
            IdentifierKind::Url => &self.citation,
        }
    }

    /// Fetch and normalise, keeping the failure reason.
    pub fn resolve(&self, query: &Query) -> Result<CitationRecord, LookupError> {
        let source = self.source_for(query.kind);
        let request = source.request(&query.id)?;
        let body = self.fetcher.get(&request)?;
        let record = source.normalize(&body, &query.template)?;
        Ok(record.finalize())
    }

    /// Resolve a query, degrading every upstream failure to an empty record.
    pub fn lookup(&self, query: Query) -> Lookup {
        let source = self.source_for(query.kind).name();
        match self.resolve(&query) {
            Ok(record) => {
                info!(kind = %query.kind, id = %query.id, source, "lookup succeeded");
                Lookup {
                    query,
                    record,
                    succeeded: true,
                }
            }
            Err(e) => {
                warn!(kind = %query.kind, id = %query.id, source, error = %e, "lookup failed");
                Lookup {
                    query,
                    record: CitationRecord::default(),
                    succeeded: false,
                }
            }
        }
    }
}
