use url::Url;

use crate::{error::LookupError, name::NamePolicy, record::CitationRecord};

pub mod citation;
pub mod crossref;
pub mod legacy_isbn;
pub mod pubmed;

/// A single upstream GET, with the redirect policy its service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub follow_redirects: bool,
}

/// An upstream bibliographic service and the parser for its response format.
pub trait Source {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn request(&self, identifier: &str) -> Result<Request, LookupError>;

    /// Convert a raw upstream body into a record. `template` is the citation template the
    /// caller is filling, which some sources use to decide where titles go.
    fn normalize(&self, body: &str, template: &str) -> Result<CitationRecord, LookupError>;
}

/// Behaviours that differ between deployments of the lookup service.
#[derive(Debug, Clone, Copy)]
pub struct Capabilities {
    /// Take the `DOI` item from PubMed summaries.
    pub pubmed_doi: bool,
    /// Percent-encode identifiers containing `:` or `/` before putting them in the REST path.
    pub encode_citation_ids: bool,
    /// Drop author names whose parts still contain a comma.
    pub reject_comma_names: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities {
            pubmed_doi: true,
            encode_citation_ids: true,
            reject_comma_names: false,
        }
    }
}

impl Capabilities {
    pub fn name_policy(&self) -> NamePolicy {
        NamePolicy {
            reject_commas: self.reject_comma_names,
        }
    }
}

fn parse_url(s: &str) -> Result<Url, LookupError> {
    Url::parse(s).map_err(|e| LookupError::InvalidRequest(format!("{s}: {e}")))
}
