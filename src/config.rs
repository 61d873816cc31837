use std::{path::PathBuf, time::Duration};

use clap::{ArgAction, Args, ValueEnum};

use crate::source::Capabilities;

/// Which service answers ISBN lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IsbnSource {
    /// The REST citation service.
    Citation,
    /// The legacy xISBN-style metadata service.
    Legacy,
}

/// Which service answers DOI lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DoiSource {
    /// The REST citation service.
    Citation,
    /// CrossRef OpenURL; needs `--crossref-pid`.
    Crossref,
}

/// Deployment settings, from flags or `REFLOOKUP_*` environment variables.
#[derive(Args, Debug, Clone)]
pub struct Config {
    /// JavaScript function the payload invokes
    #[arg(long, env = "REFLOOKUP_CALLBACK", default_value = "CiteTB.autoFill", global = true)]
    pub callback: String,

    /// `tool` parameter sent to NCBI E-utilities
    #[arg(long, env = "REFLOOKUP_PUBMED_TOOL", default_value = "reflookup", global = true)]
    pub pubmed_tool: String,

    /// Contact address sent to NCBI E-utilities
    #[arg(long, env = "REFLOOKUP_PUBMED_EMAIL", global = true)]
    pub pubmed_email: Option<String>,

    /// CrossRef OpenURL account identifier
    #[arg(long, env = "REFLOOKUP_CROSSREF_PID", hide_env_values = true, global = true)]
    pub crossref_pid: Option<String>,

    #[arg(long, value_enum, env = "REFLOOKUP_ISBN_SOURCE", default_value_t = IsbnSource::Citation, global = true)]
    pub isbn_source: IsbnSource,

    #[arg(long, value_enum, env = "REFLOOKUP_DOI_SOURCE", default_value_t = DoiSource::Citation, global = true)]
    pub doi_source: DoiSource,

    /// Give up on the upstream service after this many seconds
    #[arg(long, env = "REFLOOKUP_TIMEOUT_SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// JSON usage counter; counting is skipped when the file does not exist
    #[arg(long, env = "REFLOOKUP_COUNTER", global = true)]
    pub counter: Option<PathBuf>,

    /// Drop author names whose parts contain a comma
    #[arg(long, env = "REFLOOKUP_REJECT_COMMA_NAMES", global = true)]
    pub reject_comma_names: bool,

    /// Pass identifiers to the citation service without percent-encoding
    #[arg(long = "no-encode-citation-ids", action = ArgAction::SetFalse, global = true)]
    pub encode_citation_ids: bool,

    /// Ignore the DOI item in PubMed summaries
    #[arg(long = "no-pubmed-doi", action = ArgAction::SetFalse, global = true)]
    pub pubmed_doi: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            callback: "CiteTB.autoFill".into(),
            pubmed_tool: "reflookup".into(),
            pubmed_email: None,
            crossref_pid: None,
            isbn_source: IsbnSource::Citation,
            doi_source: DoiSource::Citation,
            timeout_secs: None,
            counter: None,
            reject_comma_names: false,
            encode_citation_ids: true,
            pubmed_doi: true,
        }
    }
}

impl Config {
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            pubmed_doi: self.pubmed_doi,
            encode_citation_ids: self.encode_citation_ids,
            reject_comma_names: self.reject_comma_names,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
