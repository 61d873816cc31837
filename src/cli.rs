use std::{path::PathBuf, str::FromStr};

use clap::{Parser, Subcommand, ValueEnum};
use reflookup::{
    config::Config,
    source::{
        Source, citation::Citation, crossref::CrossRef, legacy_isbn::LegacyIsbn, pubmed::PubMed,
    },
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: Config,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up one identifier and print the widget payload
    Fetch {
        /// One of pmid, isbn, doi or url
        #[arg(value_name = "KIND")]
        kind: String,
        #[arg(value_name = "ID")]
        id: String,
        /// Citation template being filled (e.g. book, journal, web)
        #[arg(long, default_value = "")]
        template: String,
    },
    /// Look up from a gateway query string such as `isbn=9781848449510&template=book`
    Query {
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Normalise a saved upstream response and print the record as JSON
    Normalize {
        #[arg(value_enum, value_name = "SOURCE")]
        source: SourceName,
        /// Response body file, or `-` for stdin
        #[arg(value_name = "INPUT")]
        input: Input,
        #[arg(long, default_value = "")]
        template: String,
    },
}

/// Upstream formats that `normalize` understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceName {
    Pubmed,
    Citation,
    LegacyIsbn,
    Crossref,
}

impl SourceName {
    pub fn build(self, config: &Config) -> Box<dyn Source> {
        let caps = config.capabilities();
        match self {
            SourceName::Pubmed => Box::new(PubMed::new(
                config.pubmed_tool.clone(),
                config.pubmed_email.clone(),
                caps.pubmed_doi,
            )),
            SourceName::Citation => {
                Box::new(Citation::new(caps.encode_citation_ids, caps.name_policy()))
            }
            SourceName::LegacyIsbn => Box::new(LegacyIsbn),
            SourceName::Crossref => Box::new(CrossRef::new(config.crossref_pid.clone())),
        }
    }
}

/// Where a saved response comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl FromStr for Input {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(Input::Stdin)
        } else {
            Ok(Input::File(PathBuf::from(s)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn dash_means_stdin() {
        assert_eq!(Input::from_str("-").unwrap(), Input::Stdin);
    }

    #[test]
    fn anything_else_is_a_path() {
        proptest::proptest!(|(s in "[A-Za-z0-9._/-]{1,32}")| {
            proptest::prop_assume!(s != "-");
            let input = Input::from_str(&s).expect("parse");
            proptest::prop_assert_eq!(input, Input::File(PathBuf::from(&s)));
        })
    }

    #[test]
    fn global_config_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "reflookup",
            "fetch",
            "isbn",
            "9781848449510",
            "--template",
            "book",
            "--isbn-source",
            "legacy",
        ])
        .unwrap();
        assert_eq!(cli.config.isbn_source, reflookup::config::IsbnSource::Legacy);
        match cli.command {
            Command::Fetch { kind, id, template } => {
                assert_eq!(kind, "isbn");
                assert_eq!(id, "9781848449510");
                assert_eq!(template, "book");
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn builds_every_source() {
        let config = Config::default();
        let names: Vec<_> = SourceName::value_variants()
            .iter()
            .map(|s| s.build(&config).name())
            .collect();
        assert_eq!(names, ["pubmed", "citation", "legacy-isbn", "crossref"]);
    }
}
