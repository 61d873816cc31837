//! Bibliographic lookups for a citation-filling widget.
//!
//! An identifier (PubMed ID, ISBN, DOI or URL) is sent to one upstream service, and whatever
//! comes back (NCBI ESummary XML, REST citation JSON, legacy ISBN metadata JSON or CrossRef
//! unixref XML) is normalised into a single [`record::CitationRecord`], which is then wrapped
//! in the script payload the widget loads.

pub mod callback;
pub mod config;
pub mod counter;
pub mod date;
pub mod error;
pub mod fetch;
pub mod name;
pub mod record;
pub mod resolver;
pub mod source;
pub mod xml;

pub use error::LookupError;
pub use record::{Author, CitationRecord};
pub use resolver::{IdentifierKind, Lookup, Query, Resolver};
