use thiserror::Error;

/// Why a lookup produced no record.
///
/// Only [`LookupError::UnrecognizedIdentifierKind`] is ever surfaced to the caller of the
/// binary; every other variant is absorbed into an empty record at the output boundary.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("cannot build upstream request: {0}")]
    InvalidRequest(String),

    #[error("unrecognised identifier kind: {0}")]
    UnrecognizedIdentifierKind(String),
}

impl LookupError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        LookupError::MalformedUpstreamResponse(msg.into())
    }

    /// Whether the dispatcher should turn this into an empty record rather than reject.
    pub fn is_absorbed(&self) -> bool {
        !matches!(self, LookupError::UnrecognizedIdentifierKind(_))
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::MalformedUpstreamResponse(format!("invalid JSON: {e}"))
    }
}

impl From<quick_xml::Error> for LookupError {
    fn from(e: quick_xml::Error) -> Self {
        LookupError::MalformedUpstreamResponse(format!("invalid XML: {e}"))
    }
}

impl From<ureq::Error> for LookupError {
    fn from(e: ureq::Error) -> Self {
        LookupError::UpstreamUnavailable(e.to_string())
    }
}
