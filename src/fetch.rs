use std::time::Duration;

use tracing::debug;

use crate::{error::LookupError, source::Request};

const USER_AGENT: &str = concat!(
    "reflookup/",
    env!("CARGO_PKG_VERSION"),
    " (citation autofill lookup)"
);

/// Performs the single upstream call a lookup needs.
pub trait Fetch {
    fn get(&self, request: &Request) -> Result<String, LookupError>;
}

/// Blocking HTTP fetcher over `ureq`.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Self {
        HttpFetcher { timeout }
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, request: &Request) -> Result<String, LookupError> {
        let cfg = ureq::Agent::config_builder()
            .timeout_global(self.timeout)
            .max_redirects(if request.follow_redirects { 10 } else { 0 })
            .build();
        let agent = ureq::Agent::new_with_config(cfg);

        debug!(url = %request.url, follow_redirects = request.follow_redirects, "upstream request");
        let body = agent
            .get(request.url.as_str())
            .header("User-Agent", USER_AGENT)
            .call()?
            .into_body()
            .read_to_string()?;
        debug!(bytes = body.len(), "upstream response");
        Ok(body)
    }
}
