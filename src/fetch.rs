//! CSV transport: fetches the raw payload the pipeline ingests.

use std::time::Duration;

use crate::error::Error;

/// Default request timeout for the HTTP source.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Supplies raw CSV text. The production implementation is HTTP; tests
/// substitute an in-memory stub.
pub trait CsvSource {
    fn fetch(&self) -> Result<String, Error>;
}

/// HTTP GET against a configured URL.
pub struct HttpSource {
    url: String,
    timeout: Duration,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CsvSource for HttpSource {
    fn fetch(&self) -> Result<String, Error> {
        let response = ureq::get(&self.url)
            .timeout(self.timeout)
            .call()
            .map_err(|e| Error::Network(format!("GET {} failed: {e}", self.url)))?;
        let status = response.status();
        if status >= 400 {
            return Err(Error::Network(format!(
                "server returned {} {}",
                status,
                response.status_text()
            )));
        }
        response
            .into_string()
            .map_err(|e| Error::Network(format!("reading response body: {e}")))
    }
}
