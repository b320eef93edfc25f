/// Search service client implementation.
use super::{SearchClient, SearchConfig, SearchError};
use reqwest::Url;
use tracing::debug;

/// Blocking HTTP client for the search service.
///
/// Each call sends exactly one GET request. There are no retries; a
/// failed request is reported to the caller as-is.
pub struct VeveoClient {
    client: reqwest::blocking::Client,
}

impl VeveoClient {
    /// Creates a client whose requests time out after `config.timeout()`
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SearchError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }
}

impl SearchClient for VeveoClient {
    fn execute_search(&self, url: &Url) -> Result<Vec<u8>, SearchError> {
        debug!(%url, "sending search request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(SearchError::Network(format!(
                "HTTP {} {}",
                response.status().as_u16(),
                response.status().canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| SearchError::Read(e.to_string()))?;

        Ok(body.to_vec())
    }
}
