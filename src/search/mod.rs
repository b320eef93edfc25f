//! Search service access
//!
//! This module builds search requests for program titles, sends them to the
//! search service, and classifies what comes back.
mod analyzer;
mod query;
mod veveo;
mod veveo_types;

pub use analyzer::{AnalyzeError, Match, NO_RESULTS_SENTINEL, Outcome, analyze};
pub use query::{
    DEFAULT_CUSTOMER_ID, DEFAULT_ENDPOINT, DEFAULT_PARTNER_ID, DEFAULT_RESPONSE_FORMAT,
    DEFAULT_RESULT_CAP, DEFAULT_TIMEOUT, SearchConfig,
};
pub use veveo::VeveoClient;

use reqwest::Url;
use thiserror::Error;

/// Errors that can occur while talking to the search service
#[derive(Debug, Error)]
pub enum SearchError {
    /// The configured endpoint is not a usable base URL
    #[error("Invalid search endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to set up HTTP client: {0}")]
    ClientSetup(String),

    /// The request failed or returned a non-success status
    #[error("Request failed: {0}")]
    Network(String),

    /// The response body could not be read completely
    #[error("Failed to read response body: {0}")]
    Read(String),
}

/// Trait for clients that can execute a prepared search request.
///
/// Implementors only move bytes; building the URL and interpreting the
/// response happen elsewhere.
pub trait SearchClient {
    /// Sends the search request and returns the raw response body
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Network` on transport failure or a non-success
    /// status, and `SearchError::Read` if the body cannot be read.
    fn execute_search(&self, url: &Url) -> Result<Vec<u8>, SearchError>;
}
