/// Search query construction.
use super::SearchError;
use reqwest::Url;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://roviapi.veveo.net/search";
pub const DEFAULT_PARTNER_ID: &str = "pkg00@PASSPORT3496.Rovi";
pub const DEFAULT_CUSTOMER_ID: &str = "passport";
pub const DEFAULT_RESULT_CAP: u32 = 10;
/// `ECT` value selecting the response format
pub const DEFAULT_RESPONSE_FORMAT: &str = "5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed parameters shared by every search request.
///
/// Built once at startup and never modified afterwards: fields are private,
/// and the `with_*` setters consume the value, so a shared `SearchConfig`
/// cannot change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    endpoint: Url,
    partner_id: String,
    customer_id: String,
    result_cap: u32,
    /// `None` leaves the `ECT` parameter off the request
    response_format: Option<String>,
    timeout: Duration,
}

impl SearchConfig {
    /// Creates a configuration with the default parameter set for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidEndpoint` if `endpoint` is not an
    /// absolute http(s) URL.
    pub fn new(endpoint: &str) -> Result<Self, SearchError> {
        let invalid = |reason: String| SearchError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }

        Ok(Self {
            endpoint: url,
            partner_id: DEFAULT_PARTNER_ID.to_string(),
            customer_id: DEFAULT_CUSTOMER_ID.to_string(),
            result_cap: DEFAULT_RESULT_CAP,
            response_format: Some(DEFAULT_RESPONSE_FORMAT.to_string()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Partner id sent as `XPID`
    pub fn with_partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = partner_id.into();
        self
    }

    /// Customer id sent as `custid`
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }

    /// Result cap sent as `RPR`
    pub fn with_result_cap(mut self, result_cap: u32) -> Self {
        self.result_cap = result_cap;
        self
    }

    /// Response format sent as `ECT`; `None` omits the parameter
    pub fn with_response_format(mut self, response_format: Option<String>) -> Self {
        self.response_format = response_format;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the search URL for a title
    ///
    /// Parameters are emitted in alphabetical key order, so the same title
    /// always yields the same URL. The title goes into `W`, percent-encoded
    /// as UTF-8.
    pub fn build_query(&self, title: &str) -> Url {
        let result_cap = self.result_cap.to_string();

        let mut params: BTreeMap<&str, &str> = BTreeMap::new();
        params.insert("XPID", &self.partner_id);
        params.insert("custid", &self.customer_id);
        params.insert("RPR", &result_cap);
        if let Some(format) = &self.response_format {
            params.insert("ECT", format);
        }
        params.insert("W", title);

        let mut url = self.endpoint.clone();
        url.set_query(None);
        url.query_pairs_mut().extend_pairs(params);
        url
    }
}
