//! Authenticated HTTP client for the Duda REST API
//!
//! Every request carries Basic authentication, JSON content negotiation
//! headers and fixed timeouts. Responses are parsed as JSON; an empty body
//! is reported as "no content" rather than an error.

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use sitebuilder_core::DudaConfig;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Duda API base URL
pub const DUDA_API_BASE: &str = "https://api.duda.co";

/// Total timeout for one API request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for one API request
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const CLIENT_USER_AGENT: &str = concat!("sitebuilder-provider-duda/", env!("CARGO_PKG_VERSION"));

/// Errors raised below the error translator
///
/// These are converted into [`sitebuilder_core::Error`] by the translator
/// in [`crate::translate`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status
        status: StatusCode,
        /// Raw response body
        body: String,
    },

    /// A path segment that would not address a single resource
    #[error("Invalid identifier '{segment}'")]
    InvalidPath {
        /// The rejected segment
        segment: String,
    },

    /// Base URL that cannot carry API paths
    #[error("Invalid base URL '{0}'")]
    BaseUrl(String),

    /// Non-empty body that is not usable JSON
    #[error("Unknown Provider API Error")]
    InvalidResponse {
        /// Raw response body
        body: String,
    },

    /// A catalog lookup found no match
    #[error("{message}")]
    NotFound {
        /// Error message
        message: String,
        /// The catalog that was searched
        catalog: Value,
    },

    /// Request never produced a response (timeout, connection failure)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response JSON did not have the expected shape
    #[error("Unexpected response format: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result type for raw API calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Duda API client
///
/// Built once per provider instance and reused for every call. Cloning is
/// cheap: the underlying connection pool is shared.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
#[derive(Clone)]
pub struct DudaClient {
    /// HTTP client for API requests
    http: reqwest::Client,

    /// Base URL; API paths are appended segment by segment
    base_url: Url,

    /// API username
    username: String,

    /// API password
    /// ⚠️ NEVER log this value
    password: String,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for DudaClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DudaClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl DudaClient {
    /// Create a client against the production API
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn new(config: &DudaConfig) -> ApiResult<Self> {
        Self::with_base_url(config, DUDA_API_BASE)
    }

    /// Create a client against a custom base URL (e.g. a mock server)
    ///
    /// # Errors
    ///
    /// Fails if the underlying HTTP client cannot be built.
    pub fn with_base_url(config: &DudaConfig, base_url: impl Into<String>) -> ApiResult<Self> {
        let base_url = base_url.into();
        let base_url = match Url::parse(&base_url) {
            Ok(url) if !url.cannot_be_a_base() => url,
            _ => return Err(ApiError::BaseUrl(base_url)),
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Build `<base>/api/<path...>` with every segment percent-encoded
    ///
    /// A segment can never introduce `/`, so remote ids always address a
    /// single resource. Empty, `.` and `..` segments are rejected.
    fn endpoint(&self, path: &[&str]) -> ApiResult<Url> {
        if let Some(segment) = path
            .iter()
            .find(|segment| matches!(segment.trim(), "" | "." | ".."))
        {
            return Err(ApiError::InvalidPath {
                segment: segment.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(path);

        Ok(url)
    }

    /// Issue one API request
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP method
    /// - `path`: segments below `/api/`, e.g. `["sites", "multiscreen", "plans"]`
    /// - `query`: optional URL parameters
    /// - `body`: optional request body, serialized as JSON
    ///
    /// # Returns
    ///
    /// - `Ok(None)`: the response body was empty
    /// - `Ok(Some(json))`: the parsed response body
    /// - `Err(ApiError::Status)`: non-2xx response
    /// - `Err(ApiError::InvalidResponse)`: body is not JSON or is an empty value
    /// - `Err(ApiError::InvalidPath)`: a path segment is empty, `.` or `..`
    /// - `Err(ApiError::Transport)`: no response at all
    pub async fn request<B>(
        &self,
        method: Method,
        path: &[&str],
        query: Option<&[(&str, &str)]>,
        body: Option<&B>,
    ) -> ApiResult<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        tracing::debug!("Duda API request: {} {}", method, url);

        let mut request = self
            .http
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password));

        if let Some(query) = query {
            request = request.query(query);
        }

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!("Duda API responded with status {}", status);
            return Err(ApiError::Status { status, body: text });
        }

        parse_response(text)
    }

    /// Issue a request without a body
    pub async fn send(
        &self,
        method: Method,
        path: &[&str],
        query: Option<&[(&str, &str)]>,
    ) -> ApiResult<Option<Value>> {
        self.request::<Value>(method, path, query, None).await
    }
}

fn parse_response(text: String) -> ApiResult<Option<Value>> {
    if text.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(value) if !is_empty_value(&value) => Ok(Some(value)),
        _ => Err(ApiError::InvalidResponse { body: text }),
    }
}

/// Values a loosely-typed caller would treat as false
fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}
