// API client module: a small blocking HTTP session for the Client API.
// It is intentionally small and synchronous to keep the tutorials easy to
// follow: one session per process, one request per subcommand.

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ClientApiConfig;

/// Default per-request timeout; override with `RequestBuilder::timeout`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated session that holds a reqwest blocking client, the API base
/// URL and the basic-auth credentials. The account and API-key headers ride
/// along as client-wide default headers.
pub struct ClientApiSession {
    base_url: String,
    basic_user: String,
    basic_password: String,
    http: Client,
}

impl ClientApiSession {
    /// Build a session from resolved credentials.
    pub fn from_config(config: &ClientApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Client-Account",
            HeaderValue::from_str(&config.account_uid)
                .context("Account UID is not a valid header value")?,
        );
        headers.insert(
            "X-Client-Api-Key",
            HeaderValue::from_str(&config.api_key)
                .context("API key is not a valid header value")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            basic_user: config.basic_user.clone(),
            basic_password: config.basic_password.clone(),
            http,
        })
    }

    /// Absolute URL for an API path; a missing leading slash is supplied.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Start a request against an API path. Callers chain query parameters
    /// and a JSON or multipart body, then hand the builder to `send` or
    /// `json`.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.endpoint(path))
            .basic_auth(&self.basic_user, Some(&self.basic_password))
    }

    /// Execute a request and fail on any non-2xx status, carrying the status
    /// code and the response body in the error message. No retries.
    pub fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.build().context("Failed to build request")?;
        debug!(method = %request.method(), url = %request.url(), "sending request");
        let response = self
            .http
            .execute(request)
            .context("Failed to send request")?;
        let status = response.status();
        debug!(%status, "received response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            bail!("Request failed: {} - {}", status, body);
        }
        Ok(response)
    }

    /// Like `send`, but decodes the response body as JSON. An empty body
    /// yields `None`.
    pub fn json(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let response = self.send(request)?;
        let body = response.text().context("Failed to read response body")?;
        if body.is_empty() {
            return Ok(None);
        }
        let value = serde_json::from_str(&body).context("Response body is not valid JSON")?;
        Ok(Some(value))
    }

    /// Human-readable JSON: 2-space indent, keys sorted, non-ASCII intact.
    /// Key order comes from serde_json's map representation, so this stays
    /// deterministic for any decoded value.
    pub fn pretty(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    }
}

/// Per-item failure entry returned by the bulk endpoints. The server is not
/// consistent about which identifying field it fills in, so both are kept.
#[derive(Debug, Deserialize)]
pub struct BulkError {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub advert_id: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl BulkError {
    /// Identifier to show for this failure: reference, advert id, or
    /// "unknown".
    pub fn label(&self) -> &str {
        self.reference
            .as_deref()
            .or(self.advert_id.as_deref())
            .unwrap_or("unknown")
    }

    pub fn detail_text(&self) -> String {
        match &self.detail {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => "no detail provided".to_owned(),
        }
    }
}

/// Response envelope shared by the bulk endpoints: a list of accepted
/// adverts plus a list of per-item errors. Partial failure is a normal
/// response shape here, not a transport error.
#[derive(Debug, Default, Deserialize)]
pub struct BulkResponse {
    #[serde(default)]
    pub adverts: Vec<Value>,
    #[serde(default)]
    pub errors: Vec<BulkError>,
}

/// Pagination envelope common to the list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub page_count: Option<u64>,
}

impl PageMeta {
    /// "Page X of Y" with placeholders for whatever the server left out.
    pub fn describe(&self, requested_page: u32) -> String {
        let current = self
            .current_page
            .map_or_else(|| requested_page.to_string(), |page| page.to_string());
        let total = self
            .page_count
            .map_or_else(|| "?".to_owned(), |count| count.to_string());
        format!("Page {} of {}", current, total)
    }
}
