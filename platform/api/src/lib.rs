//! Client side of the dashboard's HTTP boundary.
//!
//! Every read endpoint is role-scoped: `GET /api/{endpoint}/{role label}`.
//! Failures fall into two user-facing buckets: the server could not be
//! reached, or the server answered with an error body whose message is shown
//! verbatim. Nothing here retries.

use std::{sync::Arc, time::Duration};

use platform_authz::{DataFeed, Role};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub use reqwest::StatusCode;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("Unable to connect to server")]
    Connection(#[source] Arc<reqwest::Error>),
    #[error("{message}")]
    Server { status: StatusCode, message: String },
    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse { url: String, reason: String },
    #[error("invalid base url {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Connection(_) => "CONNECTION_ERROR",
            ApiError::Server { .. } => "ACCESS_DENIED",
            ApiError::InvalidResponse { .. } => "INVALID_RESPONSE",
            ApiError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    /// Heading shown above the message.
    pub fn title(&self) -> &'static str {
        match self {
            ApiError::Connection(_) | ApiError::InvalidResponse { .. } => "Connection Error",
            ApiError::Server { .. } => "Access Denied",
            ApiError::InvalidUrl(_) => "Configuration Error",
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    fn connection(err: reqwest::Error) -> Self {
        Self::Connection(Arc::new(err))
    }
}

/// Body of a non-2xx answer.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.into()))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.into()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::connection)?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Appends percent-encoded path segments to the base url, keeping any
    /// prefix path the base already has.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `/api/{feed}/{role label}`. The label, not the short key, is what
    /// the server routes on.
    pub fn role_endpoint(&self, feed: DataFeed, role: Role) -> ApiResult<Url> {
        self.endpoint(&["api", feed.path(), role.label()])
    }

    #[instrument(name = "api.get", skip(self, role), fields(role = role.key()))]
    pub async fn get_role_scoped<T: DeserializeOwned>(
        &self,
        feed: DataFeed,
        role: Role,
    ) -> ApiResult<T> {
        let url = self.role_endpoint(feed, role)?;
        debug!(%url, "fetching");
        let response = self.http.get(url.clone()).send().await.map_err(|err| {
            error!(%url, error = %err, "request failed");
            ApiError::connection(err)
        })?;
        decode(url, response).await
    }

    #[instrument(name = "api.post", skip(self, body))]
    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|err| {
                error!(%url, error = %err, "request failed");
                ApiError::connection(err)
            })?;
        decode(url, response).await
    }
}

async fn decode<T: DeserializeOwned>(url: Url, response: Response) -> ApiResult<T> {
    let status = response.status();
    let bytes = response.bytes().await.map_err(|err| {
        error!(%url, error = %err, "reading response body failed");
        ApiError::connection(err)
    })?;

    if !status.is_success() {
        let message = server_message(status, &bytes);
        warn!(%url, %status, %message, "server rejected request");
        return Err(ApiError::Server { status, message });
    }

    serde_json::from_slice(&bytes).map_err(|err| {
        error!(%url, error = %err, "response did not match the expected shape");
        ApiError::InvalidResponse {
            url: url.to_string(),
            reason: err.to_string(),
        }
    })
}

fn server_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}
