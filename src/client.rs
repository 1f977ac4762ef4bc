//! Typed HTTP client for the ReBM node REST API.
//!
//! Every call is a single round trip: no retries, no caching, and no timeout
//! beyond the transport's own defaults.

use anyhow::{bail, Context, Result};
use reqwest::{Client, Method, Request, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::types::ErrorBody;
use crate::domain::{Ack, CreateNodeRequest, Health, Node, ReserveNodeRequest};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Failure of a single API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No usable response: connection refused, DNS, TLS, reset mid-body.
    #[error("{method} {url}: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be assembled (body serialization).
    #[error("building request: {0}")]
    Build(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{method} {url} returned {status}{}", detail_suffix(.detail))]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        detail: Option<String>,
        body: String,
    },

    /// The server answered 2xx but the body did not match the expected shape.
    #[error("parsing response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Server-supplied human-readable detail, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if one arrived.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct NodeClient {
    base_url: Url,
    http: Client,
}

impl NodeClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed).with_context(|| format!("invalid API URL {:?}", base_url))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            bail!("API URL must be an http(s) URL, got {:?}", trimmed);
        }

        let http = Client::builder()
            .user_agent(concat!("rebm-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_nodes(&self) -> ApiResult<Vec<Node>> {
        self.execute(self.http.get(self.url(&["nodes", ""]))).await
    }

    pub async fn get_node(&self, name: &str) -> ApiResult<Node> {
        self.execute(self.http.get(self.url(&["nodes", name]))).await
    }

    pub async fn create_node(&self, request: &CreateNodeRequest) -> ApiResult<Ack> {
        self.execute(self.http.post(self.url(&["nodes", ""])).json(request))
            .await
    }

    pub async fn delete_node(&self, name: &str) -> ApiResult<Ack> {
        self.execute(self.http.delete(self.url(&["nodes", name]))).await
    }

    pub async fn reserve_node(&self, name: &str, request: &ReserveNodeRequest) -> ApiResult<Ack> {
        self.execute(
            self.http
                .post(self.url(&["nodes", name, "reserve"]))
                .json(request),
        )
        .await
    }

    pub async fn release_node(&self, name: &str) -> ApiResult<Ack> {
        self.execute(self.http.post(self.url(&["nodes", name, "release"])))
            .await
    }

    pub async fn cleanup_expired(&self) -> ApiResult<Ack> {
        self.execute(self.http.post(self.url(&["nodes", "cleanup", "expired"])))
            .await
    }

    pub async fn health(&self) -> ApiResult<Health> {
        self.execute(self.http.get(self.url(&["health"]))).await
    }

    // ── Internal helpers ───────────────────────────────────

    /// Append path segments to the base URL. Each segment is percent-encoded,
    /// so a node name always stays a single segment. An empty trailing segment
    /// produces a trailing slash.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let request: Request = builder.build().map_err(ApiError::Build)?;
        let method = request.method().clone();
        let url = request.url().to_string();
        debug!(%method, %url, "sending API request");

        let resp = match self.http.execute(request).await {
            Ok(resp) => resp,
            Err(source) => {
                warn!(%method, %url, error = %source, "API request failed");
                return Err(ApiError::Transport {
                    method,
                    url,
                    source,
                });
            }
        };

        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(source) => {
                warn!(%method, %url, %status, error = %source, "reading API response failed");
                return Err(ApiError::Transport {
                    method,
                    url,
                    source,
                });
            }
        };

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(ErrorBody::into_detail);
            warn!(%method, %url, %status, detail = ?detail, "API request failed");
            return Err(ApiError::Status {
                method,
                url,
                status,
                detail,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| {
            warn!(%method, %url, error = %source, "API response did not decode");
            ApiError::Decode { url, source }
        })
    }
}
