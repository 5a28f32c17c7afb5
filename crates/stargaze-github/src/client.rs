//! GitHub REST client and the HTTP plumbing shared by every client.

use chrono::DateTime;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::traits::SingleItemApi;
use crate::types::RateLimitSnapshot;

/// Build a reqwest client carrying the default GitHub headers, the optional
/// authorization header and the configured timeout.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("stargaze"));
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static("2022-11-28"),
    );

    if let Some(auth) = &config.auth_header {
        let mut value =
            HeaderValue::from_str(auth.expose_secret()).map_err(|_| Error::InvalidHeader)?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()?)
}

/// Map a response to `T`, or to the matching error for non-2xx statuses.
pub(crate) async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        // Decode separately so a bad body is a parse error, not a transport one.
        let bytes = response.bytes().await?;
        return Ok(serde_json::from_slice(&bytes)?);
    }

    let status_code = status.as_u16();

    match status_code {
        401 => Err(Error::AuthenticationFailed),
        403 | 429
            if response
                .headers()
                .get("x-ratelimit-remaining")
                .is_some_and(|v| v == "0") =>
        {
            Err(Error::RateLimited)
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(Error::ApiError {
                status: status_code,
                message: text,
            })
        }
    }
}

/// Client for the single-item (REST) protocol.
pub struct RestClient {
    client: Client,
    base_url: Url,
}

impl RestClient {
    /// Default GitHub REST API URL.
    pub const DEFAULT_API_URL: &'static str = "https://api.github.com";

    /// Create a REST client from its configuration.
    ///
    /// # Errors
    /// Returns error if the endpoint is not a usable base URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.endpoint).map_err(|e| Error::InvalidEndpoint {
            url: config.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint {
                url: config.endpoint.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        Ok(Self {
            client: build_http_client(config)?,
            base_url,
        })
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    /// so a `/` or `..` inside a segment stays part of it.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint {
                url: self.base_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        handle_response(response).await
    }

    /// Fetch the core REST rate limit (`GET /rate_limit`).
    ///
    /// # Errors
    /// Returns error if the request fails or the body is not a rate limit.
    pub async fn rate_limit(&self) -> Result<RateLimitSnapshot> {
        #[derive(serde::Deserialize)]
        struct Response {
            rate: Rate,
        }

        #[derive(serde::Deserialize)]
        struct Rate {
            remaining: i64,
            limit: i64,
            reset: Option<i64>,
        }

        let response: Response = self.get(self.endpoint(&["rate_limit"])?).await?;
        let Rate {
            remaining,
            limit,
            reset,
        } = response.rate;

        Ok(RateLimitSnapshot {
            remaining,
            limit,
            reset: reset.and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }

    /// Fetch the stargazer count of one repository (`GET /repos/{owner}/{name}`).
    ///
    /// # Errors
    /// Returns [`Error::RepoNotFound`] on 404, [`Error::MalformedCount`] if the
    /// count is not an integer, or the transport/API error otherwise.
    pub async fn stargazers_count(&self, owner: &str, name: &str) -> Result<u64> {
        let url = self.endpoint(&["repos", owner, name])?;
        let body: Value = match self.get(url).await {
            Err(Error::ApiError { status: 404, .. }) => {
                return Err(Error::RepoNotFound(format!("{owner}/{name}")));
            }
            other => other?,
        };

        let count = parse_count(body.get("stargazers_count").unwrap_or(&Value::Null))?;
        debug!(owner, name, count, "fetched stargazer count over REST");
        Ok(count)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Read a stargazer count that may arrive as a number or a numeric string.
fn parse_count(value: &Value) -> Result<u64> {
    let parsed = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| Error::MalformedCount {
        value: value.to_string(),
    })
}

// === Trait Implementation ===

impl SingleItemApi for RestClient {
    async fn rate_limit(&self) -> Result<RateLimitSnapshot> {
        self.rate_limit().await
    }

    async fn stargazers_count(&self, owner: &str, name: &str) -> Result<u64> {
        self.stargazers_count(owner, name).await
    }
}
