//! Plain-text fetches from raw content hosts.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Client for unauthenticated plain-text downloads.
#[derive(Debug, Clone)]
pub struct RawClient {
    client: Client,
}

impl RawClient {
    /// Create a raw client. Only the timeout of `config` is used; raw hosts
    /// never receive the API token.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("stargaze"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the body as text.
    ///
    /// # Errors
    /// Returns error on transport failure or a non-2xx status.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.text().await?)
    }
}
