//! Authenticated JSON transport shared by all services.
//!
//! Every request carries:
//! - `Authorization: Bearer <token>`
//! - `X-Snowflake-Authorization-Token-Type: <kind>`
//! - `Accept: application/json`
//!
//! Non-2xx responses are turned into [`UpstreamError::HttpStatus`] with a
//! trimmed body snippet. Nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, header};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::config::cortex_config::CortexConfig;
use crate::config::default_config::DEFAULT_TIMEOUT_SECS;
use crate::error_handler::{Result, UpstreamError, make_snippet, validate_http_endpoint};

/// Header carrying the bearer token kind.
pub const TOKEN_TYPE_HEADER: &str = "X-Snowflake-Authorization-Token-Type";

/// Cheap-to-clone HTTP transport bound to one account.
#[derive(Clone)]
pub struct PlatformHttp {
    client: reqwest::Client,
    cfg: Arc<CortexConfig>,
}

impl PlatformHttp {
    /// Builds the HTTP client with the configured timeout.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`](crate::error_handler::ConfigError::InvalidFormat) if the account URL is not HTTP(S)
    /// - [`CortexError::HttpTransport`](crate::error_handler::CortexError::HttpTransport) if the client cannot be built
    pub fn new(cfg: CortexConfig) -> Result<Self> {
        validate_http_endpoint("SNOWFLAKE_ACCOUNT_URL", cfg.base_url())?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            cfg: Arc::new(cfg),
        })
    }

    /// Connection settings this transport was built with.
    pub fn config(&self) -> &CortexConfig {
        &self.cfg
    }

    /// Absolute URL for an API path (`/api/v2/...`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.cfg.base_url(), path)
    }

    /// POSTs a JSON body with auth headers and returns the raw response.
    ///
    /// Status handling is left to the caller (see [`Self::ensure_success`]).
    pub async fn post_raw<B>(&self, url: &str, body: &B) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        debug!("POST {url}");
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.cfg.token)
            .header(TOKEN_TYPE_HEADER, self.cfg.token_type.header_value())
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;
        Ok(resp)
    }

    /// POSTs a JSON body and decodes a JSON response of type `R`.
    ///
    /// # Errors
    /// - [`UpstreamError::HttpStatus`] for non-2xx responses
    /// - [`UpstreamError::Decode`] if the body is not the expected shape
    pub async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self.post_raw(url, body).await?;
        let resp = Self::ensure_success(resp, url).await?;
        let out = resp
            .json::<R>()
            .await
            .map_err(|e| UpstreamError::Decode(format!("serde error: {e}")))?;
        Ok(out)
    }

    /// Plain GET without platform credentials (presigned URLs carry their own).
    pub async fn get_unauthenticated(&self, url: &str) -> Result<Response> {
        debug!("GET <presigned>");
        Ok(self.client.get(url).send().await?)
    }

    /// Maps a non-2xx response to [`UpstreamError::HttpStatus`].
    pub async fn ensure_success(resp: Response, url: &str) -> Result<Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(UpstreamError::HttpStatus {
            status,
            url: url.to_string(),
            snippet: make_snippet(&text),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::CortexError;
    use crate::services::test_support::config_for;
    use serde_json::{Value, json};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_auth_headers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/ping"))
            .and(header("authorization", "Bearer test-token"))
            .and(header(TOKEN_TYPE_HEADER, "PROGRAMMATIC_ACCESS_TOKEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let http = PlatformHttp::new(config_for(&server.uri())).unwrap();
        let out: Value = http
            .post_json(&http.url("/api/v2/ping"), &json!({}))
            .await
            .unwrap();
        assert_eq!(out["ok"], true);
    }

    #[tokio::test]
    async fn maps_error_status_with_snippet() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("warehouse suspended"))
            .mount(&server)
            .await;

        let http = PlatformHttp::new(config_for(&server.uri())).unwrap();
        let err = http
            .post_json::<_, Value>(&http.url("/api/v2/ping"), &json!({}))
            .await
            .unwrap_err();
        match err {
            CortexError::Upstream(UpstreamError::HttpStatus { status, snippet, .. }) => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(snippet, "warehouse suspended");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_non_http_account_url() {
        let mut cfg = config_for("http://localhost");
        cfg.account_url = "acme.snowflakecomputing.com".into();
        assert!(PlatformHttp::new(cfg).is_err());
    }
}
