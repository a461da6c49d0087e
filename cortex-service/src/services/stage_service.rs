//! Stage file download via presigned URLs.
//!
//! The statements API hands out a short-lived URL
//! (`GET_PRESIGNED_URL(@stage, path, expiry)`) which is then fetched without
//! platform credentials.

use reqwest::StatusCode;
use tracing::{debug, instrument};

use crate::error_handler::{Result, UpstreamError, validate_stage};
use crate::services::sql_service::SqlService;
use crate::services::transport::PlatformHttp;

/// Lifetime of the presigned URL, in seconds.
const PRESIGNED_URL_EXPIRY_SECS: u32 = 3600;

/// Thin client for reading files out of an internal stage.
#[derive(Clone)]
pub struct StageService {
    http: PlatformHttp,
    sql: SqlService,
}

impl StageService {
    pub fn new(http: PlatformHttp, sql: SqlService) -> Self {
        Self { http, sql }
    }

    /// Downloads `relative_path` from `stage` (e.g. `@DB.SCHEMA.PDFDOCS`).
    ///
    /// # Errors
    /// - [`ConfigError::InvalidIdentifier`](crate::error_handler::ConfigError::InvalidIdentifier) for a bad stage name
    /// - [`UpstreamError::DocumentNotFound`] if no URL is issued or the file is gone
    /// - [`UpstreamError::HttpStatus`] for other download failures
    #[instrument(skip_all, fields(stage = %stage, path = %relative_path))]
    pub async fn download(&self, stage: &str, relative_path: &str) -> Result<Vec<u8>> {
        validate_stage(stage)?;

        let statement = format!(
            "SELECT GET_PRESIGNED_URL({stage}, ?, {PRESIGNED_URL_EXPIRY_SECS}) AS URL"
        );
        let rows = self.sql.execute(&statement, &[relative_path]).await?;
        let url = rows
            .into_iter()
            .next()
            .and_then(|r| r.get("url").cloned().flatten())
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| UpstreamError::DocumentNotFound(relative_path.to_string()))?;

        let resp = self.http.get_unauthenticated(&url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(UpstreamError::DocumentNotFound(relative_path.to_string()).into());
        }
        // The presigned URL is a credential; keep it out of error messages.
        let resp = PlatformHttp::ensure_success(resp, "<presigned stage url>").await?;

        let bytes = resp.bytes().await?;
        debug!(bytes = bytes.len(), "stage file downloaded");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::CortexError;
    use crate::services::test_support::config_for;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn stage_with_url(server: &MockServer, url: Option<String>) -> StageService {
        Mock::given(method("POST"))
            .and(path("/api/v2/statements"))
            .and(body_partial_json(json!({
                "bindings": {"1": {"type": "TEXT", "value": "docs/a.pdf"}}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resultSetMetaData": {"rowType": [{"name": "URL"}]},
                "data": [[url]]
            })))
            .mount(server)
            .await;
        let http = PlatformHttp::new(config_for(&server.uri())).unwrap();
        StageService::new(http.clone(), SqlService::new(http))
    }

    #[tokio::test]
    async fn downloads_bytes_through_presigned_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/presigned/a.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
            .mount(&server)
            .await;
        let stage =
            stage_with_url(&server, Some(format!("{}/presigned/a.pdf", server.uri()))).await;

        let bytes = stage
            .download("@TALK_TO_DOC.PUBLIC.PDFDOCS", "docs/a.pdf")
            .await
            .unwrap();
        assert_eq!(bytes, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let stage =
            stage_with_url(&server, Some(format!("{}/presigned/a.pdf", server.uri()))).await;

        let err = stage
            .download("@TALK_TO_DOC.PUBLIC.PDFDOCS", "docs/a.pdf")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn null_url_is_not_found() {
        let server = MockServer::start().await;
        let stage = stage_with_url(&server, None).await;
        let err = stage
            .download("@TALK_TO_DOC.PUBLIC.PDFDOCS", "docs/a.pdf")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CortexError::Upstream(UpstreamError::DocumentNotFound(p)) if p == "docs/a.pdf"
        ));
    }

    #[tokio::test]
    async fn stage_name_is_validated() {
        let server = MockServer::start().await;
        let stage = stage_with_url(&server, None).await;
        assert!(stage.download("PDFDOCS); DROP", "docs/a.pdf").await.is_err());
    }
}
