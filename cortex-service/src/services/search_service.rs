//! Cortex Search client.
//!
//! `POST {base}/api/v2/databases/{db}/schemas/{schema}/cortex-search-services/{name}:query`
//!
//! The request names the columns to return, a result limit and an optional
//! filter object (passed through verbatim). Each result comes back as a JSON
//! object keyed by column name, in the service's relevance order.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::error_handler::{Result, validate_identifier};
use crate::services::transport::PlatformHttp;

/// One search result row: column name → value.
pub type SearchRow = Map<String, Value>;

/// Parameters of a similarity query.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest<'a> {
    /// Free-text query.
    pub query: &'a str,
    /// Columns to return for each hit.
    pub columns: &'a [&'a str],
    /// Maximum number of hits.
    pub limit: usize,
    /// Optional filter expression (`{"@eq": {...}}` etc.).
    pub filter: Option<&'a Value>,
}

/// Thin client for the search endpoint.
#[derive(Clone)]
pub struct SearchService {
    http: PlatformHttp,
}

impl SearchService {
    pub fn new(http: PlatformHttp) -> Self {
        Self { http }
    }

    /// Runs a similarity query against the named service.
    ///
    /// An empty `results` array is a valid "no match" answer.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidIdentifier`](crate::error_handler::ConfigError::InvalidIdentifier) for a bad service name
    /// - [`UpstreamError::HttpStatus`](crate::error_handler::UpstreamError::HttpStatus) for non-2xx responses
    /// - [`UpstreamError::Decode`](crate::error_handler::UpstreamError::Decode) for an unexpected payload
    #[instrument(skip_all, fields(service = %service, limit = req.limit))]
    pub async fn query(&self, service: &str, req: SearchRequest<'_>) -> Result<Vec<SearchRow>> {
        validate_identifier(service)?;
        let cfg = self.http.config();
        let url = self.http.url(&format!(
            "/api/v2/databases/{}/schemas/{}/cortex-search-services/{}:query",
            cfg.database, cfg.schema, service
        ));

        let body = QueryBody {
            query: req.query,
            columns: req.columns,
            limit: req.limit,
            filter: req.filter,
        };
        let out: QueryResponse = self.http.post_json(&url, &body).await?;
        debug!(hits = out.results.len(), "search finished");
        Ok(out.results)
    }
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
    columns: &'a [&'a str],
    limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<SearchRow>,
}
