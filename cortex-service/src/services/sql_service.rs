//! SQL statements client.
//!
//! `POST {base}/api/v2/statements` runs one statement synchronously with
//! positional `TEXT` bindings (`?` placeholders). Results are returned as rows
//! keyed by lower-cased column name; all values arrive as strings or `null`.
//!
//! Only the first result partition is read: every statement issued here
//! returns a handful of rows.

use std::collections::{BTreeMap, HashMap};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::error_handler::{Result, UpstreamError, validate_identifier};
use crate::services::transport::PlatformHttp;

/// Seconds the platform may spend before answering with "still running".
const STATEMENT_TIMEOUT_SECS: u64 = 60;

/// One result row: lower-cased column name → value.
pub type SqlRow = BTreeMap<String, Option<String>>;

/// Name and text column of a search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchServiceInfo {
    pub name: String,
    pub search_column: String,
}

/// Thin client for the statements endpoint.
#[derive(Clone)]
pub struct SqlService {
    http: PlatformHttp,
}

impl SqlService {
    pub fn new(http: PlatformHttp) -> Self {
        Self { http }
    }

    /// Executes `statement` with positional text bindings and returns its rows.
    ///
    /// # Errors
    /// - [`UpstreamError::Statement`] when the platform rejects the statement
    ///   (HTTP 422) or has not finished within the statement timeout (HTTP 202)
    /// - [`UpstreamError::HttpStatus`] for other non-2xx responses
    /// - [`UpstreamError::Decode`] for an unexpected payload
    #[instrument(skip_all, fields(kind = %statement_kind(statement), bindings = bindings.len()))]
    pub async fn execute(&self, statement: &str, bindings: &[&str]) -> Result<Vec<SqlRow>> {
        let cfg = self.http.config();
        let url = self.http.url("/api/v2/statements");

        let body = StatementRequest {
            statement,
            timeout: STATEMENT_TIMEOUT_SECS,
            database: &cfg.database,
            schema: &cfg.schema,
            warehouse: cfg.warehouse.as_deref(),
            role: cfg.role.as_deref(),
            bindings: (!bindings.is_empty()).then(|| {
                bindings
                    .iter()
                    .enumerate()
                    .map(|(i, v)| {
                        (
                            (i + 1).to_string(),
                            Binding {
                                kind: "TEXT",
                                value: *v,
                            },
                        )
                    })
                    .collect()
            }),
        };

        let resp = self.http.post_raw(&url, &body).await?;
        match resp.status() {
            StatusCode::ACCEPTED | StatusCode::UNPROCESSABLE_ENTITY => {
                let info: StatementStatus = resp
                    .json()
                    .await
                    .map_err(|e| UpstreamError::Decode(format!("serde error: {e}")))?;
                return Err(UpstreamError::Statement {
                    code: info.code.unwrap_or_default(),
                    message: info.message.unwrap_or_default(),
                }
                .into());
            }
            _ => {}
        }

        let resp = PlatformHttp::ensure_success(resp, &url).await?;
        let out: StatementResponse = resp
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(format!("serde error: {e}")))?;

        let rows = out.into_rows()?;
        debug!(rows = rows.len(), "statement finished");
        Ok(rows)
    }

    /// Lists search services in the configured database/schema together with
    /// their search column (`SHOW` + one `DESC` per service).
    ///
    /// # Errors
    /// Propagates statement errors; a `DESC` without `search_column` is a
    /// decode error. Services whose names are not plain identifiers are
    /// skipped.
    #[instrument(skip_all)]
    pub async fn list_search_services(&self) -> Result<Vec<SearchServiceInfo>> {
        let services = self.execute("SHOW CORTEX SEARCH SERVICES", &[]).await?;

        let mut out = Vec::with_capacity(services.len());
        for row in services {
            let Some(name) = row.get("name").cloned().flatten() else {
                continue;
            };
            if validate_identifier(&name).is_err() {
                warn!(service = %name, "skipping search service with a non-plain name");
                continue;
            }

            let desc = self
                .execute(&format!("DESC CORTEX SEARCH SERVICE {name}"), &[])
                .await?;
            let search_column = desc
                .into_iter()
                .next()
                .and_then(|r| r.get("search_column").cloned().flatten())
                .ok_or_else(|| {
                    UpstreamError::Decode(format!("service {name} has no search_column"))
                })?;

            out.push(SearchServiceInfo {
                name,
                search_column,
            });
        }
        Ok(out)
    }
}

/// First keyword of a statement, for log fields.
fn statement_kind(statement: &str) -> &str {
    statement.split_whitespace().next().unwrap_or("")
}

/* ==========================
HTTP payloads
========================== */

#[derive(Debug, Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    database: &'a str,
    schema: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    warehouse: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bindings: Option<HashMap<String, Binding<'a>>>,
}

#[derive(Debug, Serialize)]
struct Binding<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatementStatus {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatementResponse {
    result_set_meta_data: Option<ResultSetMetaData>,
    #[serde(default)]
    data: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultSetMetaData {
    #[serde(default)]
    row_type: Vec<ColumnType>,
}

#[derive(Debug, Deserialize)]
struct ColumnType {
    name: String,
}

impl StatementResponse {
    fn into_rows(self) -> Result<Vec<SqlRow>> {
        let columns: Vec<String> = self
            .result_set_meta_data
            .map(|m| m.row_type.into_iter().map(|c| c.name.to_lowercase()).collect())
            .unwrap_or_default();

        self.data
            .into_iter()
            .map(|values| -> Result<SqlRow> {
                if values.len() != columns.len() {
                    return Err(UpstreamError::Decode(format!(
                        "row has {} values for {} columns",
                        values.len(),
                        columns.len()
                    ))
                    .into());
                }
                Ok(columns.iter().cloned().zip(values).collect())
            })
            .collect()
    }
}
