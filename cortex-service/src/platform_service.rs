//! Shared platform client bundling every Cortex API behind one handle.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - All services share one HTTP connection pool and one credential set.
//!
//! # Example
//! ```no_run
//! use cortex_service::CortexService;
//! use cortex_service::config::default_config::config_from_env;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = CortexService::new(config_from_env()?)?;
//!
//!     let services = svc.list_search_services().await?;
//!     println!("services = {services:?}");
//!
//!     let answer = svc.complete("mistral-large", "Say hi").await?;
//!     println!("{answer}");
//!     Ok(())
//! }
//! ```

use serde_json::Value;

use crate::{
    config::cortex_config::CortexConfig,
    error_handler::CortexError,
    services::{
        complete_service::CompleteService,
        qa_table_service::{QaRow, QaTableService},
        search_service::{SearchRequest, SearchRow, SearchService},
        sql_service::{SearchServiceInfo, SqlRow, SqlService},
        stage_service::StageService,
        transport::PlatformHttp,
    },
};

/// Facade over search, completion, SQL, stage and Q/A-table clients.
#[derive(Clone)]
pub struct CortexService {
    search: SearchService,
    complete: CompleteService,
    sql: SqlService,
    stage: StageService,
    qa_table: QaTableService,
}

impl CortexService {
    /// Creates all clients over a single transport.
    ///
    /// # Errors
    /// Returns [`CortexError`] if the config is invalid or the HTTP client
    /// cannot be built.
    pub fn new(cfg: CortexConfig) -> Result<Self, CortexError> {
        let http = PlatformHttp::new(cfg)?;
        let sql = SqlService::new(http.clone());

        Ok(Self {
            search: SearchService::new(http.clone()),
            complete: CompleteService::new(http.clone()),
            stage: StageService::new(http, sql.clone()),
            qa_table: QaTableService::new(sql.clone()),
            sql,
        })
    }

    /// Similarity query against a named search service.
    pub async fn search(
        &self,
        service: &str,
        query: &str,
        columns: &[&str],
        limit: usize,
        filter: Option<&Value>,
    ) -> Result<Vec<SearchRow>, CortexError> {
        self.search
            .query(
                service,
                SearchRequest {
                    query,
                    columns,
                    limit,
                    filter,
                },
            )
            .await
    }

    /// Non-streaming completion with the given model.
    pub async fn complete(&self, model: &str, prompt: &str) -> Result<String, CortexError> {
        self.complete.complete(model, prompt).await
    }

    /// Runs one SQL statement with positional text bindings.
    pub async fn execute(
        &self,
        statement: &str,
        bindings: &[&str],
    ) -> Result<Vec<SqlRow>, CortexError> {
        self.sql.execute(statement, bindings).await
    }

    /// Discovers search services and their search columns.
    pub async fn list_search_services(&self) -> Result<Vec<SearchServiceInfo>, CortexError> {
        self.sql.list_search_services().await
    }

    /// Downloads a file from an internal stage.
    pub async fn download_stage_file(
        &self,
        stage: &str,
        relative_path: &str,
    ) -> Result<Vec<u8>, CortexError> {
        self.stage.download(stage, relative_path).await
    }

    /// Creates the Q/A table if needed and appends one row.
    pub async fn append_qa_row(&self, table: &str, row: &QaRow<'_>) -> Result<(), CortexError> {
        self.qa_table.ensure_table(table).await?;
        self.qa_table.insert(table, row).await
    }
}
