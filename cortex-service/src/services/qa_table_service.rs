//! Append-only question/answer table.
//!
//! The table is created on first use if absent and never altered; rows are
//! inserted with bound parameters. `CREATED_AT` is stamped by the table default.

use tracing::{info, instrument};

use crate::error_handler::{Result, validate_identifier};
use crate::services::sql_service::SqlService;

/// One row of the question/answer table, in column order.
#[derive(Debug, Clone, Copy)]
pub struct QaRow<'a> {
    pub question: &'a str,
    pub answer: &'a str,
    pub file_url: Option<&'a str>,
    pub chunk: Option<&'a str>,
    pub language: Option<&'a str>,
    pub meta_info: Option<&'a str>,
    pub relative_path: Option<&'a str>,
    pub username: &'a str,
}

/// Thin wrapper over [`SqlService`] for the Q/A table.
#[derive(Clone)]
pub struct QaTableService {
    sql: SqlService,
}

impl QaTableService {
    pub fn new(sql: SqlService) -> Self {
        Self { sql }
    }

    /// `CREATE TABLE IF NOT EXISTS` with the fixed Q/A schema.
    ///
    /// # Errors
    /// Invalid table name or statement failure.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn ensure_table(&self, table: &str) -> Result<()> {
        validate_identifier(table)?;
        let statement = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
            RAGQuestion STRING,
            RAGAnswer STRING,
            file_url STRING,
            chunk STRING,
            language STRING,
            meta_info STRING,
            relative_path STRING,
            USERNAME STRING,
            CREATED_AT TIMESTAMP_NTZ DEFAULT CURRENT_TIMESTAMP()
    )"
        );
        self.sql.execute(&statement, &[]).await?;
        Ok(())
    }

    /// Appends one row. Missing metadata is stored as an empty string.
    ///
    /// # Errors
    /// Invalid table name or statement failure.
    #[instrument(skip_all, fields(table = %table))]
    pub async fn insert(&self, table: &str, row: &QaRow<'_>) -> Result<()> {
        validate_identifier(table)?;
        let statement = format!(
            "INSERT INTO {table} (RAGQuestion, RAGAnswer, file_url, chunk, language, meta_info, relative_path, USERNAME)
        VALUES (?,?,?,?,?,?,?,?)"
        );
        let values = [
            row.question,
            row.answer,
            row.file_url.unwrap_or_default(),
            row.chunk.unwrap_or_default(),
            row.language.unwrap_or_default(),
            row.meta_info.unwrap_or_default(),
            row.relative_path.unwrap_or_default(),
            row.username,
        ];
        self.sql.execute(&statement, &values).await?;
        info!("qa row appended");
        Ok(())
    }
}
