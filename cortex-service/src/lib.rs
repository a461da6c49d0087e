//! Async client for the managed search + completion platform (Snowflake Cortex).
//!
//! Public surface:
//! - [`CortexService`]: one handle for search, completion, SQL, stage downloads
//!   and the append-only Q/A table.
//! - [`config`]: env-driven connection settings.
//! - [`error_handler`]: unified [`CortexError`] and env/identifier helpers.
//! - [`telemetry`]: library-scoped tracing layer for the binary to compose.

pub mod config;
pub mod error_handler;
pub mod platform_service;
pub mod services;
pub mod telemetry;

pub use error_handler::{ConfigError, CortexError, UpstreamError};
pub use platform_service::CortexService;
pub use services::qa_table_service::QaRow;
pub use services::search_service::SearchRow;
pub use services::sql_service::{SearchServiceInfo, SqlRow};
