//! Connection configuration for the platform client.

pub mod cortex_config;
pub mod default_config;
pub mod token_type;
