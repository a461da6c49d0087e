//! Fixed catalogs (models, example questions) and the discovered search services.

use cortex_service::SearchServiceInfo;
use tracing::{info, warn};

use crate::error::{ChatError, ChatResult};
use crate::platform::DocPlatform;

/// Completion models offered to the user; the first is the default.
pub const MODELS: [&str; 4] = ["mistral-large", "snowflake-arctic", "llama3-70b", "llama3-8b"];

/// Example questions for the question-selection control.
pub const EXAMPLE_QUESTIONS: [&str; 13] = [
    "What is the Snowflake Arctic Cookbook Series about?",
    "What is Snowflake's Arctic-Embed model?",
    "What are key features of Snowflake's Arctic-TILT model?",
    "How did Snowflake collaborate with the University of Waterloo?",
    "Why use Snowflake's PostgreSQL and MySQL connectors?",
    "How does the Snowflake platform support fine-tuning Llama 3.1?",
    "How does Snowflake's time-series forecasting differ from traditional methods?",
    "How does Snowflake's document intelligence optimize performance?",
    "How does Snowflake aim to improve real-world retrieval applications?",
    "What specific use cases does Snowflake highlight for RAG systems?",
    "How does Snowflake's new AI stack support fine-tuning large models?",
    "What are practical applications of Snowflake's document intelligence?",
    "How does elastic computing support Snowflake's AI research and development?",
];

/// Columns requested from the search service for every question.
pub const SEARCH_COLUMNS: [&str; 5] = ["chunk", "relative_path", "file_url", "language", "meta_info"];

/// Search services discovered at startup, with the default already resolved.
#[derive(Clone, Debug, Default)]
pub struct ServiceCatalog {
    services: Vec<SearchServiceInfo>,
    default_index: Option<usize>,
}

impl ServiceCatalog {
    /// Default is `preferred` when present, otherwise the first service.
    pub fn new(services: Vec<SearchServiceInfo>, preferred: &str) -> Self {
        let default_index = services
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(preferred))
            .or(if services.is_empty() { None } else { Some(0) });
        Self {
            services,
            default_index,
        }
    }

    /// Lists services through the platform (one round of metadata calls).
    ///
    /// # Errors
    /// Propagates platform errors; an empty list is not an error.
    pub async fn discover<P: DocPlatform>(platform: &P, preferred: &str) -> ChatResult<Self> {
        let services = platform.list_search_services().await?;
        if services.is_empty() {
            warn!("no search services found; questions will be rejected");
        } else {
            info!(count = services.len(), "search services discovered");
        }
        Ok(Self::new(services, preferred))
    }

    pub fn services(&self) -> &[SearchServiceInfo] {
        &self.services
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn default_service(&self) -> Option<&SearchServiceInfo> {
        self.default_index.map(|i| &self.services[i])
    }

    pub fn get(&self, name: &str) -> Option<&SearchServiceInfo> {
        self.services.iter().find(|s| s.name.eq_ignore_ascii_case(name))
    }

    /// Service for a turn: the explicit choice, else the default.
    ///
    /// # Errors
    /// - [`ChatError::UnknownSearchService`] for a choice not in the catalog
    /// - [`ChatError::NoSearchService`] when nothing was discovered
    pub fn resolve(&self, choice: Option<&str>) -> ChatResult<&SearchServiceInfo> {
        match choice {
            Some(name) => self
                .get(name)
                .ok_or_else(|| ChatError::UnknownSearchService(name.to_string())),
            None => self.default_service().ok_or(ChatError::NoSearchService),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(name: &str) -> SearchServiceInfo {
        SearchServiceInfo {
            name: name.into(),
            search_column: "CHUNK".into(),
        }
    }

    #[test]
    fn prefers_configured_default() {
        let c = ServiceCatalog::new(vec![svc("A"), svc("TEXT_SEARCH_SERVICE")], "TEXT_SEARCH_SERVICE");
        assert_eq!(c.default_service().unwrap().name, "TEXT_SEARCH_SERVICE");
    }

    #[test]
    fn falls_back_to_first() {
        let c = ServiceCatalog::new(vec![svc("A"), svc("B")], "TEXT_SEARCH_SERVICE");
        assert_eq!(c.resolve(None).unwrap().name, "A");
        assert_eq!(c.resolve(Some("b")).unwrap().name, "B");
    }

    #[test]
    fn empty_catalog_has_no_service() {
        let c = ServiceCatalog::new(Vec::new(), "TEXT_SEARCH_SERVICE");
        assert!(c.is_empty());
        assert!(matches!(c.resolve(None), Err(ChatError::NoSearchService)));
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let c = ServiceCatalog::new(vec![svc("A")], "A");
        assert!(matches!(
            c.resolve(Some("nope")),
            Err(ChatError::UnknownSearchService(n)) if n == "nope"
        ));
    }

    #[test]
    fn default_model_is_first() {
        assert_eq!(MODELS[0], "mistral-large");
    }
}
