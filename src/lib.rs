pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod product;
pub mod render;
pub mod routes;
pub mod search;
pub mod session;

// Re-export commonly used types for convenience
pub use config::StorefrontConfig;
pub use error::{ApiError, AuthFailure, StorageError};
pub use models::{AttributeValue, Product, ProductId};
pub use routes::Route;

use api::HttpApi;
use search::{SearchController, SearchHandle, SearchSettings};
use session::{FileStorage, Session};
use std::sync::Arc;

/// Main builder wiring configuration, the HTTP collaborators and the session
pub struct Storefront {
    config: StorefrontConfig,
}

impl Storefront {
    /// Create a builder for the given API base URL
    pub fn new(api_base_url: &str) -> Self {
        Self {
            config: StorefrontConfig::new(api_base_url),
        }
    }

    /// Start from an existing configuration
    pub fn with_config(mut self, config: StorefrontConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = StorefrontConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    pub fn with_api_base_url(mut self, api_base_url: &str) -> Self {
        self.config.api_base_url = api_base_url.to_string();
        self
    }

    /// Set the debounce interval in milliseconds
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.config.debounce_ms = debounce_ms;
        self
    }

    /// Set the result-count hint sent with every search
    pub fn with_result_count(mut self, result_count: u32) -> Self {
        self.config.result_count = result_count;
        self
    }

    /// Set the per-request timeout in seconds
    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = timeout_seconds;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.session_file = path.into();
        self
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Build the HTTP client for the configured services
    pub fn api(&self) -> Result<HttpApi, Box<dyn std::error::Error>> {
        self.config.validate()?;
        Ok(HttpApi::new(&self.config)?)
    }

    /// Open the persisted session
    pub fn session(&self) -> Session<FileStorage> {
        Session::new(FileStorage::new(self.config.session_file.clone()))
    }

    /// Mount a search view backed by the HTTP search endpoint
    pub fn search(&self) -> Result<SearchHandle, Box<dyn std::error::Error>> {
        let api = Arc::new(self.api()?);
        Ok(SearchController::spawn(
            api,
            SearchSettings::from_config(&self.config),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let storefront = Storefront::new("http://shop.test")
            .with_debounce_ms(200)
            .with_result_count(25)
            .with_request_timeout(4)
            .with_session_file("s.json");

        let config = storefront.config();
        assert_eq!(config.api_base_url, "http://shop.test");
        assert_eq!(config.debounce_ms, 200);
        assert_eq!(config.result_count, 25);
        assert_eq!(config.request_timeout_secs, 4);
        assert_eq!(config.session_file, std::path::PathBuf::from("s.json"));
    }

    #[test]
    fn test_config_str_replaces_settings() {
        let storefront = Storefront::new("http://ignored.test")
            .with_config_str(r#"{"api_base_url": "http://shop.test", "debounce_ms": 300}"#)
            .unwrap();
        assert_eq!(storefront.config().api_base_url, "http://shop.test");
        assert_eq!(storefront.config().debounce_ms, 300);
    }

    #[test]
    fn test_invalid_base_url_fails_to_build_api() {
        assert!(Storefront::new("nope").api().is_err());
    }
}
