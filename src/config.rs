use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "STOREFRONT_API_URL";

/// Configuration for the storefront client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Base URL of the product and auth services
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Path of the product search endpoint (POST)
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Path prefix of the product detail endpoint (GET `{product_path}/{id}`)
    #[serde(default = "default_product_path")]
    pub product_path: String,

    /// Path of the login endpoint (POST)
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Path of the registration endpoint (POST)
    #[serde(default = "default_register_path")]
    pub register_path: String,

    /// Quiet period after the last query change before a search is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Result-count hint sent with every search
    #[serde(default = "default_result_count")]
    pub result_count: u32,

    /// Upper bound on a single network call
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// File backing the persisted session slots
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            search_path: default_search_path(),
            product_path: default_product_path(),
            login_path: default_login_path(),
            register_path: default_register_path(),
            debounce_ms: default_debounce_ms(),
            result_count: default_result_count(),
            request_timeout_secs: default_request_timeout_secs(),
            session_file: default_session_file(),
        }
    }
}

impl StorefrontConfig {
    /// Create a configuration pointing at the given API base URL
    pub fn new(api_base_url: &str) -> Self {
        Self {
            api_base_url: api_base_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply the `STOREFRONT_API_URL` override if it is set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(api_url) = std::env::var(API_URL_ENV) {
            if !api_url.trim().is_empty() {
                ::log::debug!("Using API base URL from {}: {}", API_URL_ENV, api_url);
                self.api_base_url = api_url;
            }
        }
        self
    }

    /// Check that the base URL parses and the numeric settings are usable
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        Url::parse(&self.api_base_url)?;
        if self.result_count == 0 {
            return Err("result_count must be at least 1".into());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be at least 1".into());
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Default value for api_base_url
fn default_api_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_search_path() -> String {
    "/products/search".to_string()
}

fn default_product_path() -> String {
    "/products".to_string()
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_register_path() -> String {
    "/auth/register".to_string()
}

/// Default debounce interval in milliseconds
fn default_debounce_ms() -> u64 {
    500
}

/// Default number of results requested per search
fn default_result_count() -> u32 {
    10
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_session_file() -> PathBuf {
    PathBuf::from("storefront_session.json")
}
