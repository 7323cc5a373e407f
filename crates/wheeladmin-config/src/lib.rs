//! Configuration management for wheeladmin
//!
//! This module handles loading, validation, and management of
//! console configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use error::{ConfigError, ConfigResult};

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Basic authentication (optional)
    #[serde(default)]
    pub auth: Option<AuthConfig>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9002
}

/// Basic authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// REST backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the rental platform API, without trailing slash
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Resource paths, relative to `base_url`
    #[serde(default)]
    pub endpoints: EndpointsConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            endpoints: EndpointsConfig::default(),
        }
    }
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Backend resource paths. `{id}` is replaced with the record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub users: String,
    pub update_kyc: String,
    pub transactions: String,
    pub rentals: String,
    pub wheelchairs: String,
    pub create_wheelchair: String,
    pub update_wheelchair: String,
    pub delete_wheelchair: String,
    pub categories: String,
    pub create_category: String,
    pub update_category: String,
    pub delete_category: String,
    pub cities: String,
    pub create_city: String,
    pub update_city_status: String,
    pub dashboard_summary: String,
    pub monthly_orders: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            users: "/admin/api/dashboardUsers".to_string(),
            update_kyc: "/admin/api/updateKyc/{id}".to_string(),
            transactions: "/admin/api/getTransaction".to_string(),
            rentals: "/admin/rent/allOrders".to_string(),
            wheelchairs: "/admin/wheelchair/allWheelchairs".to_string(),
            create_wheelchair: "/admin/wheelchair/addWheelchair".to_string(),
            update_wheelchair: "/admin/wheelchair/updateWheelchair/{id}".to_string(),
            delete_wheelchair: "/api/deleteWheelchair/{id}".to_string(),
            categories: "/admin/category/allCategories".to_string(),
            create_category: "/admin/category/addCategory".to_string(),
            update_category: "/admin/category/updateCategory/{id}".to_string(),
            delete_category: "/admin/category/deleteCategory/{id}".to_string(),
            cities: "/admin/city/allCities".to_string(),
            create_city: "/admin/city/addCity".to_string(),
            update_city_status: "/admin/city/updateStatus/{id}".to_string(),
            dashboard_summary: "/admin/api/getDashboardSummary".to_string(),
            monthly_orders: "/admin/api/getMonthlyRentalOrderCount".to_string(),
        }
    }
}

impl EndpointsConfig {
    /// Substitute a record id into a path template
    pub fn with_id(template: &str, id: &str) -> String {
        template.replace("{id}", id)
    }
}

/// Generative model configuration for anomaly analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the model-serving API
    #[serde(default = "default_model_endpoint")]
    pub endpoint: String,
    /// Model identifier
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Sampling temperature
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: default_model_endpoint(),
            name: default_model_name(),
            api_key_env: default_api_key_env(),
            temperature: None,
        }
    }
}

fn default_model_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model_name() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

impl ModelConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok().filter(|k| !k.is_empty())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Records per page for tables
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            records_per_page: default_records_per_page(),
        }
    }
}

fn default_records_per_page() -> usize {
    10
}

/// Branding shown in the sidebar and page titles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Currency label for rental amounts
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            currency: default_currency(),
        }
    }
}

fn default_app_name() -> String {
    "Flying Monk".to_string()
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// REST backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Anomaly model settings
    #[serde(default)]
    pub model: ModelConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Branding
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: PathBuf) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ConfigError::IoError
            }
        })?;

        let config = Self::from_yaml(&content)?;
        Ok(config)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content).map_err(|_| ConfigError::InvalidYaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.pagination.records_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.records_per_page".to_string(),
                reason: "Records per page must be greater than 0".to_string(),
            });
        }

        if !self.backend.base_url.starts_with("http://") && !self.backend.base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                field: "backend.base_url".to_string(),
                reason: "Backend URL must start with http:// or https://".to_string(),
            });
        }

        if self.backend.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.timeout_secs".to_string(),
                reason: "Timeout must be at least 1 second".to_string(),
            });
        }

        if let Some(ref auth) = self.server.auth {
            if auth.username.is_empty() {
                return Err(ConfigError::MissingField {
                    field: "server.auth.username".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full URL for a backend path
    pub fn backend_url(&self, path: &str) -> String {
        format!("{}{}", self.backend.base_url.trim_end_matches('/'), path)
    }
}

// ==================== Tests ====================
