// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub scripts: ScriptsConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Routes configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RoutesConfig {
    /// Path the dispatcher function is mounted on
    #[serde(default = "default_function_path")]
    pub function_path: String,
    /// Prefix for single-tender lookups, `{tender_path}/{reference}`
    #[serde(default = "default_tender_path")]
    pub tender_path: String,
    /// Health check configuration
    #[serde(default)]
    pub health: HealthConfig,
}

#[allow(clippy::missing_const_for_fn)]
fn default_function_path() -> String {
    "/api".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_tender_path() -> String {
    "/tender".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            function_path: default_function_path(),
            tender_path: default_tender_path(),
            health: HealthConfig::default(),
        }
    }
}

/// Health check configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HealthConfig {
    /// Enable health check endpoints
    #[serde(default = "default_health_enabled")]
    pub enabled: bool,
    /// Liveness probe path (default: /healthz)
    #[serde(default = "default_healthz_path")]
    pub liveness_path: String,
    /// Readiness probe path (default: /readyz)
    #[serde(default = "default_readyz_path")]
    pub readiness_path: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_health_enabled() -> bool {
    true
}

#[allow(clippy::missing_const_for_fn)]
fn default_healthz_path() -> String {
    "/healthz".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_readyz_path() -> String {
    "/readyz".to_string()
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: default_health_enabled(),
            liveness_path: default_healthz_path(),
            readiness_path: default_readyz_path(),
        }
    }
}

/// Dataset service configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatasetConfig {
    /// Base URL of the dataset row API
    #[serde(default = "default_dataset_base_url")]
    pub base_url: String,
    /// Optional bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
    /// Dataset config (subset) name
    #[serde(default = "default_dataset_config_name")]
    pub config_name: String,
    #[serde(default = "default_split")]
    pub split: String,
    /// Key used when the request carries no `dataset` parameter
    #[serde(default = "default_dataset_key")]
    pub default_dataset: String,
    #[serde(default = "default_limit")]
    pub default_limit: u64,
    /// Upper bound for `limit`; the row API refuses larger pages
    #[serde(default = "default_max_limit")]
    pub max_limit: u64,
    #[serde(default = "default_dataset_timeout")]
    pub timeout_secs: u64,
    /// Extra or overriding key -> dataset id entries
    #[serde(default)]
    pub datasets: HashMap<String, String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_dataset_base_url() -> String {
    "https://datasets-server.huggingface.co".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_dataset_config_name() -> String {
    "default".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_split() -> String {
    "train".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_dataset_key() -> String {
    "open-tenders".to_string()
}

const fn default_limit() -> u64 {
    100
}

const fn default_max_limit() -> u64 {
    100
}

const fn default_dataset_timeout() -> u64 {
    30
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_url: default_dataset_base_url(),
            token: None,
            config_name: default_dataset_config_name(),
            split: default_split(),
            default_dataset: default_dataset_key(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            timeout_secs: default_dataset_timeout(),
            datasets: HashMap::new(),
        }
    }
}

/// External script configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScriptsConfig {
    /// Program used to run the scripts (e.g. `python3`); `None` runs them directly
    #[serde(default = "default_interpreter")]
    pub interpreter: Option<String>,
    /// Working directory for spawned scripts
    #[serde(default)]
    pub working_dir: Option<String>,
    /// Seconds before a script is killed; 0 disables the limit
    #[serde(default)]
    pub timeout_secs: u64,
    #[serde(default = "default_price_script")]
    pub predict_price: String,
    #[serde(default = "default_supplier_script")]
    pub match_suppliers: String,
    #[serde(default = "default_scraper_script")]
    pub scrape_tenders: String,
}

#[allow(clippy::unnecessary_wraps)]
fn default_interpreter() -> Option<String> {
    Some("python3".to_string())
}

#[allow(clippy::missing_const_for_fn)]
fn default_price_script() -> String {
    "scripts/price_analysis.py".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_supplier_script() -> String {
    "scripts/supplier_matching.py".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_scraper_script() -> String {
    "scripts/tender_scraper.py".to_string()
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            working_dir: None,
            timeout_secs: 0,
            predict_price: default_price_script(),
            match_suppliers: default_supplier_script(),
            scrape_tenders: default_scraper_script(),
        }
    }
}
