use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::order::OrderServiceConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] Box<figment::Error>),
}

const CONFIG_FILE_VAR: &str = "DRAFT_ORDERS_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "draft_orders.toml";

/// Environment variables taken verbatim as strings. Ids such as `12345` or
/// `007` must not be parsed into numbers.
const STRING_ENV_KEYS: &[&str] = &[
    "SEED_BUYER_ORG_ID",
    "SEED_PRODUCT_IDS",
    "DATABASE_URL",
    "HTTP_HOST",
];

/// Numeric environment variables, matched case-insensitively to the fields below
const ENV_KEYS: &[&str] = &["DATABASE_MAX_CONNECTIONS", "HTTP_PORT"];

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Default buyer organization for new draft orders
    pub seed_buyer_org_id: Option<String>,

    /// Comma-separated products to preload into the in-memory store
    pub seed_product_ids: Option<String>,

    /// PostgreSQL connection string; the in-memory store is used without one
    pub database_url: Option<String>,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_http_host")]
    pub http_host: String,

    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

fn default_max_connections() -> u32 {
    5
}

fn default_http_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

impl AppConfig {
    /// Load from the optional TOML file, overridden by environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_FILE_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Self::from_figment(Self::figment(&path))
    }

    /// Sources in priority order: environment, then the TOML file at `path`
    pub fn figment(path: &str) -> Figment {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::raw().only(ENV_KEYS));

        STRING_ENV_KEYS.iter().fold(figment, |figment, key| {
            match std::env::var(key) {
                Ok(value) => {
                    figment.merge(Serialized::default(&key.to_ascii_lowercase(), value))
                }
                Err(_) => figment,
            }
        })
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    pub fn seed_product_ids(&self) -> Vec<&str> {
        self.seed_product_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn order_service_config(&self) -> OrderServiceConfig {
        OrderServiceConfig {
            default_buyer_organization_id: self.seed_buyer_org_id.clone(),
        }
    }
}
