use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnvironment { var: &'static str, value: String },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    /// Keep HTTP client internals (reqwest/hyper) at the configured level
    #[serde(default)]
    pub verbose_http: bool,
    pub gateway: GatewayConfig,
    pub appwrite: AppwriteConfig,
    #[serde(default)]
    pub plaid: PlaidConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppwriteConfig {
    /// e.g. `https://cloud.appwrite.io/v1`
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub user_collection_id: String,
    pub bank_collection_id: String,
    pub transaction_collection_id: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PlaidConfig {
    #[serde(default)]
    pub env: PlaidEnvironment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlaidEnvironment {
    #[default]
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            PlaidEnvironment::Sandbox => "https://sandbox.plaid.com",
            PlaidEnvironment::Development => "https://development.plaid.com",
            PlaidEnvironment::Production => "https://production.plaid.com",
        }
    }
}

/// Dwolla environment selector (`DWOLLA_ENV`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwollaEnvironment {
    Sandbox,
    Production,
}

impl DwollaEnvironment {
    pub fn base_url(self) -> &'static str {
        match self {
            DwollaEnvironment::Sandbox => "https://api-sandbox.dwolla.com",
            DwollaEnvironment::Production => "https://api.dwolla.com",
        }
    }
}

impl fmt::Display for DwollaEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DwollaEnvironment::Sandbox => write!(f, "sandbox"),
            DwollaEnvironment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for DwollaEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sandbox" => Ok(DwollaEnvironment::Sandbox),
            "production" => Ok(DwollaEnvironment::Production),
            _ => Err(ConfigError::InvalidEnvironment {
                var: "DWOLLA_ENV",
                value: s.to_string(),
            }),
        }
    }
}

/// Credentials for the external services. Never read from YAML.
#[derive(Clone)]
pub struct Secrets {
    pub appwrite_key: String,
    pub plaid_client_id: String,
    pub plaid_secret: String,
    pub dwolla_env: DwollaEnvironment,
    pub dwolla_key: String,
    pub dwolla_secret: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("dwolla_env", &self.dwolla_env)
            .finish_non_exhaustive()
    }
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        Ok(Self {
            appwrite_key: require("APPWRITE_KEY")?,
            plaid_client_id: require("PLAID_CLIENT_ID")?,
            plaid_secret: require("PLAID_SECRET")?,
            dwolla_env: require("DWOLLA_ENV")?.parse()?,
            dwolla_key: require("DWOLLA_KEY")?,
            dwolla_secret: require("DWOLLA_SECRET")?,
        })
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}
