use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Simple configuration for shelf
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub listing: ListingConfig,

    #[serde(default)]
    pub cart: CartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Resend the submitted filters when moving between pages
    #[serde(default = "default_keep_filters")]
    pub keep_filters_on_page_change: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartConfig {
    /// Cart file location; the platform data directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            keep_filters_on_page_change: default_keep_filters(),
        }
    }
}

fn default_base_url() -> String {
    "https://strapi-store-server.onrender.com/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("shelf/{}", env!("CARGO_PKG_VERSION"))
}

fn default_keep_filters() -> bool {
    true
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load config from `path`, writing the defaults there if it does not exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "shelf", "shelf") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.shelf/config.toml")
        }
    }
}
