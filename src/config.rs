use serde::Deserialize;
use std::path::PathBuf;

use crate::models::Catalog;
use crate::services::{RecommendOptions, DEFAULT_TOP_K, DEFAULT_TOP_N};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding one JSON profile per user
    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: PathBuf,

    /// Optional JSON catalog; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Titles returned per recommendation run
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Genres listed per explanation
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("profiles")
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            profiles_dir: default_profiles_dir(),
            catalog_path: None,
            top_n: default_top_n(),
            top_k: default_top_k(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn recommend_options(&self) -> RecommendOptions {
        RecommendOptions {
            top_n: self.top_n,
            top_k: self.top_k,
        }
    }

    /// Loads the configured catalog, falling back to the built-in one
    pub fn load_catalog(&self) -> anyhow::Result<Catalog> {
        match &self.catalog_path {
            Some(path) => Catalog::from_json_file(path).map_err(|e| {
                anyhow::anyhow!("Failed to load catalog from {}: {}", path.display(), e)
            }),
            None => Ok(Catalog::builtin()),
        }
    }
}
