use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from `SHELFWISE_*` environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the per-user profile documents and the catalog
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Catalog document file name, relative to `data_dir`
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// User id used when none is given on the command line
    #[serde(default = "default_user")]
    pub default_user: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".moltbook")
        .join("personalization")
}

fn default_catalog_file() -> String {
    "catalog.json".to_string()
}

fn default_user() -> String {
    "anonymous".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            catalog_file: default_catalog_file(),
            default_user: default_user(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::prefixed("SHELFWISE_")
            .from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Full path of the catalog document
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }

    /// Address the HTTP surface binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = Config {
            data_dir: PathBuf::from("/tmp/shelf"),
            ..Config::default()
        };
        assert_eq!(config.catalog_path(), PathBuf::from("/tmp/shelf/catalog.json"));
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.default_user, "anonymous");
    }

    #[test]
    fn test_default_data_dir_subpath() {
        let dir = default_data_dir();
        assert!(dir.ends_with(".moltbook/personalization"));
    }
}
