use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::common::error::Result;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub reviews: ReviewsConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsConfig {
    /// Reviews shown per page in the listing view.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_database_path() -> String {
    "courseboard.db".to_string()
}

fn default_page_size() -> usize {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to
    /// defaults when the file is absent.
    pub fn load() -> Result<Self> {
        if !Path::new(CONFIG_PATH).exists() {
            return Ok(Config::default());
        }
        let config_content = fs::read_to_string(CONFIG_PATH)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_listing_view() {
        let config = Config::default();
        assert_eq!(config.reviews.page_size, 5);
        assert_eq!(config.database.path, "courseboard.db");
    }

    #[test]
    fn partial_config_keeps_defaults_for_the_rest() {
        let config: Config = toml::from_str("[reviews]\npage_size = 10\n").unwrap();
        assert_eq!(config.reviews.page_size, 10);
        assert_eq!(config.database.path, "courseboard.db");
    }
}
