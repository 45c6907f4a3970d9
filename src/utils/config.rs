use std::env;

use crate::services::basket_store::DEFAULT_BASKET_KEY;

pub const DEFAULT_STORE_PATH: &str = ".basket-store.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_path: String,
    pub storage_key: String,
    pub log_level: String,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let config = Config {
            store_path: env::var("BASKET_STORE_PATH")
                .unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string()),
            storage_key: env::var("BASKET_STORAGE_KEY")
                .unwrap_or_else(|_| DEFAULT_BASKET_KEY.to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// `--store` on the command line wins over the environment.
    pub fn with_store_path(mut self, path: Option<String>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            self.store_path = path;
            self.validate()?;
        }
        Ok(self)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        if self.store_path.trim().is_empty() {
            return Err(anyhow::anyhow!("BASKET_STORE_PATH must not be empty"));
        }

        if self.storage_key.trim().is_empty() {
            return Err(anyhow::anyhow!("BASKET_STORAGE_KEY must not be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            store_path: DEFAULT_STORE_PATH.to_string(),
            storage_key: DEFAULT_BASKET_KEY.to_string(),
            log_level: "info".to_string(),
            environment: "development".to_string(),
        }
    }

    #[test]
    fn test_store_override() {
        let config = config().with_store_path(Some("/tmp/other.json".to_string())).unwrap();
        assert_eq!(config.store_path, "/tmp/other.json");
    }

    #[test]
    fn test_empty_store_path_rejected() {
        assert!(config().with_store_path(Some("  ".to_string())).is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        let mut config = config();
        config.storage_key = String::new();
        assert!(config.validate().is_err());
    }
}
