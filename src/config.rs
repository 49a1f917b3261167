use std::path::PathBuf;

use anyhow::{bail, Context};

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub host: String,
    pub port: u16,
    pub store_path: PathBuf,
    pub upload_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY").context("API_KEY must be set")?;
        if api_key.trim().is_empty() {
            bail!("API_KEY must not be empty");
        }

        Ok(Self {
            api_key,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            store_path: lookup("PRODUCT_STORE_PATH")
                .unwrap_or_else(|| "product.json".to_string())
                .into(),
            upload_dir: lookup("UPLOAD_DIR")
                .unwrap_or_else(|| "Upload_picture".to_string())
                .into(),
        })
    }
}
