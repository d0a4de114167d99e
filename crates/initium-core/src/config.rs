use std::path::PathBuf;

use crate::store::DEFAULT_RETENTION_LIMIT;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding `websites.json` and `pageviews.json`.
    pub data_dir: PathBuf,
    /// Advertise `https://` in the served tracking script even when the
    /// request itself came in over plain HTTP (TLS terminated upstream).
    pub https: bool,
    pub retention_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source. `lookup` returns `None` for
    /// unset variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        Ok(Self {
            port: lookup("PORT")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .map_err(|e| format!("invalid port: {e}"))?,
            data_dir: lookup("INITIUM_DATA_DIR")
                .unwrap_or_else(|| "./data".to_string())
                .into(),
            https: lookup("INITIUM_HTTPS").is_some_and(|v| v == "true"),
            retention_limit: lookup("INITIUM_RETENTION_LIMIT")
                .and_then(|v| v.parse().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(DEFAULT_RETENTION_LIMIT),
        })
    }

    pub fn pageviews_path(&self) -> PathBuf {
        self.data_dir.join("pageviews.json")
    }

    pub fn websites_path(&self) -> PathBuf {
        self.data_dir.join("websites.json")
    }
}
