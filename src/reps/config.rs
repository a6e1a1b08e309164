//! # Configuration
//!
//! Settings live in `config.json` inside the data directory. A missing file
//! means defaults. The value is loaded once at startup and handed by reference
//! to whatever needs it.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `max_deltas` | `20` | Undo window: how many committed changes can be undone |
//! | `min_prefix_len` | `3` | Shortest search prefix that matches anything |
//! | `top_k` | `10` | Items shown by `top`, `search` and `summary` |
//! | `log_level` | `warn` | Default tracing filter (`RUST_LOG` overrides it) |

use crate::error::{RepsError, Result};
use crate::logging::LogConfig;
use crate::store::fs_backend::{load_json, save_json};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.json";

const DEFAULT_MAX_DELTAS: usize = 20;
const DEFAULT_MIN_PREFIX_LEN: usize = crate::trie::DEFAULT_MIN_PREFIX_LEN;
const DEFAULT_TOP_K: usize = 10;
const DEFAULT_LOG_LEVEL: &str = "warn";

pub const KEYS: [&str; 4] = ["max_deltas", "min_prefix_len", "top_k", "log_level"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepsConfig {
    #[serde(default = "default_max_deltas")]
    pub max_deltas: usize,

    #[serde(default = "default_min_prefix_len")]
    pub min_prefix_len: usize,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_max_deltas() -> usize {
    DEFAULT_MAX_DELTAS
}

fn default_min_prefix_len() -> usize {
    DEFAULT_MIN_PREFIX_LEN
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for RepsConfig {
    fn default() -> Self {
        Self {
            max_deltas: DEFAULT_MAX_DELTAS,
            min_prefix_len: DEFAULT_MIN_PREFIX_LEN,
            top_k: DEFAULT_TOP_K,
            log_level: default_log_level(),
        }
    }
}

impl RepsConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_dir.as_ref().join(CONFIG_FILENAME);
        let config: Option<RepsConfig> = load_json(&path)?;
        Ok(config.unwrap_or_default())
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        save_json(self, &config_dir.as_ref().join(CONFIG_FILENAME))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "max_deltas" => Some(self.max_deltas.to_string()),
            "min_prefix_len" => Some(self.min_prefix_len.to_string()),
            "top_k" => Some(self.top_k.to_string()),
            "log_level" => Some(self.log_level.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "max_deltas" => self.max_deltas = parse_positive(key, value)?,
            "min_prefix_len" => self.min_prefix_len = parse_positive(key, value)?,
            "top_k" => self.top_k = parse_positive(key, value)?,
            "log_level" => {
                let level = value.trim();
                if level.is_empty() {
                    return Err(RepsError::Config("log_level cannot be empty".into()));
                }
                self.log_level = level.to_string();
            }
            _ => return Err(RepsError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }

    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            log_level: self.log_level.clone(),
        }
    }
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(RepsError::Config(format!(
            "{} must be a positive integer, got {:?}",
            key, value
        ))),
    }
}
