use crate::engine::quantizer::ThresholdMode;
use crate::format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variable naming an alternate config file.
pub const CONFIG_ENV: &str = "WORD2BITS_CONFIG";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Threshold mode used when none is given on the command line
    #[serde(default)]
    pub threshold: ThresholdMode,
    /// Output format used when none is given on the command line
    #[serde(default)]
    pub format: OutputFormat,
    /// Whether to draw progress bars
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_show_progress() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: ThresholdMode::None,
            format: OutputFormat::Compressed,
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("word2bits.json"));

        if config_path.exists() {
            if let Ok(content) = fs::read_to_string(&config_path) {
                if let Ok(config) = serde_json::from_str(&content) {
                    return config;
                }
            }
        }

        Config::default()
    }
}
