//! Configuration loading and parsing
//!
//! Every section is optional; command-line flags take precedence over values
//! read from the file.

use anyhow::{Context, Result};
use pdu_metadata::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the generated JSON artifact
pub const DEFAULT_OUTPUT_FILE: &str = "pdu_signal_metadata.json";

/// Default name of the diagnostic log
pub const DEFAULT_LOG_FILE: &str = "debug_log.txt";

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    #[serde(default)]
    pub extraction: ExtractorConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InputConfig {
    /// Service-definition ARXML (SOME/IP deployments)
    pub service: Option<PathBuf>,
    /// RBS ARXML (I-SIGNALs and I-SIGNAL-I-PDUs)
    pub rbs: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_file")]
    pub file: PathBuf,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: default_output_file(),
            pretty: default_pretty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DiagnosticsConfig {
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
        }
    }
}

fn default_output_file() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_FILE)
}

fn default_pretty() -> bool {
    true
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Append `.json` unless the file name already ends with it
pub fn json_output_path(path: &Path) -> PathBuf {
    let already_json = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.ends_with(".json"));

    if already_json {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".json");
        PathBuf::from(name)
    }
}
