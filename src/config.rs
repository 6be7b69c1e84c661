use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;
use crate::fetch::DEFAULT_PAGE_SIZE;

pub const DEFAULT_ENDPOINT: &str = "https://app.fossa.io";
pub const DEFAULT_REPORT_TYPE: &str = "licenses";

/// Optional settings file, deserialized from `.revision-report/config.toml`.
///
/// Every key may be omitted; command-line flags and environment variables
/// take precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub report_type: Option<String>,
    pub page_size: Option<usize>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Kept as given so an unrecognized value can be reported by name.
    pub report_type: String,
    pub page_size: usize,
}

/// Load the settings file, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `<cwd>/.revision-report/config.toml`
/// 3. `~/.config/revision-report/config.toml`
/// 4. Empty [`FileConfig::default`]
pub fn load_config(cwd: &Path, config_override: Option<&Path>) -> Result<FileConfig> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = cwd.join(".revision-report").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("revision-report")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(FileConfig::default())
}

fn read_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("could not parse config file {}", path.display()))
}

/// Merge flags (which already include environment variables) over the file.
pub fn resolve(cli: &Cli, file: FileConfig) -> Settings {
    Settings {
        endpoint: cli
            .endpoint
            .clone()
            .or(file.endpoint)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        api_key: cli.api_key.clone().or(file.api_key),
        report_type: cli
            .report_type
            .clone()
            .or(file.report_type)
            .unwrap_or_else(|| DEFAULT_REPORT_TYPE.to_string()),
        page_size: cli.page_size.or(file.page_size).unwrap_or(DEFAULT_PAGE_SIZE),
    }
}
