use crate::media::VideoContainer;
use crate::record::DEFAULT_RECORD_PATH;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "SEEDKEEPER";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub root_directory: PathBuf,
    pub extensions: Vec<VideoContainer>,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    pub remote_base_url: String,
    pub remote_api_key: String,
    /// Entries to replace this run. Zero only saves the scan result.
    pub batch_size: usize,
    /// Skip the per-file confirmation prompt.
    pub unattended: bool,
    pub record_path: PathBuf,
    pub request_timeout_secs: u64,
    pub rescan_delay_secs: u64,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root_directory: Option<PathBuf>,
    pub batch_size: Option<usize>,
    pub unattended: Option<bool>,
    pub record_path: Option<PathBuf>,
}

/// Layered load: built-in defaults, then an optional `Config` file, then
/// `SEEDKEEPER_*` environment variables, then `overrides`. The result is
/// validated for a scan run.
pub fn load_configuration(overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let config = load_unchecked(overrides)?;
    config.validate()?;
    Ok(config)
}

/// Same layering as [`load_configuration`] without the run checks, for
/// inspecting an incomplete setup.
pub fn load_unchecked(overrides: &Overrides) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .set_default("root_directory", "")?
        .set_default("extensions", vec!["mkv", "mp4"])?
        .set_default("ignore_patterns", Vec::<String>::new())?
        .set_default("remote_base_url", "http://localhost:7878")?
        .set_default("remote_api_key", "")?
        .set_default("batch_size", 0_i64)?
        .set_default("unattended", false)?
        .set_default("record_path", DEFAULT_RECORD_PATH)?
        .set_default("request_timeout_secs", 30_i64)?
        .set_default("rescan_delay_secs", 5_i64)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("extensions")
                .with_list_parse_key("ignore_patterns"),
        )
        // try_parsing would turn an all-digit key into a number
        .set_override_option("remote_api_key", env_string("REMOTE_API_KEY"))?
        .set_override_option(
            "root_directory",
            overrides
                .root_directory
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        )?
        .set_override_option("batch_size", overrides.batch_size.map(|n| n as i64))?
        .set_override_option("unattended", overrides.unattended)?
        .set_override_option(
            "record_path",
            overrides
                .record_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        )?
        .build()?;

    builder.try_deserialize::<AppConfig>()
}

fn env_string(key: &str) -> Option<String> {
    env::var(format!("{}_{}", ENV_PREFIX, key)).ok()
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root_directory.as_os_str().is_empty() {
            return Err(ConfigError::Message(
                "no target directory given and root_directory is not configured".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Message(
                "extensions must name at least one video container".to_string(),
            ));
        }
        if self.batch_size > 0 && self.remote_api_key.is_empty() {
            return Err(ConfigError::Message(
                "remote_api_key is required when replacing files".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy safe to print or log.
    pub fn redacted(&self) -> AppConfig {
        let mut copy = self.clone();
        if !copy.remote_api_key.is_empty() {
            copy.remote_api_key = "********".to_string();
        }
        copy
    }
}
