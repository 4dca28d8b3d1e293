//! Configuration file loading for exifmap.
//!
//! Discovers and loads `exifmap.toml` from the working directory (or an explicit `--config`).
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use exifmap_domain::{ExtractOptions, TimestampPolicy};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "exifmap.toml";

/// Top-level configuration from exifmap.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExifmapConfig {
    pub extract: ExtractConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// How to treat a DateTimeOriginal tag that is present but malformed.
    pub timestamps: TimestampPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Print every primary-image tag before the report.
    pub dump_tags: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Discover the exifmap.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!(path = %config_path, "found config file");
        Some(config_path)
    } else {
        debug!(path = %config_path, "no config file found");
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<ExifmapConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<ExifmapConfig> {
    let config: ExifmapConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<ExifmapConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(ExifmapConfig::default()),
    }
}

/// Settings for one `show` run after applying CLI overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergedConfig {
    pub timestamps: TimestampPolicy,
    pub format: OutputFormat,
    pub dump_tags: bool,
}

impl MergedConfig {
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            timestamps: self.timestamps,
        }
    }
}

pub struct ConfigMerger {
    config: ExifmapConfig,
}

impl ConfigMerger {
    pub fn new(config: ExifmapConfig) -> Self {
        Self { config }
    }

    /// Merge with `show` arguments.
    ///
    /// Boolean flags can only switch a setting on; `--format` replaces the file's format.
    pub fn merge_show_args(
        self,
        cli_format: Option<OutputFormat>,
        cli_dump_tags: bool,
        cli_lenient_timestamps: bool,
    ) -> MergedConfig {
        let timestamps = if cli_lenient_timestamps {
            TimestampPolicy::Lenient
        } else {
            self.config.extract.timestamps
        };

        MergedConfig {
            timestamps,
            format: cli_format.unwrap_or(self.config.output.format),
            dump_tags: cli_dump_tags || self.config.output.dump_tags,
        }
    }
}
