use crate::domain::prerelease::DEFAULT_PATTERN;
use crate::domain::trigger::{DEFAULT_MAJOR_TRIGGER, DEFAULT_MINOR_TRIGGER, DEFAULT_PATCH_TRIGGER};
use crate::error::{Result, SemtagError};
use crate::metadata::DEFAULT_PROVIDERS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "semtag.toml";

/// Represents the complete configuration for git-semtag.
///
/// Contains the bump triggers, prerelease patterns, metadata providers and
/// changelog formats. Every section is optional.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub triggers: TriggersConfig,

    #[serde(default)]
    pub prerelease: PrereleaseConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

fn default_major_trigger() -> String {
    DEFAULT_MAJOR_TRIGGER.to_string()
}

fn default_minor_trigger() -> String {
    DEFAULT_MINOR_TRIGGER.to_string()
}

fn default_patch_trigger() -> String {
    DEFAULT_PATCH_TRIGGER.to_string()
}

/// Trigger expressions deciding which commits bump which component.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TriggersConfig {
    #[serde(default = "default_major_trigger")]
    pub major: String,

    #[serde(default = "default_minor_trigger")]
    pub minor: String,

    #[serde(default = "default_patch_trigger")]
    pub patch: String,
}

impl Default for TriggersConfig {
    fn default() -> Self {
        TriggersConfig {
            major: default_major_trigger(),
            minor: default_minor_trigger(),
            patch: default_patch_trigger(),
        }
    }
}

fn default_prerelease_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

/// Prerelease identifier patterns.
///
/// `old_pattern` reads the previous prerelease when the pattern changes;
/// it defaults to `pattern`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PrereleaseConfig {
    #[serde(default = "default_prerelease_pattern")]
    pub pattern: String,

    #[serde(default)]
    pub old_pattern: Option<String>,
}

impl Default for PrereleaseConfig {
    fn default() -> Self {
        PrereleaseConfig {
            pattern: default_prerelease_pattern(),
            old_pattern: None,
        }
    }
}

fn default_providers() -> Vec<String> {
    DEFAULT_PROVIDERS.split(',').map(str::to_string).collect()
}

/// Build metadata settings.
///
/// An empty provider list disables metadata just like `exclude = true`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetadataConfig {
    #[serde(default = "default_providers")]
    pub providers: Vec<String>,

    #[serde(default)]
    pub exclude: bool,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            providers: default_providers(),
            exclude: false,
        }
    }
}

/// Changelog format overrides.
///
/// Unset formats come from the plain preset, or the Markdown preset when
/// `markdown = true`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ChangelogConfig {
    #[serde(default)]
    pub markdown: bool,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, rename = "type")]
    pub r#type: Option<String>,

    #[serde(default)]
    pub scope: Option<String>,

    #[serde(default)]
    pub list: Option<String>,

    #[serde(default)]
    pub item: Option<String>,
}

fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `semtag.toml` in current directory
/// 3. `.semtag.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let Some(path) = find_config_file(config_path) else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        SemtagError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;

    let config: Config = toml::from_str(&config_str).map_err(|e| {
        SemtagError::config(format!("Invalid configuration in '{}': {}", path.display(), e))
    })?;

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
