use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local configuration file name
pub const CONFIG_FILE_NAME: &str = "release-lit.toml";

/// Represents the complete configuration for release-lit.
///
/// Contains the changelog location, project type, release naming and
/// behavior options. Every key is optional.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Changelog path, relative to the repository root unless absolute
    #[serde(default = "default_changelog")]
    pub changelog: String,

    /// One of `node`, `python`, `go`
    #[serde(default = "default_project_type")]
    pub project_type: String,

    #[serde(default)]
    pub release: ReleaseConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_project_type() -> String {
    "node".to_string()
}

fn default_commit_message() -> String {
    "chore(release): v{version}".to_string()
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

fn default_author_name() -> String {
    "release-lit-bot".to_string()
}

fn default_author_email() -> String {
    "bot@release-lit".to_string()
}

/// Naming and identity of the release commit and tag.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    #[serde(default = "default_tag_pattern")]
    pub tag_pattern: String,

    #[serde(default = "default_author_name")]
    pub author_name: String,

    #[serde(default = "default_author_email")]
    pub author_email: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            commit_message: default_commit_message(),
            tag_pattern: default_tag_pattern(),
            author_name: default_author_name(),
            author_email: default_author_email(),
        }
    }
}

impl ReleaseConfig {
    /// Pattern used to name the release commit
    pub fn commit_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.commit_message)
    }

    /// Pattern used to name the release tag
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(&self.tag_pattern)
    }
}

/// Configuration for behavior customization.
///
/// Controls runtime behavior without affecting version analysis.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    /// Release the unchanged version when no commit warrants a bump
    #[serde(default)]
    pub allow_empty_release: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            changelog: default_changelog(),
            project_type: default_project_type(),
            release: ReleaseConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Config {
    /// Check that naming patterns are usable
    pub fn validate(&self) -> Result<()> {
        self.release.commit_pattern()?;
        self.release.tag_pattern()?;
        Ok(())
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| ReleaseError::config(format!("Invalid TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}

fn read(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    parse_config(&text)
}

/// Global configuration file location (`<config dir>/.release-lit.toml`)
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-lit.toml` in current directory
/// 3. `.release-lit.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed, or an explicit
///   path does not exist
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    if let Some(path) = config_path {
        return read(Path::new(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return read(&local);
    }

    match global_config_path() {
        Some(global) if global.exists() => read(&global),
        _ => Ok(Config::default()),
    }
}
