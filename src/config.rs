//! Configuration management
//!
//! Handles loading, parsing, and validating the optional TOML configuration file.
//! A missing file is not an error: every setting has a default, so the tool
//! works straight from a keyboard shortcut with no setup.

use color_eyre::eyre::{self, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::state::FileStateStore;

// ============================================================================
// Public Configuration Types
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub settings: Settings,
    pub groups: Vec<GroupConfig>,
}

/// Global settings
#[derive(Debug, Clone)]
pub struct Settings {
    /// Notify on every run, as if `--notify` was passed
    pub notify: bool,
    pub notify_timeout_ms: u32,
    pub log_level: String,
    /// Control tool binary
    pub pacmd: String,
    /// Override for the group rotation scratch file
    pub state_file: Option<PathBuf>,
}

/// Named rotation group
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub name: String,
    /// Sink name substrings, in rotation order
    pub members: Vec<String>,
}

// ============================================================================
// Config File Deserialization (TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    settings: SettingsFile,
    #[serde(default)]
    groups: Vec<GroupConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    #[serde(default)]
    notify: bool,
    #[serde(default = "default_notify_timeout_ms")]
    notify_timeout_ms: u32,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_pacmd")]
    pacmd: String,
    #[serde(default)]
    state_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GroupConfigFile {
    name: String,
    members: Vec<String>,
}

fn default_notify_timeout_ms() -> u32 {
    3000
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_pacmd() -> String {
    "pacmd".to_string()
}

impl Default for SettingsFile {
    fn default() -> Self {
        Self {
            notify: false,
            notify_timeout_ms: default_notify_timeout_ms(),
            log_level: default_log_level(),
            pacmd: default_pacmd(),
            state_file: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        SettingsFile::default().into()
    }
}

impl From<SettingsFile> for Settings {
    fn from(s: SettingsFile) -> Self {
        Self {
            notify: s.notify,
            notify_timeout_ms: s.notify_timeout_ms,
            log_level: s.log_level,
            pacmd: s.pacmd,
            state_file: s.state_file,
        }
    }
}

// ============================================================================
// Config Implementation
// ============================================================================

impl Config {
    /// Load configuration from the default XDG config path
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load() -> Result<Self> {
        match Self::get_config_path() {
            Some(path) => Self::load_from_path(&path),
            None => {
                debug!("Could not determine config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path (missing file → defaults)
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, parsed or validated.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&contents).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parse and validate TOML contents
    ///
    /// # Errors
    /// Returns an error if the TOML is malformed or fails validation.
    pub fn parse(contents: &str) -> Result<Self> {
        let config_file: ConfigFile =
            toml::from_str(contents).context("Failed to parse config TOML")?;
        Self::from_config_file(config_file)
    }

    fn from_config_file(config_file: ConfigFile) -> Result<Self> {
        let groups = config_file
            .groups
            .into_iter()
            .map(|g| GroupConfig {
                name: g.name,
                members: g.members,
            })
            .collect();

        let config = Config {
            settings: config_file.settings.into(),
            groups,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        match self.settings.log_level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            level => eyre::bail!(
                "Invalid log_level '{level}'. Must be: error, warn, info, debug, or trace"
            ),
        }

        if self.settings.pacmd.trim().is_empty() {
            eyre::bail!("'pacmd' must name the control tool binary");
        }

        let mut seen = HashSet::with_capacity(self.groups.len());
        for (i, group) in self.groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                eyre::bail!("Group {} has an empty name", i + 1);
            }
            if !seen.insert(group.name.as_str()) {
                eyre::bail!("Duplicate group name: '{}'", group.name);
            }
            if group.members.is_empty() {
                eyre::bail!("Group '{}' has no members", group.name);
            }
            if group.members.iter().any(String::is_empty) {
                eyre::bail!("Group '{}' has an empty member name", group.name);
            }
        }

        Ok(())
    }

    /// Get the XDG config path for PASW (`None` if there is no config directory)
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("pasw").join("config.toml"))
    }

    /// Find a configured rotation group by name
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Resolved path of the group rotation scratch file
    #[must_use]
    pub fn state_file(&self) -> PathBuf {
        self.settings
            .state_file
            .clone()
            .unwrap_or_else(FileStateStore::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(!config.settings.notify);
        assert_eq!(config.settings.notify_timeout_ms, 3000);
        assert_eq!(config.settings.log_level, "warn");
        assert_eq!(config.settings.pacmd, "pacmd");
        assert!(config.settings.state_file.is_none());
        assert!(config.groups.is_empty());
    }

    #[test]
    fn test_groups_are_parsed_in_order() {
        let config = Config::parse(
            r#"
[[groups]]
name = "desk"
members = ["DAC", "Mic"]

[[groups]]
name = "tv"
members = ["HDMI"]
"#,
        )
        .unwrap();

        assert_eq!(config.groups.len(), 2);
        let desk = config.group("desk").unwrap();
        assert_eq!(desk.members, vec!["DAC".to_string(), "Mic".to_string()]);
        assert!(config.group("kitchen").is_none());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let err = Config::parse("[settings]\nlog_level = \"loud\"\n").unwrap_err();
        assert!(format!("{err:?}").contains("log_level"));
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let err = Config::parse(
            r#"
[[groups]]
name = "desk"
members = ["DAC"]

[[groups]]
name = "desk"
members = ["Mic"]
"#,
        )
        .unwrap_err();
        assert!(format!("{err:?}").contains("Duplicate group"));
    }

    #[test]
    fn test_empty_group_rejected() {
        let err = Config::parse("[[groups]]\nname = \"desk\"\nmembers = []\n").unwrap_err();
        assert!(format!("{err:?}").contains("no members"));
    }

    #[test]
    fn test_unknown_setting_rejected() {
        assert!(Config::parse("[settings]\nnotfy = true\n").is_err());
    }

    #[test]
    fn test_state_file_override() {
        let config = Config::parse("[settings]\nstate_file = \"/run/user/1000/x\"\n").unwrap();
        assert_eq!(config.state_file(), PathBuf::from("/run/user/1000/x"));
    }
}
