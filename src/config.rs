//! Configuration management for the lineage index
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (lineage.toml)
//! - Environment variables (LINEAGE__*)
//!
//! ## Example config file (lineage.toml):
//! ```toml
//! [commit]
//! policy = "retain_growth"
//!
//! [preview]
//! suggest_siblings = true
//! rank_by_name = true
//!
//! [output]
//! format = "pretty"
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for the lineage index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageConfig {
    /// Commit settings
    #[serde(default)]
    pub commit: CommitConfig,

    /// Preview settings
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// What happens to pool growth when a commit is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Keep properties pooled by a rejected commit
    #[default]
    RetainGrowth,
    /// Stage new properties on a copy of the pool and keep them only if the
    /// commit succeeds
    Transactional,
}

/// Commit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommitConfig {
    #[serde(default)]
    pub policy: CommitPolicy,
}

/// Preview configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Suggest same-record additions for unmapped properties
    #[serde(default = "default_true")]
    pub suggest_siblings: bool,

    /// Order suggestions by field name similarity
    #[serde(default = "default_true")]
    pub rank_by_name: bool,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

fn default_true() -> bool {
    true
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            suggest_siblings: true,
            rank_by_name: true,
        }
    }
}

impl OutputFormat {
    /// Render `value` as JSON in this format
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        match self {
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
            OutputFormat::Compact => serde_json::to_string(value),
        }
    }
}

impl LineageConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["lineage.toml", ".lineage.toml", "config/lineage.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "lineage") {
            let xdg_config = config_dir.config_dir().join("lineage.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (LINEAGE__*)
        builder = builder.add_source(
            Environment::with_prefix("LINEAGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LineageConfig::default();
        assert_eq!(config.commit.policy, CommitPolicy::RetainGrowth);
        assert!(config.preview.suggest_siblings);
        assert!(config.preview.rank_by_name);
    }

    #[test]
    fn test_serialize_config() {
        let config = LineageConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[commit]"));
        assert!(toml_str.contains("policy = \"retain_growth\""));
        assert!(toml_str.contains("[output]"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[commit]\npolicy = \"transactional\"\n\n[preview]\nrank_by_name = false\n",
        )
        .unwrap();

        let config = LineageConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.commit.policy, CommitPolicy::Transactional);
        assert!(config.preview.suggest_siblings);
        assert!(!config.preview.rank_by_name);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = LineageConfig::default();
        config.output.format = OutputFormat::Compact;
        config.save(path.to_str().unwrap()).unwrap();

        let reloaded = LineageConfig::load_from(path.to_str()).unwrap();
        assert!(matches!(reloaded.output.format, OutputFormat::Compact));
    }
}
