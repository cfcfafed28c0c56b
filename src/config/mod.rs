//! Converter configuration management for `to-talkyard.toml`.
//!
//! The file is optional; every field has a default.
//!
//! # Sections
//!
//! | Section                 | Purpose                                   |
//! |-------------------------|-------------------------------------------|
//! | `[mapping]`             | Mode, category, authors, page folder      |
//! | `[mapping.placeholder]` | Canned texts for placeholder mode         |
//! | `[site]`                | Builder post ids and fallback timestamps  |
//!
//! # Example
//!
//! ```toml
//! [mapping]
//! mode = "content"
//! category_id = 2
//!
//! [site]
//! first_post_id = 101
//! ```

pub mod defaults;
mod error;
mod mapping;
mod site;

pub use error::ConfigError;
pub use mapping::{MappingConfig, MappingMode};
pub use site::SiteConfig;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing to-talkyard.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Path the config was loaded from (set after loading, empty for defaults)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Post → page/reply mapping
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Site data builder settings
    #[serde(default)]
    pub site: SiteConfig,
}

impl ConverterConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: ConverterConfig = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Load the config named on the command line, falling back to defaults
    /// when the file does not exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if cli.config.exists() {
            Self::from_path(&cli.config)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        Self::update_option(&mut self.mapping.mode, cli.mode.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.mapping.category_id <= 0 {
            bail!(ConfigError::Validation(
                "[mapping.category_id] must be positive".into()
            ));
        }

        let folder = &self.mapping.folder;
        if !folder.starts_with('/') || !folder.ends_with('/') {
            bail!(ConfigError::Validation(format!(
                "[mapping.folder] must start and end with `/`, got `{folder}`"
            )));
        }

        if self.mapping.placeholder.slug.trim().is_empty() {
            bail!(ConfigError::Validation(
                "[mapping.placeholder.slug] must not be empty".into()
            ));
        }

        if self.site.first_post_id <= 0 {
            bail!(ConfigError::Validation(
                "[site.first_post_id] must be positive".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["to-talkyard", "--wordpress-core-xml-export-file", "export.xml"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ConverterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mapping.mode, MappingMode::Placeholder);
        assert_eq!(config.mapping.category_id, 2);
    }

    #[test]
    fn test_empty_config_equals_default() {
        let config = ConverterConfig::from_str("").unwrap();
        assert_eq!(config.mapping.folder, ConverterConfig::default().mapping.folder);
        assert_eq!(config.site.first_post_id, ConverterConfig::default().site.first_post_id);
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = ConverterConfig::from_str("[build]\nminify = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_folder() {
        let mut config = ConverterConfig::default();
        config.mapping.folder = "blog".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("[mapping.folder]"));
    }

    #[test]
    fn test_validate_rejects_non_positive_category() {
        let mut config = ConverterConfig::default();
        config.mapping.category_id = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_post_id() {
        let mut config = ConverterConfig::default();
        config.site.first_post_id = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let cli = cli(&["-C", missing.to_str().unwrap()]);

        let config = ConverterConfig::load(&cli).unwrap();
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.mapping.mode, MappingMode::Placeholder);
    }

    #[test]
    fn test_load_file_then_cli_override() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("to-talkyard.toml");
        fs::write(&path, "[mapping]\nmode = \"content\"\ncategory_id = 5\n").unwrap();

        let config = ConverterConfig::load(&cli(&["-C", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.config_path, path);
        assert_eq!(config.mapping.mode, MappingMode::Content);
        assert_eq!(config.mapping.category_id, 5);

        let config =
            ConverterConfig::load(&cli(&["-C", path.to_str().unwrap(), "--mode", "placeholder"]))
                .unwrap();
        assert_eq!(config.mapping.mode, MappingMode::Placeholder);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("to-talkyard.toml");
        fs::write(&path, "[mapping]\nfolder = \"nested\"\n").unwrap();

        assert!(ConverterConfig::load(&cli(&["-C", path.to_str().unwrap()])).is_err());
    }
}
