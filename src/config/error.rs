//! Errors raised while loading `to-talkyard.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// The converter config could not be used. Always fatal, before any scanning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read converter config `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("converter config is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("converter config rejected: {0}")]
    Validation(String),
}
