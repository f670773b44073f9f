use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DssError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, DssError>;
