use std::path::PathBuf;
use thiserror::Error;

/// Rejection of a delay configuration. Only produced at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("multiplier must be a finite, non-negative number (got {0})")]
    InvalidMultiplier(f64),
    #[error("jitter must be a finite, non-negative number (got {0})")]
    InvalidJitter(f64),
    #[error("read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config yaml")]
    Parse(#[from] serde_yaml::Error),
}
