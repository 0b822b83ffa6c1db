//! Error types.
//!
//! Only configuration and metrics collection can fail. History and rendering
//! operations are total: degenerate input produces degenerate output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("history size must be at least 1")]
    ZeroHistory,

    #[error("moving average window must be at least 1")]
    ZeroWindow,
}

/// Errors raised by a metrics source while sampling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectError {
    #[error("no CPU data reported by the host")]
    NoCpuData,
}
