//! Runtime configuration.
//!
//! Settings come from three layers, highest priority first: command line
//! flags, an optional TOML file, then built-in defaults.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::ConfigError;

/// Fastest allowed refresh; sampling alone takes about this long.
pub const MIN_REFRESH_MS: u64 = 100;
/// Slowest allowed refresh.
pub const MAX_REFRESH_MS: u64 = 5000;

pub const DEFAULT_REFRESH_MS: u64 = 500;
pub const DEFAULT_HISTORY_SIZE: usize = 120;
pub const DEFAULT_MOVING_AVG_SIZE: usize = 10;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Interval between samples.
    pub refresh_rate: Duration,
    /// Samples kept per history buffer.
    pub history_size: NonZeroUsize,
    /// Samples in the moving average.
    pub moving_avg_size: NonZeroUsize,
    /// Where tracing output goes, if anywhere.
    pub log_file: Option<PathBuf>,
    /// Out-of-range refresh interval (ms) that was clamped, if any.
    pub refresh_clamped_from: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            refresh_rate: Duration::from_millis(DEFAULT_REFRESH_MS),
            history_size: NonZeroUsize::new(DEFAULT_HISTORY_SIZE).unwrap_or(NonZeroUsize::MIN),
            moving_avg_size: NonZeroUsize::new(DEFAULT_MOVING_AVG_SIZE)
                .unwrap_or(NonZeroUsize::MIN),
            log_file: None,
            refresh_clamped_from: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration from parsed command line flags, reading the
    /// config file they point at (if any).
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(cli, &file)
    }

    /// Merge flags over file values over defaults, then validate.
    pub fn resolve(cli: &Cli, file: &FileConfig) -> Result<Self, ConfigError> {
        let refresh_ms = cli
            .refresh
            .or(file.refresh_ms)
            .unwrap_or(DEFAULT_REFRESH_MS);
        let history = cli.history.or(file.history).unwrap_or(DEFAULT_HISTORY_SIZE);
        let avg = cli.avg.or(file.avg).unwrap_or(DEFAULT_MOVING_AVG_SIZE);
        let clamped_ms = clamp_refresh_ms(refresh_ms);

        Ok(Self {
            refresh_rate: Duration::from_millis(clamped_ms),
            refresh_clamped_from: (clamped_ms != refresh_ms).then_some(refresh_ms),
            history_size: NonZeroUsize::new(history).ok_or(ConfigError::ZeroHistory)?,
            moving_avg_size: NonZeroUsize::new(avg).ok_or(ConfigError::ZeroWindow)?,
            log_file: cli.log_file.clone().or_else(|| file.log_file.clone()),
        })
    }

    /// Warn about settings that were adjusted while resolving. Call once
    /// logging is set up so the warning also reaches the log.
    pub fn report_adjustments(&self) {
        let Some(requested) = self.refresh_clamped_from else {
            return;
        };
        let clamped = self.refresh_rate.as_millis();
        let bound = if requested < MIN_REFRESH_MS { "minimum" } else { "maximum" };
        eprintln!("Warning: refresh rate {requested}ms out of range, using {bound} {clamped}ms");
        tracing::warn!(requested, clamped = clamped as u64, "refresh rate clamped");
    }

    /// Wall-clock time covered by a full history buffer.
    pub fn history_span(&self) -> Duration {
        let samples = u32::try_from(self.history_size.get()).unwrap_or(u32::MAX);
        self.refresh_rate.saturating_mul(samples)
    }
}

/// Clamp a refresh interval into `[MIN_REFRESH_MS, MAX_REFRESH_MS]`.
pub fn clamp_refresh_ms(requested: u64) -> u64 {
    requested.clamp(MIN_REFRESH_MS, MAX_REFRESH_MS)
}

/// Settings read from the TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub refresh_ms: Option<u64>,
    pub history: Option<usize>,
    pub avg: Option<usize>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}
