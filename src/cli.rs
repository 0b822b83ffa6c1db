//! Command line interface.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// Long flags that are also accepted with a single leading dash
/// (`-refresh 250`, `-avg=5`, `-help`).
const SINGLE_DASH_FLAGS: &[&str] = &["refresh", "history", "avg", "config", "log-file", "help"];

/// Terminal CPU and system load monitor.
#[derive(Debug, Parser)]
#[command(name = "cpu-monitor", version)]
#[command(about = "Terminal CPU and system load monitor", long_about = None)]
#[command(after_help = KEY_HELP)]
pub struct Cli {
    /// Refresh rate in milliseconds (100-5000) [default: 500]
    #[arg(long, value_name = "MS")]
    pub refresh: Option<u64>,

    /// Number of history points to keep [default: 120]
    #[arg(long, value_name = "N")]
    pub history: Option<usize>,

    /// Moving average window size [default: 10]
    #[arg(long, value_name = "N")]
    pub avg: Option<usize>,

    /// Read settings from a TOML file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

const KEY_HELP: &str = "\
Keyboard controls:
  q, Ctrl+C   Quit
  r           Reset history
  p           Pause/unpause monitoring
  h, ?        Toggle help

Examples:
  cpu-monitor                      Run with default settings
  cpu-monitor --refresh 1000       Update every second
  cpu-monitor -history 60 -avg 5   Keep 60 history points, 5-point average";

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }
}

/// Rewrite `-flag` / `-flag=value` to `--flag` / `--flag=value` for the
/// known long flags. Everything else passes through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-').filter(|r| !r.starts_with('-')) else {
                return arg;
            };
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if SINGLE_DASH_FLAGS.contains(&name) {
                OsString::from(format!("-{text}"))
            } else {
                arg
            }
        })
        .collect()
}
