//! Host metrics acquisition.
//!
//! The dashboard only talks to a [`MetricsSource`]. Each call produces one
//! [`Snapshot`]; every field is best effort, and a zero or default value
//! means "not available on this host".

pub mod collector;

pub use collector::{SystemCollector, SAMPLE_WINDOW};

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::error::CollectError;

/// 1, 5 and 15 minute load averages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// One sampling tick's worth of host metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Mean usage over all cores, in percent.
    pub total_usage: f64,
    /// Usage per logical core, in percent. May grow between snapshots.
    pub per_core_usage: Vec<f64>,
    /// CPU temperature in °C; `0.0` when unknown.
    pub temperature: f64,
    pub frequency_mhz: f64,
    pub model_name: String,
    pub core_count: usize,
    pub thread_count: usize,
    pub process_count: usize,
    pub load_average: LoadAverage,
    /// Memory usage in percent.
    pub memory_usage: f64,
    pub memory_total: u64,
    pub memory_used: u64,
    pub uptime: Duration,
    pub timestamp: DateTime<Local>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            total_usage: 0.0,
            per_core_usage: Vec::new(),
            temperature: 0.0,
            frequency_mhz: 0.0,
            model_name: String::new(),
            core_count: 0,
            thread_count: 0,
            process_count: 0,
            load_average: LoadAverage::default(),
            memory_usage: 0.0,
            memory_total: 0,
            memory_used: 0,
            uptime: Duration::ZERO,
            timestamp: Local::now(),
        }
    }
}

/// Something that can produce a [`Snapshot`] on demand.
///
/// `collect` may block for its sampling window; callers run it off the async
/// executor's core threads.
#[cfg_attr(test, mockall::automock)]
pub trait MetricsSource: Send {
    fn collect(&mut self) -> Result<Snapshot, CollectError>;
}
