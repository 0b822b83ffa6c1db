//! `sysinfo`-backed metrics source.

use std::time::{Duration, Instant};

use chrono::Local;
use sysinfo::{Components, ProcessRefreshKind, ProcessesToUpdate, System};

use super::{LoadAverage, MetricsSource, Snapshot};
use crate::error::CollectError;

/// How long CPU usage is measured for on every collect.
pub const SAMPLE_WINDOW: Duration = Duration::from_millis(100);

const TEMPERATURE_REFRESH: Duration = Duration::from_secs(2);
const PROCESS_REFRESH: Duration = Duration::from_secs(3);

/// Substrings (lowercase) of sensor labels that identify a CPU sensor.
const CPU_SENSOR_HINTS: &[&str] = &["core", "cpu", "package", "tctl", "tc0p"];

/// Collects host metrics through `sysinfo`.
///
/// Static CPU information is read once. Temperature and process count are
/// comparatively expensive, so they are refreshed on their own slower
/// cadence and the last reading is reused in between.
pub struct SystemCollector {
    system: System,
    model_name: String,
    core_count: usize,
    thread_count: usize,
    temperature: f64,
    last_temperature_refresh: Option<Instant>,
    process_count: usize,
    last_process_refresh: Option<Instant>,
}

impl SystemCollector {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_all();

        let model_name = system
            .cpus()
            .first()
            .map(|cpu| cpu.brand().trim().to_string())
            .unwrap_or_default();
        let thread_count = system.cpus().len();
        let core_count = System::physical_core_count().unwrap_or(thread_count);

        tracing::debug!(%model_name, core_count, thread_count, "cpu topology");

        Self {
            system,
            model_name,
            core_count,
            thread_count,
            temperature: 0.0,
            last_temperature_refresh: None,
            process_count: 0,
            last_process_refresh: None,
        }
    }

    /// Measure per-core usage across the sampling window. Blocks.
    fn sample_cpu(&mut self) -> Vec<f64> {
        self.system.refresh_cpu_usage();
        std::thread::sleep(SAMPLE_WINDOW.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL));
        self.system.refresh_cpu_all();

        self.system
            .cpus()
            .iter()
            .map(|cpu| f64::from(cpu.cpu_usage()))
            .collect()
    }

    fn refresh_temperature(&mut self) {
        if !is_due(self.last_temperature_refresh, TEMPERATURE_REFRESH) {
            return;
        }
        self.last_temperature_refresh = Some(Instant::now());

        let components = Components::new_with_refreshed_list();
        let readings: Vec<(String, f32)> = components
            .iter()
            .filter_map(|c| c.temperature().map(|t| (c.label().to_lowercase(), t)))
            .collect();

        let cpu_reading = readings
            .iter()
            .find(|(label, _)| CPU_SENSOR_HINTS.iter().any(|hint| label.contains(hint)))
            .or_else(|| readings.first());

        if let Some((label, celsius)) = cpu_reading {
            tracing::trace!(sensor = %label, celsius, "temperature refreshed");
            self.temperature = f64::from(*celsius);
        }
    }

    fn refresh_process_count(&mut self) {
        if !is_due(self.last_process_refresh, PROCESS_REFRESH) {
            return;
        }
        self.last_process_refresh = Some(Instant::now());

        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        self.process_count = self.system.processes().len();
    }
}

impl Default for SystemCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for SystemCollector {
    fn collect(&mut self) -> Result<Snapshot, CollectError> {
        let per_core_usage = self.sample_cpu();
        if per_core_usage.is_empty() {
            return Err(CollectError::NoCpuData);
        }
        let total_usage = per_core_usage.iter().sum::<f64>() / per_core_usage.len() as f64;

        let frequency_mhz = self
            .system
            .cpus()
            .first()
            .map(|cpu| cpu.frequency() as f64)
            .unwrap_or_default();

        self.refresh_temperature();
        self.refresh_process_count();

        self.system.refresh_memory();
        let memory_total = self.system.total_memory();
        let memory_used = self.system.used_memory();
        let memory_usage = if memory_total == 0 {
            0.0
        } else {
            memory_used as f64 / memory_total as f64 * 100.0
        };

        let load = System::load_average();

        Ok(Snapshot {
            total_usage,
            per_core_usage,
            temperature: self.temperature,
            frequency_mhz,
            model_name: self.model_name.clone(),
            core_count: self.core_count,
            thread_count: self.thread_count,
            process_count: self.process_count,
            load_average: LoadAverage {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            memory_usage,
            memory_total,
            memory_used,
            uptime: Duration::from_secs(System::uptime()),
            timestamp: Local::now(),
        })
    }
}

fn is_due(last: Option<Instant>, every: Duration) -> bool {
    last.map_or(true, |at| at.elapsed() >= every)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_refreshed_is_due() {
        assert!(is_due(None, Duration::from_secs(60)));
    }

    #[test]
    fn recent_refresh_is_not_due() {
        assert!(!is_due(Some(Instant::now()), Duration::from_secs(60)));
    }

    #[test]
    fn zero_interval_is_always_due() {
        assert!(is_due(Some(Instant::now()), Duration::ZERO));
    }
}
