//! CPU monitor library
//!
//! Core components for the terminal CPU and system-load dashboard.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod event;
pub mod history;
pub mod metrics;
pub mod state;
pub mod ui;
