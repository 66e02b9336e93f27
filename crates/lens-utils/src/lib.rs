//! Shared utilities for tickerlens
//!
//! This crate provides the ambient pieces shared across the workspace:
//! tracing setup and the logging configuration that drives it.

pub mod config;
pub mod logging;

pub use config::{LogConfig, LogFormat};
pub use logging::{init_tracing, init_tracing_with};
