//! Core types and shared functionality for mcp-quickchart.
//!
//! This crate provides:
//! - Unified error types
//! - Configuration structures
//! - Output path resolution and file writes

pub mod config;
pub mod error;
pub mod output;

pub use config::{AppConfig, ConfigError, ToolToggle};
pub use error::Error;
pub use output::OutputLocator;
