//! Utility module
//!
//! This module provides:
//! - Configuration management
//! - Logging setup
//! - Model directory layout

mod artifacts;
mod config;
mod logging;

pub use artifacts::{ArtifactPaths, CONFIG_FILE, MODEL_STEM, SCALER_FILE};
pub use config::{Config, DataConfig, LoggingConfig};
pub use logging::setup_logging;
