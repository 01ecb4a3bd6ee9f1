//! Configuration management
//!
//! All settings live in one TOML file. The look-back length and feature
//! order are plain configuration values shared by scaler fitting, windowing
//! and the model input shape.

use crate::data::{FeatureSchema, LoaderOptions, PipelineConfig};
use crate::error::{Error, Result};
use crate::model::{CompileConfig, ModelConfig, TrainingConfig};
use crate::DEFAULT_LOOK_BACK;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Data configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub look_back: usize,
    /// Feature columns in order; must start with "Sales"
    pub features: Vec<String>,
    pub delimiter: char,
    pub sort_by_date: bool,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            look_back: DEFAULT_LOOK_BACK,
            features: FeatureSchema::default().names(),
            delimiter: ',',
            sort_by_date: false,
        }
    }
}

impl DataConfig {
    /// Parsed feature schema
    pub fn schema(&self) -> Result<FeatureSchema> {
        FeatureSchema::from_names(&self.features)
    }

    /// File parsing options
    pub fn loader_options(&self) -> Result<LoaderOptions> {
        if !self.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter '{}' is not a single-byte character",
                self.delimiter
            )));
        }
        Ok(LoaderOptions {
            delimiter: self.delimiter as u8,
            sort_by_date: self.sort_by_date,
        })
    }

    /// Everything the feature pipeline needs
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig {
            look_back: self.look_back,
            schema: self.schema()?,
            loader: self.loader_options()?,
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub compile: CompileConfig,
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check every section and that the model input matches the data shape
    pub fn validate(&self) -> Result<()> {
        let schema = self.data.schema()?;
        self.data.loader_options()?;
        self.model.validate()?;
        self.compile.validate()?;
        self.training.validate()?;

        if self.model.look_back != self.data.look_back {
            return Err(Error::Config(format!(
                "model.look_back ({}) differs from data.look_back ({})",
                self.model.look_back, self.data.look_back
            )));
        }
        if self.model.num_features != schema.len() {
            return Err(Error::Config(format!(
                "model.num_features ({}) differs from the {} configured features",
                self.model.num_features,
                schema.len()
            )));
        }
        Ok(())
    }
}
