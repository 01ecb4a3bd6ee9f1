//! Feature preparation: read, scale, window

use super::loader::{read_raw, LoaderOptions};
use super::scaler::MinMaxScaler;
use super::schema::FeatureSchema;
use super::window::create_windows;
use crate::error::{Error, Result};
use crate::DEFAULT_LOOK_BACK;
use ndarray::{concatenate, Array1, Array3, Axis};
use std::path::Path;
use tracing::{debug, info};

/// Immutable settings shared by scaler fitting and feature loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Rows per window
    pub look_back: usize,
    /// Column order of the feature matrix
    pub schema: FeatureSchema,
    /// File parsing options
    pub loader: LoaderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            look_back: DEFAULT_LOOK_BACK,
            schema: FeatureSchema::default(),
            loader: LoaderOptions::default(),
        }
    }
}

/// Build `(x, y)` windows from every file, scaled with `scaler`.
///
/// Each file is windowed on its own so that no window spans two files; the
/// per-file results are concatenated in file order.
pub fn load_features<P: AsRef<Path>>(
    input_files: &[P],
    scaler: &MinMaxScaler,
    config: &PipelineConfig,
) -> Result<(Array3<f32>, Array1<f32>)> {
    if input_files.is_empty() {
        return Err(Error::NoInputFiles);
    }
    scaler.check_schema(&config.schema)?;

    let mut xs = Vec::with_capacity(input_files.len());
    let mut ys = Vec::with_capacity(input_files.len());

    for input_file in input_files {
        let data = read_raw(input_file, &config.schema, &config.loader)?;
        let data = scaler.transform(data.view())?;
        let (x, y) = create_windows(&data, config.look_back)?;

        debug!(
            "{:?}: {} rows -> {} windows",
            input_file.as_ref(),
            data.nrows(),
            y.len()
        );
        xs.push(x);
        ys.push(y);
    }

    let x_views: Vec<_> = xs.iter().map(|x| x.view()).collect();
    let y_views: Vec<_> = ys.iter().map(|y| y.view()).collect();
    let x = concatenate(Axis(0), &x_views)?;
    let y = concatenate(Axis(0), &y_views)?;

    info!(
        "Prepared {} windows of shape ({}, {})",
        y.len(),
        config.look_back,
        config.schema.len()
    );

    Ok((x, y))
}
