//! Min-max scaling of feature columns into `[0, 1]`
//!
//! The scaler is fit once over the concatenated rows of every input file and
//! is then passed explicitly to every transform and to the inverse sales
//! transform. It remembers the feature names it was fit on so that data from
//! a differently ordered schema is rejected instead of silently mis-scaled.

use super::loader::{read_raw, LoaderOptions};
use super::schema::FeatureSchema;
use crate::error::{Error, Result};
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{info, warn};

/// Fitted per-column min-max transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    /// Feature names in column order
    pub feature_names: Vec<String>,
    /// Per-column minimum seen during fit
    pub data_min: Array1<f32>,
    /// Per-column maximum seen during fit
    pub data_max: Array1<f32>,
    /// Per-column multiplicative factor
    pub scale: Array1<f32>,
    /// Per-column additive offset applied after scaling
    pub min: Array1<f32>,
}

impl MinMaxScaler {
    /// Fit the scaler to `[rows, features]` data.
    ///
    /// A column with zero range gets a range of 1, so every value of that
    /// column maps to 0 instead of dividing by zero.
    pub fn fit(data: ArrayView2<'_, f32>, feature_names: Vec<String>) -> Result<Self> {
        if data.nrows() == 0 {
            return Err(Error::EmptyData("cannot fit scaler on zero rows".to_string()));
        }
        if feature_names.len() != data.ncols() {
            return Err(Error::ShapeMismatch {
                expected: vec![feature_names.len()],
                found: vec![data.ncols()],
            });
        }

        let data_min = data.fold_axis(Axis(0), f32::INFINITY, |&a, &b| a.min(b));
        let data_max = data.fold_axis(Axis(0), f32::NEG_INFINITY, |&a, &b| a.max(b));

        let mut range = &data_max - &data_min;
        for (i, r) in range.iter_mut().enumerate() {
            if *r == 0.0 {
                warn!(
                    "Feature {} is constant ({}), using unit range",
                    feature_names[i], data_min[i]
                );
                *r = 1.0;
            }
        }

        let scale = range.mapv(|r| 1.0 / r);
        let min = -&data_min * &scale;

        Ok(Self {
            feature_names,
            data_min,
            data_max,
            scale,
            min,
        })
    }

    /// Number of columns the scaler was fit on
    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Fail unless the schema has exactly the fitted feature order
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<()> {
        let names = schema.names();
        if names != self.feature_names {
            return Err(Error::SchemaMismatch {
                expected: self.feature_names.clone(),
                found: names,
            });
        }
        Ok(())
    }

    fn check_columns(&self, data: &ArrayView2<'_, f32>) -> Result<()> {
        if data.ncols() != self.n_features() {
            return Err(Error::ShapeMismatch {
                expected: vec![data.nrows(), self.n_features()],
                found: vec![data.nrows(), data.ncols()],
            });
        }
        Ok(())
    }

    /// Map raw values into the fitted `[0, 1]` range
    pub fn transform(&self, data: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.check_columns(&data)?;
        Ok(&data * &self.scale + &self.min)
    }

    /// Map scaled values back to original units
    pub fn inverse_transform(&self, data: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.check_columns(&data)?;
        Ok((&data - &self.min) / &self.scale)
    }

    /// Save the fitted scaler as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Load a scaler saved with [`MinMaxScaler::save`]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Fit a scaler over the rows of every file, concatenated in the given order
pub fn build_scaler<P: AsRef<Path>>(
    input_files: &[P],
    schema: &FeatureSchema,
    options: &LoaderOptions,
) -> Result<MinMaxScaler> {
    if input_files.is_empty() {
        return Err(Error::NoInputFiles);
    }

    let values = input_files
        .iter()
        .map(|file| read_raw(file, schema, options))
        .collect::<Result<Vec<_>>>()?;
    let views: Vec<_> = values.iter().map(|v| v.view()).collect();
    let full_dataset = concatenate(Axis(0), &views)?;

    info!(
        "Fitting scaler on {} rows from {} files",
        full_dataset.nrows(),
        input_files.len()
    );

    MinMaxScaler::fit(full_dataset.view(), schema.names())
}

/// Reverse the scaling of sales values using only the sales column statistics
pub fn invert_scale_sales(sales: &Array1<f32>, scaler: &MinMaxScaler) -> Array1<f32> {
    let sales_index = FeatureSchema::SALES_INDEX;
    let offset = scaler.min[sales_index];
    let scale = scaler.scale[sales_index];
    sales.mapv(|v| (v - offset) / scale)
}
