//! # Data module
//!
//! Turns store CSV files into scaled look-back windows:
//! loading, feature schema, min-max scaling, windowing and batching.

mod dataset;
mod loader;
mod pipeline;
mod record;
mod scaler;
mod schema;
mod window;

pub use dataset::{SalesBatch, SalesBatcher, SalesDataset};
pub use loader::{
    read_raw, read_raw_from_reader, read_records, read_records_from_reader, records_to_features,
    LoaderOptions,
};
pub use pipeline::{load_features, PipelineConfig};
pub use record::RawRecord;
pub use scaler::{build_scaler, invert_scale_sales, MinMaxScaler};
pub use schema::{Feature, FeatureSchema, DAYS_IN_WEEK};
pub use window::{create_windows, to_samples, WindowSample};
