//! Reading store records from delimited files
//!
//! Every file is parsed into [`RawRecord`]s, day-of-week is expanded into
//! seven indicator columns and the rows are projected onto a
//! [`FeatureSchema`] as a `[rows, features]` `f32` matrix.

use super::record::RawRecord;
use super::schema::FeatureSchema;
use crate::error::{Error, Result};
use csv::ReaderBuilder;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// How input files are parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Field delimiter byte
    pub delimiter: u8,
    /// Order rows by ascending date instead of keeping file order
    pub sort_by_date: bool,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            sort_by_date: false,
        }
    }
}

/// Read typed records from a file
pub fn read_records<P: AsRef<Path>>(path: P, options: &LoaderOptions) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let read_error = |source| Error::Read {
        path: path.to_path_buf(),
        source,
    };

    let reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_path(path)
        .map_err(read_error)?;
    let records = deserialize_records(reader, options).map_err(read_error)?;

    debug!("Read {} records from {:?}", records.len(), path);
    Ok(records)
}

/// Read typed records from any reader with a header row
pub fn read_records_from_reader<R: Read>(
    reader: R,
    options: &LoaderOptions,
) -> Result<Vec<RawRecord>> {
    let reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .from_reader(reader);
    Ok(deserialize_records(reader, options)?)
}

fn deserialize_records<R: Read>(
    mut reader: csv::Reader<R>,
    options: &LoaderOptions,
) -> std::result::Result<Vec<RawRecord>, csv::Error> {
    let mut records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<RawRecord>, _>>()?;

    if options.sort_by_date {
        records.sort_by_key(|r| r.date);
    }

    Ok(records)
}

/// Project records onto the schema as a `[rows, features]` matrix
pub fn records_to_features(records: &[RawRecord], schema: &FeatureSchema) -> Result<Array2<f32>> {
    let mut values = Array2::zeros((records.len(), schema.len()));

    for (row, record) in records.iter().enumerate() {
        record.validate(row)?;
        for (col, &feature) in schema.features().iter().enumerate() {
            values[[row, col]] = record.feature_value(feature, row)?;
        }
    }

    Ok(values)
}

/// Read a file straight into its feature matrix
pub fn read_raw<P: AsRef<Path>>(
    path: P,
    schema: &FeatureSchema,
    options: &LoaderOptions,
) -> Result<Array2<f32>> {
    let records = read_records(path, options)?;
    records_to_features(&records, schema)
}

/// Same as [`read_raw`] over an arbitrary reader
pub fn read_raw_from_reader<R: Read>(
    reader: R,
    schema: &FeatureSchema,
    options: &LoaderOptions,
) -> Result<Array2<f32>> {
    let records = read_records_from_reader(reader, options)?;
    records_to_features(&records, schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::Feature;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CSV: &str = "\
Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday
1,5,2015-07-31,5263,555,1,1,0,1
1,4,2015-07-30,5020,546,1,1,0,1
1,7,2015-07-26,0,0,0,0,a,0
";

    #[test]
    fn test_read_raw_projects_default_schema() {
        let schema = FeatureSchema::default();
        let values = read_raw_from_reader(CSV.as_bytes(), &schema, &LoaderOptions::default())
            .unwrap();

        assert_eq!(values.dim(), (3, 11));
        assert_eq!(values.row(0).to_vec(), vec![
            5263.0, 1.0, 555.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0
        ]);
        assert_eq!(values[[2, 10]], 1.0);

        for row in values.rows() {
            let ones = row.iter().skip(4).filter(|&&v| v == 1.0).count();
            assert_eq!(ones, 1);
        }
    }

    #[test]
    fn test_sort_by_date() {
        let options = LoaderOptions {
            sort_by_date: true,
            ..Default::default()
        };
        let records = read_records_from_reader(CSV.as_bytes(), &options).unwrap();
        assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(records[0].sales, 0.0);
    }

    #[test]
    fn test_state_holiday_read_as_string() {
        let schema = FeatureSchema::new(vec![Feature::Sales, Feature::StateHoliday]).unwrap();
        let values =
            read_raw_from_reader(CSV.as_bytes(), &schema, &LoaderOptions::default()).unwrap();
        assert_eq!(values.column(1).to_vec(), vec![0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_missing_required_column_fails() {
        let csv = "DayOfWeek,Date,Sales,Open,SchoolHoliday\n5,2015-07-31,5263,1,1\n";
        let result = read_raw_from_reader(
            csv.as_bytes(),
            &FeatureSchema::default(),
            &LoaderOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_day_of_week_fails() {
        let csv = "DayOfWeek,Date,Sales,Customers,Open,SchoolHoliday\n9,2015-07-31,1,1,1,0\n";
        let result = read_raw_from_reader(
            csv.as_bytes(),
            &FeatureSchema::default(),
            &LoaderOptions::default(),
        );
        assert!(matches!(result, Err(Error::InvalidDayOfWeek { row: 0, value: 9 })));
    }

    #[test]
    fn test_missing_file_fails() {
        let result = read_raw(
            "/nonexistent/train.csv",
            &FeatureSchema::default(),
            &LoaderOptions::default(),
        );
        assert!(matches!(result, Err(Error::Read { .. })));
    }

    #[test]
    fn test_read_from_path_with_delimiter() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", CSV.replace(',', ";")).unwrap();

        let options = LoaderOptions {
            delimiter: b';',
            ..Default::default()
        };
        let values = read_raw(file.path(), &FeatureSchema::default(), &options).unwrap();
        assert_eq!(values.nrows(), 3);
    }
}
