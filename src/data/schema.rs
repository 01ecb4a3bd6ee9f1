//! Ordered feature schema consumed by the scaler and the model

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Number of day-of-week indicator columns
pub const DAYS_IN_WEEK: u8 = 7;

/// One numeric column of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Daily turnover, the forecast target
    Sales,
    /// Store open flag
    Open,
    /// Number of customers
    Customers,
    /// Promotion running flag
    Promo,
    /// School holiday flag
    SchoolHoliday,
    /// 1.0 when the state holiday code is anything but "0"
    StateHoliday,
    /// One-hot day-of-week indicator, 1..=7
    Day(u8),
}

impl Feature {
    /// Column name as it appears in configuration and in the fitted scaler
    pub fn name(&self) -> String {
        match self {
            Feature::Sales => "Sales".to_string(),
            Feature::Open => "Open".to_string(),
            Feature::Customers => "Customers".to_string(),
            Feature::Promo => "Promo".to_string(),
            Feature::SchoolHoliday => "SchoolHoliday".to_string(),
            Feature::StateHoliday => "StateHoliday".to_string(),
            Feature::Day(day) => format!("Day_{}", day),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Sales" => Ok(Feature::Sales),
            "Open" => Ok(Feature::Open),
            "Customers" => Ok(Feature::Customers),
            "Promo" => Ok(Feature::Promo),
            "SchoolHoliday" => Ok(Feature::SchoolHoliday),
            "StateHoliday" => Ok(Feature::StateHoliday),
            other => other
                .strip_prefix("Day_")
                .and_then(|day| day.parse::<u8>().ok())
                .filter(|day| (1..=DAYS_IN_WEEK).contains(day))
                .map(Feature::Day)
                .ok_or_else(|| Error::Config(format!("unknown feature '{}'", other))),
        }
    }
}

/// Fixed, ordered list of features.
///
/// Sales is always the first column: windowing takes its target from
/// column 0 and the inverse sales transform reads column 0 statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    features: Vec<Feature>,
}

impl FeatureSchema {
    /// Index of the sales column
    pub const SALES_INDEX: usize = 0;

    /// Create a schema, rejecting empty lists, duplicates, out-of-range day
    /// indicators and a non-leading sales column
    pub fn new(features: Vec<Feature>) -> Result<Self> {
        if features.first() != Some(&Feature::Sales) {
            return Err(Error::Config(
                "feature schema must start with Sales".to_string(),
            ));
        }

        for (i, feature) in features.iter().enumerate() {
            if let Feature::Day(day) = feature {
                if !(1..=DAYS_IN_WEEK).contains(day) {
                    return Err(Error::Config(format!(
                        "day indicator {} outside 1..={}",
                        day, DAYS_IN_WEEK
                    )));
                }
            }
            if features[..i].contains(feature) {
                return Err(Error::Config(format!("duplicate feature '{}'", feature)));
            }
        }

        Ok(Self { features })
    }

    /// Parse a schema from column names
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let features = names
            .iter()
            .map(|name| name.as_ref().parse())
            .collect::<Result<Vec<Feature>>>()?;
        Self::new(features)
    }

    /// Features in column order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Column names in order
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(Feature::name).collect()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Always false for a validated schema
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureSchema {
    /// `Sales, Open, Customers, SchoolHoliday, Day_1..Day_7`
    fn default() -> Self {
        let mut features = vec![
            Feature::Sales,
            Feature::Open,
            Feature::Customers,
            Feature::SchoolHoliday,
        ];
        features.extend((1..=DAYS_IN_WEEK).map(Feature::Day));
        Self { features }
    }
}
