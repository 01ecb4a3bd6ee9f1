//! One store-day row of the input files

use super::schema::{Feature, DAYS_IN_WEEK};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw daily store record.
///
/// Only `DayOfWeek`, `Date`, `Sales`, `Customers`, `Open` and `SchoolHoliday`
/// are required; any other column in the file is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Store", default)]
    pub store: Option<u32>,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u8,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sales")]
    pub sales: f64,
    #[serde(rename = "Customers")]
    pub customers: f64,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "Promo", default)]
    pub promo: Option<f64>,
    /// Kept as a string: codes mix digits and letters ("0", "a", "b", "c")
    #[serde(rename = "StateHoliday", default)]
    pub state_holiday: Option<String>,
    #[serde(rename = "SchoolHoliday")]
    pub school_holiday: f64,
}

impl RawRecord {
    /// One-hot day-of-week indicators, index 0 is `Day_1`
    pub fn day_indicators(&self) -> [f32; DAYS_IN_WEEK as usize] {
        let mut days = [0.0; DAYS_IN_WEEK as usize];
        if (1..=DAYS_IN_WEEK).contains(&self.day_of_week) {
            days[(self.day_of_week - 1) as usize] = 1.0;
        }
        days
    }

    /// Value of a single feature for this row; `row` is only used for errors
    pub fn feature_value(&self, feature: Feature, row: usize) -> Result<f32> {
        let value = match feature {
            Feature::Sales => self.sales as f32,
            Feature::Open => self.open as f32,
            Feature::Customers => self.customers as f32,
            Feature::SchoolHoliday => self.school_holiday as f32,
            Feature::Promo => self.promo.ok_or_else(|| Error::MissingColumn {
                column: feature.name(),
                row,
            })? as f32,
            Feature::StateHoliday => {
                let code = self
                    .state_holiday
                    .as_deref()
                    .ok_or_else(|| Error::MissingColumn {
                        column: feature.name(),
                        row,
                    })?;
                if code.trim() == "0" {
                    0.0
                } else {
                    1.0
                }
            }
            Feature::Day(day) => day
                .checked_sub(1)
                .and_then(|index| self.day_indicators().get(index as usize).copied())
                .unwrap_or(0.0),
        };
        Ok(value)
    }

    /// Check that DayOfWeek is in 1..=7
    pub fn validate(&self, row: usize) -> Result<()> {
        if !(1..=DAYS_IN_WEEK).contains(&self.day_of_week) {
            return Err(Error::InvalidDayOfWeek {
                row,
                value: self.day_of_week,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day_of_week: u8) -> RawRecord {
        RawRecord {
            store: Some(1),
            day_of_week,
            date: NaiveDate::from_ymd_opt(2015, 7, 31).unwrap(),
            sales: 5263.0,
            customers: 555.0,
            open: 1.0,
            promo: Some(1.0),
            state_holiday: Some("0".to_string()),
            school_holiday: 1.0,
        }
    }

    #[test]
    fn test_exactly_one_day_indicator() {
        for day in 1..=7u8 {
            let rec = record(day);
            let days: Vec<f32> = (1..=DAYS_IN_WEEK)
                .map(|d| rec.feature_value(Feature::Day(d), 0).unwrap())
                .collect();
            assert_eq!(days.iter().filter(|&&v| v == 1.0).count(), 1);
            assert_eq!(days.iter().sum::<f32>(), 1.0);
            assert_eq!(days[(day - 1) as usize], 1.0);
            assert_eq!(days, rec.day_indicators().to_vec());
        }
    }

    #[test]
    fn test_invalid_day_of_week() {
        assert!(record(0).validate(3).is_err());
        assert!(record(8).validate(3).is_err());
        assert!(record(7).validate(3).is_ok());
    }

    #[test]
    fn test_state_holiday_flag() {
        let mut rec = record(1);
        assert_eq!(rec.feature_value(Feature::StateHoliday, 0).unwrap(), 0.0);
        rec.state_holiday = Some("a".to_string());
        assert_eq!(rec.feature_value(Feature::StateHoliday, 0).unwrap(), 1.0);
        rec.state_holiday = None;
        assert!(rec.feature_value(Feature::StateHoliday, 0).is_err());
    }
}
