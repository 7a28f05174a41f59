use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::error::AnalyzerError;

/// One row of sales history: a product sold `quantity` units on `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Sales")]
    pub quantity: f64,
}

/// All daily quantities observed for a single product, in input order.
#[derive(Debug, Clone)]
pub struct ProductSeries {
    pub product: String,
    pub quantities: Vec<f64>,
}

/// Replenishment parameters computed for one product.
///
/// Serde names match the columns of the exported report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderPolicy {
    #[serde(rename = "Product")]
    pub product: String,

    #[serde(rename = "Avg Daily Sales")]
    pub avg_daily_demand: f64,
    #[serde(rename = "Std Dev of Sales")]
    pub demand_std_dev: f64,

    #[serde(rename = "Safety Stock")]
    pub safety_stock: u32,
    #[serde(rename = "Reorder Point")]
    pub reorder_point: u32,
}

/// Run-wide policy assumptions, fixed before computation starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyParameters {
    /// Days between placing a replenishment order and its arrival.
    pub lead_time_days: u32,
    /// One-sided standard-normal quantile for the target service level
    /// (1.65 is roughly a 95% chance of not stocking out during lead time).
    pub service_level_z: f64,
}

impl Default for PolicyParameters {
    fn default() -> Self {
        Self {
            lead_time_days: 5,
            service_level_z: 1.65,
        }
    }
}

impl PolicyParameters {
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.lead_time_days == 0 {
            return Err(AnalyzerError::InvalidParameter {
                name: "lead_time_days",
                reason: "lead time must be at least one day".into(),
            });
        }
        if !self.service_level_z.is_finite() || self.service_level_z <= 0.0 {
            return Err(AnalyzerError::InvalidParameter {
                name: "service_level_z",
                reason: format!(
                    "service level Z must be a positive finite number, got {}",
                    self.service_level_z
                ),
            });
        }
        Ok(())
    }
}

// Sales exports disagree on date formats; ISO first, then the two
// spreadsheet layouts that keep showing up in store exports.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date);
        }
    }
    Err(format!("unrecognized date '{}'", s))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(s.trim()).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_match_published_assumptions() {
        let params = PolicyParameters::default();
        assert_eq!(params.lead_time_days, 5);
        assert!((params.service_level_z - 1.65).abs() < 1e-12);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_lead_time_is_rejected() {
        let params = PolicyParameters {
            lead_time_days: 0,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(AnalyzerError::InvalidParameter { name: "lead_time_days", .. })
        ));
    }

    #[test]
    fn non_positive_z_is_rejected() {
        for z in [0.0, -1.65, f64::NAN] {
            let params = PolicyParameters {
                service_level_z: z,
                ..Default::default()
            };
            assert!(matches!(
                params.validate(),
                Err(AnalyzerError::InvalidParameter { name: "service_level_z", .. })
            ));
        }
    }

    #[test]
    fn parse_date_accepts_known_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_date("03/15/2024").unwrap(), expected);
        assert_eq!(parse_date("15-03-2024").unwrap(), expected);
        assert!(parse_date("15th of March").is_err());
    }
}
