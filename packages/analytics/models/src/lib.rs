#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types for the vehicle theft aggregations.
//!
//! Each type is one row of a small derived table. A metric that cannot be
//! computed (missing or non-positive denominator, too little data) is
//! `None`, never zero.

pub mod table;

use serde::{Deserialize, Serialize};

use crate::table::{Cell, TableRow};

/// Count of incidents sharing one value of a grouping field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Group value.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

impl TableRow for CategoryCount {
    const COLUMNS: &'static [&'static str] = &["category", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.category.as_str().into(), self.count.into()]
    }
}

/// Count of incidents sharing a value pair of two grouping fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCount {
    /// Value of the first field.
    pub primary: String,
    /// Value of the second field.
    pub secondary: String,
    /// Number of incidents.
    pub count: u64,
}

impl TableRow for PairCount {
    const COLUMNS: &'static [&'static str] = &["primary", "secondary", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.primary.as_str().into(),
            self.secondary.as_str().into(),
            self.count.into(),
        ]
    }
}

/// Incident count for one period of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (e.g. "2021Q4").
    pub period: String,
    /// Number of incidents in the period.
    pub count: u64,
}

impl TableRow for TimeSeriesPoint {
    const COLUMNS: &'static [&'static str] = &["period", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.period.as_str().into(), self.count.into()]
    }
}

/// Incident count for one integer bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketCount {
    /// Bucket value (a model year or a vehicle age).
    pub bucket: i32,
    /// Number of incidents.
    pub count: u64,
}

impl TableRow for BucketCount {
    const COLUMNS: &'static [&'static str] = &["bucket", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![self.bucket.into(), self.count.into()]
    }
}

/// Incident count for one (integer bucket, category) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    /// Bucket value (a model year or a vehicle age).
    pub bucket: i32,
    /// Category value within the bucket.
    pub category: String,
    /// Number of incidents.
    pub count: u64,
}

impl TableRow for HistogramBin {
    const COLUMNS: &'static [&'static str] = &["bucket", "category", "count"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.bucket.into(),
            self.category.as_str().into(),
            self.count.into(),
        ]
    }
}

/// Theft count of one region joined with its population attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    /// Region name.
    pub region: String,
    /// Incidents in the region.
    pub theft_count: u64,
    /// Region population, if known.
    pub population: Option<f64>,
    /// Region population density, if known.
    pub density: Option<f64>,
}

impl TableRow for RegionSummary {
    const COLUMNS: &'static [&'static str] = &["region", "theft_count", "population", "density"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.region.as_str().into(),
            self.theft_count.into(),
            self.population.into(),
            self.density.into(),
        ]
    }
}

/// Ordinary-least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLine {
    /// Change in `y` per unit of `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
}

impl TrendLine {
    /// Evaluates the line at `x`.
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Relationship between population density and theft count across regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityCorrelation {
    /// Regions with a known density, the scatter points.
    pub regions: Vec<RegionSummary>,
    /// Pearson correlation coefficient, `None` when there are fewer than two
    /// points or either variable has no variance.
    pub coefficient: Option<f64>,
    /// Least-squares fit of theft count on density, `None` under the same
    /// conditions as [`Self::coefficient`].
    pub trend: Option<TrendLine>,
}

/// Per-capita theft rate of one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionRate {
    /// Region name.
    pub region: String,
    /// Incidents in the region.
    pub theft_count: u64,
    /// Thefts per 10,000 residents, `None` without a positive population.
    pub thefts_per_10k: Option<f64>,
}

impl TableRow for RegionRate {
    const COLUMNS: &'static [&'static str] = &["region", "theft_count", "thefts_per_10k"];

    fn cells(&self) -> Vec<Cell> {
        vec![
            self.region.as_str().into(),
            self.theft_count.into(),
            self.thefts_per_10k.into(),
        ]
    }
}

/// Highest and lowest per-capita theft rates, ranked independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerCapitaRanking {
    /// Regions with the highest rates, descending.
    pub highest: Vec<RegionRate>,
    /// Regions with the lowest rates, ascending.
    pub lowest: Vec<RegionRate>,
}

/// Single-value headline metrics over the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    /// Incidents in the view.
    pub total_incidents: u64,
    /// Distinct makes in the view.
    pub distinct_makes: u64,
    /// Incidents whose make classification is "Luxury".
    pub luxury_incidents: u64,
    /// Reference year minus mean model year, one decimal.
    pub mean_vehicle_age: Option<f64>,
    /// Most frequently stolen make.
    pub most_stolen_make: Option<String>,
    /// Incidents per 100,000 of mean population, two decimals.
    pub thefts_per_100k: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trend_line_evaluates() {
        let line = TrendLine {
            slope: 2.0,
            intercept: 1.0,
        };
        assert!((line.at(3.0) - 7.0).abs() < f64::EPSILON);
    }

    #[test]
    fn region_rate_cells_mark_missing_rate() {
        let rate = RegionRate {
            region: "Chatham Islands".to_owned(),
            theft_count: 50,
            thefts_per_10k: None,
        };
        assert_eq!(
            rate.cells(),
            vec![Cell::from("Chatham Islands"), Cell::Integer(50), Cell::Missing]
        );
    }
}
