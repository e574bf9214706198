//! Calendar-quarter resampling of theft dates.

use std::collections::BTreeMap;

use chrono::Datelike as _;
use theft_dashboard_analytics_models::TimeSeriesPoint;
use theft_dashboard_incident_models::IncidentRecord;

/// Whether quarters without incidents appear in a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BucketFill {
    /// Only quarters with at least one incident.
    #[default]
    Sparse,
    /// Every quarter between the first and last observed, zero-filled.
    Dense,
}

/// A calendar quarter, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Quarter {
    year: i32,
    quarter: u32,
}

impl Quarter {
    const fn next(self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }
}

impl std::fmt::Display for Quarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

/// Incident counts per calendar quarter of the theft date, oldest first.
///
/// Records without a theft date are skipped.
#[must_use]
pub fn quarterly_trend(records: &[&IncidentRecord], fill: BucketFill) -> Vec<TimeSeriesPoint> {
    let mut counts: BTreeMap<Quarter, u64> = BTreeMap::new();
    for date in records.iter().filter_map(|r| r.date_stolen) {
        let quarter = Quarter {
            year: date.year(),
            quarter: date.month0() / 3 + 1,
        };
        *counts.entry(quarter).or_insert(0) += 1;
    }

    let bounds = counts
        .keys()
        .next()
        .copied()
        .zip(counts.keys().next_back().copied());
    if fill == BucketFill::Dense
        && let Some((first, last)) = bounds
    {
        let mut quarter = first;
        while quarter < last {
            quarter = quarter.next();
            counts.entry(quarter).or_insert(0);
        }
    }

    counts
        .into_iter()
        .map(|(quarter, count)| TimeSeriesPoint {
            period: quarter.to_string(),
            count,
        })
        .collect()
}
