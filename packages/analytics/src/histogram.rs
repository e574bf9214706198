//! Integer-bucket counts over model year and derived vehicle age.

use std::collections::BTreeMap;

use theft_dashboard_analytics_models::{BucketCount, HistogramBin};
use theft_dashboard_incident_models::{GroupField, IncidentRecord};

/// Ages outside `0..MAX_VEHICLE_AGE` are treated as data errors.
pub const MAX_VEHICLE_AGE: i32 = 100;

/// Integer-valued field a histogram buckets by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    /// The model year as recorded.
    ModelYear,
    /// `reference_year - model_year`, kept only within `0..MAX_VEHICLE_AGE`.
    VehicleAge,
}

/// Age of the vehicle in `reference_year`, if plausible.
#[must_use]
pub fn vehicle_age(record: &IncidentRecord, reference_year: i32) -> Option<i32> {
    let age = reference_year.checked_sub(record.model_year?)?;
    (0..MAX_VEHICLE_AGE).contains(&age).then_some(age)
}

fn bucket_of(record: &IncidentRecord, field: NumericField, reference_year: i32) -> Option<i32> {
    match field {
        NumericField::ModelYear => record.model_year,
        NumericField::VehicleAge => vehicle_age(record, reference_year),
    }
}

/// Incident counts per bucket of `field`, ascending by bucket.
#[must_use]
pub fn bucket_counts(
    records: &[&IncidentRecord],
    field: NumericField,
    reference_year: i32,
) -> Vec<BucketCount> {
    let mut counts: BTreeMap<i32, u64> = BTreeMap::new();
    for bucket in records
        .iter()
        .filter_map(|r| bucket_of(r, field, reference_year))
    {
        *counts.entry(bucket).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(bucket, count)| BucketCount { bucket, count })
        .collect()
}

/// Thefts per model year, oldest first.
#[must_use]
pub fn model_year_counts(records: &[&IncidentRecord]) -> Vec<BucketCount> {
    bucket_counts(records, NumericField::ModelYear, 0)
}

/// Incident counts per (bucket of `field`, value of `category`), ordered by
/// bucket then category.
#[must_use]
pub fn histogram_by_category(
    records: &[&IncidentRecord],
    field: NumericField,
    category: GroupField,
    reference_year: i32,
) -> Vec<HistogramBin> {
    let mut counts: BTreeMap<(i32, &str), u64> = BTreeMap::new();
    for record in records {
        if let (Some(bucket), Some(value)) = (
            bucket_of(record, field, reference_year),
            record.group_value(category),
        ) {
            *counts.entry((bucket, value)).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|((bucket, category), count)| HistogramBin {
            bucket,
            category: category.to_owned(),
            count,
        })
        .collect()
}
