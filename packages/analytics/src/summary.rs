//! Headline metrics over a filtered view.

use std::collections::BTreeSet;

use theft_dashboard_analytics_models::SummaryMetrics;
use theft_dashboard_incident_models::{GroupField, IncidentRecord, LUXURY};

use crate::{frequency::value_counts, round_to};

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0_u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

/// `reference_year` minus the mean model year, rounded to one decimal
/// (ties to even).
#[must_use]
pub fn mean_vehicle_age(records: &[&IncidentRecord], reference_year: i32) -> Option<f64> {
    let mean_year = mean(records.iter().filter_map(|r| r.model_year).map(f64::from))?;
    Some(round_to(f64::from(reference_year) - mean_year, 1))
}

/// Most frequently stolen make. Ties go to the make seen first.
#[must_use]
pub fn modal_make(records: &[&IncidentRecord]) -> Option<String> {
    value_counts(records, GroupField::Make)
        .into_iter()
        .next()
        .map(|c| c.category)
}

/// Incidents per 100,000 residents, using the mean population of the
/// records that carry one.
///
/// `None` when no record has a population or the mean is not positive.
#[must_use]
pub fn thefts_per_100k(records: &[&IncidentRecord]) -> Option<f64> {
    let mean_population = mean(
        records
            .iter()
            .filter_map(|r| r.population)
            .filter(|p| p.is_finite()),
    )?;
    if mean_population <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = records.len() as f64 / mean_population * 100_000.0;
    Some(round_to(rate, 2))
}

/// Computes every headline metric for `records`.
#[must_use]
pub fn summary_metrics(records: &[&IncidentRecord], reference_year: i32) -> SummaryMetrics {
    let distinct_makes: BTreeSet<&str> = records.iter().map(|r| r.make_name.as_str()).collect();

    SummaryMetrics {
        total_incidents: records.len() as u64,
        distinct_makes: distinct_makes.len() as u64,
        luxury_incidents: records.iter().filter(|r| r.make_type == LUXURY).count() as u64,
        mean_vehicle_age: mean_vehicle_age(records, reference_year),
        most_stolen_make: modal_make(records),
        thefts_per_100k: thefts_per_100k(records),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<IncidentRecord> {
        vec![
            IncidentRecord::new("1")
                .with_make("Toyota", "Standard")
                .with_model_year(2010)
                .with_region("Auckland", Some(100_000.0), None),
            IncidentRecord::new("2")
                .with_make("BMW", "Luxury")
                .with_model_year(2015)
                .with_region("Auckland", Some(100_000.0), None),
            IncidentRecord::new("3")
                .with_make("Toyota", "Standard")
                .with_region("Otago", Some(200_000.0), None),
            IncidentRecord::new("4").with_make("BMW", "Luxury"),
        ]
    }

    #[test]
    fn computes_headline_metrics() {
        let records = sample();
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        let metrics = summary_metrics(&refs, 2025);

        assert_eq!(metrics.total_incidents, 4);
        assert_eq!(metrics.distinct_makes, 2);
        assert_eq!(metrics.luxury_incidents, 2);
        assert_eq!(metrics.mean_vehicle_age, Some(12.5));
        assert_eq!(metrics.most_stolen_make.as_deref(), Some("Toyota"));
        // 4 incidents over a mean population of 133,333.33.
        assert_eq!(metrics.thefts_per_100k, Some(3.0));
    }

    #[test]
    fn empty_view_metrics() {
        let metrics = summary_metrics(&[], 2025);
        assert_eq!(metrics.total_incidents, 0);
        assert_eq!(metrics.distinct_makes, 0);
        assert_eq!(metrics.luxury_incidents, 0);
        assert!(metrics.mean_vehicle_age.is_none());
        assert!(metrics.most_stolen_make.is_none());
        assert!(metrics.thefts_per_100k.is_none());
    }

    #[test]
    fn non_positive_mean_population_is_unavailable() {
        let records = [
            IncidentRecord::new("1").with_region("A", Some(0.0), None),
            IncidentRecord::new("2").with_region("B", Some(0.0), None),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        assert!(thefts_per_100k(&refs).is_none());

        let unknown = [IncidentRecord::new("3")];
        let refs: Vec<&IncidentRecord> = unknown.iter().collect();
        assert!(thefts_per_100k(&refs).is_none());
    }

    #[test]
    fn modal_make_tie_goes_to_first_seen() {
        let records = [
            IncidentRecord::new("1").with_make("Mazda", "Standard"),
            IncidentRecord::new("2").with_make("Honda", "Standard"),
            IncidentRecord::new("3").with_make("Honda", "Standard"),
            IncidentRecord::new("4").with_make("Mazda", "Standard"),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        assert_eq!(modal_make(&refs).as_deref(), Some("Mazda"));
    }

    #[test]
    fn mean_age_rounds_to_one_decimal() {
        let records = [
            IncidentRecord::new("1").with_model_year(2000),
            IncidentRecord::new("2").with_model_year(2001),
            IncidentRecord::new("3").with_model_year(2001),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        // Mean year 2000.667
        assert_eq!(mean_vehicle_age(&refs, 2025), Some(24.3));
    }

    #[test]
    fn mean_age_tie_rounds_to_even() {
        let records = [
            IncidentRecord::new("1").with_model_year(2009),
            IncidentRecord::new("2").with_model_year(2010),
            IncidentRecord::new("3").with_model_year(2010),
            IncidentRecord::new("4").with_model_year(2010),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        // Mean year 2009.75, so the unrounded age is exactly 16.25.
        assert_eq!(mean_vehicle_age(&refs, 2026), Some(16.2));
    }
}
