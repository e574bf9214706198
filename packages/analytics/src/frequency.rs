//! Frequency counts, top-N rankings, and two-level group counts.
//!
//! Ties in a ranking keep the order in which the values were first
//! encountered in the view. That order is an implementation detail, not a
//! contract.

use std::collections::{BTreeMap, BTreeSet};

use theft_dashboard_analytics_models::{CategoryCount, PairCount};
use theft_dashboard_incident_models::{GroupField, IncidentRecord, UNKNOWN};

/// Counts each value of `field`, most frequent first.
///
/// Records whose value is missing (only possible for
/// [`GroupField::Model`]) are skipped.
#[must_use]
pub fn value_counts(records: &[&IncidentRecord], field: GroupField) -> Vec<CategoryCount> {
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in records {
        let Some(value) = record.group_value(field) else {
            continue;
        };
        if let Some(&i) = index.get(value) {
            counts[i].count += 1;
        } else {
            index.insert(value, counts.len());
            counts.push(CategoryCount {
                category: value.to_owned(),
                count: 1,
            });
        }
    }

    // Stable: equal counts stay in first-encountered order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `n` most frequent values of `field`.
#[must_use]
pub fn top_n(records: &[&IncidentRecord], field: GroupField, n: usize) -> Vec<CategoryCount> {
    let mut counts = value_counts(records, field);
    counts.truncate(n);
    counts
}

/// Counts each (`primary`, `secondary`) value pair, most frequent first.
#[must_use]
pub fn pair_counts(
    records: &[&IncidentRecord],
    primary: GroupField,
    secondary: GroupField,
) -> Vec<PairCount> {
    let mut index: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    let mut counts: Vec<PairCount> = Vec::new();

    for record in records {
        let (Some(a), Some(b)) = (record.group_value(primary), record.group_value(secondary))
        else {
            continue;
        };
        if let Some(&i) = index.get(&(a, b)) {
            counts[i].count += 1;
        } else {
            index.insert((a, b), counts.len());
            counts.push(PairCount {
                primary: a.to_owned(),
                secondary: b.to_owned(),
                count: 1,
            });
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `n` most frequent (`primary`, `secondary`) pairs.
#[must_use]
pub fn top_pair_counts(
    records: &[&IncidentRecord],
    primary: GroupField,
    secondary: GroupField,
    n: usize,
) -> Vec<PairCount> {
    let mut counts = pair_counts(records, primary, secondary);
    counts.truncate(n);
    counts
}

/// Counts each (`primary`, `secondary`) pair, ordered by the pair values.
///
/// Only records whose `restrict_to` value is in `allowed` are counted.
fn cross_tab(
    records: &[&IncidentRecord],
    primary: GroupField,
    secondary: GroupField,
    restrict_to: GroupField,
    allowed: &BTreeSet<&str>,
) -> Vec<PairCount> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();

    for record in records {
        if !record
            .group_value(restrict_to)
            .is_some_and(|v| allowed.contains(v))
        {
            continue;
        }
        if let (Some(a), Some(b)) = (record.group_value(primary), record.group_value(secondary)) {
            *counts.entry((a, b)).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|((primary, secondary), count)| PairCount {
            primary: primary.to_owned(),
            secondary: secondary.to_owned(),
            count,
        })
        .collect()
}

/// Make-classification counts without the [`UNKNOWN`] bucket.
#[must_use]
pub fn classification_share(records: &[&IncidentRecord]) -> Vec<CategoryCount> {
    value_counts(records, GroupField::MakeType)
        .into_iter()
        .filter(|c| c.category != UNKNOWN)
        .collect()
}

/// (region, model) counts for the `n` most stolen models.
#[must_use]
pub fn top_models_by_region(records: &[&IncidentRecord], n: usize) -> Vec<PairCount> {
    let top = top_n(records, GroupField::Model, n);
    let allowed: BTreeSet<&str> = top.iter().map(|c| c.category.as_str()).collect();
    cross_tab(
        records,
        GroupField::Region,
        GroupField::Model,
        GroupField::Model,
        &allowed,
    )
}

/// (make, color) counts for the `n` most stolen makes.
#[must_use]
pub fn make_color_breakdown(records: &[&IncidentRecord], n: usize) -> Vec<PairCount> {
    let top = top_n(records, GroupField::Make, n);
    let allowed: BTreeSet<&str> = top.iter().map(|c| c.category.as_str()).collect();
    cross_tab(
        records,
        GroupField::Make,
        GroupField::Color,
        GroupField::Make,
        &allowed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_make(id: usize, make: &str) -> IncidentRecord {
        IncidentRecord::new(id.to_string()).with_make(make, "Standard")
    }

    fn makes(groups: &[(&str, usize)]) -> Vec<IncidentRecord> {
        let mut records = Vec::new();
        for (make, n) in groups {
            for _ in 0..*n {
                records.push(with_make(records.len(), make));
            }
        }
        records
    }

    fn refs(records: &[IncidentRecord]) -> Vec<&IncidentRecord> {
        records.iter().collect()
    }

    #[test]
    fn top_three_of_tied_counts() {
        let records = makes(&[("A", 5), ("B", 5), ("C", 3), ("D", 1)]);
        let top = top_n(&refs(&records), GroupField::Make, 3);

        assert_eq!(top.len(), 3);
        assert_eq!(
            top.iter().map(|c| c.count).collect::<Vec<_>>(),
            vec![5, 5, 3]
        );
        let names: BTreeSet<&str> = top.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, BTreeSet::from(["A", "B", "C"]));
        assert_eq!(top[2].category, "C");
    }

    #[test]
    fn top_n_larger_than_groups_returns_all() {
        let records = makes(&[("A", 2), ("B", 1)]);
        assert_eq!(top_n(&refs(&records), GroupField::Make, 20).len(), 2);
    }

    #[test]
    fn empty_view_has_no_counts() {
        assert!(top_n(&[], GroupField::Region, 10).is_empty());
        assert!(pair_counts(&[], GroupField::Make, GroupField::MakeType).is_empty());
        assert!(top_models_by_region(&[], 10).is_empty());
    }

    #[test]
    fn missing_models_are_skipped() {
        let records = vec![
            IncidentRecord::new("1").with_model("COROLLA"),
            IncidentRecord::new("2"),
            IncidentRecord::new("3").with_model("COROLLA"),
        ];
        let counts = value_counts(&refs(&records), GroupField::Model);
        assert_eq!(
            counts,
            vec![CategoryCount {
                category: "COROLLA".to_owned(),
                count: 2
            }]
        );
    }

    #[test]
    fn counts_make_and_classification_pairs() {
        let records = vec![
            IncidentRecord::new("1").with_make("Toyota", "Standard"),
            IncidentRecord::new("2").with_make("BMW", "Luxury"),
            IncidentRecord::new("3").with_make("Toyota", "Standard"),
        ];
        let pairs = top_pair_counts(&refs(&records), GroupField::Make, GroupField::MakeType, 15);
        assert_eq!(pairs[0].primary, "Toyota");
        assert_eq!(pairs[0].secondary, "Standard");
        assert_eq!(pairs[0].count, 2);
        assert_eq!(pairs[1].primary, "BMW");
        assert_eq!(pairs[1].count, 1);
    }

    #[test]
    fn classification_share_drops_unknown() {
        let records = vec![
            IncidentRecord::new("1").with_make("Toyota", "Standard"),
            IncidentRecord::new("2").with_make("BMW", "Luxury"),
            IncidentRecord::new("3"),
        ];
        let share = classification_share(&refs(&records));
        assert_eq!(share.len(), 2);
        assert!(share.iter().all(|c| c.category != UNKNOWN));
    }

    #[test]
    fn model_region_breakdown_keeps_only_top_models() {
        let records = vec![
            IncidentRecord::new("1")
                .with_model("COROLLA")
                .with_region("Auckland", None, None),
            IncidentRecord::new("2")
                .with_model("COROLLA")
                .with_region("Waikato", None, None),
            IncidentRecord::new("3")
                .with_model("COROLLA")
                .with_region("Auckland", None, None),
            IncidentRecord::new("4")
                .with_model("DEMIO")
                .with_region("Auckland", None, None),
        ];
        let breakdown = top_models_by_region(&refs(&records), 1);
        assert_eq!(
            breakdown,
            vec![
                PairCount {
                    primary: "Auckland".to_owned(),
                    secondary: "COROLLA".to_owned(),
                    count: 2,
                },
                PairCount {
                    primary: "Waikato".to_owned(),
                    secondary: "COROLLA".to_owned(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn make_color_breakdown_keeps_only_top_makes() {
        let records = vec![
            IncidentRecord::new("1")
                .with_make("Toyota", "Standard")
                .with_color("Silver"),
            IncidentRecord::new("2")
                .with_make("Toyota", "Standard")
                .with_color("White"),
            IncidentRecord::new("3")
                .with_make("Ford", "Standard")
                .with_color("Blue"),
        ];
        let breakdown = make_color_breakdown(&refs(&records), 1);
        assert_eq!(breakdown.len(), 2);
        assert!(breakdown.iter().all(|p| p.primary == "Toyota"));
        assert_eq!(breakdown[0].secondary, "Silver");
    }
}
