#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter engine for the vehicle theft dataset.
//!
//! [`apply`] is a pure function of the base [`Dataset`] and a
//! [`FilterState`]. A record is kept iff it passes the date clause and every
//! facet clause; clauses are independent, so evaluation order does not
//! matter and the first failing clause short-circuits.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use theft_dashboard_dataset::Dataset;
use theft_dashboard_filter_models::FilterState;
use theft_dashboard_incident_models::{Facet, IncidentRecord};

/// The records of a dataset that satisfy a filter state, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    records: Vec<&'a IncidentRecord>,
}

impl<'a> FilteredView<'a> {
    /// A view over every record of `dataset`.
    #[must_use]
    pub fn all(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.records().iter().collect(),
        }
    }

    /// Applies `state` again to this view, yielding the subset that passes.
    #[must_use]
    pub fn refine(&self, state: &FilterState) -> Self {
        Self {
            records: self
                .records
                .iter()
                .copied()
                .filter(|record| matches(record, state))
                .collect(),
        }
    }

    /// The matching records.
    #[must_use]
    pub fn records(&self) -> &[&'a IncidentRecord] {
        &self.records
    }

    /// Number of matching records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Returns whether `record` satisfies every active clause of `state`.
///
/// A record with no theft date never passes a set date range.
#[must_use]
pub fn matches(record: &IncidentRecord, state: &FilterState) -> bool {
    if let Some(range) = state.date_range()
        && !record.date_stolen.is_some_and(|date| range.contains(date))
    {
        return false;
    }

    Facet::all().iter().all(|facet| {
        let accepted = state.values(*facet);
        accepted.is_empty() || accepted.contains(record.facet_value(*facet))
    })
}

/// Produces the filtered view of `dataset` under `state`.
#[must_use]
pub fn apply<'a>(dataset: &'a Dataset, state: &FilterState) -> FilteredView<'a> {
    let view = FilteredView {
        records: dataset
            .records()
            .iter()
            .filter(|record| matches(record, state))
            .collect(),
    };
    log::debug!("Filter kept {}/{} records", view.len(), dataset.len());
    view
}

/// Sorted distinct values of `facet` across the whole dataset.
///
/// These are the choices offered to the user; they never depend on the
/// current filter.
#[must_use]
pub fn facet_options(dataset: &Dataset, facet: Facet) -> Vec<String> {
    dataset
        .records()
        .iter()
        .map(|record| record.facet_value(facet))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

/// How much of the base dataset a filter removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    /// Records in the filtered view.
    pub total_records: u64,
    /// Records in the base dataset.
    pub base_records: u64,
    /// Percentage of base records excluded, `None` if the base is empty.
    pub reduction_percent: Option<f64>,
}

impl FilterSummary {
    /// Summarizes `view` relative to `dataset`.
    #[must_use]
    pub fn new(dataset: &Dataset, view: &FilteredView<'_>) -> Self {
        let total_records = view.len() as u64;
        let base_records = dataset.len() as u64;
        #[allow(clippy::cast_precision_loss)]
        let reduction_percent = (base_records > 0)
            .then(|| (1.0 - total_records as f64 / base_records as f64) * 100.0);
        Self {
            total_records,
            base_records,
            reduction_percent,
        }
    }
}
