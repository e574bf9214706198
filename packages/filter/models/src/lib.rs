#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! The user's current filter selection.
//!
//! A [`FilterState`] holds one accepted-value set per [`Facet`] plus an
//! optional inclusive [`DateRange`]. An empty set never excludes anything:
//! it means the facet is unconstrained. Values are not validated against
//! the dataset; an unknown value simply matches no records.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use theft_dashboard_incident_models::Facet;

/// Inclusive calendar date range.
///
/// A range whose start is after its end is legal and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First date included.
    pub start: NaiveDate,
    /// Last date included.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range covering `start..=end`.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Current facet and date constraints for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    date_range: Option<DateRange>,
    makes: BTreeSet<String>,
    vehicle_types: BTreeSet<String>,
    colors: BTreeSet<String>,
    regions: BTreeSet<String>,
    make_types: BTreeSet<String>,
}

impl FilterState {
    /// Returns the accepted values for `facet`. Empty means unconstrained.
    #[must_use]
    pub const fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Make => &self.makes,
            Facet::VehicleType => &self.vehicle_types,
            Facet::Color => &self.colors,
            Facet::Region => &self.regions,
            Facet::MakeType => &self.make_types,
        }
    }

    const fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Make => &mut self.makes,
            Facet::VehicleType => &mut self.vehicle_types,
            Facet::Color => &mut self.colors,
            Facet::Region => &mut self.regions,
            Facet::MakeType => &mut self.make_types,
        }
    }

    /// Replaces the accepted-value set for `facet`.
    pub fn set<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(facet) = values.into_iter().map(Into::into).collect();
    }

    /// Adds one accepted value to `facet`.
    pub fn add(&mut self, facet: Facet, value: impl Into<String>) {
        self.values_mut(facet).insert(value.into());
    }

    /// Removes every constraint on `facet`.
    pub fn clear(&mut self, facet: Facet) {
        self.values_mut(facet).clear();
    }

    /// Returns the date constraint, if any.
    #[must_use]
    pub const fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// Sets or clears the date constraint.
    pub const fn set_date_range(&mut self, range: Option<DateRange>) {
        self.date_range = range;
    }

    /// Restores the all-unconstrained state and returns it.
    pub fn reset(&mut self) -> &Self {
        *self = Self::default();
        self
    }

    /// Facets that currently constrain the view.
    pub fn active_facets(&self) -> impl Iterator<Item = Facet> + '_ {
        Facet::all()
            .iter()
            .copied()
            .filter(|facet| !self.values(*facet).is_empty())
    }

    /// Whether no facet or date constraint is set.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.date_range.is_none() && self.active_facets().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_is_unconstrained() {
        let state = FilterState::default();
        assert!(state.is_unconstrained());
        for facet in Facet::all() {
            assert!(state.values(*facet).is_empty());
        }
        assert!(state.date_range().is_none());
    }

    #[test]
    fn set_replaces_previous_values() {
        let mut state = FilterState::default();
        state.set(Facet::Make, ["Toyota", "Mazda"]);
        state.set(Facet::Make, ["Ford"]);
        assert_eq!(
            state.values(Facet::Make).iter().collect::<Vec<_>>(),
            vec!["Ford"]
        );
        assert!(state.values(Facet::Color).is_empty());
    }

    #[test]
    fn setting_empty_values_unconstrains_facet() {
        let mut state = FilterState::default();
        state.add(Facet::Region, "Auckland");
        state.set(Facet::Region, Vec::<String>::new());
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn reset_returns_to_default() {
        let mut state = FilterState::default();
        state.add(Facet::Color, "Silver");
        state.add(Facet::MakeType, "Luxury");
        state.set_date_range(Some(DateRange::new(date(2021, 1, 1), date(2021, 12, 31))));
        assert!(!state.is_unconstrained());

        let reset = state.reset().clone();
        assert_eq!(reset, FilterState::default());
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn active_facets_lists_constrained_ones() {
        let mut state = FilterState::default();
        state.add(Facet::Region, "Auckland");
        state.add(Facet::Make, "Toyota");
        let active: Vec<Facet> = state.active_facets().collect();
        assert_eq!(active, vec![Facet::Make, Facet::Region]);
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = DateRange::new(date(2021, 1, 1), date(2021, 3, 31));
        assert!(range.contains(date(2021, 1, 1)));
        assert!(range.contains(date(2021, 3, 31)));
        assert!(!range.contains(date(2021, 4, 1)));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = DateRange::new(date(2021, 3, 31), date(2021, 1, 1));
        assert!(!range.contains(date(2021, 2, 1)));
        assert!(!range.contains(date(2021, 1, 1)));
    }
}
