#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! One user's dashboard session.
//!
//! A [`Session`] owns the dataset cache and the current [`FilterState`].
//! Every filter mutation goes through `&mut self`; each call to
//! [`Session::report`] recomputes the filtered view and all tables from
//! scratch.

pub mod report;

use std::path::Path;
use std::sync::Arc;

use theft_dashboard_dataset::{Dataset, DatasetError, cache::DatasetCache};
use theft_dashboard_filter::facet_options;
use theft_dashboard_filter_models::{DateRange, FilterState};
use theft_dashboard_incident_models::Facet;

pub use report::DashboardReport;

/// Interactive session state: the cached base dataset plus the user's
/// current filters.
pub struct Session {
    cache: DatasetCache,
    filters: FilterState,
    reference_year: i32,
}

impl Session {
    /// Creates a session over `cache` with no filters applied.
    #[must_use]
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            cache,
            filters: FilterState::default(),
            reference_year: theft_dashboard_analytics::current_year(),
        }
    }

    /// Measures vehicle ages against `year` instead of the current year.
    #[must_use]
    pub const fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    /// The current filter selection.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Replaces the filter selection wholesale.
    pub fn set_filters(&mut self, filters: FilterState) {
        self.filters = filters;
    }

    /// Replaces the accepted values of `facet`. An empty selection removes
    /// the constraint.
    pub fn set_facet<I, S>(&mut self, facet: Facet, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.set(facet, values);
        log::debug!(
            "{} filter now has {} value(s)",
            facet.label(),
            self.filters.values(facet).len()
        );
    }

    /// Removes the constraint on `facet`.
    pub fn clear_facet(&mut self, facet: Facet) {
        self.filters.clear(facet);
        log::debug!("{} filter cleared", facet.label());
    }

    /// Sets or clears the date range.
    pub const fn set_date_range(&mut self, range: Option<DateRange>) {
        self.filters.set_date_range(range);
    }

    /// Clears every filter.
    pub fn reset_filters(&mut self) {
        self.filters.reset();
        log::debug!("Filters reset");
    }

    /// Source file the dataset is read from.
    #[must_use]
    pub fn source_path(&self) -> &Path {
        self.cache.path()
    }

    /// The base dataset, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the source has to be read and cannot be.
    pub fn dataset(&mut self) -> Result<Arc<Dataset>, DatasetError> {
        self.cache.get()
    }

    /// Choices for `facet` over the unfiltered dataset.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset cannot be loaded.
    pub fn facet_options(&mut self, facet: Facet) -> Result<Vec<String>, DatasetError> {
        let dataset = self.cache.get()?;
        Ok(facet_options(&dataset, facet))
    }

    /// Drops the cached dataset and reads the source again. Filters are
    /// kept.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the source cannot be read.
    pub fn reload(&mut self) -> Result<Arc<Dataset>, DatasetError> {
        self.cache.invalidate();
        self.cache.get()
    }

    /// Reloads only if the source file changed since it was read. Returns
    /// whether a reload happened.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the changed source cannot be read.
    pub fn reload_if_changed(&mut self) -> Result<bool, DatasetError> {
        if self.cache.refresh_if_changed() {
            self.cache.get()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Computes the dashboard for the current filters.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the dataset cannot be loaded.
    pub fn report(&mut self) -> Result<DashboardReport, DatasetError> {
        let dataset = self.cache.get()?;
        Ok(DashboardReport::build(
            &dataset,
            &self.filters,
            self.reference_year,
        ))
    }
}
