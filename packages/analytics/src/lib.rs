#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation layer for the vehicle theft dashboard.
//!
//! Each public function is an independent, pure aggregation over the records
//! of a filtered view and returns a small derived table from
//! [`theft_dashboard_analytics_models`]. None of them fail: an empty input
//! yields empty tables, zero counts, and `None` for anything that needs data
//! to be defined.

pub mod frequency;
pub mod histogram;
pub mod regional;
pub mod summary;
pub mod temporal;

use chrono::Datelike as _;

/// Year used to derive vehicle ages from model years.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Rounds `value` to `decimals` places, ties to even.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_to_even() {
        assert!((round_to(16.25, 1) - 16.2).abs() < 1e-9);
        assert!((round_to(16.75, 1) - 16.8).abs() < 1e-9);
        assert!((round_to(2.345_67, 2) - 2.35).abs() < 1e-9);
        assert!((round_to(-16.25, 1) - -16.2).abs() < 1e-9);
    }
}
