//! Field coercion for raw CSV cells.
//!
//! Every function here absorbs bad input: an unparseable value becomes
//! `None` (or the [`UNKNOWN`] sentinel for categoricals) and the record
//! stays in the dataset.

use chrono::{NaiveDate, NaiveDateTime};
use theft_dashboard_incident_models::UNKNOWN;

/// Spellings treated as a missing cell, in addition to blank.
const NULL_SPELLINGS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Returns the trimmed cell, or `None` if it is blank or a null spelling.
#[must_use]
pub fn non_missing(raw: Option<&str>) -> Option<&str> {
    let value = raw?.trim();
    if value.is_empty() || NULL_SPELLINGS.contains(&value) {
        None
    } else {
        Some(value)
    }
}

/// Normalizes a categorical cell to text, substituting [`UNKNOWN`] when
/// missing.
#[must_use]
pub fn categorical(raw: Option<&str>) -> String {
    non_missing(raw).unwrap_or(UNKNOWN).to_owned()
}

/// Parses a theft date.
///
/// Accepts ISO dates with or without a time component, plus US-style
/// `M/D/YYYY` and `M/D/YY`.
#[must_use]
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let value = non_missing(raw)?;

    // Two-digit years first: `%Y` would happily read "21" as year 21.
    for fmt in ["%Y-%m-%d", "%m/%d/%y", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parses a numeric cell that may carry grouping separators
/// (e.g. `"1,695,200"`).
///
/// Only `,`, `_` and whitespace are stripped; any other stray text makes
/// the value missing.
#[must_use]
pub fn parse_grouped_number(raw: Option<&str>) -> Option<f64> {
    let value = non_missing(raw)?;
    let cleaned: String = value
        .chars()
        .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a model year, accepting integral floats such as `"2005.0"`.
#[must_use]
pub fn parse_model_year(raw: Option<&str>) -> Option<i32> {
    let value = non_missing(raw)?;
    if let Ok(year) = value.parse::<i32>() {
        return Some(year);
    }
    let float = value.parse::<f64>().ok()?;
    if float.fract() == 0.0 && float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX) {
        #[allow(clippy::cast_possible_truncation)]
        Some(float as i32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_null_spellings_are_missing() {
        assert!(non_missing(None).is_none());
        assert!(non_missing(Some("   ")).is_none());
        assert!(non_missing(Some("NaN")).is_none());
        assert_eq!(non_missing(Some(" Toyota ")), Some("Toyota"));
    }

    #[test]
    fn categorical_fills_unknown() {
        assert_eq!(categorical(Some("")), UNKNOWN);
        assert_eq!(categorical(None), UNKNOWN);
        assert_eq!(categorical(Some("7.0")), "7.0");
    }

    #[test]
    fn parses_iso_and_us_dates() {
        let expected = NaiveDate::from_ymd_opt(2021, 11, 5).unwrap();
        assert_eq!(parse_date(Some("2021-11-05")), Some(expected));
        assert_eq!(parse_date(Some("11/5/2021")), Some(expected));
        assert_eq!(parse_date(Some("11/5/21")), Some(expected));
        assert_eq!(parse_date(Some("2021-11-05 13:45:00")), Some(expected));
        assert_eq!(parse_date(Some("2021-11-05T13:45:00")), Some(expected));
    }

    #[test]
    fn rejects_invalid_date() {
        assert!(parse_date(Some("not-a-date")).is_none());
        assert!(parse_date(Some("2021-13-40")).is_none());
        assert!(parse_date(Some("")).is_none());
    }

    #[test]
    fn strips_grouping_separators() {
        assert_eq!(parse_grouped_number(Some("1,695,200")), Some(1_695_200.0));
        assert_eq!(parse_grouped_number(Some("343.09")), Some(343.09));
        assert_eq!(parse_grouped_number(Some(" 52 100 ")), Some(52_100.0));
    }

    #[test]
    fn non_numeric_population_is_missing() {
        assert!(parse_grouped_number(Some("unknown")).is_none());
        assert!(parse_grouped_number(Some("N/A")).is_none());
        assert!(parse_grouped_number(Some("1.2.3")).is_none());
        assert!(parse_grouped_number(Some("5 per km2")).is_none());
        assert!(parse_grouped_number(Some("$1,200")).is_none());
    }

    #[test]
    fn scientific_notation_parses() {
        assert_eq!(parse_grouped_number(Some("1.5e6")), Some(1_500_000.0));
        assert_eq!(parse_grouped_number(Some("-2.5E-1")), Some(-0.25));
    }

    #[test]
    fn parses_model_year_variants() {
        assert_eq!(parse_model_year(Some("2005")), Some(2005));
        assert_eq!(parse_model_year(Some("2005.0")), Some(2005));
        assert!(parse_model_year(Some("2005.5")).is_none());
        assert!(parse_model_year(Some("old")).is_none());
        assert!(parse_model_year(None).is_none());
    }
}
