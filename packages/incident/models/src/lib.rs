#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Vehicle theft incident record and its categorical dimensions.
//!
//! This crate defines the typed record every other package consumes. Once a
//! record has been loaded its categorical fields are never empty: missing
//! values are normalized to [`UNKNOWN`] so that every group-by has a stable
//! key.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Sentinel stored in place of any missing categorical value.
pub const UNKNOWN: &str = "Unknown";

/// Make classification counted by the luxury-vehicle metric.
pub const LUXURY: &str = "Luxury";

/// A single vehicle theft event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Unique identifier within the dataset.
    pub vehicle_id: String,
    /// Date of the theft, `None` if the source value could not be parsed.
    pub date_stolen: Option<NaiveDate>,
    /// Vehicle manufacturer (e.g. "Toyota").
    pub make_name: String,
    /// Vehicle body type (e.g. "Saloon", "Stationwagon").
    pub vehicle_type: String,
    /// Vehicle color.
    pub color: String,
    /// Free-text model description (e.g. "COROLLA").
    pub vehicle_desc: Option<String>,
    /// Model year of the vehicle.
    pub model_year: Option<i32>,
    /// Coarse make classification ("Luxury", "Standard", ...).
    pub make_type: String,
    /// Region the theft was reported in.
    pub region: String,
    /// Population of the region.
    pub population: Option<f64>,
    /// Population density of the region.
    pub density: Option<f64>,
}

impl IncidentRecord {
    /// Creates a record with the given identifier and every other field
    /// missing (categoricals set to [`UNKNOWN`]).
    #[must_use]
    pub fn new(vehicle_id: impl Into<String>) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            date_stolen: None,
            make_name: UNKNOWN.to_owned(),
            vehicle_type: UNKNOWN.to_owned(),
            color: UNKNOWN.to_owned(),
            vehicle_desc: None,
            model_year: None,
            make_type: UNKNOWN.to_owned(),
            region: UNKNOWN.to_owned(),
            population: None,
            density: None,
        }
    }

    /// Sets the theft date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date_stolen = Some(date);
        self
    }

    /// Sets the make and its classification.
    #[must_use]
    pub fn with_make(mut self, make_name: &str, make_type: &str) -> Self {
        make_name.clone_into(&mut self.make_name);
        make_type.clone_into(&mut self.make_type);
        self
    }

    /// Sets the vehicle type.
    #[must_use]
    pub fn with_vehicle_type(mut self, vehicle_type: &str) -> Self {
        vehicle_type.clone_into(&mut self.vehicle_type);
        self
    }

    /// Sets the vehicle color.
    #[must_use]
    pub fn with_color(mut self, color: &str) -> Self {
        color.clone_into(&mut self.color);
        self
    }

    /// Sets the model description.
    #[must_use]
    pub fn with_model(mut self, vehicle_desc: &str) -> Self {
        self.vehicle_desc = Some(vehicle_desc.to_owned());
        self
    }

    /// Sets the model year.
    #[must_use]
    pub const fn with_model_year(mut self, model_year: i32) -> Self {
        self.model_year = Some(model_year);
        self
    }

    /// Sets the region along with its population and density.
    #[must_use]
    pub fn with_region(
        mut self,
        region: &str,
        population: Option<f64>,
        density: Option<f64>,
    ) -> Self {
        region.clone_into(&mut self.region);
        self.population = population;
        self.density = density;
        self
    }

    /// Returns the value of a categorical facet for this record.
    #[must_use]
    pub fn facet_value(&self, facet: Facet) -> &str {
        match facet {
            Facet::Make => &self.make_name,
            Facet::VehicleType => &self.vehicle_type,
            Facet::Color => &self.color,
            Facet::Region => &self.region,
            Facet::MakeType => &self.make_type,
        }
    }

    /// Returns the value of a grouping field, or `None` if the field is
    /// missing for this record.
    #[must_use]
    pub fn group_value(&self, field: GroupField) -> Option<&str> {
        match field {
            GroupField::Model => self.vehicle_desc.as_deref(),
            GroupField::Make => Some(&self.make_name),
            GroupField::VehicleType => Some(&self.vehicle_type),
            GroupField::Color => Some(&self.color),
            GroupField::Region => Some(&self.region),
            GroupField::MakeType => Some(&self.make_type),
        }
    }
}

/// A categorical dimension the user can filter on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Facet {
    /// Vehicle manufacturer.
    Make,
    /// Vehicle body type.
    VehicleType,
    /// Vehicle color.
    Color,
    /// Region of the theft.
    Region,
    /// Make classification.
    MakeType,
}

impl Facet {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Make,
            Self::VehicleType,
            Self::Color,
            Self::Region,
            Self::MakeType,
        ]
    }

    /// Human-readable label for menus and table headers.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Make => "Make",
            Self::VehicleType => "Vehicle Type",
            Self::Color => "Color",
            Self::Region => "Region",
            Self::MakeType => "Make Type",
        }
    }
}

/// A field that frequency and cross-tabulation aggregations can group by.
///
/// Every [`Facet`] is a grouping field; [`GroupField::Model`] is the
/// free-text model description, which is groupable but not filterable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GroupField {
    /// Free-text model description.
    Model,
    /// Vehicle manufacturer.
    Make,
    /// Vehicle body type.
    VehicleType,
    /// Vehicle color.
    Color,
    /// Region of the theft.
    Region,
    /// Make classification.
    MakeType,
}

impl From<Facet> for GroupField {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::Make => Self::Make,
            Facet::VehicleType => Self::VehicleType,
            Facet::Color => Self::Color,
            Facet::Region => Self::Region,
            Facet::MakeType => Self::MakeType,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn new_record_uses_unknown_sentinel() {
        let record = IncidentRecord::new("1");
        for facet in Facet::all() {
            assert_eq!(record.facet_value(*facet), UNKNOWN);
        }
        assert!(record.group_value(GroupField::Model).is_none());
    }

    #[test]
    fn facet_and_group_field_agree() {
        let record = IncidentRecord::new("1")
            .with_make("Toyota", "Standard")
            .with_vehicle_type("Saloon")
            .with_color("Silver")
            .with_region("Auckland", Some(1_695_200.0), Some(343.09));

        for facet in Facet::all() {
            assert_eq!(
                record.group_value(GroupField::from(*facet)),
                Some(record.facet_value(*facet)),
                "{facet:?} disagrees with its group field"
            );
        }
    }

    #[test]
    fn facet_string_roundtrip() {
        for facet in Facet::all() {
            let parsed = Facet::from_str(facet.as_ref()).unwrap();
            assert_eq!(parsed, *facet);
        }
        assert_eq!(Facet::VehicleType.to_string(), "vehicle_type");
        assert!(Facet::from_str("engine").is_err());
    }
}
