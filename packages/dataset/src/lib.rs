#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loader for the vehicle theft incident table.
//!
//! Reads the source CSV once, normalizes every cell into an
//! [`IncidentRecord`], and exposes the result as an immutable [`Dataset`].
//! [`cache::DatasetCache`] wraps the loader so a session reads the file at
//! most once until it is explicitly invalidated.

pub mod cache;
pub mod parsing;
pub mod paths;
pub mod progress;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use theft_dashboard_incident_models::IncidentRecord;
use thiserror::Error;

use crate::progress::ProgressCallback;

/// Header names the source file must provide.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "vehicle_id",
    "date_stolen",
    "make_name",
    "vehicle_type",
    "color",
    "vehicle_desc",
    "model_year",
    "make_type",
    "region",
    "population",
    "density",
];

/// Errors that make the dataset unavailable.
///
/// All of these are fatal for a session: no partial dashboard is rendered.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The source file does not exist.
    #[error("Source file not found: {}", path.display())]
    SourceNotFound {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// The source file exists but could not be read.
    #[error("Source file {} could not be read: {source}", path.display())]
    SourceUnreadable {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The header row lacks a required column.
    #[error("Source file is missing required column '{column}'")]
    MissingColumn {
        /// Name of the absent column.
        column: String,
    },

    /// The CSV structure itself is malformed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// The immutable base dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<IncidentRecord>,
}

impl Dataset {
    /// Builds a dataset from already-normalized records.
    ///
    /// Records whose identifier repeats an earlier one are dropped, keeping
    /// the first occurrence.
    #[must_use]
    pub fn from_records(records: Vec<IncidentRecord>) -> Self {
        let mut seen = BTreeSet::new();
        let mut kept = Vec::with_capacity(records.len());
        for record in records {
            if seen.insert(record.vehicle_id.clone()) {
                kept.push(record);
            } else {
                log::warn!(
                    "Dropping record with duplicate vehicle_id '{}'",
                    record.vehicle_id
                );
            }
        }
        Self { records: kept }
    }

    /// All records in source order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One row of the source file before normalization.
#[derive(Debug, Deserialize)]
struct RawIncidentRow {
    vehicle_id: Option<String>,
    date_stolen: Option<String>,
    make_name: Option<String>,
    vehicle_type: Option<String>,
    color: Option<String>,
    vehicle_desc: Option<String>,
    model_year: Option<String>,
    make_type: Option<String>,
    region: Option<String>,
    population: Option<String>,
    density: Option<String>,
}

/// Per-field counts of values that failed coercion.
#[derive(Debug, Default)]
struct CoercionStats {
    dates: u64,
    model_years: u64,
    populations: u64,
    densities: u64,
}

impl CoercionStats {
    fn track<T>(counter: &mut u64, raw: Option<&str>, parsed: Option<T>) -> Option<T> {
        if parsed.is_none() && parsing::non_missing(raw).is_some() {
            *counter += 1;
        }
        parsed
    }
}

impl RawIncidentRow {
    fn normalize(self, line: u64, stats: &mut CoercionStats) -> IncidentRecord {
        let vehicle_id = parsing::non_missing(self.vehicle_id.as_deref())
            .map_or_else(|| format!("row-{line}"), ToOwned::to_owned);

        let date_stolen = CoercionStats::track(
            &mut stats.dates,
            self.date_stolen.as_deref(),
            parsing::parse_date(self.date_stolen.as_deref()),
        );
        let model_year = CoercionStats::track(
            &mut stats.model_years,
            self.model_year.as_deref(),
            parsing::parse_model_year(self.model_year.as_deref()),
        );
        let population = CoercionStats::track(
            &mut stats.populations,
            self.population.as_deref(),
            parsing::parse_grouped_number(self.population.as_deref()),
        );
        let density = CoercionStats::track(
            &mut stats.densities,
            self.density.as_deref(),
            parsing::parse_grouped_number(self.density.as_deref()),
        );

        IncidentRecord {
            vehicle_id,
            date_stolen,
            make_name: parsing::categorical(self.make_name.as_deref()),
            vehicle_type: parsing::categorical(self.vehicle_type.as_deref()),
            color: parsing::categorical(self.color.as_deref()),
            vehicle_desc: parsing::non_missing(self.vehicle_desc.as_deref()).map(ToOwned::to_owned),
            model_year,
            make_type: parsing::categorical(self.make_type.as_deref()),
            region: parsing::categorical(self.region.as_deref()),
            population,
            density,
        }
    }
}

/// Loads the dataset from a CSV file.
///
/// # Errors
///
/// * [`DatasetError::SourceNotFound`] if `path` does not exist
/// * [`DatasetError::SourceUnreadable`] if it cannot be opened
/// * [`DatasetError::MissingColumn`] / [`DatasetError::Csv`] if the contents
///   are not a usable incident table
pub fn load(path: &Path, progress: &Arc<dyn ProgressCallback>) -> Result<Dataset, DatasetError> {
    let file = std::fs::File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DatasetError::SourceNotFound {
                path: path.to_path_buf(),
            }
        } else {
            DatasetError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    log::info!("Loading incidents from {}", path.display());
    load_from_reader(file, progress)
}

/// Loads the dataset from any CSV reader.
///
/// # Errors
///
/// Returns [`DatasetError::MissingColumn`] if the header row lacks a
/// required column, or [`DatasetError::Csv`] if the CSV is malformed.
pub fn load_from_reader<R: Read>(
    reader: R,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<Dataset, DatasetError> {
    let start = Instant::now();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(DatasetError::MissingColumn {
                column: (*column).to_owned(),
            });
        }
    }

    progress.set_message("Reading incidents".to_owned());

    let mut stats = CoercionStats::default();
    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<RawIncidentRow>().enumerate() {
        let row = result?;
        // Header is line 1.
        let line = i as u64 + 2;
        records.push(row.normalize(line, &mut stats));
        progress.inc(1);
    }

    log::debug!(
        "Coercion failures: {} dates, {} model years, {} populations, {} densities",
        stats.dates,
        stats.model_years,
        stats.populations,
        stats.densities
    );

    let dataset = Dataset::from_records(records);
    progress.finish(format!("Loaded {} incidents", dataset.len()));
    log::info!(
        "Loaded {} incidents in {:.2?}",
        dataset.len(),
        start.elapsed()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use theft_dashboard_incident_models::UNKNOWN;

    use super::*;
    use crate::progress::null_progress;

    const HEADER: &str = "vehicle_id,date_stolen,make_name,vehicle_type,color,vehicle_desc,model_year,make_type,region,population,density\n";

    fn load_str(body: &str) -> Result<Dataset, DatasetError> {
        let csv = format!("{HEADER}{body}");
        load_from_reader(csv.as_bytes(), &null_progress())
    }

    #[test]
    fn normalizes_a_complete_row() {
        let dataset = load_str(
            "1,2021-11-05,Toyota,Saloon,Silver,COROLLA,2005,Standard,Auckland,\"1,695,200\",343.09\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.vehicle_id, "1");
        assert_eq!(record.date_stolen, NaiveDate::from_ymd_opt(2021, 11, 5));
        assert_eq!(record.make_name, "Toyota");
        assert_eq!(record.vehicle_desc.as_deref(), Some("COROLLA"));
        assert_eq!(record.model_year, Some(2005));
        assert_eq!(record.population, Some(1_695_200.0));
        assert_eq!(record.density, Some(343.09));
    }

    #[test]
    fn fills_missing_categoricals_with_unknown() {
        let dataset = load_str("1,2021-11-05,,,,,,,,,\n").unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.make_name, UNKNOWN);
        assert_eq!(record.vehicle_type, UNKNOWN);
        assert_eq!(record.color, UNKNOWN);
        assert_eq!(record.make_type, UNKNOWN);
        assert_eq!(record.region, UNKNOWN);
        assert!(record.vehicle_desc.is_none());
        assert!(record.model_year.is_none());
    }

    #[test]
    fn bad_values_become_missing_and_row_is_kept() {
        let dataset = load_str(
            "1,yesterday,Toyota,Saloon,Silver,COROLLA,old,Standard,Auckland,lots,dense\n",
        )
        .unwrap();
        let record = &dataset.records()[0];
        assert!(record.date_stolen.is_none());
        assert!(record.model_year.is_none());
        assert!(record.population.is_none());
        assert!(record.density.is_none());
        assert_eq!(record.make_name, "Toyota");
    }

    #[test]
    fn drops_duplicate_identifiers() {
        let dataset = load_str(
            "1,2021-11-05,Toyota,,,,,,,,\n1,2021-11-06,Mazda,,,,,,,,\n2,2021-11-07,Ford,,,,,,,,\n",
        )
        .unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].make_name, "Toyota");
        assert_eq!(dataset.records()[1].vehicle_id, "2");
    }

    #[test]
    fn empty_identifier_gets_row_number() {
        let dataset = load_str(",2021-11-05,Toyota,,,,,,,,\n,2021-11-05,Mazda,,,,,,,,\n").unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].vehicle_id, "row-2");
        assert_eq!(dataset.records()[1].vehicle_id, "row-3");
    }

    #[test]
    fn missing_column_is_rejected() {
        let csv = "vehicle_id,date_stolen\n1,2021-11-05\n";
        let err = load_from_reader(csv.as_bytes(), &null_progress()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn { ref column } if column == "make_name"
        ));
    }

    #[test]
    fn empty_table_loads_as_empty_dataset() {
        let dataset = load_str("").unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let path = std::env::temp_dir().join(format!("{}.csv", uuid::Uuid::new_v4()));
        let err = load(&path, &null_progress()).unwrap_err();
        assert!(matches!(err, DatasetError::SourceNotFound { .. }));
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: std::sync::Mutex<Vec<String>>,
    }

    impl ProgressCallback for RecordingProgress {
        fn inc(&self, delta: u64) {
            self.events.lock().unwrap().push(format!("inc {delta}"));
        }

        fn set_message(&self, msg: String) {
            self.events.lock().unwrap().push(format!("message {msg}"));
        }

        fn finish(&self, msg: String) {
            self.events.lock().unwrap().push(format!("finish {msg}"));
        }
    }

    #[test]
    fn reports_one_tick_per_row() {
        let recorder = Arc::new(RecordingProgress::default());
        let progress: Arc<dyn ProgressCallback> = recorder.clone();
        let csv = format!(
            "{HEADER}1,2021-11-05,Toyota,Saloon,Silver,Corolla,2005,Standard,Auckland,\"1,695,200\",343.09\n\
             2,2021-11-06,Mazda,Hatchback,Red,Demio,2008,Standard,Otago,\"246,000\",7.89\n"
        );
        load_from_reader(csv.as_bytes(), &progress).unwrap();

        assert_eq!(
            *recorder.events.lock().unwrap(),
            [
                "message Reading incidents",
                "inc 1",
                "inc 1",
                "finish Loaded 2 incidents",
            ]
        );
    }
}
