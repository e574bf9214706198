//! Renderer-neutral tabular shape for derived tables.
//!
//! Every row type implements [`TableRow`] so a presentation layer can turn
//! any aggregation result into a [`DataTable`] (ordered named columns,
//! ordered rows) without knowing the concrete type.

use serde::{Deserialize, Serialize};

/// One cell of a [`DataTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Integral value (counts, years).
    Integer(i64),
    /// Real value (rates, coefficients).
    Float(f64),
    /// Categorical or label value.
    Text(String),
    /// A value that could not be computed. Serializes as `null`.
    Missing,
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        i64::try_from(value).map_or(Self::Float(value as f64), Self::Integer)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Self::Float(value)
        } else {
            Self::Missing
        }
    }
}

impl<T: Into<Self>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
            Self::Missing => write!(f, "N/A"),
        }
    }
}

/// A row type with a fixed, ordered set of columns.
pub trait TableRow {
    /// Column names, in cell order.
    const COLUMNS: &'static [&'static str];

    /// The row's cells, one per entry of [`Self::COLUMNS`].
    fn cells(&self) -> Vec<Cell>;
}

/// A titled table ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTable {
    /// Caption for the chart or table.
    pub title: String,
    /// Column names.
    pub columns: Vec<String>,
    /// Rows, each with one cell per column.
    pub rows: Vec<Vec<Cell>>,
}

impl DataTable {
    /// Builds a table from typed rows.
    #[must_use]
    pub fn from_rows<T: TableRow>(title: impl Into<String>, rows: &[T]) -> Self {
        Self {
            title: title.into(),
            columns: T::COLUMNS.iter().map(|c| (*c).to_owned()).collect(),
            rows: rows.iter().map(TableRow::cells).collect(),
        }
    }

    /// Builds a two-column `metric`/`value` table.
    #[must_use]
    pub fn key_values(title: impl Into<String>, pairs: Vec<(&str, Cell)>) -> Self {
        Self {
            title: title.into(),
            columns: vec!["metric".to_owned(), "value".to_owned()],
            rows: pairs
                .into_iter()
                .map(|(key, value)| vec![Cell::from(key), value])
                .collect(),
        }
    }

    /// Renames columns positionally. Extra names are ignored.
    #[must_use]
    pub fn with_columns(mut self, names: &[&str]) -> Self {
        for (column, name) in self.columns.iter_mut().zip(names) {
            (*name).clone_into(column);
        }
        self
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
