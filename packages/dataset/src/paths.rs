//! Resolution of the source file path.

use std::path::PathBuf;

/// Environment variable that overrides the default data file location.
pub const DATA_PATH_ENV: &str = "THEFT_DASHBOARD_DATA";

/// File name used when neither a flag nor [`DATA_PATH_ENV`] is given.
pub const DEFAULT_DATA_FILE: &str = "stolen_vehicles_enhanced.csv";

/// Resolves the data file path.
///
/// An explicit path wins, then the [`DATA_PATH_ENV`] environment variable,
/// then [`DEFAULT_DATA_FILE`] relative to the working directory.
#[must_use]
pub fn resolve_data_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| {
            std::env::var(DATA_PATH_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = resolve_data_path(Some(PathBuf::from("/tmp/thefts.csv")));
        assert_eq!(path, PathBuf::from("/tmp/thefts.csv"));
    }
}
