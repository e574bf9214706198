//! Lazily-loaded, explicitly invalidated holder for the base dataset.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::progress::{ProgressCallback, null_progress};
use crate::{Dataset, DatasetError, load};

struct Loaded {
    dataset: Arc<Dataset>,
    modified: Option<SystemTime>,
}

/// Caches the result of [`load`] for one source file.
///
/// The first [`get`](Self::get) reads the file; later calls return the same
/// `Arc` until [`invalidate`](Self::invalidate) is called.
pub struct DatasetCache {
    path: PathBuf,
    progress: Arc<dyn ProgressCallback>,
    loaded: Option<Loaded>,
}

impl DatasetCache {
    /// Creates an empty cache for `path`. Nothing is read until
    /// [`get`](Self::get).
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            progress: null_progress(),
            loaded: None,
        }
    }

    /// Reports load progress to `progress` instead of discarding it.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    /// Path of the backing source file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a dataset is currently held.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    /// Returns the cached dataset, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the source has to be read and cannot be.
    /// A failed load leaves the cache empty.
    pub fn get(&mut self) -> Result<Arc<Dataset>, DatasetError> {
        if let Some(loaded) = &self.loaded {
            return Ok(Arc::clone(&loaded.dataset));
        }

        let dataset = Arc::new(load(&self.path, &self.progress)?);
        self.loaded = Some(Loaded {
            dataset: Arc::clone(&dataset),
            modified: modified_time(&self.path),
        });
        Ok(dataset)
    }

    /// Drops the cached dataset so the next [`get`](Self::get) re-reads the
    /// source.
    pub fn invalidate(&mut self) {
        if self.loaded.take().is_some() {
            log::debug!("Invalidated dataset cache for {}", self.path.display());
        }
    }

    /// Invalidates the cache if the source file's modification time differs
    /// from the one recorded at load. Returns `true` if it did.
    pub fn refresh_if_changed(&mut self) -> bool {
        let Some(loaded) = &self.loaded else {
            return false;
        };
        if modified_time(&self.path) == loaded.modified {
            return false;
        }
        log::info!("{} changed on disk, reloading", self.path.display());
        self.invalidate();
        true
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
