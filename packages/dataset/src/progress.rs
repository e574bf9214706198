//! Progress reporting for dataset loads.
//!
//! The loader only knows about the [`ProgressCallback`] trait; rendering
//! backends (e.g. `indicatif` spinners) are provided by the binaries.

use std::sync::Arc;

/// Trait for reporting progress while rows are read from the source file.
pub trait ProgressCallback: Send + Sync {
    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// A no-op implementation of [`ProgressCallback`].
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance for convenient use.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
