use std::path::Path;

/// Observer for pipeline progress events.
///
/// The core reports through this seam instead of printing, so callers decide
/// whether progress goes to a console, a tracing subscriber, or nowhere.
pub trait Progress {
    fn archive_extracted(&self, _count: usize) {}
    fn file_processed(&self, _path: &Path, _lines_matched: usize) {}
    fn file_failed(&self, _path: &Path, _error: &anyhow::Error) {}
    fn summary_written(&self, _path: &Path) {}
}

/// Discards all events. Useful in tests and embedded callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl Progress for NullProgress {}

/// Forwards events to the `tracing` subscriber. Used by the binaries.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn archive_extracted(&self, count: usize) {
        tracing::info!("extracted {} archive(s)", count);
    }

    fn file_processed(&self, path: &Path, lines_matched: usize) {
        tracing::info!(
            "processed {}: {} matching line(s)",
            path.display(),
            lines_matched
        );
    }

    fn file_failed(&self, path: &Path, error: &anyhow::Error) {
        tracing::error!("failed to process {}: {:#}", path.display(), error);
    }

    fn summary_written(&self, path: &Path) {
        tracing::info!("wrote summary {}", path.display());
    }
}
