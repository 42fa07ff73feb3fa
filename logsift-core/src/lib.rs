//! Core library for LogSift: filter a directory tree of log files against
//! keyword and log-level criteria, mirror the matches into an output tree,
//! and aggregate hierarchical summary files.
//!
//! The flow is fully sequential: archive expansion, then line filtering,
//! then summarization. No per-item failure is fatal to a run.

pub mod extract;
pub mod filter;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod summarize;

pub use extract::{ArchiveExpander, ArchiveKind};
pub use filter::FilterCriteria;
pub use pipeline::{run_pipeline, PipelineOptions, PipelineReport};
pub use process::{process_tree, ProcessStats, DEFAULT_PATTERN};
pub use progress::{NullProgress, Progress, TracingProgress};
pub use summarize::{
    summarize_tree, DIR_SUMMARY_NAME, ROOT_SUMMARY_NAME, SENTINEL_PREFIX, TOTAL_SUMMARY_NAME,
};
