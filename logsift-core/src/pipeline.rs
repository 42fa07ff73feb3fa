use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::extract::ArchiveExpander;
use crate::filter::FilterCriteria;
use crate::process::{process_tree, DEFAULT_PATTERN};
use crate::progress::Progress;
use crate::summarize::summarize_tree;

/// Everything configurable about one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Keyword OR-set; empty means no keyword constraint.
    pub keywords: Vec<String>,
    /// Log-level token; `None` means no level constraint.
    pub level: Option<String>,
    /// Simplified glob for candidate files (the `*` is stripped and the
    /// remainder matched as a trailing substring).
    pub pattern: String,
    /// Expand zip-family archives under the input root before processing.
    pub expand_archives: bool,
    /// Remove source archives after successful extraction.
    pub delete_archives: bool,
    /// Pause observed between processing and aggregation. `None` is a
    /// documented no-op; the CLI defaults this to one second to keep the
    /// original flow's observable pacing.
    pub settle_delay: Option<Duration>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            level: None,
            pattern: DEFAULT_PATTERN.to_string(),
            expand_archives: true,
            delete_archives: false,
            settle_delay: None,
        }
    }
}

/// Result counters for one pipeline run. Deterministic given identical
/// input-tree contents and identical criteria.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PipelineReport {
    pub files_scanned: usize,
    pub files_matched: usize,
    pub lines_matched: usize,
    pub archives_extracted: usize,
    pub summary_files_written: usize,
}

/// Run the full flow: expand archives in place, filter the tree into a
/// sparse mirror under `output_root`, then aggregate summaries.
///
/// Per-item failures (a corrupt archive, an unreadable file, a failed
/// summary write) are logged and skipped; every stage is always attempted.
/// Zero candidate files is a no-op, not an error, and skips aggregation.
pub fn run_pipeline(
    input_root: &Path,
    output_root: &Path,
    options: &PipelineOptions,
    progress: &dyn Progress,
) -> Result<PipelineReport> {
    if !input_root.exists() {
        fs::create_dir_all(input_root)
            .with_context(|| format!("creating input root {}", input_root.display()))?;
        tracing::warn!("input root {} did not exist, created", input_root.display());
    }
    if !output_root.exists() {
        fs::create_dir_all(output_root)
            .with_context(|| format!("creating output root {}", output_root.display()))?;
        tracing::warn!("output root {} did not exist, created", output_root.display());
    }

    let mut report = PipelineReport::default();

    if options.expand_archives {
        let expander = ArchiveExpander {
            output_dir: None,
            recursive: true,
            delete_after: options.delete_archives,
        };
        match expander.expand(input_root) {
            Ok(count) => {
                report.archives_extracted = count;
                if count > 0 {
                    progress.archive_extracted(count);
                }
            }
            Err(e) => tracing::error!("archive expansion failed: {:#}", e),
        }
    }

    let criteria = FilterCriteria::new(options.keywords.clone(), options.level.clone());
    let stats = process_tree(
        input_root,
        output_root,
        &criteria,
        &options.pattern,
        progress,
    )?;
    report.files_scanned = stats.files_scanned;
    report.files_matched = stats.files_matched;
    report.lines_matched = stats.lines_matched;

    if stats.files_scanned == 0 {
        return Ok(report);
    }

    if let Some(delay) = options.settle_delay {
        if !delay.is_zero() {
            tracing::info!("settling for {:?} before aggregation", delay);
            std::thread::sleep(delay);
        }
    }

    match summarize_tree(output_root, progress) {
        Ok(count) => report.summary_files_written = count,
        Err(e) => tracing::error!("summarization failed: {:#}", e),
    }

    Ok(report)
}
