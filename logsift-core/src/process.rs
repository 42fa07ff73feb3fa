use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::filter::FilterCriteria;
use crate::progress::Progress;

/// Default file pattern: plain `.log` files.
pub const DEFAULT_PATTERN: &str = "*.log";

/// Counters produced by a processing pass over one input tree.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ProcessStats {
    /// Candidate files enumerated under the input root.
    pub files_scanned: usize,
    /// Files that produced an output file (at least one matching line).
    pub files_matched: usize,
    /// Total lines written across all output files.
    pub lines_matched: usize,
}

/// Reduce a file pattern to its literal suffix.
///
/// This is deliberately not a glob engine: every `*` is stripped and the
/// remainder is matched as a trailing substring, so `*.log` means
/// "name ends with `.log`".
pub fn pattern_suffix(pattern: &str) -> String {
    pattern.replace('*', "")
}

/// Walk `input_root`, filter every candidate file's lines against
/// `criteria`, and write survivors to the mirrored path under `output_root`.
///
/// A file with zero matching lines produces no output file. Per-file errors
/// are reported through `progress` and never abort the batch.
pub fn process_tree(
    input_root: &Path,
    output_root: &Path,
    criteria: &FilterCriteria,
    pattern: &str,
    progress: &dyn Progress,
) -> Result<ProcessStats> {
    let suffix = pattern_suffix(pattern);
    let mut stats = ProcessStats::default();

    let candidates: Vec<PathBuf> = WalkDir::new(input_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(false, |name| name.ends_with(&suffix))
        })
        .map(|entry| entry.into_path())
        .collect();

    if candidates.is_empty() {
        tracing::warn!(
            "no files matching '{}' under {}",
            pattern,
            input_root.display()
        );
        return Ok(stats);
    }

    for path in candidates {
        stats.files_scanned += 1;
        match process_single_file(&path, input_root, output_root, criteria) {
            Ok(0) => {}
            Ok(lines) => {
                stats.files_matched += 1;
                stats.lines_matched += lines;
                progress.file_processed(&path, lines);
            }
            Err(e) => progress.file_failed(&path, &e),
        }
    }

    Ok(stats)
}

/// Filter one file. Returns the number of lines written, zero when nothing
/// matched (in which case no output file is created).
fn process_single_file(
    path: &Path,
    input_root: &Path,
    output_root: &Path,
    criteria: &FilterCriteria,
) -> Result<usize> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    // Lossy decode so one malformed byte sequence never drops the file.
    let (text, _, _) = encoding_rs::UTF_8.decode(&bytes);

    // split_inclusive keeps the original terminators on every line.
    let survivors: Vec<&str> = text
        .split_inclusive('\n')
        .filter(|line| criteria.matches(line))
        .collect();

    if survivors.is_empty() {
        return Ok(0);
    }

    let relative = path
        .strip_prefix(input_root)
        .with_context(|| format!("{} is outside the input root", path.display()))?;
    let output_path = output_root.join(relative);

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(&output_path, survivors.concat())
        .with_context(|| format!("writing {}", output_path.display()))?;

    Ok(survivors.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    fn run(
        input: &Path,
        output: &Path,
        keywords: &[&str],
        level: Option<&str>,
        pattern: &str,
    ) -> ProcessStats {
        let criteria = FilterCriteria::new(
            keywords.iter().map(|k| k.to_string()).collect(),
            level.map(str::to_string),
        );
        process_tree(input, output, &criteria, pattern, &NullProgress).unwrap()
    }

    #[test]
    fn test_pattern_suffix_strips_stars() {
        assert_eq!(pattern_suffix("*.log"), ".log");
        assert_eq!(pattern_suffix("*.txt"), ".txt");
        assert_eq!(pattern_suffix("app*.log"), "app.log");
        assert_eq!(pattern_suffix("*"), "");
    }

    #[test]
    fn test_mirrored_output_keeps_relative_paths() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::create_dir_all(input.path().join("svc/a")).unwrap();
        fs::write(
            input.path().join("svc/a/app.log"),
            "INFO start\nERROR fail\nINFO stop\n",
        )
        .unwrap();

        let stats = run(input.path(), output.path(), &["error"], None, "*.log");
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.files_matched, 1);
        assert_eq!(stats.lines_matched, 1);
        assert_eq!(
            fs::read_to_string(output.path().join("svc/a/app.log")).unwrap(),
            "ERROR fail\n"
        );
    }

    #[test]
    fn test_zero_match_file_is_not_mirrored() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("quiet.log"), "INFO ok\nINFO fine\n").unwrap();

        let stats = run(input.path(), output.path(), &["error"], None, "*.log");
        assert_eq!(stats.files_scanned, 1);
        assert_eq!(stats.files_matched, 0);
        assert!(!output.path().join("quiet.log").exists());
    }

    #[test]
    fn test_line_order_and_terminators_preserved() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(
            input.path().join("m.log"),
            "ERROR one\r\nINFO skip\nERROR two\nERROR three",
        )
        .unwrap();

        run(input.path(), output.path(), &["error"], None, "*.log");
        assert_eq!(
            fs::read_to_string(output.path().join("m.log")).unwrap(),
            "ERROR one\r\nERROR two\nERROR three"
        );
    }

    #[test]
    fn test_non_matching_extension_ignored() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("notes.txt"), "ERROR not a log\n").unwrap();

        let stats = run(input.path(), output.path(), &["error"], None, "*.log");
        assert_eq!(stats.files_scanned, 0);
    }

    #[test]
    fn test_empty_input_reports_noop() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let stats = run(input.path(), output.path(), &[], None, "*.log");
        assert_eq!(stats.files_scanned, 0);
        assert_eq!(stats.files_matched, 0);
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("bad.log"), b"ERROR broken \xff byte\n").unwrap();

        let stats = run(input.path(), output.path(), &["error"], None, "*.log");
        assert_eq!(stats.files_matched, 1);
        let written = fs::read_to_string(output.path().join("bad.log")).unwrap();
        assert!(written.starts_with("ERROR broken"));
    }
}
