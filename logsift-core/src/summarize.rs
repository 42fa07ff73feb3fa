use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::progress::Progress;

/// Prefix marking generated summary files. Sorts before ordinary entries and
/// excludes the file from every future aggregation pass.
pub const SENTINEL_PREFIX: &str = "000_";
/// Suffix a file must carry to be an aggregation source.
pub const LOG_SUFFIX: &str = ".log";

pub const ROOT_SUMMARY_NAME: &str = "000_root_summary.log";
pub const DIR_SUMMARY_NAME: &str = "000_summary.log";
pub const TOTAL_SUMMARY_NAME: &str = "000_total_summary.log";

/// A file is eligible for aggregation when it ends in the log suffix and
/// does not carry the sentinel prefix. The sentinel exclusion is a hard
/// invariant: without it a second run re-aggregates its own artifacts.
fn is_eligible(name: &str) -> bool {
    name.ends_with(LOG_SUFFIX) && !name.starts_with(SENTINEL_PREFIX)
}

/// Eligible log files directly inside `dir`, sorted by name ascending.
fn eligible_log_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map_or(false, |t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(false, is_eligible)
        })
        .map(|entry| entry.path())
        .collect();
    files.sort_by_key(|p| p.file_name().map(|n| n.to_os_string()));
    Ok(files)
}

/// One summary block: the `--- source: ... ---` marker, the source file's
/// full content, and a blank-line separator.
fn render_block(name: &str, content: &str) -> String {
    format!("--- source: {} ---\n{}\n\n", name, content)
}

/// Read the sorted sources of one directory and render their blocks.
/// Empty and whitespace-only sources are skipped; unreadable sources are
/// logged and skipped.
fn collect_blocks(files: &[PathBuf]) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match fs::read(path) {
            Ok(bytes) => {
                let (content, _, _) = encoding_rs::UTF_8.decode(&bytes);
                if !content.trim().is_empty() {
                    blocks.push((name, content.into_owned()));
                }
            }
            Err(e) => {
                tracing::error!("skipping summary source {}: {}", path.display(), e);
            }
        }
    }
    blocks
}

/// Three-tier aggregation over a processed output tree: one summary per
/// populated directory, one for the root's own files, and a single total
/// summary concatenating everything.
///
/// Returns the number of summary files written. Per-summary write failures
/// are logged and skipped.
pub fn summarize_tree(output_root: &Path, progress: &dyn Progress) -> Result<usize> {
    let mut total_buffer = String::new();
    let mut written = 0;

    // Root level first: files directly in the output root.
    let root_files = eligible_log_files(output_root)?;
    let root_blocks = collect_blocks(&root_files);
    if !root_blocks.is_empty() {
        let path = output_root.join(ROOT_SUMMARY_NAME);
        let mut body = String::from("=== Root directory summary ===\n\n");
        for (name, content) in &root_blocks {
            body.push_str(&render_block(name, content));
            total_buffer.push_str("=== directory: <root> ===\n");
            total_buffer.push_str(&render_block(name, content));
        }
        match fs::write(&path, &body) {
            Ok(()) => {
                written += 1;
                progress.summary_written(&path);
            }
            Err(e) => tracing::error!("writing {}: {}", path.display(), e),
        }
    }

    // Every directory below the root, in walk order. Aggregation at each
    // stop is non-recursive: the walk supplies the recursion.
    for entry in WalkDir::new(output_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
    {
        let dir = entry.path();
        let files = match eligible_log_files(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::error!("skipping directory {}: {:#}", dir.display(), e);
                continue;
            }
        };
        let blocks = collect_blocks(&files);
        if blocks.is_empty() {
            continue;
        }

        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let path = dir.join(DIR_SUMMARY_NAME);
        let mut body = format!("=== Directory summary: {} ===\n\n", dir_name);
        for (name, content) in &blocks {
            body.push_str(&render_block(name, content));
            total_buffer.push_str(&format!("=== directory: {} ===\n", dir_name));
            total_buffer.push_str(&render_block(name, content));
        }
        match fs::write(&path, &body) {
            Ok(()) => {
                written += 1;
                progress.summary_written(&path);
            }
            Err(e) => tracing::error!("writing {}: {}", path.display(), e),
        }
    }

    // Single total summary: root blocks first, then directories in walk
    // order, exactly as accumulated.
    if !total_buffer.is_empty() {
        let path = output_root.join(TOTAL_SUMMARY_NAME);
        let body = format!("=== Total summary ===\n\n{}", total_buffer);
        match fs::write(&path, body) {
            Ok(()) => {
                written += 1;
                progress.summary_written(&path);
            }
            Err(e) => tracing::error!("writing {}: {}", path.display(), e),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    #[test]
    fn test_eligibility_rules() {
        assert!(is_eligible("app.log"));
        assert!(!is_eligible("app.txt"));
        assert!(!is_eligible("000_summary.log"));
        assert!(!is_eligible("000_root_summary.log"));
        assert!(!is_eligible("000_total_summary.log"));
    }

    #[test]
    fn test_root_only_tree() {
        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("b.log"), "beta\n").unwrap();
        fs::write(out.path().join("a.log"), "alpha\n").unwrap();

        let written = summarize_tree(out.path(), &NullProgress).unwrap();
        assert_eq!(written, 2); // root summary + total summary

        let root = fs::read_to_string(out.path().join(ROOT_SUMMARY_NAME)).unwrap();
        assert!(root.starts_with("=== Root directory summary ===\n\n"));
        // ascending name order
        let a_pos = root.find("--- source: a.log ---").unwrap();
        let b_pos = root.find("--- source: b.log ---").unwrap();
        assert!(a_pos < b_pos);

        let total = fs::read_to_string(out.path().join(TOTAL_SUMMARY_NAME)).unwrap();
        assert!(total.starts_with("=== Total summary ===\n\n"));
        assert!(total.contains("=== directory: <root> ===\n--- source: a.log ---\nalpha\n"));
    }

    #[test]
    fn test_directory_summaries_and_walk_order() {
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(out.path().join("svc-b")).unwrap();
        fs::create_dir_all(out.path().join("svc-a")).unwrap();
        fs::write(out.path().join("svc-b/x.log"), "bee\n").unwrap();
        fs::write(out.path().join("svc-a/y.log"), "ay\n").unwrap();

        let written = summarize_tree(out.path(), &NullProgress).unwrap();
        assert_eq!(written, 3); // two directory summaries + total

        assert!(out.path().join("svc-a").join(DIR_SUMMARY_NAME).is_file());
        assert!(out.path().join("svc-b").join(DIR_SUMMARY_NAME).is_file());
        // no root-level sources, so no root summary
        assert!(!out.path().join(ROOT_SUMMARY_NAME).exists());

        let total = fs::read_to_string(out.path().join(TOTAL_SUMMARY_NAME)).unwrap();
        let a_pos = total.find("=== directory: svc-a ===").unwrap();
        let b_pos = total.find("=== directory: svc-b ===").unwrap();
        assert!(a_pos < b_pos);
    }

    #[test]
    fn test_empty_sources_are_skipped() {
        let out = tempfile::tempdir().unwrap();
        fs::write(out.path().join("blank.log"), "   \n\n").unwrap();

        let written = summarize_tree(out.path(), &NullProgress).unwrap();
        assert_eq!(written, 0);
        assert!(!out.path().join(ROOT_SUMMARY_NAME).exists());
        assert!(!out.path().join(TOTAL_SUMMARY_NAME).exists());
    }

    #[test]
    fn test_second_run_does_not_compound() {
        let out = tempfile::tempdir().unwrap();
        fs::create_dir_all(out.path().join("sub")).unwrap();
        fs::write(out.path().join("root.log"), "r1\n").unwrap();
        fs::write(out.path().join("sub/s.log"), "s1\n").unwrap();

        summarize_tree(out.path(), &NullProgress).unwrap();
        let first = fs::read_to_string(out.path().join(TOTAL_SUMMARY_NAME)).unwrap();

        summarize_tree(out.path(), &NullProgress).unwrap();
        let second = fs::read_to_string(out.path().join(TOTAL_SUMMARY_NAME)).unwrap();

        assert_eq!(first, second);
    }
}
