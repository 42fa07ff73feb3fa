use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Supported archive kinds, keyed by filename suffix.
///
/// The table is open for extension: tar-family kinds are recognized here but
/// not active, so adding them is a matter of enabling a variant and its
/// opener rather than rewriting the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// Plain `.zip`
    Zip,
    /// Compound `.log.zip`, common for exported log bundles
    LogZip,
}

impl ArchiveKind {
    /// Suffix table in match order. Compound suffixes come first so
    /// `pack.log.zip` resolves to `LogZip`, not `Zip`.
    const TABLE: &'static [(&'static str, ArchiveKind)] = &[
        (".log.zip", ArchiveKind::LogZip),
        (".zip", ArchiveKind::Zip),
        // (".tar", ...), (".tar.gz", ...), (".tgz", ...) — disabled
    ];

    /// Detect the archive kind from a filename, returning the kind and the
    /// suffix that matched.
    pub fn detect(file_name: &str) -> Option<(ArchiveKind, &'static str)> {
        let lower = file_name.to_lowercase();
        Self::TABLE
            .iter()
            .find(|(suffix, _)| lower.ends_with(suffix))
            .map(|(suffix, kind)| (*kind, *suffix))
    }
}

/// Recursively expands zip-family archives found under an input root.
///
/// Each archive is extracted into a directory named after its stem (the
/// filename with the matched suffix removed), placed beside the archive or
/// under `output_dir` when one is set.
#[derive(Debug, Clone)]
pub struct ArchiveExpander {
    /// Extraction target root; `None` extracts beside each archive.
    pub output_dir: Option<PathBuf>,
    /// Re-apply expansion to freshly extracted directories.
    pub recursive: bool,
    /// Remove the source archive after successful extraction.
    pub delete_after: bool,
}

impl Default for ArchiveExpander {
    fn default() -> Self {
        Self {
            output_dir: None,
            recursive: true,
            delete_after: false,
        }
    }
}

impl ArchiveExpander {
    /// Walk `root` and extract every supported archive. Returns the number
    /// of archives extracted. Per-archive failures are logged and skipped;
    /// they never abort the walk.
    pub fn expand(&self, root: &Path) -> Result<usize> {
        let mut extracted = 0;

        // Snapshot the candidate list up front so directories created by
        // extraction are handled by the recursive call, not the live walk.
        let archives: Vec<PathBuf> = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .and_then(ArchiveKind::detect)
                    .is_some()
            })
            .map(|entry| entry.into_path())
            .collect();

        for archive_path in archives {
            match self.expand_one(&archive_path) {
                Ok(count) => extracted += count,
                Err(e) => {
                    tracing::warn!("skipping archive {}: {:#}", archive_path.display(), e);
                }
            }
        }

        Ok(extracted)
    }

    /// Extract a single archive and, when recursion is enabled, expand its
    /// contents with the same bound expander.
    fn expand_one(&self, archive_path: &Path) -> Result<usize> {
        let file_name = archive_path
            .file_name()
            .and_then(|n| n.to_str())
            .context("archive has a non-UTF8 filename")?;

        let (kind, suffix) = ArchiveKind::detect(file_name)
            .context("archive suffix no longer matches the supported table")?;
        let stem = &file_name[..file_name.len() - suffix.len()];

        let target = match &self.output_dir {
            Some(out) => out.join(stem),
            None => archive_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(stem),
        };

        let file = File::open(archive_path)
            .with_context(|| format!("opening archive {}", archive_path.display()))?;
        match kind {
            ArchiveKind::Zip | ArchiveKind::LogZip => {
                let mut archive = ZipArchive::new(file)
                    .with_context(|| format!("reading zip {}", archive_path.display()))?;
                archive
                    .extract(&target)
                    .with_context(|| format!("extracting into {}", target.display()))?;
            }
        }

        tracing::info!(
            "extracted {} -> {}",
            archive_path.display(),
            target.display()
        );

        let mut total = 1;

        if self.delete_after {
            std::fs::remove_file(archive_path)
                .with_context(|| format!("removing {}", archive_path.display()))?;
            tracing::info!("removed source archive {}", archive_path.display());
        }

        if self.recursive {
            total += self.expand(&target)?;
        }

        Ok(total)
    }
}
