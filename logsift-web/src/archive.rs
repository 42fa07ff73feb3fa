use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package a directory tree into an in-memory zip, entry names relative to
/// `root` with forward slashes. An empty tree yields a valid empty zip.
pub fn zip_directory(root: &Path) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
    {
        let path = entry.path();
        let relative = path
            .strip_prefix(root)
            .with_context(|| format!("{} escaped the result root", path.display()))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            zip.add_directory(name.as_str(), options)
                .with_context(|| format!("adding directory {}", name))?;
        } else if entry.file_type().is_file() {
            zip.start_file(name.as_str(), options)
                .with_context(|| format!("adding file {}", name))?;
            let mut file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)?;
            zip.write_all(&buf)?;
        }
    }

    let cursor = zip.finish().context("finalizing result zip")?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use zip::ZipArchive;

    #[test]
    fn test_round_trip_of_a_small_tree() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.log"), "alpha\n").unwrap();
        fs::write(dir.path().join("sub/b.log"), "beta\n").unwrap();

        let bytes = zip_directory(dir.path()).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let mut names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.log", "sub/", "sub/b.log"]);

        let mut content = String::new();
        archive
            .by_name("sub/b.log")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "beta\n");
    }

    #[test]
    fn test_empty_tree_yields_valid_zip() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = zip_directory(dir.path()).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
