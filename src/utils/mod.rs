use std::path::{Path, PathBuf};

use log::{debug, warn};
use walkdir::WalkDir;

/// Find all files with a specific extension, sorted by path
pub fn find_files_by_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", dir.display(), err);
                None
            }
        })
        .filter(|e| {
            e.file_type().is_file() &&
            e.path().extension()
                .map(|ext| ext.to_string_lossy().to_lowercase() == extension)
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

/// Expand directories into the XML files they contain; files are kept as given.
pub fn expand_sources(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for source in sources {
        if source.is_dir() {
            let found = find_files_by_extension(source, "xml");
            debug!("Found {} XML files in {}", found.len(), source.display());
            expanded.extend(found);
        } else {
            expanded.push(source.clone());
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_walk_errors_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");
        assert!(find_files_by_extension(&missing, "xml").is_empty());
    }

    #[test]
    fn test_expand_sources_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.xml"), "<a/>").unwrap();
        std::fs::write(dir.path().join("a.XML"), "<a/>").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();
        std::fs::write(dir.path().join("nested/c.xml"), "<a/>").unwrap();

        let single = PathBuf::from("missing.xml");
        let expanded = expand_sources(&[single.clone(), dir.path().to_path_buf()]);

        assert_eq!(
            expanded,
            vec![
                single,
                dir.path().join("a.XML"),
                dir.path().join("b.xml"),
                dir.path().join("nested/c.xml"),
            ]
        );
    }
}
