use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::BuildError;

/// Hard input limit of the concatenation tool
pub const MAX_SOURCES: usize = 255;

/// Extension of the chapter files picked up by a directory scan
const SOURCE_EXTENSION: &str = "mp3";

/// Ordered source files for one book
#[derive(Debug, Clone)]
pub struct InputSet {
    /// Source files in chapter order
    pub sources: Vec<PathBuf>,
    /// Directory searched for conventional cover images
    pub base_dir: PathBuf,
    /// True when a single file was named; it is used without concatenation
    pub single_file: bool,
}

/// Resolve command line inputs into an ordered source list
///
/// No input scans the current directory; a single directory is scanned and
/// sorted by filename; files keep the order they were given in.
pub fn resolve_inputs(inputs: &[PathBuf]) -> Result<InputSet> {
    match inputs {
        [] => scan_source_dir(Path::new(".")),
        [dir] if dir.is_dir() => scan_source_dir(dir),
        [file] => {
            ensure_file(file)?;
            Ok(InputSet {
                sources: vec![file.clone()],
                base_dir: parent_dir(file),
                single_file: true,
            })
        }
        files => {
            ensure_within_limit(files.len())?;
            for file in files {
                ensure_file(file)?;
            }
            Ok(InputSet {
                sources: files.to_vec(),
                base_dir: parent_dir(&files[0]),
                single_file: false,
            })
        }
    }
}

/// List source files directly inside `dir`, sorted lexically by filename
pub fn scan_source_dir(dir: &Path) -> Result<InputSet> {
    let mut sources: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_source_file(e.path()))
        .map(|e| e.into_path())
        .collect();

    if sources.is_empty() {
        return Err(BuildError::NoSourcesFound {
            location: dir.to_path_buf(),
        }
        .into());
    }
    ensure_within_limit(sources.len())?;

    sources.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(InputSet {
        sources,
        base_dir: dir.to_path_buf(),
        single_file: false,
    })
}

fn ensure_within_limit(count: usize) -> Result<(), BuildError> {
    if count > MAX_SOURCES {
        return Err(BuildError::TooManySources {
            count,
            limit: MAX_SOURCES,
        });
    }
    Ok(())
}

fn ensure_file(path: &Path) -> Result<(), BuildError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BuildError::SourceNotFound(path.to_path_buf()))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Check if a path has the source extension (case-insensitive)
fn is_source_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase() == SOURCE_EXTENSION)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, b"").unwrap();
        path
    }

    fn build_error(result: Result<InputSet>) -> BuildError {
        result
            .unwrap_err()
            .downcast::<BuildError>()
            .expect("expected a BuildError")
    }

    #[test]
    fn test_is_source_file() {
        assert!(is_source_file(Path::new("/path/to/01.mp3")));
        assert!(is_source_file(Path::new("/path/to/01.MP3")));
        assert!(!is_source_file(Path::new("/path/to/cover.jpg")));
        assert!(!is_source_file(Path::new("/path/to/book")));
    }

    #[test]
    fn test_directory_scan_sorts_by_filename() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "02 - Second.mp3");
        touch(temp.path(), "10 - Tenth.MP3");
        touch(temp.path(), "01 - First.mp3");
        touch(temp.path(), "cover.jpg");
        fs::create_dir(temp.path().join("nested.mp3")).unwrap();

        let set = resolve_inputs(&[temp.path().to_path_buf()]).unwrap();
        let names: Vec<String> = set
            .sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["01 - First.mp3", "02 - Second.mp3", "10 - Tenth.MP3"]);
        assert_eq!(set.base_dir, temp.path());
        assert!(!set.single_file);
    }

    #[test]
    fn test_explicit_list_keeps_order() {
        let temp = TempDir::new().unwrap();
        let b = touch(temp.path(), "b.mp3");
        let a = touch(temp.path(), "a.mp3");

        let set = resolve_inputs(&[b.clone(), a.clone()]).unwrap();
        assert_eq!(set.sources, vec![b, a]);
        assert!(!set.single_file);
    }

    #[test]
    fn test_single_file_short_circuits() {
        let temp = TempDir::new().unwrap();
        let only = touch(temp.path(), "book.mp3");

        let set = resolve_inputs(&[only.clone()]).unwrap();
        assert_eq!(set.sources, vec![only]);
        assert!(set.single_file);
        assert_eq!(set.base_dir, temp.path());
    }

    #[test]
    fn test_empty_directory_fails() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "notes.txt");

        let err = build_error(resolve_inputs(&[temp.path().to_path_buf()]));
        assert!(matches!(err, BuildError::NoSourcesFound { .. }));
    }

    #[test]
    fn test_too_many_sources_in_directory() {
        let temp = TempDir::new().unwrap();
        for i in 0..256 {
            touch(temp.path(), &format!("{:03}.mp3", i));
        }

        let err = build_error(resolve_inputs(&[temp.path().to_path_buf()]));
        assert!(matches!(
            err,
            BuildError::TooManySources {
                count: 256,
                limit: 255
            }
        ));
    }

    #[test]
    fn test_too_many_sources_checked_before_existence() {
        let files: Vec<PathBuf> = (0..256)
            .map(|i| PathBuf::from(format!("/nonexistent/{:03}.mp3", i)))
            .collect();

        let err = build_error(resolve_inputs(&files));
        assert!(matches!(err, BuildError::TooManySources { count: 256, .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = build_error(resolve_inputs(&[
            PathBuf::from("/nonexistent/a.mp3"),
            PathBuf::from("/nonexistent/b.mp3"),
        ]));
        assert!(matches!(err, BuildError::SourceNotFound(_)));
    }

    #[test]
    fn test_directory_in_list_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "a.mp3");

        let err = build_error(resolve_inputs(&[file, temp.path().to_path_buf()]));
        assert!(matches!(err, BuildError::SourceNotFound(_)));
    }
}
