use serde::Serialize;
use std::path::{Path, PathBuf};

use super::format::{book_filename, sanitize_path_component, strip_known_prefix};
use crate::metadata::BookMetadata;

/// Final location of the merged book
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTarget {
    pub directory: PathBuf,
    pub filename: String,
}

impl OutputTarget {
    /// Compute the destination without touching the filesystem
    pub fn plan(metadata: &BookMetadata, output_dir: &Path, organize: bool) -> Self {
        let directory = if organize {
            output_dir.join(book_directory(metadata))
        } else {
            output_dir.to_path_buf()
        };

        Self {
            directory,
            filename: book_filename(metadata),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Directory of a book inside the organized tree, relative to the output root
///
/// - series, album equal to title: `author/series/<title without series prefix>`
/// - series, album differs from title: `author/series/album`
/// - no series: `author/album`
pub fn book_directory(metadata: &BookMetadata) -> PathBuf {
    let leaf = if !metadata.has_series() {
        vec![metadata.album.clone()]
    } else if metadata.album == metadata.title {
        vec![
            metadata.series.clone(),
            strip_known_prefix(&metadata.title, &metadata.series),
        ]
    } else {
        vec![metadata.series.clone(), metadata.album.clone()]
    };

    let mut path = PathBuf::from(sanitize_path_component(&metadata.author));
    for part in leaf {
        path.push(sanitize_path_component(&part));
    }
    path
}
