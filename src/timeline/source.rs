use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::metadata::SourceTags;

/// One input chapter file with its measured duration and embedded tags
#[derive(Debug, Clone, Serialize)]
pub struct ChapterSource {
    pub path: PathBuf,
    /// Position in chapter order, starting at 0
    pub order_index: usize,
    pub duration_seconds: f64,
    pub embedded_title: Option<String>,
    pub embedded_artist: Option<String>,
    pub embedded_album: Option<String>,
    /// Bits per second
    pub embedded_bitrate: Option<u32>,
    pub embedded_picture: bool,
}

impl ChapterSource {
    pub fn new(order_index: usize, path: &Path, duration_seconds: f64, tags: SourceTags) -> Self {
        Self {
            path: path.to_path_buf(),
            order_index,
            duration_seconds,
            embedded_title: tags.title,
            embedded_artist: tags.artist,
            embedded_album: tags.album,
            embedded_bitrate: tags.bitrate,
            embedded_picture: tags.has_picture,
        }
    }

    /// Filename without its extension
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
