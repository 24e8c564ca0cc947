//! Cover art selection

use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::BuildError;
use crate::timeline::ChapterSource;
use crate::tools::Toolchain;

/// Conventional cover filenames, probed in this order
pub const COVER_CANDIDATES: &[&str] = &[
    "cover.jpg",
    "Cover.jpg",
    "folder.jpg",
    "Folder.jpg",
    "front.jpg",
    "Front.jpg",
    "cover.png",
    "Cover.png",
    "folder.png",
    "Folder.png",
    "front.png",
    "Front.png",
];

/// Where the selected cover came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum CoverArt {
    /// Image file that already exists on disk
    File(PathBuf),
    /// Image extracted from the first chapter into the scratch directory
    Extracted(PathBuf),
    /// Art embedded in this chapter source, left in place for a dry run
    FirstChapter(PathBuf),
}

impl CoverArt {
    /// Image file ready to embed; `None` until the art has been extracted
    pub fn image(&self) -> Option<&Path> {
        match self {
            Self::File(p) | Self::Extracted(p) => Some(p),
            Self::FirstChapter(_) => None,
        }
    }
}

/// Check an explicitly requested cover
pub fn check_explicit_cover(path: &Path) -> Result<(), BuildError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(BuildError::CoverNotFound(path.to_path_buf()))
    }
}

/// First conventional cover file present in `dir`
///
/// Candidates are matched by exact name; `cover.jpg` and `Cover.jpg` are
/// separate probes.
pub fn find_cover_in_dir(dir: &Path) -> Option<PathBuf> {
    COVER_CANDIDATES
        .iter()
        .find(|name| dir.join(name).is_file() && has_exact_entry(dir, name))
        .map(|name| dir.join(name))
}

/// True if `dir` holds an entry whose name is byte-for-byte `name`
fn has_exact_entry(dir: &Path, name: &str) -> bool {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .any(|e| e.file_name() == name)
        })
        .unwrap_or(false)
}

/// Select at most one cover image
///
/// Order: explicit path, conventional filenames in `base_dir`, then art
/// embedded in the first chapter source. Without `extract` the embedded art
/// is only reported, based on the source's tags.
pub fn resolve_cover(
    explicit: Option<&Path>,
    base_dir: &Path,
    first_source: Option<&ChapterSource>,
    scratch_dir: &Path,
    extract: bool,
    tools: &dyn Toolchain,
) -> Result<Option<CoverArt>> {
    if let Some(path) = explicit {
        check_explicit_cover(path)?;
        debug!("Cover file is {}", path.display());
        return Ok(Some(CoverArt::File(path.to_path_buf())));
    }

    if let Some(path) = find_cover_in_dir(base_dir) {
        debug!("Found cover {}", path.display());
        return Ok(Some(CoverArt::File(path)));
    }

    let Some(source) = first_source else {
        return Ok(None);
    };

    if !extract {
        return Ok(source
            .embedded_picture
            .then(|| CoverArt::FirstChapter(source.path.clone())));
    }

    let extracted = tools.extract_cover(&source.path, &scratch_dir.join("cover.png"))?;
    match &extracted {
        Some(path) => debug!("Extracted cover to {}", path.display()),
        None => debug!("No embedded cover in {}", source.path.display()),
    }

    Ok(extracted.map(CoverArt::Extracted))
}
