//! External collaborators of the build pipeline
//!
//! Everything that decodes, encodes, muxes or tags audio goes through
//! [`Toolchain`], so the ordering and metadata logic can run against fakes.

mod external;
#[cfg(test)]
pub mod testing;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::metadata::BookMetadata;
use crate::timeline::BitrateTier;

pub use external::ExternalTools;

pub trait Toolchain {
    /// Precise duration in seconds, measured from the audio stream itself
    fn probe_duration(&self, source: &Path) -> Result<f64>;

    /// Merge ordered sources into one stream written next to `dest`.
    /// Returns the path of the merged file.
    fn concatenate(&self, sources: &[PathBuf], dest: &Path) -> Result<PathBuf>;

    /// Encode `input` to AAC in an mp4 wrapper
    fn transcode(&self, input: &Path, output: &Path, bitrate: BitrateTier) -> Result<()>;

    /// Build the container from the encoded stream and the chapter file
    fn mux_chapters(&self, audio: &Path, chapters: &Path, output: &Path) -> Result<()>;

    /// Rewrite chapter markers in the player-compatible format
    fn convert_chapters(&self, container: &Path) -> Result<()>;

    fn write_tags(&self, container: &Path, metadata: &BookMetadata) -> Result<()>;

    /// Pull embedded art out of `source`. `Ok(None)` means there was none.
    fn extract_cover(&self, source: &Path, dest: &Path) -> Result<Option<PathBuf>>;

    fn embed_cover(&self, container: &Path, cover: &Path) -> Result<()>;
}
