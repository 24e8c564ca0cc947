use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::Toolchain;
use crate::error::BuildError;
use crate::metadata::BookMetadata;
use crate::timeline::BitrateTier;

/// In-memory toolchain that records calls and writes placeholder files
#[derive(Debug, Default)]
pub struct FakeTools {
    /// Durations by file name; unknown files last one second
    pub durations: HashMap<String, f64>,
    /// Whether `extract_cover` finds embedded art
    pub embedded_cover: bool,
    /// Name of a call that should fail
    pub fail_on: Option<&'static str>,
    pub calls: RefCell<Vec<String>>,
    pub transcoded_at: RefCell<Option<BitrateTier>>,
    pub tagged: RefCell<Option<BookMetadata>>,
}

impl FakeTools {
    pub fn calls_named(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &'static str) -> Result<()> {
        self.calls.borrow_mut().push(name.to_string());
        if self.fail_on == Some(name) {
            return Err(BuildError::tool(name, "exit status: 1").into());
        }
        Ok(())
    }
}

impl Toolchain for FakeTools {
    fn probe_duration(&self, source: &Path) -> Result<f64> {
        self.record("probe_duration")?;
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(self.durations.get(&name).copied().unwrap_or(1.0))
    }

    fn concatenate(&self, _sources: &[PathBuf], dest: &Path) -> Result<PathBuf> {
        self.record("concatenate")?;
        fs::write(dest, b"merged")?;
        Ok(dest.to_path_buf())
    }

    fn transcode(&self, _input: &Path, output: &Path, bitrate: BitrateTier) -> Result<()> {
        self.record("transcode")?;
        *self.transcoded_at.borrow_mut() = Some(bitrate);
        fs::write(output, b"aac")?;
        Ok(())
    }

    fn mux_chapters(&self, _audio: &Path, chapters: &Path, output: &Path) -> Result<()> {
        self.record("mux_chapters")?;
        if !chapters.is_file() {
            bail!("chapter file missing");
        }
        fs::write(output, b"mp4")?;
        Ok(())
    }

    fn convert_chapters(&self, _container: &Path) -> Result<()> {
        self.record("convert_chapters")
    }

    fn write_tags(&self, _container: &Path, metadata: &BookMetadata) -> Result<()> {
        self.record("write_tags")?;
        *self.tagged.borrow_mut() = Some(metadata.clone());
        Ok(())
    }

    fn extract_cover(&self, _source: &Path, dest: &Path) -> Result<Option<PathBuf>> {
        self.record("extract_cover")?;
        if self.embedded_cover {
            fs::write(dest, b"png")?;
            Ok(Some(dest.to_path_buf()))
        } else {
            Ok(None)
        }
    }

    fn embed_cover(&self, _container: &Path, _cover: &Path) -> Result<()> {
        self.record("embed_cover")
    }
}
