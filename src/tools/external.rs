use anyhow::Result;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

use super::Toolchain;
use crate::config::{EncodeConfig, ToolsConfig};
use crate::error::BuildError;
use crate::metadata::{write_metadata, BookMetadata};
use crate::timeline::BitrateTier;

/// Toolchain backed by ffmpeg, ffprobe, mp3wrap, MP4Box, mp4chaps and mp4art
#[derive(Debug, Clone)]
pub struct ExternalTools {
    encode: EncodeConfig,
    tools: ToolsConfig,
}

impl ExternalTools {
    pub fn new(encode: EncodeConfig, tools: ToolsConfig) -> Self {
        Self { encode, tools }
    }

    /// Run a tool to completion, failing on spawn errors and non-zero exit
    fn run(&self, program: &str, args: &[&OsStr]) -> Result<Output, BuildError> {
        let output = self.spawn(program, args)?;

        if !output.status.success() {
            return Err(BuildError::tool(program, failure_detail(&output)));
        }

        Ok(output)
    }

    fn spawn(&self, program: &str, args: &[&OsStr]) -> Result<Output, BuildError> {
        debug!(
            "{} {}",
            program,
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    BuildError::tool(program, "executable not found")
                } else {
                    BuildError::tool(program, format!("failed to start: {}", e))
                }
            })
    }
}

impl Toolchain for ExternalTools {
    fn probe_duration(&self, source: &Path) -> Result<f64> {
        let output = self.run(
            &self.tools.ffprobe,
            &[
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-select_streams"),
                OsStr::new("a:0"),
                OsStr::new("-show_entries"),
                OsStr::new("packet=duration_time"),
                OsStr::new("-of"),
                OsStr::new("csv=p=0"),
                source.as_os_str(),
            ],
        )?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = sum_packet_durations(&stdout).ok_or_else(|| {
            BuildError::tool(
                &self.tools.ffprobe,
                format!("no audio packets in {}", source.display()),
            )
        })?;

        debug!("Duration of {}: {}", source.display(), duration);
        Ok(duration)
    }

    fn concatenate(&self, sources: &[PathBuf], dest: &Path) -> Result<PathBuf> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("-v"), dest.as_os_str()];
        args.extend(sources.iter().map(|p| p.as_os_str()));
        self.run(&self.tools.mp3wrap, &args)?;

        let merged = wrapped_output_path(dest);
        if !merged.is_file() {
            return Err(BuildError::tool(
                &self.tools.mp3wrap,
                format!("expected output {} was not created", merged.display()),
            )
            .into());
        }

        Ok(merged)
    }

    fn transcode(&self, input: &Path, output: &Path, bitrate: BitrateTier) -> Result<()> {
        let sample_rate = self.encode.sample_rate.to_string();
        let threads = self.encode.threads.to_string();

        self.run(
            &self.tools.ffmpeg,
            &[
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-y"),
                OsStr::new("-vn"),
                OsStr::new("-acodec"),
                OsStr::new(&self.encode.codec),
                OsStr::new("-ab"),
                OsStr::new(bitrate.as_str()),
                OsStr::new("-ar"),
                OsStr::new(&sample_rate),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                OsStr::new("-threads"),
                OsStr::new(&threads),
                output.as_os_str(),
            ],
        )?;
        Ok(())
    }

    fn mux_chapters(&self, audio: &Path, chapters: &Path, output: &Path) -> Result<()> {
        self.run(
            &self.tools.mp4box,
            &[
                OsStr::new("-add"),
                audio.as_os_str(),
                OsStr::new("-chap"),
                chapters.as_os_str(),
                output.as_os_str(),
            ],
        )?;
        Ok(())
    }

    fn convert_chapters(&self, container: &Path) -> Result<()> {
        self.run(
            &self.tools.mp4chaps,
            &[
                OsStr::new("--convert"),
                OsStr::new("--chapter-qt"),
                container.as_os_str(),
            ],
        )?;
        Ok(())
    }

    fn write_tags(&self, container: &Path, metadata: &BookMetadata) -> Result<()> {
        write_metadata(container, metadata)
    }

    fn extract_cover(&self, source: &Path, dest: &Path) -> Result<Option<PathBuf>> {
        // ffmpeg exits non-zero when the source has no picture stream; only
        // the produced file matters here.
        let output = match self.spawn(
            &self.tools.ffmpeg,
            &[OsStr::new("-i"), source.as_os_str(), OsStr::new("-y"), dest.as_os_str()],
        ) {
            Ok(output) => output,
            Err(e) => {
                debug!("Skipping cover extraction: {}", e);
                return Ok(None);
            }
        };

        if dest.is_file() {
            Ok(Some(dest.to_path_buf()))
        } else {
            debug!("Cover extraction produced nothing: {}", failure_detail(&output));
            Ok(None)
        }
    }

    fn embed_cover(&self, container: &Path, cover: &Path) -> Result<()> {
        self.run(
            &self.tools.mp4art,
            &[OsStr::new("--add"), cover.as_os_str(), container.as_os_str()],
        )?;
        Ok(())
    }
}

/// Sum per-packet durations printed by ffprobe, one value per line
///
/// Returns `None` when no packet carried a usable duration.
pub fn sum_packet_durations(listing: &str) -> Option<f64> {
    let mut total = 0.0_f64;
    let mut packets = 0usize;

    for line in listing.lines() {
        let value = line.trim().trim_end_matches(',');
        if let Ok(seconds) = value.parse::<f64>() {
            if seconds.is_finite() && seconds >= 0.0 {
                total += seconds;
                packets += 1;
            }
        }
    }

    (packets > 0).then_some(total)
}

/// mp3wrap appends `_MP3WRAP` to the stem of the requested output
fn wrapped_output_path(dest: &Path) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!("{}_MP3WRAP.mp3", stem))
}

fn failure_detail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
        Some(line) => format!("{} ({})", output.status, line.trim()),
        None => output.status.to_string(),
    }
}
