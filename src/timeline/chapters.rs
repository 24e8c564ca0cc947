use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use super::builder::ChapterEntry;

/// Render an offset in seconds as `HH:MM:SS.mmm`
///
/// Milliseconds are the first three decimal digits of the value, so they are
/// truncated rather than rounded.
pub fn format_timestamp(seconds: f64) -> String {
    let rendered = seconds.max(0.0).to_string();
    let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let whole: u64 = whole.parse().unwrap_or(0);
    let millis: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(3)
        .collect();

    format!(
        "{:02}:{:02}:{:02}.{}",
        whole / 3600,
        (whole % 3600) / 60,
        whole % 60,
        millis
    )
}

/// Render the chapter definition consumed by the muxer
///
/// Each chapter is a `CHAPTER<n>=<timestamp>` / `CHAPTER<n>NAME=<title>` pair.
pub fn render_chapter_file(entries: &[ChapterEntry]) -> String {
    let mut output = String::new();

    for entry in entries {
        let title = entry.title.replace(['\r', '\n'], " ");
        let _ = writeln!(
            output,
            "CHAPTER{}={}",
            entry.index,
            format_timestamp(entry.start_offset_seconds)
        );
        let _ = writeln!(output, "CHAPTER{}NAME={}", entry.index, title);
    }

    output
}

pub fn write_chapter_file(path: &Path, entries: &[ChapterEntry]) -> Result<()> {
    std::fs::write(path, render_chapter_file(entries))
        .with_context(|| format!("Failed to write chapter file {:?}", path))
}
