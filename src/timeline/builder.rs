use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::source::ChapterSource;

/// Embedded chapter titles longer than this are cut
pub const MAX_CHAPTER_TITLE_CHARS: usize = 90;

/// One chapter marker of the merged book
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterEntry {
    /// 1-based position
    pub index: usize,
    pub start_offset_seconds: f64,
    pub title: String,
}

/// Output encoding bitrate selected from a source bitrate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitrateTier {
    Low,
    Medium,
    #[default]
    High,
    Highest,
}

impl BitrateTier {
    pub fn from_bits_per_second(bps: u32) -> Self {
        if bps >= 160_000 {
            Self::Highest
        } else if bps >= 128_000 {
            Self::High
        } else if bps >= 96_000 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Encoder argument form, e.g. `128k`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "64k",
            Self::Medium => "96k",
            Self::High => "128k",
            Self::Highest => "160k",
        }
    }
}

impl fmt::Display for BitrateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BitrateTier {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordered chapter markers plus the aggregate values of the scan
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    pub entries: Vec<ChapterEntry>,
    pub total_seconds: f64,
    pub bitrate: BitrateTier,
}

impl Timeline {
    /// Scan sources in order, accumulating start offsets
    ///
    /// The bitrate tier is taken from the last source that reports a bitrate,
    /// not the highest one seen.
    pub fn build(sources: &[ChapterSource], force_filename_titles: bool) -> Self {
        let mut entries = Vec::with_capacity(sources.len());
        let mut offset = 0.0_f64;
        let mut bitrate = BitrateTier::default();

        for (i, source) in sources.iter().enumerate() {
            if let Some(bps) = source.embedded_bitrate {
                bitrate = BitrateTier::from_bits_per_second(bps);
            }

            let title = chapter_title(source, force_filename_titles);
            debug!(
                "Chapter: {}, length: {}, Title: {}",
                i + 1,
                source.duration_seconds,
                title
            );

            entries.push(ChapterEntry {
                index: i + 1,
                start_offset_seconds: offset,
                title,
            });
            offset += source.duration_seconds;
        }

        debug!("Bitrate tier: {}", bitrate);

        Self {
            entries,
            total_seconds: offset,
            bitrate,
        }
    }
}

/// Resolve the display title of one chapter
pub fn chapter_title(source: &ChapterSource, force_filename: bool) -> String {
    if force_filename {
        return source.base_name();
    }

    match &source.embedded_title {
        Some(title) if !title.trim().is_empty() => truncate_chars(title, MAX_CHAPTER_TITLE_CHARS),
        _ => source.base_name(),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SourceTags;
    use std::path::Path;

    fn source(index: usize, name: &str, duration: f64, title: Option<&str>) -> ChapterSource {
        ChapterSource::new(
            index,
            Path::new(name),
            duration,
            SourceTags {
                title: title.map(String::from),
                ..Default::default()
            },
        )
    }

    fn with_bitrate(index: usize, bps: Option<u32>) -> ChapterSource {
        ChapterSource::new(
            index,
            Path::new("chapter.mp3"),
            1.0,
            SourceTags {
                bitrate: bps,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_offsets_accumulate() {
        let sources = vec![
            source(0, "01.mp3", 10.5, None),
            source(1, "02.mp3", 20.25, None),
            source(2, "03.mp3", 5.0, None),
        ];

        let timeline = Timeline::build(&sources, false);
        let offsets: Vec<f64> = timeline
            .entries
            .iter()
            .map(|e| e.start_offset_seconds)
            .collect();

        assert_eq!(offsets, vec![0.0, 10.5, 30.75]);
        assert_eq!(timeline.total_seconds, 35.75);
        let indexes: Vec<usize> = timeline.entries.iter().map(|e| e.index).collect();
        assert_eq!(indexes, vec![1, 2, 3]);
    }

    #[test]
    fn test_offsets_never_decrease() {
        let durations = [0.0, 3.3, 0.0, 1234.567, 0.001, 59.999];
        let sources: Vec<ChapterSource> = durations
            .iter()
            .enumerate()
            .map(|(i, d)| source(i, "x.mp3", *d, None))
            .collect();

        let timeline = Timeline::build(&sources, false);
        assert_eq!(timeline.entries[0].start_offset_seconds, 0.0);
        for pair in timeline.entries.windows(2) {
            assert!(pair[0].start_offset_seconds <= pair[1].start_offset_seconds);
        }
    }

    #[test]
    fn test_empty_sources_give_empty_timeline() {
        let timeline = Timeline::build(&[], false);
        assert!(timeline.entries.is_empty());
        assert_eq!(timeline.total_seconds, 0.0);
        assert_eq!(timeline.bitrate, BitrateTier::High);
    }

    #[test]
    fn test_embedded_title_preferred() {
        let s = source(0, "/books/01 - File.mp3", 1.0, Some("The Beginning"));
        assert_eq!(chapter_title(&s, false), "The Beginning");
    }

    #[test]
    fn test_missing_title_falls_back_to_filename() {
        let s = source(0, "/books/01 - File.mp3", 1.0, None);
        assert_eq!(chapter_title(&s, false), "01 - File");

        let blank = source(0, "/books/02 - File.mp3", 1.0, Some("  "));
        assert_eq!(chapter_title(&blank, false), "02 - File");
    }

    #[test]
    fn test_forced_filename_title() {
        let s = source(0, "/books/01 - File.mp3", 1.0, Some("The Beginning"));
        assert_eq!(chapter_title(&s, true), "01 - File");
    }

    #[test]
    fn test_long_title_truncated_to_90_chars() {
        let long = "é".repeat(120);
        let s = source(0, "01.mp3", 1.0, Some(&long));
        let title = chapter_title(&s, false);
        assert_eq!(title.chars().count(), MAX_CHAPTER_TITLE_CHARS);

        let exact = "a".repeat(90);
        let s = source(0, "01.mp3", 1.0, Some(&exact));
        assert_eq!(chapter_title(&s, false), exact);
    }

    #[test]
    fn test_forced_filename_is_not_truncated() {
        let name = format!("{}.mp3", "n".repeat(100));
        let s = source(0, &name, 1.0, None);
        assert_eq!(chapter_title(&s, true).len(), 100);
    }

    #[test]
    fn test_bitrate_thresholds() {
        assert_eq!(BitrateTier::from_bits_per_second(320_000).as_str(), "160k");
        assert_eq!(BitrateTier::from_bits_per_second(160_000).as_str(), "160k");
        assert_eq!(BitrateTier::from_bits_per_second(159_999).as_str(), "128k");
        assert_eq!(BitrateTier::from_bits_per_second(128_000).as_str(), "128k");
        assert_eq!(BitrateTier::from_bits_per_second(96_000).as_str(), "96k");
        assert_eq!(BitrateTier::from_bits_per_second(95_999).as_str(), "64k");
        assert_eq!(BitrateTier::from_bits_per_second(0).as_str(), "64k");
    }

    #[test]
    fn test_last_file_bitrate_wins() {
        let sources = vec![
            with_bitrate(0, Some(192_000)),
            with_bitrate(1, Some(192_000)),
            with_bitrate(2, Some(64_000)),
        ];
        assert_eq!(Timeline::build(&sources, false).bitrate, BitrateTier::Low);

        let sources = vec![with_bitrate(0, Some(64_000)), with_bitrate(1, Some(128_000))];
        assert_eq!(Timeline::build(&sources, false).bitrate, BitrateTier::High);
    }

    #[test]
    fn test_unknown_bitrate_keeps_previous_tier() {
        let sources = vec![with_bitrate(0, Some(96_000)), with_bitrate(1, None)];
        assert_eq!(Timeline::build(&sources, false).bitrate, BitrateTier::Medium);
    }
}
