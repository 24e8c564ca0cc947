use lofty::prelude::*;
use std::path::Path;
use tracing::debug;

/// Tags read from one source chapter file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Audio bitrate in bits per second
    pub bitrate: Option<u32>,
    /// Tag carries at least one embedded picture
    pub has_picture: bool,
}

/// Read the tags of a source file
///
/// Never fails: an unreadable file or a missing tag yields absent values.
pub fn read_source_tags(path: &Path) -> SourceTags {
    let tagged = match lofty::read_from_path(path) {
        Ok(file) => file,
        Err(e) => {
            debug!("No readable tags in {}: {}", path.display(), e);
            return SourceTags::default();
        }
    };

    let bitrate = tagged
        .properties()
        .audio_bitrate()
        .filter(|kbps| *kbps > 0)
        .map(|kbps| kbps * 1000);

    let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) else {
        debug!("{} has no tag", path.display());
        return SourceTags {
            bitrate,
            ..Default::default()
        };
    };

    SourceTags {
        title: text(tag.title()),
        artist: text(tag.artist()),
        album: text(tag.album()),
        bitrate,
        has_picture: !tag.pictures().is_empty(),
    }
}

fn text(value: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    let s = value?.trim().to_string();
    (!s.is_empty()).then_some(s)
}
