use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Book-level tags of the merged audiobook
///
/// Author and title are always non-empty; the optional fields use an empty
/// string when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub author: String,
    pub title: String,
    pub album: String,
    pub series: String,
    pub narrator: String,
    pub comment: String,
}

impl BookMetadata {
    pub fn builder() -> BookMetadataBuilder {
        BookMetadataBuilder::default()
    }

    pub fn has_series(&self) -> bool {
        !self.series.is_empty()
    }

    pub fn has_narrator(&self) -> bool {
        !self.narrator.is_empty()
    }

    pub fn has_comment(&self) -> bool {
        !self.comment.is_empty()
    }
}

/// Accumulates resolved field values and finalizes them once
#[derive(Debug, Clone, Default)]
pub struct BookMetadataBuilder {
    author: Option<String>,
    title: Option<String>,
    album: Option<String>,
    series: Option<String>,
    narrator: Option<String>,
    comment: Option<String>,
}

impl BookMetadataBuilder {
    pub fn author(mut self, value: Option<String>) -> Self {
        self.author = value;
        self
    }

    pub fn title(mut self, value: Option<String>) -> Self {
        self.title = value;
        self
    }

    pub fn album(mut self, value: Option<String>) -> Self {
        self.album = value;
        self
    }

    pub fn series(mut self, value: Option<String>) -> Self {
        self.series = value;
        self
    }

    pub fn narrator(mut self, value: Option<String>) -> Self {
        self.narrator = value;
        self
    }

    pub fn comment(mut self, value: Option<String>) -> Self {
        self.comment = value;
        self
    }

    /// Finalize the tag set. Album falls back to the title.
    pub fn build(self) -> Result<BookMetadata, BuildError> {
        let author = non_empty(self.author).ok_or(BuildError::MissingAuthor)?;
        let title = non_empty(self.title).unwrap_or_else(|| "Untitled".to_string());
        let album = non_empty(self.album).unwrap_or_else(|| title.clone());

        Ok(BookMetadata {
            author,
            title,
            album,
            series: non_empty(self.series).unwrap_or_default(),
            narrator: non_empty(self.narrator).unwrap_or_default(),
            comment: non_empty(self.comment).unwrap_or_default(),
        })
    }
}

/// Trim a candidate value, treating blank strings as absent
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
