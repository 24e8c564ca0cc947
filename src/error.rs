use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort a build
///
/// Per-file tag read failures are not represented here: a missing or corrupt
/// tag degrades to an absent value instead of failing the run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No source files found in {}", .location.display())]
    NoSourcesFound { location: PathBuf },

    #[error("Too many source files: {count} (concatenation accepts at most {limit})")]
    TooManySources { count: usize, limit: usize },

    #[error("Source is not an existing file: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Cover ({}) does not exist", .0.display())]
    CoverNotFound(PathBuf),

    #[error("No author found in source tags; use --author to set one")]
    MissingAuthor,

    #[error("{tool} failed: {detail}")]
    ExternalToolFailure { tool: String, detail: String },

    #[error("Failed to create destination directory {}", .path.display())]
    DestinationCreateFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl BuildError {
    pub fn tool(tool: &str, detail: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            tool: tool.to_string(),
            detail: detail.into(),
        }
    }
}
