mod builder;
mod chapters;
mod source;

pub use builder::{BitrateTier, Timeline};
pub use chapters::{format_timestamp, write_chapter_file};
pub use source::ChapterSource;
