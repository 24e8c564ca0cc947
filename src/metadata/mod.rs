mod fields;
mod reader;
mod resolver;
mod writer;

pub use fields::BookMetadata;
pub use reader::{read_source_tags, SourceTags};
pub use resolver::{resolve_metadata, MetadataOverrides};
pub use writer::write_metadata;
