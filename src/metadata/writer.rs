use crate::metadata::BookMetadata;
use anyhow::{Context, Result};
use std::path::Path;

/// Write book tags to a finished m4b container
pub fn write_metadata(path: &Path, metadata: &BookMetadata) -> Result<()> {
    let mut tag = mp4ameta::Tag::read_from_path(path)
        .with_context(|| format!("Failed to read m4b file for tagging: {}", path.display()))?;

    tag.set_title(&metadata.title);
    tag.set_album(&metadata.album);
    tag.set_artist(&metadata.author);

    if metadata.has_comment() {
        tag.set_comment(&metadata.comment);
    }

    // Narrator goes both to the freeform iTunes atom and the writer atom
    if metadata.has_narrator() {
        let narrator_ident = mp4ameta::FreeformIdent::new("com.apple.iTunes", "NARRATOR");
        tag.set_data(narrator_ident, mp4ameta::Data::Utf8(metadata.narrator.clone()));
        tag.set_composer(&metadata.narrator);
    }

    // Series (TV show name)
    if metadata.has_series() {
        tag.set_tv_show_name(&metadata.series);
    }

    tag.write_to_path(path)
        .with_context(|| format!("Failed to write metadata to: {}", path.display()))?;

    Ok(())
}
