use crate::error::BuildError;
use crate::metadata::fields::non_empty;
use crate::metadata::BookMetadata;
use crate::timeline::ChapterSource;

/// Values supplied on the command line; each one beats any tag
#[derive(Debug, Clone, Default)]
pub struct MetadataOverrides {
    pub author: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub series: Option<String>,
    pub narrator: Option<String>,
    pub comment: Option<String>,
}

type Lookup<'a> = Box<dyn Fn() -> Option<String> + 'a>;

/// Evaluate lookups in order and keep the first non-empty value
fn first_present(chain: &[Lookup<'_>]) -> Option<String> {
    chain.iter().find_map(|lookup| non_empty(lookup()))
}

/// First source, in chapter order, whose tag is present and non-empty
fn first_tagged<'a>(
    sources: &'a [ChapterSource],
    field: fn(&ChapterSource) -> &Option<String>,
) -> Lookup<'a> {
    Box::new(move || sources.iter().find_map(|s| non_empty(field(s).clone())))
}

/// Base name of the first chapter file
fn first_filename(sources: &[ChapterSource]) -> Lookup<'_> {
    Box::new(move || sources.first().map(ChapterSource::base_name))
}

fn explicit(value: &Option<String>) -> Lookup<'_> {
    Box::new(move || value.clone())
}

/// Resolve book-level tags from overrides, source tags and filenames
pub fn resolve_metadata(
    overrides: &MetadataOverrides,
    sources: &[ChapterSource],
) -> Result<BookMetadata, BuildError> {
    let author = first_present(&[
        explicit(&overrides.author),
        first_tagged(sources, |s| &s.embedded_artist),
    ]);

    let title = first_present(&[
        explicit(&overrides.title),
        first_tagged(sources, |s| &s.embedded_album),
        first_filename(sources),
    ]);

    let album = first_present(&[
        explicit(&overrides.album),
        first_tagged(sources, |s| &s.embedded_album),
    ]);

    BookMetadata::builder()
        .author(author)
        .title(title)
        .album(album)
        .series(overrides.series.clone())
        .narrator(overrides.narrator.clone())
        .comment(overrides.comment.clone())
        .build()
}
