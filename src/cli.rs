use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "m4bmerge")]
#[command(about = "Merge per-chapter mp3 files into a single tagged m4b audiobook with chapter marks")]
#[command(version)]
pub struct Cli {
    /// Source files in chapter order, or a single directory of mp3 files
    /// (defaults to the current directory)
    pub inputs: Vec<PathBuf>,

    /// Book author (defaults to the artist tag of the first tagged file)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Book title (defaults to the album tag, then the first filename)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Album name (defaults to the album tag, then the title)
    #[arg(short = 'A', long)]
    pub album: Option<String>,

    /// Series name
    #[arg(short, long)]
    pub series: Option<String>,

    /// Narrator name
    #[arg(short, long)]
    pub narrator: Option<String>,

    /// Free-form comment, also appended to the filename
    #[arg(short = 'C', long)]
    pub comment: Option<String>,

    /// Cover image (defaults to cover/folder/front images next to the sources)
    #[arg(short, long)]
    pub cover: Option<PathBuf>,

    /// Output directory (uses config default, then ./output)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Place the book under author/series/album directories
    #[arg(long)]
    pub organize: bool,

    /// Use filenames as chapter titles even when files have title tags
    #[arg(short = 'f', long)]
    pub filename_titles: bool,

    /// Show what would be built without encoding anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the dry-run plan as JSON
    #[arg(long, requires = "dry_run")]
    pub json: bool,

    /// Keep the temporary directory and log every step
    #[arg(short, long)]
    pub debug: bool,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
