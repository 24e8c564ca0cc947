//! Linear build pipeline: resolve, probe, plan, encode, install

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::cover::{check_explicit_cover, resolve_cover, CoverArt};
use crate::error::BuildError;
use crate::input::{resolve_inputs, InputSet};
use crate::metadata::{read_source_tags, resolve_metadata, BookMetadata, MetadataOverrides};
use crate::organize::OutputTarget;
use crate::timeline::{write_chapter_file, ChapterSource, Timeline};
use crate::tools::Toolchain;

/// Everything one invocation asks for
#[derive(Debug, Clone, Default)]
pub struct BuildRequest {
    pub inputs: Vec<PathBuf>,
    pub overrides: MetadataOverrides,
    pub cover: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub organize: bool,
    pub force_filename_titles: bool,
    pub dry_run: bool,
    /// Keep the scratch directory for inspection
    pub keep_scratch: bool,
    /// Parent of the scratch directory; system temp dir when `None`
    pub scratch_parent: Option<PathBuf>,
}

/// Fully resolved book, before any encoding
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub sources: Vec<ChapterSource>,
    pub single_file: bool,
    pub timeline: Timeline,
    pub metadata: BookMetadata,
    pub cover: Option<CoverArt>,
    pub target: OutputTarget,
}

#[derive(Debug)]
pub struct BuildOutcome {
    pub plan: BuildPlan,
    /// Path of the finished book; `None` for a dry run
    pub written: Option<PathBuf>,
    /// Scratch directory left behind in diagnostic mode
    pub scratch_kept: Option<PathBuf>,
}

/// Process-scoped scratch directory
///
/// Removed on drop unless it was created with `keep`, in which case it stays
/// on disk whether the build succeeded or not.
pub struct Workspace {
    dir: Option<TempDir>,
    path: PathBuf,
    keep: bool,
}

impl Workspace {
    pub fn create(parent: Option<&Path>, keep: bool) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("m4bmerge-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent),
            None => builder.tempdir(),
        }
        .context("Failed to create scratch directory")?;
        let path = dir.path().to_path_buf();
        debug!("Temporary directory is {}", path.display());

        Ok(Self {
            dir: Some(dir),
            path,
            keep,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Release the workspace, returning its path if it is kept
    pub fn finish(self) -> Option<PathBuf> {
        self.keep.then(|| self.path.clone())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if self.keep {
            let path = dir.keep();
            info!("See temp directory: {}", path.display());
        } else if let Err(e) = dir.close() {
            warn!("Failed to remove {}: {}", self.path.display(), e);
        }
    }
}

/// Run the whole pipeline for one book
pub fn build_book(request: &BuildRequest, tools: &dyn Toolchain) -> Result<BuildOutcome> {
    let inputs = resolve_inputs(&request.inputs)?;
    if let Some(cover) = &request.cover {
        check_explicit_cover(cover)?;
    }

    let workspace = Workspace::create(request.scratch_parent.as_deref(), request.keep_scratch)?;
    let plan = plan_book(request, &inputs, &workspace, tools)?;

    if request.dry_run {
        return Ok(BuildOutcome {
            plan,
            written: None,
            scratch_kept: workspace.finish(),
        });
    }

    let container = encode_book(&plan, &workspace, tools)?;
    let written = install(&container, &plan.target)?;

    Ok(BuildOutcome {
        plan,
        written: Some(written),
        scratch_kept: workspace.finish(),
    })
}

/// Probe every source and resolve timeline, tags, cover and destination
fn plan_book(
    request: &BuildRequest,
    inputs: &InputSet,
    workspace: &Workspace,
    tools: &dyn Toolchain,
) -> Result<BuildPlan> {
    let sources = probe_sources(&inputs.sources, tools)?;
    let timeline = Timeline::build(&sources, request.force_filename_titles);
    let metadata = resolve_metadata(&request.overrides, &sources)?;

    // A dry run leaves nothing behind unless the scratch directory is kept
    let extract = !request.dry_run || request.keep_scratch;
    let cover = resolve_cover(
        request.cover.as_deref(),
        &inputs.base_dir,
        sources.first(),
        workspace.path(),
        extract,
        tools,
    )?;

    let target = OutputTarget::plan(&metadata, &request.output_dir, request.organize);

    Ok(BuildPlan {
        sources,
        single_file: inputs.single_file,
        timeline,
        metadata,
        cover,
        target,
    })
}

/// Measure duration and read tags of each source, in order
pub fn probe_sources(paths: &[PathBuf], tools: &dyn Toolchain) -> Result<Vec<ChapterSource>> {
    paths
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let duration = tools.probe_duration(path)?;
            let tags = read_source_tags(path);
            Ok(ChapterSource::new(index, path, duration, tags))
        })
        .collect()
}

/// Produce the tagged container inside the workspace
fn encode_book(plan: &BuildPlan, workspace: &Workspace, tools: &dyn Toolchain) -> Result<PathBuf> {
    let merged = if plan.single_file {
        plan.sources[0].path.clone()
    } else {
        let paths: Vec<PathBuf> = plan.sources.iter().map(|s| s.path.clone()).collect();
        info!("Concatenating {} files", paths.len());
        tools.concatenate(&paths, &workspace.file("output.mp3"))?
    };

    let chapters = workspace.file("chapters");
    write_chapter_file(&chapters, &plan.timeline.entries)?;

    let aac = workspace.file("output.aac");
    info!("Encoding at {}", plan.timeline.bitrate);
    tools.transcode(&merged, &aac, plan.timeline.bitrate)?;

    let container = workspace.file("output.mp4");
    debug!("Adding chapters");
    tools.mux_chapters(&aac, &chapters, &container)?;
    debug!("Converting chapters to QuickTime format");
    tools.convert_chapters(&container)?;

    debug!("Adding tags");
    tools.write_tags(&container, &plan.metadata)?;

    if let Some(image) = plan.cover.as_ref().and_then(CoverArt::image) {
        debug!("Cover is {}", image.display());
        tools.embed_cover(&container, image)?;
    }

    Ok(container)
}

/// Create the destination directory and move the container into place
fn install(container: &Path, target: &OutputTarget) -> Result<PathBuf> {
    fs::create_dir_all(&target.directory).map_err(|source| {
        BuildError::DestinationCreateFailure {
            path: target.directory.clone(),
            source,
        }
    })?;

    let dest = target.path();
    if dest.exists() {
        warn!("Overwriting {}", dest.display());
    }

    move_file(container, &dest)?;
    info!("Wrote {}", dest.display());
    Ok(dest)
}

/// Rename, falling back to copy and delete across filesystems
fn move_file(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).with_context(|| format!("Failed to move {:?} to {:?}", from, to))?;
    fs::remove_file(from).with_context(|| format!("Failed to remove {:?}", from))?;
    Ok(())
}
