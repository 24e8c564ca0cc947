use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use crate::cli::Cli;
use crate::config::Config;
use crate::cover::CoverArt;
use crate::metadata::MetadataOverrides;
use crate::organize::tree::render_tree;
use crate::pipeline::{build_book, BuildOutcome, BuildPlan, BuildRequest};
use crate::timeline::format_timestamp;
use crate::tools::ExternalTools;

/// Run the build command
pub fn run(cli: &Cli) -> Result<()> {
    let config = Config::load().context("Failed to load config")?;
    let output_dir = config.output_dir(cli.output_dir.as_ref());

    let request = BuildRequest {
        inputs: cli.inputs.clone(),
        overrides: MetadataOverrides {
            author: cli.author.clone(),
            title: cli.title.clone(),
            album: cli.album.clone(),
            series: cli.series.clone(),
            narrator: cli.narrator.clone(),
            comment: cli.comment.clone(),
        },
        cover: cli.cover.clone(),
        output_dir: output_dir.clone(),
        organize: config.organize(cli.organize),
        force_filename_titles: cli.filename_titles,
        dry_run: cli.dry_run,
        keep_scratch: cli.debug,
        scratch_parent: config.output.scratch_dir.clone(),
    };

    let tools = ExternalTools::new(config.encode.clone(), config.tools.clone());

    if !cli.quiet && !cli.json {
        println!("Probing source files...");
    }
    let outcome = build_book(&request, &tools)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome.plan)?);
        return Ok(());
    }

    if !cli.quiet {
        print_plan(&outcome.plan, &output_dir);
    }
    print_result(&outcome, cli.quiet);

    Ok(())
}

fn print_plan(plan: &BuildPlan, output_dir: &Path) {
    println!();
    print_field("Author", &plan.metadata.author);
    print_field("Title", &plan.metadata.title);
    print_field("Album", &plan.metadata.album);
    print_field("Series", &plan.metadata.series);
    print_field("Narrator", &plan.metadata.narrator);
    print_field("Comment", &plan.metadata.comment);
    print_field("Bitrate", plan.timeline.bitrate.as_str());
    print_field("Duration", &format_timestamp(plan.timeline.total_seconds));

    let cover = match &plan.cover {
        Some(CoverArt::File(path)) => path.display().to_string(),
        Some(CoverArt::Extracted(_)) => "extracted from first chapter".to_string(),
        Some(CoverArt::FirstChapter(path)) => format!("embedded in {}", path.display()),
        None => String::new(),
    };
    print_field("Cover", &cover);

    println!();
    println!("{}", "Chapters:".cyan());
    for entry in &plan.timeline.entries {
        println!(
            "  {:>3}  {}  {}",
            entry.index,
            format_timestamp(entry.start_offset_seconds).dimmed(),
            entry.title
        );
    }

    println!();
    print!("{}", render_tree(&plan.target, output_dir));
}

fn print_result(outcome: &BuildOutcome, quiet: bool) {
    match &outcome.written {
        Some(path) => {
            println!();
            println!("Please check result: {}", path.display().to_string().green());
        }
        None if !quiet => {
            println!();
            println!("{}", "Dry run - nothing encoded.".yellow());
            println!("Run without {} to build the book.", "--dry-run".cyan());
        }
        None => {}
    }

    if let Some(scratch) = &outcome.scratch_kept {
        println!("See temp directory: {}", scratch.display());
    }
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{:>12}: {}", label.cyan(), value);
    }
}
