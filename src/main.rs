use clap::{Parser, Subcommand};
use std::path::PathBuf;

use posemark::estimator::BlazePose;
use posemark::rename::RenameOutcome;
use posemark::{label_directory, merge_to_file, normalize_directory};

#[derive(Parser)]
#[command(name = "posemark")]
#[command(about = "Extract upper-body pose keypoints from frames into labelled JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize frame filenames to TT_SS_processed_FF.png
    Rename {
        /// Directory containing the frames
        #[arg(long, default_value = "processed_frames")]
        dir: PathBuf,
    },

    /// Extract keypoints from every frame into per-frame JSON records
    Extract {
        /// Directory containing the frames
        #[arg(long, default_value = "processed_frames")]
        input: PathBuf,

        /// Directory to write JSON records to (created if absent)
        #[arg(long, default_value = "labelled_json")]
        output: PathBuf,

        /// Path to the pose landmark model (.rten); defaults to the cache dir
        #[arg(long)]
        model: Option<PathBuf>,

        /// Save annotated overlay images to this directory
        #[arg(long, value_name = "DIR")]
        overlay_dir: Option<PathBuf>,
    },

    /// Merge all per-frame JSON records into one array
    Merge {
        /// Directory containing the JSON records
        #[arg(long, default_value = "labelled_json")]
        input: PathBuf,

        /// Merged output file
        #[arg(long, default_value = "all_keypoints_labelled.json")]
        output: PathBuf,
    },

    /// Run rename, extract, and merge in sequence with default paths
    Run,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    match args.command {
        Commands::Rename { dir } => rename(&dir, args.verbose),
        Commands::Extract {
            input,
            output,
            model,
            overlay_dir,
        } => extract(&input, &output, model, overlay_dir.as_deref(), args.verbose),
        Commands::Merge { input, output } => merge(&input, &output),
        Commands::Run => {
            let frames = PathBuf::from("processed_frames");
            let json_dir = PathBuf::from("labelled_json");
            rename(&frames, args.verbose)?;
            extract(&frames, &json_dir, None, None, args.verbose)?;
            merge(&json_dir, &PathBuf::from("all_keypoints_labelled.json"))
        }
    }
}

fn rename(dir: &std::path::Path, verbose: bool) -> anyhow::Result<()> {
    let outcomes = normalize_directory(dir)?;

    let renamed = outcomes
        .iter()
        .filter(|o| matches!(o, RenameOutcome::Renamed { .. }))
        .count();
    let skipped = outcomes.len() - renamed;
    println!("Renamed {renamed} files ({skipped} left untouched)");

    if verbose {
        for outcome in &outcomes {
            if let RenameOutcome::Renamed { from, to } = outcome {
                println!("  {from} -> {to}");
            }
        }
    }
    Ok(())
}

fn extract(
    input: &std::path::Path,
    output: &std::path::Path,
    model: Option<PathBuf>,
    overlay_dir: Option<&std::path::Path>,
    verbose: bool,
) -> anyhow::Result<()> {
    if verbose {
        println!("Loading pose landmark model...");
    }
    let mut estimator = match model {
        Some(path) => BlazePose::from_file(&path)?,
        None => BlazePose::from_cache_dir()?,
    };

    let summary = label_directory(&mut estimator, input, output, overlay_dir)?;
    println!(
        "Labelled {} frames ({} bad names, {} unreadable, {} without a pose)",
        summary.written, summary.bad_name, summary.unreadable, summary.no_pose
    );
    Ok(())
}

fn merge(input: &std::path::Path, output: &std::path::Path) -> anyhow::Result<()> {
    let summary = merge_to_file(input, output)?;
    println!(
        "Combined {} JSON files ({} records) into '{}'",
        summary.merged_files,
        summary.records,
        output.display()
    );
    if summary.skipped > 0 {
        println!("Skipped {} malformed files", summary.skipped);
    }
    Ok(())
}
