use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use motion_splitter::{
    batch::{BatchFile, MotionBatch, MotionLibrary},
    config::Config,
    manifest,
    pipeline::{PlanPipeline, SplitPipeline},
    splitter::{layout_tracks, MarkerSplitter, TimelineInfo, TimelineMarker, TrackFileSink},
};

#[derive(Parser)]
#[command(
    name = "motion-splitter",
    version,
    about = "Pack motions into one animation export and split them back into clips",
    long_about = "Motion-Splitter lays a batch of character motions end to end, records each clip's boundaries in a JSON side-car manifest, and later cuts the imported continuous timeline back into independent clips."
)]
struct Cli {
    /// Configuration file (optional)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a motion batch and write its clip manifest
    Plan {
        /// TOML batch listing (`[[motion]] path, length_ms`)
        #[arg(short, long)]
        batch: PathBuf,

        /// Animation export the manifest belongs to (`.fbx` added if missing)
        #[arg(short, long)]
        output: PathBuf,

        /// Authoring frame rate
        #[arg(long)]
        fps: Option<f64>,

        /// Gap between clips in milliseconds
        #[arg(long, conflicts_with = "gap_frames")]
        gap_ms: Option<i64>,

        /// Gap between clips in frames
        #[arg(long)]
        gap_frames: Option<i64>,

        /// Character the motions are applied to
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Split an imported timeline into clips
    Split {
        /// Imported animation file; its `_clips.json` side-car is used if present
        #[arg(short, long)]
        animation: PathBuf,

        /// Length of the imported timeline in frames
        #[arg(long)]
        frames: i64,

        /// Frame rate of the imported timeline
        #[arg(long, default_value = "30")]
        fps: f64,

        /// Timeline marker used when no manifest exists (NAME@FRAME, repeatable)
        #[arg(short, long = "marker")]
        markers: Vec<TimelineMarker>,

        /// Read this manifest instead of looking for the side-car
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Directory to write one file per clip into
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Keep clips at their original timeline position
        #[arg(long)]
        no_offset: bool,

        /// Trust the manifest's stored frames instead of re-deriving them
        #[arg(long)]
        no_override_fps: bool,
    },

    /// Preview clips defined by timeline markers
    Markers {
        /// Length of the timeline in frames
        #[arg(long)]
        frames: i64,

        /// Timeline marker (NAME@FRAME, repeatable)
        #[arg(short, long = "marker", required = true)]
        markers: Vec<TimelineMarker>,
    },

    /// List motion files in a library folder
    Scan {
        /// Library root
        dir: PathBuf,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination TOML file
        path: PathBuf,
    },

    /// Validate a clip manifest
    Validate {
        /// Manifest file, or an animation file whose side-car should be checked
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --verbose
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .init();

    info!("Starting Motion-Splitter v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => Config::default(),
    };

    match cli.command {
        Commands::Plan { batch, output, fps, gap_ms, gap_frames, avatar } => {
            let mut config = config;
            if let Some(fps) = fps {
                config.planner.fps = fps;
            }
            if let Some(gap_ms) = gap_ms {
                config.planner.gap_ms = gap_ms;
                config.planner.gap_frames = None;
            }
            if gap_frames.is_some() {
                config.planner.gap_frames = gap_frames;
            }
            if let Some(avatar) = avatar {
                config.planner.avatar_name = avatar;
            }
            config.validate()?;
            run_plan(config, &batch, &output)
        }
        Commands::Split {
            animation,
            frames,
            fps,
            markers,
            manifest,
            output_dir,
            no_offset,
            no_override_fps,
        } => {
            let mut config = config;
            if no_offset {
                config.splitter.offset_to_zero = false;
            }
            if no_override_fps {
                config.splitter.override_fps = false;
            }
            if let Some(dir) = output_dir {
                config.export.output_dir = dir;
            }
            config.validate()?;
            run_split(config, &animation, manifest.as_deref(), TimelineInfo::new(frames, fps), &markers)
        }
        Commands::Markers { frames, markers } => {
            let report = MarkerSplitter::from_config(&config.splitter).split(frames, &markers)?;
            for track in layout_tracks(&report) {
                println!(
                    "{:>3}  {:<24} {} (source {}){}",
                    track.index,
                    track.name,
                    track.frames,
                    track.source_frames,
                    if track.muted { "" } else { "  *" }
                );
            }
            for skipped in &report.skipped {
                println!("     skipped: {}", skipped);
            }
            Ok(())
        }
        Commands::Scan { dir } => {
            let library = MotionLibrary::with_extensions(&dir, config.planner.supported_extensions.clone());
            let entries = library.scan()?;
            for entry in &entries {
                let folder = if entry.folder.is_empty() { "." } else { entry.folder.as_str() };
                println!("{:<24} {:<16} {}", entry.name, folder, entry.path.display());
            }
            info!("Found {} motion files", entries.len());
            Ok(())
        }
        Commands::InitConfig { path } => {
            Config::default().save_to_file(&path)?;
            info!("Default configuration written to {:?}", path);
            Ok(())
        }
        Commands::Validate { path } => {
            let manifest_path = if path.extension().map_or(false, |e| e == "json") {
                path
            } else {
                manifest::sidecar_path(&path)
            };
            let manifest = manifest::read_manifest(&manifest_path)
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("{}: {}", manifest_path.display(), manifest.summary());
            Ok(())
        }
    }
}

fn run_plan(config: Config, batch_path: &Path, output: &Path) -> Result<()> {
    let listing = BatchFile::from_file(batch_path)
        .with_context(|| format!("Failed to load batch listing {:?}", batch_path))?;

    let mut batch = MotionBatch::with_extensions(config.planner.supported_extensions.clone());
    let added = batch.add_all(listing.paths(), &listing)?;
    info!("Added {} of {} listed motions", added, listing.motions.len());

    let outcome = PlanPipeline::new(config)
        .run(&batch, None, output)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    for clip in &outcome.manifest.clips {
        println!(
            "{:>3}  {:<24} {:>8} ms  frames {}",
            clip.index,
            clip.name,
            clip.start_time_ms,
            clip.frame_range()
        );
    }
    println!("{}", outcome.manifest.summary());
    Ok(())
}

fn run_split(
    config: Config,
    animation: &Path,
    manifest_path: Option<&Path>,
    timeline: TimelineInfo,
    markers: &[TimelineMarker],
) -> Result<()> {
    let mut sink = TrackFileSink::new(&config.export.output_dir, &config.export.extension);

    let outcome = SplitPipeline::new(config)
        .run(animation, manifest_path, timeline, markers, Some(&mut sink))
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if outcome.method.is_none() {
        warn!("Nothing to split: no clip manifest and no markers given");
        return Ok(());
    }

    if let Some(fps) = outcome.manifest_fps {
        info!("Manifest fps: {} | Timeline fps: {}", fps, outcome.timeline_fps);
    }

    for track in &outcome.tracks {
        println!("{:>3}  {:<24} {}", track.index, track.name, track.frames);
    }

    if let Some(export) = &outcome.export {
        for failure in &export.failed {
            warn!("{}", failure);
        }
        info!("Exported {} tracks to {:?}", export.exported.len(), sink.output_dir());
    }

    println!("Created {} clips", outcome.clip_count());
    Ok(())
}
