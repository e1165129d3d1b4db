use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use retroframe::{
    AppConfig, BatchOptions, ColorMode, CommandMatte, ConvertJob, CUSTOM_STYLE, EdgeParams,
    ExportOptions, FrameErrorPolicy, LEGACY_EDGE_STYLE, Matte, PassThroughMatte, StyleEngine,
    StyleRequest, StyleSpec, Threading,
};

const LEGACY_EDGE_DESCRIPTION: &str = "Original edge detection algorithm with distortion";
const CUSTOM_DESCRIPTION: &str =
    "Your own parameters (--pixel-size, --noise-level, --contrast, --dithering, --color-mode)";

#[derive(Parser, Debug)]
#[command(name = "retroframe", version, about = "Retro pixel-art styles for video frames")]
struct Cli {
    /// Log debug output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available styles.
    Styles(StylesArgs),
    /// Stylize a single image.
    Frame(FrameArgs),
    /// Stylize every frame image in a directory.
    Frames(FramesArgs),
    /// Convert a video: extract, remove background, stylize, reassemble (requires `ffmpeg`).
    Convert(ConvertArgs),
}

#[derive(Args, Debug)]
struct StylesArgs {
    /// Config JSON with extra styles.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StyleArgs {
    /// Style name (see `retroframe styles`); defaults to the configured default style.
    #[arg(long)]
    style: Option<String>,

    /// Config JSON (fps, edge thresholds, directories, styles).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible noise, mixed with each frame index.
    #[arg(long)]
    seed: Option<u64>,

    /// Custom style: block size in pixels.
    #[arg(long, default_value_t = 4)]
    pixel_size: u32,

    /// Custom style: noise amount.
    #[arg(long, default_value_t = 0.2)]
    noise_level: f32,

    /// Custom style: contrast (informational).
    #[arg(long, default_value_t = 1.5)]
    contrast: f32,

    /// Custom style: Floyd–Steinberg dithering.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    dithering: bool,

    /// Custom style: monochrome, limited_palette or rgb_shift.
    #[arg(long, default_value = "monochrome")]
    color_mode: String,

    /// Legacy-Edge: lower Canny threshold (defaults to the config).
    #[arg(long)]
    edge_low: Option<f32>,

    /// Legacy-Edge: upper Canny threshold (defaults to the config).
    #[arg(long)]
    edge_high: Option<f32>,

    /// Legacy-Edge: distortion strength (defaults to the config).
    #[arg(long)]
    distortion: Option<i32>,
}

#[derive(Args, Debug)]
struct WorkerArgs {
    /// Process frames in parallel.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel (defaults to the number of CPUs).
    #[arg(long)]
    threads: Option<usize>,

    /// Skip frames that fail instead of aborting.
    #[arg(long)]
    skip_errors: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output image (format from the extension, PNG otherwise).
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Directory of png/jpg/jpeg frames.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Output directory; file names are kept.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    #[command(flatten)]
    workers: WorkerArgs,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Input video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Job name (defaults to the config's `sub_directory`).
    #[arg(long)]
    name: Option<String>,

    /// Frame rate (defaults to the config).
    #[arg(long)]
    fps: Option<u32>,

    /// Directory the configured output directories are relative to.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Keep the extracted frames.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    keep_original_frames: bool,

    /// Keep the background-removed frames.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    keep_matted_frames: bool,

    /// Keep the stylized frames.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    keep_processed_frames: bool,

    /// Reassemble the stylized frames into an MP4.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    create_video: bool,

    /// Replace an existing final video.
    #[arg(long)]
    overwrite: bool,

    /// Background removal command reading an image on stdin and writing a PNG on stdout,
    /// e.g. "rembg i - -". Frames pass through unchanged when omitted.
    #[arg(long)]
    matte_cmd: Option<String>,

    #[command(flatten)]
    style: StyleArgs,

    #[command(flatten)]
    workers: WorkerArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Styles(args) => cmd_styles(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Convert(args) => cmd_convert(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => {
            AppConfig::load(path).with_context(|| format!("load config '{}'", path.display()))
        }
        None => Ok(AppConfig::default()),
    }
}

fn make_engine(cfg: &AppConfig) -> anyhow::Result<StyleEngine> {
    Ok(StyleEngine::new(cfg.registry()?))
}

fn make_request(args: &StyleArgs, cfg: &AppConfig) -> StyleRequest {
    match args.style.as_deref() {
        Some(LEGACY_EDGE_STYLE) => {
            let base = cfg.edge_params();
            StyleRequest::LegacyEdge(EdgeParams {
                low: args.edge_low.unwrap_or(base.low),
                high: args.edge_high.unwrap_or(base.high),
                strength: args.distortion.unwrap_or(base.strength),
            })
        }
        Some(CUSTOM_STYLE) => StyleRequest::Custom(Some(StyleSpec {
            pixel_size: args.pixel_size,
            contrast: args.contrast,
            noise_level: args.noise_level,
            dithering: args.dithering,
            color_mode: Some(ColorMode::from(args.color_mode.clone())),
            description: String::new(),
        })),
        other => StyleRequest::Named(other.map(str::to_string)),
    }
}

fn batch_options(workers: &WorkerArgs, seed: Option<u64>) -> BatchOptions {
    BatchOptions {
        threading: Threading {
            parallel: workers.parallel,
            threads: workers.threads,
        },
        seed,
        on_error: if workers.skip_errors {
            FrameErrorPolicy::Skip
        } else {
            FrameErrorPolicy::Abort
        },
    }
}

fn cmd_styles(args: StylesArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_ref())?;
    let registry = cfg.registry()?;
    for name in registry.all_names() {
        let marker = if name == registry.default_style() {
            " (default)"
        } else {
            ""
        };
        println!("{name}{marker}: {}", registry.describe(name));
    }
    println!("{LEGACY_EDGE_STYLE}: {LEGACY_EDGE_DESCRIPTION}");
    println!("{CUSTOM_STYLE}: {CUSTOM_DESCRIPTION}");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.style.config.as_ref())?;
    let engine = make_engine(&cfg)?;
    let request = make_request(&args.style, &cfg);

    let mut rng = retroframe::frame_rng(args.style.seed, 0);
    retroframe::stylize_file(&engine, &request, &args.in_path, &args.out, &mut rng)
        .with_context(|| format!("stylize '{}'", args.in_path.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.style.config.as_ref())?;
    let engine = make_engine(&cfg)?;
    let request = make_request(&args.style, &cfg);
    let opts = batch_options(&args.workers, args.style.seed);

    let stats = retroframe::stylize_dir(&engine, &args.in_dir, &args.out, &request, &opts)?;
    eprintln!(
        "styled {} of {} frames into {} ({} skipped)",
        stats.frames_styled,
        stats.frames_total,
        args.out.display(),
        stats.frames_skipped
    );
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.style.config.as_ref())?;
    let engine = make_engine(&cfg)?;

    let mut job = ConvertJob::new(&args.in_path, &cfg);
    if let Some(name) = &args.name {
        job.name = name.clone();
    }
    if let Some(fps) = args.fps {
        job.fps = fps;
    }
    job.root = args.root.clone();
    job.export = ExportOptions {
        keep_original_frames: args.keep_original_frames,
        keep_matted_frames: args.keep_matted_frames,
        keep_processed_frames: args.keep_processed_frames,
        create_video: args.create_video,
    };
    job.request = make_request(&args.style, &cfg);
    job.batch = batch_options(&args.workers, args.style.seed);
    job.overwrite = args.overwrite;

    let matte: Box<dyn Matte> = match args.matte_cmd.as_deref() {
        Some(line) => Box::new(
            CommandMatte::from_command_line(line).context("--matte-cmd must not be empty")?,
        ),
        None => Box::new(PassThroughMatte),
    };

    let report = job.run(&cfg, &engine, matte.as_ref())?;

    let layout = &report.layout;
    if job.export.keep_original_frames {
        eprintln!("original frames: {}", layout.frames_dir.display());
    }
    if job.export.keep_matted_frames {
        eprintln!("no-background frames: {}", layout.matted_dir.display());
    }
    if job.export.keep_processed_frames {
        eprintln!("processed frames: {}", layout.processed_dir.display());
    }
    if let Some(video) = &report.video {
        eprintln!("final video: {}", video.display());
    }
    Ok(())
}
