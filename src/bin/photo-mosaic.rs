use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use photo_mosaic::{
    Canvas, FfmpegSink, FfmpegSinkOpts, FitMode, FrameIndex, FsImageSource, FsMaskSource,
    MaskInput, MosaicConfig, MosaicPlan, PlanSummary, RenderSession, RenderSessionOpts,
};

#[derive(Parser, Debug)]
#[command(name = "photo-mosaic", version, about = "Photo-mosaic wave animation renderer")]
struct Cli {
    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single frame as a PNG. Without `--frame`, renders the assembled mosaic.
    Frame(FrameArgs),
    /// Print the planned grid, waves and frame counts as JSON.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct MosaicArgs {
    /// Directory of source photos.
    #[arg(long)]
    photos: PathBuf,

    /// Background image blended into the resting photos.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// JSON config file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible plan.
    #[arg(long)]
    seed: Option<u64>,

    /// Canvas width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds the assembled mosaic stands still.
    #[arg(long)]
    hold: Option<f64>,

    /// Preferred cell edge in pixels.
    #[arg(long)]
    cell: Option<u32>,

    /// Cell fitting policy.
    #[arg(long, value_parser = parse_fit)]
    fit: Option<FitMode>,

    /// Disable the border around resting photos.
    #[arg(long, default_value_t = false)]
    no_border: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    mosaic: MosaicArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
    /// Fail instead of replacing an existing output file.
    #[arg(long, default_value_t = false)]
    no_overwrite: bool,

    /// x264 constant rate factor.
    #[arg(long, default_value_t = 18)]
    crf: u8,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Render chunk size (parallel mode only).
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    mosaic: MosaicArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: Option<u64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    mosaic: MosaicArgs,
}

fn parse_fit(s: &str) -> Result<FitMode, String> {
    match s {
        "cover" => Ok(FitMode::Cover),
        "contain" => Ok(FitMode::Contain),
        other => Err(format!("unknown fit mode '{other}' (expected cover or contain)")),
    }
}

fn init_tracing(verbosity: u8) -> anyhow::Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env().add_directive(
        format!("photo_mosaic={level}")
            .parse()
            .context("parse log directive")?,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn load_config(args: &MosaicArgs) -> anyhow::Result<MosaicConfig> {
    let mut cfg = match &args.config {
        Some(path) => MosaicConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MosaicConfig::default(),
    };
    if args.width.is_some() || args.height.is_some() {
        cfg.canvas = Canvas {
            width: args.width.unwrap_or(cfg.canvas.width),
            height: args.height.unwrap_or(cfg.canvas.height),
        };
    }
    if let Some(fps) = args.fps {
        cfg.fps = photo_mosaic::Fps::new(fps, 1)?;
    }
    if let Some(hold) = args.hold {
        cfg.hold_secs = hold;
    }
    if let Some(cell) = args.cell {
        cfg.cell_size_hint = cell;
    }
    if let Some(fit) = args.fit {
        cfg.fit = fit;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    if args.no_border {
        cfg.border = false;
    }
    cfg.validate().context("validating configuration")?;
    Ok(cfg)
}

fn prepare_session(args: &MosaicArgs, opts: RenderSessionOpts) -> anyhow::Result<RenderSession> {
    let cfg = load_config(args)?;
    let photos = photo_mosaic::scan_photos(&args.photos)?;
    tracing::info!(count = photos.len(), dir = %args.photos.display(), "scanned photos");
    if photos.is_empty() {
        anyhow::bail!("no photos found in '{}'", args.photos.display());
    }

    let images = FsImageSource::new(cfg.fit);
    let masks = FsMaskSource;
    let mask = args.mask.as_deref().map(|path| MaskInput {
        source: &masks,
        path,
        alpha: cfg.mask_alpha,
    });
    Ok(RenderSession::prepare(&cfg, &photos, &images, mask, opts)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = RenderSessionOpts {
        parallel: args.parallel,
        chunk_size: args.chunk_size,
        threads: args.threads,
        ..RenderSessionOpts::default()
    };
    let sess = prepare_session(&args.mosaic, opts)?;

    let mut sink_opts = FfmpegSinkOpts::new(args.out.clone());
    sink_opts.overwrite = !args.no_overwrite;
    sink_opts.crf = args.crf;
    let mut sink = FfmpegSink::new(sink_opts);

    let stats = sess.render(&mut sink)?;
    eprintln!(
        "wrote {} ({} frames, seed {})",
        args.out.display(),
        stats.frames_total,
        sess.seed().unwrap_or_default()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let sess = prepare_session(&args.mosaic, RenderSessionOpts::default())?;
    let frame = match args.frame {
        Some(f) => sess.render_frame(FrameIndex(f))?,
        None => sess.render_static()?,
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        frame.as_raw(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgb8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    // Planning only needs the photo count, nothing is decoded.
    let cfg = load_config(&args.mosaic)?;
    let photos = photo_mosaic::scan_photos(&args.mosaic.photos)?;
    let seed = cfg.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, count = photos.len(), "planning mosaic");
    let mut rng = StdRng::seed_from_u64(seed);
    let plan = MosaicPlan::build(&cfg, photos.len(), &mut rng)?;
    println!("{}", PlanSummary::of(&plan).to_json_pretty()?);
    Ok(())
}
