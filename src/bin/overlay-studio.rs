use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use overlay_studio::{
    ApplyOutcome, CaptureOpts, FitMode, LoadEvent, ModelLoader, SheetLayout, SketchSheet, Studio,
    StudioOpts,
};

#[derive(Parser, Debug)]
#[command(name = "overlay-studio", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the pieces of a glTF model.
    Pieces(PiecesArgs),
    /// Print the color palette of an SVG.
    Palette(PaletteArgs),
    /// Replace one color token in an SVG.
    Recolor(RecolorArgs),
    /// Rasterize an SVG to a PNG.
    Rasterize(RasterizeArgs),
    /// Apply artwork to a model and write the four canonical views.
    Capture(CaptureArgs),
}

#[derive(Parser, Debug)]
struct PiecesArgs {
    /// Input model (`.gltf` or `.glb`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PaletteArgs {
    /// Input SVG.
    #[arg(long)]
    svg: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RecolorArgs {
    /// Input SVG.
    #[arg(long)]
    svg: PathBuf,

    /// Color token to replace, as listed by `palette`.
    #[arg(long)]
    token: String,

    /// Replacement color literal.
    #[arg(long)]
    color: String,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RasterizeArgs {
    /// Input SVG.
    #[arg(long)]
    svg: PathBuf,

    /// Output width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Output height in pixels.
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Placement strategy: fit_height, stretch, contain or cover.
    #[arg(long, default_value = "fit_height")]
    fit: FitMode,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Input model (`.gltf` or `.glb`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Artwork for a piece, as `PIECE=path.svg`. Repeatable.
    #[arg(long = "art", value_parser = parse_art)]
    art: Vec<(String, PathBuf)>,

    /// Studio options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Override the capture width.
    #[arg(long)]
    width: Option<u32>,

    /// Override the capture height.
    #[arg(long)]
    height: Option<u32>,

    /// Render on the viewer background instead of transparency.
    #[arg(long, default_value_t = false)]
    opaque: bool,

    /// Directory receiving `<stem>_<view>.png`.
    #[arg(long)]
    out_dir: PathBuf,

    /// Also write a sketch sheet PNG to this path.
    #[arg(long)]
    sheet: Option<PathBuf>,
}

fn parse_art(s: &str) -> Result<(String, PathBuf), String> {
    let (piece, path) = s
        .split_once('=')
        .ok_or_else(|| format!("expected PIECE=path.svg, got '{s}'"))?;
    if piece.trim().is_empty() || path.trim().is_empty() {
        return Err(format!("expected PIECE=path.svg, got '{s}'"));
    }
    Ok((piece.trim().to_string(), PathBuf::from(path.trim())))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pieces(args) => cmd_pieces(args),
        Command::Palette(args) => cmd_palette(args),
        Command::Recolor(args) => cmd_recolor(args),
        Command::Rasterize(args) => cmd_rasterize(args),
        Command::Capture(args) => cmd_capture(args),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn load_studio(in_path: &Path, opts: StudioOpts) -> anyhow::Result<Studio> {
    let mut studio = Studio::new(opts)?;
    let events = ModelLoader::open(in_path).inspect(|event| {
        if let LoadEvent::Progress(p) = event {
            tracing::info!(percent = p, "loading");
        }
    });
    studio
        .load(events)
        .with_context(|| format!("load model '{}'", in_path.display()))?;
    Ok(studio)
}

#[derive(serde::Serialize)]
struct PieceSummary<'a> {
    name: &'a str,
    meshes: Vec<&'a str>,
    bounds: Vec<overlay_studio::UvBounds>,
}

fn cmd_pieces(args: PiecesArgs) -> anyhow::Result<()> {
    let studio = load_studio(&args.in_path, StudioOpts::default())?;
    let model = studio.model().context("model missing after load")?;

    let summaries: Vec<PieceSummary<'_>> = studio
        .pieces()
        .iter()
        .map(|piece| PieceSummary {
            name: piece.name(),
            meshes: piece
                .members()
                .iter()
                .filter_map(|m| model.mesh(m.mesh).map(|n| n.name.as_str()))
                .collect(),
            bounds: piece.members().iter().map(|m| m.bounds).collect(),
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for s in &summaries {
        println!("{}\t{}", s.name, s.meshes.join(", "));
    }
    Ok(())
}

fn cmd_palette(args: PaletteArgs) -> anyhow::Result<()> {
    let markup = read_text(&args.svg)?;
    let palette = overlay_studio::extract_colors(&markup);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&palette)?);
        return Ok(());
    }
    for entry in &palette {
        println!("{}\t{}\t{}", entry.token, entry.hex, entry.count);
    }
    Ok(())
}

fn cmd_recolor(args: RecolorArgs) -> anyhow::Result<()> {
    let markup = read_text(&args.svg)?;
    let out = overlay_studio::rewrite(&markup, &args.token, &args.color);
    if out == markup {
        tracing::warn!(token = %args.token, "token not found; output is unchanged");
    }
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, out).with_context(|| format!("write '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_rasterize(args: RasterizeArgs) -> anyhow::Result<()> {
    let markup = read_text(&args.svg)?;
    let buf = overlay_studio::try_rasterize(&markup, args.width, args.height, args.fit)
        .with_context(|| format!("rasterize '{}'", args.svg.display()))?;
    buf.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let opts = match &args.opts {
        Some(path) => StudioOpts::from_json_path(path)?,
        None => StudioOpts::default(),
    };
    let mut studio = load_studio(&args.in_path, opts)?;

    for (piece, path) in &args.art {
        let markup = read_text(path)?;
        match studio.attach_artwork(piece, &markup) {
            ApplyOutcome::Applied { meshes } => {
                tracing::info!(piece = %piece, meshes, "artwork applied");
            }
            other => anyhow::bail!("artwork for piece '{piece}' not applied: {other:?}"),
        }
    }

    let capture = CaptureOpts {
        width: args.width.unwrap_or(studio.opts().capture.width),
        height: args.height.unwrap_or(studio.opts().capture.height),
        transparent: !args.opaque && studio.opts().capture.transparent,
        ..studio.opts().capture
    };
    let views = studio
        .capture_four_views(&capture)?
        .context("no model to capture")?;

    let stem = args
        .in_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    for path in views.save_pngs(&args.out_dir, stem)? {
        eprintln!("wrote {}", path.display());
    }

    if let Some(sheet_path) = &args.sheet {
        let today = chrono::Local::now().date_naive();
        let sheet = SketchSheet::compose(&views, &SheetLayout::default(), today)?;
        sheet.page.save_png(sheet_path)?;
        eprintln!("wrote {}", sheet_path.display());
    }
    Ok(())
}
