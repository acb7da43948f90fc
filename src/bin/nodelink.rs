use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "nodelink", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a diagram state and dump it as JSON.
    Generate(GenerateArgs),
    /// Render a diagram as a PNG.
    Render(RenderArgs),
    /// Write a diagram as an SVG document.
    Svg(SvgArgs),
    /// Animate between two parameter sets, writing numbered PNG frames.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Input parameters JSON (missing fields take defaults).
    #[arg(long)]
    params: PathBuf,

    /// Output state JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input parameters JSON.
    #[arg(long)]
    params: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Monospace font file for node labels; labels are skipped without it.
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Input parameters JSON.
    #[arg(long)]
    params: PathBuf,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Starting parameters JSON.
    #[arg(long)]
    params: PathBuf,

    /// Target parameters JSON to animate to.
    #[arg(long)]
    to: PathBuf,

    /// Output directory for frame_NNNN.png files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Monospace font file for node labels; labels are skipped without it.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Safety cap on emitted frames (relevant for tiny animation speeds).
    #[arg(long, default_value_t = 600)]
    max_frames: u32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Render(args) => cmd_render(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn read_params(path: &Path) -> anyhow::Result<nodelink::DiagramParams> {
    let f = File::open(path).with_context(|| format!("open params '{}'", path.display()))?;
    let r = BufReader::new(f);
    let params: nodelink::DiagramParams =
        serde_json::from_reader(r).with_context(|| "parse params JSON")?;
    Ok(params)
}

fn make_raster(
    params: &nodelink::DiagramParams,
    font: Option<&Path>,
) -> anyhow::Result<nodelink::RasterRenderer> {
    let mut renderer = nodelink::RasterRenderer::new(params.canvas_width, params.canvas_height)?;
    if let Some(font_path) = font {
        let bytes = std::fs::read(font_path)
            .with_context(|| format!("read font '{}'", font_path.display()))?;
        renderer.set_label_font(bytes)?;
    }
    Ok(renderer)
}

fn write_png(frame: &nodelink::FrameRgba, out: &Path) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let params = read_params(&args.params)?;
    let state = nodelink::generate(&params);
    let json = serde_json::to_string_pretty(&state)?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write state '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let params = read_params(&args.params)?;
    let state = nodelink::generate(&params);

    let mut renderer = make_raster(&params, args.font.as_deref())?;
    renderer.draw(&state, &params)?;
    write_png(&renderer.frame()?, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let params = read_params(&args.params)?;
    let state = nodelink::generate(&params);
    let document = nodelink::render_svg(&state, &params);
    std::fs::write(&args.out, document)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let params = read_params(&args.params)?;
    let target_params = read_params(&args.to)?;

    let mut renderer = make_raster(&params, args.font.as_deref())?;
    let mut driver = nodelink::AnimationDriver::new(params);
    driver.set_params(target_params);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut frame_index = 0u32;
    while frame_index < args.max_frames {
        let tick = driver.tick(&mut renderer)?;
        let completed = match tick {
            nodelink::Tick::Idle => break,
            nodelink::Tick::Frame { completed, .. } => completed,
        };

        let out = args.out_dir.join(format!("frame_{frame_index:04}.png"));
        write_png(&renderer.frame()?, &out)?;
        frame_index += 1;

        if completed {
            break;
        }
    }

    eprintln!("wrote {} frames to {}", frame_index, args.out_dir.display());
    Ok(())
}
