mod logging;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use pixel_render::{
    load_frames, PixelRenderer, RenderOptions, RenderParams, RenderStyle, ResampleFilter,
    SizingPolicy, SourceImage,
};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render pixelated previews of images and animations")]
struct Cli {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one image to a PNG file
    Render(RenderArgs),
    /// Render every image below a directory
    Batch(BatchArgs),
    /// Render each frame of a GIF to numbered PNG files
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image path
    input: PathBuf,
    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory searched recursively for images
    input: PathBuf,
    /// Output directory, mirrors the input layout
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Input animation path (GIF)
    input: PathBuf,
    /// Output directory for frame files
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Cell size in output pixels (1-50)
    #[arg(
        long,
        env = "PIXEL_CELL_SIZE",
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=50)
    )]
    cell_size: u32,
    /// Contrast percentage (0-200, 100 leaves colors unchanged)
    #[arg(long, env = "PIXEL_CONTRAST", default_value_t = 100.0, value_parser = parse_percent)]
    contrast: f32,
    /// Saturation percentage (0-200, 0 is grayscale)
    #[arg(long, env = "PIXEL_SATURATION", default_value_t = 100.0, value_parser = parse_percent)]
    saturation: f32,
    /// Hue rotation in degrees
    #[arg(long, env = "PIXEL_HUE_SHIFT", default_value_t = 0.0, allow_negative_numbers = true)]
    hue_shift: f32,
    /// Cell shape
    #[arg(long, env = "PIXEL_STYLE", value_enum, default_value = "flat")]
    style: StyleChoice,
    /// Interpolation used to shrink the source onto the cell grid
    #[arg(long, env = "PIXEL_FILTER", value_enum, default_value = "triangle")]
    filter: FilterChoice,
    /// Output width in pixels, height follows the aspect ratio (0 keeps the source size)
    #[arg(long, env = "PIXEL_WIDTH", default_value_t = pixel_render::DEFAULT_SURFACE_WIDTH)]
    width: u32,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StyleChoice {
    Flat,
    SquareWithDot,
    Dot,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FilterChoice {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.verbose).context("failed to install logger")?;

    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Batch(args) => batch(args),
        Commands::Animate(args) => animate(args),
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let renderer = PixelRenderer::new(args.settings.to_options());
    let params = args.settings.to_params();
    let image = SourceImage::open(&args.input)
        .with_context(|| format!("failed to open image {:?}", args.input))?;

    let surface = renderer
        .render_to_surface(&image, args.settings.sizing(), &params)
        .with_context(|| format!("failed to render {:?}", args.input))?;
    surface
        .save_png(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;

    info!("{} -> {:?}", params.readouts(), args.output);
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let renderer = PixelRenderer::new(args.settings.to_options());
    let params = args.settings.to_params();
    let sizing = args.settings.sizing();

    let mut entries: Vec<PathBuf> = WalkDir::new(&args.input)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no files found in {:?}", args.input);
    }

    let progress = ProgressBar::new(entries.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let mut rendered = 0usize;
    for entry in entries {
        progress.inc(1);

        let image = match SourceImage::open(&entry) {
            Ok(image) => image,
            Err(err) => {
                warn!("skipping {:?}: {err}", entry);
                continue;
            },
        };

        let output = batch_output_path(&args.input, &args.out_dir, &entry);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create output directory {:?}", parent))?;
        }

        renderer
            .render_to_surface(&image, sizing, &params)
            .with_context(|| format!("failed to render {:?}", entry))?
            .save_png(&output)
            .with_context(|| format!("failed to write {:?}", output))?;
        rendered += 1;
    }

    progress.finish_with_message(format!("{rendered} images written to {:?}", args.out_dir));
    if rendered == 0 {
        anyhow::bail!("no decodable images found in {:?}", args.input);
    }
    Ok(())
}

fn animate(args: AnimateArgs) -> Result<()> {
    let renderer = PixelRenderer::new(args.settings.to_options());
    let params = args.settings.to_params();
    let sizing = args.settings.sizing();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let frames = load_frames(&args.input)
        .with_context(|| format!("failed to load frames from {:?}", args.input))?;
    let progress = ProgressBar::new(frames.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames",
        )?
        .progress_chars("=> "),
    );

    let mut total = Duration::ZERO;
    for (index, frame) in frames.iter().enumerate() {
        let surface = renderer
            .render_to_surface(&frame.image, sizing, &params)
            .with_context(|| format!("failed to render frame {}", index))?;

        let frame_path = args.out_dir.join(format!("frame_{:04}.png", index));
        surface
            .save_png(&frame_path)
            .with_context(|| format!("failed to write {:?}", frame_path))?;
        total += frame.delay;
        progress.inc(1);
    }

    progress.finish_with_message(format!(
        "{} frames written to {:?} ({:.2}s total)",
        frames.len(),
        args.out_dir,
        total.as_secs_f32()
    ));
    Ok(())
}

fn batch_output_path(input_root: &Path, out_dir: &Path, entry: &Path) -> PathBuf {
    let relative = match entry.strip_prefix(input_root) {
        Ok(relative) if relative.file_name().is_some() => relative.to_path_buf(),
        // The input root was the file itself.
        _ => PathBuf::from(entry.file_name().unwrap_or(entry.as_os_str())),
    };
    out_dir.join(relative).with_extension("png")
}

fn parse_percent(value: &str) -> Result<f32, String> {
    let percent: f32 = value.parse().map_err(|_| format!("`{value}` is not a number"))?;
    if (0.0..=200.0).contains(&percent) {
        Ok(percent)
    } else {
        Err(format!("`{value}` is outside 0-200"))
    }
}

impl RenderSettings {
    fn to_params(&self) -> RenderParams {
        RenderParams::from_percentages(self.cell_size, self.contrast, self.saturation)
            .with_hue_degrees(self.hue_shift)
    }

    fn to_options(&self) -> RenderOptions {
        RenderOptions {
            style: self.style.to_style(),
            filter: self.filter.to_filter(),
            ..RenderOptions::default()
        }
    }

    fn sizing(&self) -> SizingPolicy {
        match self.width {
            0 => SizingPolicy::Native,
            width => SizingPolicy::FixedWidth(width),
        }
    }
}

impl StyleChoice {
    fn to_style(self) -> RenderStyle {
        match self {
            StyleChoice::Flat => RenderStyle::FlatSquare,
            StyleChoice::SquareWithDot => RenderStyle::SquareWithDot,
            StyleChoice::Dot => RenderStyle::Dot,
        }
    }
}

impl FilterChoice {
    fn to_filter(self) -> ResampleFilter {
        match self {
            FilterChoice::Nearest => ResampleFilter::Nearest,
            FilterChoice::Triangle => ResampleFilter::Triangle,
            FilterChoice::CatmullRom => ResampleFilter::CatmullRom,
            FilterChoice::Gaussian => ResampleFilter::Gaussian,
            FilterChoice::Lanczos3 => ResampleFilter::Lanczos3,
        }
    }
}
