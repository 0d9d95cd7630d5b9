use anyhow::Context;
use clap::Parser;
use image::{DynamicImage, ImageReader};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use patchscan::{
    Classification, ClassificationPipeline, Config, MatchPolicy, PerceptualMatcher, Segmenter,
    TemplateLibrary,
};

#[derive(Parser)]
#[command(name = "patchscan")]
#[command(about = "Find objects on a white scan and identify the Kodak color and gray patches")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Directory holding the eight template images
    #[arg(short, long, value_name = "DIR")]
    templates: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// How to pick between several qualifying matches
    #[arg(long, value_enum)]
    policy: Option<MatchPolicy>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,

    /// Save intermediate segmentation masks to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = match &args.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = args.templates {
        config.template_dir = dir;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    let library = Arc::new(TemplateLibrary::new(config.template_dir.clone()));
    for missing in library.verify() {
        warn!("Missing template: {}", library.path_of(&missing).display());
    }

    let mut segmenter = Segmenter::new(&config.segmentation);
    if let Some(debug_dir) = args.debug_out {
        segmenter = segmenter
            .with_debug(debug_dir.clone())
            .with_context(|| format!("Cannot use debug directory {}", debug_dir.display()))?;
    }

    let pipeline = ClassificationPipeline::new(segmenter, PerceptualMatcher::new(library))
        .with_policy(config.policy);

    info!("Loading image: {}", args.image_path.display());
    let img = ImageReader::open(&args.image_path)
        .with_context(|| format!("Failed to open {}", args.image_path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    info!("Image loaded: {}x{}", img.width(), img.height());
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let result = pipeline
        .classify(Some(&img))
        .context("Classification aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(result.as_ref());
    }

    Ok(())
}

fn print_report(result: Option<&Classification>) {
    println!("\n=== Patch Detection Results ===");

    let Some(result) = result else {
        println!("Segmentation produced no result.");
        return;
    };

    println!("Total contours: {}", result.contours.len());
    for d in &result.distances {
        println!(
            "  Contour {} at ({}, {}) {}x{} - color {:?} gray {:?}",
            d.index, d.bbox.x, d.bbox.y, d.bbox.width, d.bbox.height, d.color, d.gray
        );
    }

    match result.color_match {
        Some(m) => println!(
            "Color patch: contour {} ({}, distance {})",
            m.contour_index, m.orientation, m.distance
        ),
        None => println!("Color patch: not found"),
    }
    match result.gray_match {
        Some(m) => println!(
            "Gray patch: contour {} ({}, distance {})",
            m.contour_index, m.orientation, m.distance
        ),
        None => println!("Gray patch: not found"),
    }
}
