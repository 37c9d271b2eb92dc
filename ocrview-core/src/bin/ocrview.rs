use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use ocrview_core::{
    ViewerConfig,
    consts::*,
    locate,
    pipeline::{self, LoadedDocument, Outcome},
    render::Rendered,
};

#[derive(Parser)]
#[command(name = "ocrview")]
#[command(about = "Overlay OCR blocks and parsed labels on an invoice image")]
struct Args {
    #[arg(help = "Invoice folder, relative to --base-dir unless absolute")]
    folder: PathBuf,

    #[arg(
        short,
        long,
        default_value = DEFAULT_BASE_DIR,
        help = "Base directory containing documents"
    )]
    base_dir: PathBuf,

    #[arg(short, long, help = "State file name in the folder, overrides auto-selection")]
    state: Option<String>,

    #[arg(long, help = "Draw OCR blocks onto a static image instead of hover overlays")]
    static_only: bool,

    #[arg(long, help = "Leave parsed_json_ocr boxes out of the overlay")]
    no_parsed: bool,

    #[arg(short, long = "label", help = "Only show parsed boxes with this label (repeatable)")]
    labels: Vec<String>,

    #[arg(long, default_value_t = THUMBNAIL_WIDTH, help = "Width of hover zoom thumbnails")]
    thumb_width: u32,

    #[arg(long, help = "TrueType font for static labels")]
    font: Option<PathBuf>,

    #[arg(short, long, default_value = "overlay", help = "Output directory")]
    output: PathBuf,
}

fn config_from_args(args: &Args) -> ViewerConfig {
    let defaults = ViewerConfig::default();
    ViewerConfig {
        interactive: !args.static_only,
        include_parsed: !args.no_parsed,
        label_filter: (!args.labels.is_empty()).then(|| args.labels.iter().cloned().collect()),
        thumbnail_width: args.thumb_width,
        // --font wins over the environment
        font_path: args.font.clone().or(defaults.font_path),
    }
}

fn print_summary(loaded: &LoadedDocument, outcome: &Outcome) {
    println!("\n=== Overlay Summary ===");
    println!("Folder: {} ({} files)", loaded.folder.display(), loaded.files.len());
    println!("Image: {}", loaded.image_path.display());
    println!("State: {}", loaded.state_path.display());
    println!(
        "Image size: {}x{}",
        loaded.image.width(),
        loaded.image.height()
    );
    println!("OCR blocks: {}", outcome.document.ocr.boxes.len());
    println!("Parsed boxes: {}", outcome.document.parsed.boxes.len());

    let labels = outcome.document.labels();
    if !labels.is_empty() {
        println!(
            "Labels: {}",
            labels.into_iter().collect::<Vec<_>>().join(", ")
        );
    }

    for note in outcome.notes() {
        println!("Note: {note}");
    }

    match &outcome.rendered {
        Rendered::Interactive(overlay) => {
            println!("Mode: interactive (surface height {:.0}px)", overlay.height_hint)
        }
        Rendered::Static(_) => println!("Mode: static"),
    }
    for path in &outcome.written {
        println!("Wrote: {}", path.display());
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let folder = locate::resolve_folder(&args.base_dir, &args.folder);
    info!("Document folder: {}", folder.display());
    info!("Output directory: {}", args.output.display());

    let config = config_from_args(&args);

    let loaded = LoadedDocument::load(&folder, args.state.as_deref()).inspect_err(|err| {
        error!("{err}");
    })?;

    let outcome = pipeline::run(&loaded, &config, &args.output).inspect_err(|err| {
        error!("{err}");
    })?;

    print_summary(&loaded, &outcome);
    info!("Overlay completed successfully!");
    Ok(())
}
