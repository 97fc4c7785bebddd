use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::prelude::*;

use flyerscan::core::geometry::Region;
use flyerscan::export::ExportFormat;
use flyerscan::ocr::{OcrSource, VisionJsonSource};
use flyerscan::pipeline::export_flyer;
use flyerscan::{FlyerConfig, FlyerPipeline, PageSource};

#[derive(Parser, Debug)]
#[command(name = "flyerscan")]
#[command(version, about = "Structured ad extraction from OCR'd retail flyers", long_about = None)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a flyer from a saved Cloud Vision response
    Process {
        /// Cloud Vision response JSON
        input: PathBuf,

        /// Detector regions: a JSON array with one list of regions per page
        #[arg(short, long)]
        segments: Option<PathBuf>,

        /// Output directory (default: ./<input_name>_output)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Flyer name (default: input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format(s) to generate
        #[arg(short, long, value_enum, default_values_t = vec![Format::Json])]
        format: Vec<Format>,
    },

    /// Show the components extracted from every block
    Inspect {
        /// Cloud Vision response JSON
        input: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Json,
    Text,
}

impl From<Format> for ExportFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ExportFormat::Json,
            Format::Text => ExportFormat::Text,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Process {
            input,
            segments,
            output,
            name,
            config,
            format,
        } => process(input, segments, output, name, config, format),
        Commands::Inspect { input, config } => inspect(input, config),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "flyerscan=debug" } else { "flyerscan=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FlyerConfig> {
    let config = match path {
        Some(path) => FlyerConfig::from_json_file(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?,
        None => FlyerConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn load_pages(input: &Path) -> Result<Vec<PageSource>> {
    if !input.is_file() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    let file_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let pages = VisionJsonSource
        .load_pages(input)
        .with_context(|| format!("Failed to read OCR response: {}", input.display()))?;

    Ok(pages
        .into_iter()
        .zip(1u32..)
        .map(|(annotation, number)| PageSource::new(number, file_name.clone(), annotation))
        .collect())
}

fn process(
    input: PathBuf,
    segments: Option<PathBuf>,
    output: Option<PathBuf>,
    name: Option<String>,
    config: Option<PathBuf>,
    formats: Vec<Format>,
) -> Result<()> {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "flyer".to_string());
    let name = name.unwrap_or_else(|| stem.clone());
    let output_dir = output.unwrap_or_else(|| PathBuf::from(format!("{stem}_output")));

    let config = load_config(config.as_deref())?;
    let pipeline = FlyerPipeline::from_config(&config).context("Invalid configuration")?;
    let pages = load_pages(&input)?;

    println!("[*] Processing: {}", input.display());
    println!("[*] Pages: {}", pages.len());

    let flyer = match segments {
        Some(path) => {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read segments: {}", path.display()))?;
            let segmentations: Vec<Vec<Region>> = serde_json::from_str(&data)
                .with_context(|| format!("Invalid segments file: {}", path.display()))?;
            pipeline.process_segmented_flyer(&pages, &segmentations, &name)?
        }
        None => pipeline.process_flyer(&pages, &name),
    };

    let formats: Vec<ExportFormat> = formats.into_iter().map(ExportFormat::from).collect();
    export_flyer(&flyer, &output_dir, &formats)
        .with_context(|| format!("Failed to export to: {}", output_dir.display()))?;

    println!(
        "[✓] {} ad block(s) on {} page(s), flyer type {:?}",
        flyer.ad_block_count(),
        flyer.pages.len(),
        flyer.flyer_type
    );
    println!("[✓] Results saved to: {}", output_dir.display());
    Ok(())
}

fn inspect(input: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let pipeline = FlyerPipeline::from_config(&config).context("Invalid configuration")?;
    let pages = load_pages(&input)?;

    for page in &pages {
        println!("=== Page {} ===", page.number);
        for block in page.annotation.blocks() {
            let components = pipeline.extractor().extract_components(block);
            let kinds: Vec<String> = components
                .iter()
                .map(|component| format!("{:?}", component.kind()))
                .collect();
            println!("{:<50} -> {}", block.normalized_text(), kinds.join(", "));
        }
        println!();
    }
    Ok(())
}
