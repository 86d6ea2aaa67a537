mod buckets;
mod corpus;
mod error;
mod images;
mod output;
mod parser;
mod pipeline;
mod record;
mod registry;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use record::SourceType;
use registry::IdRegistry;
use settings::Settings;

#[derive(Parser)]
#[command(name = "chm2json", about = "Convert extracted help-file HTML into JSON / NDJSON records")]
struct Cli {
    /// Config file (default: ./chm2json.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root of the extracted HTML tree
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Source type recorded on every document
    #[arg(long, global = true, value_enum)]
    source_type: Option<SourceType>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the canonical image alias map from the duplicate report
    Dedup,
    /// Deduplicate images, then write one JSON record per document
    Convert {
        /// Skip the image deduplication step
        #[arg(long)]
        skip_dedup: bool,
    },
    /// Write topic-bucketed NDJSON files for the configured target folders
    Bundle,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(root) = cli.root {
        settings.root = root;
    }
    if let Some(source_type) = cli.source_type {
        settings.source_type = source_type;
    }
    info!(settings = ?settings, "Starting chm2json");

    let result = match cli.command {
        Commands::Dedup => run_dedup(&settings),
        Commands::Convert { skip_dedup } => {
            if !skip_dedup {
                run_dedup(&settings)?;
            }
            run_convert(&settings)
        }
        Commands::Bundle => run_bundle(&settings),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_dedup(settings: &Settings) -> anyhow::Result<()> {
    println!("Deduplicating images...");
    if let Some(parent) = settings.alias_map_file.parent() {
        output::ensure_dir(parent)?;
    }
    let map = images::deduplicate(&settings.duplicates_file, &settings.alias_map_file)
        .context("Image deduplication failed")?;
    println!("Deduplication complete. Unique images: {}", map.canonical.len());
    println!("Duplicate images removed: {}", map.duplicates.len());
    Ok(())
}

fn run_convert(settings: &Settings) -> anyhow::Result<()> {
    let docs = corpus::discover(&settings.root, &settings.root, &settings.extensions);
    if docs.is_empty() {
        println!("No documents found under {}.", settings.root.display());
        return Ok(());
    }

    let mut registry = IdRegistry::load(&settings.id_map_file)
        .with_context(|| format!("Failed to load {}", settings.id_map_file.display()))?;
    if registry.is_empty() {
        info!("Id map is empty, every document gets a new identifier");
    }

    println!("Converting {} documents to JSON...", docs.len());
    let counts = pipeline::convert_documents(&docs, &mut registry, settings)?;

    if let Some(parent) = settings.id_map_file.parent() {
        output::ensure_dir(parent)?;
    }
    registry
        .save(&settings.id_map_file)
        .with_context(|| format!("Failed to save {}", settings.id_map_file.display()))?;

    counts.print();
    println!("Id map now holds {} identifiers.", registry.len());
    Ok(())
}

fn run_bundle(settings: &Settings) -> anyhow::Result<()> {
    let mut docs = Vec::new();
    for target in &settings.targets {
        let dir = settings.root.join(target);
        if !dir.is_dir() {
            warn!("Target folder {} not found", dir.display());
            continue;
        }
        docs.extend(corpus::discover(&settings.root, &dir, &settings.extensions));
    }

    println!("Bundling {} documents to NDJSON...", docs.len());
    let run = pipeline::bundle_documents(&docs, settings)?;
    pipeline::flush_buckets(&run.buckets, settings)?;
    run.print();
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
