//! Chipstore CLI: load chips, apply selections, print the partitions.
//!
//! Usage:
//!   chipstore <chips.json|chips.yaml> [--select ID]... [--deselect ID]... [--json]
//!   chipstore <chips> --config store.yaml --verbose

use chipstore::{Chip, ChipId, ChipStore, Partition, StoreConfig};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "chipstore",
    version,
    about = "Partition chips into original, filtered and selected sets"
)]
struct Cli {
    /// JSON or YAML file holding an array of chips
    chips: PathBuf,
    /// Select a chip by id (applied in order, before deselections)
    #[arg(long = "select", value_name = "ID")]
    select: Vec<String>,
    /// Deselect a chip by id (applied in order, after selections)
    #[arg(long = "deselect", value_name = "ID")]
    deselect: Vec<String>,
    /// Path to a YAML store configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the partitions as JSON
    #[arg(long)]
    json: bool,
    /// Log every store operation to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn read_chips(path: &Path) -> Result<Vec<Chip>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&contents).map_err(|e| format!("Invalid chips file: {}", e))
    } else {
        serde_json::from_str(&contents).map_err(|e| format!("Invalid chips file: {}", e))
    }
}

/// Find a chip the store knows by id, falling back to a non-filterable
/// chip so ids outside the loaded set can still be selected.
fn resolve(store: &ChipStore, id: &str) -> Chip {
    let id = ChipId::from(id);
    let snapshot = store.snapshot();
    snapshot
        .filtered
        .into_iter()
        .chain(snapshot.selected)
        .find(|chip| chip.id == id)
        .unwrap_or_else(|| Chip::with_id(id.clone(), id.as_str()))
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => StoreConfig::from_path(path)
            .map_err(|e| format!("Failed to load config {}: {}", path.display(), e))?,
        None => StoreConfig::default(),
    };
    let store = ChipStore::with_config(config);
    store
        .load(read_chips(&cli.chips)?)
        .map_err(|e| e.to_string())?;

    for id in &cli.select {
        store
            .select_chip(&resolve(&store, id))
            .map_err(|e| e.to_string())?;
    }
    for id in &cli.deselect {
        store
            .deselect_chip(&resolve(&store, id))
            .map_err(|e| e.to_string())?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&store.snapshot())
            .map_err(|e| format!("Failed to serialize partitions: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    let snapshot = store.snapshot();
    for partition in [Partition::Filtered, Partition::Selected] {
        let chips = snapshot.get(partition);
        println!("{} ({})", partition, chips.len());
        println!("{}", "-".repeat(48));
        for chip in chips {
            println!("  {:<20}  {}", chip.id.as_str(), chip.title);
        }
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
