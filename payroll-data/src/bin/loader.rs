use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::{EmployeeStore, ImportAdapter};
use payroll_data::{LoaderConfig, PayloadFormat, load_file, render_table, seed_store};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Load employee payloads, compute withholding and print the result.
///
/// Payload files are JSON arrays or CSV tables of employees. Field names are
/// resolved through a mapping profile: `canonical` (`name`, `grossSalary`,
/// ...), `localized` (`nome`, `salario`, ...) or one defined in the config
/// file. A file with any malformed record is rejected as a whole.
#[derive(Parser, Debug)]
#[command(name = "payroll-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Payload file to import (repeatable, imported in order)
    #[arg(short, long = "file")]
    files: Vec<PathBuf>,

    /// Payload format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    format: Option<PayloadFormat>,

    /// TOML file with extra mapping profiles
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Mapping profile used for the payload files
    #[arg(short, long)]
    profile: Option<String>,

    /// Import the built-in sample employees first
    #[arg(short, long, default_value_t = false)]
    seed: bool,

    /// Only show employees whose name contains this text (case-insensitive)
    #[arg(long, default_value = "")]
    name: String,

    /// Only show employees whose taxpayer id contains this text
    #[arg(long, default_value = "")]
    taxpayer_id: String,

    /// Print records as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LoaderConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LoaderConfig::default(),
    };
    let mapping = config
        .mapping(args.profile.as_deref())
        .context("Failed to resolve mapping profile")?;
    debug!(profiles = ?config.profile_names(), "config loaded");
    let adapter = ImportAdapter::new(mapping);

    let store = EmployeeStore::new();

    if args.seed {
        seed_store(&store).context("Failed to import seed data")?;
    }

    for path in &args.files {
        let raws = load_file(path, args.format)
            .with_context(|| format!("Failed to parse: {}", path.display()))?;
        let imported = store
            .import_raw(&raws, &adapter)
            .with_context(|| format!("Failed to import: {}", path.display()))?;
        info!(file = %path.display(), count = imported.len(), "payload imported");
    }

    store.set_filter(args.name, args.taxpayer_id);
    let records = store.query();

    if args.json {
        let json = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
        println!("{json}");
    } else {
        println!("{}", render_table(&records));
    }

    Ok(())
}
