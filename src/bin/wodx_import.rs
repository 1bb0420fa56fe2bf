// ABOUTME: One-shot import of a file-backed workout collection into the hosted table
// ABOUTME: Reads SUPABASE_URL and SUPABASE_ANON_KEY, inserts each record, and reports totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, warn};
use wodx::{
    config::StoreConfig,
    constants::defaults,
    logging,
    storage::{import_records, open_store, FileWorkoutStore},
};

#[derive(Parser)]
#[command(name = "wodx-import")]
#[command(about = "Copy workouts from a JSON file into the hosted table")]
struct Args {
    /// JSON document holding the records to import
    #[arg(long, default_value = defaults::DATA_FILE)]
    file: PathBuf,

    /// List what would be inserted without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let target_config = StoreConfig::hosted_from_env()?;
    let target = open_store(&target_config).await?;

    if !args.file.exists() {
        bail!("Source file not found: {}", args.file.display());
    }
    let source = FileWorkoutStore::new(&args.file);

    info!(
        "Importing {} into the hosted table{}",
        args.file.display(),
        if args.dry_run { " (dry run)" } else { "" }
    );

    let report = import_records(&source, target.as_ref(), args.dry_run).await?;

    info!(
        "Import finished: {} total, {} inserted, {} already present, {} failed",
        report.total,
        report.inserted.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for (date, message) in &report.failed {
        warn!("{date}: {message}");
    }

    if !report.is_clean() {
        bail!("{} record(s) failed to import", report.failed.len());
    }
    Ok(())
}
