//! `gbx import` command - Rebuild a catalog dataset from a CSV export

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::cli::helpers::Workspace;
use crate::cli::GlobalOpts;
use crate::core::import::{import_bushings, import_motors, import_reducers, ImportKind, ImportReport};
use crate::core::loader::{find_dataset, load_dataset, write_dataset};
use crate::entities::adapter::RawAdapterCatalog;
use crate::entities::AdapterCatalog;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Dataset to rebuild (bushings, motors, reducers)
    pub kind: ImportKind,

    /// CSV file to import
    pub file: Option<PathBuf>,

    /// Print the expected CSV header row and exit
    #[arg(long)]
    pub template: bool,

    /// Validate CSV without writing the dataset
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    if args.template {
        println!("{}", args.kind.columns().join(","));
        return Ok(());
    }

    let file_path = args
        .file
        .clone()
        .ok_or_else(|| miette::miette!("CSV file required. Usage: gbx import {} data.csv", args.kind))?;
    if !file_path.exists() {
        return Err(miette::miette!("File not found: {}", file_path.display()));
    }

    let workspace = Workspace::open(global)?;
    let target = workspace.data_dir.join(format!("{}.json", args.kind.dataset()));

    if !global.quiet {
        println!(
            "{} Importing {} from {}{}",
            style("→").blue(),
            style(args.kind).cyan(),
            style(file_path.display()).yellow(),
            if args.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
    }

    let input = File::open(&file_path).into_diagnostic()?;
    let summary = match args.kind {
        ImportKind::Bushings => finish(import_bushings(input)?, &target, args.dry_run)?,
        ImportKind::Motors => finish(import_motors(input)?, &target, args.dry_run)?,
        ImportKind::Reducers => {
            let adapters = load_adapters(&workspace.data_dir)?;
            if adapters.is_empty() {
                tracing::warn!("no adapter catalog; imported gearboxes get a 0 mm input bore");
            }
            finish(import_reducers(input, &adapters)?, &target, args.dry_run)?
        }
    };

    if global.quiet {
        return Ok(());
    }

    println!();
    println!("{}", style("─".repeat(50)).dim());
    println!("{}", style("Import Summary").bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  Rows processed:   {}", style(summary.rows).cyan());
    println!("  Records written:  {}", style(summary.records).green());
    if summary.skipped > 0 {
        println!("  Skipped:          {}", style(summary.skipped).dim());
    }

    if args.dry_run {
        println!();
        println!("{}", style("Dry run complete. No files were written.").yellow());
    } else {
        println!();
        println!(
            "{} Wrote {}",
            style("✓").green(),
            style(target.display()).cyan()
        );
    }
    Ok(())
}

struct Summary {
    rows: usize,
    records: usize,
    skipped: usize,
}

fn finish<T: Serialize>(report: ImportReport<T>, target: &Path, dry_run: bool) -> Result<Summary> {
    if !dry_run {
        write_dataset(target, &report.records)?;
    }
    Ok(Summary {
        rows: report.rows,
        records: report.records.len(),
        skipped: report.skipped,
    })
}

/// Adapter catalog from the data directory, empty when absent
fn load_adapters(data_dir: &Path) -> Result<AdapterCatalog> {
    match find_dataset(data_dir, "adapters") {
        Some(path) => {
            let raw: RawAdapterCatalog = load_dataset(&path)?;
            Ok(AdapterCatalog::from_raw(raw)?)
        }
        None => Ok(AdapterCatalog::default()),
    }
}
