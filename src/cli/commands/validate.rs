//! `gbx validate` command - Load the catalog and report what it holds

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{print_structured, Workspace};
use crate::cli::GlobalOpts;
use crate::core::selection::compatible_reducers;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Also report motors that no gearbox in the catalog accepts
    #[arg(long)]
    pub coverage: bool,
}

#[derive(Serialize)]
struct CatalogSummary {
    data_dir: String,
    motors: usize,
    reducers: usize,
    bushings: usize,
    adapter_models: usize,
    drawing_keys: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unmatched_motors: Vec<String>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;

    let unmatched_motors: Vec<String> = if args.coverage {
        catalog
            .motors
            .iter()
            .filter(|m| compatible_reducers(&catalog, m).is_empty())
            .map(|m| m.id.clone())
            .collect()
    } else {
        Vec::new()
    };

    let summary = CatalogSummary {
        data_dir: workspace.data_dir.display().to_string(),
        motors: catalog.motors.len(),
        reducers: catalog.reducers.len(),
        bushings: catalog.bushings.len(),
        adapter_models: catalog.adapters.len(),
        drawing_keys: catalog.drawings.len(),
        unmatched_motors,
    };
    if print_structured(&summary, workspace.format(global))? {
        return Ok(());
    }

    println!(
        "{} Catalog at {} is valid",
        style("✓").green(),
        style(&summary.data_dir).cyan()
    );
    if global.quiet {
        return Ok(());
    }
    println!();
    println!("  Motors:          {}", style(summary.motors).cyan());
    println!("  Gearboxes:       {}", style(summary.reducers).cyan());
    println!("  Bushings:        {}", style(summary.bushings).cyan());
    println!("  Adapter models:  {}", style(summary.adapter_models).cyan());
    println!("  Drawing keys:    {}", style(summary.drawing_keys).cyan());

    if args.coverage {
        println!();
        if summary.unmatched_motors.is_empty() {
            println!("{} Every motor fits at least one gearbox", style("✓").green());
        } else {
            println!(
                "{} {} motor(s) fit no gearbox: {}",
                style("!").yellow(),
                summary.unmatched_motors.len(),
                summary.unmatched_motors.join(", ")
            );
        }
    }
    Ok(())
}
