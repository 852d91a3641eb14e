//! `gbx adapter` command - Resolve the flange adapter for a pairing

use console::style;
use miette::Result;

use crate::cli::helpers::{find_motor, find_reducer, print_structured, Workspace};
use crate::cli::GlobalOpts;
use crate::core::find_adapter;

#[derive(clap::Args, Debug)]
pub struct AdapterArgs {
    /// Motor id or model name
    #[arg(long, short = 'm')]
    pub motor: String,

    /// Gearbox id or model name
    #[arg(long, short = 'g')]
    pub reducer: String,
}

pub fn run(args: AdapterArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;

    let motor = find_motor(&catalog, &args.motor)?;
    let reducer = find_reducer(&catalog, &args.reducer)?;
    let adapter = find_adapter(&catalog.adapters, &reducer.model_name, motor);

    if print_structured(&adapter, workspace.format(global))? {
        return Ok(());
    }

    let Some(adapter) = adapter else {
        println!(
            "{} No adapter registered for {} with shaft {}",
            style("✗").red(),
            style(&reducer.model_name).cyan(),
            motor.shaft_key()
        );
        return Ok(());
    };

    println!(
        "{} {} {}",
        style("✓").green(),
        style(&adapter.adapter_type).bold(),
        style(&adapter.code).cyan()
    );
    if global.quiet {
        return Ok(());
    }
    println!("  Gearbox: {} ({})", adapter.reducer_model, adapter.shaft);
    println!("  Matched: {}", adapter.matched_by);
    match motor.flange_code() {
        Some(code) if code.to_string() != adapter.code => {
            println!(
                "  {} motor flange is {}; check the adapter drawing before ordering",
                style("!").yellow(),
                code
            );
        }
        Some(_) => {}
        None => println!("  {}", style("motor flange data incomplete").dim()),
    }
    Ok(())
}
