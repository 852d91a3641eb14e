//! `gbx bushing` command - How a motor shaft fits a gearbox bore

use console::style;
use miette::Result;

use crate::cli::helpers::{print_structured, Workspace};
use crate::cli::GlobalOpts;
use crate::core::compat::{shaft_fit, ShaftFit};
use crate::core::keys::format_number;

#[derive(clap::Args, Debug)]
pub struct BushingArgs {
    /// Motor shaft diameter in mm
    pub shaft: f64,

    /// Gearbox input bore in mm
    pub bore: f64,
}

pub fn run(args: BushingArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;

    let fit = shaft_fit(&catalog.bushings, args.shaft, args.bore);
    if print_structured(&fit, workspace.format(global))? {
        return Ok(());
    }

    let shaft = format_number(args.shaft);
    let bore = format_number(args.bore);
    match fit {
        ShaftFit::Direct => println!(
            "{} {} mm shaft fits the {} mm bore directly",
            style("✓").green(),
            shaft,
            bore
        ),
        ShaftFit::Bushing { bushing } => {
            println!(
                "{} {} mm shaft fits the {} mm bore with bushing {}",
                style("✓").green(),
                shaft,
                bore,
                style(&bushing.code).cyan()
            );
            if bushing.len_mm > 0.0 && !global.quiet {
                println!("  Length: {} mm", format_number(bushing.len_mm));
            }
        }
        ShaftFit::Incompatible if args.shaft > args.bore => println!(
            "{} {} mm shaft is larger than the {} mm bore",
            style("✗").red(),
            shaft,
            bore
        ),
        ShaftFit::Incompatible => println!(
            "{} No bushing registered for {} mm into {} mm",
            style("✗").red(),
            shaft,
            bore
        ),
    }
    Ok(())
}
