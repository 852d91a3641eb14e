//! `gbx drawings` command - Drawing lookup and index building

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::{find_motor, find_reducer, parse_ratio, print_structured, Workspace};
use crate::cli::GlobalOpts;
use crate::core::drawings::{build_index, drawing_key, find_drawings};
use crate::core::loader::write_dataset;

#[derive(Subcommand, Debug)]
pub enum DrawingsCommands {
    /// List the 2D drawings and 3D models for a pairing
    Show(ShowArgs),

    /// Scan a drawing folder and write the drawing index
    Index(IndexArgs),
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Motor id or model name
    #[arg(long, short = 'm')]
    pub motor: String,

    /// Gearbox id or model name
    #[arg(long, short = 'g')]
    pub reducer: String,

    /// Gear ratio
    #[arg(long, short = 'r')]
    pub ratio: String,
}

#[derive(clap::Args, Debug)]
pub struct IndexArgs {
    /// Drawing root containing pdf/<series>/ and dwg/<series>/
    pub dir: PathBuf,

    /// Output file (default: drawings.json in the catalog directory)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(cmd: DrawingsCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        DrawingsCommands::Show(args) => run_show(args, global),
        DrawingsCommands::Index(args) => run_index(args, global),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;

    let motor = find_motor(&catalog, &args.motor)?;
    let reducer = find_reducer(&catalog, &args.reducer)?;
    let ratio = parse_ratio(&args.ratio)?;

    let key = drawing_key(motor, reducer, ratio).ok_or_else(|| {
        miette::miette!(
            "{} has no stage rating for ratio {}",
            reducer.model_name,
            ratio
        )
    })?;
    let drawings = find_drawings(&catalog.drawings, &key);

    if print_structured(&drawings, workspace.format(global))? {
        return Ok(());
    }

    let Some(drawings) = drawings else {
        println!("No drawings registered for {}", style(&key).cyan());
        return Ok(());
    };

    if !global.quiet {
        println!("{} {}", style("Drawings for").bold(), style(&key).cyan());
    }
    for file in &drawings.pdf {
        println!("2D  {}", file);
    }
    for file in &drawings.step {
        println!("3D  {}", file);
    }
    Ok(())
}

fn run_index(args: IndexArgs, global: &GlobalOpts) -> Result<()> {
    if !args.dir.is_dir() {
        return Err(miette::miette!("Drawing folder not found: {}", args.dir.display()));
    }

    let index = build_index(&args.dir)?;
    let output = match args.output {
        Some(path) => path,
        None => Workspace::open(global)?.data_dir.join("drawings.json"),
    };
    write_dataset(&output, &index)?;

    let files: usize = index.iter().map(|(_, set)| set.len()).sum();
    println!(
        "{} Indexed {} file(s) under {} key(s) into {}",
        style("✓").green(),
        style(files).cyan(),
        style(index.len()).cyan(),
        style(output.display()).cyan()
    );
    Ok(())
}
