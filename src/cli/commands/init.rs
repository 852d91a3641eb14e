//! `gbx init` command - Initialize a new gbx project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::Path;

use crate::cli::GlobalOpts;
use crate::core::project::{sample_datasets, Project, ProjectError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: std::path::PathBuf,

    /// Force initialization even if .gbx/ already exists (rewrites the sample catalog)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, global: &GlobalOpts) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        if !global.quiet {
            println!(
                "{} Created directory {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized gbx project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            if global.quiet {
                return Ok(());
            }
            println!();
            println!("Created project structure:");
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} List catalog motors",
                style("gbx motor list").yellow()
            );
            println!(
                "  {} Rank gearboxes for a motor",
                style("gbx candidates --motor M0001 --ratio 10").yellow()
            );
            println!(
                "  {} Import your own catalog",
                style("gbx import motors motors.csv").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} gbx project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("gbx init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let mut entries = vec![".gbx/".to_string(), ".gbx/config.yaml".to_string(), "data/".to_string()];
    entries.extend(sample_datasets().into_iter().map(|name| format!("data/{}", name)));

    for entry in entries {
        if root.join(&entry).exists() {
            let marker = if entry.ends_with('/') { "+" } else { "-" };
            println!("  {} {}", marker, style(entry).dim());
        }
    }
}
