//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    adapter::AdapterArgs, bushing::BushingArgs, candidates::CandidatesArgs,
    completions::CompletionsArgs, drawings::DrawingsCommands, import::ImportArgs, init::InitArgs,
    motor::MotorCommands, ratios::RatiosArgs, reducer::ReducerCommands, select::SelectArgs,
    validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "gbx")]
#[command(author, version, about = "Servo motor and planetary gearbox selection")]
#[command(long_about = "Pick a gearbox for a servo motor: check shaft fit, size output speed and torque, \
grade the service factor against the load, and resolve the adapter, bushing and drawings to order.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .gbx/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gbx project with a sample catalog
    Init(InitArgs),

    /// Browse servo motors
    #[command(subcommand)]
    Motor(MotorCommands),

    /// Browse gearboxes
    #[command(subcommand)]
    Reducer(ReducerCommands),

    /// List ratios available for a motor
    Ratios(RatiosArgs),

    /// Rank the gearboxes that fit a motor at a ratio
    Candidates(CandidatesArgs),

    /// Size one motor/gearbox pairing and optionally write a quote report
    Select(SelectArgs),

    /// Resolve the adapter for a motor and gearbox
    Adapter(AdapterArgs),

    /// Check how a shaft fits a bore
    Bushing(BushingArgs),

    /// Drawing lookup and index building
    #[command(subcommand)]
    Drawings(DrawingsCommands),

    /// Import a CSV export into the catalog
    Import(ImportArgs),

    /// Load and validate the catalog
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (table for lists, detail view for single records)
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// Aligned columns for the terminal
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
