//! `gbx motor` command - Browse the motor catalog

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::{find_motor, print_structured, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::keys::format_number;
use crate::entities::Motor;

#[derive(Subcommand, Debug)]
pub enum MotorCommands {
    /// List motors with filtering
    List(ListArgs),

    /// Show a motor's details
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by brand (case-insensitive)
    #[arg(long, short = 'b')]
    pub brand: Option<String>,

    /// Filter by series (case-insensitive)
    #[arg(long, short = 's')]
    pub series: Option<String>,

    /// Filter by category, the basic motor type (case-insensitive)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Search in id, model name and type
    #[arg(long)]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Motor id or model name
    pub id: String,
}

const LIST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 10),
    ColumnDef::new("brand", "BRAND", 14),
    ColumnDef::new("model", "MODEL", 22),
    ColumnDef::new("shaft", "SHAFT", 7),
    ColumnDef::new("power", "POWER", 9),
    ColumnDef::new("torque", "TORQUE", 8),
    ColumnDef::new("rpm", "RPM", 7),
    ColumnDef::new("flange", "FLANGE", 16),
];

pub fn run(cmd: MotorCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        MotorCommands::List(args) => run_list(args, global),
        MotorCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let format = workspace.format(global);

    let search = args.search.as_deref().map(str::to_lowercase);
    let mut motors: Vec<&Motor> = catalog
        .motors
        .iter()
        .filter(|m| {
            args.brand
                .as_deref()
                .is_none_or(|b| m.brand.eq_ignore_ascii_case(b))
        })
        .filter(|m| {
            args.series
                .as_deref()
                .is_none_or(|s| m.series.eq_ignore_ascii_case(s))
        })
        .filter(|m| {
            args.category
                .as_deref()
                .is_none_or(|c| m.basic_type.eq_ignore_ascii_case(c))
        })
        .filter(|m| {
            search.as_deref().is_none_or(|q| {
                m.id.to_lowercase().contains(q)
                    || m.model_name.to_lowercase().contains(q)
                    || m.basic_type.to_lowercase().contains(q)
            })
        })
        .collect();

    if let Some(limit) = args.limit {
        motors.truncate(limit);
    }

    if args.count {
        println!("{}", motors.len());
        return Ok(());
    }

    if print_structured(&motors, format)? {
        return Ok(());
    }

    if motors.is_empty() {
        println!("No motors found.");
        return Ok(());
    }

    let rows: Vec<TableRow> = motors
        .iter()
        .map(|m| {
            TableRow::new()
                .cell("id", CellValue::Id(m.id.clone()))
                .cell("brand", CellValue::Text(m.brand.clone()))
                .cell("model", CellValue::Text(m.model_name.clone()))
                .cell("shaft", CellValue::Text(format_number(m.shaft_diameter)))
                .cell("power", CellValue::Text(m.power_display()))
                .cell("torque", CellValue::Float(m.rated_torque, 2))
                .cell("rpm", CellValue::Text(format_number(m.rated_rpm)))
                .cell("flange", CellValue::opt_text(m.adapter_code.clone()))
        })
        .collect();

    let formatter = TableFormatter::new(LIST_COLUMNS, "motor");
    if global.quiet {
        formatter.without_summary().output(&rows, format);
    } else {
        formatter.output(&rows, format);
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let motor = find_motor(&catalog, &args.id)?;

    if print_structured(motor, workspace.format(global))? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&motor.id).cyan());
    println!("{}: {}", style("Motor").bold(), style(motor.display_name()).yellow());
    if !motor.series.is_empty() {
        println!("{}: {}", style("Series").bold(), motor.series);
    }
    if !motor.basic_type.is_empty() {
        println!("{}: {}", style("Type").bold(), motor.basic_type);
    }
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Rated power").bold(), motor.power_display());
    println!("{}: {:.2} N·m", style("Rated torque").bold(), motor.rated_torque);
    if motor.peak_torque > 0.0 {
        println!("{}: {:.2} N·m", style("Peak torque").bold(), motor.peak_torque);
    }
    println!("{}: {} rpm", style("Rated speed").bold(), format_number(motor.rated_rpm));
    if motor.max_rpm > 0.0 {
        println!("{}: {} rpm", style("Max speed").bold(), format_number(motor.max_rpm));
    }
    if motor.inertia > 0.0 {
        println!("{}: {} kg·cm²", style("Inertia").bold(), format_number(motor.inertia));
    }
    if let Some(weight) = motor.weight_kg {
        println!("{}: {} kg", style("Weight").bold(), format_number(weight));
    }

    println!();
    println!("{}", style("Shaft and flange").bold());
    println!("  Shaft: {} mm ({})", format_number(motor.shaft_diameter), motor.shaft_key());
    if let Some(length) = motor.shaft_length {
        println!("  Shaft length: {} mm", format_number(length));
    }
    if let Some(dia) = motor.centering_dia {
        println!("  Centering: {} mm", format_number(dia));
    }
    if let Some(pcd) = motor.fixing_pcd {
        println!("  Fixing PCD: {} mm", format_number(pcd));
    }
    if let Some(tap) = &motor.mounting_tap {
        println!("  Mounting tap: {}", tap);
    }
    match motor.flange_code() {
        Some(code) => println!("  Adapter code: {}", style(code).cyan()),
        None => println!("  Adapter code: {}", style("incomplete flange data").dim()),
    }
    println!("{}", style("─".repeat(60)).dim());

    Ok(())
}
