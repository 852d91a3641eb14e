//! `gbx select` command - Size one motor/gearbox pairing

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{find_motor, find_reducer, parse_ratio, print_structured, Workspace};
use crate::cli::GlobalOpts;
use crate::core::compat::is_shaft_compatible;
use crate::core::drawings::{drawing_key, find_drawings};
use crate::core::keys::format_number;
use crate::core::report::{ReportContext, ReportGenerator};
use crate::core::selection::{SelectionResult, SelectionSession};
use crate::core::suitability::Suitability;

#[derive(clap::Args, Debug)]
pub struct SelectArgs {
    /// Motor id or model name
    #[arg(long, short = 'm')]
    pub motor: String,

    /// Gearbox id or model name (e.g. GPB060)
    #[arg(long, short = 'g')]
    pub reducer: String,

    /// Gear ratio (e.g. 10)
    #[arg(long, short = 'r')]
    pub ratio: String,

    /// Load type: uniform, moderate-shock, heavy-shock (default from config)
    #[arg(long, short = 'l')]
    pub load_type: Option<String>,

    /// Operating hours per day
    #[arg(long)]
    pub hours: Option<f64>,

    /// Mounting direction (e.g. horizontal, vertical)
    #[arg(long)]
    pub mounting: Option<String>,

    /// Write a Markdown quote request to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: SelectArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;

    let motor = find_motor(&catalog, &args.motor)?;
    let reducer = find_reducer(&catalog, &args.reducer)?;
    let ratio = parse_ratio(&args.ratio)?;

    if !is_shaft_compatible(&catalog.bushings, motor.shaft_diameter, reducer.shaft_hole_diameter) {
        return Err(miette::miette!(
            help = "run `gbx reducer list --motor <ID>` for gearboxes that fit",
            "{} ({} mm shaft) does not fit {} ({} mm bore)",
            motor.display_name(),
            format_number(motor.shaft_diameter),
            reducer.model_name,
            format_number(reducer.shaft_hole_diameter)
        ));
    }
    if !reducer.supports(ratio) {
        let offered: Vec<String> = reducer.supported_ratios.iter().map(|r| r.to_string()).collect();
        return Err(miette::miette!(
            "{} is not offered with ratio {} (available: {})",
            reducer.model_name,
            ratio,
            offered.join(", ")
        ));
    }

    let mut session = SelectionSession::new();
    session.select_motor(Some(motor.clone()));
    session.next();
    session.set_conditions(workspace.conditions(
        args.load_type.as_deref(),
        args.hours,
        args.mounting.as_deref(),
    ));
    session.next();
    session.select_type(Some(reducer.reducer_type.clone()).filter(|t| !t.is_empty()));
    session.select_series(Some(reducer.series.clone()));
    session.select_ratio(Some(ratio));
    session.select_reducer(Some(reducer.clone()));
    session.next();

    let result = session
        .confirm(&catalog)
        .cloned()
        .ok_or_else(|| miette::miette!("Selection is incomplete"))?;
    session.next();
    tracing::debug!(step = session.step().number(), sf = result.service_factor, "selection confirmed");

    if let Some(path) = &args.report {
        let drawings = drawing_key(motor, reducer, ratio).and_then(|key| find_drawings(&catalog.drawings, &key));
        let generator = ReportGenerator::new()?;
        let ctx = ReportContext::new(&result, session.conditions()).with_drawings(drawings.as_ref());
        let markdown = generator.render_quote(&ctx)?;
        std::fs::write(path, markdown).into_diagnostic()?;
        if !global.quiet {
            eprintln!(
                "{} Wrote quote request to {}",
                style("✓").green(),
                style(path.display()).cyan()
            );
        }
    }

    if print_structured(&result, workspace.format(global))? {
        return Ok(());
    }

    print_result(&result);
    Ok(())
}

fn print_result(result: &SelectionResult) {
    let verdict = match result.suitability {
        Suitability::Suitable => style("SUITABLE").green().bold(),
        Suitability::Caution => style("CAUTION").yellow().bold(),
        Suitability::Unsuitable => style("UNSUITABLE").red().bold(),
    };

    println!(
        "{} + {} at ratio {}: {}",
        style(result.motor.display_name()).yellow(),
        style(&result.reducer.model_name).cyan(),
        result.selected_ratio,
        verdict
    );
    println!();

    let mut builder = Builder::default();
    builder.push_record(["Quantity", "Value"]);
    builder.push_record(["Output speed".to_string(), format!("{:.1} rpm", result.output_rpm)]);
    builder.push_record(["Output torque".to_string(), format!("{:.2} N·m", result.output_torque)]);
    builder.push_record(["Rated torque".to_string(), format!("{:.2} N·m", result.rated_torque)]);
    builder.push_record(["Efficiency".to_string(), format!("{:.0}%", result.efficiency * 100.0)]);
    builder.push_record(["Service factor".to_string(), format!("{:.2}", result.service_factor)]);
    builder.push_record(["Load factor".to_string(), format!("{:.2}", result.load_factor)]);
    builder.push_record([
        "Stage".to_string(),
        result.stage.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    builder.push_record([
        "Bushing".to_string(),
        result
            .bushing
            .as_ref()
            .map_or_else(|| "not required".to_string(), |b| b.code.clone()),
    ]);
    builder.push_record([
        "Adapter".to_string(),
        result.adapter.as_ref().map_or_else(
            || "none registered".to_string(),
            |a| format!("{} {} ({})", a.adapter_type, a.code, a.matched_by),
        ),
    ]);
    println!("{}", builder.build().with(Style::markdown()));

    let minimum = 1.2 * result.load_factor;
    if result.suitability != Suitability::Suitable {
        println!();
        println!(
            "{} service factor {:.2} is below the recommended {:.2} for this load",
            style("!").yellow(),
            result.service_factor,
            minimum
        );
    }
}
