//! `gbx ratios` command - Ratios offered by the gearboxes that fit a motor

use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{find_motor, print_structured, Workspace};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::GlobalOpts;
use crate::core::selection::{available_ratios, compatible_reducers, reducer_types, series_of};
use crate::entities::Ratio;

#[derive(clap::Args, Debug)]
pub struct RatiosArgs {
    /// Motor id or model name
    #[arg(long, short = 'm')]
    pub motor: String,

    /// Limit to one gearbox type
    #[arg(long = "type", short = 't')]
    pub reducer_type: Option<String>,

    /// Limit to one series
    #[arg(long, short = 's')]
    pub series: Option<String>,
}

#[derive(Serialize)]
struct RatioOptions {
    motor: String,
    types: Vec<String>,
    series: Vec<String>,
    ratios: Vec<Ratio>,
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("ratio", "RATIO", 8),
    ColumnDef::new("gearboxes", "GEARBOXES", 50),
];

pub fn run(args: RatiosArgs, global: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(global)?;
    let catalog = workspace.catalog()?;
    let motor = find_motor(&catalog, &args.motor)?;

    let compatible: Vec<_> = compatible_reducers(&catalog, motor)
        .into_iter()
        .filter(|r| args.reducer_type.as_deref().is_none_or(|t| r.reducer_type == t))
        .collect();
    let ratios = available_ratios(&compatible, args.series.as_deref());

    let options = RatioOptions {
        motor: motor.id.clone(),
        types: reducer_types(&compatible),
        series: series_of(&compatible, args.reducer_type.as_deref()),
        ratios: ratios.clone(),
    };
    if print_structured(&options, workspace.format(global))? {
        return Ok(());
    }

    if ratios.is_empty() {
        println!("No gearbox in the catalog fits {}.", motor.display_name());
        return Ok(());
    }

    let rows: Vec<TableRow> = ratios
        .iter()
        .map(|ratio| {
            let models: Vec<&str> = compatible
                .iter()
                .filter(|r| args.series.as_deref().is_none_or(|s| r.series == s))
                .filter(|r| r.supports(*ratio))
                .map(|r| r.model_name.as_str())
                .collect();
            TableRow::new()
                .cell("ratio", CellValue::Id(ratio.to_string()))
                .cell("gearboxes", CellValue::Text(models.join(", ")))
        })
        .collect();

    let formatter = TableFormatter::new(COLUMNS, "ratio");
    if global.quiet {
        formatter.without_summary().output(&rows, workspace.format(global));
    } else {
        formatter.output(&rows, workspace.format(global));
    }
    Ok(())
}
