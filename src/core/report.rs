//! Quote-request report for a completed selection

use chrono::{DateTime, Local};
use miette::Diagnostic;
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::keys::format_number;
use crate::core::selection::{OperatingConditions, SelectionResult};
use crate::entities::DrawingSet;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

const QUOTE_TEMPLATE: &str = "quote_report.md.tera";

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("template not found: {0}")]
    #[diagnostic(code(gbx::report::template))]
    NotFound(String),

    #[error("failed to render report: {0}")]
    #[diagnostic(code(gbx::report::render))]
    Render(String),
}

/// Everything a quote report shows
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub result: &'a SelectionResult,
    pub conditions: &'a OperatingConditions,
    pub drawings: Option<&'a DrawingSet>,
    pub generated: DateTime<Local>,
}

impl<'a> ReportContext<'a> {
    pub fn new(result: &'a SelectionResult, conditions: &'a OperatingConditions) -> Self {
        Self {
            result,
            conditions,
            drawings: None,
            generated: Local::now(),
        }
    }

    pub fn with_drawings(mut self, drawings: Option<&'a DrawingSet>) -> Self {
        self.drawings = drawings;
        self
    }
}

/// Report renderer using embedded Tera templates
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    pub fn new() -> Result<Self, ReportError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| ReportError::Render(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Render the Markdown quote request
    pub fn render_quote(&self, ctx: &ReportContext<'_>) -> Result<String, ReportError> {
        if !self.tera.get_template_names().any(|n| n == QUOTE_TEMPLATE) {
            return Err(ReportError::NotFound(QUOTE_TEMPLATE.to_string()));
        }

        let result = ctx.result;
        let motor = &result.motor;
        let reducer = &result.reducer;

        let mut context = tera::Context::new();
        context.insert("generated", &ctx.generated.format("%Y-%m-%d %H:%M").to_string());

        context.insert("motor_id", &motor.id);
        context.insert("motor_name", &motor.display_name());
        context.insert("motor_power", &motor.power_display());
        context.insert("motor_shaft", &format_number(motor.shaft_diameter));
        context.insert("motor_torque", &format!("{:.2}", motor.rated_torque));
        context.insert("motor_rpm", &format_number(motor.rated_rpm));

        context.insert("reducer_model", &reducer.model_name);
        context.insert("reducer_type", &reducer.reducer_type);
        context.insert("reducer_bore", &format_number(reducer.shaft_hole_diameter));
        context.insert("ratio", &result.selected_ratio.to_string());
        context.insert("stage", &result.stage.clone().unwrap_or_else(|| "-".to_string()));

        context.insert("output_rpm", &format!("{:.1}", result.output_rpm));
        context.insert("output_torque", &format!("{:.2}", result.output_torque));
        context.insert("rated_torque", &format!("{:.2}", result.rated_torque));
        context.insert("efficiency", &format!("{:.0}", result.efficiency * 100.0));
        context.insert("service_factor", &format!("{:.2}", result.service_factor));
        context.insert("load_factor", &format!("{:.2}", result.load_factor));
        context.insert("suitability", &result.suitability.to_string());

        context.insert("load_type", &ctx.conditions.load_type.to_string());
        context.insert("hours_per_day", &format_number(ctx.conditions.hours_per_day));
        context.insert("mounting_direction", &ctx.conditions.mounting_direction);

        let bushing = result.bushing.as_ref().map(|b| {
            format!(
                "{} ({} mm to {} mm, length {} mm)",
                b.code,
                format_number(b.shaft_mm),
                format_number(b.hole_mm),
                format_number(b.len_mm)
            )
        });
        context.insert("bushing", &bushing);
        let adapter = result
            .adapter
            .as_ref()
            .map(|a| format!("{} {} ({})", a.adapter_type, a.code, a.matched_by));
        context.insert("adapter", &adapter);

        let (pdf, step) = ctx
            .drawings
            .map(|d| (d.pdf.clone(), d.step.clone()))
            .unwrap_or_default();
        context.insert("pdf", &pdf);
        context.insert("step", &step);

        self.tera
            .render(QUOTE_TEMPLATE, &context)
            .map_err(|e| ReportError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::selection::evaluate;
    use crate::core::Catalog;
    use crate::entities::adapter::{AdapterCatalog, RawAdapterCatalog};
    use crate::entities::{DrawingIndex, Motor, Ratio, RatioSpec, Reducer};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn result() -> (SelectionResult, OperatingConditions) {
        let mut data = BTreeMap::new();
        data.insert(Ratio::new(10.0), RatioSpec::new(24.0, 0.95, "L1"));
        let reducer = Reducer::new("GPB", 42, 8.0, data);
        let motor = Motor::new("M0001", "Acme", "AC-200", 8.0, 2.39, 3000.0);
        let raw: RawAdapterCatalog =
            serde_json::from_str(r#"{"GPB042":{"G08":{"SV1":"8-30-45-M3"}}}"#).unwrap();
        let catalog = Catalog::from_parts(
            vec![motor.clone()],
            vec![reducer],
            Vec::new(),
            AdapterCatalog::from_raw(raw).unwrap(),
            DrawingIndex::default(),
        )
        .unwrap();

        let conditions = OperatingConditions::default();
        let candidate = evaluate(&catalog, &motor, &catalog.reducers[0], Ratio::new(10.0), &conditions);
        (SelectionResult::from_candidate(&motor, &candidate), conditions)
    }

    #[test]
    fn test_quote_report_formats_numbers() {
        let (result, conditions) = result();
        let mut ctx = ReportContext::new(&result, &conditions);
        ctx.generated = Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

        let report = ReportGenerator::new().unwrap().render_quote(&ctx).unwrap();

        assert!(report.contains("2026-03-01 09:30"));
        assert!(report.contains("Acme AC-200"));
        assert!(report.contains("GPB042"));
        assert!(report.contains("300.0 rpm"));
        assert!(report.contains("22.70 N·m") || report.contains("22.71 N·m"));
        assert!(report.contains("1.06"));
        assert!(report.contains("unsuitable"));
        assert!(report.contains("SV1 8-30-45-M3"));
        assert!(report.contains("No bushing required"));
    }

    #[test]
    fn test_quote_report_lists_drawings() {
        let (result, conditions) = result();
        let drawings = DrawingSet {
            pdf: vec!["pdf/GPB/GPB042-L1-(8-30-45-M3).PDF".to_string()],
            step: Vec::new(),
        };
        let ctx = ReportContext::new(&result, &conditions).with_drawings(Some(&drawings));

        let report = ReportGenerator::new().unwrap().render_quote(&ctx).unwrap();
        assert!(report.contains("pdf/GPB/GPB042-L1-(8-30-45-M3).PDF"));
    }
}
