//! Table formatting for CLI list commands
//!
//! Rows are built from typed cells so the same data renders as aligned,
//! coloured text for the terminal, RFC 4180 CSV, or a Markdown table.

use console::style;

use crate::cli::helpers::{escape_csv, truncate_str};
use crate::cli::OutputFormat;
use crate::core::Suitability;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Catalog identifier (cyan)
    Id(String),
    /// Plain text, truncated to the column width
    Text(String),
    /// Category such as a gearbox type
    Type(String),
    /// Float value with precision
    Float(f64, usize),
    /// Suitability tier with colour coding
    Verdict(Suitability),
    /// Empty/placeholder
    Empty,
}

impl CellValue {
    /// Text or `Empty` when absent
    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        value.map_or(CellValue::Empty, |v| CellValue::Text(v.into()))
    }

    /// Format for TSV output (with colors if terminal)
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(id).cyan(), width = width),
            CellValue::Text(s) => {
                let truncated = truncate_str(s, width.saturating_sub(2));
                format!("{:<width$}", truncated, width = width)
            }
            CellValue::Type(t) => format!("{:<width$}", style(t).magenta(), width = width),
            CellValue::Verdict(v) => {
                let s = v.to_string();
                let styled = match v {
                    Suitability::Suitable => style(s).green(),
                    Suitability::Caution => style(s).yellow(),
                    Suitability::Unsuitable => style(s).red().bold(),
                };
                format!("{:<width$}", styled, width = width)
            }
            CellValue::Empty => format!("{:<width$}", style("-").dim(), width = width),
            _ => format!("{:<width$}", self.raw(), width = width),
        }
    }

    /// Format for CSV output (RFC 4180, no colors)
    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Format for Markdown output (no colors, escaped pipes)
    pub fn format_md(&self) -> String {
        let raw = match self {
            CellValue::Verdict(Suitability::Unsuitable) => "**unsuitable**".to_string(),
            CellValue::Empty => "-".to_string(),
            _ => self.raw(),
        };
        raw.replace('|', "\\|")
    }

    /// Get raw string value
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Type(s) => s.clone(),
            CellValue::Float(f, precision) => format!("{:.prec$}", f, prec = precision),
            CellValue::Verdict(v) => v.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    /// Get the display width of this cell's content (for dynamic column sizing)
    pub fn display_width(&self) -> usize {
        match self {
            CellValue::Empty => 1,
            _ => self.raw().chars().count(),
        }
    }
}

/// Column definition with header label and width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Table formatter that renders rows in the list formats
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    show_summary: bool,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            show_summary: true,
        }
    }

    /// Omit the trailing "N found" line
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }

    /// Print rows in the specified format
    pub fn output(&self, rows: &[TableRow], format: OutputFormat) {
        print!("{}", self.render(rows, format));
    }

    /// Render rows in the specified format
    pub fn render(&self, rows: &[TableRow], format: OutputFormat) -> String {
        match format {
            OutputFormat::Csv => self.render_csv(rows),
            OutputFormat::Md => self.render_md(rows),
            _ => self.render_tsv(rows),
        }
    }

    /// Widths from content, capped at each column's width
    fn calculate_widths(&self, rows: &[TableRow]) -> Vec<usize> {
        self.columns
            .iter()
            .map(|col| {
                let max_content = rows
                    .iter()
                    .filter_map(|r| r.get(col.key))
                    .map(|v| v.display_width())
                    .max()
                    .unwrap_or(0);
                col.header.len().max(max_content + 2).min(col.width)
            })
            .collect()
    }

    fn render_tsv(&self, rows: &[TableRow]) -> String {
        let widths = self.calculate_widths(rows);
        let mut out = String::new();

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<width$}", style(col.header).bold(), width = w))
            .collect();
        out.push_str(header.join(" ").trim_end());
        out.push('\n');

        let total_width: usize = widths.iter().sum::<usize>() + widths.len().saturating_sub(1);
        out.push_str(&"-".repeat(total_width));
        out.push('\n');

        for row in rows {
            let parts: Vec<String> = self
                .columns
                .iter()
                .zip(&widths)
                .map(|(col, w)| row.get(col.key).unwrap_or(&CellValue::Empty).format_tsv(*w))
                .collect();
            out.push_str(parts.join(" ").trim_end());
            out.push('\n');
        }

        if self.show_summary {
            out.push('\n');
            out.push_str(&format!("{} {}(s) found.\n", style(rows.len()).cyan(), self.entity_name));
        }
        out
    }

    fn render_csv(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.key).collect();
        out.push_str(&headers.join(","));
        out.push('\n');

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).map(|v| v.format_csv()).unwrap_or_default())
                .collect();
            out.push_str(&values.join(","));
            out.push('\n');
        }
        out
    }

    fn render_md(&self, rows: &[TableRow]) -> String {
        let mut out = String::new();
        let headers: Vec<&str> = self.columns.iter().map(|c| c.header).collect();
        out.push_str(&format!("| {} |\n", headers.join(" | ")));

        let separators: Vec<&str> = headers.iter().map(|_| "---").collect();
        out.push_str(&format!("|{}|\n", separators.join("|")));

        for row in rows {
            let values: Vec<String> = self
                .columns
                .iter()
                .map(|col| row.get(col.key).unwrap_or(&CellValue::Empty).format_md())
                .collect();
            out.push_str(&format!("| {} |\n", values.join(" | ")));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("model", "MODEL", 10),
        ColumnDef::new("sf", "SF", 8),
        ColumnDef::new("verdict", "VERDICT", 12),
    ];

    fn rows() -> Vec<TableRow> {
        vec![
            TableRow::new()
                .cell("model", CellValue::Id("GPB060".to_string()))
                .cell("sf", CellValue::Float(2.637, 2))
                .cell("verdict", CellValue::Verdict(Suitability::Suitable)),
            TableRow::new()
                .cell("model", CellValue::Id("GPB042".to_string()))
                .cell("verdict", CellValue::Verdict(Suitability::Unsuitable)),
        ]
    }

    #[test]
    fn test_cell_value_text_format() {
        let cell = CellValue::Text("Hello World".to_string());
        assert!(cell.format_tsv(20).contains("Hello World"));
        assert_eq!(cell.format_csv(), "Hello World");
        assert_eq!(cell.format_md(), "Hello World");
    }

    #[test]
    fn test_cell_value_float_and_empty() {
        assert_eq!(CellValue::Float(22.705, 1).raw(), "22.7");
        assert_eq!(CellValue::Empty.format_csv(), "");
        assert_eq!(CellValue::Empty.format_md(), "-");
        assert!(matches!(CellValue::opt_text(None::<String>), CellValue::Empty));
    }

    #[test]
    fn test_cell_value_md_escapes_pipes() {
        let cell = CellValue::Text("GPB|042".to_string());
        assert_eq!(cell.format_md(), "GPB\\|042");
        assert_eq!(CellValue::Verdict(Suitability::Unsuitable).format_md(), "**unsuitable**");
    }

    #[test]
    fn test_render_csv() {
        let out = TableFormatter::new(COLUMNS, "candidate").render(&rows(), OutputFormat::Csv);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "model,sf,verdict");
        assert_eq!(lines[1], "GPB060,2.64,suitable");
        assert_eq!(lines[2], "GPB042,,unsuitable");
    }

    #[test]
    fn test_render_md() {
        let out = TableFormatter::new(COLUMNS, "candidate").render(&rows(), OutputFormat::Md);
        assert!(out.starts_with("| MODEL | SF | VERDICT |\n|---|---|---|\n"));
        assert!(out.contains("| GPB042 | - | **unsuitable** |"));
    }

    #[test]
    fn test_render_tsv_summary() {
        let out = TableFormatter::new(COLUMNS, "candidate").render(&rows(), OutputFormat::Tsv);
        assert!(out.contains("GPB060"));
        assert!(out.contains("candidate(s) found."));

        let quiet = TableFormatter::new(COLUMNS, "candidate")
            .without_summary()
            .render(&rows(), OutputFormat::Tsv);
        assert!(!quiet.contains("found"));
    }
}
