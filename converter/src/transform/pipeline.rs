//! High-level pipeline API for vendor menu conversion.
//!
//! Runs every stage in order: read, map, normalize, expand, filter, write.
//!
//! # Example
//!
//! ```rust,ignore
//! use menu_translate::{convert_file, ConvertOptions};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = ConvertOptions::new("menu_export.csv", "import.csv")
//!         .with_template("output_template.csv");
//!     let summary = convert_file(&options)?;
//!
//!     println!("Wrote {} rows", summary.rows_written);
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::expand::TagFamily;
use super::filter::{retain_active, shift_rows};
use super::mapper::MappingPlan;
use super::normalize::Normalizer;
use crate::config::{ConvertOptions, LookupTables};
use crate::error::{NormalizeResult, PipelineError, PipelineResult, WriteError, WriteResult};
use crate::logs::{log_error, log_info, log_info_indent, log_success, log_warning, LogEntry, RUN_LOG};
use crate::models::{InputTable, OutputRecord, TemplateSchema};
use crate::parser::{parse_file, read_template};
use crate::writer::write_file;

/// Input file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Rows produced from one input table, before writing.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// Output rows in final order, blank shift row included
    pub rows: Vec<OutputRecord>,
    /// Column pairs copied and skipped
    pub mapping: MappingPlan,
    /// Rows removed by the activity filter
    pub dropped_inactive: usize,
    /// Whether the blank shift row was prepended
    pub row_shift: bool,
}

/// Outcome of [`convert_file`]
#[derive(Debug, Clone, Serialize)]
pub struct ConvertSummary {
    pub input_path: PathBuf,
    pub template_path: PathBuf,
    pub output_path: PathBuf,
    pub csv_info: CsvInfo,
    pub template_columns: usize,
    pub mapping: MappingPlan,
    pub rows_written: usize,
    pub dropped_inactive: usize,
    pub row_shift: bool,
    pub generated_at: DateTime<Utc>,
}

/// Summary plus everything logged during the run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    #[serde(flatten)]
    pub summary: ConvertSummary,
    pub logs: Vec<LogEntry>,
}

impl RunReport {
    /// Capture the current run log alongside `summary`.
    pub fn capture(summary: ConvertSummary) -> Self {
        Self {
            summary,
            logs: RUN_LOG.entries(),
        }
    }

    pub fn write(&self, path: &Path) -> WriteResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Transform a parsed vendor table into template rows.
///
/// Each row is mapped, normalized and expanded independently; the row shift
/// and activity filter then run over the whole table.
pub fn transform_table(
    table: &InputTable,
    schema: &TemplateSchema,
    tables: &LookupTables,
    row_shift: bool,
) -> NormalizeResult<Conversion> {
    let mapping = MappingPlan::resolve(&tables.column_mapping, table, schema);
    let normalizer = Normalizer::new(tables, schema);
    let families = [
        TagFamily::resolve(&tables.allergens, schema),
        TagFamily::resolve(&tables.dietaries, schema),
    ];

    for family in &families {
        if family.width() > 0 && !table.has_column(family.source()) {
            log_warning(format!(
                "Column '{}' not found, all its tags set to False",
                family.source()
            ));
        }
    }

    let cols = &tables.columns;
    if schema.contains(&cols.price) && !schema.contains(&cols.vat_rate) {
        log_warning(format!(
            "Template has '{}' but no '{}', prices left empty",
            cols.price, cols.vat_rate
        ));
    }

    let mut rows = Vec::with_capacity(table.len() + 1);
    for (row_idx, record) in table.records.iter().enumerate() {
        let mut row = mapping.map_record(record);
        normalizer.apply(&mut row, record, row_idx)?;
        for family in &families {
            family.expand(&mut row, record);
        }
        rows.push(row);
    }

    if row_shift {
        rows = shift_rows(rows);
    }

    let dropped_inactive = if schema.contains(&tables.columns.active) {
        retain_active(&mut rows, &tables.columns.active)
    } else {
        0
    };

    Ok(Conversion {
        rows,
        mapping,
        dropped_inactive,
        row_shift,
    })
}

/// Convert a vendor file into an import file.
///
/// This is the main entry point. It:
/// 1. Parses the input with encoding/delimiter auto-detection
/// 2. Reads the template header
/// 3. Maps, normalizes and expands every row
/// 4. Applies the row shift and drops inactive items
/// 5. Writes the output in template column order
pub fn convert_file(options: &ConvertOptions) -> PipelineResult<ConvertSummary> {
    log_info(format!("📖 Reading {}", options.input_path.display()));
    let parsed = parse_file(
        &options.input_path,
        options.delimiter,
        &options.tables.null_tokens,
    )?;
    log_success(format!("Detected encoding: {}", parsed.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
    log_success(format!("Read {} rows", parsed.table.len()));

    let csv_info = CsvInfo {
        encoding: parsed.encoding.clone(),
        delimiter: parsed.delimiter as char,
        headers: parsed.table.headers.clone(),
        row_count: parsed.table.len(),
    };

    log_info(format!("📋 Reading template {}", options.template_path.display()));
    let schema = read_template(&options.template_path)?;
    if schema.is_empty() {
        return Err(PipelineError::EmptyTemplate(options.template_path.clone()));
    }
    log_success(format!(
        "{} columns ({} required)",
        schema.columns().len(),
        schema.required_columns().len()
    ));

    log_info("⚙️  Converting rows...");
    let conversion = match transform_table(&parsed.table, &schema, &options.tables, options.row_shift) {
        Ok(conversion) => conversion,
        Err(e) => {
            log_error(e.to_string());
            return Err(e.into());
        }
    };
    print_mapping(&conversion.mapping);
    if conversion.row_shift {
        log_info("Blank first row inserted");
    }
    if conversion.dropped_inactive > 0 {
        log_info(format!("{} inactive rows dropped", conversion.dropped_inactive));
    }

    let rows_written = write_file(&options.output_path, &schema, &conversion.rows)?;
    log_success(format!(
        "💾 Wrote {} rows to {}",
        rows_written,
        options.output_path.display()
    ));

    Ok(ConvertSummary {
        input_path: options.input_path.clone(),
        template_path: options.template_path.clone(),
        output_path: options.output_path.clone(),
        csv_info,
        template_columns: schema.columns().len(),
        mapping: conversion.mapping,
        rows_written,
        dropped_inactive: conversion.dropped_inactive,
        row_shift: conversion.row_shift,
        generated_at: Utc::now(),
    })
}

/// Format delimiter for display
pub fn format_delimiter(d: u8) -> String {
    match d {
        b'\t' => "\\t".to_string(),
        c => (c as char).to_string(),
    }
}

fn print_mapping(plan: &MappingPlan) {
    log_info("🗺️  Column mapping:");
    for pair in &plan.mapped {
        log_info_indent(format!("{} → {}", pair.source, pair.target), 1);
    }
    for pair in &plan.skipped {
        log_info_indent(format!("{} → {} (skipped)", pair.source, pair.target), 1);
    }
}
