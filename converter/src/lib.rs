//! # menu-translate - vendor menu export to platform import conversion
//!
//! Converts a vendor's menu-item spreadsheet into the import spreadsheet
//! described by a template file.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Vendor CSV  │────▶│   Parser    │────▶│  Transform  │────▶│ Import CSV  │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (map, norm, │     │ (template   │
//! └─────────────┘     └─────────────┘     │  expand,    │     │  order)     │
//!                                         │  filter)    │     └─────────────┘
//!                     ┌─────────────┐     └─────────────┘
//!                     │  Template   │───────────▲
//!                     │  header     │
//!                     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use menu_translate::{convert_file, ConvertOptions};
//!
//! let options = ConvertOptions::new("menu_export.csv", "import.csv");
//! let summary = convert_file(&options).unwrap();
//! println!("Wrote {} rows", summary.rows_written);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`config`] - Run options and lookup tables
//! - [`models`] - Input/output records and the template schema
//! - [`parser`] - CSV reading with auto-detection
//! - [`transform`] - Mapping, normalization, expansion, filtering
//! - [`writer`] - CSV output
//! - [`logs`] - Run log

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Reading / writing
pub mod parser;
pub mod writer;

// Transformation
pub mod transform;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, CsvError, NormalizeError, PipelineError, WriteError};

// =============================================================================
// Re-exports - Configuration and models
// =============================================================================

pub use config::{ConvertOptions, LookupTables, MealTimeRule, MultiValueRule, DEFAULT_TEMPLATE};
pub use models::{InputRecord, InputTable, OutputRecord, TemplateSchema};

// =============================================================================
// Re-exports - Parsing and writing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_file, parse_str,
    read_template, ParseResult,
};
pub use writer::{write_csv, write_file};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    convert_file, transform_table, Conversion, ConvertSummary, CsvInfo, RunReport,
};
