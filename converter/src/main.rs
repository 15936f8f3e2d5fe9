//! menu-translate CLI - convert vendor menu exports into import spreadsheets
//!
//! # Main Commands
//!
//! ```bash
//! menu-translate convert export.csv -o import.csv   # Convert using output_template.csv
//! menu-translate convert                            # Prompt for input and output paths
//! ```
//!
//! # Debug Commands
//!
//! ```bash
//! menu-translate parse export.csv         # Dump parsed vendor rows as JSON
//! menu-translate schema template.csv      # Show template column families
//! menu-translate tables                   # Print default lookup tables
//! ```

use clap::{Parser, Subcommand};
use menu_translate::{
    convert_file, parse_file, read_template, ConfigError, ConvertOptions, LookupTables, RunReport,
    DEFAULT_TEMPLATE,
};
use menu_translate::logs::RUN_LOG;
use menu_translate::transform::{format_delimiter, tag_name};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "menu-translate")]
#[command(about = "Convert vendor menu exports into platform import spreadsheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a vendor export into an import file
    Convert {
        /// Vendor CSV file (prompted for if omitted)
        input: Option<PathBuf>,

        /// Output CSV file (prompted for if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Template whose header defines the output columns
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: PathBuf,

        /// JSON file overriding the built-in lookup tables
        #[arg(long)]
        tables: Option<PathBuf>,

        /// Input delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Do not insert the blank first row
        #[arg(long)]
        no_row_shift: bool,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only print errors
        #[arg(short, long)]
        quiet: bool,
    },

    /// Parse a vendor CSV and output JSON
    Parse {
        /// Input CSV file
        input: PathBuf,

        /// CSV delimiter (auto-detect if not specified)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file overriding the built-in lookup tables
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Describe the columns of a template
    Schema {
        /// Template CSV file
        #[arg(default_value = DEFAULT_TEMPLATE)]
        template: PathBuf,

        /// JSON file overriding the built-in lookup tables
        #[arg(long)]
        tables: Option<PathBuf>,
    },

    /// Print the built-in lookup tables as JSON
    Tables,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            template,
            tables,
            delimiter,
            no_row_shift,
            report,
            quiet,
        } => cmd_convert(
            input,
            output,
            template,
            tables.as_deref(),
            delimiter,
            !no_row_shift,
            report.as_deref(),
            quiet,
        ),

        Commands::Parse {
            input,
            delimiter,
            output,
            tables,
        } => cmd_parse(&input, delimiter, output.as_deref(), tables.as_deref()),

        Commands::Schema { template, tables } => cmd_schema(&template, tables.as_deref()),

        Commands::Tables => cmd_tables(),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_convert(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    template: PathBuf,
    tables_path: Option<&Path>,
    delimiter: Option<char>,
    row_shift: bool,
    report: Option<&Path>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    RUN_LOG.set_quiet(quiet);

    let input = resolve_path(input, "input", "Enter the name of the input CSV file (e.g., input.csv): ")?;
    let output = resolve_path(output, "output", "Enter the name of the output CSV file (e.g., output.csv): ")?;

    let mut options = ConvertOptions::new(input, output)
        .with_template(template)
        .with_tables(load_tables(tables_path)?)
        .with_row_shift(row_shift);
    if let Some(d) = delimiter {
        options = options.with_delimiter(d)?;
    }

    let summary = convert_file(&options)?;

    if let Some(report_path) = report {
        RunReport::capture(summary).write(report_path)?;
        if !quiet {
            eprintln!("📝 Report written to: {}", report_path.display());
        }
    }

    if !quiet {
        eprintln!("\n✨ Done!");
    }
    Ok(())
}

fn cmd_parse(
    input: &Path,
    delimiter: Option<char>,
    output: Option<&Path>,
    tables_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());
    let tables = load_tables(tables_path)?;

    let forced = match delimiter {
        Some(d) if !d.is_ascii() => return Err(ConfigError::InvalidDelimiter(d).into()),
        Some(d) => Some(d as u8),
        None => None,
    };
    let result = parse_file(input, forced, &tables.null_tokens)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!(
        "   Delimiter: '{}'{}",
        format_delimiter(result.delimiter),
        if delimiter.is_none() { " (auto-detected)" } else { "" }
    );
    eprintln!("   Columns: {}", result.table.headers.join(", "));
    eprintln!("✅ Parsed {} records", result.table.len());

    let json = serde_json::to_string_pretty(&result.table.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_schema(template: &Path, tables_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let tables = load_tables(tables_path)?;
    let schema = read_template(template)?;

    println!("📋 Template: {} ({} columns)\n", template.display(), schema.columns().len());

    println!("Required:");
    for column in schema.required_columns() {
        println!("  {}", column);
    }

    for rule in [&tables.allergens, &tables.dietaries] {
        println!("\nFrom '{}' ({}):", rule.source, rule.prefix);
        for column in schema.columns_with_prefix(&rule.prefix) {
            if rule.none_column.as_deref() == Some(column) {
                println!("  {} (set when no other tag matches)", column);
            } else {
                println!("  {} ← \"{}\"", column, tag_name(column, &rule.prefix));
            }
        }
    }

    let unused: Vec<&str> = tables
        .column_mapping
        .values()
        .map(String::as_str)
        .filter(|target| !schema.contains(target))
        .collect();
    if !unused.is_empty() {
        println!("\nMapped targets missing from template: {}", unused.join(", "));
    }

    Ok(())
}

fn cmd_tables() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", LookupTables::default().to_json()?);
    Ok(())
}

fn load_tables(path: Option<&Path>) -> Result<LookupTables, ConfigError> {
    match path {
        Some(p) => LookupTables::load(p),
        None => Ok(LookupTables::default()),
    }
}

/// Use the given path, or ask for one when attached to a terminal.
fn resolve_path(
    given: Option<PathBuf>,
    what: &'static str,
    question: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = given {
        return Ok(path);
    }
    if !io::stdin().is_terminal() {
        return Err(ConfigError::MissingPath(what).into());
    }

    eprint!("{}", question);
    io::stderr().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ConfigError::MissingPath(what).into());
    }
    Ok(PathBuf::from(answer))
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
