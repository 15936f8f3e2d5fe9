//! CSV writer for the import spreadsheet.
//!
//! Columns follow the template order exactly; null cells are written empty.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{WriteError, WriteResult};
use crate::models::{OutputRecord, TemplateSchema};

/// Write header and rows to any writer. Returns the number of data rows.
pub fn write_csv<W: Write>(writer: W, schema: &TemplateSchema, rows: &[OutputRecord]) -> WriteResult<usize> {
    let mut out = csv::Writer::from_writer(writer);

    out.write_record(schema.columns())?;
    for row in rows {
        out.write_record(row.ordered(schema).map(|cell| cell.unwrap_or("")))?;
    }
    out.flush().map_err(csv::Error::from)?;

    Ok(rows.len())
}

/// Write the table to `path`, replacing any existing file.
pub fn write_file(path: &Path, schema: &TemplateSchema, rows: &[OutputRecord]) -> WriteResult<usize> {
    let file = File::create(path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, schema, rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_order_and_nulls() {
        let schema = TemplateSchema::new(vec!["Name*".into(), "vatRate".into(), "isHOT*".into()]);
        let mut row = OutputRecord::blank();
        row.set("isHOT*", Some("TRUE".into()));
        row.set("Name*", Some("Spicy Burger".into()));

        let mut buf = Vec::new();
        let written = write_csv(&mut buf, &schema, &[OutputRecord::blank(), row]).unwrap();

        assert_eq!(written, 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Name*,vatRate,isHOT*\n,,\nSpicy Burger,,TRUE\n"
        );
    }

    #[test]
    fn test_values_with_delimiters_are_quoted() {
        let schema = TemplateSchema::new(vec!["Long Description*".into()]);
        let mut row = OutputRecord::blank();
        row.set("Long Description*", Some("Bun, patty, cheese".into()));

        let mut buf = Vec::new();
        write_csv(&mut buf, &schema, &[row]).unwrap();

        assert!(String::from_utf8(buf).unwrap().contains("\"Bun, patty, cheese\""));
    }

    #[test]
    fn test_unwritable_path() {
        let schema = TemplateSchema::new(vec!["Name*".into()]);
        let err = write_file(Path::new("/nonexistent-dir/out.csv"), &schema, &[]).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }
}
