//! Row filter.
//!
//! Two steps run in order: the optional row shift, then removal of inactive
//! items.
//!
//! The import platform drops the first data row it receives. The shift puts a
//! blank row in that position so every real item survives the import. The
//! blank row has a null activity flag, so the activity filter keeps it.

use crate::models::OutputRecord;
use crate::transform::normalize::FALSE;

/// Move every row down one position, leaving a blank first row.
pub fn shift_rows(rows: Vec<OutputRecord>) -> Vec<OutputRecord> {
    let mut shifted = Vec::with_capacity(rows.len() + 1);
    shifted.push(OutputRecord::blank());
    shifted.extend(rows);
    shifted
}

/// Drop rows whose `active_column` is `FALSE`. Returns the number dropped.
pub fn retain_active(rows: &mut Vec<OutputRecord>, active_column: &str) -> usize {
    let before = rows.len();
    rows.retain(|row| row.get(active_column) != Some(FALSE));
    before - rows.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, active: &str) -> OutputRecord {
        let mut row = OutputRecord::blank();
        row.set("Name*", Some(name.into()));
        row.set("isGMActive", Some(active.into()));
        row
    }

    #[test]
    fn test_shift_prepends_blank_row() {
        let rows = shift_rows(vec![row("Burger", "TRUE"), row("Fries", "TRUE")]);

        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_blank());
        assert_eq!(rows[1].get("Name*"), Some("Burger"));
        assert_eq!(rows[2].get("Name*"), Some("Fries"));
    }

    #[test]
    fn test_inactive_rows_dropped() {
        let mut rows = vec![row("Burger", "TRUE"), row("Old Wrap", "FALSE"), row("Fries", "TRUE")];
        let dropped = retain_active(&mut rows, "isGMActive");

        assert_eq!(dropped, 1);
        let names: Vec<_> = rows.iter().map(|r| r.get("Name*").unwrap()).collect();
        assert_eq!(names, vec!["Burger", "Fries"]);
    }

    #[test]
    fn test_blank_shift_row_survives_filter() {
        let mut rows = shift_rows(vec![row("Old Wrap", "FALSE")]);
        let dropped = retain_active(&mut rows, "isGMActive");

        assert_eq!(dropped, 1);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_blank());
    }
}
