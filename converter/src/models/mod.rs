//! Domain models for the conversion pipeline.
//!
//! - [`InputRecord`] - one vendor row, cells keyed by vendor column name
//! - [`InputTable`] - vendor header plus rows
//! - [`TemplateSchema`] - ordered output columns read from the template header
//! - [`OutputRecord`] - one row destined for the import spreadsheet
//!
//! Cells are explicit optionals: an empty CSV cell is `None`, never `""`.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Suffix marking a template column as required.
pub const REQUIRED_MARKER: char = '*';

// =============================================================================
// Input
// =============================================================================

/// One row of vendor data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: BTreeMap<String, String>,
}

impl InputRecord {
    /// Build a record from (column, raw cell) pairs. Empty cells are dropped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_cells(pairs, &[])
    }

    /// Like [`InputRecord::from_pairs`], also dropping cells equal to one of
    /// `null_tokens`.
    pub fn from_cells<I, K, V>(pairs: I, null_tokens: &[String]) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(_, v)| !v.is_empty() && !null_tokens.contains(v))
            .collect();
        Self { values }
    }

    /// Cell value, `None` when the cell was empty or the column is unknown.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// Vendor table as read from disk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub records: Vec<InputRecord>,
}

impl InputTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Template
// =============================================================================

/// Output schema, in the exact order of the template header.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemplateSchema {
    columns: Vec<String>,
}

impl TemplateSchema {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether a column carries the required marker.
    pub fn is_required(column: &str) -> bool {
        column.trim_end().ends_with(REQUIRED_MARKER)
    }

    /// Columns flagged as required, in template order.
    pub fn required_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| Self::is_required(c))
            .map(String::as_str)
            .collect()
    }

    /// Columns starting with `prefix`, in template order.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }
}

// =============================================================================
// Output
// =============================================================================

/// One row of the import spreadsheet. Columns never set are null.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputRecord {
    cells: HashMap<String, String>,
}

impl OutputRecord {
    /// A row with every column null.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Set a cell; `None` clears it back to null.
    pub fn set(&mut self, column: &str, value: Option<String>) {
        match value {
            Some(v) => {
                self.cells.insert(column.to_string(), v);
            }
            None => {
                self.cells.remove(column);
            }
        }
    }

    /// Set a cell only if it is currently null.
    pub fn fill(&mut self, column: &str, default: &str) {
        self.cells
            .entry(column.to_string())
            .or_insert_with(|| default.to_string());
    }

    pub fn is_blank(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in template order, nulls as `None`.
    pub fn ordered<'a>(&'a self, schema: &'a TemplateSchema) -> impl Iterator<Item = Option<&'a str>> + 'a {
        schema.columns().iter().map(move |c| self.get(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cells_are_null() {
        let record = InputRecord::from_pairs([("Allergens", ""), ("ItemStatus", "Active")]);
        assert_eq!(record.get("Allergens"), None);
        assert_eq!(record.get("ItemStatus"), Some("Active"));
        assert_eq!(record.get("Unknown"), None);
    }

    #[test]
    fn test_null_tokens_are_null() {
        let tokens = vec!["N/A".to_string(), "NA".to_string()];
        let record = InputRecord::from_cells(
            [("DescCust", "N/A"), ("FlavourName", "NA"), ("ItemNameInternal", "NAAN bread")],
            &tokens,
        );
        assert_eq!(record.get("DescCust"), None);
        assert_eq!(record.get("FlavourName"), None);
        assert_eq!(record.get("ItemNameInternal"), Some("NAAN bread"));
    }

    #[test]
    fn test_whitespace_cell_is_kept() {
        let record = InputRecord::from_pairs([("FlavourName", " ")]);
        assert_eq!(record.get("FlavourName"), Some(" "));
    }

    #[test]
    fn test_template_families() {
        let schema = TemplateSchema::new(vec![
            "Name*".into(),
            "vatRate".into(),
            "Allergen*: Milk".into(),
            "Allergen*: Contains none of these allergens".into(),
            "Dietary: Vegan".into(),
        ]);

        assert_eq!(schema.columns_with_prefix("Allergen*:").len(), 2);
        assert_eq!(schema.columns_with_prefix("Dietary:"), vec!["Dietary: Vegan"]);
        assert_eq!(schema.required_columns(), vec!["Name*"]);
        assert!(!TemplateSchema::is_required("Allergen*: Milk"));
    }

    #[test]
    fn test_output_fill_keeps_existing() {
        let mut row = OutputRecord::blank();
        row.set("Meal Type*", Some("Side".into()));
        row.fill("Meal Type*", "Main");
        row.fill("isOption*", "FALSE");

        assert_eq!(row.get("Meal Type*"), Some("Side"));
        assert_eq!(row.get("isOption*"), Some("FALSE"));

        row.set("isOption*", None);
        assert_eq!(row.get("isOption*"), None);
    }

    #[test]
    fn test_ordered_follows_template() {
        let schema = TemplateSchema::new(vec!["b".into(), "a".into(), "c".into()]);
        let mut row = OutputRecord::blank();
        row.set("a", Some("1".into()));
        row.set("b", Some("2".into()));

        let cells: Vec<_> = row.ordered(&schema).collect();
        assert_eq!(cells, vec![Some("2"), Some("1"), None]);
    }
}
