//! Multi-value expander.
//!
//! A vendor cell like `Gluten|Dairy` becomes one boolean per template column
//! of the matching family:
//!
//! ```text
//! Allergens: "Gluten|Dairy"
//!     Allergen*: Contains gluten                    -> True
//!     Allergen*: Milk                               -> True
//!     Allergen*: Eggs                               -> False
//!     Allergen*: Contains none of these allergens   -> False
//! ```

use std::collections::{BTreeMap, HashSet};

use crate::config::{MultiValueRule, TAG_SEPARATOR};
use crate::models::{InputRecord, OutputRecord, TemplateSchema};

pub const TAG_TRUE: &str = "True";
pub const TAG_FALSE: &str = "False";

/// Split a multi-value cell into canonical lowercase tags.
///
/// Returns `None` for a null cell.
pub fn tokenize(cell: Option<&str>, synonyms: &BTreeMap<String, String>) -> Option<HashSet<String>> {
    let cell = cell?;
    let tags = cell
        .split(TAG_SEPARATOR)
        .map(|t| t.trim().to_lowercase())
        .map(|t| synonyms.get(&t).cloned().unwrap_or(t))
        .collect();
    Some(tags)
}

/// Tag name a template column stands for: prefix stripped, trimmed, lowercased.
pub fn tag_name(column: &str, prefix: &str) -> String {
    column
        .strip_prefix(prefix)
        .unwrap_or(column)
        .trim()
        .to_lowercase()
}

/// The template columns of one multi-value family.
#[derive(Debug, Clone)]
pub struct TagFamily<'a> {
    rule: &'a MultiValueRule,
    /// (column, tag) for every column except the "none" column
    columns: Vec<(&'a str, String)>,
    /// Present only if the template has it
    none_column: Option<&'a str>,
}

impl<'a> TagFamily<'a> {
    pub fn resolve(rule: &'a MultiValueRule, schema: &'a TemplateSchema) -> Self {
        let none_name = rule.none_column.as_deref();
        let mut columns = Vec::new();
        let mut none_column = None;

        for column in schema.columns_with_prefix(&rule.prefix) {
            if Some(column) == none_name {
                none_column = Some(column);
            } else {
                columns.push((column, tag_name(column, &rule.prefix)));
            }
        }

        Self {
            rule,
            columns,
            none_column,
        }
    }

    /// Vendor column feeding this family.
    pub fn source(&self) -> &'a str {
        let rule: &'a MultiValueRule = self.rule;
        &rule.source
    }

    /// Number of template columns written, including the "none" column.
    pub fn width(&self) -> usize {
        self.columns.len() + usize::from(self.none_column.is_some())
    }

    /// Write the family's booleans for one row.
    pub fn expand(&self, row: &mut OutputRecord, input: &InputRecord) {
        let tags = tokenize(input.get(self.source()), &self.rule.synonyms);
        let mut any_present = false;

        for (column, tag) in &self.columns {
            let present = tags.as_ref().is_some_and(|t| t.contains(tag));
            any_present |= present;
            row.set(column, Some(flag(present).to_string()));
        }

        if let Some(column) = self.none_column {
            row.set(column, Some(flag(!any_present).to_string()));
        }
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        TAG_TRUE
    } else {
        TAG_FALSE
    }
}
