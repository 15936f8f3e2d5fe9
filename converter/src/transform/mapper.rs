//! Column mapper: copies vendor columns into template columns by name.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{InputRecord, InputTable, OutputRecord, TemplateSchema};

/// One vendor -> template column association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPair {
    pub source: String,
    pub target: String,
}

/// Which associations apply to a given input/template pair.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MappingPlan {
    /// Present on both sides, copied for every row.
    pub mapped: Vec<ColumnPair>,
    /// Missing from the input or the template, ignored.
    pub skipped: Vec<ColumnPair>,
}

impl MappingPlan {
    /// Resolve `mapping` against the input header and the template.
    pub fn resolve(
        mapping: &BTreeMap<String, String>,
        input: &InputTable,
        schema: &TemplateSchema,
    ) -> Self {
        let mut plan = Self::default();
        for (source, target) in mapping {
            let pair = ColumnPair {
                source: source.clone(),
                target: target.clone(),
            };
            if input.has_column(source) && schema.contains(target) {
                plan.mapped.push(pair);
            } else {
                plan.skipped.push(pair);
            }
        }
        plan
    }

    /// Start an output row from the mapped vendor cells.
    pub fn map_record(&self, record: &InputRecord) -> OutputRecord {
        let mut row = OutputRecord::blank();
        for pair in &self.mapped {
            row.set(&pair.target, record.get(&pair.source).map(str::to_string));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> BTreeMap<String, String> {
        [
            ("ItemNameInternal", "Name*"),
            ("TaxCategory", "vatRate"),
            ("SizeMinQty", "GM min quantity"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
    }

    #[test]
    fn test_pairs_missing_on_either_side_are_skipped() {
        let input = InputTable {
            headers: vec!["ItemNameInternal".into(), "SizeMinQty".into()],
            records: vec![],
        };
        let schema = TemplateSchema::new(vec!["Name*".into(), "vatRate".into()]);

        let plan = MappingPlan::resolve(&mapping(), &input, &schema);

        let mapped: Vec<_> = plan.mapped.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(mapped, vec!["Name*"]);
        // TaxCategory missing from input, GM min quantity missing from template
        assert_eq!(plan.skipped.len(), 2);
    }

    #[test]
    fn test_map_record_copies_verbatim() {
        let input = InputTable {
            headers: vec!["ItemNameInternal".into(), "TaxCategory".into()],
            records: vec![],
        };
        let schema = TemplateSchema::new(vec!["Name*".into(), "vatRate".into()]);
        let plan = MappingPlan::resolve(&mapping(), &input, &schema);

        let record = InputRecord::from_pairs([("ItemNameInternal", "  Burger "), ("TaxCategory", "")]);
        let row = plan.map_record(&record);

        assert_eq!(row.get("Name*"), Some("  Burger "));
        assert_eq!(row.get("vatRate"), None);
    }
}
