//! Run options and lookup tables.
//!
//! Every enumeration the pipeline relies on (column mapping, tax categories,
//! meal-time priority, allergen synonyms, default values) lives in
//! [`LookupTables`]. The built-in tables reproduce the vendor export format;
//! a JSON file can override any subset of them.
//!
//! ```json
//! {
//!   "tax_rates": { "VatApplicableUk": "0.20", "GstApplicableJp": "0.10" },
//!   "meal_time": { "priority": ["Lunch", "Dinner", "Breakfast", "Brunch"] }
//! }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Template read when no template path is given.
pub const DEFAULT_TEMPLATE: &str = "output_template.csv";

/// Separator inside multi-value cells.
pub const TAG_SEPARATOR: char = '|';

/// Soft hyphen: renders as nothing but keeps the spreadsheet cell non-empty.
pub const EMPTY_PLACEHOLDER: &str = "\u{00AD}";

/// Cell values read as null, matched exactly. Spreadsheet tools write these
/// for missing data.
pub const DEFAULT_NULL_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// =============================================================================
// Lookup tables
// =============================================================================

/// All value tables used by the mapper, normalizer and expander.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupTables {
    /// Vendor column -> template column, copied verbatim.
    pub column_mapping: BTreeMap<String, String>,

    /// Template columns the normalizer writes to.
    pub columns: ColumnNames,

    /// Vendor cell values treated like an empty cell.
    pub null_tokens: Vec<String>,

    /// Vendor column holding the flavour prefix of the item name.
    pub flavour_column: String,

    /// Vendor status value meaning "sellable".
    pub active_status: String,

    /// Tax category -> rate.
    pub tax_rates: BTreeMap<String, Decimal>,

    /// Serving temperature -> hot flag.
    pub hot_values: BTreeMap<String, String>,

    pub meal_time: MealTimeRule,

    pub allergens: MultiValueRule,

    pub dietaries: MultiValueRule,

    /// Literal values for template columns left null.
    pub defaults: BTreeMap<String, String>,

    /// Destination column -> source column, copied after defaults are filled.
    pub copied_columns: BTreeMap<String, String>,
}

/// Template column names with dedicated normalizers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub active: String,
    pub price: String,
    pub vat_rate: String,
    pub meal_time: String,
    pub hot: String,
}

/// Pick one meal time out of a multi-value cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealTimeRule {
    /// First entry present in the cell wins.
    pub priority: Vec<String>,
    /// Used for null cells and cells with no known entry.
    pub fallback: String,
}

/// Expansion of one multi-value vendor column into template boolean columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiValueRule {
    /// Vendor column holding the pipe-delimited tags.
    pub source: String,

    /// Prefix identifying the target columns in the template.
    pub prefix: String,

    /// Lowercased token -> canonical tag name.
    #[serde(default)]
    pub synonyms: BTreeMap<String, String>,

    /// Column set when no other column of the family is set.
    #[serde(default)]
    pub none_column: Option<String>,
}

impl Default for LookupTables {
    fn default() -> Self {
        Self {
            column_mapping: default_column_mapping(),
            columns: ColumnNames::default(),
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|t| t.to_string()).collect(),
            flavour_column: "FlavourName".to_string(),
            active_status: "Active".to_string(),
            tax_rates: default_tax_rates(),
            hot_values: string_map(&[("Hot", "TRUE"), ("Cold", "FALSE")]),
            meal_time: MealTimeRule::default(),
            allergens: MultiValueRule::allergens(),
            dietaries: MultiValueRule::dietaries(),
            defaults: default_fills(),
            copied_columns: string_map(&[("Short Description*", "Long Description*")]),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "Name*".to_string(),
            active: "isGMActive".to_string(),
            price: "OriginalPrice*".to_string(),
            vat_rate: "vatRate".to_string(),
            meal_time: "Meal Time*".to_string(),
            hot: "isHOT*".to_string(),
        }
    }
}

impl Default for MealTimeRule {
    fn default() -> Self {
        Self {
            priority: vec!["Lunch".into(), "Dinner".into(), "Breakfast".into()],
            fallback: "Lunch".to_string(),
        }
    }
}

impl MultiValueRule {
    /// Vendor `Allergens` column into `Allergen*: ...` columns.
    pub fn allergens() -> Self {
        Self {
            source: "Allergens".to_string(),
            prefix: "Allergen*:".to_string(),
            synonyms: string_map(&[
                ("gluten", "contains gluten"),
                ("dairy", "milk"),
                ("soy", "soybeans"),
                ("sesame seeds", "sesame"),
                ("sulphur dioxide and sulphites", "sulphites"),
            ]),
            none_column: Some("Allergen*: Contains none of these allergens".to_string()),
        }
    }

    /// Vendor `DietPreferences` column into `Dietary: ...` columns.
    pub fn dietaries() -> Self {
        Self {
            source: "DietPreferences".to_string(),
            prefix: "Dietary:".to_string(),
            synonyms: BTreeMap::new(),
            none_column: None,
        }
    }
}

fn default_column_mapping() -> BTreeMap<String, String> {
    string_map(&[
        ("ItemNameInternal", "Name*"),
        ("ItemStatus", "isGMActive"),
        ("DescCust", "Long Description*"),
        ("SupplierRrp", "OriginalPrice*"),
        ("TaxCategory", "vatRate"),
        ("DishType", "Meal Type*"),
        ("Cuisine", "Cuisines Tag*"),
        ("Categories", "Meal Time*"),
        ("ServingTemperature", "isHOT*"),
        ("SizeMinQty", "GM min quantity"),
    ])
}

fn default_tax_rates() -> BTreeMap<String, Decimal> {
    [
        ("VatApplicableUk", Decimal::new(20, 2)),
        ("GstApplicableAu", Decimal::new(10, 2)),
        ("GstApplicableSg", Decimal::new(9, 2)),
        ("GstApplicableNz", Decimal::new(15, 2)),
        ("GstVatExempt", Decimal::ZERO),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_fills() -> BTreeMap<String, String> {
    string_map(&[
        ("Meal Type*", "Main"),
        ("Long Description*", "Not provided"),
        ("isMenuItem*", "TRUE"),
        ("isOption*", "FALSE"),
        ("isCCActive", "FALSE"),
        ("Ingredients*", EMPTY_PLACEHOLDER),
    ])
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl LookupTables {
    /// Parse tables from JSON. Missing fields keep their built-in values.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tables from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// =============================================================================
// Run options
// =============================================================================

/// Everything one conversion run needs.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub template_path: PathBuf,
    pub tables: LookupTables,
    /// Prepend a blank row before filtering (see [`crate::transform::filter`]).
    pub row_shift: bool,
    /// Input delimiter; auto-detected when `None`.
    pub delimiter: Option<u8>,
}

impl ConvertOptions {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE),
            tables: LookupTables::default(),
            row_shift: true,
            delimiter: None,
        }
    }

    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = path.into();
        self
    }

    pub fn with_tables(mut self, tables: LookupTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_row_shift(mut self, row_shift: bool) -> Self {
        self.row_shift = row_shift;
        self
    }

    /// Force the input delimiter. Must be a single ASCII character.
    pub fn with_delimiter(mut self, delimiter: char) -> ConfigResult<Self> {
        if !delimiter.is_ascii() {
            return Err(ConfigError::InvalidDelimiter(delimiter));
        }
        self.delimiter = Some(delimiter as u8);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let tables = LookupTables::default();
        assert_eq!(tables.column_mapping["TaxCategory"], "vatRate");
        assert_eq!(tables.tax_rates["VatApplicableUk"], Decimal::new(20, 2));
        assert_eq!(tables.meal_time.priority[0], "Lunch");
        assert_eq!(tables.allergens.synonyms["dairy"], "milk");
        assert!(tables.dietaries.none_column.is_none());
        assert!(tables.null_tokens.iter().any(|t| t == "N/A"));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{
            "tax_rates": { "GstApplicableJp": "0.10" },
            "meal_time": { "priority": ["Dinner", "Lunch"] }
        }"#;
        let tables = LookupTables::from_json(json).unwrap();

        assert_eq!(tables.tax_rates.len(), 1);
        assert_eq!(tables.tax_rates["GstApplicableJp"], Decimal::new(10, 2));
        assert_eq!(tables.meal_time.priority, vec!["Dinner", "Lunch"]);
        assert_eq!(tables.meal_time.fallback, "Lunch");
        assert_eq!(tables.column_mapping, default_column_mapping());
        assert_eq!(tables.allergens, MultiValueRule::allergens());
    }

    #[test]
    fn test_json_roundtrip_of_defaults() {
        let tables = LookupTables::default();
        let json = tables.to_json().unwrap();
        assert_eq!(LookupTables::from_json(&json).unwrap(), tables);
    }

    #[test]
    fn test_invalid_tables_json() {
        let err = LookupTables::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_options_defaults() {
        let opts = ConvertOptions::new("in.csv", "out.csv");
        assert_eq!(opts.template_path, PathBuf::from(DEFAULT_TEMPLATE));
        assert!(opts.row_shift);
        assert!(opts.delimiter.is_none());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let err = ConvertOptions::new("in.csv", "out.csv")
            .with_delimiter('§')
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidDelimiter('§')));
    }
}
