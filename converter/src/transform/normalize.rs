//! Value normalizer.
//!
//! Turns vendor encodings into the values the import platform expects:
//! status into boolean flags, tax categories into rates, meal-time lists into
//! a single meal time, and net prices into tax-inclusive prices. Every
//! function here is total over null cells.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::{LookupTables, MealTimeRule, TAG_SEPARATOR};
use crate::error::{NormalizeError, NormalizeResult};
use crate::models::{InputRecord, OutputRecord, TemplateSchema};

pub const TRUE: &str = "TRUE";
pub const FALSE: &str = "FALSE";

/// Fractional digits kept by the first rounding stage.
pub const PRICE_PRECISION: u32 = 5;
/// Fractional digits of the final price.
pub const PRICE_DIGITS: u32 = 2;

// =============================================================================
// Field functions
// =============================================================================

/// `"Active"` (or the configured status) is `TRUE`, anything else `FALSE`.
pub fn cast_active(status: Option<&str>, active_status: &str) -> &'static str {
    if status == Some(active_status) {
        TRUE
    } else {
        FALSE
    }
}

/// First priority entry present in the cell, else the fallback.
pub fn pick_meal_time(cell: Option<&str>, rule: &MealTimeRule) -> String {
    let Some(cell) = cell else {
        return rule.fallback.clone();
    };
    let options: Vec<&str> = cell.split(TAG_SEPARATOR).map(str::trim).collect();

    rule.priority
        .iter()
        .find(|preferred| options.contains(&preferred.as_str()))
        .unwrap_or(&rule.fallback)
        .clone()
}

/// Known tax categories become their rate; anything else passes through.
pub fn remap_tax_category(category: &str, rates: &BTreeMap<String, Decimal>) -> String {
    match rates.get(category) {
        Some(rate) => rate.normalize().to_string(),
        None => category.to_string(),
    }
}

/// `Hot`/`Cold` become boolean flags; other values and null are unchanged.
pub fn remap_hot(cell: Option<&str>, table: &BTreeMap<String, String>) -> Option<String> {
    cell.map(|v| table.get(v).cloned().unwrap_or_else(|| v.to_string()))
}

/// `"<flavour> <name>"`, trimmed, with a missing flavour contributing nothing.
pub fn assemble_name(flavour: Option<&str>, name: Option<&str>) -> String {
    let flavour = flavour.unwrap_or(" ").trim();
    let name = name.unwrap_or("").trim();
    format!("{} {}", flavour, name).trim().to_string()
}

/// Round to `digits` fractional digits, halves away from zero.
pub fn round_half_up(value: Decimal, digits: u32) -> Decimal {
    value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero)
}

/// Tax-inclusive price: `base * (1 + vat)` rounded to 5 digits, then to 2.
///
/// `None` when the result cannot be held with two fractional digits.
pub fn price_incl_tax(base: Decimal, vat_rate: Decimal) -> Option<Decimal> {
    let gross = base.checked_mul(Decimal::ONE.checked_add(vat_rate)?)?;
    let mut price = round_half_up(round_half_up(gross, PRICE_PRECISION), PRICE_DIGITS);
    price.rescale(PRICE_DIGITS);
    (price.scale() == PRICE_DIGITS).then_some(price)
}

/// Parse a spreadsheet number (`12`, `12.50`, `1.2e1`).
pub fn parse_number(value: &str) -> Option<Decimal> {
    let value = value.trim();
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()
}

// =============================================================================
// Row normalizer
// =============================================================================

/// Applies every field function to one output row, touching only columns
/// that exist in the template.
pub struct Normalizer<'a> {
    tables: &'a LookupTables,
    schema: &'a TemplateSchema,
}

impl<'a> Normalizer<'a> {
    pub fn new(tables: &'a LookupTables, schema: &'a TemplateSchema) -> Self {
        Self { tables, schema }
    }

    /// Normalize `row` in place. `row_idx` is the zero-based data row, used
    /// in error messages.
    pub fn apply(
        &self,
        row: &mut OutputRecord,
        input: &InputRecord,
        row_idx: usize,
    ) -> NormalizeResult<()> {
        let cols = &self.tables.columns;

        if self.has(&cols.name) {
            let flavour = input.get(&self.tables.flavour_column);
            let name = assemble_name(flavour, row.get(&cols.name));
            row.set(&cols.name, Some(name));
        }

        if self.has(&cols.meal_time) {
            let meal_time = pick_meal_time(row.get(&cols.meal_time), &self.tables.meal_time);
            row.set(&cols.meal_time, Some(meal_time));
        }

        if self.has(&cols.vat_rate) {
            let rate = row
                .get(&cols.vat_rate)
                .map(|c| remap_tax_category(c, &self.tables.tax_rates));
            row.set(&cols.vat_rate, rate);
        }

        if self.has(&cols.hot) {
            let hot = remap_hot(row.get(&cols.hot), &self.tables.hot_values);
            row.set(&cols.hot, hot);
        }

        if self.has(&cols.price) {
            let price = self.price(row, row_idx)?;
            row.set(&cols.price, price.map(|p| p.to_string()));
        }

        if self.has(&cols.active) {
            let flag = cast_active(row.get(&cols.active), &self.tables.active_status);
            row.set(&cols.active, Some(flag.to_string()));
        }

        for (column, default) in &self.tables.defaults {
            if self.has(column) {
                row.fill(column, default);
            }
        }

        for (target, source) in &self.tables.copied_columns {
            if self.has(target) && self.has(source) {
                let value = row.get(source).map(str::to_string);
                row.set(target, value);
            }
        }

        Ok(())
    }

    /// Null base price or null rate gives a null price.
    fn price(&self, row: &OutputRecord, row_idx: usize) -> NormalizeResult<Option<Decimal>> {
        let cols = &self.tables.columns;
        let (Some(base), Some(rate)) = (row.get(&cols.price), row.get(&cols.vat_rate)) else {
            return Ok(None);
        };

        let base_value = number(base, &cols.price, row_idx)?;
        let rate_value = number(rate, &cols.vat_rate, row_idx)?;
        price_incl_tax(base_value, rate_value)
            .map(Some)
            .ok_or_else(|| NormalizeError::PriceOverflow {
                row: row_idx,
                price: base.to_string(),
                rate: rate.to_string(),
            })
    }

    fn has(&self, column: &str) -> bool {
        self.schema.contains(column)
    }
}

fn number(value: &str, column: &str, row: usize) -> NormalizeResult<Decimal> {
    parse_number(value).ok_or_else(|| NormalizeError::NotANumber {
        row,
        column: column.to_string(),
        value: value.to_string(),
    })
}
