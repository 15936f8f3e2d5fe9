//! Transformation module.
//!
//! - Mapper: vendor columns copied into template columns
//! - Normalize: value encodings, prices and default values
//! - Expand: multi-value cells into boolean tag columns
//! - Filter: row shift and inactive-item removal
//! - Pipeline: all stages end to end

pub mod expand;
pub mod filter;
pub mod mapper;
pub mod normalize;
pub mod pipeline;

pub use expand::{tag_name, tokenize, TagFamily};
pub use filter::{retain_active, shift_rows};
pub use mapper::{ColumnPair, MappingPlan};
pub use normalize::{
    assemble_name, cast_active, pick_meal_time, price_incl_tax, remap_hot, remap_tax_category,
    round_half_up, Normalizer,
};
pub use pipeline::*;
