//! Item page extraction.
//!
//! This crate provides:
//! - [`dom`]: owned, typed HTML tree built from `scraper` output
//! - [`extract_item`]: fetch one page and build its [`ItemRecord`](wikiharvest_shared::ItemRecord)
//! - [`build_record`]: the same, from an already-fetched render result
//! - cell parsers for the item table's cost and description columns

mod cost;
mod description;
pub mod dom;
mod page;
mod table;
mod text;

pub use cost::extract_cost;
pub use description::extract_description;
pub use page::{
    ExtractOptions, build_record, canonical_page_url, derive_rarity, extract_item,
    normalize_categories, resolve_url,
};
pub use text::normalize_text;
