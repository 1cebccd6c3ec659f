//! Shared types, error model, and configuration for wikiharvest.
//!
//! This crate is the foundation depended on by all other wikiharvest crates.
//! It provides:
//! - [`WikiHarvestError`]: the unified error type
//! - Output types ([`ItemRecord`], [`Cost`], [`Description`], [`ScrapeOutput`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_USER_AGENT, LayoutMode, ScrapeConfig, ScrapeSection, WikiConfig,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{Result, WikiHarvestError};
pub use types::{Cost, Currency, Description, ErrorRecord, ItemRecord, ScrapeOutput};
