//! Sources of occupied blocks.
//!
//! This module collects the blocks the engine partitions against:
//! - [`cache`] - Inventory files and the dated discovery cache
//! - [`cli`] - Command execution for the cloud CLI
//! - [`aws`] - VPC and subnet discovery

pub mod aws;
mod cache;
mod cli;

// Re-export public types and functions
pub use cache::{
    cache_path, load_or_fetch, parse_inventory, read_inventory, write_inventory, InventoryFile,
    InventoryRecord,
};
pub use cli::run;
