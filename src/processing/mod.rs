//! Range processing logic.
//!
//! This module contains the partition and summarization engine:
//! - [`gap_finder`] - Partition a range into available and occupied segments
//! - [`summarize`] - Cover a range with minimal aligned CIDR blocks
//! - [`suggest`] - Filter or subdivide free blocks for a request

mod gap_finder;
mod suggest;
mod summarize;

// Re-export public functions
pub use gap_finder::partition;
pub use suggest::{subdivide, suggest, SuggestQuery};
pub use summarize::summarize;
