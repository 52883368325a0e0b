//! Output formatting for ranges.
//!
//! This module handles rendering segments and suggested blocks:
//! - [`terminal`] - Aligned table output with colors
//! - [`json`] - JSON document output

mod json;
mod terminal;

use crate::models::{AddressRange, CandidateBlock, Segment};

pub use json::{ranges_json, JsonRange, JsonRanges};
pub use terminal::{format_field, ranges_table};

/// Represents one output row, either a segment or a suggested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeRow {
    /// Lowest address.
    pub start_address: String,
    /// Highest address.
    pub end_address: String,
    /// Number of addresses, `None` for the full IPv6 space.
    pub num_of_addresses: Option<u128>,
    /// Prefix length when the range is exactly one CIDR block.
    pub prefix: Option<u8>,
    pub available: bool,
    pub id: Option<String>,
    pub name: Option<String>,
}

impl RangeRow {
    fn from_range(range: &AddressRange, available: bool) -> RangeRow {
        RangeRow {
            start_address: range.start_ip().to_string(),
            end_address: range.end_ip().to_string(),
            num_of_addresses: range.num_addresses().ok(),
            prefix: range.as_prefix(),
            available,
            id: None,
            name: None,
        }
    }

    /// Address count for display; the full IPv6 space is written out in full.
    pub fn num_of_addresses_text(&self) -> String {
        match self.num_of_addresses {
            Some(n) => n.to_string(),
            None => "340282366920938463463374607431768211456".to_string(),
        }
    }
}

impl From<&Segment> for RangeRow {
    fn from(segment: &Segment) -> RangeRow {
        RangeRow {
            id: segment.id.clone(),
            name: segment.name.clone(),
            ..RangeRow::from_range(&segment.range, segment.available)
        }
    }
}

impl From<&CandidateBlock> for RangeRow {
    fn from(block: &CandidateBlock) -> RangeRow {
        RangeRow {
            prefix: Some(block.prefix),
            ..RangeRow::from_range(&block.range, true)
        }
    }
}

/// Rows for a list of segments.
pub fn segment_rows(segments: &[Segment]) -> Vec<RangeRow> {
    segments.iter().map(RangeRow::from).collect()
}

/// Rows for a list of suggested blocks.
pub fn candidate_rows(blocks: &[CandidateBlock]) -> Vec<RangeRow> {
    blocks.iter().map(RangeRow::from).collect()
}
