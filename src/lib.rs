//! Find free and occupied address space inside a CIDR range.
//!
//! Partition a requested range against already allocated blocks, then
//! optionally turn the free space into CIDR blocks of a wanted size.
//!
//! ```
//! use vpc_range_finder::models::{AddressRange, OccupiedBlock};
//! use vpc_range_finder::processing::SuggestQuery;
//!
//! let universe: AddressRange = "10.10.10.0/24".parse().unwrap();
//! let occupied = vec![OccupiedBlock::new("10.10.10.0/26".parse().unwrap())];
//! let blocks = vpc_range_finder::suggest_ranges(universe, &occupied, SuggestQuery::Prefix(26)).unwrap();
//! assert_eq!(blocks.len(), 3);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod output;
pub mod processing;
pub mod validate;

pub use error::{Error, Result};

use models::{AddressRange, CandidateBlock, OccupiedBlock, Segment};
use processing::SuggestQuery;

/// Partition `universe` into available and occupied segments.
///
/// # Arguments
/// * `universe` - The range to look for free space in
/// * `occupied` - Allocated blocks, in any order; other-family blocks are ignored
///
/// # Returns
/// * `Ok(Vec<Segment>)` - Segments in address order, gaps marked available
/// * `Err` - If address arithmetic leaves the family's address space
pub fn find_ranges(universe: AddressRange, occupied: &[OccupiedBlock]) -> Result<Vec<Segment>> {
    log::info!(
        "#Start find_ranges() {universe} against {} occupied blocks",
        occupied.len()
    );
    let segments = processing::partition(universe, occupied)?;
    log::info!(
        "# Got {} segments, {} available",
        segments.len(),
        segments.iter().filter(|s| s.available).count()
    );
    Ok(segments)
}

/// Candidate blocks in the free space of `universe` that satisfy `query`.
///
/// # Arguments
/// * `universe` - The range to look for free space in
/// * `occupied` - Allocated blocks, in any order
/// * `query` - All free blocks, blocks of one prefix, or blocks of a minimum size
///
/// # Returns
/// * `Ok(Vec<CandidateBlock>)` - Aligned blocks in address order, possibly empty
/// * `Err` - `InvalidPrefix` or `PrefixOutOfRange` for an unusable target prefix
pub fn suggest_ranges(
    universe: AddressRange,
    occupied: &[OccupiedBlock],
    query: SuggestQuery,
) -> Result<Vec<CandidateBlock>> {
    let segments = find_ranges(universe, occupied)?;
    processing::suggest(&segments, query)
}
