//! Gap finding inside a requested range.
//!
//! Sweeps the occupied blocks in address order with a moving cursor and emits
//! an ordered list of available and occupied [`Segment`]s.
//!
//! Occupied blocks are reported exactly as given: nested or overlapping blocks
//! are neither merged nor clipped to the universe, so the output can contain
//! overlapping occupied segments.

use crate::error::Result;
use crate::models::address::{add1, sub1};
use crate::models::{AddressRange, OccupiedBlock, Segment};

/// Partition `universe` into available and occupied segments.
///
/// Blocks of another address family are dropped first. The rest are sorted by
/// start address with a stable sort, so blocks sharing a start keep their
/// input order. Blocks that do not touch the universe are skipped. The trailing available segment is only emitted while visiting the
/// last block in sorted order; if that block lies outside the universe, no
/// trailing segment is produced.
pub fn partition(universe: AddressRange, occupied: &[OccupiedBlock]) -> Result<Vec<Segment>> {
    if occupied.is_empty() {
        return Ok(vec![Segment::available(universe)]);
    }

    let family = universe.family;
    let mut sorted: Vec<&OccupiedBlock> = occupied
        .iter()
        .filter(|block| {
            let same_family = block.range.family == family;
            if !same_family {
                log::warn!(
                    "Skipping {} block {} ({:?}) inside {family} range {universe}",
                    block.range.family,
                    block.range,
                    block.id
                );
            }
            same_family
        })
        .collect();
    if sorted.is_empty() {
        return Ok(vec![Segment::available(universe)]);
    }
    sorted.sort_by_key(|b| b.range.start);
    let last = sorted.len() - 1;

    let mut cursor = universe.start;
    let mut segments = Vec::new();

    for (i, block) in sorted.iter().enumerate() {
        let b = block.range;
        if !universe.overlaps(&b) {
            log::trace!("block {b} is outside {universe}");
            continue;
        }

        if cursor < b.start {
            let gap = AddressRange::new(cursor, sub1(b.start, family)?, family)?;
            log::debug!("available {gap}");
            segments.push(Segment::available(gap));
        }
        log::debug!("occupied  {b} id={:?} name={:?}", block.id, block.name);
        segments.push(Segment::occupied(block));

        if b.end >= universe.end {
            break;
        } else if cursor < b.end {
            cursor = add1(b.end, family)?;
        }

        if i == last {
            let tail = AddressRange::new(cursor, universe.end, family)?;
            log::debug!("available {tail}");
            segments.push(Segment::available(tail));
        }
    }

    if segments.is_empty() {
        return Ok(vec![Segment::available(universe)]);
    }
    Ok(segments)
}
