//! Range to CIDR summarization.
//!
//! Splits an arbitrary `[start, end]` range into the smallest ordered list of
//! aligned CIDR blocks that cover it exactly.

use crate::error::{Error, Result};
use crate::models::address::{host_mask_bits, is_aligned, lo_mask};
use crate::models::{AddressRange, CandidateBlock};

/// Cover `range` with maximal aligned blocks, lowest address first.
///
/// Fails with [`Error::InvalidRange`] for a hand-built range whose start is
/// above its end.
pub fn summarize(range: AddressRange) -> Result<Vec<CandidateBlock>> {
    let family = range.family;
    if range.start > range.end || range.end > family.max_addr() {
        return Err(Error::InvalidRange {
            start: format!("{:#x}", range.start),
            end: format!("{:#x}", range.end),
        });
    }
    let bits = family.bits();
    let mut blocks = Vec::new();
    let mut cursor = range.start;

    loop {
        let aligned_host_bits = bits - lo_mask(cursor, family);
        let fit_host_bits = biggest_fit(range.end - cursor);
        let host_bits = aligned_host_bits.min(fit_host_bits);
        let prefix = bits - host_bits;
        let block_end = cursor | host_mask_bits(host_bits);

        if !is_aligned(cursor, prefix, family) || block_end > range.end {
            return Err(Error::Alignment {
                start: cursor,
                prefix,
                family,
            });
        }

        let block = CandidateBlock {
            range: AddressRange::new(cursor, block_end, family)?,
            prefix,
        };
        log::trace!("summarize {range}: {block}");
        blocks.push(block);

        if block_end >= range.end {
            break;
        }
        cursor = block_end + 1;
    }

    Ok(blocks)
}

/// Host bits of the biggest block that fits in `span + 1` addresses.
fn biggest_fit(span: u128) -> u8 {
    match span.checked_add(1) {
        // the whole 128-bit space
        None => 128,
        Some(count) => (127 - count.leading_zeros()) as u8,
    }
}
