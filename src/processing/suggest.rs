//! Candidate block suggestions from available segments.

use super::summarize::summarize;
use crate::error::{Error, Result};
use crate::models::address::host_mask;
use crate::models::{AddressRange, CandidateBlock, Segment};

/// Filter applied to the natural blocks of each available segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuggestQuery {
    /// Every natural block as is.
    #[default]
    All,
    /// Natural blocks split into blocks of exactly this prefix.
    Prefix(u8),
    /// Natural blocks holding at least this many addresses.
    MinAddresses(u128),
}

impl SuggestQuery {
    /// Build a query from the two optional knobs, at most one of which may be set.
    pub fn from_options(target_prefix: Option<u8>, min_addresses: Option<u128>) -> Result<Self> {
        match (target_prefix, min_addresses) {
            (Some(_), Some(_)) => Err(Error::ConflictingQuery),
            (Some(prefix), None) => Ok(SuggestQuery::Prefix(prefix)),
            (None, Some(min)) => Ok(SuggestQuery::MinAddresses(min)),
            (None, None) => Ok(SuggestQuery::All),
        }
    }
}

/// Suggest blocks from the available segments, in segment then address order.
///
/// An empty result means nothing satisfied the query; it is not an error.
pub fn suggest(segments: &[Segment], query: SuggestQuery) -> Result<Vec<CandidateBlock>> {
    let mut suggestions = Vec::new();

    for segment in segments.iter().filter(|s| s.available) {
        for natural in summarize(segment.range)? {
            match query {
                SuggestQuery::All => suggestions.push(natural),
                SuggestQuery::MinAddresses(min) => {
                    if natural.holds_at_least(min) {
                        suggestions.push(natural);
                    }
                }
                SuggestQuery::Prefix(prefix) => {
                    suggestions.extend(subdivide(natural, prefix)?);
                }
            }
        }
    }

    log::debug!(
        "{} suggestions for {query:?} from {} segments",
        suggestions.len(),
        segments.len()
    );
    Ok(suggestions)
}

/// Split `block` into all aligned sub-blocks of `prefix`, lowest first.
pub fn subdivide(block: CandidateBlock, prefix: u8) -> Result<Vec<CandidateBlock>> {
    let family = block.family();
    if prefix > family.bits() {
        return Err(Error::PrefixOutOfRange {
            prefix,
            family,
            max: family.bits(),
        });
    }
    if prefix < block.prefix {
        return Err(Error::InvalidPrefix {
            block,
            requested: prefix,
        });
    }

    let step_mask = host_mask(prefix, family);
    let mut blocks = Vec::new();
    let mut cursor = block.range.start;
    loop {
        let end = cursor | step_mask;
        blocks.push(CandidateBlock {
            range: AddressRange::new(cursor, end, family)?,
            prefix,
        });
        if end >= block.range.end {
            break;
        }
        cursor = end + 1;
    }
    Ok(blocks)
}
