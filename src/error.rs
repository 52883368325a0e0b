//! Error types for the range engine.

use crate::models::{CandidateBlock, Family};

/// Convenience alias used by the core modules.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An increment or decrement stepped outside the address family.
    #[error("Address arithmetic overflowed: {op} on {addr} leaves the {family} address space")]
    RangeOverflow {
        addr: u128,
        op: &'static str,
        family: Family,
    },

    /// The requested subdivision prefix is shorter than the natural block's prefix.
    #[error("New prefix must be longer, lowest block examined is {block}, but prefix was {requested}")]
    InvalidPrefix { block: CandidateBlock, requested: u8 },

    /// Summarization produced a block that is not aligned to its own prefix.
    #[error("Block {start:#x}/{prefix} is not aligned for the {family} address space")]
    Alignment {
        start: u128,
        prefix: u8,
        family: Family,
    },

    #[error("Invalid range: start {start} is above end {end}")]
    InvalidRange { start: String, end: String },

    #[error("Range bounds {start} and {end} belong to different address families")]
    MixedFamily { start: String, end: String },

    #[error("Prefix length {prefix} is out of range for {family} (0-{max})")]
    PrefixOutOfRange { prefix: u8, family: Family, max: u8 },

    #[error("Only one of target prefix and minimum addresses may be set")]
    ConflictingQuery,

    #[error("Invalid CIDR: {0}")]
    InvalidCidr(String),
}
