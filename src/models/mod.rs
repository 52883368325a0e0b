//! Domain models for the range finder.
//!
//! This module contains the core data structures used throughout the application:
//! - [`address`] - Family-agnostic address arithmetic
//! - [`AddressRange`] and [`RangeSpec`] - Inclusive address ranges
//! - [`OccupiedBlock`], [`Segment`] and [`CandidateBlock`] - Inputs and outputs of the engine

pub mod address;
mod block;
mod range;

// Re-export public types
pub use address::{Addr, Family, V4_BITS, V6_BITS};
pub use block::{BlockKind, CandidateBlock, OccupiedBlock, Segment};
pub use range::{AddressRange, RangeSpec};
