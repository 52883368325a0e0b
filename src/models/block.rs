//! Occupied blocks, partition segments and candidate CIDR blocks.

use super::address::{Addr, Family};
use super::range::AddressRange;
use crate::error::{Error, Result};
use ipnet::IpNet;
use serde::{Deserialize, Serialize};

/// Whether an occupied block is a top-level allocation (e.g. a VPC) or a
/// sub-block carved out of one (e.g. a subnet).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    #[default]
    TopLevel,
    SubBlock,
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BlockKind::TopLevel => write!(f, "top-level"),
            BlockKind::SubBlock => write!(f, "sub-block"),
        }
    }
}

/// An already allocated range, as reported by an inventory source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedBlock {
    pub range: AddressRange,
    /// Resource id (e.g. `vpc-0abc`).
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    pub kind: BlockKind,
}

impl OccupiedBlock {
    /// A bare block with no owner metadata.
    pub fn new(range: AddressRange) -> OccupiedBlock {
        OccupiedBlock {
            range,
            id: None,
            name: None,
            kind: BlockKind::TopLevel,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> OccupiedBlock {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> OccupiedBlock {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: BlockKind) -> OccupiedBlock {
        self.kind = kind;
        self
    }
}

/// One labelled piece of a partitioned universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub range: AddressRange,
    pub available: bool,
    /// Owner id, only set on occupied segments.
    pub id: Option<String>,
    /// Owner name, only set on occupied segments.
    pub name: Option<String>,
    /// Owner kind, only set on occupied segments.
    pub kind: Option<BlockKind>,
}

impl Segment {
    pub fn available(range: AddressRange) -> Segment {
        Segment {
            range,
            available: true,
            id: None,
            name: None,
            kind: None,
        }
    }

    pub fn occupied(block: &OccupiedBlock) -> Segment {
        Segment {
            range: block.range,
            available: false,
            id: block.id.clone(),
            name: block.name.clone(),
            kind: Some(block.kind),
        }
    }
}

/// A prefix-aligned block suggested to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CandidateBlock {
    pub range: AddressRange,
    pub prefix: u8,
}

impl CandidateBlock {
    pub fn start(&self) -> Addr {
        self.range.start
    }

    pub fn family(&self) -> Family {
        self.range.family
    }

    /// Whether the block holds at least `min` addresses.
    ///
    /// Compared on host bits so the full IPv6 space does not overflow.
    pub fn holds_at_least(&self, min: u128) -> bool {
        match min.checked_sub(1) {
            None => true,
            Some(min_span) => self.range.end - self.range.start >= min_span,
        }
    }

    pub fn to_net(&self) -> Result<IpNet> {
        IpNet::new(self.range.start_ip(), self.prefix).map_err(|_| Error::PrefixOutOfRange {
            prefix: self.prefix,
            family: self.family(),
            max: self.family().bits(),
        })
    }
}

impl std::fmt::Display for CandidateBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.range.start_ip(), self.prefix)
    }
}
