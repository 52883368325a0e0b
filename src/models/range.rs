//! Address ranges and the ways a caller can describe one.

use super::address::{self, to_addr, Addr, Family};
use crate::error::{Error, Result};
use ipnet::IpNet;
use std::net::IpAddr;
use std::str::FromStr;

/// How a caller specified a range; always normalized to an [`AddressRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// A CIDR network, e.g. `10.0.0.0/8`. Host bits are ignored.
    Network(IpNet),
    /// An explicit inclusive pair of addresses.
    Bounds { start: IpAddr, end: IpAddr },
}

/// Inclusive address range `[start, end]` within one family.
///
/// `start <= end` and `end <= family.max_addr()` hold for ranges built through
/// [`AddressRange::new`], the `from_*` constructors, `TryFrom` or `FromStr`.
/// The fields are public for reading; a range assembled by hand is not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    pub start: Addr,
    pub end: Addr,
    pub family: Family,
}

impl AddressRange {
    /// Create a range from numeric bounds, checking `start <= end` and the family width.
    pub fn new(start: Addr, end: Addr, family: Family) -> Result<AddressRange> {
        if start > end || end > family.max_addr() {
            return Err(Error::InvalidRange {
                start: family.to_ip(start).to_string(),
                end: if end > family.max_addr() {
                    format!("{end:#x}")
                } else {
                    family.to_ip(end).to_string()
                },
            });
        }
        Ok(AddressRange { start, end, family })
    }

    /// The range covered by a CIDR network.
    pub fn from_net(net: IpNet) -> AddressRange {
        let family = Family::of(net.addr());
        AddressRange {
            start: to_addr(net.network()),
            end: to_addr(net.broadcast()),
            family,
        }
    }

    pub fn from_bounds(start: IpAddr, end: IpAddr) -> Result<AddressRange> {
        if Family::of(start) != Family::of(end) {
            return Err(Error::MixedFamily {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        AddressRange::new(to_addr(start), to_addr(end), Family::of(start))
    }

    /// Whether the two ranges share at least one address.
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.family == other.family && !(other.end < self.start || other.start > self.end)
    }

    pub fn contains(&self, addr: Addr) -> bool {
        addr >= self.start && addr <= self.end
    }

    /// Number of addresses, see [`address::width`].
    pub fn num_addresses(&self) -> Result<u128> {
        address::width(self.start, self.end, self.family)
    }

    /// The prefix length if this range is exactly one aligned CIDR block.
    pub fn as_prefix(&self) -> Option<u8> {
        let span = self.end - self.start;
        // span + 1 must be a power of two
        if span.checked_add(1).is_some_and(|n| !n.is_power_of_two()) {
            return None;
        }
        let host_bits = (128 - span.leading_zeros()) as u8;
        if host_bits > self.family.bits() {
            return None;
        }
        let prefix = self.family.bits() - host_bits;
        address::is_aligned(self.start, prefix, self.family).then_some(prefix)
    }

    pub fn start_ip(&self) -> IpAddr {
        self.family.to_ip(self.start)
    }

    pub fn end_ip(&self) -> IpAddr {
        self.family.to_ip(self.end)
    }
}

impl TryFrom<RangeSpec> for AddressRange {
    type Error = Error;

    fn try_from(spec: RangeSpec) -> Result<AddressRange> {
        match spec {
            RangeSpec::Network(net) => Ok(AddressRange::from_net(net)),
            RangeSpec::Bounds { start, end } => AddressRange::from_bounds(start, end),
        }
    }
}

impl FromStr for AddressRange {
    type Err = Error;

    /// Parse a CIDR string such as `10.0.0.0/8` or `2001:db8::/32`.
    fn from_str(s: &str) -> Result<AddressRange> {
        let net = IpNet::from_str(s.trim()).map_err(|_| Error::InvalidCidr(s.to_string()))?;
        Ok(AddressRange::from_net(net))
    }
}

impl std::fmt::Display for AddressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}-{}", self.start_ip(), self.end_ip())
    }
}
