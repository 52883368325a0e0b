//! Address arithmetic shared by both IP families.
//!
//! Every address is carried as a `u128` ([`Addr`]); the [`Family`] says how many
//! of the low bits are meaningful. Interval logic never looks at the family,
//! only masks and bounds checks do.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Numeric address, wide enough for IPv6.
pub type Addr = u128;

/// Maximum prefix length for IPv4 (32 bits).
pub const V4_BITS: u8 = 32;
/// Maximum prefix length for IPv6 (128 bits).
pub const V6_BITS: u8 = 128;

/// Address family of a range.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Number of bits in an address of this family.
    pub const fn bits(self) -> u8 {
        match self {
            Family::V4 => V4_BITS,
            Family::V6 => V6_BITS,
        }
    }

    /// Highest representable address.
    pub const fn max_addr(self) -> Addr {
        match self {
            Family::V4 => u32::MAX as Addr,
            Family::V6 => Addr::MAX,
        }
    }

    pub fn of(ip: IpAddr) -> Family {
        match ip {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }

    /// Render a numeric address of this family as an [`IpAddr`].
    ///
    /// Values above [`Family::max_addr`] are truncated to the family width.
    pub fn to_ip(self, addr: Addr) -> IpAddr {
        match self {
            Family::V4 => IpAddr::V4(Ipv4Addr::from(addr as u32)),
            Family::V6 => IpAddr::V6(Ipv6Addr::from(addr)),
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// Convert an [`IpAddr`] into its numeric form.
pub fn to_addr(ip: IpAddr) -> Addr {
    match ip {
        IpAddr::V4(v4) => u32::from(v4) as Addr,
        IpAddr::V6(v6) => u128::from(v6),
    }
}

pub fn compare(a: Addr, b: Addr) -> Ordering {
    a.cmp(&b)
}

/// The address after `a`, failing at the top of the family.
pub fn add1(a: Addr, family: Family) -> Result<Addr> {
    if a >= family.max_addr() {
        return Err(Error::RangeOverflow {
            addr: a,
            op: "add1",
            family,
        });
    }
    Ok(a + 1)
}

/// The address before `a`, failing at zero.
pub fn sub1(a: Addr, family: Family) -> Result<Addr> {
    a.checked_sub(1).ok_or(Error::RangeOverflow {
        addr: a,
        op: "sub1",
        family,
    })
}

/// Number of addresses in `[a, b]`.
///
/// Fails only for the full IPv6 space, whose 2^128 addresses do not fit.
pub fn width(a: Addr, b: Addr, family: Family) -> Result<u128> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (hi - lo).checked_add(1).ok_or(Error::RangeOverflow {
        addr: hi,
        op: "width",
        family,
    })
}

/// Mask of the host bits for `prefix`, e.g. `0xff` for an IPv4 /24.
///
/// Callers must pass `prefix <= family.bits()`.
pub fn host_mask(prefix: u8, family: Family) -> Addr {
    host_mask_bits(family.bits() - prefix)
}

/// Mask with the low `host_bits` bits set.
pub(crate) fn host_mask_bits(host_bits: u8) -> Addr {
    if host_bits >= V6_BITS {
        Addr::MAX
    } else {
        (1u128 << host_bits) - 1
    }
}

/// Whether `addr` is the first address of a block of length `prefix`.
pub fn is_aligned(addr: Addr, prefix: u8, family: Family) -> bool {
    prefix <= family.bits() && addr <= family.max_addr() && addr & host_mask(prefix, family) == 0
}

/// Shortest prefix that `addr` is aligned to, based on trailing zero bits.
pub fn lo_mask(addr: Addr, family: Family) -> u8 {
    let trailing_zeros = addr.trailing_zeros().min(family.bits() as u32) as u8;
    family.bits() - trailing_zeros
}
