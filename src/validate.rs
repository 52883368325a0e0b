//! Validation of textual user input.

use crate::error::{Error, Result};
use crate::models::{AddressRange, Family, RangeSpec};
use ipnet::IpNet;
use regex::Regex;
use std::error::Error as StdError;
use std::net::IpAddr;
use std::sync::OnceLock;

static IPV4_CIDR_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_ipv4_cidr_regex() -> &'static Regex {
    IPV4_CIDR_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3}\.){3}[0-9]{1,3}(/([0-9]|[1-2][0-9]|3[0-2]))?$")
            .expect("Invalid Regex")
    })
}

/// Check a CIDR string: dotted IPv4 with an optional `/0-32`, or an IPv6 network.
pub fn is_valid_cidr(cidr: &str) -> bool {
    let cidr = cidr.trim();
    if get_ipv4_cidr_regex().is_match(cidr) {
        // the regex lets octets like 999 through
        return match cidr.split_once('/') {
            Some(_) => cidr.parse::<IpNet>().is_ok(),
            None => cidr.parse::<IpAddr>().is_ok(),
        };
    }
    cidr.contains(':') && cidr.parse::<IpNet>().is_ok()
}

/// Check that `prefix` is a valid prefix length for `family`.
pub fn check_prefix(prefix: u8, family: Family) -> Result<u8> {
    if prefix > family.bits() {
        return Err(Error::PrefixOutOfRange {
            prefix,
            family,
            max: family.bits(),
        });
    }
    Ok(prefix)
}

/// Parse an unsigned integer in `0..=2^128-1`, e.g. an address count.
pub fn check_address_int(value: &str) -> std::result::Result<u128, Box<dyn StdError>> {
    let value = value.trim();
    if value.starts_with('-') {
        return Err(format!("{value} is not a valid ip, must be positive").into());
    }
    value
        .parse::<u128>()
        .map_err(|e| format!("{value} is not a valid ip number: {e}").into())
}

/// Build the requested range from either a CIDR or a start/end pair.
pub fn parse_range(
    cidr: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> std::result::Result<AddressRange, Box<dyn StdError>> {
    let spec = match (cidr, start, end) {
        (Some(cidr), None, None) => {
            if !is_valid_cidr(cidr) {
                return Err(Error::InvalidCidr(cidr.to_string()).into());
            }
            let cidr = cidr.trim();
            let net = match cidr.parse::<IpNet>() {
                Ok(net) => net,
                // a bare address is a single-host network
                Err(_) => cidr
                    .parse::<IpAddr>()
                    .ok()
                    .and_then(|ip| IpNet::new(ip, Family::of(ip).bits()).ok())
                    .ok_or_else(|| Error::InvalidCidr(cidr.to_string()))?,
            };
            RangeSpec::Network(net)
        }
        (None, Some(start), Some(end)) => RangeSpec::Bounds {
            start: parse_ip(start)?,
            end: parse_ip(end)?,
        },
        _ => return Err("Give either a CIDR range or both a start and an end address".into()),
    };
    Ok(AddressRange::try_from(spec)?)
}

fn parse_ip(value: &str) -> std::result::Result<IpAddr, Box<dyn StdError>> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid address {value}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_cidr() {
        assert!(is_valid_cidr("10.0.0.124/30"));
        assert!(is_valid_cidr("10.0.0.0"));
        assert!(is_valid_cidr("2001:db8::/32"));
        assert!(!is_valid_cidr("10.0.0.0/33"));
        assert!(!is_valid_cidr("10.0.0/8"));
        assert!(!is_valid_cidr("999.0.0.0/8"));
        assert!(!is_valid_cidr("2001:db8::/129"));
        assert!(!is_valid_cidr("string"));
    }

    #[test]
    fn test_check_prefix() {
        assert_eq!(check_prefix(0, Family::V4).unwrap(), 0);
        assert_eq!(check_prefix(32, Family::V4).unwrap(), 32);
        assert!(check_prefix(33, Family::V4).is_err());
        assert_eq!(check_prefix(128, Family::V6).unwrap(), 128);
        assert!(check_prefix(129, Family::V6).is_err());
    }

    #[test]
    fn test_check_address_int() {
        assert_eq!(check_address_int("0").unwrap(), 0);
        assert_eq!(check_address_int("4294967295").unwrap(), 4294967295);
        assert_eq!(
            check_address_int("340282366920938463463374607431768211455").unwrap(),
            u128::MAX
        );
        assert!(check_address_int("340282366920938463463374607431768211456").is_err());
        assert!(check_address_int("-1").is_err());
        assert!(check_address_int("string").is_err());
    }

    #[test]
    fn test_parse_range_cidr() {
        let range = parse_range(Some("10.0.0.0/8"), None, None).unwrap();
        assert_eq!(range.num_addresses().unwrap(), 16_777_216);
        let single = parse_range(Some("10.0.0.7"), None, None).unwrap();
        assert_eq!(single.num_addresses().unwrap(), 1);
    }

    #[test]
    fn test_parse_range_bounds() {
        let range = parse_range(None, Some("10.0.0.10"), Some("10.0.0.20")).unwrap();
        assert_eq!(range.num_addresses().unwrap(), 11);
        assert!(parse_range(None, Some("10.0.0.20"), Some("10.0.0.10")).is_err());
        assert!(parse_range(None, Some("10.0.0.1"), Some("bad")).is_err());
    }

    #[test]
    fn test_parse_range_needs_one_form() {
        assert!(parse_range(None, None, None).is_err());
        assert!(parse_range(Some("10.0.0.0/8"), Some("10.0.0.1"), None).is_err());
        assert!(parse_range(None, Some("10.0.0.1"), None).is_err());
    }
}
