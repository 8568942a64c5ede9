//! CIDR-aware IP blocklist
//!
//! A membership-testable set of addresses and CIDR ranges, populated once at
//! configuration time and then only queried. Validation is strict: malformed
//! entries are rejected (and reported to the caller via the `bool` return)
//! rather than stored, and the actual range-membership arithmetic is
//! delegated to [`ipnet`] instead of being reimplemented here.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use tracing::debug;

/// A set of IPv4/IPv6 addresses and CIDR ranges.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    networks: Vec<IpNet>,
}

impl Blocklist {
    /// Create an empty blocklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare address (`192.168.2.1`, `::1`) or a CIDR range
    /// (`10.0.0.0/8`, `fc00::/7`).
    ///
    /// Returns false without mutating the list when the entry is malformed:
    /// unparseable address, non-numeric prefix, or a prefix outside [1,32]
    /// for IPv4 / [1,128] for IPv6.
    pub fn add(&mut self, ip_or_cidr: &str) -> bool {
        match parse_entry(ip_or_cidr) {
            Some(net) => {
                self.networks.push(net);
                true
            }
            None => {
                debug!(entry = ip_or_cidr, "Rejected malformed blocklist entry");
                false
            }
        }
    }

    /// Returns true when the given address is covered by any stored entry.
    ///
    /// Unparseable input is never a member. An IPv4-mapped IPv6 address is
    /// also checked as its embedded IPv4 so `::ffff:192.168.2.1` matches an
    /// IPv4 range.
    pub fn check(&self, ip: &str) -> bool {
        let Ok(addr) = ip.parse::<IpAddr>() else {
            return false;
        };
        if self.contains(addr) {
            return true;
        }
        if let IpAddr::V6(v6) = addr {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return self.contains(IpAddr::V4(v4));
            }
        }
        false
    }

    fn contains(&self, addr: IpAddr) -> bool {
        self.networks.iter().any(|net| net.contains(&addr))
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Returns true when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

fn parse_entry(entry: &str) -> Option<IpNet> {
    if let Some((addr, prefix)) = entry.split_once('/') {
        // Reject signs and whitespace that integer parsing would accept.
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let prefix: u8 = prefix.parse().ok()?;
        if let Ok(v4) = addr.parse::<Ipv4Addr>() {
            if !(1..=32).contains(&prefix) {
                return None;
            }
            return Ipv4Net::new(v4, prefix).ok().map(IpNet::V4);
        }
        if let Ok(v6) = addr.parse::<Ipv6Addr>() {
            if !(1..=128).contains(&prefix) {
                return None;
            }
            return Ipv6Net::new(v6, prefix).ok().map(IpNet::V6);
        }
        return None;
    }

    match entry.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => Ipv4Net::new(v4, 32).ok().map(IpNet::V4),
        Ok(IpAddr::V6(v6)) => Ipv6Net::new(v6, 128).ok().map(IpNet::V6),
        Err(_) => None,
    }
}
