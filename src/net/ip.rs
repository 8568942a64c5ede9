//! IP address classification
//!
//! Parses and normalizes IPv4/IPv6 literals and classifies addresses against
//! the private/reserved ranges that matter for SSRF detection. IPv4 parsing
//! accepts the obfuscated encodings attackers use to slip past naive
//! hostname checks: hexadecimal (`0x7f000001`), octal (`0177.0.0.1`), and
//! the short two- and three-part dotted forms.

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

use ipnet::{Ipv4Net, Ipv6Net};

/// Private and reserved IPv4 ranges (loopback, link-local, RFC1918, CGNAT,
/// documentation, benchmarking, multicast-adjacent and broadcast).
const PRIVATE_IPV4_RANGES: &[&str] = &[
    "0.0.0.0/8",
    "10.0.0.0/8",
    "100.64.0.0/10",
    "127.0.0.0/8",
    "169.254.0.0/16",
    "172.16.0.0/12",
    "192.0.0.0/24",
    "192.0.2.0/24",
    "192.31.196.0/24",
    "192.52.193.0/24",
    "192.88.99.0/24",
    "192.168.0.0/16",
    "192.175.48.0/24",
    "198.18.0.0/15",
    "198.51.100.0/24",
    "203.0.113.0/24",
    "240.0.0.0/4",
    "255.255.255.255/32",
];

/// Private and reserved IPv6 ranges: unspecified, loopback, IPv4-mapped and
/// IPv4-translated space, discard-only, ORCHID/documentation/6to4 blocks,
/// unique-local, link-local and multicast.
const PRIVATE_IPV6_RANGES: &[&str] = &[
    "::/128",
    "::1/128",
    "::ffff:0:0/96",
    "64:ff9b::/96",
    "100::/64",
    "2001::/32",
    "2001:20::/28",
    "2001:db8::/32",
    "2002::/16",
    "fc00::/7",
    "fe80::/10",
    "ff00::/8",
];

fn private_ipv4_nets() -> &'static [Ipv4Net] {
    static NETS: OnceLock<Vec<Ipv4Net>> = OnceLock::new();
    NETS.get_or_init(|| {
        PRIVATE_IPV4_RANGES
            .iter()
            .filter_map(|range| range.parse().ok())
            .collect()
    })
}

fn private_ipv6_nets() -> &'static [Ipv6Net] {
    static NETS: OnceLock<Vec<Ipv6Net>> = OnceLock::new();
    NETS.get_or_init(|| {
        PRIVATE_IPV6_RANGES
            .iter()
            .filter_map(|range| range.parse().ok())
            .collect()
    })
}

/// Returns true if the address falls inside any private/reserved IPv4 range.
pub fn is_private_ipv4(addr: Ipv4Addr) -> bool {
    private_ipv4_nets().iter().any(|net| net.contains(&addr))
}

/// Returns true if the address falls inside any private/reserved IPv6 range.
///
/// An IPv4-mapped address is additionally classified by its embedded IPv4.
pub fn is_private_ipv6(addr: Ipv6Addr) -> bool {
    if let Some(v4) = addr.to_ipv4_mapped() {
        if is_private_ipv4(v4) {
            return true;
        }
    }
    private_ipv6_nets().iter().any(|net| net.contains(&addr))
}

/// Parse an IPv4 literal, accepting obfuscated encodings.
///
/// Beyond the standard dotted quad, this accepts per-part hex (`0x7f`) and
/// octal (`0177`) notation as well as the 1-, 2- and 3-part numeric forms
/// (`2130706433`, `127.1`, `127.0.1`) that C `inet_aton` and most URL
/// resolvers honor. A part with a leading zero followed by a non-octal
/// digit is rejected rather than silently read as decimal.
pub fn parse_ipv4_flexible(s: &str) -> Option<Ipv4Addr> {
    if s.is_empty() {
        return None;
    }
    if let Ok(addr) = s.parse::<Ipv4Addr>() {
        return Some(addr);
    }

    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 4 {
        return None;
    }
    let mut values = Vec::with_capacity(parts.len());
    for part in &parts {
        values.push(parse_ipv4_part(part)?);
    }

    match values.as_slice() {
        [v] => {
            if *v > 0xffff_ffff {
                return None;
            }
            Some(Ipv4Addr::from(*v as u32))
        }
        [a, rest] => {
            if *a > 0xff || *rest > 0x00ff_ffff {
                return None;
            }
            Some(Ipv4Addr::new(
                *a as u8,
                (*rest >> 16) as u8,
                (*rest >> 8) as u8,
                *rest as u8,
            ))
        }
        [a, b, rest] => {
            if *a > 0xff || *b > 0xff || *rest > 0xffff {
                return None;
            }
            Some(Ipv4Addr::new(
                *a as u8,
                *b as u8,
                (*rest >> 8) as u8,
                *rest as u8,
            ))
        }
        [a, b, c, d] => {
            if values.iter().any(|v| *v > 0xff) {
                return None;
            }
            Some(Ipv4Addr::new(*a as u8, *b as u8, *c as u8, *d as u8))
        }
        _ => None,
    }
}

fn parse_ipv4_part(part: &str) -> Option<u64> {
    if part.is_empty() {
        return None;
    }
    if let Some(hex) = part.strip_prefix("0x").or_else(|| part.strip_prefix("0X")) {
        if hex.is_empty() {
            return None;
        }
        return u64::from_str_radix(hex, 16).ok();
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        if part.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return u64::from_str_radix(part, 8).ok();
        }
        // Leading zero with 8/9 digits is ambiguous, reject it.
        return None;
    }
    part.parse().ok()
}

/// Classify a resolved hostname as private/internal.
///
/// Accepts bracketed and bare IPv6 literals, any IPv4 encoding handled by
/// [`parse_ipv4_flexible`], and the literal hostname `localhost`.
pub fn is_private_hostname(hostname: &str) -> bool {
    if let Some(inner) = hostname
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
    {
        if let Ok(v6) = inner.parse::<Ipv6Addr>() {
            return is_private_ipv6(v6);
        }
        return false;
    }

    if let Ok(v6) = hostname.parse::<Ipv6Addr>() {
        return is_private_ipv6(v6);
    }

    if let Some(v4) = parse_ipv4_flexible(hostname) {
        return is_private_ipv4(v4);
    }

    hostname.eq_ignore_ascii_case("localhost")
}
