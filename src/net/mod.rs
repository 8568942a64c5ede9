//! Network primitives: IP address classification and the CIDR blocklist.

pub mod blocklist;
pub mod ip;

pub use blocklist::Blocklist;
pub use ip::{is_private_hostname, is_private_ipv4, is_private_ipv6, parse_ipv4_flexible};
