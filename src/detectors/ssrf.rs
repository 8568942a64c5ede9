//! SSRF detection
//!
//! Flags outbound requests whose resolved hostname points at private or
//! reserved address space while the hostname itself came from user input.
//! The address classification, including the obfuscated IPv4 encodings,
//! lives in [`crate::net::ip`]; this module ties it to taint.

use crate::net::is_private_hostname;

/// Where a tainted value entered the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaintSource {
    Body,
    Query,
    Headers,
    Cookies,
    RouteParams,
}

/// Headers that routinely carry the server's own address and would produce
/// constant false positives if analyzed for SSRF.
const IGNORED_HEADERS: &[&str] = &["host", "origin", "referer"];

/// Returns true when `user_input` supplied `resolved_hostname` and that
/// hostname points at private/reserved address space (or is `localhost`).
pub fn detect_ssrf(user_input: &str, resolved_hostname: &str) -> bool {
    if user_input.len() <= 1 || resolved_hostname.is_empty() {
        return false;
    }
    if !input_references_hostname(user_input, resolved_hostname) {
        return false;
    }
    is_private_hostname(resolved_hostname)
}

/// The input mentions the hostname either bare or directly after a URL
/// scheme. Comparison is ASCII case-insensitive.
fn input_references_hostname(user_input: &str, hostname: &str) -> bool {
    let input = user_input.to_ascii_lowercase();
    let hostname = hostname.to_ascii_lowercase();
    input
        .split("://")
        .any(|segment| segment.starts_with(&hostname))
        || input.contains(&hostname)
}

/// Returns true when SSRF analysis should be skipped because every tainted
/// path comes from a header that legitimately holds the server's own
/// address (`Host`, `Origin`, `Referer`). Any other source or header keeps
/// the analysis on.
pub fn should_ignore_for_ssrf(source: TaintSource, paths: &[&str]) -> bool {
    if source != TaintSource::Headers || paths.is_empty() {
        return false;
    }
    paths.iter().all(|path| {
        let name = path.strip_prefix('.').unwrap_or(path);
        IGNORED_HEADERS
            .iter()
            .any(|h| name.eq_ignore_ascii_case(h))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_target_from_input() {
        assert!(detect_ssrf("http://10.0.0.1", "10.0.0.1"));
        assert!(detect_ssrf("http://localhost:4000/api", "localhost"));
        assert!(detect_ssrf("169.254.169.254", "169.254.169.254"));
        assert!(detect_ssrf("http://[::1]/admin", "[::1]"));
    }

    #[test]
    fn test_public_target_is_not_flagged() {
        assert!(!detect_ssrf("http://74.125.133.99", "74.125.133.99"));
        assert!(!detect_ssrf("https://example.com", "example.com"));
    }

    #[test]
    fn test_unrelated_input_is_not_flagged() {
        assert!(!detect_ssrf("harmless", "127.0.0.1"));
        assert!(!detect_ssrf("h", "localhost"));
    }

    #[test]
    fn test_obfuscated_loopback() {
        assert!(detect_ssrf("http://0x7f000001", "0x7f000001"));
        assert!(detect_ssrf("http://127.1", "127.1"));
    }

    #[test]
    fn test_ignored_header_sources() {
        assert!(should_ignore_for_ssrf(TaintSource::Headers, &[".host"]));
        assert!(should_ignore_for_ssrf(
            TaintSource::Headers,
            &[".origin", ".referer"]
        ));
        assert!(!should_ignore_for_ssrf(
            TaintSource::Headers,
            &[".host", ".x-forwarded-for"]
        ));
        assert!(!should_ignore_for_ssrf(TaintSource::Query, &[".host"]));
        assert!(!should_ignore_for_ssrf(TaintSource::Headers, &[]));
    }
}
