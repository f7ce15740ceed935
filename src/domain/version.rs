//! Release version parsing and ordering.
//!
//! Catalog versions are a strict MAJOR.MINOR.PATCH triple. Anything
//! looser (prerelease tags, build metadata, two or four components)
//! is rejected so that ordering stays unambiguous.

use std::fmt;

/// Sentinel stored in an index entry when the local version cannot be
/// determined.
pub const UNKNOWN_VERSION: &str = "(unknown)";

/// A parsed MAJOR.MINOR.PATCH release version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    /// Create a version from its three components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version string.
    ///
    /// Requires exactly three dot-separated components, each a
    /// non-negative integer. Returns `None` for anything else.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let mut parts = text.split('.');
        let major = parse_component(parts.next()?)?;
        let minor = parse_component(parts.next()?)?;
        let patch = parse_component(parts.next()?)?;

        if parts.next().is_some() {
            return None;
        }

        Some(Self::new(major, minor, patch))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse a single version component as a non-negative integer.
fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Decide whether `remote` is a newer release than `local`.
///
/// Never claims an upgrade is available when the local version cannot
/// be determined: an empty or unknown local version returns false. When
/// both sides parse, the parsed triples are compared; otherwise a
/// case-insensitive exact-string inequality is used.
pub fn needs_upgrade(local: &str, remote: &str) -> bool {
    let remote = remote.trim();
    if remote.is_empty() {
        return false;
    }

    let local = local.trim();
    if local.is_empty() || local.eq_ignore_ascii_case(UNKNOWN_VERSION) {
        return false;
    }

    match (Version::parse(local), Version::parse(remote)) {
        (Some(local), Some(remote)) => remote > local,
        _ => !local.eq_ignore_ascii_case(remote),
    }
}
