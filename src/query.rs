//! Search and sort over index entries.
//!
//! Pure functions over already-materialized entries; no I/O. Used by the
//! CLI and intended for any browsing front end.

use clap::ValueEnum;

use crate::domain::{IndexEntry, Version};

/// Sort order for listing index entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortMode {
    /// Case-insensitive name, ascending
    Name,
    /// Most recently updated first
    Date,
    /// Highest version first; unparseable versions last
    Version,
}

/// Case-insensitive substring match against name, description, or tags.
pub fn entry_matches_term(entry: &IndexEntry, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    entry.name.to_lowercase().contains(&term)
        || entry.description.to_lowercase().contains(&term)
        || entry.tags.iter().any(|t| t.to_lowercase().contains(&term))
}

/// Match an entry against a query with optional boolean operators.
///
/// A query containing the literal delimiter `" AND "` (any case) is a
/// conjunction over its sub-terms; `" OR "` is a disjunction. The two are
/// mutually exclusive within one query: when both appear, AND governs.
/// A query with neither is a single-term match.
pub fn entry_matches_advanced(entry: &IndexEntry, query: &str) -> bool {
    let lowered = query.to_lowercase();

    if lowered.contains(" and ") {
        lowered
            .split(" and ")
            .filter(|t| !t.trim().is_empty())
            .all(|t| entry_matches_term(entry, t))
    } else if lowered.contains(" or ") {
        lowered
            .split(" or ")
            .filter(|t| !t.trim().is_empty())
            .any(|t| entry_matches_term(entry, t))
    } else {
        entry_matches_term(entry, query)
    }
}

/// Sort entries in place by the given mode.
pub fn sort_entries(entries: &mut [IndexEntry], mode: SortMode) {
    match mode {
        SortMode::Name => {
            entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortMode::Date => {
            entries.sort_by(|a, b| b.updated_time_ticks.cmp(&a.updated_time_ticks));
        }
        SortMode::Version => {
            // Unparseable versions compare as 0.0.0 and land at the end.
            entries.sort_by(|a, b| {
                let va = Version::parse(&a.latest_version).unwrap_or_default();
                let vb = Version::parse(&b.latest_version).unwrap_or_default();
                vb.cmp(&va)
            });
        }
    }
}
