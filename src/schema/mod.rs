//! Versioned serialization for catalog artifacts.
//!
//! The contract for metadata loads is "always return a usable object":
//! decode the current schema when possible, migrate older records
//! forward, and fall back to best-effort scalar recovery when the bytes
//! are not valid JSON at all. A hard failure never reaches the caller;
//! degraded loads are logged so silent data loss stays visible.

pub mod fallback;
pub mod migrations;

use tracing::{debug, warn};

use crate::domain::{ModelIndex, ModelMeta, CURRENT_SCHEMA_VERSION};

/// How faithfully a metadata record was reconstructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    /// Decoded directly at the current schema
    Current,
    /// Decoded at an older schema and migrated forward
    Migrated,
    /// Structured decoding failed; scalars recovered from raw text
    Recovered,
}

/// A decoded metadata record plus how it was obtained.
#[derive(Debug, Clone)]
pub struct DecodedMeta {
    pub meta: ModelMeta,
    pub fidelity: Fidelity,
}

/// Decode a metadata record from stored text. Never fails.
///
/// Tiers, in order of preference:
/// 1. direct decode at the current schema
/// 2. direct decode plus the migration chain
/// 3. fallback scalar extraction from the raw text
/// Empty or whitespace input short-circuits to an empty current record.
pub fn decode_meta(raw: &str) -> DecodedMeta {
    if raw.trim().is_empty() {
        return DecodedMeta {
            meta: ModelMeta::empty(),
            fidelity: Fidelity::Current,
        };
    }

    match serde_json::from_str::<ModelMeta>(raw) {
        Ok(mut meta) => {
            if meta.schema_version > CURRENT_SCHEMA_VERSION {
                // Written by a newer client; collections are null-tolerant
                // so keep the data rather than guess at a downgrade.
                warn!(
                    schema_version = meta.schema_version,
                    current = CURRENT_SCHEMA_VERSION,
                    "metadata written by a newer schema; loading as-is"
                );
                return DecodedMeta {
                    meta,
                    fidelity: Fidelity::Current,
                };
            }

            if meta.schema_version == CURRENT_SCHEMA_VERSION {
                return DecodedMeta {
                    meta,
                    fidelity: Fidelity::Current,
                };
            }

            let from = meta.schema_version;
            match migrations::migrate(&mut meta) {
                Ok(()) => {
                    debug!(from, to = CURRENT_SCHEMA_VERSION, "migrated metadata");
                    DecodedMeta {
                        meta,
                        fidelity: Fidelity::Migrated,
                    }
                }
                Err(err) => {
                    warn!(from, %err, "migration failed; degraded load via fallback extraction");
                    DecodedMeta {
                        meta: fallback::extract(raw),
                        fidelity: Fidelity::Recovered,
                    }
                }
            }
        }
        Err(err) => {
            warn!(%err, "metadata decode failed; degraded load via fallback extraction");
            DecodedMeta {
                meta: fallback::extract(raw),
                fidelity: Fidelity::Recovered,
            }
        }
    }
}

/// Encode a metadata record for storage.
pub fn encode_meta(meta: &ModelMeta) -> String {
    // ModelMeta contains no non-string map keys, so encoding cannot fail.
    serde_json::to_string_pretty(meta).unwrap_or_else(|_| "{}".to_string())
}

/// Decode the catalog index. Malformed bytes yield an empty index, never
/// an error; absence is handled by the repository before this point.
pub fn decode_index(raw: &str) -> ModelIndex {
    if raw.trim().is_empty() {
        return ModelIndex::new();
    }

    match serde_json::from_str(raw) {
        Ok(index) => index,
        Err(err) => {
            warn!(%err, "index decode failed; starting from an empty index");
            ModelIndex::new()
        }
    }
}

/// Encode the catalog index for storage.
pub fn encode_index(index: &ModelIndex) -> String {
    serde_json::to_string_pretty(index).unwrap_or_else(|_| "{}".to_string())
}
