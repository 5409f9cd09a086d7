//! Serialization for published artifacts and fingerprints.
//!
//! All JSON leaving the pipeline goes through [`to_json_bytes`], so output
//! formatting is decided in one place.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable map order: Layer sets and buckets are BTreeMaps
//! - Pretty output uses two-space indentation

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to JSON bytes, pretty-printed or compact.
pub fn to_json_bytes<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<Vec<u8>, serde_json::Error> {
    if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
}

/// xxh64 of raw bytes as a 16-digit hex string.
pub fn bytes_hash_hex(bytes: &[u8]) -> String {
    format!("{:016x}", xxh64(bytes, 0))
}

/// Compute the canonical hash of a serializable value.
///
/// The hash is taken over compact JSON.
pub fn canonical_hash_hex<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = to_json_bytes(value, false)?;
    Ok(bytes_hash_hex(&bytes))
}
