//! The chunk key encoding of decoded reference tables.
//!
//! A chunk key is the ASCII decimal chunk grid coordinates joined by a separator, e.g. `1.0.3`
//! with the `.` separator. Scalar (zero dimensional) chunks are keyed `0`. Reference tables mix
//! chunk keys with metadata keys (`.zarray`, `.zattrs`, ...); only keys matching the chunk key
//! form address chunk data.

use itertools::Itertools;
use varrs_metadata::ChunkKeySeparator;

use crate::ChunkIndices;

/// Parse a chunk key into chunk grid indices.
///
/// Returns [`None`] if `key` is not a chunk key: any part that is not an unsigned decimal
/// integer (such as the `.zarray` metadata key) disqualifies the whole key.
#[must_use]
pub fn parse_chunk_key(key: &str, separator: ChunkKeySeparator) -> Option<ChunkIndices> {
    if key.is_empty() {
        return None;
    }
    key.split(char::from(separator))
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit()) {
                part.parse::<u64>().ok()
            } else {
                None
            }
        })
        .collect()
}

/// Encode chunk grid indices into a chunk key.
///
/// Zero dimensional indices encode as `0`.
#[must_use]
pub fn chunk_key(chunk_indices: &[u64], separator: ChunkKeySeparator) -> String {
    if chunk_indices.is_empty() {
        '0'.to_string()
    } else {
        // Avoid a heap allocation of the chunk key separator
        let mut separator_str: [u8; 4] = [0; 4];
        let separator_char: char = separator.into();
        let separator_str: &str = separator_char.encode_utf8(&mut separator_str);

        chunk_indices.iter().join(separator_str)
    }
}
