//! Chunk manifests for the [`varrs`](https://docs.rs/varrs/latest/varrs/index.html) crate.
//!
//! A [`ChunkManifest`] maps every coordinate of a rectangular chunk grid to a
//! [`VirtualChunkRef`]: the location, byte offset and byte length of the already-existing bytes
//! that realise that chunk. Manifests are immutable; the merge operations
//! ([`concatenate`](ChunkManifest::concatenate) and [`stack`](ChunkManifest::stack)) combine
//! manifests into a new one with rewritten coordinates and never touch chunk data.
//!
//! No I/O is performed by this crate. Byte ranges are addresses, not bytes.
//!
//! ## Licence
//! `varrs_manifest` is licensed under either of
//!  - the Apache License, Version 2.0 [LICENSE-APACHE](https://docs.rs/crate/varrs_manifest/latest/source/LICENCE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license [LICENSE-MIT](https://docs.rs/crate/varrs_manifest/latest/source/LICENCE-MIT) or <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

mod chunk_key;
pub use chunk_key::{chunk_key, parse_chunk_key};

mod manifest;
pub use manifest::{ChunkManifest, ManifestCreateError};

mod merge;
pub use merge::ManifestMergeError;

/// A byte offset.
pub type ByteOffset = u64;

/// A byte length.
pub type ByteLength = u64;

/// An ND index to a chunk in a chunk grid.
/// Uses [`TinyVec`](tinyvec::TinyVec) for stack allocation up to 4 dimensions.
pub type ChunkIndices = tinyvec::TinyVec<[u64; 4]>;

/// A reference to the contiguous byte range realising one chunk of a virtual array.
///
/// The location is an opaque path or URI into some store; reading the addressed bytes is the
/// concern of a store implementation, never of the manifest.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VirtualChunkRef {
    location: String,
    offset: ByteOffset,
    length: ByteLength,
}

impl VirtualChunkRef {
    /// Create a new chunk reference to `length` bytes at `offset` within `location`.
    #[must_use]
    pub fn new(location: String, offset: ByteOffset, length: ByteLength) -> Self {
        Self {
            location,
            offset,
            length,
        }
    }

    /// The path or URI of the file or object holding the chunk bytes.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The byte offset of the chunk within its location.
    #[must_use]
    pub const fn offset(&self) -> ByteOffset {
        self.offset
    }

    /// The byte length of the chunk.
    #[must_use]
    pub const fn length(&self) -> ByteLength {
        self.length
    }
}

impl std::fmt::Display for VirtualChunkRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}..{}]",
            self.location,
            self.offset,
            self.offset.saturating_add(self.length)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn virtual_chunk_ref() {
        let chunk_ref = VirtualChunkRef::new("s3://bucket/data.nc".to_string(), 100, 200);
        assert_eq!(chunk_ref.location(), "s3://bucket/data.nc");
        assert_eq!(chunk_ref.offset(), 100);
        assert_eq!(chunk_ref.length(), 200);
        assert_eq!(chunk_ref.to_string(), "s3://bucket/data.nc [100..300]");
    }
}
