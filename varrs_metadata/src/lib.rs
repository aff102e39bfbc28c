//! Array metadata support for the [`varrs`](https://docs.rs/varrs/latest/varrs/index.html) crate.
//!
//! This crate provides the metadata descriptor of a *virtual* chunked array: its shape, chunk
//! shape, data type, and encoding ([`Codec`]). The descriptor round-trips the Zarr V2 `.zarray`
//! JSON form produced by reference loaders (e.g. kerchunk), which is the interchange format for
//! virtual array metadata.
//!
//! ## Licence
//! `varrs_metadata` is licensed under either of
//!  - the Apache License, Version 2.0 [LICENSE-APACHE](https://docs.rs/crate/varrs_metadata/latest/source/LICENCE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license [LICENSE-MIT](https://docs.rs/crate/varrs_metadata/latest/source/LICENCE-MIT) or <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

mod array_metadata;
pub use array_metadata::{ArrayMetadata, ArrayMetadataOrder, FillValueMetadata};

mod chunk_shape;
pub use chunk_shape::{ChunkShape, InvalidChunkShapeError};

mod codec;
pub use codec::{Codec, CodecMetadata, Configuration};

mod data_type;
pub use data_type::{DataType, DataTypeKind, DataTypeParseError, Endianness};

use serde::{Deserialize, Serialize};

/// The shape of an array: the number of elements per dimension.
pub type ArrayShape = Vec<u64>;

/// An incompatible dimensionality error.
#[derive(Copy, Clone, Debug, thiserror::Error)]
#[error("incompatible dimensionality {_0}, expected {_1}")]
pub struct IncompatibleDimensionalityError(usize, usize);

impl IncompatibleDimensionalityError {
    /// Create a new incompatible dimensionality error.
    #[must_use]
    pub const fn new(got: usize, expected: usize) -> Self {
        Self(got, expected)
    }
}

/// The separator between the coordinates of a chunk key.
///
/// Zarr V2 arrays declare this in the `dimension_separator` metadata field, with `.` the default.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ChunkKeySeparator {
    /// The dot separator, e.g. `0.1.2`.
    #[default]
    #[serde(rename = ".")]
    Dot,
    /// The slash separator, e.g. `0/1/2`.
    #[serde(rename = "/")]
    Slash,
}

impl From<ChunkKeySeparator> for char {
    fn from(separator: ChunkKeySeparator) -> Self {
        match separator {
            ChunkKeySeparator::Dot => '.',
            ChunkKeySeparator::Slash => '/',
        }
    }
}

impl TryFrom<char> for ChunkKeySeparator {
    type Error = char;

    fn try_from(separator: char) -> Result<Self, Self::Error> {
        match separator {
            '.' => Ok(Self::Dot),
            '/' => Ok(Self::Slash),
            _ => Err(separator),
        }
    }
}

impl core::fmt::Display for ChunkKeySeparator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_key_separator() {
        assert_eq!(char::from(ChunkKeySeparator::Dot), '.');
        assert_eq!(char::from(ChunkKeySeparator::Slash), '/');
        assert_eq!(ChunkKeySeparator::try_from('.'), Ok(ChunkKeySeparator::Dot));
        assert_eq!(ChunkKeySeparator::try_from('x'), Err('x'));
        assert_eq!(
            serde_json::from_str::<ChunkKeySeparator>(r#""/""#).unwrap(),
            ChunkKeySeparator::Slash
        );
        assert_eq!(
            serde_json::to_string(&ChunkKeySeparator::Dot).unwrap(),
            r#"".""#
        );
    }
}
