use std::num::NonZeroU64;

use derive_more::{Deref, From};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ArrayShape;

/// The shape of a chunk: the number of elements per dimension.
///
/// All chunk extents are non-zero.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Deref, From)]
#[serde(transparent)]
pub struct ChunkShape(Vec<NonZeroU64>);

/// An invalid chunk shape error.
#[derive(Clone, Debug, Error)]
#[error("invalid chunk shape {_0:?}: all extents must be non-zero")]
pub struct InvalidChunkShapeError(Vec<u64>);

impl ChunkShape {
    /// Convert the chunk shape to an [`ArrayShape`] ([`Vec<u64>`]).
    #[must_use]
    pub fn to_array_shape(&self) -> ArrayShape {
        self.0.iter().copied().map(NonZeroU64::get).collect()
    }

    /// Return the chunk shape as a slice of [`NonZeroU64`].
    #[must_use]
    pub fn as_slice(&self) -> &[NonZeroU64] {
        &self.0
    }
}

impl TryFrom<Vec<u64>> for ChunkShape {
    type Error = InvalidChunkShapeError;

    fn try_from(chunk_shape: Vec<u64>) -> Result<Self, Self::Error> {
        chunk_shape
            .iter()
            .copied()
            .map(NonZeroU64::new)
            .collect::<Option<Vec<_>>>()
            .map(Self)
            .ok_or(InvalidChunkShapeError(chunk_shape))
    }
}

impl TryFrom<&[u64]> for ChunkShape {
    type Error = InvalidChunkShapeError;

    fn try_from(chunk_shape: &[u64]) -> Result<Self, Self::Error> {
        Self::try_from(chunk_shape.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_shape_try_from() {
        let chunk_shape = ChunkShape::try_from(vec![1, 2, 3]).unwrap();
        assert_eq!(chunk_shape.len(), 3);
        assert_eq!(chunk_shape.to_array_shape(), vec![1, 2, 3]);
        assert!(ChunkShape::try_from(vec![1, 0, 3]).is_err());
        assert_eq!(
            ChunkShape::try_from(vec![1, 0, 3]).unwrap_err().to_string(),
            "invalid chunk shape [1, 0, 3]: all extents must be non-zero"
        );
    }

    #[test]
    fn chunk_shape_serde() {
        let chunk_shape: ChunkShape = serde_json::from_str("[1000,1000]").unwrap();
        assert_eq!(chunk_shape, ChunkShape::try_from(vec![1000, 1000]).unwrap());
        assert_eq!(serde_json::to_string(&chunk_shape).unwrap(), "[1000,1000]");
        assert!(serde_json::from_str::<ChunkShape>("[1,0]").is_err());
    }
}
