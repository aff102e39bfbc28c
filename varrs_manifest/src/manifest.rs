use std::collections::HashMap;

use thiserror::Error;
use varrs_metadata::{ArrayShape, ChunkKeySeparator, IncompatibleDimensionalityError};

use crate::{ChunkIndices, VirtualChunkRef, chunk_key::parse_chunk_key};

/// A chunk manifest: a mapping from chunk grid coordinates to byte range references.
///
/// A manifest covers a rectangular chunk grid of shape [`grid_shape`](Self::grid_shape). Every
/// coordinate of a fully-materialised array has an entry; a *sparse* manifest omits coordinates
/// whose chunks take the fill value. Manifests are immutable after construction: the merge
/// operations allocate a new manifest and leave their inputs untouched.
///
/// Lookup and insertion are amortised constant time, and chunk coordinates of dimensionality at
/// most 4 are stored inline, so manifests with millions of entries remain practical.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChunkManifest {
    grid_shape: ArrayShape,
    chunks: HashMap<ChunkIndices, VirtualChunkRef>,
}

/// A [`ChunkManifest`] creation error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ManifestCreateError {
    /// The grid shape has a zero extent.
    #[error("invalid grid shape {_0:?}: all extents must be non-zero")]
    InvalidGridShape(ArrayShape),
    /// A chunk coordinate has the wrong dimensionality.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// A chunk coordinate lies outside the grid.
    #[error("chunk indices {indices:?} are out of bounds of grid shape {grid_shape:?}")]
    ChunkIndicesOutOfBounds {
        /// The out of bounds chunk indices.
        indices: Vec<u64>,
        /// The grid shape of the manifest.
        grid_shape: ArrayShape,
    },
}

impl ChunkManifest {
    /// Create a new chunk manifest from an explicit coordinate to reference mapping.
    ///
    /// # Errors
    /// Returns [`ManifestCreateError`] if any extent of `grid_shape` is zero, or if any
    /// coordinate in `chunks` does not match the dimensionality of `grid_shape` or lies outside
    /// of it.
    pub fn new(
        grid_shape: ArrayShape,
        chunks: HashMap<ChunkIndices, VirtualChunkRef>,
    ) -> Result<Self, ManifestCreateError> {
        if grid_shape.iter().any(|&extent| extent == 0) {
            return Err(ManifestCreateError::InvalidGridShape(grid_shape));
        }
        for indices in chunks.keys() {
            if indices.len() != grid_shape.len() {
                return Err(IncompatibleDimensionalityError::new(
                    indices.len(),
                    grid_shape.len(),
                )
                .into());
            }
            if std::iter::zip(indices.iter(), &grid_shape)
                .any(|(index, extent)| index >= extent)
            {
                return Err(ManifestCreateError::ChunkIndicesOutOfBounds {
                    indices: indices.to_vec(),
                    grid_shape,
                });
            }
        }
        Ok(Self { grid_shape, chunks })
    }

    /// Create a new chunk manifest from a decoded reference table.
    ///
    /// Table keys matching the chunk key form (see [`parse_chunk_key`]) become manifest entries;
    /// all other keys (array metadata, attributes, ...) are skipped.
    ///
    /// # Errors
    /// Returns [`ManifestCreateError`] under the same conditions as [`ChunkManifest::new`].
    pub fn from_reference_table(
        grid_shape: ArrayShape,
        separator: ChunkKeySeparator,
        entries: impl IntoIterator<Item = (String, VirtualChunkRef)>,
    ) -> Result<Self, ManifestCreateError> {
        let mut chunks = HashMap::new();
        for (key, chunk_ref) in entries {
            if let Some(indices) = parse_chunk_key(&key, separator) {
                chunks.insert(indices, chunk_ref);
            } else {
                log::debug!("ignoring non-chunk key `{key}`");
            }
        }
        Self::new(grid_shape, chunks)
    }

    /// The shape of the chunk grid (i.e. the number of chunks per dimension).
    #[must_use]
    pub fn grid_shape(&self) -> &[u64] {
        &self.grid_shape
    }

    /// The dimensionality of the chunk grid.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.grid_shape.len()
    }

    /// The number of chunk entries in the manifest.
    #[must_use]
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Return the chunk reference at `chunk_indices`, or [`None`] for a missing (fill value)
    /// chunk or out of bounds indices.
    #[must_use]
    pub fn get(&self, chunk_indices: &[u64]) -> Option<&VirtualChunkRef> {
        self.chunks.get(&ChunkIndices::from(chunk_indices))
    }

    /// Return an iterator over the chunk entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&ChunkIndices, &VirtualChunkRef)> {
        self.chunks.iter()
    }

    /// Return true if every coordinate of the chunk grid has an entry.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        let num_grid_cells = self
            .grid_shape
            .iter()
            .map(|&extent| u128::from(extent))
            .product::<u128>();
        usize::try_from(num_grid_cells).is_ok_and(|cells| cells == self.chunks.len())
    }

    /// Construct a manifest whose invariants are already established.
    pub(crate) fn new_unchecked(
        grid_shape: ArrayShape,
        chunks: HashMap<ChunkIndices, VirtualChunkRef>,
    ) -> Self {
        Self { grid_shape, chunks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_ref(offset: u64) -> VirtualChunkRef {
        VirtualChunkRef::new("file:///data/a.nc".to_string(), offset, 100)
    }

    fn indices(indices: &[u64]) -> ChunkIndices {
        ChunkIndices::from(indices)
    }

    #[test]
    fn manifest_new() {
        let chunks = HashMap::from([
            (indices(&[0, 0]), chunk_ref(0)),
            (indices(&[1, 0]), chunk_ref(100)),
        ]);
        let manifest = ChunkManifest::new(vec![2, 1], chunks).unwrap();
        assert_eq!(manifest.grid_shape(), &[2, 1]);
        assert_eq!(manifest.dimensionality(), 2);
        assert_eq!(manifest.num_chunks(), 2);
        assert_eq!(manifest.get(&[1, 0]), Some(&chunk_ref(100)));
        assert_eq!(manifest.get(&[0, 1]), None);
        assert!(manifest.is_complete());
    }

    #[test]
    fn manifest_new_invalid_grid_shape() {
        assert!(matches!(
            ChunkManifest::new(vec![2, 0], HashMap::new()),
            Err(ManifestCreateError::InvalidGridShape(_))
        ));
    }

    #[test]
    fn manifest_new_incompatible_dimensionality() {
        let chunks = HashMap::from([(indices(&[0, 0, 0]), chunk_ref(0))]);
        assert!(matches!(
            ChunkManifest::new(vec![2, 1], chunks),
            Err(ManifestCreateError::IncompatibleDimensionality(_))
        ));
    }

    #[test]
    fn manifest_new_out_of_bounds() {
        let chunks = HashMap::from([(indices(&[2, 0]), chunk_ref(0))]);
        let error = ChunkManifest::new(vec![2, 1], chunks).unwrap_err();
        assert_eq!(
            error.to_string(),
            "chunk indices [2, 0] are out of bounds of grid shape [2, 1]"
        );
    }

    #[test]
    fn manifest_sparse() {
        let chunks = HashMap::from([(indices(&[0, 0]), chunk_ref(0))]);
        let manifest = ChunkManifest::new(vec![2, 2], chunks).unwrap();
        assert_eq!(manifest.num_chunks(), 1);
        assert!(!manifest.is_complete());
        assert_eq!(manifest.get(&[1, 1]), None);
    }

    #[test]
    fn manifest_from_reference_table() {
        let manifest = ChunkManifest::from_reference_table(
            vec![2, 1],
            ChunkKeySeparator::Dot,
            [
                (".zarray".to_string(), chunk_ref(0)),
                (".zattrs".to_string(), chunk_ref(0)),
                ("0.0".to_string(), chunk_ref(0)),
                ("1.0".to_string(), chunk_ref(100)),
            ],
        )
        .unwrap();
        assert_eq!(manifest.num_chunks(), 2);
        assert_eq!(manifest.get(&[0, 0]), Some(&chunk_ref(0)));
        assert_eq!(manifest.get(&[1, 0]), Some(&chunk_ref(100)));
    }

    #[test]
    fn manifest_from_reference_table_out_of_bounds() {
        assert!(
            ChunkManifest::from_reference_table(
                vec![1],
                ChunkKeySeparator::Dot,
                [("1".to_string(), chunk_ref(0))],
            )
            .is_err()
        );
    }
}
