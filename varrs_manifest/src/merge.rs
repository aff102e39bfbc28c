//! Manifest merge algorithms.
//!
//! Merges combine the manifests of independently-loaded arrays into one manifest whose
//! coordinates address the combined chunk grid. Only coordinates are rewritten; every byte range
//! reference is carried over unchanged, so no chunk data moves.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use thiserror::Error;
use varrs_metadata::ArrayShape;

use crate::{ChunkManifest, VirtualChunkRef};

/// A manifest merge error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ManifestMergeError {
    /// No manifests were supplied.
    #[error("cannot merge an empty list of manifests")]
    EmptyInput,
    /// The merge axis is out of bounds.
    #[error("axis {axis} is out of bounds for dimensionality {dimensionality}")]
    AxisOutOfBounds {
        /// The requested axis.
        axis: usize,
        /// The dimensionality of the output manifest.
        dimensionality: usize,
    },
    /// The manifests have unequal dimensionalities.
    #[error("cannot merge manifests with dimensionalities {_0:?}")]
    IncompatibleDimensionalities(Vec<usize>),
    /// The grid shapes are incompatible for concatenation.
    #[error(
        "cannot concatenate manifests with grid shapes {shapes:?}: dimensions other than axis {axis} must match"
    )]
    IncompatibleGridShapes {
        /// The grid shapes of every input manifest.
        shapes: Vec<ArrayShape>,
        /// The concatenation axis.
        axis: usize,
    },
    /// The grid shapes are unequal, which stacking requires.
    #[error("cannot stack manifests with unequal grid shapes {_0:?}")]
    UnequalGridShapes(Vec<ArrayShape>),
    /// Two inputs produced the same output coordinate. This indicates a violated caller
    /// invariant; entries are never silently overwritten.
    #[error("merged manifests produced colliding chunk indices {_0:?}")]
    ChunkIndexCollision(Vec<u64>),
}

impl ChunkManifest {
    /// Concatenate `manifests` end-to-end along the existing dimension `axis`.
    ///
    /// Entries of the `i`-th manifest keep their coordinates except along `axis`, where they are
    /// shifted by the summed grid extents of the preceding manifests. The output grid shape
    /// equals the first manifest's with the `axis` extent replaced by the sum over all inputs.
    /// Sparse inputs are merged as-is: missing coordinates stay missing.
    ///
    /// Axes are zero-based indices; callers holding a negative (end-relative) axis must
    /// normalise it to `dimensionality + axis` beforehand.
    ///
    /// # Errors
    /// Returns [`ManifestMergeError`] if `manifests` is empty, `axis` is out of bounds, or the
    /// grid shapes disagree on any dimension other than `axis`. All preconditions are checked
    /// before the output is allocated.
    pub fn concatenate(
        manifests: &[&ChunkManifest],
        axis: usize,
    ) -> Result<ChunkManifest, ManifestMergeError> {
        let (first, rest) = manifests
            .split_first()
            .ok_or(ManifestMergeError::EmptyInput)?;
        let dimensionality = first.dimensionality();
        if axis >= dimensionality {
            return Err(ManifestMergeError::AxisOutOfBounds {
                axis,
                dimensionality,
            });
        }
        if rest
            .iter()
            .any(|manifest| manifest.dimensionality() != dimensionality)
        {
            return Err(ManifestMergeError::IncompatibleDimensionalities(
                manifests
                    .iter()
                    .map(|manifest| manifest.dimensionality())
                    .collect(),
            ));
        }
        let off_axis_compatible = rest.iter().all(|manifest| {
            std::iter::zip(first.grid_shape(), manifest.grid_shape())
                .enumerate()
                .all(|(dim, (a, b))| dim == axis || a == b)
        });
        if !off_axis_compatible {
            return Err(ManifestMergeError::IncompatibleGridShapes {
                shapes: manifests
                    .iter()
                    .map(|manifest| manifest.grid_shape().to_vec())
                    .collect(),
                axis,
            });
        }

        let mut grid_shape = first.grid_shape().to_vec();
        grid_shape[axis] = manifests
            .iter()
            .map(|manifest| manifest.grid_shape()[axis])
            .sum();

        let num_chunks = manifests
            .iter()
            .map(|manifest| manifest.num_chunks())
            .sum();
        let mut chunks = HashMap::with_capacity(num_chunks);
        let mut offset: u64 = 0;
        for manifest in manifests {
            for (indices, chunk_ref) in manifest.iter() {
                let mut indices = indices.clone();
                indices[axis] += offset;
                insert_checked(&mut chunks, indices, chunk_ref.clone())?;
            }
            offset += manifest.grid_shape()[axis];
        }
        Ok(ChunkManifest::new_unchecked(grid_shape, chunks))
    }

    /// Stack `manifests` along a new dimension inserted at `axis`.
    ///
    /// The output has dimensionality `r + 1` where `r` is the input dimensionality; `axis` may
    /// equal `r` to append a trailing dimension. Every entry of the `i`-th manifest gains the
    /// coordinate `i` at position `axis`, all other coordinates copied unchanged. The output
    /// grid shape is the input grid shape with the number of manifests inserted at `axis`.
    /// Sparse inputs are merged as-is: missing coordinates stay missing.
    ///
    /// Axes are zero-based indices; callers holding a negative (end-relative) axis must
    /// normalise it beforehand.
    ///
    /// # Errors
    /// Returns [`ManifestMergeError`] if `manifests` is empty, `axis` is out of bounds, or the
    /// grid shapes are not all equal. All preconditions are checked before the output is
    /// allocated.
    ///
    /// # Panics
    /// Panics if the number of manifests exceeds [`u64::MAX`].
    pub fn stack(
        manifests: &[&ChunkManifest],
        axis: usize,
    ) -> Result<ChunkManifest, ManifestMergeError> {
        let (first, rest) = manifests
            .split_first()
            .ok_or(ManifestMergeError::EmptyInput)?;
        let dimensionality = first.dimensionality();
        if axis > dimensionality {
            return Err(ManifestMergeError::AxisOutOfBounds {
                axis,
                dimensionality: dimensionality + 1,
            });
        }
        // full grid shape equality, which subsumes equal dimensionality
        if rest
            .iter()
            .any(|manifest| manifest.grid_shape() != first.grid_shape())
        {
            return Err(ManifestMergeError::UnequalGridShapes(
                manifests
                    .iter()
                    .map(|manifest| manifest.grid_shape().to_vec())
                    .collect(),
            ));
        }

        let mut grid_shape = first.grid_shape().to_vec();
        grid_shape.insert(axis, u64::try_from(manifests.len()).unwrap());

        let mut chunks = HashMap::with_capacity(first.num_chunks() * manifests.len());
        for (i, manifest) in manifests.iter().enumerate() {
            let i = u64::try_from(i).unwrap();
            for (indices, chunk_ref) in manifest.iter() {
                let mut indices = indices.clone();
                indices.insert(axis, i);
                insert_checked(&mut chunks, indices, chunk_ref.clone())?;
            }
        }
        Ok(ChunkManifest::new_unchecked(grid_shape, chunks))
    }
}

fn insert_checked(
    chunks: &mut HashMap<crate::ChunkIndices, VirtualChunkRef>,
    indices: crate::ChunkIndices,
    chunk_ref: VirtualChunkRef,
) -> Result<(), ManifestMergeError> {
    match chunks.entry(indices) {
        Entry::Occupied(entry) => Err(ManifestMergeError::ChunkIndexCollision(
            entry.key().to_vec(),
        )),
        Entry::Vacant(entry) => {
            entry.insert(chunk_ref);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChunkIndices;

    fn chunk_ref(location: &str, offset: u64) -> VirtualChunkRef {
        VirtualChunkRef::new(location.to_string(), offset, 64)
    }

    /// A complete manifest over `grid_shape` with one entry per grid cell.
    fn full_manifest(location: &str, grid_shape: &[u64]) -> ChunkManifest {
        let mut chunks = HashMap::new();
        let mut indices = vec![0; grid_shape.len()];
        let mut offset = 0;
        loop {
            chunks.insert(
                ChunkIndices::from(indices.as_slice()),
                chunk_ref(location, offset),
            );
            offset += 64;
            // odometer increment over the grid
            let mut dim = grid_shape.len();
            loop {
                if dim == 0 {
                    return ChunkManifest::new(grid_shape.to_vec(), chunks).unwrap();
                }
                dim -= 1;
                indices[dim] += 1;
                if indices[dim] < grid_shape[dim] {
                    break;
                }
                indices[dim] = 0;
            }
        }
    }

    #[test]
    fn concatenate_axis_0() {
        let a = full_manifest("a.nc", &[2, 3]);
        let b = full_manifest("b.nc", &[1, 3]);
        let merged = ChunkManifest::concatenate(&[&a, &b], 0).unwrap();
        assert_eq!(merged.grid_shape(), &[3, 3]);
        assert_eq!(merged.num_chunks(), 9);
        assert_eq!(merged.get(&[0, 0]), a.get(&[0, 0]));
        assert_eq!(merged.get(&[1, 2]), a.get(&[1, 2]));
        assert_eq!(merged.get(&[2, 1]), b.get(&[0, 1]));
        // inputs are untouched
        assert_eq!(a.grid_shape(), &[2, 3]);
        assert_eq!(b.num_chunks(), 3);
    }

    #[test]
    fn concatenate_axis_1() {
        let a = full_manifest("a.nc", &[2, 2]);
        let b = full_manifest("b.nc", &[2, 1]);
        let merged = ChunkManifest::concatenate(&[&a, &b], 1).unwrap();
        assert_eq!(merged.grid_shape(), &[2, 3]);
        assert_eq!(merged.num_chunks(), 6);
        assert_eq!(merged.get(&[1, 2]), b.get(&[1, 0]));
    }

    #[test]
    fn concatenate_associative() {
        let a = full_manifest("a.nc", &[1, 2]);
        let b = full_manifest("b.nc", &[2, 2]);
        let c = full_manifest("c.nc", &[3, 2]);
        let at_once = ChunkManifest::concatenate(&[&a, &b, &c], 0).unwrap();
        let ab = ChunkManifest::concatenate(&[&a, &b], 0).unwrap();
        let two_step = ChunkManifest::concatenate(&[&ab, &c], 0).unwrap();
        assert_eq!(at_once, two_step);
    }

    #[test]
    fn concatenate_sparse() {
        let mut chunks = HashMap::new();
        chunks.insert(ChunkIndices::from([0u64, 0].as_slice()), chunk_ref("a.nc", 0));
        let sparse = ChunkManifest::new(vec![2, 1], chunks).unwrap();
        let full = full_manifest("b.nc", &[1, 1]);
        let merged = ChunkManifest::concatenate(&[&sparse, &full], 0).unwrap();
        assert_eq!(merged.grid_shape(), &[3, 1]);
        // the missing coordinate stays missing
        assert_eq!(merged.num_chunks(), 2);
        assert_eq!(merged.get(&[1, 0]), None);
        assert_eq!(merged.get(&[2, 0]), full.get(&[0, 0]));
    }

    #[test]
    fn concatenate_empty_input() {
        assert!(matches!(
            ChunkManifest::concatenate(&[], 0),
            Err(ManifestMergeError::EmptyInput)
        ));
    }

    #[test]
    fn concatenate_axis_out_of_bounds() {
        let a = full_manifest("a.nc", &[2, 3]);
        assert!(matches!(
            ChunkManifest::concatenate(&[&a], 2),
            Err(ManifestMergeError::AxisOutOfBounds {
                axis: 2,
                dimensionality: 2
            })
        ));
    }

    #[test]
    fn concatenate_incompatible_grid_shapes() {
        let a = full_manifest("a.nc", &[2, 3]);
        let b = full_manifest("b.nc", &[2, 4]);
        let error = ChunkManifest::concatenate(&[&a, &b], 0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "cannot concatenate manifests with grid shapes [[2, 3], [2, 4]]: dimensions other than axis 0 must match"
        );
    }

    #[test]
    fn concatenate_incompatible_dimensionalities() {
        let a = full_manifest("a.nc", &[2, 3]);
        let b = full_manifest("b.nc", &[2]);
        assert!(matches!(
            ChunkManifest::concatenate(&[&a, &b], 0),
            Err(ManifestMergeError::IncompatibleDimensionalities(_))
        ));
    }

    #[test]
    fn stack_new_leading_axis() {
        let a = full_manifest("a.nc", &[1, 1]);
        let b = full_manifest("b.nc", &[1, 1]);
        let c = full_manifest("c.nc", &[1, 1]);
        let stacked = ChunkManifest::stack(&[&a, &b, &c], 0).unwrap();
        assert_eq!(stacked.grid_shape(), &[3, 1, 1]);
        assert_eq!(stacked.num_chunks(), 3);
        assert_eq!(stacked.get(&[0, 0, 0]), a.get(&[0, 0]));
        assert_eq!(stacked.get(&[1, 0, 0]), b.get(&[0, 0]));
        assert_eq!(stacked.get(&[2, 0, 0]), c.get(&[0, 0]));
    }

    #[test]
    fn stack_new_trailing_axis() {
        let a = full_manifest("a.nc", &[2, 2]);
        let b = full_manifest("b.nc", &[2, 2]);
        let stacked = ChunkManifest::stack(&[&a, &b], 2).unwrap();
        assert_eq!(stacked.grid_shape(), &[2, 2, 2]);
        assert_eq!(stacked.get(&[1, 0, 1]), b.get(&[1, 0]));
    }

    #[test]
    fn stack_unequal_grid_shapes() {
        let a = full_manifest("a.nc", &[2, 2]);
        let b = full_manifest("b.nc", &[2, 3]);
        let error = ChunkManifest::stack(&[&a, &b], 0).unwrap_err();
        assert_eq!(
            error.to_string(),
            "cannot stack manifests with unequal grid shapes [[2, 2], [2, 3]]"
        );
    }

    #[test]
    fn stack_axis_out_of_bounds() {
        let a = full_manifest("a.nc", &[2, 2]);
        assert!(matches!(
            ChunkManifest::stack(&[&a], 3),
            Err(ManifestMergeError::AxisOutOfBounds { .. })
        ));
    }
}
