//! Virtual arrays.
//!
//! A [`ManifestArray`] is the virtualised representation of one chunked array: an
//! [`ArrayMetadata`] descriptor paired with the [`ChunkManifest`] realising its chunks. It holds
//! no element data and cannot be mutated in place; every transformation returns a new array.
//!
//! Supported structural operations are [`concatenate`] and [`stack`], which require the inputs
//! to share a data type and codec (see [`validate`]). A host array-computation framework can
//! route its own combining functions through [`try_dispatch`], which yields
//! [`FunctionOutcome::NotHandled`] for anything this crate does not manage.

mod array_errors;
mod array_function;
mod combine;

pub mod validate;

use std::fmt;

pub use varrs_manifest::{
    ByteLength, ByteOffset, ChunkIndices, ChunkManifest, ManifestCreateError, ManifestMergeError,
    VirtualChunkRef,
};
pub use varrs_metadata::{
    ArrayMetadata, ArrayShape, ChunkKeySeparator, ChunkShape, Codec, DataType,
    FillValueMetadata, IncompatibleDimensionalityError,
};

pub use self::array_errors::{ArrayCreateError, CombineError, UnsupportedOperationError};
pub use self::array_function::{
    ArrayFunctionPlugin, CONCATENATE, FunctionArgs, FunctionOutcome, RESULT_TYPE, try_dispatch,
};
pub use self::combine::{concatenate, result_type, stack};

/// A virtual array: array metadata paired with the chunk manifest realising its chunks.
///
/// The pairing is validated on construction and never mutated afterwards. Reading element data
/// is impossible by design; the array exposes only cheap metadata properties and the structural
/// operations of this module.
#[derive(Clone, Debug, PartialEq)]
pub struct ManifestArray {
    metadata: ArrayMetadata,
    manifest: ChunkManifest,
}

impl ManifestArray {
    /// Create a new virtual array from a metadata descriptor and a chunk manifest.
    ///
    /// # Errors
    /// Returns [`ArrayCreateError`] if the dimensionalities differ or the manifest's grid shape
    /// does not equal the grid shape implied by the metadata (the per-dimension ceiling division
    /// of the array shape by the chunk shape).
    pub fn new(metadata: ArrayMetadata, manifest: ChunkManifest) -> Result<Self, ArrayCreateError> {
        if manifest.dimensionality() != metadata.dimensionality() {
            return Err(IncompatibleDimensionalityError::new(
                manifest.dimensionality(),
                metadata.dimensionality(),
            )
            .into());
        }
        let metadata_grid_shape = metadata.grid_shape();
        if manifest.grid_shape() != metadata_grid_shape {
            return Err(ArrayCreateError::IncompatibleGridShape {
                manifest_grid_shape: manifest.grid_shape().to_vec(),
                metadata_grid_shape,
            });
        }
        Ok(Self { metadata, manifest })
    }

    /// Create a new virtual array from a decoded reference table.
    ///
    /// Table keys matching the chunk key form (with the separator declared in `metadata`) become
    /// manifest entries; all other keys are skipped. The manifest grid shape is derived from the
    /// metadata.
    ///
    /// # Errors
    /// Returns [`ManifestCreateError`] if a chunk key is out of bounds of the grid implied by
    /// `metadata`, or that grid has a zero extent.
    pub fn from_reference_table(
        metadata: ArrayMetadata,
        entries: impl IntoIterator<Item = (String, VirtualChunkRef)>,
    ) -> Result<Self, ManifestCreateError> {
        let manifest = ChunkManifest::from_reference_table(
            metadata.grid_shape(),
            metadata.dimension_separator,
            entries,
        )?;
        Ok(Self { metadata, manifest })
    }

    /// Construct a merge output whose manifest/metadata pairing was established by the combine
    /// operations. Not validated against the ceiling-division rule: concatenation of inputs with
    /// unequal chunk shapes yields a grid that is correct at the coordinate level but is not
    /// derivable from the output chunk shape.
    pub(crate) fn from_parts(metadata: ArrayMetadata, manifest: ChunkManifest) -> Self {
        Self { metadata, manifest }
    }

    /// The metadata descriptor of the array.
    #[must_use]
    pub fn metadata(&self) -> &ArrayMetadata {
        &self.metadata
    }

    /// The chunk manifest of the array.
    #[must_use]
    pub fn manifest(&self) -> &ChunkManifest {
        &self.manifest
    }

    /// The shape of the array.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.metadata.shape
    }

    /// The data type of the array elements.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.metadata.dtype
    }

    /// The shape of every chunk of the array.
    #[must_use]
    pub fn chunk_shape(&self) -> &ChunkShape {
        &self.metadata.chunks
    }

    /// The codec the chunks of the array are uniformly encoded with.
    #[must_use]
    pub fn codec(&self) -> &Codec {
        &self.metadata.codec
    }

    /// The dimensionality of the array.
    #[must_use]
    pub fn dimensionality(&self) -> usize {
        self.metadata.dimensionality()
    }

    /// The total number of elements of the array.
    ///
    /// Computed in 128-bit arithmetic, so products of large dimensions do not overflow.
    #[must_use]
    pub fn size(&self) -> u128 {
        self.shape().iter().map(|&extent| u128::from(extent)).product()
    }

    /// Materialise the array into a dense in-memory [`ndarray::ArrayD`].
    ///
    /// # Errors
    /// Always fails with [`UnsupportedOperationError::Materialize`]: a manifest holds chunk
    /// addresses, not chunk data, so there is nothing to materialise from.
    #[cfg(feature = "ndarray")]
    pub fn to_ndarray<T>(&self) -> Result<ndarray::ArrayD<T>, UnsupportedOperationError> {
        Err(UnsupportedOperationError::Materialize)
    }

    /// Transpose the array.
    ///
    /// # Errors
    /// Always fails with [`UnsupportedOperationError::Transpose`]: transposition of manifests is
    /// not implemented.
    pub fn transpose(&self) -> Result<Self, UnsupportedOperationError> {
        Err(UnsupportedOperationError::Transpose)
    }

    /// Write the array metadata and chunk references into a store directory.
    ///
    /// # Errors
    /// Always fails with [`UnsupportedOperationError::Write`]: the on-disk chunk manifest format
    /// is not finalised, so no writer is implemented.
    pub fn to_zarr(&self, _store_path: &std::path::Path) -> Result<(), UnsupportedOperationError> {
        Err(UnsupportedOperationError::Write)
    }
}

impl fmt::Display for ManifestArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ManifestArray<shape={:?}, dtype={}, chunks={:?}>",
            self.shape(),
            self.data_type(),
            self.metadata.chunks.to_array_shape(),
        )
    }
}
