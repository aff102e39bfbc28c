use thiserror::Error;
use varrs_manifest::ManifestMergeError;
use varrs_metadata::{ArrayShape, IncompatibleDimensionalityError};

use super::validate::{CodecMismatchError, DataTypeMismatchError, ShapeMismatchError};

/// A virtual array creation error.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ArrayCreateError {
    /// The metadata and manifest dimensionalities differ.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// The manifest grid shape does not match the grid shape implied by the metadata.
    #[error(
        "manifest grid shape {manifest_grid_shape:?} does not match the grid shape {metadata_grid_shape:?} implied by the array metadata"
    )]
    IncompatibleGridShape {
        /// The grid shape of the manifest.
        manifest_grid_shape: ArrayShape,
        /// The grid shape implied by the array metadata.
        metadata_grid_shape: ArrayShape,
    },
}

/// An error combining virtual arrays.
///
/// Incompatibilities are detected eagerly, before any output manifest is allocated; the inputs
/// are never left in a partially-merged state.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum CombineError {
    /// No arrays were supplied.
    #[error("cannot combine an empty list of arrays")]
    EmptyInput,
    /// Concatenation with `axis: None` was requested.
    #[error(
        "concatenation without an axis requires flattening the inputs, which is a reshape; a reshape cannot be represented by a chunk manifest"
    )]
    FlattenUnsupported,
    /// The arrays have inconsistent data types.
    #[error(transparent)]
    DataTypeMismatch(#[from] DataTypeMismatchError),
    /// The arrays have incompatible shapes.
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),
    /// The arrays are encoded with different codecs.
    #[error(transparent)]
    CodecMismatch(#[from] CodecMismatchError),
    /// The manifest merge failed.
    #[error(transparent)]
    ManifestMerge(#[from] ManifestMergeError),
    /// A derived metadata descriptor had the wrong dimensionality.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
}

/// An operation a virtual array permanently does not support.
///
/// These are refusals by design, not invalid inputs: retrying cannot succeed. Each unsupported
/// capability is a distinct kind so that callers can branch on it.
#[derive(Clone, Copy, Debug, Error)]
#[non_exhaustive]
pub enum UnsupportedOperationError {
    /// Dense materialisation: a manifest holds chunk addresses, not chunk data.
    #[error("a manifest array cannot be materialised into an in-memory array")]
    Materialize,
    /// Transposition of manifests is not implemented.
    #[error("transpose is not implemented for manifest arrays")]
    Transpose,
    /// Writing chunk references to a store: the on-disk chunk manifest format is not finalised.
    #[error("writing a manifest array is not supported until the chunk manifest storage format is finalised")]
    Write,
}
