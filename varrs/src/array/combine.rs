//! Structural combining operations on virtual arrays.
//!
//! These merge the chunk manifests of their inputs; chunk data is never read, written, or
//! re-encoded. Correct coordinate offsetting is what lets independently-loaded chunked datasets
//! be treated, virtually, as one contiguous chunked dataset.

use std::num::NonZeroU64;

use varrs_manifest::ChunkManifest;
use varrs_metadata::{ArrayMetadata, DataType};

use super::validate::{
    check_same_codecs, check_same_data_types, check_same_shapes, check_same_shapes_except_axis,
};
use super::{CombineError, ManifestArray, ManifestMergeError};

/// Concatenate `arrays` end-to-end along the existing dimension `axis`.
///
/// All arrays must share a data type, a codec, and equal shapes on every dimension except
/// `axis`. The output shape sums the inputs along `axis`; the output metadata otherwise copies
/// the first array's. Inputs are read-only and remain valid.
///
/// `axis` is a zero-based index; callers holding a negative (end-relative) axis must normalise
/// it to `dimensionality + axis` beforehand. `None` requests flattening the inputs before
/// joining, which is a reshape and is always refused.
///
/// # Errors
/// Returns [`CombineError`] if `arrays` is empty, `axis` is `None` or out of bounds, or any
/// compatibility validator fails. All checks run before any output is allocated.
pub fn concatenate(
    arrays: &[&ManifestArray],
    axis: Option<usize>,
) -> Result<ManifestArray, CombineError> {
    let Some(axis) = axis else {
        return Err(CombineError::FlattenUnsupported);
    };
    let (first, _) = arrays.split_first().ok_or(CombineError::EmptyInput)?;
    let dimensionality = first.dimensionality();
    if axis >= dimensionality {
        return Err(ManifestMergeError::AxisOutOfBounds {
            axis,
            dimensionality,
        }
        .into());
    }

    let data_types: Vec<DataType> = arrays.iter().map(|array| array.data_type()).collect();
    check_same_data_types(&data_types)?;
    let shapes: Vec<&[u64]> = arrays.iter().map(|array| array.shape()).collect();
    check_same_shapes_except_axis(&shapes, axis)?;
    let codecs: Vec<_> = arrays.iter().map(|array| array.codec()).collect();
    check_same_codecs(&codecs)?;

    let mut shape = first.shape().to_vec();
    shape[axis] = shapes.iter().map(|shape| shape[axis]).sum();

    let manifests: Vec<&ChunkManifest> = arrays.iter().map(|array| array.manifest()).collect();
    let manifest = ChunkManifest::concatenate(&manifests, axis)?;
    let metadata = first.metadata().with_shape(shape)?;
    Ok(ManifestArray::from_parts(metadata, manifest))
}

/// Stack `arrays` along a new dimension inserted at `axis`.
///
/// All arrays must share a data type, a codec, and fully equal shapes. The output gains a
/// dimension of extent `arrays.len()` at `axis` (chunked with extent 1); the output metadata
/// otherwise copies the first array's. Inputs are read-only and remain valid.
///
/// `axis` is a zero-based index and may equal the input dimensionality to append a trailing
/// dimension; callers holding a negative (end-relative) axis must normalise it beforehand.
///
/// # Errors
/// Returns [`CombineError`] if `arrays` is empty, `axis` is out of bounds, or any compatibility
/// validator fails. All checks run before any output is allocated.
///
/// # Panics
/// Panics if the number of arrays exceeds [`u64::MAX`].
pub fn stack(arrays: &[&ManifestArray], axis: usize) -> Result<ManifestArray, CombineError> {
    let (first, _) = arrays.split_first().ok_or(CombineError::EmptyInput)?;
    let dimensionality = first.dimensionality();
    if axis > dimensionality {
        return Err(ManifestMergeError::AxisOutOfBounds {
            axis,
            dimensionality: dimensionality + 1,
        }
        .into());
    }

    let data_types: Vec<DataType> = arrays.iter().map(|array| array.data_type()).collect();
    check_same_data_types(&data_types)?;
    let shapes: Vec<&[u64]> = arrays.iter().map(|array| array.shape()).collect();
    check_same_shapes(&shapes)?;
    let codecs: Vec<_> = arrays.iter().map(|array| array.codec()).collect();
    check_same_codecs(&codecs)?;

    let manifests: Vec<&ChunkManifest> = arrays.iter().map(|array| array.manifest()).collect();
    let manifest = ChunkManifest::stack(&manifests, axis)?;

    let mut shape = first.shape().to_vec();
    shape.insert(axis, u64::try_from(arrays.len()).unwrap());
    let mut chunks = first.chunk_shape().as_slice().to_vec();
    chunks.insert(axis, NonZeroU64::MIN);
    let metadata = ArrayMetadata {
        shape,
        chunks: chunks.into(),
        ..first.metadata().clone()
    };
    Ok(ManifestArray::from_parts(metadata, manifest))
}

/// Resolve the common data type of a group of data types.
///
/// Virtual arrays support no type promotion: the data types must all be equal.
///
/// # Errors
/// Returns [`CombineError`] if `data_types` is empty or the data types are not all equal.
pub fn result_type(data_types: &[DataType]) -> Result<DataType, CombineError> {
    if data_types.is_empty() {
        return Err(CombineError::EmptyInput);
    }
    Ok(check_same_data_types(data_types)?)
}
