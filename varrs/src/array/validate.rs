//! Compatibility validators for combining virtual arrays.
//!
//! Three independent checks gate every merge: equal data types, compatible shapes, and equal
//! codecs. Each is a pure function over a non-empty group, fails with the conflicting values
//! named, and can be re-run with the same result.

use itertools::Itertools;
use thiserror::Error;
use varrs_metadata::{ArrayShape, Codec, DataType};

/// An inconsistent data type error.
#[derive(Clone, Debug, Error)]
#[error("cannot combine arrays with inconsistent data types: {_1} vs {_0}")]
pub struct DataTypeMismatchError(DataType, DataType);

/// An incompatible shape error, naming the shapes of every array in the group.
#[derive(Clone, Debug, Error)]
#[error("cannot combine arrays with shapes {_0:?}")]
pub struct ShapeMismatchError(Vec<ArrayShape>);

/// An inconsistent codec error.
///
/// Arrays encoded with different codecs cannot be referenced by one manifest without re-encoding
/// one of them, which virtual arrays never do.
#[derive(Clone, Debug, Error)]
#[error("cannot combine arrays encoded with different codecs: {_0} vs {_1}")]
pub struct CodecMismatchError(Codec, Codec);

/// Check that all data types equal the first, returning the common data type.
///
/// # Errors
/// Returns [`DataTypeMismatchError`] naming the first conflicting pair.
///
/// # Panics
/// Panics if `data_types` is empty.
pub fn check_same_data_types(data_types: &[DataType]) -> Result<DataType, DataTypeMismatchError> {
    let (first, rest) = data_types
        .split_first()
        .expect("`data_types` must not be empty");
    for other in rest {
        if other != first {
            return Err(DataTypeMismatchError(*first, *other));
        }
    }
    Ok(*first)
}

/// Check that all shapes are equal on every dimension except `axis`.
///
/// # Errors
/// Returns [`ShapeMismatchError`] with the full shape list on any off-axis disagreement,
/// including unequal dimensionalities.
///
/// # Panics
/// Panics if `shapes` is empty.
pub fn check_same_shapes_except_axis(
    shapes: &[&[u64]],
    axis: usize,
) -> Result<(), ShapeMismatchError> {
    let (first, rest) = shapes.split_first().expect("`shapes` must not be empty");
    let compatible = rest.iter().all(|other| {
        other.len() == first.len()
            && std::iter::zip(*first, *other)
                .enumerate()
                .all(|(dim, (a, b))| dim == axis || a == b)
    });
    if compatible {
        Ok(())
    } else {
        Err(ShapeMismatchError(
            shapes.iter().map(|shape| shape.to_vec()).collect(),
        ))
    }
}

/// Check that all shapes are fully equal.
///
/// # Errors
/// Returns [`ShapeMismatchError`] with the full shape list if any shapes differ.
///
/// # Panics
/// Panics if `shapes` is empty.
pub fn check_same_shapes(shapes: &[&[u64]]) -> Result<(), ShapeMismatchError> {
    assert!(!shapes.is_empty(), "`shapes` must not be empty");
    if shapes.iter().all_equal() {
        Ok(())
    } else {
        Err(ShapeMismatchError(
            shapes.iter().map(|shape| shape.to_vec()).collect(),
        ))
    }
}

/// Check that all codecs are structurally equal: compression algorithm, parameters, and filters
/// all included.
///
/// # Errors
/// Returns [`CodecMismatchError`] naming the first conflicting pair.
///
/// # Panics
/// Panics if `codecs` is empty.
pub fn check_same_codecs(codecs: &[&Codec]) -> Result<(), CodecMismatchError> {
    let (first, rest) = codecs.split_first().expect("`codecs` must not be empty");
    for other in rest {
        if other != first {
            return Err(CodecMismatchError((*first).clone(), (*other).clone()));
        }
    }
    Ok(())
}
