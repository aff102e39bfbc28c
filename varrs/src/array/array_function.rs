//! Cooperative dispatch of array combining functions.
//!
//! A host array-computation framework does not know which of its functions a [`ManifestArray`]
//! can service. Rather than subclass-style polymorphism, this module keeps a registry of
//! supported functions: [`try_dispatch`] either routes a call to its registered implementation
//! or yields [`FunctionOutcome::NotHandled`], telling the framework to try another
//! implementation path. Not-handled is a signal, never a failure.
//!
//! Only [`CONCATENATE`] and [`RESULT_TYPE`] are registered at this scope. Element-wise
//! arithmetic is deliberately absent: such calls fall through to not-handled.

use std::any::Any;

use super::{CombineError, DataType, ManifestArray, combine};

/// Identifier of the concatenate array function.
pub const CONCATENATE: &str = "concatenate";

/// Identifier of the data type resolution array function.
pub const RESULT_TYPE: &str = "result_type";

/// Arguments to an array combining function.
#[derive(Clone, Copy)]
pub struct FunctionArgs<'a> {
    /// The operands, in call order. Dynamically typed: operands that are not managed by this
    /// crate make the whole call not-handled.
    pub operands: &'a [&'a dyn Any],
    /// The axis argument of functions that take one. `None` is an explicit request to flatten
    /// before joining, which no manifest function implements. Ignored by functions without an
    /// axis.
    pub axis: Option<usize>,
}

/// The outcome of [`try_dispatch`].
#[derive(Debug)]
pub enum FunctionOutcome {
    /// The function was handled and produced a new virtual array.
    Array(ManifestArray),
    /// The function was handled and resolved a data type.
    DataType(DataType),
    /// The function or its operands are not managed by this crate. The caller should fall back
    /// to another implementation path; this is not a failure.
    NotHandled,
}

impl FunctionOutcome {
    /// Return true for [`FunctionOutcome::NotHandled`].
    #[must_use]
    pub const fn is_not_handled(&self) -> bool {
        matches!(self, Self::NotHandled)
    }

    /// Return the produced virtual array, if any.
    #[must_use]
    pub fn into_array(self) -> Option<ManifestArray> {
        match self {
            Self::Array(array) => Some(array),
            Self::DataType(_) | Self::NotHandled => None,
        }
    }
}

/// A registered array function.
pub struct ArrayFunctionPlugin {
    identifier: &'static str,
    handler: fn(&FunctionArgs<'_>) -> Result<FunctionOutcome, CombineError>,
}

inventory::collect!(ArrayFunctionPlugin);

impl ArrayFunctionPlugin {
    /// Create a new array function plugin.
    #[must_use]
    pub const fn new(
        identifier: &'static str,
        handler: fn(&FunctionArgs<'_>) -> Result<FunctionOutcome, CombineError>,
    ) -> Self {
        Self {
            identifier,
            handler,
        }
    }

    /// The identifier of the array function.
    #[must_use]
    pub const fn identifier(&self) -> &'static str {
        self.identifier
    }
}

inventory::submit! {
    ArrayFunctionPlugin::new(CONCATENATE, array_function_concatenate)
}

inventory::submit! {
    ArrayFunctionPlugin::new(RESULT_TYPE, array_function_result_type)
}

/// Dispatch the array function `identifier` over `args`.
///
/// Returns [`FunctionOutcome::NotHandled`] if `identifier` is not a registered function or any
/// operand is not managed by this crate; the caller should then fall back to another
/// implementation path.
///
/// # Errors
/// Returns [`CombineError`] if the function is handled but its inputs are invalid or
/// incompatible.
pub fn try_dispatch(
    identifier: &str,
    args: &FunctionArgs<'_>,
) -> Result<FunctionOutcome, CombineError> {
    for plugin in inventory::iter::<ArrayFunctionPlugin> {
        if plugin.identifier == identifier {
            return (plugin.handler)(args);
        }
    }
    log::debug!("array function `{identifier}` is not registered; deferring to the caller");
    Ok(FunctionOutcome::NotHandled)
}

/// Downcast every operand to a [`ManifestArray`], or [`None`] if any operand is something else.
fn downcast_arrays<'a>(operands: &[&'a dyn Any]) -> Option<Vec<&'a ManifestArray>> {
    operands
        .iter()
        .map(|operand| operand.downcast_ref::<ManifestArray>())
        .collect()
}

fn array_function_concatenate(
    args: &FunctionArgs<'_>,
) -> Result<FunctionOutcome, CombineError> {
    let Some(arrays) = downcast_arrays(args.operands) else {
        return Ok(FunctionOutcome::NotHandled);
    };
    combine::concatenate(&arrays, args.axis).map(FunctionOutcome::Array)
}

fn array_function_result_type(
    args: &FunctionArgs<'_>,
) -> Result<FunctionOutcome, CombineError> {
    // operands are data type-like: virtual arrays or data types
    let mut data_types = Vec::with_capacity(args.operands.len());
    for operand in args.operands {
        if let Some(array) = operand.downcast_ref::<ManifestArray>() {
            data_types.push(array.data_type());
        } else if let Some(data_type) = operand.downcast_ref::<DataType>() {
            data_types.push(*data_type);
        } else {
            return Ok(FunctionOutcome::NotHandled);
        }
    }
    combine::result_type(&data_types).map(FunctionOutcome::DataType)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use varrs_manifest::{ChunkIndices, ChunkManifest, VirtualChunkRef};
    use varrs_metadata::{ArrayMetadata, Codec, FillValueMetadata};

    use super::*;

    fn array(shape: Vec<u64>, location: &str) -> ManifestArray {
        let chunks = shape.clone().try_into().unwrap();
        let metadata = ArrayMetadata::new(
            shape,
            chunks,
            "<f8".parse().unwrap(),
            Codec::default(),
            FillValueMetadata::Null,
        )
        .unwrap();
        let rank = metadata.dimensionality();
        let manifest = ChunkManifest::new(
            vec![1; rank],
            HashMap::from([(
                ChunkIndices::from(vec![0; rank].as_slice()),
                VirtualChunkRef::new(location.to_string(), 0, 256),
            )]),
        )
        .unwrap();
        ManifestArray::new(metadata, manifest).unwrap()
    }

    #[test]
    fn dispatch_concatenate() {
        let a = array(vec![3, 4], "a.nc");
        let b = array(vec![5, 4], "b.nc");
        let args = FunctionArgs {
            operands: &[&a, &b],
            axis: Some(0),
        };
        let outcome = try_dispatch(CONCATENATE, &args).unwrap();
        let combined = outcome.into_array().unwrap();
        assert_eq!(combined.shape(), &[8, 4]);
    }

    #[test]
    fn dispatch_result_type() {
        let a = array(vec![2, 2], "a.nc");
        let float64: DataType = "<f8".parse().unwrap();
        let args = FunctionArgs {
            operands: &[&a, &float64],
            axis: None,
        };
        let outcome = try_dispatch(RESULT_TYPE, &args).unwrap();
        assert!(matches!(outcome, FunctionOutcome::DataType(data_type) if data_type == float64));
    }

    #[test]
    fn dispatch_unregistered_function_not_handled() {
        let a = array(vec![2, 2], "a.nc");
        let args = FunctionArgs {
            operands: &[&a],
            axis: None,
        };
        // element-wise arithmetic is never registered
        let outcome = try_dispatch("add", &args).unwrap();
        assert!(outcome.is_not_handled());
    }

    #[test]
    fn dispatch_foreign_operand_not_handled() {
        let a = array(vec![2, 2], "a.nc");
        let dense = vec![1.0f64, 2.0, 3.0, 4.0];
        let args = FunctionArgs {
            operands: &[&a, &dense],
            axis: Some(0),
        };
        let outcome = try_dispatch(CONCATENATE, &args).unwrap();
        assert!(outcome.is_not_handled());
    }

    #[test]
    fn dispatch_handled_error_is_not_not_handled() {
        let a = array(vec![3, 4], "a.nc");
        let b = array(vec![3, 5], "b.nc");
        let args = FunctionArgs {
            operands: &[&a, &b],
            axis: Some(0),
        };
        // both operands are manifest arrays, so the function is handled and fails
        assert!(try_dispatch(CONCATENATE, &args).is_err());
    }
}
