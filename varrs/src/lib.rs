//! `varrs` is a Rust library for *virtual* chunked arrays: array descriptions backed by chunk
//! manifests instead of in-memory data.
//!
//! A chunk manifest records, for every chunk of a logical N-dimensional array, the location,
//! byte offset and byte length of the already-existing bytes that realise that chunk. A
//! [`ManifestArray`](crate::array::ManifestArray) pairs one manifest with one array metadata
//! descriptor (shape, data type, chunk shape, codec) and supports the structural operations
//! [`concatenate`](crate::array::concatenate) and [`stack`](crate::array::stack), which merge
//! manifests by rewriting chunk grid coordinates. N independently-loaded chunked datasets can
//! thereby be treated as one contiguous chunked dataset with zero data movement.
//!
//! `varrs` never performs storage I/O: byte ranges are manipulated as addresses only. Operations
//! that would require chunk data (dense materialisation, transpose, element-wise arithmetic,
//! writing chunks) are refused with explicit error kinds, or deferred to a host framework via
//! the [not handled](crate::array::FunctionOutcome::NotHandled) dispatch signal.
//!
//! ## Example
//! ```rust
//! use varrs::array::{ManifestArray, concatenate};
//! use varrs::manifest::VirtualChunkRef;
//! use varrs::metadata::ArrayMetadata;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metadata: ArrayMetadata = serde_json::from_str(
//!     r#"{
//!         "zarr_format": 2,
//!         "shape": [4, 4],
//!         "chunks": [2, 4],
//!         "dtype": "<f8",
//!         "compressor": {"id": "zlib", "level": 1},
//!         "filters": null,
//!         "fill_value": null,
//!         "order": "C"
//!     }"#,
//! )?;
//!
//! // Wrap a decoded reference table into a virtual array
//! let location = "s3://bucket/a.nc";
//! let array = ManifestArray::from_reference_table(
//!     metadata.clone(),
//!     [
//!         ("0.0".to_string(), VirtualChunkRef::new(location.to_string(), 0, 128)),
//!         ("1.0".to_string(), VirtualChunkRef::new(location.to_string(), 128, 128)),
//!     ],
//! )?;
//! assert_eq!(array.shape(), &[4, 4]);
//! assert_eq!(array.manifest().grid_shape(), &[2, 1]);
//!
//! // Concatenating merges the manifests; no chunk data is read or written
//! let both = concatenate(&[&array, &array], Some(0))?;
//! assert_eq!(both.shape(), &[8, 4]);
//! assert_eq!(both.manifest().grid_shape(), &[4, 1]);
//! assert_eq!(both.manifest().get(&[2, 0]), array.manifest().get(&[0, 0]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Licence
//! `varrs` is licensed under either of
//!  - the Apache License, Version 2.0 [LICENSE-APACHE](https://docs.rs/crate/varrs/latest/source/LICENCE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license [LICENSE-MIT](https://docs.rs/crate/varrs/latest/source/LICENCE-MIT) or <http://opensource.org/licenses/MIT>, at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted for inclusion in the work by you, as defined in the Apache-2.0 license, shall be dual licensed as above, without any additional terms or conditions.

pub mod array;

pub use varrs_manifest as manifest;
pub use varrs_metadata as metadata;
