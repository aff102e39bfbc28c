//! Encoding metadata.
//!
//! Chunks of one virtual array are uniformly encoded. The encoding is described by a [`Codec`]:
//! an optional numcodecs-style compressor plus an optional list of filters, as found in `.zarray`
//! metadata. Codecs are opaque to this crate but structurally comparable, which is what the
//! combine operations need: arrays can share a manifest only if their codecs are equal.

use std::fmt;
use std::sync::Arc;

use derive_more::{Deref, From};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Generic configuration metadata: all fields of a codec excluding its `id`.
#[derive(Serialize, Deserialize, Clone, Default, Eq, PartialEq, Debug, Deref, From)]
#[serde(transparent)]
pub struct Configuration(serde_json::Map<String, serde_json::Value>);

impl Configuration {
    /// Try and convert the configuration to a specific serializable configuration.
    ///
    /// # Errors
    /// Returns a [`serde_json`] error if the configuration cannot be converted.
    pub fn to_typed<TConfiguration: DeserializeOwned>(
        &self,
    ) -> Result<TConfiguration, Arc<serde_json::Error>> {
        serde_json::from_value(serde_json::Value::Object(self.0.clone())).map_err(Arc::new)
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Numcodecs-style codec metadata with an `id` and flattened configuration.
///
/// For example:
/// ```json
/// {
///     "id": "blosc",
///     "cname": "lz4",
///     "clevel": 5,
///     "shuffle": 1
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug)]
pub struct CodecMetadata {
    id: String,
    #[serde(flatten)]
    configuration: Configuration,
}

impl CodecMetadata {
    /// Create codec metadata with an empty configuration.
    #[must_use]
    pub fn new(id: String) -> Self {
        Self {
            id,
            configuration: Configuration::default(),
        }
    }

    /// Create codec metadata with a configuration.
    #[must_use]
    pub fn new_with_configuration(id: String, configuration: Configuration) -> Self {
        Self { id, configuration }
    }

    /// Return the value of the `id` field.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Return the configuration, which includes all fields excluding the `id`.
    #[must_use]
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Try and convert [`Configuration`] to a specific serializable configuration.
    ///
    /// # Errors
    /// Returns a [`serde_json`] error if the metadata cannot be converted.
    pub fn to_typed_configuration<TConfiguration: DeserializeOwned>(
        &self,
    ) -> Result<TConfiguration, Arc<serde_json::Error>> {
        self.configuration.to_typed()
    }
}

impl fmt::Display for CodecMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.configuration)
    }
}

/// The encoding descriptor of a virtual array: a compressor and a list of filters.
///
/// Equality is structural over the compressor and every filter, configurations included. Two
/// differently encoded chunk sets cannot be referenced from one manifest without re-encoding,
/// which virtual arrays never do.
#[derive(Serialize, Deserialize, Clone, Default, Eq, PartialEq, Debug)]
pub struct Codec {
    compressor: Option<CodecMetadata>,
    filters: Option<Vec<CodecMetadata>>,
}

impl Codec {
    /// Create a new codec from a compressor and filters.
    #[must_use]
    pub fn new(compressor: Option<CodecMetadata>, filters: Option<Vec<CodecMetadata>>) -> Self {
        Self {
            compressor,
            filters,
        }
    }

    /// Return the compressor metadata, if any.
    #[must_use]
    pub fn compressor(&self) -> Option<&CodecMetadata> {
        self.compressor.as_ref()
    }

    /// Return the filter metadata, if any.
    #[must_use]
    pub fn filters(&self) -> Option<&[CodecMetadata]> {
        self.filters.as_deref()
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codec_metadata() {
        let metadata: CodecMetadata =
            serde_json::from_str(r#"{"id":"blosc","cname":"lz4","clevel":5,"shuffle":1}"#).unwrap();
        assert_eq!(metadata.id(), "blosc");
        assert_eq!(metadata.configuration().len(), 3);
        assert_eq!(
            metadata.to_string(),
            r#"blosc {"cname":"lz4","clevel":5,"shuffle":1}"#
        );

        #[derive(Deserialize)]
        struct BloscConfiguration {
            cname: String,
            clevel: u32,
        }
        let configuration: BloscConfiguration = metadata.to_typed_configuration().unwrap();
        assert_eq!(configuration.cname, "lz4");
        assert_eq!(configuration.clevel, 5);
    }

    #[test]
    fn codec_equality() {
        let zlib_1: Codec = serde_json::from_str(
            r#"{"compressor":{"id":"zlib","level":1},"filters":null}"#,
        )
        .unwrap();
        let zlib_1_again: Codec = serde_json::from_str(
            r#"{"compressor":{"id":"zlib","level":1},"filters":null}"#,
        )
        .unwrap();
        let zlib_9: Codec = serde_json::from_str(
            r#"{"compressor":{"id":"zlib","level":9},"filters":null}"#,
        )
        .unwrap();
        assert_eq!(zlib_1, zlib_1_again);
        assert_ne!(zlib_1, zlib_9);
        assert_ne!(zlib_1, Codec::default());
    }

    #[test]
    fn codec_filters() {
        let codec: Codec = serde_json::from_str(
            r#"{"compressor":null,"filters":[{"id":"delta","dtype":"<f8"}]}"#,
        )
        .unwrap();
        assert!(codec.compressor().is_none());
        let filters = codec.filters().unwrap();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].id(), "delta");
    }
}
