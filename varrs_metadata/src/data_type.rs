//! NumPy-style data type descriptors.
//!
//! Virtual array metadata identifies element types with NumPy type strings (e.g. `<f8`, `>i4`,
//! `|u1`), as found in the `dtype` field of `.zarray` metadata.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// The endianness of a multi-byte data type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Endianness {
    /// Big endian.
    Big,
    /// Little endian.
    Little,
}

impl Endianness {
    /// Return the endianness of the machine the crate was compiled for.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::Big
        } else {
            Self::Little
        }
    }

    /// Return true if the endianness matches the endianness of the machine the crate was compiled for.
    #[must_use]
    pub fn is_native(self) -> bool {
        self == Self::native()
    }
}

/// The kind of a [`DataType`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum DataTypeKind {
    /// A boolean (`b`).
    Bool,
    /// A signed integer (`i`).
    Int,
    /// An unsigned integer (`u`).
    UInt,
    /// An IEEE floating point number (`f`).
    Float,
    /// A complex number with floating point real and imaginary components (`c`).
    Complex,
    /// Raw bytes (`V`).
    Raw,
}

impl DataTypeKind {
    const fn identifier(self) -> char {
        match self {
            Self::Bool => 'b',
            Self::Int => 'i',
            Self::UInt => 'u',
            Self::Float => 'f',
            Self::Complex => 'c',
            Self::Raw => 'V',
        }
    }
}

/// A portable data type descriptor.
///
/// Parsed from and displayed as a NumPy type string: a byte order character (`<`, `>`, `|`, or
/// `=` for native), a kind character, and the item size in bytes. Single-byte and raw data types
/// carry no byte order, so e.g. `<u1` and `|u1` compare equal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct DataType {
    kind: DataTypeKind,
    item_size: usize,
    endianness: Option<Endianness>,
}

/// An unsupported or malformed data type descriptor.
#[derive(Clone, Debug, Error)]
#[error("unsupported data type descriptor `{_0}`")]
pub struct DataTypeParseError(String);

impl DataType {
    /// The kind of the data type.
    #[must_use]
    pub const fn kind(&self) -> DataTypeKind {
        self.kind
    }

    /// The size in bytes of one element.
    #[must_use]
    pub const fn item_size(&self) -> usize {
        self.item_size
    }

    /// The byte order of the data type, [`None`] for single-byte and raw data types.
    #[must_use]
    pub const fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }
}

impl FromStr for DataType {
    type Err = DataTypeParseError;

    fn from_str(descriptor: &str) -> Result<Self, Self::Err> {
        let err = || DataTypeParseError(descriptor.to_string());
        let mut chars = descriptor.chars();
        let byte_order = chars.next().ok_or_else(err)?;
        let kind = match chars.next().ok_or_else(err)? {
            'b' => DataTypeKind::Bool,
            'i' => DataTypeKind::Int,
            'u' => DataTypeKind::UInt,
            'f' => DataTypeKind::Float,
            'c' => DataTypeKind::Complex,
            'V' => DataTypeKind::Raw,
            _ => return Err(err()),
        };
        let item_size: usize = chars.as_str().parse().map_err(|_| err())?;
        let valid_size = match kind {
            DataTypeKind::Bool => item_size == 1,
            DataTypeKind::Int | DataTypeKind::UInt => matches!(item_size, 1 | 2 | 4 | 8),
            DataTypeKind::Float => matches!(item_size, 2 | 4 | 8),
            DataTypeKind::Complex => matches!(item_size, 8 | 16),
            DataTypeKind::Raw => item_size >= 1,
        };
        if !valid_size {
            return Err(err());
        }
        let endianness = match byte_order {
            '<' => Some(Endianness::Little),
            '>' => Some(Endianness::Big),
            '=' => Some(Endianness::native()),
            '|' => None,
            _ => return Err(err()),
        };
        // byte order is meaningless for single-byte and raw data types
        let endianness = if item_size == 1 || kind == DataTypeKind::Raw {
            None
        } else if endianness.is_none() {
            return Err(err());
        } else {
            endianness
        };
        Ok(Self {
            kind,
            item_size,
            endianness,
        })
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let byte_order = match self.endianness {
            Some(Endianness::Little) => '<',
            Some(Endianness::Big) => '>',
            None => '|',
        };
        write!(f, "{byte_order}{}{}", self.kind.identifier(), self.item_size)
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let descriptor = String::deserialize(deserializer)?;
        descriptor.parse().map_err(D::Error::custom)
    }
}
