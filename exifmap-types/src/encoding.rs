use serde::{Deserialize, Serialize};
use std::fmt;

/// How a raw tag's values are laid out in the tag store, before any conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Signed or unsigned integers of any width.
    Int,
    /// Single or double precision floats.
    Float,
    /// Signed or unsigned numerator/denominator pairs.
    Rational,
    /// ASCII text.
    String,
    /// Opaque bytes or a format the store does not understand.
    Undefined,
}

impl Encoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Int => "int",
            Encoding::Float => "float",
            Encoding::Rational => "rational",
            Encoding::String => "string",
            Encoding::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The type a destination field wants, independent of how the tag is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Int64,
    Float64,
    String,
    Timestamp,
    Rational,
}

impl SemanticType {
    pub fn as_str(self) -> &'static str {
        match self {
            SemanticType::Int64 => "int64",
            SemanticType::Float64 => "float64",
            SemanticType::String => "string",
            SemanticType::Timestamp => "timestamp",
            SemanticType::Rational => "rational",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
