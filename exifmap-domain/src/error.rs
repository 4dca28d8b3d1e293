//! Error types for exifmap-domain.
//!
//! Absent tags are not errors; they become [`Diagnostic`](crate::Diagnostic)s. Everything here
//! aborts the extraction call it came from.

use crate::ports::ValueError;
use crate::schema::SchemaError;
use exifmap_types::{Encoding, SemanticType};
use thiserror::Error;

/// Fatal failure of one extraction call.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The tag is stored in an encoding the field's semantic type does not accept.
    #[error("field {field} (tag {tag}): declared {declared} but tag is stored as {actual}")]
    TypeMismatch {
        field: String,
        tag: String,
        declared: SemanticType,
        actual: Encoding,
    },

    /// The encoding was acceptable but the value could not be converted.
    #[error("field {field} (tag {tag}): cannot convert to {declared}")]
    ConversionFailed {
        field: String,
        tag: String,
        declared: SemanticType,
        #[source]
        cause: ConversionError,
    },

    /// The tag store failed for a reason other than absence.
    #[error("field {field} (tag {tag}): tag store error: {message}")]
    StoreError {
        field: String,
        tag: String,
        message: String,
    },

    /// The schema itself is inconsistent; no tag was read.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
}

impl ExtractionError {
    /// Destination field the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ExtractionError::TypeMismatch { field, .. }
            | ExtractionError::ConversionFailed { field, .. }
            | ExtractionError::StoreError { field, .. } => Some(field),
            ExtractionError::Schema(_) => None,
        }
    }

    /// Returns the recommended exit code for this error.
    ///
    /// Bad input is 1; a broken schema is a programming error and gets 2.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExtractionError::Schema(_) => 2,
            _ => 1,
        }
    }
}

/// Why a value of an accepted encoding could not become the field's type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("timestamp {raw:?} does not match layout YYYY:MM:DD hh:mm:ss: {reason}")]
    Timestamp {
        raw: String,
        reason: TimestampFault,
    },
}

/// What was wrong with a timestamp string.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampFault {
    #[error("fields are not fixed-width digits separated by ':' and ' '")]
    Shape,

    #[error("second 60 is not accepted")]
    LeapSecond,

    #[error(transparent)]
    Chrono(#[from] chrono::ParseError),
}
