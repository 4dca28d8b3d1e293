//! Shared DTOs for the exifmap workspace.
//!
//! # Design constraints
//! - `PhotoMetadata` and the report types are serialized by the CLI; be conservative with
//!   breaking changes.
//! - No tag-store or decoding logic lives here; that's `exifmap-domain`.

pub mod encoding;
pub mod metadata;
pub mod rational;
pub mod report;

pub use encoding::{Encoding, SemanticType};
pub use metadata::PhotoMetadata;
pub use rational::{Rational, RationalError};

/// Schema identifiers.
pub mod schema {
    pub const EXIFMAP_METADATA_V1: &str = "exifmap.metadata.v1";
    pub const EXIFMAP_FIELDS_V1: &str = "exifmap.fields.v1";
}
