//! Domain logic: turn a raw tag store into a typed metadata record.
//!
//! This crate owns *what* each destination field means and how a stored tag becomes a value of
//! that field's type. It does not own *where* tags come from; that's the [`TagStore`] port, with a
//! container-backed implementation in `exifmap-container`.
//!
//! # Flow
//!
//! - A [`Schema`] lists one [`FieldDescriptor`] per destination field: the field name, the source
//!   tag name and a typed accessor into the record.
//! - [`Extractor`] walks the schema in order, looks each tag up in the store and decodes it
//!   through the typed dispatch in [`decode`].
//! - An absent tag leaves the field at its default and produces a [`Diagnostic`]; every other
//!   failure aborts with an [`ExtractionError`].

pub mod decode;
mod error;
mod extract;
mod photo;
mod ports;
mod schema;

pub use decode::EXIF_TIME_LAYOUT;
pub use error::{ConversionError, ExtractionError, TimestampFault};
pub use extract::{
    Diagnostic, ExtractOptions, Extraction, Extractor, TimestampPolicy, extract,
    extract_with_diagnostics,
};
pub use photo::{extract_photo, photo_schema};
pub use ports::{InMemoryTagStore, LookupError, MemoryTag, RawTag, TagStore, ValueError};
pub use schema::{FieldDescriptor, FieldRef, Schema, SchemaBuilder, SchemaError, Slot};
