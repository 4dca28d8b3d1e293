//! The built-in schema for [`PhotoMetadata`].

use crate::error::ExtractionError;
use crate::extract::{ExtractOptions, Extraction, Extractor};
use crate::ports::TagStore;
use crate::schema::{Schema, SchemaError};
use exifmap_types::PhotoMetadata;
use std::sync::LazyLock;

static PHOTO_SCHEMA: LazyLock<Result<Schema<PhotoMetadata>, SchemaError>> =
    LazyLock::new(build_photo_schema);

fn build_photo_schema() -> Result<Schema<PhotoMetadata>, SchemaError> {
    Schema::<PhotoMetadata>::builder()
        .string("manufacturer", "Make", |m| &mut m.manufacturer)
        .string("model", "Model", |m| &mut m.model)
        .string("lens_manufacturer", "LensMake", |m| &mut m.lens_manufacturer)
        .string("lens_model", "LensModel", |m| &mut m.lens_model)
        .timestamp("date_time", "DateTimeOriginal", |m| &mut m.date_time)
        .int64("focal_length_mm", "FocalLengthIn35mmFilm", |m| {
            &mut m.focal_length_mm
        })
        .rational("aperture_f_stop", "FNumber", |m| &mut m.aperture_f_stop)
        .rational("shutter_speed", "ExposureTime", |m| &mut m.shutter_speed)
        .int64("iso", "ISOSpeedRatings", |m| &mut m.iso)
        .int64("size_x", "PixelXDimension", |m| &mut m.size_x)
        .int64("size_y", "PixelYDimension", |m| &mut m.size_y)
        .build()
}

/// Process-wide schema for [`PhotoMetadata`], built on first use.
pub fn photo_schema() -> Result<&'static Schema<PhotoMetadata>, SchemaError> {
    PHOTO_SCHEMA.as_ref().map_err(Clone::clone)
}

pub fn extract_photo(
    store: &dyn TagStore,
    options: ExtractOptions,
) -> Result<Extraction<PhotoMetadata>, ExtractionError> {
    let schema = photo_schema()?;
    Extractor::new(options).extract(schema, store)
}
