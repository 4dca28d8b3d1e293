use crate::rational::Rational;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Photo metadata extracted from a camera's EXIF block.
///
/// Every field starts at its type's default and is written at most once during extraction.
/// A field still at its default either had no tag or (with lenient timestamps) a malformed one;
/// the extraction diagnostics say which.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub manufacturer: String,
    pub model: String,
    pub lens_manufacturer: String,
    pub lens_model: String,

    /// Capture time as recorded by the camera. EXIF carries no zone, so this is naive.
    pub date_time: NaiveDateTime,

    pub focal_length_mm: i64,
    pub aperture_f_stop: Rational,
    /// Exposure time in seconds.
    pub shutter_speed: Rational,
    pub iso: i64,

    pub size_x: i64,
    pub size_y: i64,
}
