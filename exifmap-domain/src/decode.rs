//! Typed decode/convert dispatch.
//!
//! Each semantic type accepts exactly one storage encoding:
//!
//! | semantic type | encoding | rule |
//! |---|---|---|
//! | int64 | int | first value |
//! | float64 | float | first value |
//! | string | string | whole value |
//! | timestamp | string | parsed with [`EXIF_TIME_LAYOUT`] |
//! | rational | rational | first value |
//!
//! Anything else is a [`DecodeError::Mismatch`].

use crate::error::{ConversionError, TimestampFault};
use crate::ports::RawTag;
use crate::schema::Slot;
use chrono::{NaiveDateTime, Timelike};
use exifmap_types::{Encoding, Rational, SemanticType};
use thiserror::Error;

/// `chrono` format for EXIF date/time strings, i.e. `YYYY:MM:DD hh:mm:ss`.
pub const EXIF_TIME_LAYOUT: &str = "%Y:%m:%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("tag is stored as {actual}")]
    Mismatch { actual: Encoding },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// The one storage encoding each semantic type accepts.
pub fn accepted_encoding(semantic: SemanticType) -> Encoding {
    match semantic {
        SemanticType::Int64 => Encoding::Int,
        SemanticType::Float64 => Encoding::Float,
        SemanticType::String | SemanticType::Timestamp => Encoding::String,
        SemanticType::Rational => Encoding::Rational,
    }
}

fn require(raw: &dyn RawTag, semantic: SemanticType) -> Result<(), DecodeError> {
    let actual = raw.encoding();
    if actual == accepted_encoding(semantic) {
        Ok(())
    } else {
        Err(DecodeError::Mismatch { actual })
    }
}

pub fn decode_int64(raw: &dyn RawTag) -> Result<i64, DecodeError> {
    require(raw, SemanticType::Int64)?;
    Ok(raw.int64(0).map_err(ConversionError::from)?)
}

pub fn decode_float64(raw: &dyn RawTag) -> Result<f64, DecodeError> {
    require(raw, SemanticType::Float64)?;
    Ok(raw.float64(0).map_err(ConversionError::from)?)
}

pub fn decode_string(raw: &dyn RawTag) -> Result<String, DecodeError> {
    require(raw, SemanticType::String)?;
    Ok(raw.string().map_err(ConversionError::from)?)
}

pub fn decode_timestamp(raw: &dyn RawTag) -> Result<NaiveDateTime, DecodeError> {
    require(raw, SemanticType::Timestamp)?;
    let s = raw.string().map_err(ConversionError::from)?;
    Ok(parse_exif_timestamp(&s)?)
}

pub fn decode_rational(raw: &dyn RawTag) -> Result<Rational, DecodeError> {
    require(raw, SemanticType::Rational)?;
    Ok(raw.rational(0).map_err(ConversionError::from)?)
}

/// Parses `YYYY:MM:DD hh:mm:ss`. Trailing NUL padding from fixed-width EXIF fields is ignored;
/// anything else that deviates from the layout is an error.
pub fn parse_exif_timestamp(s: &str) -> Result<NaiveDateTime, ConversionError> {
    let trimmed = s.trim_end_matches('\0');
    parse_exact(trimmed).map_err(|reason| ConversionError::Timestamp {
        raw: trimmed.to_string(),
        reason,
    })
}

fn parse_exact(s: &str) -> Result<NaiveDateTime, TimestampFault> {
    if !has_exif_shape(s.as_bytes()) {
        return Err(TimestampFault::Shape);
    }
    let ts = NaiveDateTime::parse_from_str(s, EXIF_TIME_LAYOUT)?;
    if ts.second() >= 60 || ts.nanosecond() >= 1_000_000_000 {
        return Err(TimestampFault::LeapSecond);
    }
    Ok(ts)
}

fn has_exif_shape(b: &[u8]) -> bool {
    b.len() == 19
        && b.iter().enumerate().all(|(i, &c)| match i {
            4 | 7 | 13 | 16 => c == b':',
            10 => c == b' ',
            _ => c.is_ascii_digit(),
        })
}

/// Decodes `raw` according to `slot`'s semantic type and writes it into `record`.
///
/// The record is only touched once the value has been fully decoded.
pub fn decode_into<R>(slot: Slot<R>, raw: &dyn RawTag, record: &mut R) -> Result<(), DecodeError> {
    match slot {
        Slot::Int64(at) => {
            let v = decode_int64(raw)?;
            *at(record) = v;
        }
        Slot::Float64(at) => {
            let v = decode_float64(raw)?;
            *at(record) = v;
        }
        Slot::String(at) => {
            let v = decode_string(raw)?;
            *at(record) = v;
        }
        Slot::Timestamp(at) => {
            let v = decode_timestamp(raw)?;
            *at(record) = v;
        }
        Slot::Rational(at) => {
            let v = decode_rational(raw)?;
            *at(record) = v;
        }
    }
    Ok(())
}
