use camino::Utf8Path;
use exif::{In, Reader, Value};
use exifmap_domain::{LookupError, RawTag, TagStore, ValueError};
use exifmap_types::{Encoding, Rational};
use fs_err as fs;
use std::collections::BTreeMap;
use std::io::BufReader;
use thiserror::Error;
use tracing::debug;

/// Tag names accepted on lookup in addition to the names kamadak-exif assigns.
///
/// EXIF 2.3 renamed 0x8827 from ISOSpeedRatings to PhotographicSensitivity; schemas written
/// against the older name still resolve.
pub const TAG_ALIASES: &[(&str, &str)] = &[("ISOSpeedRatings", "PhotographicSensitivity")];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("no EXIF data found")]
    NoExif,

    #[error("EXIF parse error: {message}")]
    Exif { message: String },
}

impl From<exif::Error> for ContainerError {
    fn from(e: exif::Error) -> Self {
        match e {
            exif::Error::NotFound(_) => ContainerError::NoExif,
            exif::Error::Io(io) => ContainerError::Io {
                message: io.to_string(),
            },
            other => ContainerError::Exif {
                message: other.to_string(),
            },
        }
    }
}

/// A single primary-image EXIF field.
#[derive(Debug, Clone)]
pub struct ExifTag {
    value: Value,
    display: String,
}

impl ExifTag {
    fn from_field(field: &exif::Field) -> Self {
        Self {
            value: field.value.clone(),
            display: field.display_value().to_string(),
        }
    }

    fn wrong(&self, requested: Encoding) -> ValueError {
        ValueError::WrongEncoding {
            requested,
            actual: self.encoding(),
        }
    }

    fn out_of_range(&self, index: usize) -> ValueError {
        ValueError::IndexOutOfRange {
            encoding: self.encoding(),
            index,
            count: self.count(),
        }
    }
}

impl RawTag for ExifTag {
    fn encoding(&self) -> Encoding {
        match &self.value {
            Value::Byte(_)
            | Value::Short(_)
            | Value::Long(_)
            | Value::SByte(_)
            | Value::SShort(_)
            | Value::SLong(_) => Encoding::Int,
            Value::Rational(_) | Value::SRational(_) => Encoding::Rational,
            Value::Float(_) | Value::Double(_) => Encoding::Float,
            Value::Ascii(_) => Encoding::String,
            _ => Encoding::Undefined,
        }
    }

    fn count(&self) -> usize {
        match &self.value {
            Value::Byte(v) => v.len(),
            Value::Short(v) => v.len(),
            Value::Long(v) => v.len(),
            Value::SByte(v) => v.len(),
            Value::SShort(v) => v.len(),
            Value::SLong(v) => v.len(),
            Value::Rational(v) => v.len(),
            Value::SRational(v) => v.len(),
            Value::Float(v) => v.len(),
            Value::Double(v) => v.len(),
            Value::Ascii(_) => 1,
            Value::Undefined(bytes, _) => bytes.len(),
            _ => 0,
        }
    }

    fn int64(&self, index: usize) -> Result<i64, ValueError> {
        let v = match &self.value {
            Value::Byte(v) => v.get(index).map(|&x| i64::from(x)),
            Value::Short(v) => v.get(index).map(|&x| i64::from(x)),
            Value::Long(v) => v.get(index).map(|&x| i64::from(x)),
            Value::SByte(v) => v.get(index).map(|&x| i64::from(x)),
            Value::SShort(v) => v.get(index).map(|&x| i64::from(x)),
            Value::SLong(v) => v.get(index).map(|&x| i64::from(x)),
            _ => return Err(self.wrong(Encoding::Int)),
        };
        v.ok_or_else(|| self.out_of_range(index))
    }

    fn float64(&self, index: usize) -> Result<f64, ValueError> {
        let v = match &self.value {
            Value::Float(v) => v.get(index).map(|&x| f64::from(x)),
            Value::Double(v) => v.get(index).copied(),
            _ => return Err(self.wrong(Encoding::Float)),
        };
        v.ok_or_else(|| self.out_of_range(index))
    }

    fn rational(&self, index: usize) -> Result<Rational, ValueError> {
        let (num, den) = match &self.value {
            Value::Rational(v) => v
                .get(index)
                .map(|r| (i64::from(r.num), i64::from(r.denom))),
            Value::SRational(v) => v
                .get(index)
                .map(|r| (i64::from(r.num), i64::from(r.denom))),
            _ => return Err(self.wrong(Encoding::Rational)),
        }
        .ok_or_else(|| self.out_of_range(index))?;
        Ok(Rational::new(num, den)?)
    }

    fn string(&self) -> Result<String, ValueError> {
        match &self.value {
            // Multi-part ASCII values are rare; the first part carries the text.
            Value::Ascii(parts) => match parts.first() {
                Some(bytes) => String::from_utf8(bytes.clone()).map_err(|_| ValueError::InvalidUtf8),
                None => Ok(String::new()),
            },
            _ => Err(self.wrong(Encoding::String)),
        }
    }

    fn display(&self) -> String {
        self.display.clone()
    }
}

/// [`TagStore`] over the primary-image fields of one EXIF container.
#[derive(Debug, Clone, Default)]
pub struct ExifTagStore {
    tags: BTreeMap<String, ExifTag>,
}

impl ExifTagStore {
    /// Reads EXIF from a JPEG, TIFF, PNG, WebP or HEIF file.
    pub fn open(path: &Utf8Path) -> Result<Self, ContainerError> {
        let file = fs::File::open(path).map_err(|e| ContainerError::Io {
            message: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader)?;
        let store = Self::from_exif(&exif);

        debug!(path = %path, fields = store.len(), "loaded EXIF fields");
        Ok(store)
    }

    /// Parses raw EXIF bytes, starting at the TIFF header.
    pub fn from_raw(data: Vec<u8>) -> Result<Self, ContainerError> {
        let exif = Reader::new().read_raw(data)?;
        Ok(Self::from_exif(&exif))
    }

    pub fn from_exif(exif: &exif::Exif) -> Self {
        let mut tags = BTreeMap::new();
        for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
            tags.entry(field.tag.to_string())
                .or_insert_with(|| ExifTag::from_field(field));
        }
        Self { tags }
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    fn resolve<'a>(&self, tag: &'a str) -> &'a str {
        TAG_ALIASES
            .iter()
            .find(|(alias, _)| *alias == tag)
            .map(|(_, canonical)| *canonical)
            .unwrap_or(tag)
    }
}

impl TagStore for ExifTagStore {
    fn get(&self, tag: &str) -> Result<&dyn RawTag, LookupError> {
        let found = self
            .tags
            .get(tag)
            .or_else(|| self.tags.get(self.resolve(tag)));
        match found {
            Some(t) => Ok(t),
            None => Err(LookupError::NotPresent {
                tag: tag.to_string(),
            }),
        }
    }

    fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{Ifd, TiffBuilder, sample_photo, tag};
    use chrono::NaiveDate;
    use exifmap_domain::{ExtractOptions, ExtractionError, TimestampPolicy, extract_photo};
    use pretty_assertions::assert_eq;

    #[test]
    fn raw_tiff_populates_photo_metadata() {
        let store = ExifTagStore::from_raw(sample_photo().build()).unwrap();

        let out = extract_photo(&store, ExtractOptions::default()).unwrap();
        let m = out.record;

        assert_eq!(m.manufacturer, "Acme");
        assert_eq!(m.model, "CameraX");
        assert_eq!(m.lens_manufacturer, "Acme");
        assert_eq!(m.lens_model, "35mm F2");
        assert_eq!(
            m.date_time,
            NaiveDate::from_ymd_opt(2023, 7, 4)
                .and_then(|d| d.and_hms_opt(10, 15, 0))
                .unwrap()
        );
        assert_eq!(m.focal_length_mm, 35);
        assert_eq!(m.aperture_f_stop, Rational::new(28, 10).unwrap());
        assert_eq!(m.shutter_speed, Rational::new(1, 200).unwrap());
        assert_eq!(m.iso, 100);
        assert_eq!(m.size_x, 6000);
        assert_eq!(m.size_y, 4000);
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn iso_resolves_under_both_names() {
        let store = ExifTagStore::from_raw(sample_photo().build()).unwrap();

        let old = store.get("ISOSpeedRatings").unwrap();
        let new = store.get("PhotographicSensitivity").unwrap();

        assert_eq!(old.encoding(), Encoding::Int);
        assert_eq!(old.int64(0).unwrap(), 100);
        assert_eq!(new.int64(0).unwrap(), 100);
        assert!(store.tag_names().contains(&"PhotographicSensitivity".to_string()));
    }

    #[test]
    fn missing_lens_tags_are_reported_absent() {
        let bytes = TiffBuilder::new()
            .ascii(Ifd::Primary, tag::MAKE, "Acme")
            .ascii(Ifd::Primary, tag::MODEL, "CameraX")
            .short(Ifd::Exif, tag::ISO, 200)
            .build();
        let store = ExifTagStore::from_raw(bytes).unwrap();

        let out = extract_photo(&store, ExtractOptions::default()).unwrap();

        assert_eq!(out.record.model, "CameraX");
        assert_eq!(out.record.iso, 200);
        assert!(out.absent_fields().any(|f| f == "lens_model"));
        assert!(out.absent_fields().any(|f| f == "date_time"));
    }

    #[test]
    fn undefined_value_is_a_type_mismatch() {
        let bytes = sample_photo()
            .undefined(Ifd::Exif, tag::FOCAL_LENGTH_35MM, &[0, 1, 2, 3, 4, 5])
            .build();
        let store = ExifTagStore::from_raw(bytes).unwrap();

        let err = extract_photo(&store, ExtractOptions::default()).unwrap_err();

        assert!(matches!(err, ExtractionError::TypeMismatch { .. }));
        assert_eq!(err.field(), Some("focal_length_mm"));
    }

    #[test]
    fn zero_denominator_is_a_value_error() {
        let bytes = sample_photo()
            .rational(Ifd::Exif, tag::EXPOSURE_TIME, 1, 0)
            .build();
        let store = ExifTagStore::from_raw(bytes).unwrap();

        let raw = store.get("ExposureTime").unwrap();
        assert!(matches!(raw.rational(0), Err(ValueError::Rational(_))));

        let err = extract_photo(&store, ExtractOptions::default()).unwrap_err();
        assert_eq!(err.field(), Some("shutter_speed"));
    }

    #[test]
    fn blank_timestamp_is_tolerated_when_lenient() {
        let bytes = sample_photo()
            .ascii(Ifd::Exif, tag::DATE_TIME_ORIGINAL, "    :  :     :  :  ")
            .build();
        let store = ExifTagStore::from_raw(bytes).unwrap();

        assert!(extract_photo(&store, ExtractOptions::default()).is_err());

        let out = extract_photo(
            &store,
            ExtractOptions {
                timestamps: TimestampPolicy::Lenient,
            },
        )
        .unwrap();
        assert_eq!(out.record.model, "CameraX");
        assert_eq!(out.diagnostics.len(), 1);
    }

    #[test]
    fn open_reads_a_tiff_file() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap();
        let path = root.join("shot.tif");
        fs::write(&path, sample_photo().build()).unwrap();

        let store = ExifTagStore::open(&path).unwrap();

        assert_eq!(store.get("Make").unwrap().string().unwrap(), "Acme");
        assert!(store.get("Make").unwrap().display().contains("Acme"));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap();

        let err = ExifTagStore::open(&root.join("nope.jpg")).unwrap_err();

        assert!(matches!(err, ContainerError::Io { .. }));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = ExifTagStore::from_raw(b"definitely not a tiff".to_vec()).unwrap_err();
        assert!(!matches!(err, ContainerError::Io { .. }));
    }

    #[test]
    fn unknown_tag_is_not_present() {
        let store = ExifTagStore::from_raw(sample_photo().build()).unwrap();
        let err = store.get("GPSLatitude").err().expect("lookup fails");
        assert!(err.is_not_present());
    }

    #[test]
    fn tag_names_are_sorted() {
        let store = ExifTagStore::from_raw(sample_photo().build()).unwrap();
        let names = store.tag_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(!store.is_empty());
    }
}
