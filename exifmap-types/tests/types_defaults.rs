use chrono::NaiveDateTime;
use exifmap_types::report::{FieldInfo, FieldListing, MetadataReport};
use exifmap_types::{PhotoMetadata, Rational, SemanticType};
use pretty_assertions::assert_eq;

#[test]
fn photo_metadata_default_is_all_zero_values() {
    let md = PhotoMetadata::default();

    assert!(md.manufacturer.is_empty());
    assert!(md.model.is_empty());
    assert!(md.lens_manufacturer.is_empty());
    assert!(md.lens_model.is_empty());
    assert_eq!(md.date_time, NaiveDateTime::default());
    assert_eq!(md.focal_length_mm, 0);
    assert_eq!(md.aperture_f_stop, Rational::ZERO);
    assert_eq!(md.shutter_speed, Rational::ZERO);
    assert_eq!(md.iso, 0);
    assert_eq!(md.size_x, 0);
    assert_eq!(md.size_y, 0);
}

#[test]
fn metadata_report_new_sets_schema_and_no_diagnostics() {
    let report = MetadataReport::new("photos/a.jpg", PhotoMetadata::default());

    assert_eq!(report.schema, exifmap_types::schema::EXIFMAP_METADATA_V1);
    assert_eq!(report.source, "photos/a.jpg");
    assert!(report.diagnostics.is_empty());
}

#[test]
fn field_listing_new_sets_schema() {
    let listing = FieldListing::new(vec![FieldInfo {
        field: "iso".to_string(),
        semantic_type: SemanticType::Int64,
        tag: "ISOSpeedRatings".to_string(),
    }]);

    assert_eq!(listing.schema, exifmap_types::schema::EXIFMAP_FIELDS_V1);
    assert_eq!(listing.fields.len(), 1);
}
