//! Rendering helpers (plain text) for human-readable output.

use exifmap_domain::TagStore;
use exifmap_types::PhotoMetadata;
use exifmap_types::report::{FieldInfo, ReportDiagnostic};

/// Width the tag-dump right-aligns tag names to.
pub const TAG_NAME_WIDTH: usize = 40;

pub fn render_metadata_text(md: &PhotoMetadata) -> String {
    let mut out = String::new();
    out.push_str(&format!("Taken on: {}\n", md.date_time.format("%Y-%m-%d")));
    out.push_str(&format!("Camera: {} {}\n", md.manufacturer, md.model));
    out.push_str(&format!(
        "Lens: {} {}\n",
        md.lens_manufacturer, md.lens_model
    ));
    out.push_str(&format!(
        "{}mm (35mm equivalent), f/{} {}s ISO {}\n",
        md.focal_length_mm,
        md.aperture_f_stop.to_decimal_string(1),
        md.shutter_speed.to_fraction_string(),
        md.iso
    ));
    out.push_str(&format!("Resolution: {}x{}\n", md.size_x, md.size_y));
    out
}

/// One line per diagnostic, for stderr or a text report footer.
pub fn render_diagnostics_text(diagnostics: &[ReportDiagnostic]) -> String {
    let mut out = String::new();
    for d in diagnostics {
        match &d.message {
            Some(msg) => out.push_str(&format!(
                "note: {} ({}) left at default: {}\n",
                d.field, d.tag, msg
            )),
            None => out.push_str(&format!(
                "note: {} ({}) left at default: tag not present\n",
                d.field, d.tag
            )),
        }
    }
    out
}

/// Every tag in `store`, sorted by name, as `name: value` with the name right-aligned.
pub fn render_tag_dump(store: &dyn TagStore) -> String {
    let mut out = String::new();
    for name in store.tag_names() {
        // tag_names only lists resolvable tags; skip rather than fail if a store disagrees.
        let Ok(raw) = store.get(&name) else {
            continue;
        };
        out.push_str(&format!(
            "{:>width$}: {}\n",
            name,
            raw.display(),
            width = TAG_NAME_WIDTH
        ));
    }
    out
}

pub fn render_fields_table(fields: &[FieldInfo]) -> String {
    let field_w = column_width("FIELD", fields.iter().map(|f| f.field.as_str()));
    let type_w = column_width("TYPE", fields.iter().map(|f| f.semantic_type.as_str()));

    let mut out = String::new();
    out.push_str(&format!("{:<field_w$}  {:<type_w$}  TAG\n", "FIELD", "TYPE"));
    for f in fields {
        out.push_str(&format!(
            "{:<field_w$}  {:<type_w$}  {}\n",
            f.field,
            f.semantic_type.as_str(),
            f.tag
        ));
    }
    out
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(str::len).fold(header.len(), usize::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use exifmap_domain::{InMemoryTagStore, MemoryTag};
    use exifmap_types::report::DiagnosticKind;
    use exifmap_types::{Rational, SemanticType};
    use pretty_assertions::assert_eq;

    fn camera_x() -> PhotoMetadata {
        PhotoMetadata {
            manufacturer: "Acme".to_string(),
            model: "CameraX".to_string(),
            lens_manufacturer: "Acme".to_string(),
            lens_model: "35mm".to_string(),
            date_time: NaiveDate::from_ymd_opt(2023, 7, 4)
                .and_then(|d| d.and_hms_opt(10, 15, 0))
                .unwrap(),
            focal_length_mm: 35,
            aperture_f_stop: Rational::new(28, 10).unwrap(),
            shutter_speed: Rational::new(1, 200).unwrap(),
            iso: 100,
            size_x: 6000,
            size_y: 4000,
        }
    }

    #[test]
    fn metadata_text_matches_report_layout() {
        let expected = "\
Taken on: 2023-07-04
Camera: Acme CameraX
Lens: Acme 35mm
35mm (35mm equivalent), f/2.8 1/200s ISO 100
Resolution: 6000x4000
";
        assert_eq!(render_metadata_text(&camera_x()), expected);
    }

    #[test]
    fn shutter_is_reduced_and_whole_seconds_drop_the_denominator() {
        let md = PhotoMetadata {
            shutter_speed: Rational::new(20, 10).unwrap(),
            aperture_f_stop: Rational::new(8, 1).unwrap(),
            ..camera_x()
        };
        let text = render_metadata_text(&md);
        assert!(text.contains("f/8.0 2s ISO 100"), "{text}");
    }

    #[test]
    fn default_record_renders_without_panicking() {
        let text = render_metadata_text(&PhotoMetadata::default());
        assert!(text.starts_with("Taken on: 1970-01-01\n"));
        assert!(text.contains("0mm (35mm equivalent), f/0.0 0s ISO 0"));
    }

    #[test]
    fn tag_dump_right_aligns_sorted_names() {
        let store = InMemoryTagStore::new()
            .with_tag("Model", MemoryTag::string("CameraX"))
            .with_tag("FNumber", MemoryTag::rational(28, 10))
            .with_tag("ISOSpeedRatings", MemoryTag::int(100));

        let dump = render_tag_dump(&store);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], format!("{:>40}: {}", "FNumber", "28/10"));
        assert!(lines[1].ends_with("ISOSpeedRatings: 100"));
        assert_eq!(lines[2], format!("{:>40}: \"CameraX\"", "Model"));
        assert!(lines.iter().all(|l| l.find(':') == Some(TAG_NAME_WIDTH)));
    }

    #[test]
    fn empty_store_dumps_nothing() {
        assert_eq!(render_tag_dump(&InMemoryTagStore::new()), "");
    }

    #[test]
    fn fields_table_pads_columns() {
        let fields = vec![
            FieldInfo {
                field: "iso".to_string(),
                semantic_type: SemanticType::Int64,
                tag: "ISOSpeedRatings".to_string(),
            },
            FieldInfo {
                field: "shutter_speed".to_string(),
                semantic_type: SemanticType::Rational,
                tag: "ExposureTime".to_string(),
            },
        ];

        let expected = "\
FIELD          TYPE      TAG
iso            int64     ISOSpeedRatings
shutter_speed  rational  ExposureTime
";
        assert_eq!(render_fields_table(&fields), expected);
    }

    #[test]
    fn diagnostics_text_names_field_and_tag() {
        let diags = vec![
            ReportDiagnostic {
                field: "lens_model".to_string(),
                tag: "LensModel".to_string(),
                kind: DiagnosticKind::TagNotPresent,
                message: None,
            },
            ReportDiagnostic {
                field: "date_time".to_string(),
                tag: "DateTimeOriginal".to_string(),
                kind: DiagnosticKind::MalformedTimestamp,
                message: Some("bad".to_string()),
            },
        ];
        let text = render_diagnostics_text(&diags);
        assert_eq!(
            text,
            "note: lens_model (LensModel) left at default: tag not present\n\
             note: date_time (DateTimeOriginal) left at default: bad\n"
        );
    }
}
