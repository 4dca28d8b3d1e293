use crate::encoding::SemanticType;
use crate::metadata::PhotoMetadata;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON envelope the CLI prints for `exifmap show --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataReport {
    pub schema: String,

    /// Path of the photo the metadata came from.
    pub source: String,

    pub metadata: PhotoMetadata,

    /// Non-fatal per-field findings, in schema order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ReportDiagnostic>,

    /// Raw tag dump (name to rendered value), only filled when requested.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl MetadataReport {
    pub fn new(source: impl Into<String>, metadata: PhotoMetadata) -> Self {
        Self {
            schema: crate::schema::EXIFMAP_METADATA_V1.to_string(),
            source: source.into(),
            metadata,
            diagnostics: Vec::new(),
            tags: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportDiagnostic {
    pub field: String,
    pub tag: String,
    pub kind: DiagnosticKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    TagNotPresent,
    MalformedTimestamp,
}

/// JSON envelope for `exifmap fields --format json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldListing {
    pub schema: String,
    pub fields: Vec<FieldInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub field: String,
    pub semantic_type: SemanticType,
    pub tag: String,
}

impl FieldListing {
    pub fn new(fields: Vec<FieldInfo>) -> Self {
        Self {
            schema: crate::schema::EXIFMAP_FIELDS_V1.to_string(),
            fields,
        }
    }
}
