use crate::decode::{DecodeError, decode_into};
use crate::error::{ConversionError, ExtractionError};
use crate::ports::{LookupError, TagStore};
use crate::schema::{FieldDescriptor, Schema};
use exifmap_types::SemanticType;
use exifmap_types::report::{DiagnosticKind, ReportDiagnostic};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// What to do with a timestamp tag that is present but does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampPolicy {
    /// Fail the extraction with `ConversionFailed`.
    #[default]
    Strict,
    /// Leave the field at its default and record a diagnostic, the way absence is handled.
    Lenient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub timestamps: TimestampPolicy,
}

/// Non-fatal per-field finding.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    TagNotPresent {
        field: &'static str,
        tag: &'static str,
    },
    MalformedTimestamp {
        field: &'static str,
        tag: &'static str,
        cause: ConversionError,
    },
}

impl Diagnostic {
    pub fn field(&self) -> &'static str {
        match self {
            Diagnostic::TagNotPresent { field, .. } | Diagnostic::MalformedTimestamp { field, .. } => {
                *field
            }
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Diagnostic::TagNotPresent { tag, .. } | Diagnostic::MalformedTimestamp { tag, .. } => {
                *tag
            }
        }
    }

    pub fn to_report(&self) -> ReportDiagnostic {
        let (kind, message) = match self {
            Diagnostic::TagNotPresent { .. } => (DiagnosticKind::TagNotPresent, None),
            Diagnostic::MalformedTimestamp { cause, .. } => {
                (DiagnosticKind::MalformedTimestamp, Some(cause.to_string()))
            }
        };
        ReportDiagnostic {
            field: self.field().to_string(),
            tag: self.tag().to_string(),
            kind,
            message,
        }
    }
}

/// A populated record plus the diagnostics collected while filling it, in schema order.
#[derive(Debug, Clone)]
pub struct Extraction<R> {
    pub record: R,
    pub diagnostics: Vec<Diagnostic>,
}

impl<R> Extraction<R> {
    pub fn absent_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::TagNotPresent { field, .. } => Some(*field),
            Diagnostic::MalformedTimestamp { .. } => None,
        })
    }
}

/// Drives a schema against a tag store.
///
/// Holds no state besides its options, so one extractor can serve any number of stores,
/// concurrently or not.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractOptions,
}

impl Extractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Fills a fresh `R` from `store`, one schema field at a time.
    ///
    /// Absent tags (and, with [`TimestampPolicy::Lenient`], malformed timestamps) leave the
    /// field at its default. The first other failure aborts and no record is returned.
    pub fn extract<R: Default>(
        &self,
        schema: &Schema<R>,
        store: &dyn TagStore,
    ) -> Result<Extraction<R>, ExtractionError> {
        let mut record = R::default();
        let mut diagnostics = Vec::new();

        for fd in schema.fields() {
            if let Some(diag) = self.fill(fd, store, &mut record)? {
                diagnostics.push(diag);
            }
        }

        debug!(
            fields = schema.len(),
            defaulted = diagnostics.len(),
            "extraction complete"
        );
        Ok(Extraction {
            record,
            diagnostics,
        })
    }

    fn fill<R>(
        &self,
        fd: &FieldDescriptor<R>,
        store: &dyn TagStore,
        record: &mut R,
    ) -> Result<Option<Diagnostic>, ExtractionError> {
        let raw = match store.get(fd.tag()) {
            Ok(raw) => raw,
            Err(LookupError::NotPresent { .. }) => {
                info!(
                    field = fd.field(),
                    tag = fd.tag(),
                    "tag not present, leaving field at default"
                );
                return Ok(Some(Diagnostic::TagNotPresent {
                    field: fd.field(),
                    tag: fd.tag(),
                }));
            }
            Err(LookupError::Store { message, .. }) => {
                return Err(ExtractionError::StoreError {
                    field: fd.field().to_string(),
                    tag: fd.tag().to_string(),
                    message,
                });
            }
        };

        match decode_into(fd.slot(), raw, record) {
            Ok(()) => {
                debug!(
                    field = fd.field(),
                    tag = fd.tag(),
                    semantic_type = %fd.semantic_type(),
                    "field decoded"
                );
                Ok(None)
            }
            Err(DecodeError::Mismatch { actual }) => Err(ExtractionError::TypeMismatch {
                field: fd.field().to_string(),
                tag: fd.tag().to_string(),
                declared: fd.semantic_type(),
                actual,
            }),
            Err(DecodeError::Conversion(cause))
                if fd.semantic_type() == SemanticType::Timestamp
                    && self.options.timestamps == TimestampPolicy::Lenient =>
            {
                info!(
                    field = fd.field(),
                    tag = fd.tag(),
                    error = %cause,
                    "malformed timestamp, leaving field at default"
                );
                Ok(Some(Diagnostic::MalformedTimestamp {
                    field: fd.field(),
                    tag: fd.tag(),
                    cause,
                }))
            }
            Err(DecodeError::Conversion(cause)) => Err(ExtractionError::ConversionFailed {
                field: fd.field().to_string(),
                tag: fd.tag().to_string(),
                declared: fd.semantic_type(),
                cause,
            }),
        }
    }
}

/// Extracts with default (strict) options and drops the diagnostics.
pub fn extract<R: Default>(
    schema: &Schema<R>,
    store: &dyn TagStore,
) -> Result<R, ExtractionError> {
    Extractor::default()
        .extract(schema, store)
        .map(|e| e.record)
}

/// Like [`extract`], but keeps the per-field diagnostics and honours `options`.
pub fn extract_with_diagnostics<R: Default>(
    schema: &Schema<R>,
    store: &dyn TagStore,
    options: ExtractOptions,
) -> Result<Extraction<R>, ExtractionError> {
    Extractor::new(options).extract(schema, store)
}
