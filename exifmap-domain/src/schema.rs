use chrono::NaiveDateTime;
use exifmap_types::report::FieldInfo;
use exifmap_types::{Rational, SemanticType};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Typed accessor from a record to one of its fields.
pub type FieldRef<R, T> = fn(&mut R) -> &mut T;

/// Where a decoded value goes, tagged by semantic type.
///
/// The accessor's return type is the field's static type, so declaring a semantic type that does
/// not match the field is a compile error rather than an extraction-time failure.
pub enum Slot<R> {
    Int64(FieldRef<R, i64>),
    Float64(FieldRef<R, f64>),
    String(FieldRef<R, String>),
    Timestamp(FieldRef<R, NaiveDateTime>),
    Rational(FieldRef<R, Rational>),
}

impl<R> Slot<R> {
    pub fn semantic_type(&self) -> SemanticType {
        match self {
            Slot::Int64(_) => SemanticType::Int64,
            Slot::Float64(_) => SemanticType::Float64,
            Slot::String(_) => SemanticType::String,
            Slot::Timestamp(_) => SemanticType::Timestamp,
            Slot::Rational(_) => SemanticType::Rational,
        }
    }
}

impl<R> Clone for Slot<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for Slot<R> {}

impl<R> fmt::Debug for Slot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Slot::{}", self.semantic_type())
    }
}

/// One destination field: its name, the tag that supplies it and where the value lands.
pub struct FieldDescriptor<R> {
    field: &'static str,
    tag: &'static str,
    slot: Slot<R>,
}

impl<R> FieldDescriptor<R> {
    pub fn new(field: &'static str, tag: &'static str, slot: Slot<R>) -> Self {
        Self { field, tag, slot }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn tag(&self) -> &'static str {
        self.tag
    }

    pub fn slot(&self) -> Slot<R> {
        self.slot
    }

    pub fn semantic_type(&self) -> SemanticType {
        self.slot.semantic_type()
    }

    pub fn info(&self) -> FieldInfo {
        FieldInfo {
            field: self.field.to_string(),
            semantic_type: self.semantic_type(),
            tag: self.tag.to_string(),
        }
    }
}

impl<R> Clone for FieldDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            field: self.field,
            tag: self.tag,
            slot: self.slot,
        }
    }
}

impl<R> fmt::Debug for FieldDescriptor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("field", &self.field)
            .field("semantic_type", &self.semantic_type())
            .field("tag", &self.tag)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("schema declares field {field} more than once")]
    DuplicateField { field: String },

    #[error("schema field at position {index} has an empty name")]
    EmptyFieldName { index: usize },

    #[error("schema field {field} has an empty source tag")]
    EmptyTag { field: String },
}

/// Ordered field descriptors for one record type.
///
/// Order is insertion order. Fields are independent, so it only decides which error surfaces
/// first and the order of diagnostics.
pub struct Schema<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> Schema<R> {
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Validates and wraps an already-built descriptor list.
    pub fn new(fields: Vec<FieldDescriptor<R>>) -> Result<Self, SchemaError> {
        let mut seen = BTreeSet::new();
        for (index, fd) in fields.iter().enumerate() {
            if fd.field.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName { index });
            }
            if fd.tag.trim().is_empty() {
                return Err(SchemaError::EmptyTag {
                    field: fd.field.to_string(),
                });
            }
            if !seen.insert(fd.field) {
                return Err(SchemaError::DuplicateField {
                    field: fd.field.to_string(),
                });
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor<R>> {
        self.fields.iter()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<R>> {
        self.fields.iter().find(|fd| fd.field == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn infos(&self) -> Vec<FieldInfo> {
        self.fields.iter().map(FieldDescriptor::info).collect()
    }
}

impl<R> Clone for Schema<R> {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
        }
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// Builder that fixes the record type up front, so accessor closures infer their argument.
///
/// ```
/// use exifmap_domain::Schema;
///
/// #[derive(Default)]
/// struct Shot {
///     model: String,
///     iso: i64,
/// }
///
/// let schema = Schema::<Shot>::builder()
///     .string("model", "Model", |s| &mut s.model)
///     .int64("iso", "ISOSpeedRatings", |s| &mut s.iso)
///     .build()
///     .unwrap();
/// assert_eq!(schema.len(), 2);
/// ```
pub struct SchemaBuilder<R> {
    fields: Vec<FieldDescriptor<R>>,
}

impl<R> SchemaBuilder<R> {
    pub fn int64(self, field: &'static str, tag: &'static str, at: FieldRef<R, i64>) -> Self {
        self.push(field, tag, Slot::Int64(at))
    }

    pub fn float64(self, field: &'static str, tag: &'static str, at: FieldRef<R, f64>) -> Self {
        self.push(field, tag, Slot::Float64(at))
    }

    pub fn string(self, field: &'static str, tag: &'static str, at: FieldRef<R, String>) -> Self {
        self.push(field, tag, Slot::String(at))
    }

    pub fn timestamp(
        self,
        field: &'static str,
        tag: &'static str,
        at: FieldRef<R, NaiveDateTime>,
    ) -> Self {
        self.push(field, tag, Slot::Timestamp(at))
    }

    pub fn rational(
        self,
        field: &'static str,
        tag: &'static str,
        at: FieldRef<R, Rational>,
    ) -> Self {
        self.push(field, tag, Slot::Rational(at))
    }

    pub fn push(mut self, field: &'static str, tag: &'static str, slot: Slot<R>) -> Self {
        self.fields.push(FieldDescriptor::new(field, tag, slot));
        self
    }

    pub fn build(self) -> Result<Schema<R>, SchemaError> {
        Schema::new(self.fields)
    }
}
