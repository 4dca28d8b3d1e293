use exifmap_types::{Encoding, Rational, RationalError};
use std::collections::BTreeMap;
use thiserror::Error;

/// One raw tag value, as held by a tag store.
///
/// Multi-valued tags are indexed; the extraction engine only ever reads index 0.
pub trait RawTag {
    fn encoding(&self) -> Encoding;

    /// Number of stored values. Strings count as one.
    fn count(&self) -> usize;

    fn int64(&self, index: usize) -> Result<i64, ValueError>;

    fn float64(&self, index: usize) -> Result<f64, ValueError>;

    fn rational(&self, index: usize) -> Result<Rational, ValueError>;

    fn string(&self) -> Result<String, ValueError>;

    /// Human-readable rendering for tag dumps.
    fn display(&self) -> String;
}

/// Read-only tag lookup by name.
///
/// exifmap-domain uses this so the engine can be driven by a real EXIF container or by the
/// in-memory [`InMemoryTagStore`] in tests.
pub trait TagStore {
    fn get(&self, tag: &str) -> Result<&dyn RawTag, LookupError>;

    /// Every tag name the store can resolve, sorted.
    fn tag_names(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("tag {tag} not present")]
    NotPresent { tag: String },

    #[error("tag store error reading {tag}: {message}")]
    Store { tag: String, message: String },
}

impl LookupError {
    pub fn is_not_present(&self) -> bool {
        matches!(self, LookupError::NotPresent { .. })
    }
}

/// Failure reading a value out of a raw tag whose encoding is already known.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{encoding} tag has no value at index {index} (count {count})")]
    IndexOutOfRange {
        encoding: Encoding,
        index: usize,
        count: usize,
    },

    #[error("{actual} tag cannot be read as {requested}")]
    WrongEncoding {
        requested: Encoding,
        actual: Encoding,
    },

    #[error(transparent)]
    Rational(#[from] RationalError),

    #[error("string value is not valid UTF-8")]
    InvalidUtf8,
}

/// Owned raw value for [`InMemoryTagStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryTag {
    Int(Vec<i64>),
    Float(Vec<f64>),
    /// Numerator/denominator pairs, validated when read.
    Rational(Vec<(i64, i64)>),
    String(String),
    Undefined(Vec<u8>),
}

impl MemoryTag {
    pub fn int(value: i64) -> Self {
        MemoryTag::Int(vec![value])
    }

    pub fn float(value: f64) -> Self {
        MemoryTag::Float(vec![value])
    }

    pub fn rational(num: i64, den: i64) -> Self {
        MemoryTag::Rational(vec![(num, den)])
    }

    pub fn string(value: impl Into<String>) -> Self {
        MemoryTag::String(value.into())
    }

    fn wrong(&self, requested: Encoding) -> ValueError {
        ValueError::WrongEncoding {
            requested,
            actual: self.encoding(),
        }
    }
}

fn nth<T: Copy>(values: &[T], index: usize, encoding: Encoding) -> Result<T, ValueError> {
    values
        .get(index)
        .copied()
        .ok_or(ValueError::IndexOutOfRange {
            encoding,
            index,
            count: values.len(),
        })
}

impl RawTag for MemoryTag {
    fn encoding(&self) -> Encoding {
        match self {
            MemoryTag::Int(_) => Encoding::Int,
            MemoryTag::Float(_) => Encoding::Float,
            MemoryTag::Rational(_) => Encoding::Rational,
            MemoryTag::String(_) => Encoding::String,
            MemoryTag::Undefined(_) => Encoding::Undefined,
        }
    }

    fn count(&self) -> usize {
        match self {
            MemoryTag::Int(v) => v.len(),
            MemoryTag::Float(v) => v.len(),
            MemoryTag::Rational(v) => v.len(),
            MemoryTag::String(_) => 1,
            MemoryTag::Undefined(v) => v.len(),
        }
    }

    fn int64(&self, index: usize) -> Result<i64, ValueError> {
        match self {
            MemoryTag::Int(v) => nth(v, index, Encoding::Int),
            _ => Err(self.wrong(Encoding::Int)),
        }
    }

    fn float64(&self, index: usize) -> Result<f64, ValueError> {
        match self {
            MemoryTag::Float(v) => nth(v, index, Encoding::Float),
            _ => Err(self.wrong(Encoding::Float)),
        }
    }

    fn rational(&self, index: usize) -> Result<Rational, ValueError> {
        match self {
            MemoryTag::Rational(v) => {
                let (num, den) = nth(v, index, Encoding::Rational)?;
                Ok(Rational::new(num, den)?)
            }
            _ => Err(self.wrong(Encoding::Rational)),
        }
    }

    fn string(&self) -> Result<String, ValueError> {
        match self {
            MemoryTag::String(s) => Ok(s.clone()),
            _ => Err(self.wrong(Encoding::String)),
        }
    }

    fn display(&self) -> String {
        match self {
            MemoryTag::Int(v) => join(v.iter().map(|x| x.to_string())),
            MemoryTag::Float(v) => join(v.iter().map(|x| x.to_string())),
            MemoryTag::Rational(v) => join(v.iter().map(|(n, d)| format!("{n}/{d}"))),
            MemoryTag::String(s) => format!("{s:?}"),
            MemoryTag::Undefined(v) => format!("<{} bytes>", v.len()),
        }
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    let items: Vec<String> = items.collect();
    if items.len() == 1 {
        items.into_iter().collect()
    } else {
        format!("[{}]", items.join(", "))
    }
}

/// In-memory tag store for embedding and testing.
///
/// Tags can also be registered as faulty, so lookups of that name fail with
/// [`LookupError::Store`] the way a damaged container would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagStore {
    tags: BTreeMap<String, MemoryTag>,
    faults: BTreeMap<String, String>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, name: impl Into<String>, tag: MemoryTag) -> Self {
        self.insert(name, tag);
        self
    }

    pub fn with_fault(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.faults.insert(name.into(), message.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, tag: MemoryTag) {
        self.tags.insert(name.into(), tag);
    }

    pub fn remove(&mut self, name: &str) -> Option<MemoryTag> {
        self.tags.remove(name)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl TagStore for InMemoryTagStore {
    fn get(&self, tag: &str) -> Result<&dyn RawTag, LookupError> {
        if let Some(message) = self.faults.get(tag) {
            return Err(LookupError::Store {
                tag: tag.to_string(),
                message: message.clone(),
            });
        }
        self.tags
            .get(tag)
            .map(|t| t as &dyn RawTag)
            .ok_or_else(|| LookupError::NotPresent {
                tag: tag.to_string(),
            })
    }

    fn tag_names(&self) -> Vec<String> {
        self.tags.keys().cloned().collect()
    }
}
