//! Property-based tests for the extraction engine.
//!
//! These tests verify that, for any subset and ordering of fields:
//! - Fully matching stores populate every declared field exactly
//! - A single absent tag defaults only that field and yields one diagnostic
//! - A single encoding mismatch fails with `TypeMismatch` naming that field
//! - Extracting twice from the same store yields equal records

use chrono::{NaiveDate, NaiveDateTime};
use exifmap_domain::{
    Diagnostic, ExtractionError, Extractor, FieldDescriptor, InMemoryTagStore, MemoryTag, Schema,
    Slot, extract,
};
use exifmap_types::Rational;
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Probe {
    i0: i64,
    i1: i64,
    f0: f64,
    s0: String,
    s1: String,
    t0: NaiveDateTime,
    r0: Rational,
    r1: Rational,
}

const FIELD_COUNT: usize = 8;

fn descriptor(index: usize) -> FieldDescriptor<Probe> {
    match index {
        0 => FieldDescriptor::new("i0", "IntTag0", Slot::<Probe>::Int64(|p| &mut p.i0)),
        1 => FieldDescriptor::new("i1", "IntTag1", Slot::<Probe>::Int64(|p| &mut p.i1)),
        2 => FieldDescriptor::new("f0", "FloatTag0", Slot::<Probe>::Float64(|p| &mut p.f0)),
        3 => FieldDescriptor::new("s0", "StringTag0", Slot::<Probe>::String(|p| &mut p.s0)),
        4 => FieldDescriptor::new("s1", "StringTag1", Slot::<Probe>::String(|p| &mut p.s1)),
        5 => FieldDescriptor::new("t0", "TimeTag0", Slot::<Probe>::Timestamp(|p| &mut p.t0)),
        6 => FieldDescriptor::new("r0", "RatTag0", Slot::<Probe>::Rational(|p| &mut p.r0)),
        _ => FieldDescriptor::new("r1", "RatTag1", Slot::<Probe>::Rational(|p| &mut p.r1)),
    }
}

#[derive(Debug, Clone)]
struct Values {
    i0: i64,
    i1: i64,
    f0: f64,
    s0: String,
    s1: String,
    t0_raw: String,
    t0: NaiveDateTime,
    r0: (i64, i64),
    r1: (i64, i64),
}

impl Values {
    fn tag(&self, index: usize) -> MemoryTag {
        match index {
            0 => MemoryTag::int(self.i0),
            1 => MemoryTag::int(self.i1),
            2 => MemoryTag::float(self.f0),
            3 => MemoryTag::string(self.s0.clone()),
            4 => MemoryTag::string(self.s1.clone()),
            5 => MemoryTag::string(self.t0_raw.clone()),
            6 => MemoryTag::rational(self.r0.0, self.r0.1),
            _ => MemoryTag::rational(self.r1.0, self.r1.1),
        }
    }

    fn apply(&self, index: usize, probe: &mut Probe) {
        match index {
            0 => probe.i0 = self.i0,
            1 => probe.i1 = self.i1,
            2 => probe.f0 = self.f0,
            3 => probe.s0 = self.s0.clone(),
            4 => probe.s1 = self.s1.clone(),
            5 => probe.t0 = self.t0,
            6 => probe.r0 = Rational::new(self.r0.0, self.r0.1).unwrap(),
            _ => probe.r1 = Rational::new(self.r1.0, self.r1.1).unwrap(),
        }
    }
}

/// A tag whose encoding the field at `index` never accepts.
fn mismatched_tag(index: usize) -> MemoryTag {
    match index {
        0 | 1 => MemoryTag::string("100"),
        2 => MemoryTag::int(3),
        3..=5 => MemoryTag::int(20230704),
        _ => MemoryTag::float(2.8),
    }
}

fn schema_for(indices: &[usize]) -> Schema<Probe> {
    Schema::new(indices.iter().map(|&i| descriptor(i)).collect()).unwrap()
}

fn store_for(indices: &[usize], values: &Values) -> InMemoryTagStore {
    let mut store = InMemoryTagStore::new();
    for &i in indices {
        store.insert(descriptor(i).tag(), values.tag(i));
    }
    store
}

fn expected_for(indices: &[usize], values: &Values) -> Probe {
    let mut probe = Probe::default();
    for &i in indices {
        values.apply(i, &mut probe);
    }
    probe
}

prop_compose! {
    fn arb_timestamp()(
        y in 1900i32..2100,
        mo in 1u32..=12,
        d in 1u32..=28,
        h in 0u32..24,
        mi in 0u32..60,
        s in 0u32..60,
    ) -> (String, NaiveDateTime) {
        let ts = NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap();
        (format!("{y:04}:{mo:02}:{d:02} {h:02}:{mi:02}:{s:02}"), ts)
    }
}

prop_compose! {
    fn arb_values()(
        i0 in any::<i64>(),
        i1 in any::<i64>(),
        f0 in -1.0e12f64..1.0e12,
        s0 in "[ -~]{0,24}",
        s1 in "[A-Za-z0-9 ]{0,24}",
        t0 in arb_timestamp(),
        r0 in (-1_000_000i64..1_000_000, 1i64..1_000_000),
        r1 in (-1_000_000i64..1_000_000, -1_000_000i64..-1),
    ) -> Values {
        Values { i0, i1, f0, s0, s1, t0_raw: t0.0, t0: t0.1, r0, r1 }
    }
}

/// Non-empty subset of field indices, in random order.
fn arb_fields() -> impl Strategy<Value = Vec<usize>> {
    prop::sample::subsequence((0..FIELD_COUNT).collect::<Vec<_>>(), 1..=FIELD_COUNT)
        .prop_shuffle()
}

proptest! {
    #[test]
    fn matching_store_populates_every_field(fields in arb_fields(), values in arb_values()) {
        let schema = schema_for(&fields);
        let store = store_for(&fields, &values);

        let out = Extractor::default().extract(&schema, &store).unwrap();

        prop_assert_eq!(out.record, expected_for(&fields, &values));
        prop_assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn one_absent_tag_defaults_only_that_field(
        fields in arb_fields(),
        values in arb_values(),
        pick in any::<prop::sample::Index>(),
    ) {
        let absent = *pick.get(&fields);
        let present: Vec<usize> = fields.iter().copied().filter(|&i| i != absent).collect();
        let schema = schema_for(&fields);
        let store = store_for(&present, &values);

        let out = Extractor::default().extract(&schema, &store).unwrap();

        prop_assert_eq!(out.record, expected_for(&present, &values));
        let fd = descriptor(absent);
        prop_assert_eq!(
            out.diagnostics,
            vec![Diagnostic::TagNotPresent { field: fd.field(), tag: fd.tag() }]
        );
    }

    #[test]
    fn one_mismatched_tag_fails_naming_that_field(
        fields in arb_fields(),
        values in arb_values(),
        pick in any::<prop::sample::Index>(),
    ) {
        let bad = *pick.get(&fields);
        let schema = schema_for(&fields);
        let mut store = store_for(&fields, &values);
        store.insert(descriptor(bad).tag(), mismatched_tag(bad));

        let err = extract(&schema, &store).unwrap_err();

        match err {
            ExtractionError::TypeMismatch { field, declared, .. } => {
                prop_assert_eq!(field, descriptor(bad).field());
                prop_assert_eq!(declared, descriptor(bad).semantic_type());
            }
            other => prop_assert!(false, "expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn extraction_is_idempotent(fields in arb_fields(), values in arb_values()) {
        let schema = schema_for(&fields);
        let mut store = store_for(&fields, &values);
        // Drop one tag so defaults are part of what gets compared.
        store.remove(descriptor(fields[0]).tag());

        let first = extract(&schema, &store).unwrap();
        let second = extract(&schema, &store).unwrap();

        prop_assert_eq!(first, second);
    }
}
