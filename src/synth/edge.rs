//! Boundary-value catalog. Adding a case means adding a row.
use chrono::{NaiveDate, Utc};

use crate::model::TypeTag;
use crate::value::{ArrayValue, DateValue, ErrorKind, ErrorValue, MapValue, ObjectValue, SetValue, Value};

pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
pub const MIN_SAFE_INTEGER: f64 = -9_007_199_254_740_991.0;

/// Size of the stress entries (long string, large array/map/set).
pub const STRESS_LEN: usize = 1_000_000;

pub struct EdgeCase {
    pub name: &'static str,
    pub build: fn() -> Value,
}

impl EdgeCase {
    pub fn value(&self) -> Value {
        (self.build)()
    }
}

pub fn catalog(tag: TypeTag) -> &'static [EdgeCase] {
    match tag {
        TypeTag::Number => NUMBER,
        TypeTag::String => STRING,
        TypeTag::Boolean => BOOLEAN,
        TypeTag::Null => NULL,
        TypeTag::Undefined => UNDEFINED,
        TypeTag::Array => ARRAY,
        TypeTag::Object => OBJECT,
        TypeTag::Date => DATE,
        TypeTag::Error => ERROR,
        TypeTag::Map => MAP,
        TypeTag::Set => SET,
    }
}

static NUMBER: &[EdgeCase] = &[
    EdgeCase { name: "max-safe-integer", build: || Value::Number(MAX_SAFE_INTEGER) },
    EdgeCase { name: "min-safe-integer", build: || Value::Number(MIN_SAFE_INTEGER) },
    EdgeCase { name: "nan", build: || Value::Number(f64::NAN) },
];

static STRING: &[EdgeCase] = &[
    EdgeCase { name: "empty", build: || Value::string("") },
    EdgeCase { name: "very-long", build: || Value::String("a".repeat(STRESS_LEN)) },
    EdgeCase { name: "whitespace-only", build: || Value::string("   ") },
];

static BOOLEAN: &[EdgeCase] = &[
    EdgeCase { name: "true", build: || Value::Boolean(true) },
    EdgeCase { name: "false", build: || Value::Boolean(false) },
    EdgeCase { name: "non-boolean", build: || Value::string("invalid") },
];

static NULL: &[EdgeCase] = &[EdgeCase { name: "null", build: || Value::Null }];

static UNDEFINED: &[EdgeCase] = &[EdgeCase { name: "undefined", build: || Value::Undefined }];

static ARRAY: &[EdgeCase] = &[
    EdgeCase { name: "empty", build: || Value::items(vec![]) },
    EdgeCase { name: "single", build: || Value::items(vec![Value::Number(0.0)]) },
    EdgeCase { name: "nested-empty", build: || Value::items(vec![Value::items(vec![])]) },
    EdgeCase {
        name: "mixed",
        build: || Value::items(vec![Value::Number(1.0), Value::string("string"), Value::Boolean(true), Value::Null]),
    },
    EdgeCase {
        name: "very-large",
        build: || Value::Array(ArrayValue::Filled { len: STRESS_LEN, item: Box::new(Value::string("edge")) }),
    },
];

static OBJECT: &[EdgeCase] = &[
    EdgeCase { name: "empty", build: || Value::object(Vec::<(String, Value)>::new()) },
    EdgeCase {
        name: "nested",
        build: || Value::object([("key", Value::object([("nestedKey", Value::string("nestedValue"))]))]),
    },
    EdgeCase { name: "null-key", build: || Value::object([("null", Value::string("value"))]) },
    EdgeCase {
        name: "array-value",
        build: || Value::object([("key", Value::items(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)]))]),
    },
    EdgeCase { name: "prototype-inherited", build: || Value::Object(ObjectValue::Inherited { proto: None }) },
    EdgeCase {
        name: "modified-prototype",
        build: || Value::Object(ObjectValue::Inherited {
            proto: Some([("key".to_string(), Value::string("value"))].into_iter().collect()),
        }),
    },
    EdgeCase { name: "self-referential", build: || Value::Object(ObjectValue::SelfReferential { key: "self".into() }) },
    EdgeCase { name: "reserved-key", build: || Value::object([("constructor", Value::string("value"))]) },
];

static DATE: &[EdgeCase] = &[
    EdgeCase { name: "now", build: || Value::Date(DateValue::Instant(Utc::now())) },
    EdgeCase { name: "specific", build: || calendar_day(2025, 1, 1) },
    EdgeCase { name: "invalid", build: || Value::Date(DateValue::Text("invalid date".into())) },
    EdgeCase { name: "leap-day", build: || calendar_day(2024, 2, 29) },
    EdgeCase { name: "max-valid", build: || calendar_day(9999, 12, 31) },
    EdgeCase { name: "min-valid", build: || calendar_day(1000, 1, 1) },
    // one day past the largest instant a JS Date can hold
    EdgeCase { name: "overflow", build: || Value::Date(DateValue::Text("+275760-09-14T00:00:00.000Z".into())) },
];

static ERROR: &[EdgeCase] = &[
    EdgeCase { name: "generic", build: || Value::Error(ErrorValue::new(ErrorKind::Error, "Generic error")) },
    EdgeCase {
        name: "long-message",
        build: || Value::Error(ErrorValue::new(ErrorKind::Error, "Edge case error with stack trace")),
    },
    EdgeCase { name: "no-message", build: || Value::Error(ErrorValue::bare(ErrorKind::Error)) },
    EdgeCase { name: "type", build: || Value::Error(ErrorValue::new(ErrorKind::TypeError, "Type Error")) },
    EdgeCase {
        name: "reference",
        build: || Value::Error(ErrorValue::new(ErrorKind::ReferenceError, "Reference Error")),
    },
];

static MAP: &[EdgeCase] = &[
    EdgeCase { name: "empty", build: || Value::Map(MapValue::Entries(vec![])) },
    EdgeCase {
        name: "single",
        build: || Value::Map(MapValue::Entries(vec![(Value::string("key1"), Value::string("value1"))])),
    },
    EdgeCase {
        name: "object-key",
        build: || Value::Map(MapValue::Entries(vec![(Value::object(Vec::<(String, Value)>::new()), Value::string("value"))])),
    },
    EdgeCase { name: "circular", build: || Value::Map(MapValue::Circular) },
    EdgeCase {
        name: "mixed",
        build: || Value::Map(MapValue::Entries(vec![
            (Value::Number(1.0), Value::string("value1")),
            (Value::string("key2"), Value::Number(100.0)),
            (Value::Boolean(false), Value::object(Vec::<(String, Value)>::new())),
        ])),
    },
    EdgeCase { name: "very-large", build: || Value::Map(MapValue::Counting { len: STRESS_LEN }) },
];

static SET: &[EdgeCase] = &[
    EdgeCase { name: "empty", build: || Value::Set(SetValue::Items(vec![])) },
    EdgeCase { name: "single", build: || Value::Set(SetValue::Items(vec![Value::Number(1.0)])) },
    EdgeCase {
        name: "object-member",
        build: || Value::Set(SetValue::Items(vec![Value::object(Vec::<(String, Value)>::new())])),
    },
    EdgeCase { name: "circular", build: || Value::Set(SetValue::Circular) },
    EdgeCase {
        name: "mixed",
        build: || Value::Set(SetValue::Items(vec![
            Value::Number(1.0),
            Value::string("string"),
            Value::Boolean(true),
            Value::object(Vec::<(String, Value)>::new()),
            calendar_day(2025, 1, 1),
        ])),
    },
    EdgeCase { name: "very-large", build: || Value::Set(SetValue::Counting { len: STRESS_LEN }) },
];

/// Midnight UTC on the given day; days chrono rejects are passed as text.
fn calendar_day(year: i32, month: u32, day: u32) -> Value {
    let instant = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc());
    Value::Date(match instant {
        Some(at) => DateValue::Instant(at),
        None => DateValue::Text(format!("{year:04}-{month:02}-{day:02}")),
    })
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tag_has_a_non_empty_catalog() {
        for tag in TypeTag::ALL {
            assert!(!catalog(tag).is_empty(), "{tag} has no edge cases");
        }
    }

    #[test]
    fn catalog_names_are_unique_per_tag() {
        for tag in TypeTag::ALL {
            let mut names: Vec<_> = catalog(tag).iter().map(|e| e.name).collect();
            names.sort_unstable();
            names.dedup();
            assert_eq!(names.len(), catalog(tag).len(), "duplicate name under {tag}");
        }
    }

    #[test]
    fn calendar_days_resolve_to_instants() {
        match calendar_day(2024, 2, 29) {
            Value::Date(DateValue::Instant(at)) => assert_eq!(crate::value::iso_timestamp(&at), "2024-02-29T00:00:00.000Z"),
            other => panic!("expected an instant, got {other:?}"),
        }
        assert_eq!(calendar_day(2023, 2, 29), Value::Date(DateValue::Text("2023-02-29".into())));
    }
}
