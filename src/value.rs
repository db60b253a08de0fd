//! Synthesized argument values. One variant per [`TypeTag`]; composite
//! variants also carry the non-literal shapes the edge catalog needs.
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::Value as Json;

use crate::model::TypeTag;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    Undefined,
    Array(ArrayValue),
    Object(ObjectValue),
    Date(DateValue),
    Error(ErrorValue),
    Map(MapValue),
    Set(SetValue),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayValue {
    Items(Vec<Value>),
    /// `len` copies of `item`, kept unexpanded.
    Filled { len: usize, item: Box<Value> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectValue {
    Entries(IndexMap<String, Value>),
    /// `Object.create(..)`: `None` inherits `Object.prototype`, `Some` puts the
    /// given entries on the prototype chain.
    Inherited { proto: Option<IndexMap<String, Value>> },
    /// Object holding itself under `key`.
    SelfReferential { key: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    Instant(DateTime<Utc>),
    /// Passed verbatim to the `Date` constructor (invalid or out-of-range input).
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Error,
    TypeError,
    ReferenceError,
}

impl ErrorKind {
    pub fn constructor(self) -> &'static str {
        match self {
            ErrorKind::Error => "Error",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ReferenceError => "ReferenceError",
        }
    }
}

/// Errors travel as constructor-call source, never as live objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub kind: ErrorKind,
    pub message: Option<String>,
}

impl ErrorValue {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: Some(message.into()) }
    }

    pub fn bare(kind: ErrorKind) -> Self {
        Self { kind, message: None }
    }

    pub fn source(&self) -> String {
        match &self.message {
            Some(message) => format!("new {}({})", self.kind.constructor(), Json::from(message.as_str())),
            None => format!("new {}()", self.kind.constructor()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapValue {
    Entries(Vec<(Value, Value)>),
    /// Keys `0..len`, each mapped to itself.
    Counting { len: usize },
    /// Two objects referencing each other, one as key and one as value.
    Circular,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetValue {
    Items(Vec<Value>),
    /// Members `0..len`.
    Counting { len: usize },
    /// A single object referencing itself.
    Circular,
}

impl Value {
    pub fn tag(&self) -> TypeTag {
        match self {
            Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Null => TypeTag::Null,
            Value::Undefined => TypeTag::Undefined,
            Value::Array(_) => TypeTag::Array,
            Value::Object(_) => TypeTag::Object,
            Value::Date(_) => TypeTag::Date,
            Value::Error(_) => TypeTag::Error,
            Value::Map(_) => TypeTag::Map,
            Value::Set(_) => TypeTag::Set,
        }
    }

    pub fn items(items: Vec<Value>) -> Value {
        Value::Array(ArrayValue::Items(items))
    }

    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Value {
        Value::Object(ObjectValue::Entries(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }

    /// Structural form, following `JSON.stringify` conventions: non-finite
    /// numbers and `undefined` array slots become `null`, `undefined` object
    /// members are dropped, dates become ISO strings, errors their source,
    /// maps and sets their entry lists. Cyclic shapes have no form and
    /// collapse to `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Number(n) => json_num_pref_i64(*n),
            Value::String(s) => Json::String(s.clone()),
            Value::Boolean(b) => Json::Bool(*b),
            Value::Null | Value::Undefined => Json::Null,
            Value::Array(ArrayValue::Items(xs)) => Json::Array(xs.iter().map(Value::to_json).collect()),
            Value::Array(ArrayValue::Filled { len, item }) => Json::Array(vec![item.to_json(); *len]),
            Value::Object(ObjectValue::Entries(entries)) => Json::Object(own_members(entries)),
            // only own members survive stringification
            Value::Object(ObjectValue::Inherited { .. }) => Json::Object(serde_json::Map::new()),
            Value::Object(ObjectValue::SelfReferential { .. }) => Json::Null,
            Value::Date(DateValue::Instant(at)) => Json::String(iso_timestamp(at)),
            Value::Date(DateValue::Text(_)) => Json::Null,
            Value::Error(e) => Json::String(e.source()),
            Value::Map(MapValue::Entries(pairs)) => Json::Array(
                pairs.iter()
                    .map(|(k, v)| Json::Array(vec![k.to_json(), v.to_json()]))
                    .collect(),
            ),
            Value::Map(MapValue::Counting { len }) => Json::Array(
                (0..*len).map(|i| Json::Array(vec![Json::from(i), Json::from(i)])).collect(),
            ),
            Value::Set(SetValue::Items(xs)) => Json::Array(xs.iter().map(Value::to_json).collect()),
            Value::Set(SetValue::Counting { len }) => Json::Array((0..*len).map(Json::from).collect()),
            Value::Map(MapValue::Circular) | Value::Set(SetValue::Circular) => Json::Null,
        }
    }
}

fn own_members(entries: &IndexMap<String, Value>) -> serde_json::Map<String, Json> {
    entries
        .iter()
        .filter(|(_, v)| !matches!(v, Value::Undefined))
        .map(|(k, v)| (k.clone(), v.to_json()))
        .collect()
}

/// `YYYY-MM-DDTHH:mm:ss.sssZ`, the shape `Date.prototype.toISOString` emits.
pub fn iso_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// prefer emitting integers when exact
fn json_num_pref_i64(n: f64) -> Json {
    if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n <= i64::MAX as f64 {
        Json::from(n as i64)
    } else {
        Json::from(n)
    }
}

// ------------------------------- Tests ------------------------------------ //
