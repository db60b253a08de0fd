//! Value synthesis: one value of a requested type under one of three
//! strategies.
//!
//! - Uniform: plain random values, composites filled recursively with `Any`.
//! - Edge case: one row of the boundary catalog in [`edge`].
//! - Normal curve: Box-Muller numbers inside a range hint ([`normal`]);
//!   other types fall back to uniform.
//!
//! Every tag yields a value; nothing here fails.
pub mod edge;
pub mod normal;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rand::{Rng, RngCore};
use tracing::trace;

use crate::model::{RangeHint, Strategy, TypeSpec, TypeTag};
use crate::resolve::draw_tag;
use crate::value::{DateValue, ErrorKind, ErrorValue, MapValue, SetValue, Value};

/// Uniform numbers are integers in `[0, UNIFORM_NUMBER_CEIL)`.
const UNIFORM_NUMBER_CEIL: u32 = 1000;
const MAX_ARRAY_LEN: usize = 10;
/// Objects, maps and sets get `0..MAX_ENTRIES` entries.
const MAX_ENTRIES: usize = 5;

/// 1925-01-01T00:00:00Z, lower end of uniform dates.
const DATE_FLOOR_MS: i64 = -1_420_070_400_000;

/// Composite nesting depth past which `Any` only draws scalars.
const MAX_DEPTH: usize = 4;

const SCALAR_TAGS: [TypeTag; 6] = [
    TypeTag::Number,
    TypeTag::String,
    TypeTag::Boolean,
    TypeTag::Null,
    TypeTag::Undefined,
    TypeTag::Date,
];

// Tokens mimic the tail of a base-36 fraction: a fixed number of leading
// digits is skipped, the rest kept.
const TOKEN_DIGITS: usize = 11;
const TOKEN_SKIP: usize = 5;

// ---------------------------------------------------------------------------
// Synth
// ---------------------------------------------------------------------------

/// Value synthesizer. Borrows the random stream exclusively for its lifetime,
/// so multi-draw samples are never interleaved with other callers.
pub struct Synth<'a> {
    rng: &'a mut dyn RngCore,
    depth: usize,
}

impl<'a> Synth<'a> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self { rng, depth: 0 }
    }
}

impl Synth<'_> {
    /// Synthesize for a parameter spec; `Any` is resolved once against the
    /// full closed set.
    pub fn synthesize(&mut self, spec: TypeSpec, strategy: Strategy, hint: Option<&RangeHint>) -> Value {
        let tag = match spec {
            TypeSpec::Tag(tag) => tag,
            TypeSpec::Any => draw_tag(&TypeTag::ALL, self.rng),
        };
        self.value(tag, strategy, hint)
    }

    pub fn value(&mut self, tag: TypeTag, strategy: Strategy, hint: Option<&RangeHint>) -> Value {
        let value = match strategy {
            Strategy::Uniform => self.uniform(tag),
            Strategy::EdgeCase => self.edge(tag),
            Strategy::NormalCurve => match tag {
                TypeTag::Number => Value::Number(normal::sample(hint, self.rng)),
                _ => self.uniform(tag),
            },
        };
        trace!(%tag, %strategy, "synthesized value");
        value
    }

    pub fn uniform(&mut self, tag: TypeTag) -> Value {
        match tag {
            TypeTag::Number => Value::Number(self.rng.gen_range(0..UNIFORM_NUMBER_CEIL) as f64),
            TypeTag::String => Value::String(self.token()),
            TypeTag::Boolean => Value::Boolean(self.rng.gen_bool(0.5)),
            TypeTag::Null => Value::Null,
            TypeTag::Undefined => Value::Undefined,
            TypeTag::Array => {
                let len = self.rng.gen_range(0..MAX_ARRAY_LEN);
                Value::items((0..len).map(|_| self.nested()).collect())
            }
            TypeTag::Object => {
                let len = self.rng.gen_range(0..MAX_ENTRIES);
                let mut entries = IndexMap::with_capacity(len);
                for _ in 0..len {
                    let key = self.token();
                    let value = self.nested();
                    entries.insert(key, value);
                }
                Value::object(entries)
            }
            TypeTag::Date => Value::Date(DateValue::Instant(self.date())),
            TypeTag::Error => Value::Error(match self.rng.gen_range(0..3) {
                0 => ErrorValue::new(ErrorKind::Error, format!("Generic error{}", self.rng.gen_range(0.0f64..1.0))),
                1 => ErrorValue::new(ErrorKind::TypeError, "Type Error"),
                _ => ErrorValue::new(ErrorKind::ReferenceError, "Reference Error"),
            }),
            TypeTag::Map => {
                // string keys, last write wins like `Map#set`
                let len = self.rng.gen_range(0..MAX_ENTRIES);
                let mut entries = IndexMap::with_capacity(len);
                for _ in 0..len {
                    let key = self.token();
                    let value = self.nested();
                    entries.insert(key, value);
                }
                Value::Map(MapValue::Entries(
                    entries.into_iter().map(|(k, v)| (Value::String(k), v)).collect(),
                ))
            }
            TypeTag::Set => {
                let len = self.rng.gen_range(0..MAX_ENTRIES);
                Value::Set(SetValue::Items((0..len).map(|_| self.nested()).collect()))
            }
        }
    }

    pub fn edge(&mut self, tag: TypeTag) -> Value {
        let table = edge::catalog(tag);
        let row = &table[self.rng.gen_range(0..table.len())];
        trace!(%tag, case = row.name, "edge case");
        row.value()
    }

    /// A uniform `Any` one level down.
    fn nested(&mut self) -> Value {
        self.depth += 1;
        let universe: &[TypeTag] = if self.depth >= MAX_DEPTH { &SCALAR_TAGS } else { &TypeTag::ALL };
        let tag = draw_tag(universe, self.rng);
        let value = self.uniform(tag);
        self.depth -= 1;
        value
    }

    /// Short alphanumeric token; collisions are tolerated.
    fn token(&mut self) -> String {
        let mut frac: f64 = self.rng.gen_range(0.0..1.0);
        let mut out = String::with_capacity(TOKEN_DIGITS - TOKEN_SKIP);
        for i in 0..TOKEN_DIGITS {
            if frac == 0.0 {
                break;
            }
            frac *= 36.0;
            let digit = frac.floor();
            frac -= digit;
            if i >= TOKEN_SKIP {
                out.push(char::from_digit(digit as u32, 36).unwrap_or('0'));
            }
        }
        out
    }

    /// Uniform instant between 1925-01-01 and now.
    fn date(&mut self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_millis();
        let millis = if now > DATE_FLOOR_MS { self.rng.gen_range(DATE_FLOOR_MS..now) } else { DATE_FLOOR_MS };
        DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
    }
}

// ------------------------------- Tests ------------------------------------ //
