//! Inputs to generation: function descriptors, per-parameter type tags,
//! numeric range hints and the generation policy.
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PolicyError;

// ————————————————————————————————————————————————————————————————————————————
// TYPE TAGS
// ————————————————————————————————————————————————————————————————————————————

/// Semantic category of a generated argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeTag {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
    Array,
    Object,
    Date,
    Error,
    Map,
    Set,
}

impl TypeTag {
    pub const ALL: [TypeTag; 11] = [
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::Array,
        TypeTag::Object,
        TypeTag::Date,
        TypeTag::Error,
        TypeTag::Map,
        TypeTag::Set,
    ];

    /// The subset the normal-curve policy is defined over.
    pub const NORMAL_CURVE: [TypeTag; 6] = [
        TypeTag::Number,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::Date,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Number => "Number",
            TypeTag::String => "String",
            TypeTag::Boolean => "Boolean",
            TypeTag::Null => "Null",
            TypeTag::Undefined => "Undefined",
            TypeTag::Array => "Array",
            TypeTag::Object => "Object",
            TypeTag::Date => "Date",
            TypeTag::Error => "Error",
            TypeTag::Map => "Map",
            TypeTag::Set => "Set",
        }
    }

    pub fn supports_normal_curve(self) -> bool {
        Self::NORMAL_CURVE.contains(&self)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown type tag `{s}`"))
    }
}

/// A per-parameter type assignment: a concrete tag, or `Any` (re-drawn on
/// every resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeSpec {
    Tag(TypeTag),
    Any,
}

impl TypeSpec {
    /// Lenient parse used at every input boundary. `All` is the older spelling
    /// of `Any`; names outside the closed set degrade to `Null`.
    pub fn from_name(raw: &str) -> TypeSpec {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("any") || trimmed.eq_ignore_ascii_case("all") {
            return TypeSpec::Any;
        }
        match trimmed.parse::<TypeTag>() {
            Ok(tag) => TypeSpec::Tag(tag),
            Err(_) => {
                tracing::warn!(tag = raw, "unsupported type tag, generating null instead");
                TypeSpec::Tag(TypeTag::Null)
            }
        }
    }
}

impl From<TypeTag> for TypeSpec {
    fn from(tag: TypeTag) -> Self {
        TypeSpec::Tag(tag)
    }
}

impl From<String> for TypeSpec {
    fn from(raw: String) -> Self {
        TypeSpec::from_name(&raw)
    }
}

impl From<TypeSpec> for String {
    fn from(spec: TypeSpec) -> Self {
        spec.to_string()
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpec::Tag(tag) => f.write_str(tag.name()),
            TypeSpec::Any => f.write_str("Any"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// POLICY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Strategy {
    #[default]
    Uniform,
    EdgeCase,
    NormalCurve,
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Uniform => "Uniform",
            Strategy::EdgeCase => "EdgeCase",
            Strategy::NormalCurve => "NormalCurve",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Only the two primary strategies are selectable by name; edge cases are
/// requested through [`GenerationPolicy::include_edge_round`].
impl FromStr for Strategy {
    type Err = PolicyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Uniform" => Ok(Strategy::Uniform),
            "NormalCurve" => Ok(Strategy::NormalCurve),
            other => Err(PolicyError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationPolicy {
    pub strategy: Strategy,
    pub count: usize,
    pub include_edge_round: bool,
}

/// Bounds for normal-curve numbers. Missing or non-finite bounds are filled
/// at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RangeHint {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl RangeHint {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }
}

/// Range hints of one function, keyed by parameter name.
pub type RangeHints = IndexMap<String, RangeHint>;

// ————————————————————————————————————————————————————————————————————————————
// FUNCTIONS
// ————————————————————————————————————————————————————————————————————————————

/// A callable found by the source scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDescriptor {
    pub name: String,
    pub file: String,
    /// Unnamed slots (default, rest or destructured parameters arrive as
    /// `null`) get a positional `arg<N>` placeholder.
    #[serde(default, deserialize_with = "parameter_names")]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub full: String,
}

impl FunctionDescriptor {
    pub fn new(name: impl Into<String>, file: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
            body: String::new(),
            full: String::new(),
        }
    }

    pub fn signature(&self) -> String {
        signature(&self.name, &self.file)
    }
}

fn parameter_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Vec::<Option<String>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, name)| match name {
            Some(name) => name,
            None => {
                tracing::warn!(position = index, "unnamed parameter, using a placeholder");
                format!("arg{index}")
            }
        })
        .collect())
}

/// Composite key identifying a function across a scanned tree.
pub fn signature(name: &str, file: &str) -> String {
    format!("{name}@{file}")
}

/// Positional `(parameter, type)` slots in declaration order. A repeated
/// parameter name keeps one slot per occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterTypeAssignment {
    slots: Vec<(String, TypeSpec)>,
}

impl ParameterTypeAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter starts out as `Any`.
    pub fn for_parameters<S: AsRef<str>>(parameters: &[S]) -> Self {
        let mut out = Self::new();
        for p in parameters {
            out.push(p.as_ref(), TypeSpec::Any);
        }
        out
    }

    /// Appends a slot, even when the name is already present.
    pub fn push(&mut self, parameter: impl Into<String>, spec: impl Into<TypeSpec>) {
        self.slots.push((parameter.into(), spec.into()));
    }

    /// Retags every slot named `parameter`; appends one if there is none.
    pub fn set(&mut self, parameter: impl Into<String>, spec: impl Into<TypeSpec>) {
        let parameter = parameter.into();
        let spec = spec.into();
        let mut found = false;
        for (_, slot) in self.slots.iter_mut().filter(|(name, _)| *name == parameter) {
            *slot = spec;
            found = true;
        }
        if !found {
            self.slots.push((parameter, spec));
        }
    }

    /// Tag of the first slot named `parameter`.
    pub fn get(&self, parameter: &str) -> Option<TypeSpec> {
        self.slots.iter().find(|(name, _)| name == parameter).map(|(_, spec)| *spec)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, TypeSpec)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K: Into<String>, V: Into<TypeSpec>> FromIterator<(K, V)> for ParameterTypeAssignment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (k, v) in iter {
            out.push(k, v);
        }
        out
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_joins_name_and_file() {
        let f = FunctionDescriptor::new("add", "src/math.js", &["a", "b"]);
        assert_eq!(f.signature(), "add@src/math.js");
    }

    #[test]
    fn unnamed_parameters_get_positional_placeholders() {
        let f: FunctionDescriptor =
            serde_json::from_str(r#"{"name":"f","file":"a.js","parameters":["a",null,"c",null]}"#).unwrap();
        assert_eq!(f.parameters, vec!["a", "arg1", "c", "arg3"]);
        let g: FunctionDescriptor = serde_json::from_str(r#"{"name":"g","file":"a.js"}"#).unwrap();
        assert!(g.parameters.is_empty());
    }

    #[test]
    fn type_spec_accepts_legacy_all_and_degrades_unknown_to_null() {
        assert_eq!(TypeSpec::from_name("All"), TypeSpec::Any);
        assert_eq!(TypeSpec::from_name("any"), TypeSpec::Any);
        assert_eq!(TypeSpec::from_name("Number"), TypeSpec::Tag(TypeTag::Number));
        assert_eq!(TypeSpec::from_name("WeakRef"), TypeSpec::Tag(TypeTag::Null));
    }

    #[test]
    fn type_spec_serde_uses_plain_names() {
        let spec: TypeSpec = serde_json::from_str("\"Map\"").unwrap();
        assert_eq!(spec, TypeSpec::Tag(TypeTag::Map));
        assert_eq!(serde_json::to_string(&TypeSpec::Any).unwrap(), "\"Any\"");
    }

    #[test]
    fn only_primary_strategies_parse() {
        assert_eq!("Uniform".parse::<Strategy>(), Ok(Strategy::Uniform));
        assert_eq!("NormalCurve".parse::<Strategy>(), Ok(Strategy::NormalCurve));
        assert!("EdgeCase".parse::<Strategy>().is_err());
        assert!("random".parse::<Strategy>().is_err());
    }

    #[test]
    fn assignment_updates_keep_declaration_order() {
        let mut a = ParameterTypeAssignment::for_parameters(&["x", "y", "z"]);
        a.set("y", TypeTag::String);
        let order: Vec<_> = a.iter().map(|(k, v)| (k.to_string(), v)).collect();
        assert_eq!(order, vec![
            ("x".to_string(), TypeSpec::Any),
            ("y".to_string(), TypeSpec::Tag(TypeTag::String)),
            ("z".to_string(), TypeSpec::Any),
        ]);
    }

    #[test]
    fn repeated_parameter_names_keep_one_slot_each() {
        let mut a = ParameterTypeAssignment::for_parameters(&["a", "a", "b"]);
        assert_eq!(a.len(), 3);
        a.set("a", TypeTag::Date);
        let tags: Vec<_> = a.iter().map(|(_, v)| v).collect();
        assert_eq!(tags, vec![
            TypeSpec::Tag(TypeTag::Date),
            TypeSpec::Tag(TypeTag::Date),
            TypeSpec::Any,
        ]);
    }

    #[test]
    fn default_policy_is_uniform_with_no_rounds() {
        let p = GenerationPolicy::default();
        assert_eq!(p.strategy, Strategy::Uniform);
        assert_eq!(p.count, 0);
        assert!(!p.include_edge_round);
    }
}
