//! Loading scanner manifests and session config files.
//!
//! A manifest is a JSON array of [`FunctionDescriptor`]s as produced by the
//! source scanner. A session config carries the policy, per-function type
//! tags and range hints, keyed by signature (`name@file`).
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ManifestError, SessionError};
use crate::model::{FunctionDescriptor, RangeHint, TypeSpec};
use crate::render::DialectKind;
use crate::session::{Bound, Session};

static JS_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap());

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(default)]
    pub policy: Option<PolicyConfig>,
    /// signature → parameter → type name
    #[serde(default)]
    pub types: BTreeMap<String, BTreeMap<String, TypeSpec>>,
    /// signature → parameter → bounds
    #[serde(default)]
    pub ranges: BTreeMap<String, BTreeMap<String, RangeHint>>,
    #[serde(default)]
    pub dialect: Option<DialectKind>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default)]
    pub strategy: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub edge: Option<bool>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SessionConfig {
    /// Push every setting through the session setters. Entries the session
    /// rejects are returned and skipped; the rest still apply.
    pub fn apply(&self, session: &mut Session) -> Vec<SessionError> {
        let mut rejected = Vec::new();
        if let Some(policy) = &self.policy {
            if let Some(strategy) = &policy.strategy {
                if let Err(e) = session.set_strategy(strategy) {
                    rejected.push(e.into());
                }
            }
            if let Some(count) = policy.count {
                session.set_count(count);
            }
            if let Some(edge) = policy.edge {
                session.set_edge_round(edge);
            }
        }
        for (signature, params) in &self.types {
            for (param, spec) in params {
                if let Err(e) = session.set_param_type(signature, param, *spec) {
                    rejected.push(e);
                }
            }
        }
        for (signature, params) in &self.ranges {
            for (param, hint) in params {
                for (bound, value) in [(Bound::Min, hint.min), (Bound::Max, hint.max)] {
                    if value.is_none() {
                        continue;
                    }
                    if let Err(e) = session.set_range_bound(signature, param, bound, value) {
                        rejected.push(e);
                        break;
                    }
                }
            }
        }
        rejected
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        format!("at JSON path {path} → {}", err.into_inner())
    })
}

/// Read every manifest matched by `patterns`, in order. Functions whose name
/// cannot be imported as a JS binding are dropped with a warning.
pub fn load_functions<I>(patterns: I) -> Result<Vec<FunctionDescriptor>, ManifestError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = Vec::new();
    for path in resolve_file_path_patterns(patterns)? {
        let functions: Vec<FunctionDescriptor> = read_json(&path)?;
        debug!(path = %path.display(), functions = functions.len(), "loaded manifest");
        for function in functions {
            if !is_js_identifier(&function.name) {
                warn!(name = %function.name, file = %function.file, "skipping function with a non-identifier name");
                continue;
            }
            out.push(function);
        }
    }
    Ok(out)
}

pub fn load_config(path: &Path) -> Result<SessionConfig, ManifestError> {
    read_json(path)
}

pub fn is_js_identifier(name: &str) -> bool {
    JS_IDENTIFIER.is_match(name)
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ManifestError> {
    let source = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_path(&source).map_err(|message| ManifestError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>, ManifestError>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();
    for raw in patterns {
        let pattern = raw.as_ref();
        if has_glob_chars(pattern) {
            let before = out.len();
            for entry in glob::glob(pattern)? {
                out.push(entry?);
            }
            if out.len() == before {
                return Err(ManifestError::NoMatches(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }
    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Strategy, TypeTag};

    #[test]
    fn identifiers() {
        assert!(is_js_identifier("add"));
        assert!(is_js_identifier("$el"));
        assert!(is_js_identifier("_private2"));
        assert!(!is_js_identifier("2fast"));
        assert!(!is_js_identifier("my-fn"));
        assert!(!is_js_identifier(""));
    }

    #[test]
    fn parse_errors_carry_the_json_path() {
        let err = from_str_with_path::<SessionConfig>(r#"{"policy":{"count":"three"}}"#).unwrap_err();
        assert!(err.starts_with("at JSON path policy.count"), "{err}");
        assert!(from_str_with_path::<SessionConfig>(r#"{"colour":1}"#).is_err());
    }

    #[test]
    fn config_applies_through_setters_and_reports_rejections() {
        let mut session = Session::new();
        let sig = session.register(FunctionDescriptor::new("add", "math.js", &["a", "b"]));
        let config: SessionConfig = from_str_with_path(
            r#"{
                "policy": {"strategy": "EdgeCase", "count": 2, "edge": true},
                "types": {"add@math.js": {"a": "Number", "b": "all"}, "gone@x.js": {"a": "Date"}},
                "ranges": {"add@math.js": {"a": {"min": 1, "max": 9}, "z": {"min": 0}}},
                "dialect": "jest"
            }"#,
        )
        .unwrap();
        let rejected = config.apply(&mut session);
        assert_eq!(rejected.len(), 3);
        assert_eq!(session.policy().strategy, Strategy::Uniform);
        assert_eq!(session.policy().count, 2);
        assert!(session.policy().include_edge_round);
        let types = session.assignment(&sig).unwrap();
        assert_eq!(types.get("a"), Some(TypeSpec::Tag(TypeTag::Number)));
        assert_eq!(types.get("b"), Some(TypeSpec::Any));
        assert_eq!(session.range_hints(&sig).unwrap()["a"], RangeHint::new(Some(1.0), Some(9.0)));
        assert_eq!(config.dialect, Some(DialectKind::Jest));
    }
}
