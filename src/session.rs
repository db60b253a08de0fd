//! Session-scoped state: scanned functions plus everything keyed by their
//! signature (type assignments, range hints, stored tests), and the policy.
use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::{PolicyError, SessionError};
use crate::ir::Suite;
use crate::model::{
    FunctionDescriptor, GenerationPolicy, ParameterTypeAssignment, RangeHint, RangeHints, Strategy, TypeSpec,
};
use crate::render::{Dialect, collect_imports, rebase_imports};
use crate::suite;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Min,
    Max,
}

#[derive(Debug, Default)]
pub struct Session {
    functions: IndexMap<String, FunctionDescriptor>,
    types: HashMap<String, ParameterTypeAssignment>,
    ranges: HashMap<String, RangeHints>,
    tests: HashMap<String, Vec<String>>,
    policy: GenerationPolicy,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scanned function and return its signature. Parameters start
    /// out as `Any`; re-registering keeps tags of parameters that survived.
    pub fn register(&mut self, function: FunctionDescriptor) -> String {
        let signature = function.signature();
        let previous = self.types.remove(&signature);
        let mut assignment = ParameterTypeAssignment::for_parameters(&function.parameters);
        if let Some(previous) = previous {
            for (name, spec) in previous.iter() {
                if assignment.get(name).is_some() {
                    assignment.set(name, spec);
                }
            }
        }
        self.types.insert(signature.clone(), assignment);
        self.functions.insert(signature.clone(), function);
        debug!(%signature, "registered function");
        signature
    }

    pub fn register_all(&mut self, functions: impl IntoIterator<Item = FunctionDescriptor>) {
        for f in functions {
            self.register(f);
        }
    }

    /// Functions in registration order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDescriptor> {
        self.functions.values()
    }

    pub fn function(&self, signature: &str) -> Option<&FunctionDescriptor> {
        self.functions.get(signature)
    }

    pub fn assignment(&self, signature: &str) -> Option<&ParameterTypeAssignment> {
        self.types.get(signature)
    }

    pub fn range_hints(&self, signature: &str) -> Option<&RangeHints> {
        self.ranges.get(signature)
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    // ---------------------------------------------------------------------------
    // Setters
    // ---------------------------------------------------------------------------

    pub fn set_param_type(&mut self, signature: &str, parameter: &str, spec: TypeSpec) -> Result<(), SessionError> {
        self.check_parameter(signature, parameter).inspect_err(|e| warn!("{e}"))?;
        if let Some(assignment) = self.types.get_mut(signature) {
            assignment.set(parameter, spec);
        }
        Ok(())
    }

    /// Set or clear one bound of a parameter's range hint.
    pub fn set_range_bound(
        &mut self,
        signature: &str,
        parameter: &str,
        bound: Bound,
        value: Option<f64>,
    ) -> Result<(), SessionError> {
        self.check_parameter(signature, parameter).inspect_err(|e| warn!("{e}"))?;
        let hint = self
            .ranges
            .entry(signature.to_string())
            .or_default()
            .entry(parameter.to_string())
            .or_insert_with(RangeHint::default);
        match bound {
            Bound::Min => hint.min = value,
            Bound::Max => hint.max = value,
        }
        Ok(())
    }

    /// Accepts `Uniform` or `NormalCurve`; anything else leaves the policy as it was.
    pub fn set_strategy(&mut self, raw: &str) -> Result<(), PolicyError> {
        match raw.parse::<Strategy>() {
            Ok(strategy) => {
                self.policy.strategy = strategy;
                Ok(())
            }
            Err(e) => {
                warn!("{e}; keeping {}", self.policy.strategy);
                Err(e)
            }
        }
    }

    pub fn set_count(&mut self, count: usize) {
        self.policy.count = count;
    }

    pub fn set_edge_round(&mut self, enabled: bool) {
        self.policy.include_edge_round = enabled;
    }

    // ---------------------------------------------------------------------------
    // Authored tests
    // ---------------------------------------------------------------------------

    pub fn store_test(&mut self, signature: &str, text: impl Into<String>) -> Result<(), SessionError> {
        if !self.functions.contains_key(signature) {
            return Err(SessionError::UnknownFunction(signature.to_string()));
        }
        self.tests.entry(signature.to_string()).or_default().push(text.into());
        Ok(())
    }

    pub fn tests_for(&self, signature: &str) -> &[String] {
        self.tests.get(signature).map(Vec::as_slice).unwrap_or(&[])
    }

    // ---------------------------------------------------------------------------
    // Generation
    // ---------------------------------------------------------------------------

    pub fn generate_suite(&self, signature: &str, rng: &mut dyn RngCore) -> Option<Suite> {
        let function = self.functions.get(signature)?;
        let ranges = self.ranges.get(signature).cloned().unwrap_or_default();
        let mut suite = suite::generate(function, self.types.get(signature), &self.policy, &ranges, rng);
        suite.authored = self.tests_for(signature).to_vec();
        Some(suite)
    }

    /// One grouping block per function, in registration order.
    pub fn generate(&self, dialect: &dyn Dialect, rng: &mut dyn RngCore) -> String {
        self.functions
            .keys()
            .filter_map(|signature| self.generate_suite(signature, rng))
            .map(|suite| dialect.suite(&suite))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Preamble followed by every grouping block, for a file written to the
    /// working directory.
    pub fn generate_file(&self, dialect: &dyn Dialect, rng: &mut dyn RngCore) -> String {
        self.generate_file_in(dialect, Path::new(""), rng)
    }

    /// Like [`Session::generate_file`], with imports resolved from `dir`.
    pub fn generate_file_in(&self, dialect: &dyn Dialect, dir: &Path, rng: &mut dyn RngCore) -> String {
        let functions = self.functions.values().cloned().collect::<Vec<_>>();
        let mut out = dialect.preamble(&rebase_imports(collect_imports(&functions), dir));
        out.push('\n');
        out.push_str(&self.generate(dialect, rng));
        out.push('\n');
        out
    }

    fn check_parameter(&self, signature: &str, parameter: &str) -> Result<(), SessionError> {
        let function = self
            .functions
            .get(signature)
            .ok_or_else(|| SessionError::UnknownFunction(signature.to_string()))?;
        if !function.parameters.iter().any(|p| p == parameter) {
            return Err(SessionError::UnknownParameter {
                signature: signature.to_string(),
                parameter: parameter.to_string(),
            });
        }
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeTag;
    use crate::render::Mocha;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn session() -> (Session, String) {
        let mut s = Session::new();
        let sig = s.register(FunctionDescriptor::new("add", "src/math.js", &["a", "b"]));
        (s, sig)
    }

    #[test]
    fn registration_seeds_any_per_parameter() {
        let (s, sig) = session();
        assert_eq!(sig, "add@src/math.js");
        let a = s.assignment(&sig).unwrap();
        assert_eq!(a.len(), 2);
        assert!(a.iter().all(|(_, spec)| spec == TypeSpec::Any));
    }

    #[test]
    fn invalid_strategy_keeps_previous_policy() {
        let (mut s, _) = session();
        s.set_strategy("NormalCurve").unwrap();
        s.set_count(4);
        assert!(s.set_strategy("random").is_err());
        assert!(s.set_strategy("EdgeCase").is_err());
        assert_eq!(s.policy().strategy, Strategy::NormalCurve);
        assert_eq!(s.policy().count, 4);
    }

    #[test]
    fn setters_reject_unknown_keys() {
        let (mut s, sig) = session();
        assert_eq!(
            s.set_param_type("nope@x.js", "a", TypeTag::Number.into()),
            Err(SessionError::UnknownFunction("nope@x.js".into()))
        );
        assert!(matches!(
            s.set_range_bound(&sig, "c", Bound::Min, Some(1.0)),
            Err(SessionError::UnknownParameter { .. })
        ));
        assert!(s.range_hints(&sig).is_none());
    }

    #[test]
    fn range_bounds_accumulate_per_parameter() {
        let (mut s, sig) = session();
        s.set_range_bound(&sig, "a", Bound::Min, Some(1.0)).unwrap();
        s.set_range_bound(&sig, "a", Bound::Max, Some(3.0)).unwrap();
        assert_eq!(s.range_hints(&sig).unwrap()["a"], RangeHint::new(Some(1.0), Some(3.0)));
    }

    #[test]
    fn re_registration_keeps_surviving_tags() {
        let (mut s, sig) = session();
        s.set_param_type(&sig, "a", TypeTag::Date.into()).unwrap();
        s.set_param_type(&sig, "b", TypeTag::Set.into()).unwrap();
        s.register(FunctionDescriptor::new("add", "src/math.js", &["a", "c"]));
        let a = s.assignment(&sig).unwrap();
        assert_eq!(a.get("a"), Some(TypeSpec::Tag(TypeTag::Date)));
        assert_eq!(a.get("c"), Some(TypeSpec::Any));
        assert_eq!(a.get("b"), None);
    }

    #[test]
    fn repeated_parameter_names_each_get_a_binding() {
        let mut s = Session::new();
        let sig = s.register(FunctionDescriptor::new("f", "a.js", &["a", "a"]));
        s.set_param_type(&sig, "a", TypeTag::Number.into()).unwrap();
        s.set_count(1);
        let suite = s.generate_suite(&sig, &mut StdRng::seed_from_u64(3)).unwrap();
        let case = &suite.cases[0];
        assert_eq!(case.bindings.len(), 2);
        assert!(case.bindings.iter().all(|b| b.tag == TypeTag::Number));
        assert_eq!(case.invocation.args, vec!["iNumber0", "iNumber1"]);
    }

    #[test]
    fn stored_tests_land_in_their_grouping_block() {
        let (mut s, sig) = session();
        s.register(FunctionDescriptor::new("now", "src/time.js", &[]));
        s.store_test(&sig, "    it('add is commutative', function() {});").unwrap();
        let text = s.generate(&Mocha, &mut StdRng::seed_from_u64(1));
        let add_block = &text[..text.find("describe('#now()'").unwrap()];
        assert!(add_block.contains("it('add is commutative'"));
        assert_eq!(text.matches("add is commutative").count(), 1);
    }

    #[test]
    fn file_imports_follow_the_output_directory() {
        let (s, _) = session();
        let text = s.generate_file_in(&Mocha, Path::new("test/unit"), &mut StdRng::seed_from_u64(1));
        assert!(text.contains("const { add } = require('../../src/math.js');"));
    }

    #[test]
    fn stored_tests_are_keyed_by_signature() {
        let (mut s, sig) = session();
        s.store_test(&sig, "it('x', () => {});").unwrap();
        assert_eq!(s.tests_for(&sig).len(), 1);
        assert!(s.tests_for("other@y.js").is_empty());
        assert!(s.store_test("other@y.js", "").is_err());
    }

    #[test]
    fn file_has_preamble_and_one_block_per_function() {
        let (mut s, sig) = session();
        s.register(FunctionDescriptor::new("now", "src/time.js", &[]));
        s.set_param_type(&sig, "a", TypeTag::Number.into()).unwrap();
        s.set_param_type(&sig, "b", TypeTag::String.into()).unwrap();
        s.set_count(2);
        let mut rng = StdRng::seed_from_u64(42);
        let text = s.generate_file(&Mocha, &mut rng);
        assert!(text.starts_with("const assert = require('assert');\n"));
        assert!(text.contains("const { add } = require('./src/math.js');"));
        assert!(text.contains("const { now } = require('./src/time.js');"));
        assert_eq!(text.matches("describe(").count(), 2);
        let add_at = text.find("describe('#add(a,b)'").unwrap();
        let now_at = text.find("describe('#now()'").unwrap();
        assert!(add_at < now_at);
        assert_eq!(text.matches("    it(").count(), 3);
    }
}
