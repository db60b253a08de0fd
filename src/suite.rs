//! Suite generation: policy-driven rounds of resolve → synthesize → compose
//! for one function.
use rand::RngCore;
use tracing::{info, warn};

use crate::compose::{compose, compose_no_args};
use crate::ir::{Case, Suite};
use crate::model::{FunctionDescriptor, GenerationPolicy, ParameterTypeAssignment, RangeHints, Strategy, TypeTag};
use crate::resolve::{resolve, resolve_within};

/// Build every case for `function` under `policy`.
///
/// - No (or an empty) assignment: exactly one no-argument case.
/// - Otherwise `policy.count` primary rounds, then `policy.count` edge rounds
///   when the edge round is enabled.
/// - Normal-curve rounds whose resolved types leave the normal-curve subset
///   produce no case; the suite simply comes out shorter.
pub fn generate(
    function: &FunctionDescriptor,
    assignment: Option<&ParameterTypeAssignment>,
    policy: &GenerationPolicy,
    ranges: &RangeHints,
    rng: &mut dyn RngCore,
) -> Suite {
    let mut suite = Suite {
        function: function.name.clone(),
        parameters: function.parameters.clone(),
        cases: Vec::new(),
        authored: Vec::new(),
    };

    let assignment = match assignment {
        Some(a) if !a.is_empty() => a,
        _ => {
            suite.cases.push(compose_no_args(function));
            return suite;
        }
    };

    for _ in 0..policy.count {
        if let Some(case) = primary_round(function, assignment, policy.strategy, ranges, rng) {
            suite.cases.push(case);
        }
    }

    if policy.include_edge_round {
        for _ in 0..policy.count {
            let params = resolve(assignment, rng);
            suite.cases.push(compose(function, &params, Strategy::EdgeCase, ranges, rng));
        }
    }

    info!(
        function = %function.signature(),
        cases = suite.cases.len(),
        strategy = %policy.strategy,
        edge = policy.include_edge_round,
        "generated suite"
    );
    suite
}

fn primary_round(
    function: &FunctionDescriptor,
    assignment: &ParameterTypeAssignment,
    strategy: Strategy,
    ranges: &RangeHints,
    rng: &mut dyn RngCore,
) -> Option<Case> {
    match strategy {
        Strategy::NormalCurve => {
            let params = resolve_within(assignment, &TypeTag::NORMAL_CURVE, rng);
            if let Some(bad) = params.iter().find(|p| !p.tag.supports_normal_curve()) {
                warn!(
                    function = %function.signature(),
                    parameter = %bad.name,
                    tag = %bad.tag,
                    "type not supported for normal curve generation, round skipped"
                );
                return None;
            }
            Some(compose(function, &params, strategy, ranges, rng))
        }
        _ => {
            let params = resolve(assignment, rng);
            Some(compose(function, &params, strategy, ranges, rng))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
