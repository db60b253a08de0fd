use rand::RngCore;
use tracing::debug;

use crate::ir::{Binding, Case, CaseKind, Expectation, Invocation, Label};
use crate::model::{FunctionDescriptor, RangeHints, Strategy, TypeTag};
use crate::resolve::ResolvedParam;
use crate::synth::Synth;

/// Lower one resolved parameter set into a case: one binding per parameter,
/// in order, then the guarded call.
pub fn compose(
    function: &FunctionDescriptor,
    params: &[ResolvedParam],
    strategy: Strategy,
    ranges: &RangeHints,
    rng: &mut dyn RngCore,
) -> Case {
    if params.is_empty() {
        return compose_no_args(function);
    }

    let mut synth = Synth::new(rng);
    let bindings = params
        .iter()
        .enumerate()
        .map(|(counter, param)| Binding {
            ident: binding_ident(param.tag, counter),
            tag: param.tag,
            value: synth.value(param.tag, strategy, ranges.get(&param.name)),
        })
        .collect::<Vec<_>>();

    let invocation = Invocation {
        callee: function.name.clone(),
        args: bindings.iter().map(|b| b.ident.clone()).collect(),
    };
    debug!(function = %function.name, args = ?invocation.args, %strategy, "composed case");

    Case {
        label: Label {
            function: function.name.clone(),
            parameters: function.parameters.clone(),
            tags: params.iter().map(|p| p.tag).collect(),
            kind: CaseKind::Generated(strategy),
        },
        bindings,
        invocation,
        expectation: Expectation::default(),
    }
}

/// Call with no arguments and expect no failure.
pub fn compose_no_args(function: &FunctionDescriptor) -> Case {
    Case {
        label: Label {
            function: function.name.clone(),
            parameters: function.parameters.clone(),
            tags: Vec::new(),
            kind: CaseKind::NoArgs,
        },
        bindings: Vec::new(),
        invocation: Invocation { callee: function.name.clone(), args: Vec::new() },
        expectation: Expectation::default(),
    }
}

// tag plus position keeps idents unique when tags repeat
fn binding_ident(tag: TypeTag, counter: usize) -> String {
    format!("i{}{}", tag.name(), counter)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ERROR_SENTINEL;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(tags: &[TypeTag]) -> Vec<ResolvedParam> {
        tags.iter()
            .enumerate()
            .map(|(i, &tag)| ResolvedParam { name: format!("p{i}"), tag })
            .collect()
    }

    #[test]
    fn bindings_and_arguments_follow_parameter_count() {
        let mut rng = StdRng::seed_from_u64(42);
        let cases: [&[TypeTag]; 3] = [
            &[],
            &[TypeTag::Number],
            &[TypeTag::Number, TypeTag::String, TypeTag::Boolean, TypeTag::Date, TypeTag::Map],
        ];
        for tags in cases {
            let names: Vec<String> = (0..tags.len()).map(|i| format!("p{i}")).collect();
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let f = FunctionDescriptor::new("target", "lib.js", &names);
            let case = compose(&f, &params(tags), Strategy::Uniform, &RangeHints::new(), &mut rng);
            assert_eq!(case.bindings.len(), tags.len());
            assert_eq!(case.invocation.args.len(), tags.len());
            let idents: Vec<_> = case.bindings.iter().map(|b| b.ident.clone()).collect();
            assert_eq!(case.invocation.args, idents);
            assert_eq!(case.bindings.iter().map(|b| b.tag).collect::<Vec<_>>(), tags.to_vec());
            assert_eq!(case.expectation.sentinel, ERROR_SENTINEL);
        }
    }

    #[test]
    fn repeated_tags_get_distinct_idents() {
        let mut rng = StdRng::seed_from_u64(1);
        let f = FunctionDescriptor::new("pair", "lib.js", &["a", "b"]);
        let case = compose(&f, &params(&[TypeTag::Number, TypeTag::Number]), Strategy::Uniform, &RangeHints::new(), &mut rng);
        assert_eq!(case.invocation.args, vec!["iNumber0", "iNumber1"]);
    }

    #[test]
    fn range_hints_are_matched_by_parameter_name() {
        let mut rng = StdRng::seed_from_u64(6);
        let f = FunctionDescriptor::new("scale", "lib.js", &["p0"]);
        let mut ranges = RangeHints::new();
        ranges.insert("p0".into(), crate::model::RangeHint::new(Some(500.0), Some(501.0)));
        for _ in 0..200 {
            let case = compose(&f, &params(&[TypeTag::Number]), Strategy::NormalCurve, &ranges, &mut rng);
            match case.bindings[0].value {
                crate::value::Value::Number(n) => assert!((500.0..=501.0).contains(&n)),
                ref other => panic!("{other:?}"),
            }
        }
    }

    #[test]
    fn empty_params_make_the_no_arg_case() {
        let mut rng = StdRng::seed_from_u64(0);
        let f = FunctionDescriptor::new("tick", "lib.js", &[]);
        let case = compose(&f, &[], Strategy::Uniform, &RangeHints::new(), &mut rng);
        assert_eq!(case.label.kind, CaseKind::NoArgs);
        assert!(case.invocation.args.is_empty());
    }
}
