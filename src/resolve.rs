//! Resolves `Any` parameters to concrete tags for one generation round.
use rand::{Rng, RngCore};

use crate::model::{ParameterTypeAssignment, TypeSpec, TypeTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedParam {
    pub name: String,
    pub tag: TypeTag,
}

/// Resolve against the full closed set.
pub fn resolve(assignment: &ParameterTypeAssignment, rng: &mut dyn RngCore) -> Vec<ResolvedParam> {
    resolve_within(assignment, &TypeTag::ALL, rng)
}

/// Resolve with `Any` drawn from `universe`. Concrete tags pass through
/// untouched, even when outside `universe`. Nothing is cached: the same
/// `Any` parameter may resolve differently on the next call.
pub fn resolve_within(
    assignment: &ParameterTypeAssignment,
    universe: &[TypeTag],
    rng: &mut dyn RngCore,
) -> Vec<ResolvedParam> {
    assignment
        .iter()
        .map(|(name, spec)| ResolvedParam {
            name: name.to_string(),
            tag: match spec {
                TypeSpec::Tag(tag) => tag,
                TypeSpec::Any => draw_tag(universe, rng),
            },
        })
        .collect()
}

/// Uniform draw from `universe`; an empty universe means the full set.
pub fn draw_tag(universe: &[TypeTag], rng: &mut dyn RngCore) -> TypeTag {
    let universe = if universe.is_empty() { &TypeTag::ALL[..] } else { universe };
    universe[rng.gen_range(0..universe.len())]
}

// ------------------------------- Tests ------------------------------------ //
