// Structured test cases. No source text here; dialects in `render` own that.

use crate::model::{Strategy, TypeTag};
use crate::value::Value;

/// Message a thrown failure must carry for a case to pass.
pub const ERROR_SENTINEL: &str = "Error";

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub label: Label,
    pub bindings: Vec<Binding>,
    pub invocation: Invocation,
    pub expectation: Expectation,
}

/// What the case title is built from. Display only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub function: String,
    pub parameters: Vec<String>,
    pub tags: Vec<TypeTag>,
    pub kind: CaseKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseKind {
    NoArgs,
    Generated(Strategy),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub ident: String,   // case-local, unique within the case
    pub tag: TypeTag,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub callee: String,
    pub args: Vec<String>, // binding idents, parameter order
}

/// Guarded call: a thrown failure must have `sentinel` as its message, and
/// the case's failure flag must still be clear afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expectation {
    pub sentinel: &'static str,
}

impl Default for Expectation {
    fn default() -> Self {
        Self { sentinel: ERROR_SENTINEL }
    }
}

/// All cases for one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Suite {
    pub function: String,
    pub parameters: Vec<String>,
    pub cases: Vec<Case>,
    /// Hand-written case text, emitted verbatim after the generated cases.
    pub authored: Vec<String>,
}
