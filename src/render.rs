//! Text rendering of cases and suites, one [`Dialect`] per test framework.
pub mod jest;
pub mod js;
pub mod mocha;

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ir::{Case, CaseKind, Label, Suite};
use crate::model::{FunctionDescriptor, Strategy};

pub use jest::Jest;
pub use mocha::Mocha;

/// Functions one generated file imports from one scanned source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    pub file: String,
    pub functions: Vec<String>,
}

pub trait Dialect {
    fn name(&self) -> &'static str;

    /// Assertion import plus one import per source file.
    fn preamble(&self, imports: &[ModuleImport]) -> String;

    fn case(&self, case: &Case) -> String;

    /// Grouping block around every case of one function.
    fn suite(&self, suite: &Suite) -> String;

    /// Hand-authoring skeleton with placeholder values and expectation.
    fn template(&self, function: &FunctionDescriptor) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Mocha,
    Jest,
}

impl DialectKind {
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Mocha => &Mocha,
            DialectKind::Jest => &Jest,
        }
    }
}

/// Group functions by source file, both in first-seen order.
pub fn collect_imports(functions: &[FunctionDescriptor]) -> Vec<ModuleImport> {
    let mut by_file: IndexMap<&str, Vec<String>> = IndexMap::new();
    for f in functions {
        let names = by_file.entry(f.file.as_str()).or_default();
        if !names.contains(&f.name) {
            names.push(f.name.clone());
        }
    }
    by_file
        .into_iter()
        .map(|(file, functions)| ModuleImport { file: file.to_string(), functions })
        .collect()
}

/// Rewrite import files so they resolve from `dir`, the directory the
/// generated test file is written to.
pub fn rebase_imports(imports: Vec<ModuleImport>, dir: &Path) -> Vec<ModuleImport> {
    imports
        .into_iter()
        .map(|import| ModuleImport { file: js::relative_to(&import.file, dir), ..import })
        .collect()
}

/// Human-readable case title.
pub fn case_title(label: &Label) -> String {
    let tags = label.tags.iter().map(|t| t.name()).collect::<Vec<_>>().join(",");
    let params = label.parameters.join(",");
    match label.kind {
        CaseKind::NoArgs => format!("{} should handle with no error", label.function),
        CaseKind::Generated(Strategy::Uniform) => {
            format!("{} should handle {tags} for {params}", label.function)
        }
        CaseKind::Generated(Strategy::EdgeCase) => {
            format!("{} should handle edge cases with {tags} for {params}", label.function)
        }
        CaseKind::Generated(Strategy::NormalCurve) => format!(
            "{} should handle cases with {tags} for {params}, generated using Box-Muller Transform",
            label.function
        ),
    }
}

/// Grouping-block title: `#name(p1,p2)`.
pub fn suite_title(function: &str, parameters: &[String]) -> String {
    format!("#{}({})", function, parameters.join(","))
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TypeTag;

    #[test]
    fn imports_group_by_file_in_first_seen_order() {
        let fs = vec![
            FunctionDescriptor::new("b", "two.js", &[]),
            FunctionDescriptor::new("a", "one.js", &[]),
            FunctionDescriptor::new("c", "two.js", &[]),
            FunctionDescriptor::new("b", "two.js", &[]),
        ];
        assert_eq!(collect_imports(&fs), vec![
            ModuleImport { file: "two.js".into(), functions: vec!["b".into(), "c".into()] },
            ModuleImport { file: "one.js".into(), functions: vec!["a".into()] },
        ]);
    }

    #[test]
    fn rebased_imports_keep_their_functions() {
        let fs = vec![FunctionDescriptor::new("add", "src/math.js", &[])];
        let rebased = rebase_imports(collect_imports(&fs), Path::new("test"));
        assert_eq!(rebased, vec![ModuleImport { file: "../src/math.js".into(), functions: vec!["add".into()] }]);
    }

    #[test]
    fn titles_embed_name_and_concrete_tags() {
        let label = Label {
            function: "add".into(),
            parameters: vec!["a".into(), "b".into()],
            tags: vec![TypeTag::Number, TypeTag::String],
            kind: CaseKind::Generated(Strategy::Uniform),
        };
        assert_eq!(case_title(&label), "add should handle Number,String for a,b");
        let edge = Label { kind: CaseKind::Generated(Strategy::EdgeCase), ..label.clone() };
        assert_eq!(case_title(&edge), "add should handle edge cases with Number,String for a,b");
        assert_eq!(suite_title("add", &label.parameters), "#add(a,b)");
    }

    #[test]
    fn dialect_kinds_parse_lowercase() {
        let k: DialectKind = serde_json::from_str("\"jest\"").unwrap();
        assert_eq!(k.dialect().name(), "jest");
        assert_eq!(DialectKind::default().dialect().name(), "mocha");
    }
}
