use std::fmt::Write;

use super::{Dialect, ModuleImport, case_title, js, suite_title};
use crate::ir::{Case, Suite};
use crate::model::FunctionDescriptor;

/// Mocha with node's `assert`. Four-space indents.
pub struct Mocha;

impl Dialect for Mocha {
    fn name(&self) -> &'static str {
        "mocha"
    }

    fn preamble(&self, imports: &[ModuleImport]) -> String {
        let mut out = String::from("const assert = require('assert');\n");
        for import in imports {
            let _ = writeln!(
                out,
                "const {{ {} }} = require({});",
                import.functions.join(", "),
                js::title(&js::module_path(&import.file)),
            );
        }
        out
    }

    fn case(&self, case: &Case) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "    it({}, function() {{", js::title(&case_title(&case.label)));
        out.push_str("        let error = false;\n");
        for binding in &case.bindings {
            let _ = writeln!(out, "        let {} = {};", binding.ident, js::literal(&binding.value));
        }
        out.push('\n');
        out.push_str("        try {\n");
        let _ = writeln!(
            out,
            "            const result = {}({});",
            case.invocation.callee,
            case.invocation.args.join(", ")
        );
        out.push_str("        } catch (error) {\n");
        let _ = writeln!(out, "            assert.equal(error.message, {});", js::title(case.expectation.sentinel));
        out.push_str("        }\n");
        out.push_str("        assert.equal(error, false);\n");
        out.push_str("    });");
        out
    }

    fn suite(&self, suite: &Suite) -> String {
        let mut cases = suite.cases.iter().map(|c| self.case(c)).collect::<Vec<_>>();
        cases.extend(suite.authored.iter().cloned());
        format!(
            "describe({}, function() {{\n{}\n}});",
            js::title(&suite_title(&suite.function, &suite.parameters)),
            cases.join("\n\n"),
        )
    }

    fn template(&self, function: &FunctionDescriptor) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "describe({}, function() {{",
            js::title(&suite_title(&function.name, &function.parameters))
        );
        let _ = writeln!(
            out,
            "    it({}, function() {{",
            js::title(&format!("{} should return (value)", function.name))
        );
        let args = function.parameters.iter().map(|p| format!("i{p}")).collect::<Vec<_>>();
        for arg in &args {
            let _ = writeln!(out, "        const {arg} = newValue;");
        }
        out.push('\n');
        let _ = writeln!(out, "        const result = {}({});", function.name, args.join(", "));
        out.push_str("        assert.equal(result, value);\n");
        out.push_str("    });\n");
        out.push_str("});");
        out
    }
}

// ------------------------------- Tests ------------------------------------ //
