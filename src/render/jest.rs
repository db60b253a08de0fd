use std::fmt::Write;

use super::{Dialect, ModuleImport, case_title, js, suite_title};
use crate::ir::{Case, Suite};
use crate::model::FunctionDescriptor;

/// Jest with global `describe`/`test`/`expect`. Two-space indents.
pub struct Jest;

impl Dialect for Jest {
    fn name(&self) -> &'static str {
        "jest"
    }

    fn preamble(&self, imports: &[ModuleImport]) -> String {
        let mut out = String::new();
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
        let _ = writeln!(out, "  test({}, () => {{", js::title(&case_title(&case.label)));
        out.push_str("    let error = false;\n");
        for binding in &case.bindings {
            let _ = writeln!(out, "    const {} = {};", binding.ident, js::literal(&binding.value));
        }
        out.push('\n');
        out.push_str("    try {\n");
        let _ = writeln!(out, "      {}({});", case.invocation.callee, case.invocation.args.join(", "));
        out.push_str("    } catch (e) {\n");
        let _ = writeln!(out, "      expect(e.message).toBe({});", js::title(case.expectation.sentinel));
        out.push_str("    }\n");
        out.push_str("    expect(error).toBe(false);\n");
        out.push_str("  });");
        out
    }

    fn suite(&self, suite: &Suite) -> String {
        let mut cases = suite.cases.iter().map(|c| self.case(c)).collect::<Vec<_>>();
        cases.extend(suite.authored.iter().cloned());
        format!(
            "describe({}, () => {{\n{}\n}});",
            js::title(&suite_title(&suite.function, &suite.parameters)),
            cases.join("\n\n"),
        )
    }

    fn template(&self, function: &FunctionDescriptor) -> String {
        let args = function.parameters.iter().map(|p| format!("i{p}")).collect::<Vec<_>>();
        let mut out = String::new();
        let _ = writeln!(
            out,
            "describe({}, () => {{",
            js::title(&suite_title(&function.name, &function.parameters))
        );
        let _ = writeln!(out, "  test({}, () => {{", js::title(&format!("{} should return (value)", function.name)));
        for arg in &args {
            let _ = writeln!(out, "    const {arg} = newValue;");
        }
        out.push('\n');
        let _ = writeln!(out, "    const result = {}({});", function.name, args.join(", "));
        out.push_str("    expect(result).toBe(value);\n");
        out.push_str("  });\n");
        out.push_str("});");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose_no_args;

    #[test]
    fn case_uses_expect_and_the_sentinel() {
        let f = FunctionDescriptor::new("boot", "app.js", &[]);
        let text = Jest.case(&compose_no_args(&f));
        assert!(text.starts_with("  test('boot should handle with no error', () => {\n"));
        assert!(text.contains("      boot();\n"));
        assert!(text.contains("expect(e.message).toBe('Error');"));
        assert!(text.ends_with("    expect(error).toBe(false);\n  });"));
    }

    #[test]
    fn preamble_has_no_assertion_import() {
        let imports = vec![ModuleImport { file: "lib/a.js".into(), functions: vec!["f".into()] }];
        assert_eq!(Jest.preamble(&imports), "const { f } = require('./lib/a.js');\n");
    }
}
