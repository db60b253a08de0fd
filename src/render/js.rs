//! JavaScript literal forms shared by the JS dialects.
use std::path::{Component, Path, PathBuf};

use serde_json::Value as Json;

use crate::value::{ArrayValue, DateValue, MapValue, ObjectValue, SetValue, Value, iso_timestamp};

/// Right-hand side of a binding for `value`.
pub fn literal(value: &Value) -> String {
    match value {
        Value::Number(n) => number(*n),
        Value::String(s) => string(s),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "null".into(),
        Value::Undefined => "undefined".into(),

        Value::Array(ArrayValue::Items(_)) => value.to_json().to_string(),
        Value::Array(ArrayValue::Filled { len, item }) => format!("new Array({len}).fill({})", literal(item)),

        Value::Object(ObjectValue::Entries(_)) => value.to_json().to_string(),
        Value::Object(ObjectValue::Inherited { proto: None }) => "Object.create(Object.prototype)".into(),
        Value::Object(ObjectValue::Inherited { proto: Some(proto) }) => {
            format!("Object.create({})", Value::Object(ObjectValue::Entries(proto.clone())).to_json())
        }
        Value::Object(ObjectValue::SelfReferential { key }) => {
            format!("(() => {{ const o = {{}}; o[{}] = o; return o; }})()", string(key))
        }

        Value::Date(DateValue::Instant(at)) => format!("new Date({})", string(&iso_timestamp(at))),
        Value::Date(DateValue::Text(raw)) => format!("new Date({})", string(raw)),

        Value::Error(e) => e.source(),

        // collections are rebuilt from their structural form at the call site
        Value::Map(MapValue::Entries(_)) => format!("new Map(JSON.parse({}))", string(&value.to_json().to_string())),
        Value::Map(MapValue::Counting { len }) => {
            format!("new Map(Array.from({{ length: {len} }}, (_, i) => [i, i]))")
        }
        Value::Map(MapValue::Circular) => {
            "(() => { const a = {}; const b = {}; a.b = b; b.a = a; return new Map([[a, b]]); })()".into()
        }
        Value::Set(SetValue::Items(_)) => format!("new Set(JSON.parse({}))", string(&value.to_json().to_string())),
        Value::Set(SetValue::Counting { len }) => format!("new Set(Array.from({{ length: {len} }}, (_, i) => i))"),
        Value::Set(SetValue::Circular) => "(() => { const o = {}; o.ref = o; return new Set([o]); })()".into(),
    }
}

pub fn number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".into() } else { "-Infinity".into() }
    } else {
        // `Display` never uses exponents and drops a trailing `.0`
        n.to_string()
    }
}

/// Double-quoted string literal. JSON string syntax is valid JS.
pub fn string(s: &str) -> String {
    Json::from(s).to_string()
}

/// Single-quoted literal for test titles.
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Import specifier for a scanned file, relative to the generated test.
pub fn module_path(file: &str) -> String {
    let file = file.replace('\\', "/");
    if file.starts_with("./") || file.starts_with("../") || file.starts_with('/') {
        file
    } else {
        format!("./{file}")
    }
}

/// `file` (relative to the working directory) as seen from `dir`. Falls back
/// to `file` unchanged when `dir` climbs above a part of the path it cannot
/// see, or only one of the two is absolute.
pub fn relative_to(file: &str, dir: &Path) -> String {
    let file_path = normalize(Path::new(&file.replace('\\', "/")));
    let dir = normalize(dir);
    if file_path.has_root() != dir.has_root() {
        return file.to_string();
    }
    let common = file_path.components().zip(dir.components()).take_while(|(a, b)| a == b).count();
    let mut out = PathBuf::new();
    for c in dir.components().skip(common) {
        if c == Component::ParentDir {
            return file.to_string();
        }
        out.push("..");
    }
    for c in file_path.components().skip(common) {
        out.push(c);
    }
    out.to_string_lossy().replace('\\', "/")
}

fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| *c != Component::CurDir).collect()
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ErrorKind, ErrorValue};
    use chrono::DateTime;

    #[test]
    fn scalars() {
        assert_eq!(literal(&Value::Number(437.0)), "437");
        assert_eq!(literal(&Value::Number(12.5)), "12.5");
        assert_eq!(literal(&Value::Number(9_007_199_254_740_991.0)), "9007199254740991");
        assert_eq!(literal(&Value::Number(f64::NAN)), "NaN");
        assert_eq!(literal(&Value::string("it's \"x\"")), r#""it's \"x\"""#);
        assert_eq!(literal(&Value::Boolean(false)), "false");
        assert_eq!(literal(&Value::Undefined), "undefined");
    }

    #[test]
    fn composites_go_through_their_structural_form() {
        let arr = Value::items(vec![Value::Number(1.0), Value::string("a"), Value::Undefined]);
        assert_eq!(literal(&arr), r#"[1,"a",null]"#);
        let obj = Value::object([("k", Value::Boolean(true))]);
        assert_eq!(literal(&obj), r#"{"k":true}"#);
        let map = Value::Map(MapValue::Entries(vec![(Value::string("k"), Value::Number(2.0))]));
        assert_eq!(literal(&map), r#"new Map(JSON.parse("[[\"k\",2]]"))"#);
        let set = Value::Set(SetValue::Items(vec![Value::Number(1.0), Value::Number(2.0)]));
        assert_eq!(literal(&set), r#"new Set(JSON.parse("[1,2]"))"#);
    }

    #[test]
    fn dates_and_errors() {
        let at = DateTime::from_timestamp_millis(0).unwrap();
        assert_eq!(literal(&Value::Date(DateValue::Instant(at))), r#"new Date("1970-01-01T00:00:00.000Z")"#);
        assert_eq!(literal(&Value::Date(DateValue::Text("invalid date".into()))), r#"new Date("invalid date")"#);
        let e = Value::Error(ErrorValue::new(ErrorKind::ReferenceError, "Reference Error"));
        assert_eq!(literal(&e), r#"new ReferenceError("Reference Error")"#);
    }

    #[test]
    fn shapes_without_a_literal_form() {
        let big = Value::Array(ArrayValue::Filled { len: 3, item: Box::new(Value::string("edge")) });
        assert_eq!(literal(&big), r#"new Array(3).fill("edge")"#);
        assert_eq!(literal(&Value::Object(ObjectValue::Inherited { proto: None })), "Object.create(Object.prototype)");
        let cyclic = literal(&Value::Object(ObjectValue::SelfReferential { key: "self".into() }));
        assert!(cyclic.contains(r#"o["self"] = o"#));
        assert_eq!(
            literal(&Value::Set(SetValue::Counting { len: 5 })),
            "new Set(Array.from({ length: 5 }, (_, i) => i))"
        );
    }

    #[test]
    fn titles_escape_quotes() {
        assert_eq!(title("it's"), r"'it\'s'");
    }

    #[test]
    fn module_paths_are_relative() {
        assert_eq!(module_path("src/math.js"), "./src/math.js");
        assert_eq!(module_path("../lib/a.js"), "../lib/a.js");
        assert_eq!(module_path(r"src\win.js"), "./src/win.js");
    }

    #[test]
    fn imports_resolve_from_the_output_directory() {
        assert_eq!(relative_to("src/math.js", Path::new("")), "src/math.js");
        assert_eq!(relative_to("src/math.js", Path::new("test/unit")), "../../src/math.js");
        assert_eq!(relative_to("./src/math.js", Path::new("src")), "math.js");
        assert_eq!(relative_to("src/lib/a.js", Path::new("src/test")), "../lib/a.js");
        assert_eq!(module_path(&relative_to("src/math.js", Path::new("test"))), "../src/math.js");
        assert_eq!(relative_to("src/a.js", Path::new("../out")), "src/a.js");
    }
}
