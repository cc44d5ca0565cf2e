//! JSON parsing, rendering and navigation

use super::text;
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments, ParameterKind};
use crate::error::{ActionError, DecodeError};
use crate::format::{Format, Value};

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["jsoncompact", "minify"],
            "Minify/compact JSON from input",
            Format::Text,
            ActionFn::Text(compact_text),
        ),
        ActionDef::new(
            &["json"],
            "Parse a JSON document from input",
            Format::Json,
            ActionFn::Text(parse),
        )
        .parse(),
        ActionDef::new(
            &["compact"],
            "Render JSON on a single line",
            Format::Text,
            ActionFn::Json(compact),
        ),
        ActionDef::new(&["pretty"], "Render JSON indented", Format::Text, ActionFn::Json(pretty)),
        ActionDef::new(
            &["keys"],
            "List the keys of a JSON object",
            Format::TextList,
            ActionFn::Json(keys),
        ),
        ActionDef::new(
            &["get"],
            "Select a value by dot separated path",
            Format::Json,
            ActionFn::Json(get),
        )
        .with_parameter(ParameterKind::String, "path, e.g. a.b.0"),
    ]
}

fn from_text(input: &[u8]) -> Result<serde_json::Value, DecodeError> {
    Ok(serde_json::from_slice(input)?)
}

/// Drop insignificant whitespace, keeping every token as written
///
/// The document is validated first. Numbers, escapes and duplicate keys
/// pass through untouched.
fn compact_text(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    serde_json::from_slice::<serde::de::IgnoredAny>(input).map_err(DecodeError::from)?;
    let mut out = Vec::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    for &b in input {
        if in_string {
            out.push(b);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
        } else if b == b'"' {
            in_string = true;
            out.push(b);
        } else if !matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
            out.push(b);
        }
    }
    Ok(Value::Text(out))
}

fn parse(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(Value::Json(from_text(input)?))
}

fn compact(input: &serde_json::Value, _: &Arguments<'_>) -> ActionResult {
    Ok(text(input.to_string()))
}

fn pretty(input: &serde_json::Value, _: &Arguments<'_>) -> ActionResult {
    let out = serde_json::to_string_pretty(input).map_err(DecodeError::from)?;
    Ok(text(out))
}

fn keys(input: &serde_json::Value, _: &Arguments<'_>) -> ActionResult {
    match input {
        serde_json::Value::Object(map) => Ok(Value::text_list(map.keys().cloned())),
        other => Err(DecodeError::Malformed(format!(
            "expected a JSON object, got {}",
            kind_of(other)
        ))
        .into()),
    }
}

fn get(input: &serde_json::Value, args: &Arguments<'_>) -> ActionResult {
    let path = args.string(0)?;
    get_path(input, path)
        .cloned()
        .map(Value::Json)
        .ok_or_else(|| ActionError::invalid_parameter("get", format!("path {path:?} not found")))
}

/// Walk a dot separated path; numeric segments index into arrays
fn get_path<'v>(root: &'v serde_json::Value, path: &str) -> Option<&'v serde_json::Value> {
    let mut current = root;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        current = match current {
            serde_json::Value::Object(map) => map.get(segment)?,
            serde_json::Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Argument;
    use crate::ops::testing::{run, run_text};
    use serde_json::json;

    #[test]
    fn compact_keeps_key_order() {
        let input = "{\n  \"b\": 1,\n  \"a\": [1, 2]\n}";
        assert_eq!(run_text(actions(), "jsoncompact", input).unwrap(), r#"{"b":1,"a":[1,2]}"#);
        assert_eq!(run_text(actions(), "minify", "[ 1 ]").unwrap(), "[1]");
        assert!(run_text(actions(), "jsoncompact", "{nope").unwrap_err().is_decode());
    }

    #[test]
    fn compact_keeps_tokens_verbatim() {
        let input = r#"{"n": 1e2, "big": 123456789012345678901234567890, "f": 1.50}"#;
        assert_eq!(
            run_text(actions(), "jsoncompact", input).unwrap(),
            r#"{"n":1e2,"big":123456789012345678901234567890,"f":1.50}"#
        );
        assert_eq!(
            run_text(actions(), "jsoncompact", r#"{"a": 1, "a": 2}"#).unwrap(),
            r#"{"a":1,"a":2}"#
        );
        assert_eq!(
            run_text(actions(), "jsoncompact", r#"[ "a b", "q\" x", "\\" ]"#).unwrap(),
            r#"["a b","q\" x","\\"]"#
        );
    }

    #[test]
    fn parse_and_render() {
        let input = Value::text(r#"{"a": {"b": true}}"#);
        let parsed = run(actions(), "json", input, Vec::new()).unwrap();
        assert_eq!(parsed, Value::Json(json!({"a": {"b": true}})));

        let pretty = run(actions(), "pretty", parsed.clone(), Vec::new()).unwrap();
        assert_eq!(pretty.to_string(), "{\n  \"a\": {\n    \"b\": true\n  }\n}");

        let compact = run(actions(), "compact", parsed, Vec::new()).unwrap();
        assert_eq!(compact, Value::text(r#"{"a":{"b":true}}"#));
    }

    #[test]
    fn object_keys() {
        let out = run(actions(), "keys", Value::Json(json!({"z": 1, "y": 2})), Vec::new()).unwrap();
        assert_eq!(out, Value::text_list(["z", "y"]));

        let err = run(actions(), "keys", Value::Json(json!([1])), Vec::new()).unwrap_err();
        assert!(err.is_decode());
    }

    #[test]
    fn get_by_path() {
        let doc = Value::Json(json!({"a": {"list": [10, {"c": "x"}]}}));
        let arg = |p: &str| vec![Argument::String(p.to_string())];

        let out = run(actions(), "get", doc.clone(), arg("a.list.1.c")).unwrap();
        assert_eq!(out, Value::Json(json!("x")));

        let out = run(actions(), "get", doc.clone(), arg("a.list.0")).unwrap();
        assert_eq!(out, Value::Json(json!(10)));

        let err = run(actions(), "get", doc, arg("a.missing")).unwrap_err();
        assert!(err.is_parameter());
    }
}
