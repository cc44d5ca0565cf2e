//! Hex and base64 codecs, and Text/Binary reinterpretation

use super::{as_str, text};
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::error::DecodeError;
use crate::format::{Format, Value};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["hex"],
            "Returns the bytes represented by the hexadecimal input",
            Format::Text,
            ActionFn::Text(from_hex),
        ),
        ActionDef::new(
            &["tohex"],
            "Returns the hexadecimal encoding of the input",
            Format::Text,
            ActionFn::Text(to_hex),
        ),
        ActionDef::new(
            &["tohex"],
            "Returns the hexadecimal encoding of the input",
            Format::Text,
            ActionFn::Binary(to_hex),
        ),
        ActionDef::new(
            &["base64"],
            "Returns the bytes represented by the base64 of the input",
            Format::Text,
            ActionFn::Text(from_base64),
        ),
        ActionDef::new(
            &["tobase64"],
            "Returns the base64 encoding of input",
            Format::Text,
            ActionFn::Text(to_base64),
        ),
        ActionDef::new(
            &["tobase64"],
            "Returns the base64 encoding of input",
            Format::Text,
            ActionFn::Binary(to_base64),
        ),
        ActionDef::new(
            &["bin"],
            "Reinterpret the input as raw bytes",
            Format::Binary,
            ActionFn::Text(to_binary),
        ),
        ActionDef::new(
            &["text"],
            "Reinterpret raw bytes as text",
            Format::Text,
            ActionFn::Binary(to_text),
        ),
    ]
}

fn from_hex(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let cleaned = as_str(input).replace(' ', "");
    Ok(Value::Text(hex::decode(cleaned).map_err(DecodeError::from)?))
}

fn to_hex(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(hex::encode(input)))
}

fn from_base64(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let cleaned: Vec<u8> = input.iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(Value::Text(STANDARD.decode(cleaned).map_err(DecodeError::from)?))
}

fn to_base64(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(STANDARD.encode(input)))
}

fn to_binary(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(Value::Binary(input.to_vec()))
}

fn to_text(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(Value::Text(input.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::{run, run_text};

    #[test]
    fn hex_roundtrip() {
        assert_eq!(run_text(actions(), "tohex", "hello").unwrap(), "68656c6c6f");
        assert_eq!(run_text(actions(), "hex", "68 65 6c 6c 6f").unwrap(), "hello");
    }

    #[test]
    fn invalid_hex_is_decode_error() {
        assert!(run_text(actions(), "hex", "6g").unwrap_err().is_decode());
        assert!(run_text(actions(), "hex", "abc").unwrap_err().is_decode());
    }

    #[test]
    fn base64_roundtrip() {
        assert_eq!(run_text(actions(), "tobase64", "hello").unwrap(), "aGVsbG8=");
        assert_eq!(run_text(actions(), "base64", "aGVs\nbG8=\n").unwrap(), "hello");
        assert!(run_text(actions(), "base64", "!!!").unwrap_err().is_decode());
    }

    #[test]
    fn binary_encodings() {
        let bytes = Value::Binary(vec![0x00, 0xff]);
        assert_eq!(
            run(actions(), "tohex", bytes.clone(), Vec::new()).unwrap(),
            Value::text("00ff")
        );
        assert_eq!(run(actions(), "tobase64", bytes, Vec::new()).unwrap(), Value::text("AP8="));
    }

    #[test]
    fn reinterpret() {
        let bin = run(actions(), "bin", Value::text("ab"), Vec::new()).unwrap();
        assert_eq!(bin, Value::Binary(b"ab".to_vec()));
        let back = run(actions(), "text", bin, Vec::new()).unwrap();
        assert_eq!(back, Value::text("ab"));
    }
}
