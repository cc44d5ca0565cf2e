//! JSON Web Token inspection
//!
//! Decodes the header and payload segments without verifying the signature.

use super::as_str;
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::error::DecodeError;
use crate::format::{Format, Value};
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;

pub(super) fn actions() -> Vec<ActionDef> {
    vec![ActionDef::new(
        &["jwt"],
        "Parse a JWT and show the header and payload JSON parts",
        Format::TextList,
        ActionFn::Text(parse_jwt),
    )]
}

fn parse_jwt(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let token = as_str(input);
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Jwt(format!("expected 3 segments, got {}", segments.len())).into());
    }

    let parts = segments[..2]
        .iter()
        .map(|segment| decode_segment(segment))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::TextList(parts))
}

/// Decode one segment, tolerating missing padding and the URL-safe alphabet
fn decode_segment(segment: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(segment)
        .or_else(|_| STANDARD_NO_PAD.decode(segment))
        .or_else(|_| URL_SAFE.decode(segment))
        .or_else(|_| URL_SAFE_NO_PAD.decode(segment))
        .map_err(|e| DecodeError::Jwt(format!("can't decode base64 part of the JWT: {e}")))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::testing::run;

    // {"alg":"HS256","typ":"JWT"} . {"sub":"1234567890","name":"John Doe","iat":1516239022}
    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
        eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
        SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

    #[test]
    fn decodes_header_and_payload() {
        let out = run(actions(), "jwt", Value::text(TOKEN), Vec::new()).unwrap();
        assert_eq!(
            out,
            Value::text_list([
                r#"{"alg":"HS256","typ":"JWT"}"#,
                r#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#,
            ])
        );
    }

    #[test]
    fn url_safe_segments() {
        // {"a":"??>"} encodes with '-' and '_' in the URL-safe alphabet
        let header = URL_SAFE_NO_PAD.encode(r#"{"a":"??>"}"#);
        let token = format!("{header}.{header}.sig");
        let out = run(actions(), "jwt", Value::text(token), Vec::new()).unwrap();
        assert_eq!(out, Value::text_list([r#"{"a":"??>"}"#, r#"{"a":"??>"}"#]));
    }

    #[test]
    fn rejects_wrong_segment_count() {
        let err = run(actions(), "jwt", Value::text("a.b"), Vec::new()).unwrap_err();
        assert!(err.is_decode());
        let err = run(actions(), "jwt", Value::text("!!.!!.x"), Vec::new()).unwrap_err();
        assert!(err.is_decode());
    }
}
