//! Text to Text operations: case folding, trimming, quoting

use super::{as_str, text};
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments};
use crate::error::{ActionError, DecodeError};
use crate::format::Format;
use unicode_segmentation::UnicodeSegmentation;

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["upper"],
            "Transforms input with all Unicode letters mapped to their upper case",
            Format::Text,
            ActionFn::Text(upper),
        ),
        ActionDef::new(
            &["lower"],
            "Transforms input with all Unicode letters mapped to their lower case",
            Format::Text,
            ActionFn::Text(lower),
        ),
        ActionDef::new(
            &["title"],
            "Transforms input to title case, first letter of each word upper case",
            Format::Text,
            ActionFn::Text(title),
        ),
        ActionDef::new(
            &["trimspace", "trim"],
            "Trim leading and trailing whitespace from input",
            Format::Text,
            ActionFn::Text(trim_space),
        ),
        ActionDef::new(
            &["quote"],
            "Quotes string with escape characters",
            Format::Text,
            ActionFn::Text(quote),
        ),
        ActionDef::new(
            &["unquote"],
            "Removes quotes and resolves escaped characters",
            Format::Text,
            ActionFn::Text(unquote),
        ),
        ActionDef::new(
            &["unescape"],
            "Unescape \\n and \\t from input",
            Format::Text,
            ActionFn::Text(unescape),
        ),
    ]
}

fn upper(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(as_str(input).to_uppercase()))
}

fn lower(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(as_str(input).to_lowercase()))
}

fn title(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let out: String = as_str(input)
        .split_word_bounds()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect();
    Ok(text(out))
}

fn trim_space(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(as_str(input).trim()))
}

// Quoting uses JSON string syntax so that quote and unquote round-trip.
fn quote(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let quoted = serde_json::to_string(&as_str(input)).map_err(DecodeError::from)?;
    Ok(text(quoted))
}

fn unquote(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    let s = as_str(input);
    let trimmed = s.trim();
    if !(trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"')) {
        return Err(ActionError::from(DecodeError::Malformed(
            "input is not a double-quoted string".to_string(),
        )));
    }
    let unquoted: String = serde_json::from_str(trimmed).map_err(DecodeError::from)?;
    Ok(text(unquoted))
}

fn unescape(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    Ok(text(as_str(input).replace("\\n", "\n").replace("\\t", "\t")))
}
