//! Splitting text into lists, joining and selecting list elements

use super::{as_str, text};
use crate::action::{ActionDef, ActionFn, ActionResult, Arguments, ParameterKind};
use crate::error::{ActionError, DecodeError};
use crate::format::{Format, Value};

pub(super) fn actions() -> Vec<ActionDef> {
    vec![
        ActionDef::new(
            &["comma"],
            "Parse a text input as a list separated by ,",
            Format::TextList,
            ActionFn::Text(split_comma),
        ),
        ActionDef::new(
            &["pipe"],
            "Parse a text input as a list separated by |",
            Format::TextList,
            ActionFn::Text(split_pipe),
        ),
        ActionDef::new(
            &["space"],
            "Parse a text input as a list separated by whitespace",
            Format::TextList,
            ActionFn::Text(split_space),
        ),
        ActionDef::new(
            &["comma"],
            "Join a list with a comma ,",
            Format::Text,
            ActionFn::TextList(join_comma),
        ),
        ActionDef::new(
            &["line"],
            "Join a list with new lines",
            Format::Text,
            ActionFn::TextList(join_line),
        ),
        ActionDef::new(
            &["join"],
            "Join a list with a provided string",
            Format::Text,
            ActionFn::TextList(join),
        )
        .with_parameter(ParameterKind::String, "a string to join"),
        ActionDef::new(
            &["first"],
            "Select the first element of a list",
            Format::Text,
            ActionFn::TextList(first),
        ),
        ActionDef::new(
            &["last"],
            "Select the last element of a list",
            Format::Text,
            ActionFn::TextList(last),
        ),
        ActionDef::new(
            &["index"],
            "Select the element from a list at index parameter",
            Format::Text,
            ActionFn::TextList(index),
        )
        .with_parameter(ParameterKind::Int, "select the item at index"),
    ]
}

/// Split result with at least two elements, or a separator error
fn list_of(items: Vec<String>, separator: &'static str) -> ActionResult {
    if items.len() <= 1 {
        return Err(DecodeError::NoSeparator(separator).into());
    }
    Ok(Value::TextList(items))
}

fn split_comma(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    list_of(as_str(input).split(',').map(str::to_string).collect(), ",")
}

fn split_pipe(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    list_of(as_str(input).split('|').map(str::to_string).collect(), "|")
}

fn split_space(input: &[u8], _: &Arguments<'_>) -> ActionResult {
    list_of(as_str(input).split_whitespace().map(str::to_string).collect(), "space")
}

fn join_comma(list: &[String], _: &Arguments<'_>) -> ActionResult {
    Ok(text(list.join(",")))
}

fn join_line(list: &[String], _: &Arguments<'_>) -> ActionResult {
    Ok(text(list.join("\n")))
}

fn join(list: &[String], args: &Arguments<'_>) -> ActionResult {
    Ok(text(list.join(args.string(0)?)))
}

fn first(list: &[String], _: &Arguments<'_>) -> ActionResult {
    list.first().map(|s| text(s.as_str())).ok_or_else(|| out_of_limits("first"))
}

fn last(list: &[String], _: &Arguments<'_>) -> ActionResult {
    list.last().map(|s| text(s.as_str())).ok_or_else(|| out_of_limits("last"))
}

fn index(list: &[String], args: &Arguments<'_>) -> ActionResult {
    let i = args.int(0)?;
    usize::try_from(i)
        .ok()
        .and_then(|i| list.get(i))
        .map(|s| text(s.as_str()))
        .ok_or_else(|| out_of_limits("index"))
}

fn out_of_limits(action: &str) -> ActionError {
    ActionError::invalid_parameter(action, "index is out of list limits")
}
