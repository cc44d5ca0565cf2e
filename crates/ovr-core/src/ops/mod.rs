//! Built-in operation catalogue
//!
//! Each submodule contributes a list of [`ActionDef`]s for one concern.
//! [`builtin`] is always registered; [`geometry`] is merged when the
//! registry configuration enables it.

use crate::action::ActionDef;
use crate::format::Value;
use std::borrow::Cow;

mod codec;
mod digest;
mod geo;
mod json;
mod jwt;
mod list;
mod text;
mod time;

/// Every always-available definition
pub(crate) fn builtin() -> Vec<ActionDef> {
    let mut defs = Vec::new();
    defs.extend(text::actions());
    defs.extend(digest::actions());
    defs.extend(codec::actions());
    defs.extend(json::actions());
    defs.extend(time::actions());
    defs.extend(list::actions());
    defs.extend(jwt::actions());
    defs
}

/// Geometry extension definitions
pub(crate) fn geometry() -> Vec<ActionDef> {
    geo::actions()
}

/// Input bytes as text, replacing invalid UTF-8
#[inline]
fn as_str(input: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(input)
}

/// Text value from a string
#[inline]
fn text(s: impl Into<String>) -> Value {
    Value::Text(s.into().into_bytes())
}

#[cfg(test)]
pub(crate) mod testing {
    //! Helpers to run a single definition by name

    use crate::action::{Action, ActionDef, Argument};
    use crate::data::Data;
    use crate::error::ActionError;
    use crate::format::{Format, Value};
    use std::sync::Arc;

    /// Find `name` in `defs` and apply it to `input`
    pub(crate) fn run(
        defs: Vec<ActionDef>,
        name: &str,
        input: Value,
        args: Vec<Argument>,
    ) -> Result<Value, ActionError> {
        let format = input.format();
        let (exact, rest): (Vec<_>, Vec<_>) = defs
            .into_iter()
            .filter(|d| d.names().contains(&name))
            .partition(|d| d.input_format() == format);
        let def = exact
            .into_iter()
            .next()
            .or_else(|| {
                rest.into_iter()
                    .find(|d| format == Format::TextList && d.is_broadcastable())
            })
            .unwrap_or_else(|| panic!("no action {name} for {format}"));
        let action = Action::new(Arc::new(def)).with_arguments(args)?;
        action
            .transform(&Data::from_value(input))
            .map(|d| d.value().clone())
    }

    /// Run a Text action and return the text output
    pub(crate) fn run_text(
        defs: Vec<ActionDef>,
        name: &str,
        input: &str,
    ) -> Result<String, ActionError> {
        run(defs, name, Value::text(input), Vec::new()).map(|v| v.to_string())
    }
}
