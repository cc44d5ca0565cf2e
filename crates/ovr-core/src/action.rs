//! Action definitions and dispatch
//!
//! An [`ActionDef`] is the immutable description of one operation: names,
//! documentation, declared output, parameters and the implementing
//! function. An [`Action`] is a cheap handle on a definition plus the
//! argument values the caller filled in; it is what gets applied to a
//! [`Data`] and recorded in its history.
//!
//! The implementing function is an [`ActionFn`], an enum of function
//! pointers typed by the shape they consume. The input format of an action
//! is therefore derived from its function and cannot be declared wrongly.

use crate::data::Data;
use crate::error::ActionError;
use crate::format::{Format, Value};
use chrono::{DateTime, FixedOffset};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Result of an operation
pub type ActionResult = Result<Value, ActionError>;

/// Side-effect hook run after a forward application
pub type EffectFn = fn(&Value) -> Result<(), ActionError>;

/// Category of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    /// Value to value conversion
    #[default]
    Transform,
    /// Parses text into a structured shape
    Parse,
}

/// Type of a parameter slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Int,
    Float,
    String,
}

impl Display for ParameterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Int => "integer",
            Self::Float => "float",
            Self::String => "string",
        })
    }
}

/// A parameter an action requires at invocation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionParameter {
    pub kind: ParameterKind,
    pub doc: &'static str,
}

/// A value supplied for a parameter slot
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    Int(i64),
    Float(f64),
    String(String),
}

impl Argument {
    /// Kind of this argument
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::Int(_) => ParameterKind::Int,
            Self::Float(_) => ParameterKind::Float,
            Self::String(_) => ParameterKind::String,
        }
    }

    /// Parse textual input for a slot of the given kind
    ///
    /// # Errors
    /// Returns a description of the failure if the text does not parse
    pub fn parse(kind: ParameterKind, raw: &str) -> Result<Self, String> {
        match kind {
            ParameterKind::Int => raw
                .trim()
                .parse()
                .map(Self::Int)
                .map_err(|e| format!("{raw:?} is not an integer: {e}")),
            ParameterKind::Float => raw
                .trim()
                .parse()
                .map(Self::Float)
                .map_err(|e| format!("{raw:?} is not a float: {e}")),
            ParameterKind::String => Ok(Self::String(raw.to_string())),
        }
    }
}

impl Display for Argument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
        }
    }
}

/// Validated view over the arguments of one invocation
#[derive(Debug, Clone, Copy)]
pub struct Arguments<'a> {
    action: &'a str,
    values: &'a [Argument],
}

impl<'a> Arguments<'a> {
    /// No arguments
    pub const EMPTY: Arguments<'static> = Arguments {
        action: "",
        values: &[],
    };

    #[inline]
    fn new(action: &'a str, values: &'a [Argument]) -> Self {
        Self { action, values }
    }

    /// Integer argument at `index`
    ///
    /// # Errors
    /// Returns a parameter error if the slot is missing or not an integer
    pub fn int(&self, index: usize) -> Result<i64, ActionError> {
        match self.values.get(index) {
            Some(Argument::Int(v)) => Ok(*v),
            _ => Err(self.missing(index, ParameterKind::Int)),
        }
    }

    /// Float argument at `index`
    ///
    /// # Errors
    /// Returns a parameter error if the slot is missing or not a float
    pub fn float(&self, index: usize) -> Result<f64, ActionError> {
        match self.values.get(index) {
            Some(Argument::Float(v)) => Ok(*v),
            _ => Err(self.missing(index, ParameterKind::Float)),
        }
    }

    /// String argument at `index`
    ///
    /// # Errors
    /// Returns a parameter error if the slot is missing or not a string
    pub fn string(&self, index: usize) -> Result<&'a str, ActionError> {
        match self.values.get(index) {
            Some(Argument::String(v)) => Ok(v.as_str()),
            _ => Err(self.missing(index, ParameterKind::String)),
        }
    }

    fn missing(&self, index: usize, kind: ParameterKind) -> ActionError {
        ActionError::invalid_parameter(
            self.action,
            format!("expected {kind} argument at position {index}"),
        )
    }
}

/// Implementing function, typed by the shape it consumes
#[derive(Debug, Clone, Copy)]
pub enum ActionFn {
    Text(fn(&[u8], &Arguments<'_>) -> ActionResult),
    Binary(fn(&[u8], &Arguments<'_>) -> ActionResult),
    Time(fn(&DateTime<FixedOffset>, &Arguments<'_>) -> ActionResult),
    TextList(fn(&[String], &Arguments<'_>) -> ActionResult),
    Geometry(fn(&geo_types::Geometry<f64>, &Arguments<'_>) -> ActionResult),
    Json(fn(&serde_json::Value, &Arguments<'_>) -> ActionResult),
}

impl ActionFn {
    /// Shape this function consumes
    #[inline]
    #[must_use]
    pub const fn input_format(&self) -> Format {
        match self {
            Self::Text(_) => Format::Text,
            Self::Binary(_) => Format::Binary,
            Self::Time(_) => Format::Time,
            Self::TextList(_) => Format::TextList,
            Self::Geometry(_) => Format::Geometry,
            Self::Json(_) => Format::Json,
        }
    }
}

/// Immutable definition of an operation
///
/// # Invariants
/// - `names` is non-empty; the first entry is the primary name
/// - `func` returns values of format `output` or fails
#[derive(Debug, Clone)]
pub struct ActionDef {
    doc: &'static str,
    names: &'static [&'static str],
    kind: ActionKind,
    output: Format,
    parameters: Vec<ActionParameter>,
    func: ActionFn,
    effect: Option<EffectFn>,
}

impl ActionDef {
    /// Create a transform definition
    #[must_use]
    pub fn new(
        names: &'static [&'static str],
        doc: &'static str,
        output: Format,
        func: ActionFn,
    ) -> Self {
        Self {
            doc,
            names,
            kind: ActionKind::Transform,
            output,
            parameters: Vec::new(),
            func,
            effect: None,
        }
    }

    /// Mark as a parse action
    #[inline]
    #[must_use]
    pub fn parse(mut self) -> Self {
        self.kind = ActionKind::Parse;
        self
    }

    /// Declare an additional parameter
    #[inline]
    #[must_use]
    pub fn with_parameter(mut self, kind: ParameterKind, doc: &'static str) -> Self {
        self.parameters.push(ActionParameter { kind, doc });
        self
    }

    /// Attach a side effect, run on forward application only
    #[inline]
    #[must_use]
    pub fn with_effect(mut self, effect: EffectFn) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Drop the side effect, keeping the pure function
    #[inline]
    #[must_use]
    pub fn without_effect(mut self) -> Self {
        self.effect = None;
        self
    }

    /// Primary name, or the empty string for an unnamed definition
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.names.first().copied().unwrap_or("")
    }

    #[inline]
    #[must_use]
    pub fn names(&self) -> &'static [&'static str] {
        self.names
    }

    #[inline]
    #[must_use]
    pub fn doc(&self) -> &'static str {
        self.doc
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub fn input_format(&self) -> Format {
        self.func.input_format()
    }

    #[inline]
    #[must_use]
    pub fn output_format(&self) -> Format {
        self.output
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        &self.parameters
    }

    #[inline]
    #[must_use]
    pub fn has_side_effect(&self) -> bool {
        self.effect.is_some()
    }

    /// Text to Text actions can be broadcast over a TextList
    #[inline]
    #[must_use]
    pub fn is_broadcastable(&self) -> bool {
        self.input_format() == Format::Text && self.output == Format::Text
    }
}

/// A definition plus the arguments for one invocation
///
/// Cheap to clone: the definition is shared.
#[derive(Debug, Clone)]
pub struct Action {
    def: Arc<ActionDef>,
    arguments: Vec<Argument>,
}

impl Action {
    /// Wrap a shared definition with no arguments
    #[inline]
    #[must_use]
    pub fn new(def: Arc<ActionDef>) -> Self {
        Self {
            def,
            arguments: Vec::new(),
        }
    }

    /// Fill in typed arguments
    ///
    /// # Errors
    /// Returns a parameter error if the count or any kind does not match the
    /// declared parameters
    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Result<Self, ActionError> {
        self.arguments = arguments;
        self.check_arguments()?;
        Ok(self)
    }

    /// Fill in arguments from text, parsed per declared parameter kind
    ///
    /// # Errors
    /// Returns a parameter error if the count does not match or a value does
    /// not parse
    pub fn with_raw_arguments(self, raw: &[&str]) -> Result<Self, ActionError> {
        if raw.len() != self.def.parameters.len() {
            return Err(self.arity_error(raw.len()));
        }
        let arguments = self
            .def
            .parameters
            .iter()
            .zip(raw)
            .map(|(p, r)| {
                Argument::parse(p.kind, r)
                    .map_err(|e| ActionError::invalid_parameter(self.name(), e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.with_arguments(arguments)
    }

    #[inline]
    #[must_use]
    pub fn definition(&self) -> &ActionDef {
        &self.def
    }

    /// Primary name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.def.name()
    }

    #[inline]
    #[must_use]
    pub fn names(&self) -> &'static [&'static str] {
        self.def.names()
    }

    #[inline]
    #[must_use]
    pub fn doc(&self) -> &'static str {
        self.def.doc()
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.def.kind()
    }

    #[inline]
    #[must_use]
    pub fn input_format(&self) -> Format {
        self.def.input_format()
    }

    #[inline]
    #[must_use]
    pub fn output_format(&self) -> Format {
        self.def.output_format()
    }

    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        self.def.parameters()
    }

    #[inline]
    #[must_use]
    pub fn arguments(&self) -> &[Argument] {
        &self.arguments
    }

    #[inline]
    #[must_use]
    pub fn has_side_effect(&self) -> bool {
        self.def.has_side_effect()
    }

    /// Registry key of the primary name, e.g. `t,upper`
    #[inline]
    #[must_use]
    pub fn key(&self) -> String {
        self.input_format().key(self.name())
    }

    /// Apply to `data`, producing the next version
    ///
    /// Runs the side-effect hook, if any, after the value is computed.
    ///
    /// # Errors
    /// - Format mismatch if `data` is neither the input format nor a
    ///   TextList broadcast target
    /// - Parameter error if arguments do not match the declaration
    /// - Any error of the operation itself; `data` is left untouched
    pub fn transform(&self, data: &Data) -> Result<Data, ActionError> {
        let value = self.compute(data.value())?;
        if let Some(effect) = self.def.effect {
            effect(&value).map_err(|e| match e {
                ActionError::Effect { .. } => e,
                other => ActionError::Effect {
                    action: self.name().to_string(),
                    reason: other.to_string(),
                },
            })?;
        }
        tracing::debug!(
            action = %self.key(),
            from = %data.format(),
            to = %value.format(),
            depth = data.stack().len() + 1,
            "action applied"
        );
        Ok(data.push(value, self.clone()))
    }

    /// Apply without running the side-effect hook
    ///
    /// Used when rebuilding history, so effects fire once per forward
    /// application.
    pub(crate) fn replay(&self, data: &Data) -> Result<Data, ActionError> {
        if self.has_side_effect() {
            tracing::debug!(action = %self.key(), "side effect skipped during replay");
        }
        let value = self.compute(data.value())?;
        Ok(data.push(value, self.clone()))
    }

    /// Run the pure function against `input`
    fn compute(&self, input: &Value) -> ActionResult {
        self.check_arguments()?;
        let args = Arguments::new(self.name(), &self.arguments);

        let output = match (self.def.func, input) {
            (ActionFn::Text(f), Value::Text(b)) => f(b, &args)?,
            (ActionFn::Text(f), Value::TextList(list)) if self.def.is_broadcastable() => {
                return self.broadcast(f, list, &args);
            }
            (ActionFn::Binary(f), Value::Binary(b)) => f(b, &args)?,
            (ActionFn::Time(f), Value::Time(t)) => f(t, &args)?,
            (ActionFn::TextList(f), Value::TextList(l)) => f(l, &args)?,
            (ActionFn::Geometry(f), Value::Geometry(g)) => f(g, &args)?,
            (ActionFn::Json(f), Value::Json(j)) => f(j, &args)?,
            (func, value) => {
                return Err(ActionError::FormatMismatch {
                    action: self.name().to_string(),
                    expected: func.input_format(),
                    actual: value.format(),
                })
            }
        };

        if output.format() != self.def.output {
            return Err(ActionError::UnexpectedOutput {
                action: self.name().to_string(),
                expected: self.def.output,
                actual: output.format(),
            });
        }
        Ok(output)
    }

    /// Run a Text to Text function over every element
    ///
    /// The first failing element aborts the whole call.
    fn broadcast(
        &self,
        f: fn(&[u8], &Arguments<'_>) -> ActionResult,
        list: &[String],
        args: &Arguments<'_>,
    ) -> ActionResult {
        let out = list
            .iter()
            .map(|item| match f(item.as_bytes(), args)? {
                Value::Text(b) => Ok(String::from_utf8_lossy(&b).into_owned()),
                other => Err(ActionError::UnexpectedOutput {
                    action: self.name().to_string(),
                    expected: Format::Text,
                    actual: other.format(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::TextList(out))
    }

    fn check_arguments(&self) -> Result<(), ActionError> {
        let params = &self.def.parameters;
        if self.arguments.len() != params.len() {
            return Err(self.arity_error(self.arguments.len()));
        }
        for (i, (p, a)) in params.iter().zip(&self.arguments).enumerate() {
            if p.kind != a.kind() {
                return Err(ActionError::invalid_parameter(
                    self.name(),
                    format!("argument {i} ({}) must be {}, got {}", p.doc, p.kind, a.kind()),
                ));
            }
        }
        Ok(())
    }

    fn arity_error(&self, got: usize) -> ActionError {
        ActionError::invalid_parameter(
            self.name(),
            format!("expects {} argument(s), got {got}", self.def.parameters.len()),
        )
    }
}

impl PartialEq for Action {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.def, &other.def)
            || (self.input_format() == other.input_format() && self.name() == other.name()))
            && self.arguments == other.arguments
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.arguments.is_empty() {
            f.write_str("(")?;
            for (i, a) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{a}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout(input: &[u8], _: &Arguments<'_>) -> ActionResult {
        Ok(Value::Text(input.to_ascii_uppercase()))
    }

    fn repeat(input: &[u8], args: &Arguments<'_>) -> ActionResult {
        let n = usize::try_from(args.int(0)?)
            .map_err(|e| ActionError::invalid_parameter("repeat", e.to_string()))?;
        Ok(Value::Text(input.repeat(n)))
    }

    fn wrong_output(_: &[u8], _: &Arguments<'_>) -> ActionResult {
        Ok(Value::text_list(["oops"]))
    }

    fn shout_action() -> Action {
        Action::new(Arc::new(ActionDef::new(
            &["shout"],
            "upper ascii",
            Format::Text,
            ActionFn::Text(shout),
        )))
    }

    fn repeat_action() -> Action {
        Action::new(Arc::new(
            ActionDef::new(&["repeat"], "repeat n times", Format::Text, ActionFn::Text(repeat))
                .with_parameter(ParameterKind::Int, "count"),
        ))
    }

    #[test]
    fn transform_extends_stack() {
        let data = Data::from_raw("abc");
        let out = shout_action().transform(&data).unwrap();
        assert_eq!(out.value(), &Value::text("ABC"));
        assert_eq!(out.stack().len(), 1);
        assert_eq!(data.stack().len(), 0);
    }

    #[test]
    fn transform_rejects_wrong_format() {
        let data = Data::from_value(Value::Json(serde_json::json!(1)));
        let err = shout_action().transform(&data).unwrap_err();
        assert!(err.is_format_mismatch());
    }

    #[test]
    fn broadcast_over_list() {
        let data = Data::from_value(Value::text_list(["a", "b"]));
        let out = shout_action().transform(&data).unwrap();
        assert_eq!(out.value(), &Value::text_list(["A", "B"]));
        assert_eq!(out.format(), Format::TextList);
    }

    #[test]
    fn missing_argument_fails_before_running() {
        let data = Data::from_raw("ab");
        let err = repeat_action().transform(&data).unwrap_err();
        assert!(err.is_parameter());
    }

    #[test]
    fn wrong_argument_kind() {
        let err = repeat_action()
            .with_arguments(vec![Argument::String("2".into())])
            .unwrap_err();
        assert!(err.is_parameter());
    }

    #[test]
    fn raw_arguments_are_parsed() {
        let action = repeat_action().with_raw_arguments(&["2"]).unwrap();
        assert_eq!(action.arguments(), &[Argument::Int(2)]);
        let out = action.transform(&Data::from_raw("ab")).unwrap();
        assert_eq!(out.to_string(), "abab");
        assert_eq!(action.to_string(), "repeat(2)");

        assert!(repeat_action().with_raw_arguments(&["two"]).is_err());
        assert!(repeat_action().with_raw_arguments(&[]).is_err());
    }

    #[test]
    fn declared_output_is_enforced() {
        let action = Action::new(Arc::new(ActionDef::new(
            &["liar"],
            "claims text",
            Format::Text,
            ActionFn::Text(wrong_output),
        )));
        let err = action.transform(&Data::from_raw("x")).unwrap_err();
        assert!(matches!(err, ActionError::UnexpectedOutput { .. }));
    }

    #[test]
    fn definition_accessors() {
        let def = ActionDef::new(&["a", "b"], "doc", Format::Time, ActionFn::Text(shout)).parse();
        assert_eq!(def.name(), "a");
        assert_eq!(def.names(), &["a", "b"]);
        assert_eq!(def.kind(), ActionKind::Parse);
        assert_eq!(def.input_format(), Format::Text);
        assert_eq!(def.output_format(), Format::Time);
        assert!(!def.is_broadcastable());
        assert!(!def.has_side_effect());
    }
}
