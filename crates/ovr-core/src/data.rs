//! Versioned values and their history
//!
//! A [`Data`] is the current value plus the ordered stack of actions that
//! produced it from the session's original input. Versions are immutable:
//! applying or undoing an action always returns a new `Data`, and the
//! history is an [`im::Vector`] so versions derived from a common ancestor
//! share their prefix without ever observing each other's later changes.
//!
//! # Invariants
//! - `stack.len()` equals the number of successful applications since
//!   [`Data::from_raw`]
//! - replaying `stack` over the original bytes reproduces `value`

use crate::action::Action;
use crate::error::ActionError;
use crate::format::{Format, Value};
use im::Vector;
use std::fmt::{self, Display, Formatter};

/// Current value and the actions applied to reach it
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    value: Value,
    stack: Vector<Action>,
}

impl Data {
    /// Start a session from raw input, always as Text
    #[inline]
    pub fn from_raw(raw: impl Into<Vec<u8>>) -> Self {
        Self {
            value: Value::Text(raw.into()),
            stack: Vector::new(),
        }
    }

    /// Wrap an arbitrary value with an empty history
    ///
    /// Such a value cannot be rebuilt by [`Data::undo`]; only used to probe
    /// actions directly.
    #[inline]
    pub(crate) fn from_value(value: Value) -> Self {
        Self {
            value,
            stack: Vector::new(),
        }
    }

    /// Next version: `value` produced by `action` on top of this history
    #[inline]
    pub(crate) fn push(&self, value: Value, action: Action) -> Self {
        let mut stack = self.stack.clone();
        stack.push_back(action);
        Self { value, stack }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Shape of the current value
    #[inline]
    #[must_use]
    pub fn format(&self) -> Format {
        self.value.format()
    }

    /// Actions applied since the original input, oldest first
    #[inline]
    #[must_use]
    pub fn stack(&self) -> &Vector<Action> {
        &self.stack
    }

    /// Raw bytes for Text and Binary values
    #[inline]
    #[must_use]
    pub fn raw(&self) -> Option<&[u8]> {
        self.value.as_bytes()
    }

    /// Apply `action`, producing the next version
    ///
    /// # Errors
    /// See [`Action::transform`]
    #[inline]
    pub fn apply(&self, action: &Action) -> Result<Data, ActionError> {
        action.transform(self)
    }

    /// Drop the last action and rebuild from `original`
    ///
    /// Returns the rebuilt version and the popped action. All-or-nothing:
    /// on failure `self` is unchanged and still usable.
    ///
    /// # Errors
    /// - [`ActionError::EmptyStack`] if there is no history
    /// - [`ActionError::Replay`] if a remaining step fails to replay
    pub fn undo(&self, original: &[u8]) -> Result<(Data, Action), ActionError> {
        let mut remaining = self.stack.clone();
        let popped = remaining.pop_back().ok_or(ActionError::EmptyStack)?;
        let data = Self::replay(original, remaining.iter())?;
        tracing::debug!(action = %popped.key(), depth = data.stack.len(), "action undone");
        Ok((data, popped))
    }

    /// Fold `actions` over `original`, without side effects
    ///
    /// # Errors
    /// Returns [`ActionError::Replay`] naming the first failing step
    pub fn replay<'a, I>(original: &[u8], actions: I) -> Result<Data, ActionError>
    where
        I: IntoIterator<Item = &'a Action>,
    {
        actions
            .into_iter()
            .enumerate()
            .try_fold(Self::from_raw(original), |data, (step, action)| {
                action.replay(&data).map_err(|source| {
                    tracing::warn!(
                        step,
                        action = %action.key(),
                        error = %source,
                        "replay step failed"
                    );
                    ActionError::Replay {
                        step,
                        action: action.name().to_string(),
                        source: Box::new(source),
                    }
                })
            })
    }

    /// Comma-joined primary names of the applied actions
    #[must_use]
    pub fn stack_string(&self) -> String {
        self.stack.iter().map(Action::name).collect::<Vec<_>>().join(",")
    }
}

impl Display for Data {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}
