//! One editing session over a single input

use ovr_core::{guess, Action, ActionError, ActionRegistry, Data, Format};

/// Separates steps in a chain, e.g. `comma,index:1,upper`
const CHAIN_SEPARATOR: char = ',';

/// Original input, the registry and the current version
pub(crate) struct Session {
    registry: ActionRegistry,
    original: Vec<u8>,
    data: Data,
    /// Steps recorded by the session itself, never undone
    floor: usize,
}

impl Session {
    /// Start from raw input
    ///
    /// Binary input is converted with `bin` as the first recorded step, so
    /// that undo can rebuild it from the original bytes.
    pub(crate) fn new(registry: ActionRegistry, original: Vec<u8>) -> Result<Self, ActionError> {
        let mut data = Data::from_raw(original.clone());
        let mut floor = 0;
        if guess(&original) == Format::Binary {
            tracing::debug!(len = original.len(), "binary input detected");
            data = data.apply(&registry.lookup(Format::Text, "bin")?)?;
            floor = 1;
        }
        Ok(Self {
            registry,
            original,
            data,
            floor,
        })
    }

    #[inline]
    pub(crate) fn data(&self) -> &Data {
        &self.data
    }

    /// Apply every step of `chain` in order
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub(crate) fn apply_chain(&mut self, chain: &str) -> Result<(), ActionError> {
        for step in chain.split(CHAIN_SEPARATOR).map(str::trim).filter(|s| !s.is_empty()) {
            let action = self.registry.resolve(&self.data, step)?;
            self.data = self.data.apply(&action)?;
        }
        Ok(())
    }

    /// Undo up to `n` user steps, returning the popped actions, latest first
    pub(crate) fn undo(&mut self, n: usize) -> Result<Vec<Action>, ActionError> {
        let mut popped = Vec::with_capacity(n);
        for _ in 0..n {
            if self.data.stack().len() <= self.floor {
                return Err(ActionError::EmptyStack);
            }
            let (data, action) = self.data.undo(&self.original)?;
            self.data = data;
            popped.push(action);
        }
        Ok(popped)
    }

    /// Actions that can be applied to the current version
    pub(crate) fn applicable(&self) -> Vec<Action> {
        self.registry.applicable_to(&self.data)
    }
}
