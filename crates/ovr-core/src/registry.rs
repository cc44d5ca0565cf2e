//! Action registry
//!
//! Provides [`ActionRegistry`] for looking up actions by input format and
//! name, and for listing the actions applicable to a value.

use crate::action::{Action, ActionDef};
use crate::config::RegistryConfig;
use crate::data::Data;
use crate::error::{ActionError, RegistryError};
use crate::format::Format;
use crate::ops;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;

/// Index of actions keyed by `"<format-prefix>,<name>"`
///
/// Built once, then read-only. Every name and alias of a definition gets its
/// own key pointing at the same shared definition.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    actions: HashMap<String, Arc<ActionDef>>,
}

/// Separates an action name from its arguments in a textual step
pub const STEP_ARG_SEPARATOR: char = ':';

static DEFAULT: Lazy<ActionRegistry> = Lazy::new(ActionRegistry::new);

/// Process-wide registry built from the default configuration
///
/// Built exactly once on first use, whichever thread gets there first.
#[must_use]
pub fn default_registry() -> &'static ActionRegistry {
    &DEFAULT
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Create a registry with no actions
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Create a registry with the built-in catalogue and default extensions
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&RegistryConfig::default())
    }

    /// Create a registry with the built-in catalogue plus the extensions
    /// selected by `config`
    ///
    /// # Panics
    /// Panics if two catalogue entries share a key; this is a programming
    /// error in the catalogue itself.
    #[must_use]
    pub fn with_config(config: &RegistryConfig) -> Self {
        let mut registry = Self::empty();
        registry.register_all(ops::builtin());
        if config.geometry {
            registry.register_all(ops::geometry());
        }
        if !config.side_effects {
            registry.strip_effects();
        }
        tracing::debug!(
            actions = registry.len(),
            geometry = config.geometry,
            side_effects = config.side_effects,
            "registry built"
        );
        registry
    }

    /// Register a definition under every one of its names
    ///
    /// # Errors
    /// Returns [`RegistryError::Collision`] if any key is already taken; the
    /// registry is left unchanged in that case.
    pub fn try_register(&mut self, def: ActionDef) -> Result<(), RegistryError> {
        let format = def.input_format();
        if def.names().is_empty() {
            return Err(RegistryError::Unnamed(format));
        }
        let keys: Vec<String> = def.names().iter().map(|n| format.key(n)).collect();
        for (i, key) in keys.iter().enumerate() {
            if self.actions.contains_key(key) || keys[..i].contains(key) {
                return Err(RegistryError::Collision(key.clone()));
            }
        }

        let def = Arc::new(def);
        for key in keys {
            tracing::trace!(%key, "action registered");
            self.actions.insert(key, Arc::clone(&def));
        }
        Ok(())
    }

    /// Register a definition, failing fast on a key collision
    ///
    /// # Panics
    /// Panics if any of the definition's keys is already registered.
    pub fn register(&mut self, def: ActionDef) {
        if let Err(e) = self.try_register(def) {
            panic!("action catalogue is inconsistent: {e}");
        }
    }

    /// Register a list of definitions
    ///
    /// # Panics
    /// Panics on the first key collision.
    pub fn register_all(&mut self, defs: impl IntoIterator<Item = ActionDef>) {
        for def in defs {
            self.register(def);
        }
    }

    /// Look up an action by input format and any of its names
    ///
    /// # Errors
    /// Returns [`ActionError::NotFound`] if nothing is registered
    pub fn lookup(&self, format: Format, name: &str) -> Result<Action, ActionError> {
        let key = format.key(name);
        tracing::trace!(%key, "action lookup");
        self.actions
            .get(&key)
            .map(|def| Action::new(Arc::clone(def)))
            .ok_or_else(|| ActionError::NotFound {
                format,
                name: name.to_string(),
            })
    }

    /// Look up by a full key such as `t,upper`
    ///
    /// # Errors
    /// Returns [`ActionError::NotFound`] if the key is malformed or unknown
    pub fn lookup_key(&self, key: &str) -> Result<Action, ActionError> {
        let (prefix, name) = key.split_once(',').unwrap_or(("", key));
        let format = Format::ALL
            .into_iter()
            .find(|f| f.prefix() == prefix)
            .unwrap_or(Format::Text);
        self.actions
            .get(key)
            .map(|def| Action::new(Arc::clone(def)))
            .ok_or_else(|| ActionError::NotFound {
                format,
                name: name.to_string(),
            })
    }

    /// Look up an action applicable to `data`, falling back to a Text
    /// action broadcast over a TextList
    ///
    /// # Errors
    /// Returns [`ActionError::NotFound`] if no applicable action has that name
    pub fn lookup_for(&self, data: &Data, name: &str) -> Result<Action, ActionError> {
        match self.lookup(data.format(), name) {
            Err(ActionError::NotFound { .. }) if data.format() == Format::TextList => self
                .lookup(Format::Text, name)
                .ok()
                .filter(|a| a.definition().is_broadcastable())
                .ok_or_else(|| ActionError::NotFound {
                    format: Format::TextList,
                    name: name.to_string(),
                }),
            other => other,
        }
    }

    /// Resolve a textual step such as `upper` or `index:1` against `data`
    ///
    /// Arguments follow the name, separated by `:`, and are parsed per the
    /// declared parameter kinds. The last argument takes the rest of the
    /// step, so it may itself contain `:`.
    ///
    /// # Errors
    /// - [`ActionError::NotFound`] if no applicable action has that name
    /// - Parameter error if the arguments do not match the declaration
    pub fn resolve(&self, data: &Data, step: &str) -> Result<Action, ActionError> {
        let (name, rest) = match step.split_once(STEP_ARG_SEPARATOR) {
            Some((name, rest)) => (name.trim(), Some(rest)),
            None => (step.trim(), None),
        };
        let action = self.lookup_for(data, name)?;
        let raw: Vec<&str> = match rest {
            Some(rest) => rest
                .splitn(action.parameters().len().max(1), STEP_ARG_SEPARATOR)
                .collect(),
            None => Vec::new(),
        };
        action.with_raw_arguments(&raw)
    }

    /// All actions taking `format` as input, sorted by primary name
    #[must_use]
    pub fn for_format(&self, format: Format) -> Vec<Action> {
        self.collect(|def| def.input_format() == format)
    }

    /// All actions applicable to `data`, sorted by primary name
    ///
    /// For a TextList this also includes every Text to Text action, which
    /// is broadcast element-wise.
    #[must_use]
    pub fn applicable_to(&self, data: &Data) -> Vec<Action> {
        let format = data.format();
        self.collect(|def| {
            def.input_format() == format || (format == Format::TextList && def.is_broadcastable())
        })
    }

    /// Number of distinct definitions
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check if a key is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, format: Format, name: &str) -> bool {
        self.actions.contains_key(&format.key(name))
    }

    /// Iterate over all registered keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    fn definitions(&self) -> Vec<&Arc<ActionDef>> {
        let mut defs: Vec<&Arc<ActionDef>> = Vec::new();
        for def in self.actions.values() {
            if !defs.iter().any(|d| Arc::ptr_eq(d, def)) {
                defs.push(def);
            }
        }
        defs
    }

    fn collect(&self, keep: impl Fn(&ActionDef) -> bool) -> Vec<Action> {
        let mut actions: Vec<Action> = self
            .definitions()
            .into_iter()
            .filter(|def| keep(def))
            .map(|def| Action::new(Arc::clone(def)))
            .collect();
        actions.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.input_format().cmp(&b.input_format()))
        });
        actions
    }

    fn strip_effects(&mut self) {
        let mut stripped: Vec<(Arc<ActionDef>, Arc<ActionDef>)> = Vec::new();
        for def in self.actions.values_mut() {
            if !def.has_side_effect() {
                continue;
            }
            let replacement = match stripped.iter().find(|(old, _)| Arc::ptr_eq(old, def)) {
                Some((_, new)) => Arc::clone(new),
                None => {
                    tracing::debug!(action = def.name(), "side effect disabled");
                    let new = Arc::new((**def).clone().without_effect());
                    stripped.push((Arc::clone(def), Arc::clone(&new)));
                    new
                }
            };
            *def = replacement;
        }
    }
}
