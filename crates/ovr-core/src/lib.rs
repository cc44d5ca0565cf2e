//! ovr core - typed, undoable transformations
//!
//! The engine behind `ovr`:
//! - Holds a value in one of a closed set of shapes ([`Format`])
//! - Applies named, typed actions looked up in an [`ActionRegistry`]
//! - Records every application so any step can be undone by replay
//! - Ships a catalogue of text, codec, digest, JSON, time, list, JWT and
//!   geometry operations
//!
//! # Example
//!
//! ```rust
//! use ovr_core::{default_registry, Data, Format};
//!
//! # fn main() -> Result<(), ovr_core::ActionError> {
//! let registry = default_registry();
//! let original = b"hello,world";
//!
//! let data = Data::from_raw(&original[..]);
//! let data = data.apply(&registry.lookup(Format::Text, "comma")?)?;
//! let data = data.apply(&registry.lookup_for(&data, "upper")?)?;
//! assert_eq!(data.to_string(), r#"["HELLO", "WORLD"]"#);
//!
//! let (data, _) = data.undo(original)?;
//! assert_eq!(data.stack_string(), "comma");
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod action;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod guesser;
mod ops;
pub mod registry;

// Re-exports for convenience
pub use action::{
    Action, ActionDef, ActionFn, ActionKind, ActionParameter, ActionResult, Argument, Arguments,
    EffectFn, ParameterKind,
};
pub use config::{Config, RegistryConfig, GEOMETRY_ENV};
pub use data::Data;
pub use error::{ActionError, ConfigError, DecodeError, ErrorKind, RegistryError};
pub use format::{Format, Value};
pub use guesser::{guess, is_binary, SNIFF_LEN};
pub use registry::{default_registry, ActionRegistry, STEP_ARG_SEPARATOR};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with ovr core
    pub use crate::{
        default_registry, Action, ActionError, ActionRegistry, Argument, Data, Format, Value,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
