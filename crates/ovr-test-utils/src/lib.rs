//! Testing utilities for the ovr workspace
//!
//! Shared registries, chain helpers and sample inputs.

#![allow(missing_docs)]

use ovr_core::{ActionError, ActionRegistry, Data, RegistryConfig};

/// A JWT with header `{"alg":"HS256","typ":"JWT"}`
pub const SAMPLE_JWT: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
    eyJzdWIiOiIxMjM0NTY3ODkwIiwibmFtZSI6IkpvaG4gRG9lIiwiaWF0IjoxNTE2MjM5MDIyfQ.\
    SflKxwRJSMeKKF2QT4fwpMeJf36POk6yJV_adQssw5c";

pub const SAMPLE_JWT_HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

pub const SAMPLE_JWT_PAYLOAD: &str = r#"{"sub":"1234567890","name":"John Doe","iat":1516239022}"#;

pub const SAMPLE_JSON: &str = r#"{
  "name": "ovr",
  "tags": ["text", "time"],
  "nested": {"depth": 2}
}"#;

pub const SAMPLE_WKT: &str = "POLYGON((0 0,2 0,2 2,0 2,0 0))";

/// Full catalogue with side-effect hooks removed
pub fn test_registry() -> ActionRegistry {
    ActionRegistry::with_config(&RegistryConfig::new().with_side_effects(false))
}

/// Catalogue without the geometry extension
pub fn registry_without_geometry() -> ActionRegistry {
    ActionRegistry::with_config(
        &RegistryConfig::new()
            .with_geometry(false)
            .with_side_effects(false),
    )
}

/// Apply textual steps in order, starting from `original`
pub fn apply_chain(
    registry: &ActionRegistry,
    original: &[u8],
    steps: &[&str],
) -> Result<Data, ActionError> {
    steps.iter().try_fold(Data::from_raw(original), |data, step| {
        let action = registry.resolve(&data, step)?;
        data.apply(&action)
    })
}

/// Undo `n` times, returning the last rebuilt version
pub fn undo_n(data: &Data, original: &[u8], n: usize) -> Result<Data, ActionError> {
    (0..n).try_fold(data.clone(), |d, _| d.undo(original).map(|(back, _)| back))
}
