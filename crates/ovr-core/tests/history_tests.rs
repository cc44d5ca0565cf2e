//! Functional tests for versioned values and undo by replay.
//!
//! Guarantees exercised here:
//! - Every version is immutable; later applications never leak into
//!   earlier versions.
//! - Undo rebuilds from the original bytes and matches the shorter chain.
//! - A failed undo leaves the caller's version usable.

use ovr_core::{guess, ActionError, Data, Format, Value};
use ovr_test_utils::{apply_chain, test_registry, undo_n};
use pretty_assertions::assert_eq;

#[test]
fn undo_walks_back_to_original() {
    let registry = test_registry();
    let original = b"  Hello,World  ";
    let data = apply_chain(&registry, original, &["trimspace", "comma", "lower", "line"]).unwrap();
    assert_eq!(data.to_string(), "hello\nworld");

    let back = undo_n(&data, original, 2).unwrap();
    assert_eq!(back.value(), &Value::text_list(["Hello", "World"]));
    assert_eq!(back.stack_string(), "trimspace,comma");

    let start = undo_n(&data, original, 4).unwrap();
    assert_eq!(start, Data::from_raw(&original[..]));

    let err = undo_n(&data, original, 5).unwrap_err();
    assert!(matches!(err, ActionError::EmptyStack));
}

#[test]
fn branches_share_history_without_aliasing() {
    let registry = test_registry();
    let base = apply_chain(&registry, b"a,b", &["comma"]).unwrap();
    let first = base.apply(&registry.resolve(&base, "first").unwrap()).unwrap();
    let last = base.apply(&registry.resolve(&base, "last").unwrap()).unwrap();

    assert_eq!(first.to_string(), "a");
    assert_eq!(last.to_string(), "b");
    assert_eq!(base.stack_string(), "comma");
}

#[test]
fn undo_against_other_original_fails_atomically() {
    let registry = test_registry();
    let data = apply_chain(&registry, b"6869", &["hex", "upper"]).unwrap();
    assert_eq!(data.to_string(), "HI");

    let err = data.undo(b"not hex").unwrap_err();
    assert!(matches!(err, ActionError::Replay { step: 0, .. }));
    assert!(err.is_decode());
    assert_eq!(data.to_string(), "HI");
    assert_eq!(data.stack().len(), 2);
}

#[test]
fn binary_input_is_recorded_as_first_step() {
    let registry = test_registry();
    let raw = [0x00_u8, 0x01, 0x02, 0xff];
    assert_eq!(guess(&raw), Format::Binary);

    let data = apply_chain(&registry, &raw, &["bin", "tohex"]).unwrap();
    assert_eq!(data.to_string(), "000102ff");

    let (back, _) = data.undo(&raw).unwrap();
    assert_eq!(back.format(), Format::Binary);
    assert_eq!(back.to_string(), "00 01 02 ff");
}
