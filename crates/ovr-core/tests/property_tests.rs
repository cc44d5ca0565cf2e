//! Property tests for codec round trips and history replay.

use ovr_core::{Data, Format};
use ovr_test_utils::{apply_chain, test_registry};
use proptest::prelude::*;

/// Text to Text actions that accept any input
const TOTAL_STEPS: [&str; 9] = [
    "upper", "lower", "title", "trimspace", "quote", "unescape", "tohex", "tobase64", "md5",
];

fn run(steps: &[&str], input: &str) -> Data {
    apply_chain(&test_registry(), input.as_bytes(), steps).unwrap()
}

proptest! {
    #[test]
    fn prop_hex_roundtrip(s in "[ -~]*") {
        let data = run(&["tohex", "hex"], &s);
        prop_assert_eq!(data.to_string(), s);
    }

    #[test]
    fn prop_base64_roundtrip(s in "[ -~]*") {
        let data = run(&["tobase64", "base64"], &s);
        prop_assert_eq!(data.to_string(), s);
    }

    #[test]
    fn prop_case_is_idempotent(s in "[ -~]*") {
        prop_assert_eq!(run(&["upper", "upper"], &s).to_string(), run(&["upper"], &s).to_string());
        prop_assert_eq!(run(&["lower", "lower"], &s).to_string(), run(&["lower"], &s).to_string());
    }

    #[test]
    fn prop_undo_equals_shorter_chain(
        s in "[ -~]{0,40}",
        picks in prop::collection::vec(0..TOTAL_STEPS.len(), 1..6),
    ) {
        let steps: Vec<&str> = picks.iter().map(|&i| TOTAL_STEPS[i]).collect();
        let full = run(&steps, &s);
        let (back, popped) = full.undo(s.as_bytes()).unwrap();

        prop_assert_eq!(popped.name(), steps[steps.len() - 1]);
        prop_assert_eq!(back.stack().len(), steps.len() - 1);
        prop_assert_eq!(back, run(&steps[..steps.len() - 1], &s));
    }

    #[test]
    fn prop_replay_is_deterministic(
        s in "[ -~]{0,40}",
        picks in prop::collection::vec(0..TOTAL_STEPS.len(), 0..6),
    ) {
        let steps: Vec<&str> = picks.iter().map(|&i| TOTAL_STEPS[i]).collect();
        let data = run(&steps, &s);
        let first = Data::replay(s.as_bytes(), data.stack()).unwrap();
        let second = Data::replay(s.as_bytes(), data.stack()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &data);
        prop_assert_eq!(first.format(), Format::Text);
    }
}
