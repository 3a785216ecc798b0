// ABOUTME: Property tests for blue/green slot resolution.
// ABOUTME: Checks determinism and slot alternation over arbitrary stack listings.

use proptest::prelude::*;
use stackswap::deploy::{SlotError, resolve_slots};
use stackswap::types::StackName;

fn base_name() -> impl Strategy<Value = StackName> {
    "[a-z][a-z0-9-]{0,20}".prop_map(|s| StackName::new(&s).unwrap())
}

/// Names that never collide with any slot of a base made from `[a-z0-9-]`.
fn unrelated_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Z][a-zA-Z0-9]{0,12}", 0..6)
}

/// Which of the legacy, blue and green slots are live.
fn live_slots() -> impl Strategy<Value = (bool, bool, bool)> {
    (any::<bool>(), any::<bool>(), any::<bool>())
}

fn listing(base: &StackName, live: (bool, bool, bool), others: &[String]) -> Vec<String> {
    let mut names: Vec<String> = others.to_vec();
    if live.0 {
        names.push(base.to_string());
    }
    if live.1 {
        names.push(format!("{base}-B"));
    }
    if live.2 {
        names.push(format!("{base}-G"));
    }
    names
}

proptest! {
    #[test]
    fn resolution_is_deterministic(
        base in base_name(),
        live in live_slots(),
        others in unrelated_names(),
    ) {
        let names = listing(&base, live, &others);
        let first = resolve_slots(&base, names.iter().map(String::as_str));
        let second = resolve_slots(&base, names.iter().map(String::as_str));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn new_slot_is_suffixed_and_differs_from_existing(
        base in base_name(),
        live in live_slots(),
        others in unrelated_names(),
    ) {
        let names = listing(&base, live, &others);
        if let Ok(resolution) = resolve_slots(&base, names.iter().map(String::as_str)) {
            let blue = format!("{base}-B");
            let green = format!("{base}-G");
            prop_assert!(resolution.new.as_str() == blue || resolution.new.as_str() == green);
            prop_assert_ne!(Some(&resolution.new), resolution.existing.as_ref());
        }
    }

    #[test]
    fn more_than_one_live_slot_is_ambiguous(
        base in base_name(),
        live in live_slots(),
        others in unrelated_names(),
    ) {
        let count = [live.0, live.1, live.2].iter().filter(|l| **l).count();
        let names = listing(&base, live, &others);
        let result = resolve_slots(&base, names.iter().map(String::as_str));
        if count > 1 {
            let is_ambiguous =
                matches!(result, Err(SlotError::Ambiguous { existing, .. }) if existing.len() == count);
            prop_assert!(is_ambiguous);
        } else {
            prop_assert!(result.is_ok());
        }
    }

    #[test]
    fn unrelated_stacks_mean_first_deployment(
        base in base_name(),
        others in unrelated_names(),
    ) {
        let resolution = resolve_slots(&base, others.iter().map(String::as_str)).unwrap();
        prop_assert_eq!(resolution.existing, None);
        prop_assert_eq!(resolution.new.to_string(), format!("{base}-B"));
    }
}
