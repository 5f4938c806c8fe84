use std::cmp::Ordering;

use proptest::prelude::*;
use serde_json::{json, Value};
use sift::{compare, equal, to_f64};

/// Scalar values drawn across every kind the comparator unifies.
fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-1_000_000_i64..1_000_000).prop_map(Value::from),
        (-1.0e6..1.0e6).prop_map(Value::from),
        "[a-z]{0,12}".prop_map(Value::from),
    ]
}

/// Numeric values only, for ordering properties.
fn arb_number() -> impl Strategy<Value = Value> {
    prop_oneof![
        (-1_000_000_i64..1_000_000).prop_map(Value::from),
        (-1.0e6..1.0e6).prop_map(Value::from),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // ------------------------------------------------------------------
    // Reflexivity: every value equals itself.
    // ------------------------------------------------------------------
    #[test]
    fn compare_is_reflexive(v in arb_scalar()) {
        prop_assert_eq!(compare(&v, &v), Ordering::Equal);
        prop_assert!(equal(&v, &v));
    }

    #[test]
    fn compare_is_reflexive_for_composites(
        items in prop::collection::vec(arb_scalar(), 0..4)
    ) {
        let v = Value::Array(items);
        prop_assert_eq!(compare(&v, &v), Ordering::Equal);
    }

    // ------------------------------------------------------------------
    // Antisymmetry over numbers: compare(a, b) == compare(b, a).reverse().
    // ------------------------------------------------------------------
    #[test]
    fn numeric_compare_is_antisymmetric(a in arb_number(), b in arb_number()) {
        prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
    }

    // ------------------------------------------------------------------
    // The numeric path agrees with float comparison outside the epsilon.
    // ------------------------------------------------------------------
    #[test]
    fn numeric_compare_agrees_with_floats(a in arb_number(), b in arb_number()) {
        // Differences inside the comparator's epsilon are deliberately
        // Equal; only assert the clear-cut cases.
        let (x, y) = (to_f64(&a), to_f64(&b));
        if (x - y).abs() >= 1e-7 {
            let expected = if x < y { Ordering::Less } else { Ordering::Greater };
            prop_assert_eq!(compare(&a, &b), expected);
        }
    }

    // ------------------------------------------------------------------
    // Cross-type: a number and its string form compare equal.
    // ------------------------------------------------------------------
    #[test]
    fn number_equals_its_string_form(n in -1_000_000_i64..1_000_000) {
        let as_number = json!(n);
        let as_string = json!(n.to_string());
        prop_assert!(equal(&as_number, &as_string));
    }

    // ------------------------------------------------------------------
    // Path round-trip: what write puts at a map path, read gets back.
    // ------------------------------------------------------------------
    #[test]
    fn write_then_read_round_trips(
        key in "[a-z]{1,8}",
        nested in "[a-z]{1,8}",
        v in arb_scalar()
    ) {
        let mut root = json!({ key.clone(): {} });
        let path = format!("{key}.{nested}");
        sift::path::write(&mut root, &path, v.clone()).unwrap();
        prop_assert_eq!(sift::path::read(&root, &path), Some(&v));
    }
}
