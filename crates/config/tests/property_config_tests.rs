//! Property-based tests for value coercion and document merging.
//!
//! These verify the resolver's two pure algorithms — environment value
//! coercion and non-destructive nested merge — against randomly generated
//! inputs to catch edge cases unit tests miss.

use std::collections::BTreeMap;

use proptest::prelude::*;

use factor_config::{coerce_env_value, Value};

/// Strategy for identifier-ish mapping keys.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,12}"
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-zA-Z0-9 _-]{0,16}".prop_map(Value::String),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Integer-looking strings always coerce to `Value::Int`.
    #[test]
    fn test_integers_coerce_to_int(n in any::<i64>()) {
        prop_assert_eq!(coerce_env_value(&n.to_string()), Value::Int(n));
    }

    /// Finite floats that are not integers coerce to `Value::Float`.
    #[test]
    fn test_floats_coerce_to_float(f in any::<f64>().prop_filter("finite, fractional", |f| {
        f.is_finite() && f.fract() != 0.0
    })) {
        let raw = format!("{f}");
        match coerce_env_value(&raw) {
            Value::Float(parsed) => prop_assert_eq!(parsed, raw.parse::<f64>().unwrap()),
            other => prop_assert!(false, "expected float, got {:?}", other),
        }
    }

    /// Strings that are not booleans or numbers pass through unchanged.
    #[test]
    fn test_non_numeric_strings_pass_through(s in "[a-zA-Z][a-zA-Z _-]{0,20}") {
        prop_assume!(!s.trim().eq_ignore_ascii_case("true"));
        prop_assume!(!s.trim().eq_ignore_ascii_case("false"));
        prop_assume!(s.parse::<f64>().is_err());
        prop_assert_eq!(coerce_env_value(&s), Value::String(s));
    }

    /// Boolean coercion is case-insensitive in both directions.
    #[test]
    fn test_bool_coercion_case_insensitive(upper in any::<bool>()) {
        let raw = if upper { "TRUE" } else { "true" };
        prop_assert_eq!(coerce_env_value(raw), Value::Bool(true));
        let raw = if upper { "FALSE" } else { "False" };
        prop_assert_eq!(coerce_env_value(raw), Value::Bool(false));
    }

    /// Merging `{parent: {k1: v1}}` with `{parent: {k2: v2}}` preserves both
    /// children when the keys differ, and takes the overlay when they collide.
    #[test]
    fn test_merge_preserves_disjoint_siblings(
        parent in key_strategy(),
        k1 in key_strategy(),
        k2 in key_strategy(),
        v1 in scalar_strategy(),
        v2 in scalar_strategy(),
    ) {
        let mut base = Value::Mapping(BTreeMap::from([(
            parent.clone(),
            Value::Mapping(BTreeMap::from([(k1.clone(), v1.clone())])),
        )]));
        let overlay = Value::Mapping(BTreeMap::from([(
            parent.clone(),
            Value::Mapping(BTreeMap::from([(k2.clone(), v2.clone())])),
        )]));
        base.merge_from(overlay);

        let k2_path = format!("{parent}.{k2}");
        prop_assert_eq!(base.pointer(&k2_path), Some(&v2));
        if k1 != k2 {
            let k1_path = format!("{parent}.{k1}");
            prop_assert_eq!(base.pointer(&k1_path), Some(&v1));
        }
    }

    /// Merging an empty overlay is the identity.
    #[test]
    fn test_merge_with_empty_overlay_is_identity(
        key in key_strategy(),
        value in scalar_strategy(),
    ) {
        let mut base = Value::Mapping(BTreeMap::from([(key.clone(), value.clone())]));
        let before = base.clone();
        base.merge_from(Value::empty_mapping());
        prop_assert_eq!(base, before);
    }
}
