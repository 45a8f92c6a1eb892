//! Property-based tests for the codec.
//!
//! These tests use proptest to verify that serialization round-trips over
//! randomly generated pattern trees, and that the pattern metrics and
//! validation invariants hold.

use proptest::prelude::*;

use gram_codec::{
    parse, parse_single, round_trip, serialize, validate, Pattern, PropertyMap, Subject, Value,
};

/// Names: mostly plain identifiers, sometimes ones that need quoting.
fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z][a-z0-9_]{0,6}",
        1 => Just("true".to_string()),
        1 => "[A-Za-z ]{1,8}",
        1 => "[0-9][a-z]{0,3}",
    ]
}

fn finite() -> impl Strategy<Value = f64> {
    prop_oneof![
        (-1000i64..1000).prop_map(|i| i as f64),
        -1.0e6f64..1.0e6,
    ]
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[ -~]{0,10}".prop_map(Value::String),
        "[a-z\\\\\"\n\t']{0,6}".prop_map(Value::String),
        any::<i64>().prop_map(Value::Integer),
        finite().prop_map(Value::Decimal),
        any::<bool>().prop_map(Value::Boolean),
        name().prop_map(Value::Symbol),
        (finite(), finite()).prop_map(|(a, b)| Value::Range { lower: a.min(b), upper: a.max(b) }),
        (finite(), "[a-z]{1,3}").prop_map(|(m, u)| Value::Measurement { magnitude: m, unit: u }),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(2, 12, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((name(), inner), 0..3)
                .prop_map(|kvs| Value::Map(kvs.into_iter().collect())),
        ]
    })
}

fn properties() -> impl Strategy<Value = PropertyMap> {
    prop::collection::vec((name(), value()), 0..3).prop_map(|kvs| kvs.into_iter().collect())
}

fn subject() -> impl Strategy<Value = Subject> {
    (
        prop::option::of(name()),
        prop::collection::btree_set(name(), 0..3),
        properties(),
    )
        .prop_map(|(id, labels, properties)| {
            let mut s = match id {
                Some(id) => Subject::new(id).unwrap(),
                None => Subject::anonymous(),
            };
            s.labels = labels;
            s.properties = properties;
            s
        })
}

fn pattern() -> impl Strategy<Value = Pattern<Subject>> {
    subject().prop_map(Pattern::point).prop_recursive(4, 24, 4, |inner| {
        (subject(), prop::collection::vec(inner, 1..4))
            .prop_map(|(value, elements)| Pattern::pattern(value, elements))
    })
}

proptest! {
    #[test]
    fn serialized_patterns_parse_back_equal(p in pattern()) {
        let text = serialize(&p);
        let back = parse_single(&text);
        prop_assert!(back.is_ok(), "{} did not parse: {:?}", text, back);
        prop_assert_eq!(back.unwrap(), p);
    }

    #[test]
    fn round_trip_is_idempotent(p in pattern()) {
        let once = round_trip(&serialize(&p)).unwrap();
        let twice = round_trip(&once).unwrap();
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn round_trip_keeps_identifiers(ps in prop::collection::vec(pattern(), 0..4)) {
        let text = gram_codec::serialize_patterns(&ps);
        let doc = parse(&text).unwrap();
        let again = parse(&round_trip(&text).unwrap()).unwrap();
        prop_assert_eq!(again.pattern_count(), doc.pattern_count());
        prop_assert_eq!(again.identifiers(), doc.identifiers());
    }

    #[test]
    fn pattern_metrics(p in pattern()) {
        let children: usize = p.elements().iter().map(Pattern::size).sum();
        prop_assert_eq!(p.size(), 1 + children);
        prop_assert_eq!(p.depth() == 1, p.is_atomic());
        prop_assert_eq!(p.length(), p.elements().len());
        prop_assert_eq!(p.values().len(), p.size());
    }

    #[test]
    fn validate_agrees_with_parse(input in "[()\\[\\]{}:,|@a-c0-9 \"'.<>~-]{0,24}") {
        prop_assert_eq!(validate(&input), parse(&input).is_ok());
    }

    #[test]
    fn label_add_remove_restores(s in subject(), label in name()) {
        prop_assume!(!s.has_label(&label));
        let mut t = s.clone();
        t.add_label(label.clone());
        prop_assert!(t.remove_label(&label));
        prop_assert_eq!(t, s);
    }

    #[test]
    fn property_set_remove_restores(s in subject(), key in name(), v in scalar()) {
        prop_assume!(s.get_property(&key).is_none());
        let mut t = s.clone();
        t.set_property(key.clone(), v);
        prop_assert!(t.remove_property(&key).is_some());
        prop_assert_eq!(t, s);
    }
}
