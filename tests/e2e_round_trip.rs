//! End-to-end tests for canonical serialization.
//!
//! text -> parse -> serialize -> parse must preserve structure, and a second
//! round trip must not change the text.

use gram_codec::{
    parse, parse_single, round_trip, serialize, serialize_document, Pattern, ParseOptions,
    Subject, Value,
};
use pretty_assertions::assert_eq;

const CORPUS: &[&str] = &[
    "(alice)",
    "()",
    "(alice:Person)",
    r#"(a {name: "Alice", age: 30})"#,
    "(a)-[:KNOWS]->(b)",
    "(a)-[r:KNOWS {since: 2020}]->(b)",
    "(a)<-[:OWNS]-(b)",
    "(a)--(b)",
    "(a)<-->(b)",
    "(a)-->(b)-->(c)<--(d)",
    "(a)~~(b)",
    "(a)~[:NEAR]~>(b)<~~(c)",
    "(a)<~[:OWNS]~(b)",
    "[team | (alice), (bob)]",
    "[team | alice, bob]",
    r#"[team:Team {name: "DevRel"} | (alice), (bob), (charlie)]"#,
    "[outer | [inner | (leaf)]]",
    "@type(node) (a)",
    "@a(1) @b([1, 2]) [g | (x)-->(y)]",
    "[| @a(1) @b(2) (x)]",
    "@outer(1) [{inner: 2} | (x)]",
    "(alice) (bob) (charlie)",
    "(v {r: -5..-1, d: 2.0, m: 5kg, s: 'it\\'s', sym: `two words`, map: {k: []}})",
    "(`odd id`:`Odd Label` {`odd key`: true})",
    "// comment\n(a) /* inline */ (b)",
    "[| (a)-[:X]->(b), (c)-[:Y]->(d)]",
    "[path | (a)-->(b)-->(c)]",
];

#[test]
fn test_scenario_round_trip() {
    let text = round_trip(
        r#"(alice:Person {name: "Alice"})-[:KNOWS]->(bob:Person {name: "Bob"})"#,
    )
    .unwrap();
    assert_eq!(
        text,
        r#"(alice:Person {name: "Alice"})-[:KNOWS]->(bob:Person {name: "Bob"})"#
    );

    let doc = parse(&text).unwrap();
    assert_eq!(doc.identifiers().into_iter().collect::<Vec<_>>(), vec!["alice", "bob"]);
    let alice = doc.patterns()[0].elements()[0].value();
    assert!(alice.has_label("Person"));
    assert_eq!(alice.get_property("name"), Some(&Value::String("Alice".into())));
}

#[test]
fn test_canonical_forms() {
    let cases = [
        ("( a )", "(a)"),
        ("(a:B:A)", "(a:A:B)"),
        ("(a {x:1,y:'s'})", r#"(a {x: 1, y: "s"})"#),
        ("(a)->(b)", "(a)-->(b)"),
        ("(a)<--(b)", "(b)-->(a)"),
        ("(a)-[]->(b)", "(a)-->(b)"),
        ("(a)--(b)", "(a)-->(b)"),
        ("(a)~~(b)", "(a)-->(b)"),
        ("(a)<~[:OWNS]~(b)", "(b)-[:OWNS]->(a)"),
        ("[team | alice, bob]", "[team | (alice), (bob)]"),
        ("(a {d: 3.0, r: 1.0..2.5})", "(a {d: 3.0, r: 1..2.5})"),
        ("(a {m: 5kg})", "(a {m: 5.0kg})"),
        ("(a) (b)", "(a)\n(b)"),
        ("", ""),
    ];
    for (input, expected) in cases {
        assert_eq!(round_trip(input).unwrap(), expected, "{input}");
    }
}

#[test]
fn test_corpus_structure_preserved() {
    for input in CORPUS {
        let original = parse(input).unwrap();
        let text = serialize_document(&original);
        let reparsed = parse(&text).unwrap_or_else(|e| panic!("{text:?} failed to re-parse: {e}"));
        assert_eq!(reparsed, original, "{input}");
        assert_eq!(reparsed.pattern_count(), original.pattern_count());
        assert_eq!(reparsed.identifiers(), original.identifiers());
    }
}

#[test]
fn test_corpus_idempotent() {
    for input in CORPUS {
        let once = round_trip(input).unwrap();
        let twice = round_trip(&once).unwrap();
        assert_eq!(twice, once, "{input}");
    }
}

#[test]
fn test_constructed_pattern_round_trip() {
    let alice = Subject::new("alice")
        .unwrap()
        .with_label("Person")
        .with_property("tags", vec!["a", "b"])
        .with_property("score", 9.5);
    let bob = Subject::new("bob").unwrap();
    let team = Pattern::pattern(
        Subject::new("team").unwrap().with_label("Team"),
        vec![Pattern::point(alice), Pattern::point(bob)],
    );

    let text = serialize(&team);
    assert_eq!(text, r#"[team:Team | (alice:Person {tags: ["a", "b"], score: 9.5}), (bob)]"#);
    assert_eq!(parse_single(&text).unwrap(), team);
}

#[test]
fn test_mutated_subject_serializes() {
    let mut node = parse_single("(a:Draft {v: 1})").unwrap();
    node.value.remove_label("Draft");
    node.value.add_label("Final");
    node.value.set_property("v", 2);
    node.value.set_property("note", "ok");
    assert_eq!(serialize(&node), r#"(a:Final {v: 2, note: "ok"})"#);
}

#[test]
fn test_deepest_parseable_tree_round_trips() {
    let mut p = Pattern::point(Subject::new("x").unwrap());
    for _ in 1..ParseOptions::DEFAULT_MAX_DEPTH {
        p = Pattern::pattern(Subject::new("g").unwrap(), vec![p]);
    }
    assert_eq!(p.depth(), ParseOptions::DEFAULT_MAX_DEPTH);
    assert_eq!(p.size(), ParseOptions::DEFAULT_MAX_DEPTH);

    let text = serialize(&p);
    assert_eq!(parse_single(&text).unwrap(), p);
}
