//! End-to-end pipeline tests: parse → (lower) → print.

use canif_parse::{Event, Parser};
use canif_print::{JsonLowerer, PrintOptions, Printer};
use proptest::prelude::*;

fn verbatim_with(source: &str, options: PrintOptions) -> String {
    let mut out = Vec::new();
    let mut printer = Printer::new(&mut out, options);
    Parser::new(source)
        .parse(&mut printer)
        .unwrap_or_else(|err| panic!("parse error in {source:?}: {err}"));
    printer.finish().unwrap();
    String::from_utf8(out).unwrap()
}

fn verbatim(source: &str) -> String {
    verbatim_with(source, PrintOptions::default())
}

fn json_with(source: &str, options: PrintOptions) -> String {
    let mut out = Vec::new();
    let mut sink = JsonLowerer::new(Printer::new(&mut out, options.for_json()));
    Parser::new(source)
        .parse(&mut sink)
        .unwrap_or_else(|err| panic!("parse error in {source:?}: {err}"));
    sink.into_inner().finish().unwrap();
    String::from_utf8(out).unwrap()
}

fn json(source: &str) -> String {
    json_with(source, PrintOptions::default())
}

// The `-i 4 -j` scenarios

#[test]
fn scenario_tuple_value() {
    assert_eq!(
        json(r#"{"a": (1,2)}"#),
        "{\n    \"a\": [\n        1,\n        2\n    ]\n}\n"
    );
}

#[test]
fn scenario_set() {
    assert_eq!(
        json("{1, 2}"),
        "{\n    \"$set\": [\n        1,\n        2\n    ]\n}\n"
    );
}

#[test]
fn scenario_function_call() {
    assert_eq!(
        json(r#"myfunc("a1", null, "a2")"#),
        "{\n    \"$$myfunc\": [\n        \"a1\",\n        null,\n        \"a2\"\n    ]\n}\n"
    );
}

#[test]
fn scenario_empty_slots() {
    assert_eq!(
        json("[1,,,4]"),
        "[\n    1,\n    null,\n    null,\n    4\n]\n"
    );
}

#[test]
fn scenario_object_id() {
    assert_eq!(
        json(r#"ObjectId("507f191e810c19729de860ea")"#),
        "{\n    \"$$ObjectId\": [\n        \"507f191e810c19729de860ea\"\n    ]\n}\n"
    );
    assert_eq!(
        json(r#"oid("507f191e810c19729de860ea")"#),
        "{\n    \"$oid\": [\n        \"507f191e810c19729de860ea\"\n    ]\n}\n"
    );
}

#[test]
fn scenario_verbatim_set() {
    assert_eq!(
        verbatim(r#"{"a": {1,2}}"#),
        "{\n    \"a\": {\n        1,\n        2,\n    },\n}\n"
    );
}

// String prefixes through JSON mode

#[test]
fn string_prefixes() {
    assert_eq!(json_with(r"r'Hell\w'", PrintOptions::default().flatten()), "\"Hell\\\\w\"\n");
    assert_eq!(json_with(r#"b"Hell\x6F""#, PrintOptions::default().flatten()), "\"Hello\"\n");
    assert_eq!(
        json_with(r#"u"Hellо""#, PrintOptions::default().flatten()),
        "\"Hell\u{043E}\"\n"
    );
    assert_eq!(json_with("f'...'", PrintOptions::default().flatten()), "\"...\"\n");
}

#[test]
fn ensure_ascii_json() {
    let options = PrintOptions::default().flatten().ensure_ascii(true);
    assert_eq!(json_with(r#""Hellо""#, options.clone()), "\"Hell\\u043e\"\n");
    assert_eq!(json_with("\"\u{1F600}\"", options), "\"\\ud83d\\ude00\"\n");
}

// JSON-mode output must itself be strict JSON

#[test]
fn json_output_is_strict_json() {
    let sources = [
        r#"{"a": (1,2)}"#,
        "{1, 2}",
        r#"myfunc("a1", null, "a2")"#,
        "[1,,,4]",
        r#"ObjectId("507f191e810c19729de860ea")"#,
        "{a: 1, 'b': [True, False, None, NaN], \"c\": {x, r'\\d'}}",
        "new Date(1234, undefined)",
        "[<Foo object at 0x7f>, /ab+/i, 0x1f, (1,)]",
        "{'nested': {'deep': [[[{}]]],},}",
    ];
    for source in sources {
        for options in [PrintOptions::default(), PrintOptions::default().flatten()] {
            let out = json_with(source, options);
            let parsed: Result<serde_json::Value, _> = serde_json::from_str(&out);
            assert!(parsed.is_ok(), "not strict JSON for {source:?}: {out}");
        }
    }
}

#[test]
fn json_mode_never_emits_trailing_commas() {
    // Even when the caller asks for them, JSON mode forces them off
    let out = json_with("[1, 2,]", PrintOptions::default().trailing_commas(true));
    assert!(!out.contains(",\n]"), "unexpected trailing comma: {out}");
}

// Round-trip laws

#[test]
fn plain_json_pretty_prints_like_json() {
    let source = r#"{"a": [1, 2.5], "b": {"c": "text", "d": [true, false, null]}}"#;
    let out = verbatim_with(source, PrintOptions::default().trailing_commas(false));
    let expected = concat!(
        "{\n",
        "    \"a\": [\n",
        "        1,\n",
        "        2.5\n",
        "    ],\n",
        "    \"b\": {\n",
        "        \"c\": \"text\",\n",
        "        \"d\": [\n",
        "            true,\n",
        "            false,\n",
        "            null\n",
        "        ]\n",
        "    }\n",
        "}\n",
    );
    assert_eq!(out, expected);
    // And the reformatted text still means the same JSON value
    let before: serde_json::Value = serde_json::from_str(source).unwrap();
    let after: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(before, after);
}

#[test]
fn verbatim_print_is_idempotent() {
    let sources = [
        r#"{"a": (1,2), "b": {1, 2}, "c": [f(x), {}, (9,), <A b>, /x/g]}"#,
        "[1,,,4]",
        "[1,,]",
        "[,]",
        "{a: 1, 'b': r'x\\y', \"c\": new Date(0), 2: 0x1f}",
        "()",
    ];
    for source in sources {
        for options in [
            PrintOptions::default(),
            PrintOptions::default().flatten(),
            PrintOptions::default().trailing_commas(false),
        ] {
            let once = verbatim_with(source, options.clone());
            let twice = verbatim_with(&once, options);
            assert_eq!(once, twice, "not idempotent for {source:?}");
        }
    }
}

#[test]
fn decoded_values_survive_reprinting() {
    let source = r#"["aA", 'b\x41', r'c\d', b"e\x66", /g\/h/i, name]"#;
    let before = Parser::new(source).parse_to_vec().unwrap();
    let printed = verbatim_with(source, PrintOptions::default());
    let after = Parser::new(&printed).parse_to_vec().unwrap();
    fn atom_values(events: &[Event<'_>]) -> Vec<Option<String>> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::Atom(atom) => Some(atom.value.clone().map(|v| v.into_owned())),
                _ => None,
            })
            .collect()
    }
    assert_eq!(atom_values(&before), atom_values(&after));
    assert!(!atom_values(&before).is_empty());
}

#[test]
fn number_lexemes_are_untouched() {
    let source = "[0.50, -3e2, 5.12E-1, 1000000000000000000000000, 0x1f]";
    let out = verbatim_with(source, PrintOptions::default().flatten());
    assert_eq!(out, format!("{source}\n"));
}

#[test]
fn deep_nesting() {
    let depth = 100;
    let source = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
    let flat = verbatim_with(&source, PrintOptions::default().flatten());
    assert_eq!(flat, format!("{source}\n"));
    let json_out = json_with(&source, PrintOptions::default().flatten());
    assert!(serde_json::from_str::<serde_json::Value>(&json_out).is_ok());
}

// Property: printing then reparsing reaches a fixed point, and flat
// output holds the one-newline rule, for arbitrary JSON-safe documents.

#[derive(Debug, Clone)]
enum Doc {
    Number(i64),
    Text(String),
    Ident(String),
    List(Vec<Doc>),
    Map(Vec<(String, Doc)>),
}

impl Doc {
    fn render(&self, out: &mut String) {
        match self {
            Doc::Number(n) => out.push_str(&n.to_string()),
            Doc::Text(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            Doc::Ident(name) => out.push_str(name),
            Doc::List(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    item.render(out);
                }
                out.push(']');
            }
            Doc::Map(entries) => {
                out.push('{');
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(key);
                    out.push(':');
                    value.render(out);
                }
                out.push('}');
            }
        }
    }
}

fn doc_strategy() -> impl Strategy<Value = Doc> {
    let ident = "[a-z][a-z0-9_]{0,7}";
    let leaf = prop_oneof![
        any::<i64>().prop_map(Doc::Number),
        "[ a-zA-Z0-9_.+-]{0,12}".prop_map(Doc::Text),
        ident.prop_map(Doc::Ident),
    ];
    leaf.prop_recursive(4, 32, 6, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Doc::List),
            prop::collection::vec(("[a-z][a-z0-9_]{0,7}", inner), 1..6)
                .prop_map(Doc::Map),
        ]
    })
}

proptest! {
    #[test]
    fn printed_output_reaches_a_fixed_point(doc in doc_strategy()) {
        let mut source = String::new();
        doc.render(&mut source);
        for options in [PrintOptions::default(), PrintOptions::default().flatten()] {
            let once = verbatim_with(&source, options.clone());
            let twice = verbatim_with(&once, options);
            prop_assert_eq!(&once, &twice);
        }
    }

    #[test]
    fn flat_output_has_no_interior_newlines(doc in doc_strategy()) {
        let mut source = String::new();
        doc.render(&mut source);
        let out = verbatim_with(&source, PrintOptions::default().flatten());
        prop_assert_eq!(out.find('\n'), Some(out.len() - 1));
        let out = json_with(&source, PrintOptions::default().flatten());
        prop_assert_eq!(out.find('\n'), Some(out.len() - 1));
    }
}
