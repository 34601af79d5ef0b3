use proptest::prelude::*;
use tilt_domain::TaggedValue;
use tilt_store::{ConfigDocument, is_storable_program_name, parse_blocks};

// Includes the line grammar's separators so unsaveable input is exercised too.
const LINE_CHARS: &str = "[A-Za-z0-9 =_.\n\r\\[\\]-]";

fn tagged_value() -> impl Strategy<Value = TaggedValue> {
    prop_oneof![
        any::<i32>().prop_map(TaggedValue::integer),
        any::<bool>().prop_map(TaggedValue::boolean),
        (-1.0e9..1.0e9f64).prop_map(TaggedValue::double),
        proptest::string::string_regex(&format!("{LINE_CHARS}{{0,12}}")).unwrap().prop_map(TaggedValue::text),
    ]
}

fn document() -> impl Strategy<Value = ConfigDocument> {
    let name = format!("{LINE_CHARS}{{0,6}}");
    prop::collection::vec((proptest::string::string_regex(&name).unwrap(), proptest::string::string_regex(&name).unwrap(), tagged_value()), 0..24)
        .prop_map(|entries| {
            let mut doc = ConfigDocument::new();
            for (program, key, value) in entries {
                doc.program_mut(&program).put_tagged(&key, value);
            }
            doc
        })
}

proptest! {
    #[test]
    fn serialized_document_parses_back_identically(doc in document()) {
        let text = doc.to_string();
        let outcome = parse_blocks(&text);

        let saved: Vec<_> = doc
            .entries()
            .into_iter()
            .filter(|(program, _, _)| is_storable_program_name(program))
            .collect();

        prop_assert!(outcome.diagnostics.is_empty());
        prop_assert_eq!(ConfigDocument::from_outcome(outcome).entries(), saved);
    }

    #[test]
    fn serialization_is_idempotent(doc in document()) {
        let once = doc.to_string();
        let twice = ConfigDocument::parse(&once).to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn parser_never_panics(text in "(\\[[a-z]{0,10}\\]|[A-Za-z.=_0-9]{0,16}|)(\n(\\[[a-z]{0,10}\\]|[A-Za-z.=_0-9]{0,16}|)){0,12}") {
        let outcome = parse_blocks(&text);
        let _ = ConfigDocument::from_outcome(outcome).to_string();
    }
}
