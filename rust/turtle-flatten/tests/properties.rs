//! Property tests for splitting and bracket-free flattening.

use proptest::prelude::*;
use turtle_flatten::tokenizer::split;
use turtle_flatten::{FlattenConfig, convert};

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Statement-ish text with quotes, IRIs and both delimiters sprinkled in.
fn statement_text() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z0-9 ;.,"<>:\[\]]{0,40}"#).unwrap()
}

/// `(subject, [(predicate, [literal])])` with distinct subjects.
fn bracket_free_document() -> impl Strategy<Value = Vec<Vec<Vec<String>>>> {
    let objects = prop::collection::vec("[a-z ]{0,6}", 1..4);
    let predicates = prop::collection::vec(objects, 1..4);
    prop::collection::vec(predicates, 1..5)
}

proptest! {
    #[test]
    fn split_rejoins_to_the_same_text(
        text in statement_text(),
        delimiter in prop::sample::select(vec![';', ',', '.']),
    ) {
        let pieces = split(&text, delimiter);
        let rejoined = pieces.join(&format!("{delimiter} "));
        prop_assert_eq!(without_whitespace(&rejoined), without_whitespace(&text));
    }

    #[test]
    fn bracket_free_input_yields_one_line_per_object(document in bracket_free_document()) {
        let mut input = String::new();
        let mut expected = Vec::new();
        for (s, predicates) in document.iter().enumerate() {
            input.push_str(&format!("<s{s}>"));
            for (p, objects) in predicates.iter().enumerate() {
                if p > 0 {
                    input.push_str(" ;");
                }
                input.push_str(&format!(" <p{p}>"));
                for (o, object) in objects.iter().enumerate() {
                    if o > 0 {
                        input.push(',');
                    }
                    input.push_str(&format!(" \"{object}\""));
                    expected.push(format!("<s{s}> <<p{p}>>[{}] \"{object}\"", o + 1));
                }
            }
            input.push_str(" .\n");
        }

        let conversion = convert(&input, &FlattenConfig::default()).unwrap();
        prop_assert!(conversion.diagnostics.is_empty());
        let lines: Vec<String> = conversion.lines.iter().map(ToString::to_string).collect();
        prop_assert_eq!(lines, expected);
    }
}
