//! Property-based tests for the scanner
//!
//! Whatever the input, scanning must account for every byte of it: the token texts and the
//! leftover of a lexical error concatenate back to the source, positions follow the text, and
//! the graph is consistently linked.

use metascript::metascript::lexing::scan;
use metascript::metascript::testing::assert_links_consistent;
use metascript::metascript::token::formatting::detokenize;
use metascript::metascript::token::{Position, TokenGraph};
use proptest::prelude::*;

/// Mostly MetaScript punctuation and words, with a few characters no rule accepts.
fn source_strategy() -> impl Strategy<Value = String> {
    r#"[a-z0-9 +*/=<>(){};,.:?`"\r\n\t#@\[\]-]{0,60}"#
}

/// Line-oriented programs that always scan.
fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop_oneof![Just(""), Just("  "), Just("\t")],
            prop_oneof![
                Just("a = 1"),
                Just("b += a * 2 // twice"),
                Just("/* block */ c"),
                Just("\"text\" + `name`"),
                Just("0x1F.x[0]"),
                Just("{ k: v }"),
            ],
        ),
        0..8,
    )
    .prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, line)| format!("{}{}", indent, line))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

fn graph_of(source: &str) -> TokenGraph {
    match scan(source) {
        Ok(graph) => graph,
        Err(failure) => failure.graph,
    }
}

proptest! {
    #[test]
    fn test_scanning_accounts_for_every_byte(source in source_strategy()) {
        match scan(&source) {
            Ok(graph) => prop_assert_eq!(detokenize(&graph), source),
            Err(failure) => {
                let consumed = detokenize(&failure.graph);
                prop_assert_eq!(failure.error.position.offset, consumed.len());
                prop_assert!(!failure.error.leftover.is_empty());
                prop_assert_eq!(format!("{}{}", consumed, failure.error.leftover), source);
            }
        }
    }

    #[test]
    fn test_positions_follow_the_text(source in source_strategy()) {
        let graph = graph_of(&source);
        let mut offset = 0;
        for (_, token) in graph.iter() {
            prop_assert_eq!(token.position.offset, offset);
            prop_assert_eq!(token.position, Position::default().advanced_by(&source[..offset]));
            offset += token.text.len();
        }
    }

    #[test]
    fn test_scanned_graph_is_linked(source in source_strategy()) {
        assert_links_consistent(&graph_of(&source));
    }

    #[test]
    fn test_programs_scan_completely(source in program_strategy()) {
        let graph = scan(&source).unwrap();
        prop_assert!(graph.end().is_some());
        prop_assert_eq!(detokenize(&graph), source);
    }
}
