//! Layout pass: where virtual semicolons go, and what is left of the graph afterwards.

use metascript::metascript::lexing::{insert_virtual_semicolons, scan};
use metascript::metascript::testing::{
    assert_links_consistent, significant_texts, virtual_semicolon_count,
};
use metascript::metascript::token::formatting::{detokenize, source_text};
use metascript::metascript::token::{TokenGraph, TokenKind};
use proptest::prelude::*;
use rstest::rstest;

fn laid_out(source: &str) -> TokenGraph {
    let mut graph = scan(source).unwrap();
    insert_virtual_semicolons(&mut graph).unwrap();
    graph
}

#[rstest]
#[case::separate_lines("a\nb", "a;\nb")]
#[case::crlf_lines("a\r\nb", "a;\r\nb")]
#[case::continued_operator("total = a +\n  b", "total = a +\n  b")]
#[case::leading_operator("total = a\n  + b", "total = a\n  + b")]
#[case::explicit_semicolon("a;\nb", "a;\nb")]
#[case::blank_lines("a\n\n\nb", "a;\n\n\nb")]
#[case::trailing_newline("a\n", "a\n")]
#[case::array_lines("x = [\n1\n2\n]", "x = [\n1\n2\n]")]
#[case::nested_blocks(
    "{\n  a\n  {\n    b\n    c\n  }\n  d\n}",
    "{\n  a\n  {\n    b;\n    c\n  };\n  d\n}"
)]
#[case::else_continues("{\n  a\n  else b\n}", "{\n  a\n  else b\n}")]
#[case::brace_on_next_line("f\n{ k: v }", "f\n{ k: v }")]
#[case::introducer("{x =>\n    y\n    z\n}", "{x =>\n    y;\n    z\n}")]
#[case::comment_cancels("{\n  a // done\n}", "{\n  a; // done\n}")]
#[case::block_comment_cancels("{\n  a /* done */\n}", "{\n  a; /* done */\n}")]
fn test_insertion(#[case] source: &str, #[case] expected: &str) {
    let graph = laid_out(source);
    assert_eq!(detokenize(&graph), expected);
    assert_eq!(source_text(&graph), source);
    assert_links_consistent(&graph);
}

#[test]
fn test_same_column_lines_become_two_statements() {
    let graph = laid_out("{\n  a\n  b\n}");
    assert_eq!(virtual_semicolon_count(&graph), 1);
    assert_eq!(significant_texts(&graph), vec!["{", "a", ";", "b", "}"]);
}

#[test]
fn test_virtual_semicolon_sits_at_end_of_anchor() {
    let graph = laid_out("first\nsecond");
    let (_, semi) = graph
        .iter()
        .find(|(_, t)| t.kind == TokenKind::VirtualSemicolon)
        .unwrap();
    assert_eq!((semi.position.line, semi.position.column), (0, 5));
}

#[rstest]
#[case::stray_closer("a\n]", "Encountered ] without opening [", (1, 0))]
#[case::stray_paren("f)", "Encountered ) without opening (", (0, 1))]
#[case::unclosed_brace("{\n  a", "No closing } for opening {", (0, 0))]
#[case::unclosed_paren("x = (1 + 2", "No closing ) for opening (", (0, 4))]
#[case::crossed("{ ( }", "No closing ) for opening (", (0, 2))]
fn test_structural_errors(
    #[case] source: &str,
    #[case] message: &str,
    #[case] at: (usize, usize),
) {
    let mut graph = scan(source).unwrap();
    let error = insert_virtual_semicolons(&mut graph).unwrap_err();
    assert_eq!(error.message, message);
    assert_eq!((error.position.line, error.position.column), at);
    assert_eq!(graph[error.token].position, error.position);
}

#[test]
fn test_error_keeps_semicolons_inserted_before_it() {
    let mut graph = scan("a\nb\n)").unwrap();
    assert!(insert_virtual_semicolons(&mut graph).is_err());
    assert_eq!(virtual_semicolon_count(&graph), 2);
    assert_links_consistent(&graph);
}

fn line_strategy() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just(""), Just("  "), Just("    ")],
        prop_oneof![
            Just("a"),
            Just("b + c"),
            Just("x =>"),
            Just("{"),
            Just("}"),
            Just("[1,"),
            Just("2]"),
            Just("// note"),
            Just("else"),
            Just("(p"),
            Just(")"),
            Just(";"),
            Just(""),
        ],
    )
        .prop_map(|(indent, line)| format!("{}{}", indent, line))
}

fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(line_strategy(), 0..12).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn test_layout_keeps_graph_consistent(source in program_strategy()) {
        let mut graph = scan(&source).unwrap();
        let result = insert_virtual_semicolons(&mut graph);
        assert_links_consistent(&graph);
        prop_assert_eq!(source_text(&graph), source);
        if let Ok(inserted) = result {
            prop_assert_eq!(inserted, virtual_semicolon_count(&graph));
        }
    }

    #[test]
    fn test_virtual_semicolons_never_double_up(source in program_strategy()) {
        let mut graph = scan(&source).unwrap();
        let _ = insert_virtual_semicolons(&mut graph);
        for (id, token) in graph.iter() {
            if token.kind != TokenKind::VirtualSemicolon {
                continue;
            }
            let prev = graph.prev_significant(id).unwrap();
            let next = graph.next_significant(id).unwrap();
            prop_assert_ne!(graph[prev].text.as_str(), ";");
            prop_assert_ne!(graph[next].text.as_str(), ";");
            prop_assert_ne!(graph[prev].kind, TokenKind::Start);
            prop_assert_ne!(graph[next].kind, TokenKind::End);
        }
    }
}
