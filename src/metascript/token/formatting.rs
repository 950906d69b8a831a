//! Converting a token graph back into text
//!
//! This is used for:
//!
//! - Round-trip testing (source -> tokens -> source)
//! - Looking at what the layout pass inserted
//! - Debugging and visualization of token streams

use super::graph::{Token, TokenGraph};
use super::kind::TokenKind;

/// Concatenate the text of every token, virtual semicolons included.
pub fn detokenize(graph: &TokenGraph) -> String {
    graph.iter().map(|(_, token)| token.text.as_str()).collect()
}

/// The source text the graph was scanned from: every token except virtual semicolons.
pub fn source_text(graph: &TokenGraph) -> String {
    graph
        .iter()
        .filter(|(_, token)| token.kind != TokenKind::VirtualSemicolon)
        .map(|(_, token)| token.text.as_str())
        .collect()
}

/// One token per line, as `t_ident "x"` or a bare kind name for tokens without text.
pub fn show_all(graph: &TokenGraph, significant_only: bool) -> String {
    let tokens: Box<dyn Iterator<Item = &Token>> = if significant_only {
        Box::new(graph.significant().map(|(_, token)| token))
    } else {
        Box::new(graph.iter().map(|(_, token)| token))
    };
    tokens
        .map(|token| token.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON array of the tokens in full order.
pub fn to_json(graph: &TokenGraph) -> serde_json::Result<String> {
    let tokens: Vec<&Token> = graph.iter().map(|(_, token)| token).collect();
    serde_json::to_string_pretty(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metascript::token::Position;

    fn sample() -> TokenGraph {
        let mut graph = TokenGraph::new();
        let a = graph.push(TokenKind::Identifier, "a", Position::new(0, 0, 0));
        graph.push(TokenKind::LineBreak, "\n", Position::new(0, 1, 1));
        graph.push(TokenKind::Identifier, "b", Position::new(1, 0, 2));
        graph.push_end(Position::new(1, 1, 3));
        graph.splice_after(a, TokenKind::VirtualSemicolon, ";");
        graph
    }

    #[test]
    fn test_detokenize_includes_virtual_semicolons() {
        assert_eq!(detokenize(&sample()), "a;\nb");
    }

    #[test]
    fn test_source_text_skips_virtual_semicolons() {
        assert_eq!(source_text(&sample()), "a\nb");
    }

    #[test]
    fn test_show_all() {
        let graph = sample();
        assert_eq!(
            show_all(&graph, true),
            "s_start\nt_ident \"a\"\ns_semi\nt_ident \"b\"\ns_end"
        );
        assert_eq!(show_all(&graph, false).lines().count(), 6);
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[1]["kind"], "Identifier");
        assert_eq!(value[1]["text"], "a");
        assert_eq!(value[2]["kind"], "VirtualSemicolon");
    }
}
