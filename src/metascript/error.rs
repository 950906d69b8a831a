//! Error types for the MetaScript front end.

use crate::metascript::parsing::combinators::Failure;
use crate::metascript::token::{Position, TokenGraph, TokenId};
use thiserror::Error;

/// No lexical rule matched at `position`. `leftover` is everything from there on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: no token rule matches {:?}", preview(.leftover))]
pub struct LexicalError {
    pub position: Position,
    pub leftover: String,
}

/// Bracket mismatch found by the layout pass, or a grammar failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{position}: {message}")]
pub struct StructuralError {
    pub message: String,
    pub position: Position,
    pub token: TokenId,
}

impl StructuralError {
    pub fn at(graph: &TokenGraph, token: TokenId, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: graph[token].position,
            token,
        }
    }

    /// Convert a parser failure, resolving its token to a source position.
    pub fn from_failure(graph: &TokenGraph, failure: Failure) -> Self {
        Self::at(graph, failure.position, failure.message)
    }
}

/// The one error a failed compile reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("lexical error at {0}")]
    Lexical(#[from] LexicalError),

    #[error("structural error at {0}")]
    Structural(#[from] StructuralError),
}

impl CompileError {
    pub fn position(&self) -> Position {
        match self {
            CompileError::Lexical(error) => error.position,
            CompileError::Structural(error) => error.position,
        }
    }
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 16;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexical_error_message_truncates_leftover() {
        let error = LexicalError {
            position: Position::new(2, 4, 30),
            leftover: "#abcdefghijklmnopqrstuvwxyz".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "3:5: no token rule matches \"#abcdefghijklmno...\""
        );
    }

    #[test]
    fn test_compile_error_wraps_structural() {
        let mut graph = TokenGraph::new();
        graph.push_end(Position::default());
        let error: CompileError = StructuralError::at(&graph, graph.start(), "boom").into();
        assert_eq!(error.to_string(), "structural error at 1:1: boom");
        assert_eq!(error.position(), Position::default());
    }
}
