//! Virtual semicolon insertion
//!
//!     MetaScript separates statements with semicolons, but most of them are left out of the
//!     source and implied by layout: a line that starts at or left of the column where its
//!     block's first statement starts begins a new statement. This transformation makes those
//!     separators explicit by splicing synthetic `;` tokens ([TokenKind::VirtualSemicolon])
//!     into the graph, so the grammar only ever sees explicit separators.
//!
//! Scopes
//!
//!     The pass keeps a stack of open scopes: the whole stream, and every `{`, `[` and `(`.
//!     The stream and `{` scopes carry a reference column, the column of the first significant
//!     token after their opener. When the block opens with a parameter introducer
//!     (`a, b =>`), the reference column is the one of the first token after the arrow.
//!
//!     Only line breaks directly inside the stream or a `{` scope can produce a semicolon; `[`
//!     scopes never do. Parentheses are transparent: a line break inside `( )` is judged by the
//!     scope around them. They are tracked so unbalanced parentheses are reported here.
//!
//! Insertion
//!
//!     For a line break, with `prev` and `next` its significant neighbours, a semicolon goes
//!     right after `prev` when:
//!
//!         1. `next` is not the end of the stream and not a `;`,
//!         2. `prev` is not the start of the stream and not a `;`,
//!         3. the pair is not suppressed: `next` is `else`, `{` or `}`, or `prev` is `{` or
//!            `=>`. A comment or another line break between the two cancels the suppression.
//!         4. `next` starts at or left of the scope's reference column.
//!
//!     A bracket that closes the wrong scope, a scope left open at the end of the stream, or
//!     brackets nested deeper than [MAX_NESTING] are a [StructuralError]. The pass stops there
//!     and keeps what it already inserted. The grammar parses nested brackets recursively, so
//!     the nesting limit keeps it within a thread's stack.

use crate::metascript::error::StructuralError;
use crate::metascript::parsing::combinators::{
    choice, constant, discard_left, kind, optional, separated_by, Parser,
};
use crate::metascript::token::{Lexeme, TokenGraph, TokenId, TokenKind};

/// Most brackets that may be open at once.
pub const MAX_NESTING: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Stream,
    Brace,
    Bracket,
    Paren,
}

impl ScopeKind {
    fn opening(self) -> &'static str {
        match self {
            ScopeKind::Stream => "start of input",
            ScopeKind::Brace => "{",
            ScopeKind::Bracket => "[",
            ScopeKind::Paren => "(",
        }
    }

    fn closing(self) -> &'static str {
        match self {
            ScopeKind::Stream => "end of input",
            ScopeKind::Brace => "}",
            ScopeKind::Bracket => "]",
            ScopeKind::Paren => ")",
        }
    }

    fn closed_by(kind: TokenKind) -> Option<ScopeKind> {
        match kind {
            TokenKind::RightBrace => Some(ScopeKind::Brace),
            TokenKind::RightBracket => Some(ScopeKind::Bracket),
            TokenKind::RightParen => Some(ScopeKind::Paren),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Scope {
    opener: TokenId,
    kind: ScopeKind,
    /// Set for the stream and `{` scopes only.
    reference_column: Option<usize>,
}

/// The offside-rule layout pass.
pub struct VirtualSemicolons {
    introducer: Parser<Lexeme>,
}

impl VirtualSemicolons {
    pub fn new() -> Self {
        let parameter = choice(vec![
            kind(TokenKind::Identifier),
            kind(TokenKind::QuotedIdentifier),
        ]);
        let parameters = optional(
            constant(separated_by(parameter, kind(TokenKind::Comma)), ()),
            (),
        );
        VirtualSemicolons {
            introducer: discard_left(parameters, kind(TokenKind::Arrow)),
        }
    }

    /// Insert the virtual semicolons, returning how many were inserted.
    pub fn apply(&self, graph: &mut TokenGraph) -> Result<usize, StructuralError> {
        let mut scopes: Vec<Scope> = Vec::new();
        let mut inserted = 0;
        let mut cursor = Some(graph.start());
        let mut last = graph.start();

        while let Some(id) = cursor {
            last = id;
            match graph[id].kind {
                TokenKind::Start => scopes.push(Scope {
                    opener: id,
                    kind: ScopeKind::Stream,
                    reference_column: Some(self.reference_column(graph, id)),
                }),
                TokenKind::LeftBrace => scopes.push(Scope {
                    opener: id,
                    kind: ScopeKind::Brace,
                    reference_column: Some(self.reference_column(graph, id)),
                }),
                TokenKind::LeftBracket => scopes.push(Scope {
                    opener: id,
                    kind: ScopeKind::Bracket,
                    reference_column: None,
                }),
                TokenKind::LeftParen => scopes.push(Scope {
                    opener: id,
                    kind: ScopeKind::Paren,
                    reference_column: None,
                }),
                TokenKind::RightBrace | TokenKind::RightBracket | TokenKind::RightParen => {
                    close_scope(&mut scopes, graph, id)?;
                }
                TokenKind::End => {
                    finish(&mut scopes, graph, id)?;
                    return Ok(inserted);
                }
                TokenKind::LineBreak => {
                    let reference_column = scopes
                        .iter()
                        .rev()
                        .find(|scope| scope.kind != ScopeKind::Paren)
                        .and_then(|scope| scope.reference_column);
                    if let Some(column) = reference_column {
                        if let Some(anchor) = insertion_point(graph, id, column) {
                            log::debug!("inserting virtual semicolon after {}", graph[anchor]);
                            graph.splice_after(anchor, TokenKind::VirtualSemicolon, ";");
                            inserted += 1;
                        }
                    }
                }
                _ => {}
            }
            // The stream scope is not a bracket.
            if scopes.len() > MAX_NESTING + 1 {
                if let Some(scope) = scopes.last() {
                    return Err(StructuralError::at(
                        graph,
                        scope.opener,
                        format!(
                            "Nesting deeper than {} levels at opening {}",
                            MAX_NESTING,
                            scope.kind.opening()
                        ),
                    ));
                }
            }
            cursor = graph.next(id);
        }

        Err(truncated(&mut scopes, graph, last))
    }

    /// Column of the first significant token after `opener`, or after the arrow when the
    /// scope opens with a parameter introducer.
    fn reference_column(&self, graph: &TokenGraph, opener: TokenId) -> usize {
        let first = graph.advance(opener);
        let anchor = match self.introducer.parse(graph, first) {
            Ok(success) => success.rest,
            Err(_) => first,
        };
        graph[anchor].position.column
    }
}

impl Default for VirtualSemicolons {
    fn default() -> Self {
        Self::new()
    }
}

/// Run the layout pass over `graph`.
pub fn insert_virtual_semicolons(graph: &mut TokenGraph) -> Result<usize, StructuralError> {
    VirtualSemicolons::new().apply(graph)
}

fn close_scope(
    scopes: &mut Vec<Scope>,
    graph: &TokenGraph,
    closer: TokenId,
) -> Result<(), StructuralError> {
    let Some(expected) = ScopeKind::closed_by(graph[closer].kind) else {
        return Ok(());
    };
    match scopes.pop() {
        Some(scope) if scope.kind == expected => Ok(()),
        Some(scope) if scope.kind != ScopeKind::Stream => Err(unclosed(graph, &scope)),
        _ => Err(StructuralError::at(
            graph,
            closer,
            format!(
                "Encountered {} without opening {}",
                expected.closing(),
                expected.opening()
            ),
        )),
    }
}

fn finish(scopes: &mut Vec<Scope>, graph: &TokenGraph, end: TokenId) -> Result<(), StructuralError> {
    match scopes.pop() {
        Some(scope) if scope.kind == ScopeKind::Stream => Ok(()),
        Some(scope) => Err(unclosed(graph, &scope)),
        None => Err(StructuralError::at(graph, end, "Encountered end of input without start")),
    }
}

/// The walk ran out of tokens before the end marker, as it does on a partially scanned graph.
fn truncated(scopes: &mut Vec<Scope>, graph: &TokenGraph, last: TokenId) -> StructuralError {
    match scopes.pop() {
        Some(scope) if scope.kind != ScopeKind::Stream => unclosed(graph, &scope),
        _ => StructuralError::at(graph, last, "Token stream ends without end of input"),
    }
}

fn unclosed(graph: &TokenGraph, scope: &Scope) -> StructuralError {
    StructuralError::at(
        graph,
        scope.opener,
        format!(
            "No closing {} for opening {}",
            scope.kind.closing(),
            scope.kind.opening()
        ),
    )
}

/// Token to splice a semicolon after for this line break, if one is due.
fn insertion_point(graph: &TokenGraph, line_break: TokenId, reference_column: usize) -> Option<TokenId> {
    let prev = graph.prev_significant(line_break)?;
    let next = graph.next_significant(line_break)?;
    let (before, after) = (&graph[prev], &graph[next]);

    if after.kind == TokenKind::End || after.text == ";" {
        return None;
    }
    if before.kind == TokenKind::Start || before.text == ";" {
        return None;
    }
    let suppressed = (after.kind == TokenKind::Keyword && after.text == "else")
        || matches!(after.kind, TokenKind::LeftBrace | TokenKind::RightBrace)
        || matches!(before.kind, TokenKind::LeftBrace | TokenKind::Arrow);
    if suppressed && !gap_is_interrupted(graph, prev, next, line_break) {
        return None;
    }
    if after.position.column > reference_column {
        return None;
    }
    Some(prev)
}

/// A comment, or a line break other than `line_break`, between `prev` and `next`.
fn gap_is_interrupted(graph: &TokenGraph, prev: TokenId, next: TokenId, line_break: TokenId) -> bool {
    let mut cursor = graph.next(prev);
    while let Some(id) = cursor {
        if id == next {
            break;
        }
        let token = &graph[id];
        if token.kind.is_comment() || (token.kind == TokenKind::LineBreak && id != line_break) {
            return true;
        }
        cursor = graph.next(id);
    }
    false
}
