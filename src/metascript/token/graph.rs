//! Token graph
//!
//!     Tokens live in an arena and are addressed by [TokenId]. Every token is linked twice:
//!     into the full sequence (every token, whitespace and comments included) and into the
//!     significant sequence (only tokens the grammar sees). For any token `t`,
//!     `next_significant(t)` is the nearest significant token strictly after `t` and
//!     `prev_significant(t)` the nearest strictly before it; this holds for non-significant
//!     tokens too, which is what lets the layout pass jump from a line break straight to its
//!     significant neighbours.
//!
//!     The graph only grows. Tokens are appended by the scanner and spliced in by the layout
//!     pass through [TokenGraph::splice_after], which repairs both orders locally.

use super::kind::TokenKind;
use serde::Serialize;
use std::fmt;
use std::ops::Index;

/// Handle of a token inside its [TokenGraph].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenId(usize);

impl TokenId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Source position. Line and column are 0-based, the column counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Position right after `text` when it starts at `self`.
    ///
    /// `\r\n`, `\r` and `\n` each count as one line break; after a break the column is the
    /// number of characters following the last one.
    pub fn advanced_by(self, text: &str) -> Position {
        let mut line = self.line;
        let mut column = self.column;
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    line += 1;
                    column = 0;
                }
                '\n' => {
                    line += 1;
                    column = 0;
                }
                _ => column += 1,
            }
        }
        Position {
            line,
            column,
            offset: self.offset + text.len(),
        }
    }
}

impl fmt::Display for Position {
    /// 1-based `line:column`, the way editors count.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Links {
    next: Option<TokenId>,
    prev: Option<TokenId>,
    next_significant: Option<TokenId>,
    prev_significant: Option<TokenId>,
}

/// A token: kind, text and where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
    #[serde(skip)]
    links: Links,
}

impl Token {
    pub fn is_significant(&self) -> bool {
        self.kind.is_significant()
    }

    pub fn end_position(&self) -> Position {
        self.position.advanced_by(&self.text)
    }
}

impl fmt::Display for Token {
    /// `t_ident "x"` for tokens with source text, the bare kind name otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_significant() && !self.kind.is_synthetic() {
            write!(f, "{} {:?}", self.kind, self.text)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// Owned snapshot of a token, the value token parsers produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Arena of tokens linked in full and significant order.
#[derive(Debug, Clone)]
pub struct TokenGraph {
    tokens: Vec<Token>,
    last: Option<TokenId>,
}

impl TokenGraph {
    /// A graph holding only the stream start marker.
    pub fn new() -> Self {
        let mut graph = TokenGraph {
            tokens: Vec::new(),
            last: None,
        };
        graph.push(TokenKind::Start, "", Position::default());
        graph
    }

    /// Append a token at the end of the full sequence.
    pub fn push(&mut self, kind: TokenKind, text: &str, position: Position) -> TokenId {
        let id = TokenId(self.tokens.len());
        let prev = self.last;
        let prev_significant = prev.and_then(|p| {
            if self[p].is_significant() {
                Some(p)
            } else {
                self[p].links.prev_significant
            }
        });
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            position,
            links: Links {
                next: None,
                prev,
                next_significant: None,
                prev_significant,
            },
        });
        if let Some(p) = prev {
            self.tokens[p.0].links.next = Some(id);
        }
        if kind.is_significant() {
            // Everything back to the previous significant token now points forward to us.
            let mut cursor = prev;
            while let Some(c) = cursor {
                self.tokens[c.0].links.next_significant = Some(id);
                if self.tokens[c.0].is_significant() {
                    break;
                }
                cursor = self.tokens[c.0].links.prev;
            }
        }
        self.last = Some(id);
        id
    }

    /// Append the stream end marker at `position`.
    pub fn push_end(&mut self, position: Position) -> TokenId {
        self.push(TokenKind::End, "", position)
    }

    /// Insert a token right after `anchor` in the full sequence and repair the significant
    /// links around it. The new token is positioned at the end of the anchor's text.
    pub fn splice_after(&mut self, anchor: TokenId, kind: TokenKind, text: &str) -> TokenId {
        let id = TokenId(self.tokens.len());
        let anchor_links = self[anchor].links;
        let prev_significant = if self[anchor].is_significant() {
            Some(anchor)
        } else {
            anchor_links.prev_significant
        };
        let position = self[anchor].end_position();
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            position,
            links: Links {
                next: anchor_links.next,
                prev: Some(anchor),
                next_significant: anchor_links.next_significant,
                prev_significant,
            },
        });
        self.tokens[anchor.0].links.next = Some(id);
        match anchor_links.next {
            Some(next) => self.tokens[next.0].links.prev = Some(id),
            None => self.last = Some(id),
        }

        if kind.is_significant() {
            // Forward: up to and including the next significant token, predecessors become us.
            let mut cursor = anchor_links.next;
            while let Some(c) = cursor {
                self.tokens[c.0].links.prev_significant = Some(id);
                if self.tokens[c.0].is_significant() {
                    break;
                }
                cursor = self.tokens[c.0].links.next;
            }
            // Backward: from the anchor to the nearest significant token, successors become us.
            let mut cursor = Some(anchor);
            while let Some(c) = cursor {
                self.tokens[c.0].links.next_significant = Some(id);
                if self.tokens[c.0].is_significant() {
                    break;
                }
                cursor = self.tokens[c.0].links.prev;
            }
        }
        id
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.tokens.get(id.0)
    }

    /// The stream start marker.
    pub fn start(&self) -> TokenId {
        TokenId(0)
    }

    /// The stream end marker, absent when scanning stopped at a lexical error.
    pub fn end(&self) -> Option<TokenId> {
        self.last.filter(|&id| self[id].kind == TokenKind::End)
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self[id].links.next
    }

    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self[id].links.prev
    }

    pub fn next_significant(&self, id: TokenId) -> Option<TokenId> {
        self[id].links.next_significant
    }

    pub fn prev_significant(&self, id: TokenId) -> Option<TokenId> {
        self[id].links.prev_significant
    }

    /// Where a parser continues after consuming `id`: its next significant token, or `id`
    /// itself at the end of the stream.
    pub fn advance(&self, id: TokenId) -> TokenId {
        self.next_significant(id).unwrap_or(id)
    }

    pub fn lexeme(&self, id: TokenId) -> Lexeme {
        let token = &self[id];
        Lexeme {
            kind: token.kind,
            text: token.text.clone(),
            position: token.position,
        }
    }

    /// Tokens in full order, markers included.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            graph: self,
            cursor: Some(self.start()),
            significant_only: false,
        }
    }

    /// Tokens in significant order, markers included.
    pub fn significant(&self) -> Iter<'_> {
        Iter {
            graph: self,
            cursor: Some(self.start()),
            significant_only: true,
        }
    }
}

impl Default for TokenGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<TokenId> for TokenGraph {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.tokens[id.0]
    }
}

/// Walks a [TokenGraph] along one of its two orders.
pub struct Iter<'a> {
    graph: &'a TokenGraph,
    cursor: Option<TokenId>,
    significant_only: bool,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (TokenId, &'a Token);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let token = &self.graph[id];
        self.cursor = if self.significant_only {
            token.links.next_significant
        } else {
            token.links.next
        };
        Some((id, token))
    }
}
