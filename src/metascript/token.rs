//! Token types and the token graph shared by the scanner, the layout pass and the parser.
//!
//! Token Layers
//!
//!     Raw Tokens:
//!         Produced by the scanner from the rule table, one per matched lexeme. Whitespace,
//!         line breaks and comments are kept as tokens so the original source can always be
//!         rebuilt from the graph. See [kind] for the complete list.
//!
//!     Significant Tokens:
//!         Everything the grammar looks at: literals, operators, punctuation, identifiers and
//!         the synthetic tokens below. The graph links them in a second, significant-only
//!         order next to the full order. See [graph].
//!
//!     Synthetic Tokens:
//!         Tokens with no (or no original) source text: the stream start and end markers the
//!         scanner places around the input, and the virtual semicolons the layout pass splices
//!         in. They carry the position of the place they were inserted at.

pub mod formatting;
pub mod graph;
pub mod kind;

pub use graph::{Lexeme, Position, Token, TokenGraph, TokenId};
pub use kind::{Tier, TokenKind};
