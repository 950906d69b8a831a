//! Abstract syntax tree
//!
//!     The grammar produces a single [Node] type. Binary expressions are flat chains of
//!     operands and operator tokens (`[a, +, b, +, c]`) rather than nested pairs; a chain of one
//!     operand collapses to that operand, so `5` parses to a bare literal and not to a wrapper.
//!
//!     Nodes print as compact s-expressions (`(2 + (3 * 4))`) and serialize to JSON.

pub mod node;

pub use node::{Literal, LiteralKind, Node};
