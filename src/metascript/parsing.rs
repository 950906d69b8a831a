//! Parsing
//!
//!     Parsing is split in two layers:
//!
//!         - [combinators]: a small, grammar-agnostic parser-combinator engine over positions in
//!           the significant-token order of a token graph.
//!         - [grammar]: the MetaScript expression grammar built from those combinators, which
//!           produces [ast](crate::metascript::ast) nodes.
//!
//!     Parsers never mutate the graph. Failures are values ([combinators::Failure]) that the
//!     pipeline turns into a [StructuralError](crate::metascript::error::StructuralError).

pub mod combinators;
pub mod grammar;

pub use combinators::{Failure, Outcome, Parser, Success};
pub use grammar::{grammar, parse_expression, parse_program, Grammar};
