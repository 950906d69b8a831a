//! # metascript
//!
//! Front end for the MetaScript language: a rule-table scanner, an offside-rule layout
//! pass that inserts virtual semicolons, a parser-combinator engine and the expression
//! grammar built on top of it.
//!
//! The usual entry point is [`compile`](metascript::pipeline::compile):
//!
//!     let output = compile("a = 2 + 3 * 4", &CompileOptions::default());
//!     assert!(output.errors.is_empty());
//!
//! ## Testing
//!
//! The [testing module](metascript::testing) holds the fluent AST assertions and graph
//! checks the crate's own tests are written with.

pub mod metascript;
