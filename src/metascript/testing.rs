//! Testing utilities
//!
//!     Tests of the front end check two things: the shape of the tree the grammar builds,
//!     and the state of the token graph the scanner and the layout pass leave behind.
//!
//! AST Assertions
//!
//!     Comparing whole trees with `assert_eq!` couples every test to every field of every node,
//!     positions of operator tokens included. Use the fluent API in [ast_assertions] instead and
//!     assert only what the test is about:
//!
//!     ```rust,ignore
//!     use metascript::metascript::testing::assert_ast;
//!
//!     assert_ast(&node)
//!         .operator_chain(&["+"])
//!         .tier(7)
//!         .operand(0, |lhs| { lhs.literal_text("2"); })
//!         .operand(1, |rhs| { rhs.operator_chain(&["*"]); });
//!     ```
//!
//!     Every assertion panics with the path of the node it was looking at
//!     (`root.operand[1]: Expected Operator, found Identifier`).
//!
//!     For a quick look at a whole tree, compare its rendering instead
//!     (`renders_as("(2 + (3 * 4))")`).
//!
//! Graph Assertions
//!
//!     [graph_assertions] checks the two link orders of a token graph against each other. Any
//!     test that mutates a graph should end with [assert_links_consistent].

pub mod ast_assertions;
pub mod graph_assertions;

pub use ast_assertions::{assert_ast, NodeAssertion};
pub use graph_assertions::{assert_links_consistent, significant_texts, virtual_semicolon_count};
