//! Token graph transformations
//!
//!     Transformations run after scanning and rework the token graph in place. They may only
//!     add tokens (through [TokenGraph::splice_after](crate::metascript::token::TokenGraph::splice_after)),
//!     never remove or rewrite scanned ones, so the source text stays recoverable.
//!
//!     - [virtual_semicolons]: offside-rule statement separation.

pub mod virtual_semicolons;
