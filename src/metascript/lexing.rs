//! Lexing
//!
//!     Lexing turns source text into a [TokenGraph](crate::metascript::token::TokenGraph) in
//!     two steps:
//!
//!         1. The [scanner] walks the text with an ordered rule table ([rules]), first match
//!            wins, and appends one token per match between a start and an end marker.
//!         2. The [transformations] rework the graph in place. The only one today is the
//!            offside-rule layout pass that splices in virtual semicolons.
//!
//!     Whitespace, line breaks and comments stay in the graph as non-significant tokens, so
//!     the text can always be rebuilt from it
//!     (see [formatting](crate::metascript::token::formatting)).

pub mod rules;
pub mod scanner;
pub mod transformations;

pub use rules::{Rule, STANDARD_RULES};
pub use scanner::{scan, RuleTable, ScanFailure};
pub use transformations::virtual_semicolons::{insert_virtual_semicolons, VirtualSemicolons};
