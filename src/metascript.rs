//! Main module for the MetaScript front end
//!
//!     The phases run in a fixed order, each one consuming the previous phase's output:
//!
//!         source text -> [lexing::scanner] -> token graph
//!         token graph -> [lexing::transformations] -> token graph with virtual semicolons
//!         token graph -> [parsing::grammar] -> [ast::Node]
//!
//!     [pipeline] wires the phases together under a [pipeline::config::CompileOptions].

pub mod ast;
pub mod error;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod testing;
pub mod token;
