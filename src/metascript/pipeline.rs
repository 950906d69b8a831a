//! Compile pipeline
//!
//! Runs the front-end phases in order under a [CompileOptions]:
//!
//! 1. **Scanning** - source text to a token graph with the rule table
//! 2. **Layout** - virtual semicolon insertion (when `insert_separators` or `build_tree`)
//! 3. **Parsing** - the expression grammar builds the AST (when `build_tree`)
//!
//! The first phase that fails stops the pipeline and contributes the one error of the
//! result. Whatever was produced before that point is still returned: a lexical error keeps
//! the tokens scanned so far, a structural error keeps the graph with the semicolons inserted
//! up to it.
//!
//! # Usage
//!
//!     let output = compile("total = price * count", &CompileOptions::default());
//!     assert!(output.is_ok());
//!     println!("{}", output.ast.unwrap());
//!
//! Use [Compiler] to scan with a different rule table.

pub mod config;

use crate::metascript::ast::Node;
use crate::metascript::error::{CompileError, StructuralError};
use crate::metascript::lexing::{RuleTable, VirtualSemicolons};
use crate::metascript::parsing::parse_program;
use crate::metascript::token::TokenGraph;
pub use config::{CompileOptions, Loader};

/// Everything a compile call produced.
#[derive(Debug, Clone)]
pub struct CompileOutput {
    /// Empty on success, otherwise exactly one error.
    pub errors: Vec<CompileError>,
    pub tokens: TokenGraph,
    pub ast: Option<Node>,
}

impl CompileOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error(&self) -> Option<&CompileError> {
        self.errors.first()
    }
}

/// Compile with a rule table of your choosing.
pub struct Compiler<'r> {
    options: CompileOptions,
    rules: &'r RuleTable,
}

impl Compiler<'static> {
    pub fn new(options: CompileOptions) -> Self {
        Compiler {
            options,
            rules: RuleTable::standard(),
        }
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl<'r> Compiler<'r> {
    pub fn with_rules(options: CompileOptions, rules: &'r RuleTable) -> Self {
        Compiler { options, rules }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn compile(&self, source: &str) -> CompileOutput {
        let mut tokens = match self.rules.scan(source) {
            Ok(graph) => graph,
            Err(failure) => {
                log::debug!("scanning failed: {}", failure.error);
                return CompileOutput {
                    errors: vec![failure.error.into()],
                    tokens: failure.graph,
                    ast: None,
                };
            }
        };
        log::debug!("scanned {} tokens", tokens.len());

        if self.options.runs_layout() {
            match VirtualSemicolons::new().apply(&mut tokens) {
                Ok(inserted) => log::debug!("inserted {} virtual semicolons", inserted),
                Err(error) => return failed(tokens, error),
            }
        }

        if !self.options.build_tree {
            return CompileOutput {
                errors: Vec::new(),
                tokens,
                ast: None,
            };
        }

        match parse_program(&tokens) {
            Ok(success) => CompileOutput {
                errors: Vec::new(),
                tokens,
                ast: Some(success.value),
            },
            Err(failure) => {
                let error = StructuralError::from_failure(&tokens, failure);
                failed(tokens, error)
            }
        }
    }
}

fn failed(tokens: TokenGraph, error: StructuralError) -> CompileOutput {
    log::debug!("compile failed: {}", error);
    CompileOutput {
        errors: vec![error.into()],
        tokens,
        ast: None,
    }
}

/// Compile `source` with the built-in rule table.
pub fn compile(source: &str, options: &CompileOptions) -> CompileOutput {
    Compiler::new(*options).compile(source)
}
