//! Parser-combinator engine
//!
//!     A [Parser] is a function from a position in a [TokenGraph] (always a significant token)
//!     to an [Outcome]: either a [Success] holding a value and the position to continue from,
//!     or a [Failure] holding a message and where it happened. Parsers are shared through an
//!     `Arc`, so cloning one is cheap and a grammar can reference the same parser from many
//!     places.
//!
//!     The engine knows nothing about any particular grammar. There is no memoization and no
//!     backtracking other than [choice] trying its alternatives from the same position.
//!
//!     Recursive grammars are built with [Rule]: a named placeholder whose parser can be handed
//!     out before the rule is defined. The definition is looked up each time the parser runs.
//!
//! Committed failures
//!
//!     A failure marked [committed](Failure::committed) (see [commit]) ends backtracking:
//!     [choice], [optional], [repeat], [separated_by] and [fold_left] hand it up unchanged
//!     instead of trying something else. A grammar commits once a parse can no longer be
//!     anything but the construct it started, like a bracket after its opener, so the error
//!     names that construct.

use crate::metascript::token::{Lexeme, Token, TokenGraph, TokenId, TokenKind};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Success<T> {
    pub value: T,
    pub rest: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub position: TokenId,
    /// Alternatives must not be tried after this failure.
    pub committed: bool,
}

impl Failure {
    pub fn new(message: impl Into<String>, position: TokenId) -> Self {
        Self {
            message: message.into(),
            position,
            committed: false,
        }
    }

    pub fn commit(self) -> Self {
        Self {
            committed: true,
            ..self
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (token #{})", self.message, self.position.index())
    }
}

pub type Outcome<T> = Result<Success<T>, Failure>;

/// Combining function produced by the operator parser of [fold_left].
pub type Combine<T> = Arc<dyn Fn(T, T) -> T + Send + Sync>;

type ParseFn<T> = dyn Fn(&TokenGraph, TokenId) -> Outcome<T> + Send + Sync;

pub struct Parser<T> {
    run: Arc<ParseFn<T>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Parser {
            run: Arc::clone(&self.run),
        }
    }
}

impl<T> fmt::Debug for Parser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser")
    }
}

impl<T: 'static> Parser<T> {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&TokenGraph, TokenId) -> Outcome<T> + Send + Sync + 'static,
    {
        Parser { run: Arc::new(run) }
    }

    pub fn parse(&self, graph: &TokenGraph, at: TokenId) -> Outcome<T> {
        (self.run)(graph, at)
    }

    /// Parse from the token right after the stream start marker.
    pub fn parse_stream(&self, graph: &TokenGraph) -> Outcome<T> {
        self.parse(graph, graph.advance(graph.start()))
    }
}

fn token_where<F>(expected: String, accept: F) -> Parser<Lexeme>
where
    F: Fn(&Token) -> bool + Send + Sync + 'static,
{
    Parser::new(move |graph, at| {
        let token = &graph[at];
        if !accept(token) {
            return Err(Failure::new(expected.clone(), at));
        }
        log::trace!("consumed {} at {}", token, token.position);
        Ok(Success {
            value: graph.lexeme(at),
            rest: graph.advance(at),
        })
    })
}

/// One token of kind `kind`.
pub fn kind(kind: TokenKind) -> Parser<Lexeme> {
    token_where(format!("Expected token <{}>", kind), move |token| {
        token.kind == kind
    })
}

/// One token of kind `kind` whose text passes `guard`.
pub fn kind_if<G>(kind: TokenKind, guard: G) -> Parser<Lexeme>
where
    G: Fn(&str) -> bool + Send + Sync + 'static,
{
    token_where(format!("Expected token <{}>", kind), move |token| {
        token.kind == kind && guard(&token.text)
    })
}

/// One token with exactly this text, whatever its kind.
pub fn text(literal: &str) -> Parser<Lexeme> {
    let literal = literal.to_string();
    token_where(format!("Expected {:?}", literal), move |token| {
        token.text == literal
    })
}

/// One token whose text contains a match of `pattern`.
pub fn pattern(pattern: Regex) -> Parser<Lexeme> {
    token_where(
        format!("Expected token matching /{}/", pattern.as_str()),
        move |token| pattern.is_match(&token.text),
    )
}

enum Step<T> {
    Capture(Parser<T>),
    Skip(Parser<()>),
    Reset,
    Stop,
}

/// Runs parsers one after the other and collects the values of the captured ones.
///
///     Sequence::new()
///         .then(key)
///         .skip(text(":"))
///         .then(value)
///         .build()
///
/// [reset](Sequence::reset) drops everything captured so far and
/// [stop](Sequence::stop) keeps later steps from capturing; the steps still have to succeed.
pub struct Sequence<T> {
    steps: Vec<Step<T>>,
}

impl<T: Send + Sync + 'static> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + Sync + 'static> Sequence<T> {
    pub fn new() -> Self {
        Sequence { steps: Vec::new() }
    }

    pub fn then(mut self, parser: Parser<T>) -> Self {
        self.steps.push(Step::Capture(parser));
        self
    }

    pub fn skip<U: 'static>(mut self, parser: Parser<U>) -> Self {
        self.steps.push(Step::Skip(map(parser, |_| ())));
        self
    }

    pub fn reset(mut self) -> Self {
        self.steps.push(Step::Reset);
        self
    }

    pub fn stop(mut self) -> Self {
        self.steps.push(Step::Stop);
        self
    }

    pub fn build(self) -> Parser<Vec<T>> {
        let steps = self.steps;
        Parser::new(move |graph, at| run_steps(&steps, graph, at))
    }

    /// Like [build](Sequence::build), but a single captured value is returned bare and any
    /// other count goes through `collect`.
    pub fn build_unwrapped<F>(self, collect: F) -> Parser<T>
    where
        F: Fn(Vec<T>) -> T + Send + Sync + 'static,
    {
        map(self.build(), move |mut values| {
            if values.len() == 1 {
                values.remove(0)
            } else {
                collect(values)
            }
        })
    }
}

fn run_steps<T>(steps: &[Step<T>], graph: &TokenGraph, at: TokenId) -> Outcome<Vec<T>>
where
    T: 'static,
{
    let mut values = Vec::new();
    let mut capturing = true;
    let mut at = at;
    for step in steps {
        match step {
            Step::Capture(parser) => {
                let success = parser.parse(graph, at)?;
                if capturing {
                    values.push(success.value);
                }
                at = success.rest;
            }
            Step::Skip(parser) => at = parser.parse(graph, at)?.rest,
            Step::Reset => values.clear(),
            Step::Stop => capturing = false,
        }
    }
    Ok(Success { value: values, rest: at })
}

/// First alternative that succeeds; the last failure when none does.
pub fn choice<T: 'static>(alternatives: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |graph, at| {
        let mut last = Failure::new("Expected one of no alternatives", at);
        for parser in &alternatives {
            match parser.parse(graph, at) {
                Ok(success) => return Ok(success),
                Err(failure) if failure.committed => return Err(failure),
                Err(failure) => last = failure,
            }
        }
        Err(last)
    })
}

pub fn optional<T>(parser: Parser<T>, default: T) -> Parser<T>
where
    T: Clone + Send + Sync + 'static,
{
    Parser::new(move |graph, at| match parser.parse(graph, at) {
        Err(failure) if failure.committed => Err(failure),
        Err(_) => Ok(Success {
            value: default.clone(),
            rest: at,
        }),
        success => success,
    })
}

/// As many as possible, failing only below `min`. A success that consumes nothing ends the
/// repetition.
pub fn repeat<T: 'static>(parser: Parser<T>, min: usize) -> Parser<Vec<T>> {
    Parser::new(move |graph, start| {
        let mut values = Vec::new();
        let mut at = start;
        loop {
            match parser.parse(graph, at) {
                Ok(success) => {
                    let progressed = success.rest != at;
                    values.push(success.value);
                    at = success.rest;
                    if !progressed {
                        break;
                    }
                }
                Err(failure) if failure.committed || values.len() < min => return Err(failure),
                Err(_) => break,
            }
        }
        if values.len() < min {
            return Err(Failure::new(
                format!("Expected at least {} repetitions", min),
                at,
            ));
        }
        Ok(Success { value: values, rest: at })
    })
}

/// `parser (separator parser)*`, operands and separators interleaved in one list. A trailing
/// separator with no operand after it is left unconsumed.
pub fn separated_by<T: 'static>(parser: Parser<T>, separator: Parser<T>) -> Parser<Vec<T>> {
    Parser::new(move |graph, start| {
        let first = parser.parse(graph, start)?;
        let mut values = vec![first.value];
        let mut at = first.rest;
        loop {
            let sep = match separator.parse(graph, at) {
                Ok(sep) => sep,
                Err(failure) if failure.committed => return Err(failure),
                Err(_) => break,
            };
            let operand = match parser.parse(graph, sep.rest) {
                Ok(operand) => operand,
                Err(failure) if failure.committed => return Err(failure),
                Err(_) => break,
            };
            if operand.rest == at {
                break;
            }
            values.push(sep.value);
            values.push(operand.value);
            at = operand.rest;
        }
        Ok(Success { value: values, rest: at })
    })
}

/// `parser (op parser)*` folded from the left with the functions `op` produces.
pub fn fold_left<T: 'static>(parser: Parser<T>, op: Parser<Combine<T>>) -> Parser<T> {
    Parser::new(move |graph, start| {
        let first = parser.parse(graph, start)?;
        let mut acc = first.value;
        let mut at = first.rest;
        loop {
            let combine = match op.parse(graph, at) {
                Ok(combine) => combine,
                Err(failure) if failure.committed => return Err(failure),
                Err(_) => break,
            };
            let operand = match parser.parse(graph, combine.rest) {
                Ok(operand) => operand,
                Err(failure) if failure.committed => return Err(failure),
                Err(_) => break,
            };
            acc = (combine.value)(acc, operand.value);
            at = operand.rest;
        }
        Ok(Success { value: acc, rest: at })
    })
}

pub fn map<T, U, F>(parser: Parser<T>, f: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
{
    Parser::new(move |graph, at| {
        parser.parse(graph, at).map(|success| Success {
            value: f(success.value),
            rest: success.rest,
        })
    })
}

/// Convert the value through `From`.
pub fn construct<T: 'static, U: From<T> + 'static>(parser: Parser<T>) -> Parser<U> {
    map(parser, U::from)
}

/// Replace the value with a constant.
pub fn constant<T, U>(parser: Parser<T>, value: U) -> Parser<U>
where
    T: 'static,
    U: Clone + Send + Sync + 'static,
{
    map(parser, move |_| value.clone())
}

/// Both in order, keep the first value.
pub fn discard_right<T: 'static, U: 'static>(keep: Parser<T>, drop: Parser<U>) -> Parser<T> {
    Parser::new(move |graph, at| {
        let kept = keep.parse(graph, at)?;
        let dropped = drop.parse(graph, kept.rest)?;
        Ok(Success {
            value: kept.value,
            rest: dropped.rest,
        })
    })
}

/// Both in order, keep the second value.
pub fn discard_left<T: 'static, U: 'static>(drop: Parser<T>, keep: Parser<U>) -> Parser<U> {
    Parser::new(move |graph, at| {
        let dropped = drop.parse(graph, at)?;
        keep.parse(graph, dropped.rest)
    })
}

pub fn pair<T: 'static, U: 'static>(first: Parser<T>, second: Parser<U>) -> Parser<(T, U)> {
    Parser::new(move |graph, at| {
        let a = first.parse(graph, at)?;
        let b = second.parse(graph, a.rest)?;
        Ok(Success {
            value: (a.value, b.value),
            rest: b.rest,
        })
    })
}

/// Run `parser`, then the parser `f` builds from its value.
pub fn bind<T, U, F>(parser: Parser<T>, f: F) -> Parser<U>
where
    T: 'static,
    U: 'static,
    F: Fn(T) -> Parser<U> + Send + Sync + 'static,
{
    Parser::new(move |graph, at| {
        let first = parser.parse(graph, at)?;
        f(first.value).parse(graph, first.rest)
    })
}

/// Build the parser on first use and keep it.
pub fn lazy<T, F>(thunk: F) -> Parser<T>
where
    T: 'static,
    F: Fn() -> Parser<T> + Send + Sync + 'static,
{
    let cell: OnceCell<Parser<T>> = OnceCell::new();
    Parser::new(move |graph, at| cell.get_or_init(&thunk).parse(graph, at))
}

/// Replace the failure message, reporting the failure where `parser` started. Committed
/// failures keep their own message.
pub fn label<T: 'static>(parser: Parser<T>, message: impl Into<String>) -> Parser<T> {
    let message = message.into();
    Parser::new(move |graph, at| {
        parser.parse(graph, at).map_err(|failure| {
            if failure.committed {
                failure
            } else {
                Failure::new(message.clone(), at)
            }
        })
    })
}

/// Mark every failure of `parser` as committed.
pub fn commit<T: 'static>(parser: Parser<T>) -> Parser<T> {
    Parser::new(move |graph, at| parser.parse(graph, at).map_err(Failure::commit))
}

thread_local! {
    static NESTING: Cell<usize> = const { Cell::new(0) };
}

/// Run `parser` unless `limit` parsers built by `nested` are already running on this thread,
/// in which case fail, committed, with `message`. Bounds the recursion of a grammar.
pub fn nested<T: 'static>(parser: Parser<T>, limit: usize, message: impl Into<String>) -> Parser<T> {
    let message = message.into();
    Parser::new(move |graph, at| {
        let depth = NESTING.with(Cell::get);
        if depth >= limit {
            return Err(Failure::new(message.clone(), at).commit());
        }
        NESTING.with(|nesting| nesting.set(depth + 1));
        let outcome = parser.parse(graph, at);
        NESTING.with(|nesting| nesting.set(depth));
        outcome
    })
}

/// Named forward handle for recursive grammars.
///
/// Hand out [parser](Rule::parser) freely while building, then [define](Rule::define) the rule
/// once. Parsing through a rule that was never defined fails with a message naming it.
pub struct Rule<T> {
    name: &'static str,
    target: Arc<OnceCell<Parser<T>>>,
}

impl<T: 'static> Rule<T> {
    pub fn new(name: &'static str) -> Self {
        Rule {
            name,
            target: Arc::new(OnceCell::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parser(&self) -> Parser<T> {
        let target = Arc::clone(&self.target);
        let name = self.name;
        Parser::new(move |graph, at| match target.get() {
            Some(parser) => parser.parse(graph, at),
            None => Err(Failure::new(format!("Rule <{}> is not defined", name), at)),
        })
    }

    /// Set the rule's parser. A second definition is ignored.
    pub fn define(&self, parser: Parser<T>) {
        if self.target.set(parser).is_err() {
            log::warn!("rule <{}> is already defined, keeping the first definition", self.name);
        }
    }
}
