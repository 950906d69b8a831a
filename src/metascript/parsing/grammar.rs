//! MetaScript expression grammar
//!
//!     Built once from the [combinators](super::combinators) into a static [Grammar].
//!
//!     program     = START sep* (expression (sep+ expression)*)? sep* END
//!     expression  = conditional (ASSIGN conditional)*
//!     conditional = tier1 ("?" expression ":" expression)?
//!     tierN       = tierN+1 (OP_N tierN+1)*          for N in 1..=8
//!     tier9       = member (OP_9 member)*
//!     member      = ("new" member arguments | primary) ("[" expression "]" | "." identifier)*
//!     primary     = this | null | true | false | identifier | number | string
//!                 | array | object | "(" expression ")"
//!
//!     `sep` is a semicolon, literal or virtual. Operator membership in the tiers comes from
//!     the token kinds the rule table assigns (8 `* / %`, 7 `+ -`, 6 `:`, 5 `= !`, 4 `< >`,
//!     3 `&`, 2 `^`, 1 `|`, 9 any other operator run).
//!
//!     Every tier and the assignment chain go through [Node::operator], so a level with a single
//!     operand collapses to it. Assignment is a flat chain: `a = b = c` is one node.
//!
//!     The then-branch of a conditional is parsed by a copy of the expression rules whose tier 6
//!     refuses a bare `:`, which is what lets `x ? a : b` find its colon.

use super::combinators::{
    bind, choice, commit, constant, discard_left, discard_right, kind, kind_if, label, map, nested,
    optional, pair, repeat, separated_by, text, Outcome, Parser, Rule, Sequence,
};
use crate::metascript::ast::{LiteralKind, Node};
use crate::metascript::token::{Lexeme, Tier, TokenGraph, TokenId, TokenKind};
use once_cell::sync::Lazy;

static GRAMMAR: Lazy<Grammar> = Lazy::new(Grammar::new);

/// Expressions and member chains that may be open at once. Stays above what the layout pass's
/// bracket limit lets through, two per bracket.
const MAX_DEPTH: usize = 160;

fn bounded(parser: Parser<Node>) -> Parser<Node> {
    nested(parser, MAX_DEPTH, "Expression nested too deeply")
}

/// The shared MetaScript grammar.
pub fn grammar() -> &'static Grammar {
    &GRAMMAR
}

/// Parse a whole token graph, start marker to end marker.
pub fn parse_program(graph: &TokenGraph) -> Outcome<Node> {
    grammar().program.parse(graph, graph.start())
}

/// Parse one expression starting at `at`.
pub fn parse_expression(graph: &TokenGraph, at: TokenId) -> Outcome<Node> {
    grammar().expression.parse(graph, at)
}

pub struct Grammar {
    pub program: Parser<Node>,
    pub expression: Parser<Node>,
    pub conditional: Parser<Node>,
    pub member: Parser<Node>,
    pub primary: Parser<Node>,
    /// Tier 1 first.
    tiers: Vec<Parser<Node>>,
}

impl Grammar {
    fn new() -> Self {
        let expression: Rule<Node> = Rule::new("expression");
        let member: Rule<Node> = Rule::new("member expression");

        let primary = primary(expression.parser());

        let arguments = bracketed(
            "(",
            ")",
            optional(
                map(
                    separated_by(expression.parser(), as_node(text(","))),
                    operands,
                ),
                Vec::new(),
            ),
        );
        let new_expression = map(
            pair(discard_left(keyword("new"), member.parser()), arguments),
            |(callee, arguments)| Node::New {
                callee: Box::new(callee),
                arguments,
            },
        );
        let suffix = choice(vec![
            map(bracketed("[", "]", expression.parser()), Suffix::Index),
            map(discard_left(text("."), identifier_token()), |name| {
                Suffix::Member(name.text)
            }),
        ]);
        member.define(bounded(map(
            pair(
                choice(vec![new_expression, primary.clone()]),
                repeat(suffix, 0),
            ),
            |(base, suffixes)| suffixes.into_iter().fold(base, |target, s| s.apply(target)),
        )));

        let colon_free: Rule<Node> = Rule::new("expression without bare colon");
        let colon_free_tiers = cascade(member.parser(), false);
        colon_free.define(bounded(assignment(conditional(
            colon_free_tiers[0].clone(),
            colon_free.parser(),
            colon_free.parser(),
        ))));

        let tiers = cascade(member.parser(), true);
        let conditional = conditional(tiers[0].clone(), colon_free.parser(), expression.parser());
        expression.define(bounded(assignment(conditional.clone())));

        Grammar {
            program: program(expression.parser()),
            expression: expression.parser(),
            conditional,
            member: member.parser(),
            primary,
            tiers,
        }
    }

    pub fn tier(&self, tier: Tier) -> &Parser<Node> {
        &self.tiers[usize::from(tier.level()) - 1]
    }
}

enum Suffix {
    Index(Node),
    Member(String),
}

impl Suffix {
    fn apply(self, target: Node) -> Node {
        match self {
            Suffix::Index(index) => Node::Indexing {
                target: Box::new(target),
                index: Box::new(index),
            },
            Suffix::Member(property) => Node::Member {
                target: Box::new(target),
                property,
            },
        }
    }
}

fn keyword(word: &'static str) -> Parser<Lexeme> {
    kind_if(TokenKind::Keyword, move |text| text == word)
}

fn identifier_token() -> Parser<Lexeme> {
    choice(vec![
        kind(TokenKind::Identifier),
        kind(TokenKind::QuotedIdentifier),
    ])
}

fn literal(token: TokenKind, literal: LiteralKind) -> Parser<Node> {
    map(kind(token), move |lexeme| Node::literal(literal, lexeme.text))
}

fn as_node(parser: Parser<Lexeme>) -> Parser<Node> {
    map(parser, Node::Token)
}

/// Drop the separators from an interleaved `separated_by` list.
fn operands(list: Vec<Node>) -> Vec<Node> {
    list.into_iter().step_by(2).collect()
}

/// `open inner close`, where a missing `close` is reported against the opener. Everything
/// after the opener is committed.
fn bracketed<T: 'static>(open: &'static str, close: &'static str, inner: Parser<T>) -> Parser<T> {
    bind(text(open), move |opener: Lexeme| {
        let message = format!(
            "Expected {:?} to close {:?} opened at {}",
            close, open, opener.position
        );
        commit(discard_right(inner.clone(), label(text(close), message)))
    })
}

fn primary(expression: Parser<Node>) -> Parser<Node> {
    let identifier = map(identifier_token(), |lexeme| Node::Identifier(lexeme.text));
    let number = choice(vec![
        literal(TokenKind::Decimal, LiteralKind::Decimal),
        literal(TokenKind::Hex, LiteralKind::Hex),
    ]);
    let string = choice(vec![
        literal(TokenKind::String, LiteralKind::String),
        literal(TokenKind::MultilineString, LiteralKind::MultilineString),
    ]);

    choice(vec![
        constant(keyword("this"), Node::This),
        map(keyword("null"), |lexeme| {
            Node::literal(LiteralKind::Null, lexeme.text)
        }),
        map(
            kind_if(TokenKind::Keyword, |text| text == "true" || text == "false"),
            |lexeme| Node::literal(LiteralKind::Boolean, lexeme.text),
        ),
        identifier.clone(),
        number.clone(),
        string.clone(),
        array_literal(expression.clone()),
        object_literal(
            expression.clone(),
            choice(vec![identifier, string, number]),
        ),
        bracketed("(", ")", expression),
    ])
}

/// `[a, , b]`: holes are [Node::Undefined], a hole after the last comma is dropped.
fn array_literal(expression: Parser<Node>) -> Parser<Node> {
    let element = optional(expression, Node::Undefined);
    let elements = map(separated_by(element, as_node(text(","))), |list| {
        let mut elements = operands(list);
        if matches!(elements.last(), Some(Node::Undefined)) {
            elements.pop();
        }
        elements
    });
    map(bracketed("[", "]", elements), Node::ArrayLiteral)
}

/// `{ key: value, ... }` with `,` or statement separators between properties.
fn object_literal(expression: Parser<Node>, key: Parser<Node>) -> Parser<Node> {
    let separator = || choice(vec![text(","), text(";")]);
    let property = map(
        Sequence::new()
            .then(key)
            .skip(text(":"))
            .then(expression)
            .build(),
        |mut pair| {
            let value = pair.pop().unwrap_or(Node::Undefined);
            let key = pair.pop().unwrap_or(Node::Undefined);
            Node::property(key, value)
        },
    );
    let properties = optional(
        map(
            separated_by(property, constant(repeat(separator(), 1), Node::Undefined)),
            operands,
        ),
        Vec::new(),
    );
    let body = discard_left(
        repeat(separator(), 0),
        discard_right(properties, repeat(separator(), 0)),
    );
    map(bracketed("{", "}", body), Node::ObjectLiteral)
}

/// The nine binary tiers over `operand`, returned loosest first.
fn cascade(operand: Parser<Node>, bare_colon: bool) -> Vec<Parser<Node>> {
    let mut tiers = Vec::with_capacity(9);
    let mut tighter = operand;
    for tier in Tier::all().rev() {
        let operator = if tier.level() == 6 && !bare_colon {
            kind_if(TokenKind::Operator(tier), |text| text != ":")
        } else {
            kind(TokenKind::Operator(tier))
        };
        let level = map(separated_by(tighter, as_node(operator)), Node::operator);
        tiers.push(level.clone());
        tighter = level;
    }
    tiers.reverse();
    tiers
}

fn conditional(
    condition: Parser<Node>,
    then_branch: Parser<Node>,
    else_branch: Parser<Node>,
) -> Parser<Node> {
    let tail = Sequence::new()
        .then(as_node(kind(TokenKind::Question)))
        .then(then_branch)
        .then(as_node(text(":")))
        .then(else_branch)
        .build();
    map(pair(condition, optional(tail, Vec::new())), |(condition, tail)| {
        let mut chain = vec![condition];
        chain.extend(tail);
        Node::operator(chain)
    })
}

fn assignment(operand: Parser<Node>) -> Parser<Node> {
    map(
        separated_by(operand, as_node(kind(TokenKind::Assign))),
        Node::operator,
    )
}

/// An empty program is tried first so a broken statement reports its own failure.
fn program(expression: Parser<Node>) -> Parser<Node> {
    let separator = || text(";");
    let end = || label(kind(TokenKind::End), "Expected end of input");
    let statements = discard_right(
        map(
            separated_by(expression, constant(repeat(separator(), 1), Node::Undefined)),
            operands,
        ),
        discard_left(repeat(separator(), 0), end()),
    );
    map(
        Sequence::new()
            .skip(kind(TokenKind::Start))
            .skip(repeat(separator(), 0))
            .then(choice(vec![constant(end(), Vec::new()), statements]))
            .build_unwrapped(|lists| lists.concat()),
        Node::source_elements,
    )
}
