//! AST node types

use crate::metascript::token::{Lexeme, Tier};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LiteralKind {
    Decimal,
    Hex,
    Boolean,
    Null,
    String,
    MultilineString,
}

/// A literal keeps its source text; nothing is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub kind: LiteralKind,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Node {
    /// Top-level statements. Built through [Node::source_elements].
    SourceElements(Vec<Node>),
    Literal(Literal),
    Identifier(String),
    This,
    /// Placeholder for what is absent, like an array hole.
    Undefined,
    ArrayLiteral(Vec<Node>),
    /// Holds [Node::Property] entries.
    ObjectLiteral(Vec<Node>),
    Property {
        key: Box<Node>,
        value: Box<Node>,
    },
    /// `[operand, Token, operand, ...]`. Built through [Node::operator].
    Operator(Vec<Node>),
    /// An operator token inside an [Node::Operator] chain.
    Token(Lexeme),
    Indexing {
        target: Box<Node>,
        index: Box<Node>,
    },
    Member {
        target: Box<Node>,
        property: String,
    },
    New {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
}

impl Node {
    /// An operator chain, or its only operand when there is one.
    pub fn operator(mut children: Vec<Node>) -> Node {
        if children.len() == 1 {
            children.remove(0)
        } else {
            Node::Operator(children)
        }
    }

    /// A statement list, or its only statement when there is one.
    pub fn source_elements(mut elements: Vec<Node>) -> Node {
        if elements.len() == 1 {
            elements.remove(0)
        } else {
            Node::SourceElements(elements)
        }
    }

    pub fn literal(kind: LiteralKind, raw: impl Into<String>) -> Node {
        Node::Literal(Literal {
            kind,
            raw: raw.into(),
        })
    }

    pub fn property(key: Node, value: Node) -> Node {
        Node::Property {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Node::SourceElements(_) => "SourceElements",
            Node::Literal(_) => "Literal",
            Node::Identifier(_) => "Identifier",
            Node::This => "This",
            Node::Undefined => "Undefined",
            Node::ArrayLiteral(_) => "ArrayLiteral",
            Node::ObjectLiteral(_) => "ObjectLiteral",
            Node::Property { .. } => "Property",
            Node::Operator(_) => "Operator",
            Node::Token(_) => "Token",
            Node::Indexing { .. } => "Indexing",
            Node::Member { .. } => "Member",
            Node::New { .. } => "New",
        }
    }

    /// Tier of an operator chain, taken from its first operator token. `None` for other
    /// nodes and for assignment or conditional chains.
    pub fn tier(&self) -> Option<Tier> {
        match self {
            Node::Operator(children) => match children.get(1) {
                Some(Node::Token(lexeme)) => lexeme.kind.tier(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Operands of an operator chain, without the operator tokens.
    pub fn operands(&self) -> Vec<&Node> {
        match self {
            Node::Operator(children) => children.iter().step_by(2).collect(),
            _ => Vec::new(),
        }
    }

    /// Operator texts of an operator chain, in order.
    pub fn operators(&self) -> Vec<&str> {
        match self {
            Node::Operator(children) => children
                .iter()
                .filter_map(|child| match child {
                    Node::Token(lexeme) => Some(lexeme.text.as_str()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &str, items: &[Node]) -> fmt::Result {
    write!(f, "({}", head)?;
    for item in items {
        write!(f, " {}", item)?;
    }
    write!(f, ")")
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::SourceElements(elements) => write_list(f, "program", elements),
            Node::Literal(literal) => f.write_str(&literal.raw),
            Node::Identifier(name) => f.write_str(name),
            Node::This => f.write_str("this"),
            Node::Undefined => f.write_str("undefined"),
            Node::ArrayLiteral(elements) => write_list(f, "array", elements),
            Node::ObjectLiteral(properties) => write_list(f, "object", properties),
            Node::Property { key, value } => write!(f, "(property {} {})", key, value),
            Node::Operator(children) => {
                let parts: Vec<String> = children.iter().map(Node::to_string).collect();
                write!(f, "({})", parts.join(" "))
            }
            Node::Token(lexeme) => f.write_str(&lexeme.text),
            Node::Indexing { target, index } => write!(f, "(index {} {})", target, index),
            Node::Member { target, property } => write!(f, "(member {} {})", target, property),
            Node::New { callee, arguments } => {
                write!(f, "(new {}", callee)?;
                for argument in arguments {
                    write!(f, " {}", argument)?;
                }
                write!(f, ")")
            }
        }
    }
}
