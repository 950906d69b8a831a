//! Fluent assertion API for AST nodes

use crate::metascript::ast::{LiteralKind, Node};

/// Create an assertion builder for a tree.
pub fn assert_ast(node: &Node) -> NodeAssertion<'_> {
    NodeAssertion {
        node,
        context: "root".to_string(),
    }
}

pub struct NodeAssertion<'a> {
    node: &'a Node,
    context: String,
}

impl<'a> NodeAssertion<'a> {
    fn child(&self, node: &'a Node, label: String) -> NodeAssertion<'a> {
        NodeAssertion {
            node,
            context: format!("{}.{}", self.context, label),
        }
    }

    fn expected(&self, what: &str) -> ! {
        panic!(
            "{}: Expected {}, found {}",
            self.context,
            what,
            self.node.node_type()
        )
    }

    pub fn node_type(self, expected: &str) -> Self {
        assert_eq!(
            self.node.node_type(),
            expected,
            "{}: Expected {}, found {}",
            self.context,
            expected,
            self.node.node_type()
        );
        self
    }

    /// Compare the s-expression rendering of the node.
    pub fn renders_as(self, expected: &str) -> Self {
        let actual = self.node.to_string();
        assert_eq!(
            actual, expected,
            "{}: Expected rendering {:?}, found {:?}",
            self.context, expected, actual
        );
        self
    }

    pub fn identifier(self, name: &str) -> Self {
        match self.node {
            Node::Identifier(actual) => assert_eq!(
                actual, name,
                "{}: Expected identifier {:?}, found {:?}",
                self.context, name, actual
            ),
            _ => self.expected("Identifier"),
        }
        self
    }

    pub fn literal(self, kind: LiteralKind, raw: &str) -> Self {
        match self.node {
            Node::Literal(literal) => {
                assert_eq!(
                    literal.kind, kind,
                    "{}: Expected {:?} literal, found {:?}",
                    self.context, kind, literal.kind
                );
                assert_eq!(
                    literal.raw, raw,
                    "{}: Expected literal {:?}, found {:?}",
                    self.context, raw, literal.raw
                );
            }
            _ => self.expected("Literal"),
        }
        self
    }

    /// Any literal with this source text.
    pub fn literal_text(self, raw: &str) -> Self {
        match self.node {
            Node::Literal(literal) => assert_eq!(
                literal.raw, raw,
                "{}: Expected literal {:?}, found {:?}",
                self.context, raw, literal.raw
            ),
            _ => self.expected("Literal"),
        }
        self
    }

    pub fn is_undefined(self) -> Self {
        if !matches!(self.node, Node::Undefined) {
            self.expected("Undefined");
        }
        self
    }

    /// An operator chain with exactly these operators, in order.
    pub fn operator_chain(self, operators: &[&str]) -> Self {
        if !matches!(self.node, Node::Operator(_)) {
            self.expected("Operator");
        }
        let actual = self.node.operators();
        assert_eq!(
            actual, operators,
            "{}: Expected operators {:?}, found {:?}",
            self.context, operators, actual
        );
        self
    }

    pub fn tier(self, level: u8) -> Self {
        let actual = self.node.tier().map(|tier| tier.level());
        assert_eq!(
            actual,
            Some(level),
            "{}: Expected tier {} chain, found {:?}",
            self.context,
            level,
            actual
        );
        self
    }

    pub fn operand<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let operands = self.node.operands();
        let Some(&operand) = operands.get(index) else {
            panic!(
                "{}: Expected operand {}, found {} operands",
                self.context,
                index,
                operands.len()
            )
        };
        check(self.child(operand, format!("operand[{}]", index)));
        self
    }

    fn elements(&self) -> &'a [Node] {
        match self.node {
            Node::SourceElements(items) | Node::ArrayLiteral(items) | Node::ObjectLiteral(items) => {
                items
            }
            _ => self.expected("SourceElements, ArrayLiteral or ObjectLiteral"),
        }
    }

    /// Statements, array elements or object properties.
    pub fn element_count(self, expected: usize) -> Self {
        let actual = self.elements().len();
        assert_eq!(
            actual, expected,
            "{}: Expected {} elements, found {}",
            self.context, expected, actual
        );
        self
    }

    pub fn element<F>(self, index: usize, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let elements = self.elements();
        let Some(element) = elements.get(index) else {
            panic!(
                "{}: Expected element {}, found {} elements",
                self.context,
                index,
                elements.len()
            )
        };
        check(self.child(element, format!("element[{}]", index)));
        self
    }

    /// Property `index` of an object has this key (as rendered) and a value passing `check`.
    pub fn property<F>(self, index: usize, key: &str, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        let elements = self.elements();
        match elements.get(index) {
            Some(Node::Property { key: actual, value }) => {
                assert_eq!(
                    actual.to_string(),
                    key,
                    "{}: Expected property key {:?}, found {:?}",
                    self.context,
                    key,
                    actual.to_string()
                );
                check(self.child(value, format!("property[{}]", key)));
            }
            other => panic!(
                "{}: Expected property at {}, found {:?}",
                self.context, index, other
            ),
        }
        self
    }

    /// `target.property`, with `check` run on the target.
    pub fn member<F>(self, property: &str, check: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        match self.node {
            Node::Member {
                target,
                property: actual,
            } => {
                assert_eq!(
                    actual, property,
                    "{}: Expected member {:?}, found {:?}",
                    self.context, property, actual
                );
                check(self.child(target, "target".to_string()));
            }
            _ => self.expected("Member"),
        }
        self
    }

    pub fn indexing<F, G>(self, check_target: F, check_index: G) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
        G: FnOnce(NodeAssertion<'a>),
    {
        match self.node {
            Node::Indexing { target, index } => {
                check_target(self.child(target, "target".to_string()));
                check_index(self.child(index, "index".to_string()));
            }
            _ => self.expected("Indexing"),
        }
        self
    }

    /// `new callee(arguments)` with `argument_count` arguments.
    pub fn new_expression<F>(self, argument_count: usize, check_callee: F) -> Self
    where
        F: FnOnce(NodeAssertion<'a>),
    {
        match self.node {
            Node::New { callee, arguments } => {
                assert_eq!(
                    arguments.len(),
                    argument_count,
                    "{}: Expected {} arguments, found {}",
                    self.context,
                    argument_count,
                    arguments.len()
                );
                check_callee(self.child(callee, "callee".to_string()));
            }
            _ => self.expected("New"),
        }
        self
    }
}
