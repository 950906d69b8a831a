//! Scanner
//!
//!     Compiles a rule table ([rules](super::rules)) into regexes once and converts text into a
//!     [TokenGraph]. Matching is first-match in table order, not longest-match: at each
//!     position the first rule whose pattern matches a non-empty prefix wins.
//!
//!     When nothing matches, scanning stops. The tokens consumed so far are returned together
//!     with a [LexicalError] holding the position and the entire unconsumed remainder; no
//!     partial token is produced and no end marker is appended.

use super::rules::{Rule, STANDARD_RULES};
use crate::metascript::error::LexicalError;
use crate::metascript::token::{Position, TokenGraph, TokenKind};
use once_cell::sync::Lazy;
use regex::Regex;

static STANDARD: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::compile(STANDARD_RULES).expect("the built-in rule table uses valid patterns")
});

/// A rule and its compiled patterns.
#[derive(Debug, Clone)]
struct CompiledRule {
    kind: TokenKind,
    /// Anchored at the start of the remaining text.
    prefix: Regex,
    /// Anchored at both ends, used when this rule reclassifies a parent match.
    whole: Regex,
    cut_at: &'static [&'static str],
    refine: Vec<CompiledRule>,
}

impl CompiledRule {
    fn compile(rule: &Rule) -> Result<Self, regex::Error> {
        Ok(CompiledRule {
            kind: rule.kind,
            prefix: Regex::new(&format!(r"\A(?:{})", rule.pattern))?,
            whole: Regex::new(&format!(r"\A(?:{})\z", rule.pattern))?,
            cut_at: rule.cut_at,
            refine: rule
                .refine
                .iter()
                .map(CompiledRule::compile)
                .collect::<Result<_, _>>()?,
        })
    }

    /// Length of this rule's match at the start of `rest`, after cuts. Zero means no match.
    fn match_len(&self, rest: &str) -> usize {
        let Some(found) = self.prefix.find(rest) else {
            return 0;
        };
        let matched = found.as_str();
        self.cut_at
            .iter()
            .filter_map(|cut| matched.find(cut))
            .min()
            .unwrap_or(matched.len())
    }

    fn classify(&self, text: &str) -> TokenKind {
        self.refine
            .iter()
            .find(|sub| sub.whole.is_match(text))
            .map(|sub| sub.classify(text))
            .unwrap_or(self.kind)
    }
}

/// Scanning stopped at a lexical error. `graph` holds what was consumed before it.
#[derive(Debug, Clone)]
pub struct ScanFailure {
    pub graph: TokenGraph,
    pub error: LexicalError,
}

/// A compiled, ordered rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
}

impl RuleTable {
    pub fn compile(rules: &[Rule]) -> Result<Self, regex::Error> {
        Ok(RuleTable {
            rules: rules
                .iter()
                .map(CompiledRule::compile)
                .collect::<Result<_, _>>()?,
        })
    }

    /// The built-in MetaScript table, compiled on first use.
    pub fn standard() -> &'static RuleTable {
        &STANDARD
    }

    /// Kind and length of the token starting `rest`.
    pub fn match_prefix(&self, rest: &str) -> Option<(TokenKind, usize)> {
        self.rules.iter().find_map(|rule| {
            let len = rule.match_len(rest);
            (len > 0).then(|| (rule.classify(&rest[..len]), len))
        })
    }

    pub fn scan(&self, source: &str) -> Result<TokenGraph, ScanFailure> {
        let mut graph = TokenGraph::new();
        let mut position = Position::default();
        let mut rest = source;

        while !rest.is_empty() {
            let Some((kind, len)) = self.match_prefix(rest) else {
                log::debug!("no rule matches at {}", position);
                return Err(ScanFailure {
                    graph,
                    error: LexicalError {
                        position,
                        leftover: rest.to_string(),
                    },
                });
            };
            let (text, tail) = rest.split_at(len);
            graph.push(kind, text, position);
            position = position.advanced_by(text);
            rest = tail;
        }

        graph.push_end(position);
        Ok(graph)
    }
}

/// Scan with the built-in table.
pub fn scan(source: &str) -> Result<TokenGraph, ScanFailure> {
    RuleTable::standard().scan(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metascript::token::Tier;

    fn kinds(source: &str) -> Vec<(TokenKind, String)> {
        scan(source)
            .unwrap()
            .iter()
            .filter(|(_, t)| !matches!(t.kind, TokenKind::Start | TokenKind::End))
            .map(|(_, t)| (t.kind, t.text.clone()))
            .collect()
    }

    fn single(source: &str) -> TokenKind {
        let tokens = kinds(source);
        assert_eq!(tokens.len(), 1, "{:?} scanned as {:?}", source, tokens);
        tokens[0].0
    }

    #[test]
    fn test_empty_source_has_only_markers() {
        let graph = scan("").unwrap();
        let listing: Vec<TokenKind> = graph.iter().map(|(_, t)| t.kind).collect();
        assert_eq!(listing, vec![TokenKind::Start, TokenKind::End]);
    }

    #[test]
    fn test_operator_classification() {
        assert_eq!(single("*"), TokenKind::Operator(Tier::new(8)));
        assert_eq!(single("-"), TokenKind::Operator(Tier::new(7)));
        assert_eq!(single(":"), TokenKind::Operator(Tier::new(6)));
        assert_eq!(single("=="), TokenKind::Operator(Tier::new(5)));
        assert_eq!(single("!="), TokenKind::Operator(Tier::new(5)));
        assert_eq!(single("<="), TokenKind::Operator(Tier::new(4)));
        assert_eq!(single("&&"), TokenKind::Operator(Tier::new(3)));
        assert_eq!(single("^"), TokenKind::Operator(Tier::new(2)));
        assert_eq!(single("||"), TokenKind::Operator(Tier::new(1)));
        assert_eq!(single("~"), TokenKind::Operator(Tier::new(9)));
        assert_eq!(single("="), TokenKind::Assign);
        assert_eq!(single("+="), TokenKind::Assign);
        assert_eq!(single(">>>="), TokenKind::Assign);
        assert_eq!(single("=>"), TokenKind::Arrow);
        assert_eq!(single("<-"), TokenKind::Bind);
        assert_eq!(single("::"), TokenKind::DoubleColon);
        assert_eq!(single("?"), TokenKind::Question);
    }

    #[test]
    fn test_keywords_need_the_whole_word() {
        assert_eq!(single("new"), TokenKind::Keyword);
        assert_eq!(single("newer"), TokenKind::Identifier);
        assert_eq!(single("do_it"), TokenKind::Identifier);
        assert_eq!(single("`new`"), TokenKind::QuotedIdentifier);
    }

    #[test]
    fn test_operator_run_stops_before_comment() {
        assert_eq!(
            kinds("+// c"),
            vec![
                (TokenKind::Operator(Tier::new(7)), "+".to_string()),
                (TokenKind::LineComment, "// c".to_string()),
            ]
        );
        assert_eq!(kinds("=/* c */")[1].0, TokenKind::BlockComment);
    }

    #[test]
    fn test_line_comment_leaves_line_break() {
        let tokens = kinds("// c\nx");
        assert_eq!(tokens[0], (TokenKind::LineComment, "// c".to_string()));
        assert_eq!(tokens[1].0, TokenKind::LineBreak);
    }

    #[test]
    fn test_literals() {
        assert_eq!(single("0xFF"), TokenKind::Hex);
        assert_eq!(single("3.25"), TokenKind::Decimal);
        assert_eq!(single(r#""a\"b""#), TokenKind::String);
        assert_eq!(single("\"\"\"one\ntwo\"\"\""), TokenKind::MultilineString);
        assert_eq!(single("/* a ** b */"), TokenKind::BlockComment);
        assert_eq!(single("..."), TokenKind::Dot);
    }

    #[test]
    fn test_multiline_string_is_shortest() {
        let tokens = kinds("\"\"\"a\"\"\" x \"\"\"b\"\"\"");
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].1, "\"\"\"a\"\"\"");
    }

    #[test]
    fn test_positions_are_tracked() {
        let graph = scan("a\r\n  bc").unwrap();
        let bc = graph
            .iter()
            .find(|(_, t)| t.text == "bc")
            .map(|(_, t)| t.position)
            .unwrap();
        assert_eq!(bc, Position::new(1, 2, 5));
        let end = graph.end().unwrap();
        assert_eq!(graph[end].position, Position::new(1, 4, 7));
    }

    #[test]
    fn test_lexical_error_keeps_consumed_tokens() {
        let failure = scan("a + #b").unwrap_err();
        assert_eq!(failure.error.position, Position::new(0, 4, 4));
        assert_eq!(failure.error.leftover, "#b");
        assert_eq!(failure.graph.end(), None);
        assert_eq!(failure.graph.len(), 5);
    }

    #[test]
    fn test_custom_table() {
        const WORDS: &[Rule] = &[
            Rule::new(TokenKind::Space, r"\s+"),
            Rule::new(TokenKind::Identifier, r"[a-z]+"),
        ];
        let table = RuleTable::compile(WORDS).unwrap();
        assert!(table.scan("ab cd").is_ok());
        assert!(table.scan("ab 1").is_err());
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        const BROKEN: &[Rule] = &[Rule::new(TokenKind::Identifier, "(")];
        assert!(RuleTable::compile(BROKEN).is_err());
    }
}
