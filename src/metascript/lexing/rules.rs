//! Lexical rule table
//!
//!     A rule table is an ordered list of [Rule]s. The scanner tries them top to bottom and the
//!     first one matching a non-empty prefix wins, so order is priority: comments come before
//!     the operator run that would otherwise swallow `//`, multiline strings before strings.
//!
//!     A rule may carry a nested table ([Rule::refine]) that reclassifies its match. Nested rules
//!     must match the whole matched text; the first one that does decides the kind, recursively,
//!     and when none does the parent's kind stands. This is how a single operator-run rule fans
//!     out into assignment, arrow and the nine precedence tiers, and how keywords are told
//!     apart from identifiers.
//!
//!     Patterns are regex sources without anchors; the scanner adds them.

use crate::metascript::token::{Tier, TokenKind};

/// One entry of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub kind: TokenKind,
    pub pattern: &'static str,
    /// A match is cut short before the first occurrence of any of these.
    pub cut_at: &'static [&'static str],
    pub refine: &'static [Rule],
}

impl Rule {
    pub const fn new(kind: TokenKind, pattern: &'static str) -> Self {
        Rule {
            kind,
            pattern,
            cut_at: &[],
            refine: &[],
        }
    }

    pub const fn cut_at(self, cut_at: &'static [&'static str]) -> Self {
        Rule { cut_at, ..self }
    }

    pub const fn refine(self, refine: &'static [Rule]) -> Self {
        Rule { refine, ..self }
    }
}

const fn op(level: u8, pattern: &'static str) -> Rule {
    Rule::new(TokenKind::Operator(Tier::new(level)), pattern)
}

/// Operator runs that are not binary operators, then the tiers by first character.
pub const OPERATORS: &[Rule] = &[
    Rule::new(TokenKind::Arrow, "=>"),
    Rule::new(TokenKind::Bind, "<-"),
    Rule::new(TokenKind::DoubleColon, "::"),
    Rule::new(TokenKind::Question, r"\?"),
    Rule::new(TokenKind::Assign, r"=|[^=!<>].*=|<<=|>>>?="),
    op(8, r"[*/%].*"),
    op(7, r"[+\-].*"),
    op(6, r":.*"),
    op(5, r"[=!].*"),
    op(4, r"[<>].*"),
    op(3, r"&.*"),
    op(2, r"\^.*"),
    op(1, r"\|.*"),
];

pub const KEYWORDS: &[Rule] = &[Rule::new(
    TokenKind::Keyword,
    "break|case|cast|catch|class|const|continue|debugger|default|delete|do|dynamic|else|\
     false|final|finally|for|function|if|in|instanceof|interface|is|let|like|namespace|\
     native|new|null|override|return|static|super|switch|this|throw|true|try|type|typeof|\
     undefined|use|var|void|while|with|yield|__proto__",
)];

/// The MetaScript lexical grammar.
pub const STANDARD_RULES: &[Rule] = &[
    Rule::new(TokenKind::LineBreak, r"\r\n|\r|\n"),
    Rule::new(TokenKind::Space, r"[^\S\r\n]+"),
    Rule::new(TokenKind::LineComment, r"//[^\r\n]*"),
    Rule::new(TokenKind::BlockComment, r"/\*(?:[^*]|\*+[^*/])*\*+/"),
    Rule::new(TokenKind::MultilineString, r#"(?s)""".*?""""#),
    Rule::new(
        TokenKind::String,
        r#""(?:[^\\"\x00-\x1F]|\\["'`\\btnfr])*""#,
    ),
    Rule::new(TokenKind::Hex, r"0[xX][0-9a-fA-F]+"),
    Rule::new(TokenKind::Decimal, r"[0-9]+(?:\.[0-9]+)?"),
    Rule::new(TokenKind::Dot, r"\.+"),
    op(9, r"[?+*/=!&|<>^~%:.\-]+")
        .cut_at(&["//", "/*"])
        .refine(OPERATORS),
    Rule::new(TokenKind::Comma, ","),
    Rule::new(TokenKind::Semicolon, ";"),
    Rule::new(TokenKind::LeftParen, r"\("),
    Rule::new(TokenKind::RightParen, r"\)"),
    Rule::new(TokenKind::LeftBracket, r"\["),
    Rule::new(TokenKind::RightBracket, r"\]"),
    Rule::new(TokenKind::LeftBrace, r"\{"),
    Rule::new(TokenKind::RightBrace, r"\}"),
    Rule::new(TokenKind::Identifier, r"[\p{L}$_][\p{L}\p{Nd}$_]*").refine(KEYWORDS),
    Rule::new(
        TokenKind::QuotedIdentifier,
        r#"`(?:[^\\`\x00-\x1F]|\\["'`\\btnfr])*`"#,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn all_rules(table: &'static [Rule], out: &mut Vec<&'static Rule>) {
        for rule in table {
            out.push(rule);
            all_rules(rule.refine, out);
        }
    }

    #[test]
    fn test_every_pattern_compiles() {
        let mut rules = Vec::new();
        all_rules(STANDARD_RULES, &mut rules);
        for rule in rules {
            assert!(
                Regex::new(rule.pattern).is_ok(),
                "{}: pattern {:?} does not compile",
                rule.kind,
                rule.pattern
            );
        }
    }

    #[test]
    fn test_every_tier_is_reachable() {
        let operator = STANDARD_RULES
            .iter()
            .find(|rule| rule.kind == TokenKind::Operator(Tier::TIGHTEST))
            .unwrap();
        let tiers: Vec<u8> = operator
            .refine
            .iter()
            .filter_map(|rule| rule.kind.tier())
            .map(Tier::level)
            .collect();
        assert_eq!(tiers, vec![8, 7, 6, 5, 4, 3, 2, 1]);
    }
}
