//! Token kinds and operator tiers

use serde::Serialize;
use std::fmt;

/// One binary precedence level, 1 (loosest) to 9 (tightest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Tier(u8);

impl Tier {
    pub const LOOSEST: Tier = Tier(1);
    pub const TIGHTEST: Tier = Tier(9);

    /// Panics (at compile time when used in a const) outside `1..=9`.
    pub const fn new(level: u8) -> Self {
        assert!(level >= 1 && level <= 9, "operator tiers range from 1 to 9");
        Tier(level)
    }

    pub const fn level(self) -> u8 {
        self.0
    }

    /// The next tighter tier, `None` for tier 9.
    pub fn tighter(self) -> Option<Tier> {
        (self.0 < 9).then(|| Tier(self.0 + 1))
    }

    /// All tiers from loosest to tightest.
    pub fn all() -> impl DoubleEndedIterator<Item = Tier> {
        (1..=9).map(Tier)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token kind tags.
///
/// Operator runs are split at scan time into the binary tiers and the handful of operators
/// that sit outside the precedence cascade (assignment, arrow, bind, double colon, `?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    LineBreak,
    Space,
    LineComment,
    BlockComment,

    MultilineString,
    String,
    Hex,
    Decimal,
    Dot,
    Operator(Tier),
    Assign,
    Arrow,
    Bind,
    DoubleColon,
    Question,
    Comma,
    Semicolon,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Identifier,
    Keyword,
    QuotedIdentifier,

    Start,
    End,
    VirtualSemicolon,
}

impl TokenKind {
    /// Whitespace, line breaks and comments are not significant; everything else is.
    pub fn is_significant(self) -> bool {
        !matches!(
            self,
            TokenKind::LineBreak | TokenKind::Space | TokenKind::LineComment | TokenKind::BlockComment
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Markers and virtual semicolons, none of which come from the source text.
    pub fn is_synthetic(self) -> bool {
        matches!(
            self,
            TokenKind::Start | TokenKind::End | TokenKind::VirtualSemicolon
        )
    }

    pub fn tier(self) -> Option<Tier> {
        match self {
            TokenKind::Operator(tier) => Some(tier),
            _ => None,
        }
    }

    /// Short debug name, as printed by token listings.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::LineBreak => "w_lf",
            TokenKind::Space => "w_space",
            TokenKind::LineComment => "c_line",
            TokenKind::BlockComment => "c_inline",
            TokenKind::MultilineString => "t_mstring",
            TokenKind::String => "t_string",
            TokenKind::Hex => "t_hex",
            TokenKind::Decimal => "t_decimal",
            TokenKind::Dot => "t_dot",
            TokenKind::Operator(tier) => match tier.level() {
                1 => "t_op1",
                2 => "t_op2",
                3 => "t_op3",
                4 => "t_op4",
                5 => "t_op5",
                6 => "t_op6",
                7 => "t_op7",
                8 => "t_op8",
                _ => "t_op9",
            },
            TokenKind::Assign => "t_assign",
            TokenKind::Arrow => "t_arrow",
            TokenKind::Bind => "t_bind",
            TokenKind::DoubleColon => "t_dcolon",
            TokenKind::Question => "t_question",
            TokenKind::Comma => "t_comma",
            TokenKind::Semicolon => "t_semi",
            TokenKind::LeftParen => "t_lparen",
            TokenKind::RightParen => "t_rparen",
            TokenKind::LeftBracket => "t_lbracket",
            TokenKind::RightBracket => "t_rbracket",
            TokenKind::LeftBrace => "t_lbrace",
            TokenKind::RightBrace => "t_rbrace",
            TokenKind::Identifier => "t_ident",
            TokenKind::Keyword => "t_keyword",
            TokenKind::QuotedIdentifier => "t_qident",
            TokenKind::Start => "s_start",
            TokenKind::End => "s_end",
            TokenKind::VirtualSemicolon => "s_semi",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_significance() {
        assert!(!TokenKind::Space.is_significant());
        assert!(!TokenKind::LineBreak.is_significant());
        assert!(!TokenKind::BlockComment.is_significant());
        assert!(TokenKind::VirtualSemicolon.is_significant());
        assert!(TokenKind::Start.is_significant());
        assert!(TokenKind::Operator(Tier::new(7)).is_significant());
    }

    #[test]
    fn test_tier_ordering() {
        assert_eq!(Tier::new(8).tighter(), Some(Tier::new(9)));
        assert_eq!(Tier::TIGHTEST.tighter(), None);
        let levels: Vec<u8> = Tier::all().map(Tier::level).collect();
        assert_eq!(levels, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn test_names() {
        assert_eq!(TokenKind::Operator(Tier::new(4)).name(), "t_op4");
        assert_eq!(TokenKind::VirtualSemicolon.to_string(), "s_semi");
    }

    #[test]
    #[should_panic(expected = "operator tiers range from 1 to 9")]
    fn test_tier_out_of_range() {
        Tier::new(10);
    }
}
