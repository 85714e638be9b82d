//! Tokens of the type and expression grammar.
//!
//! ```
//! use talg_syntax::token::{Token, TokenKind};
//! use talg_syntax::span::Span;
//!
//! let arrow = Token::new(TokenKind::StarStar, Span::new(2, 4, 1, 3, 1, 5));
//! assert!(arrow.kind.is_type_operator());
//! ```

use crate::span::{Span, Spanned};
use std::fmt;
use talg_mem::Symbol;

/// The kind of a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ===== Names and literals =====
    /// Operator, alias or definition name
    Ident(Symbol),

    /// Numbered source, e.g. `1`
    Number(u32),

    // ===== Operators =====
    /// Product `*`
    Star,

    /// Function arrow `**`
    StarStar,

    /// Anonymous source `-`
    Minus,

    /// Wildcard `_`
    Underscore,

    // ===== Delimiters =====
    /// `(`
    LParen,

    /// `)`
    RParen,

    /// `,`
    Comma,

    /// Ascription `:`
    Colon,

    /// Statement separator `;`
    Semicolon,

    // ===== Special =====
    /// End of input
    EOF,
}

impl TokenKind {
    /// Whether this token combines types.
    #[must_use]
    pub const fn is_type_operator(&self) -> bool {
        matches!(self, Self::Star | Self::StarStar)
    }

    /// Whether this token can start an expression term.
    #[must_use]
    pub const fn starts_term(&self) -> bool {
        matches!(
            self,
            Self::Ident(_) | Self::Number(_) | Self::Minus | Self::LParen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(_) => write!(f, "identifier"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Star => write!(f, "*"),
            Self::StarStar => write!(f, "**"),
            Self::Minus => write!(f, "-"),
            Self::Underscore => write!(f, "_"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::EOF => write!(f, "EOF"),
        }
    }
}

/// A token with its source location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,

    /// The source location of the token
    pub span: Span,
}

impl Token {
    /// Creates a new token from a kind and span.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Spanned for Token {
    fn span(&self) -> Span {
        self.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_kind_classes() {
        assert!(TokenKind::Star.is_type_operator());
        assert!(TokenKind::StarStar.is_type_operator());
        assert!(!TokenKind::Colon.is_type_operator());

        assert!(TokenKind::Ident(Symbol::new(0)).starts_term());
        assert!(TokenKind::Number(1).starts_term());
        assert!(TokenKind::Minus.starts_term());
        assert!(!TokenKind::Semicolon.starts_term());
    }

    #[test]
    fn test_token_kind_display() {
        assert_eq!(TokenKind::StarStar.to_string(), "**");
        assert_eq!(TokenKind::Number(3).to_string(), "3");
        assert_eq!(TokenKind::Ident(Symbol::new(7)).to_string(), "identifier");
        assert_eq!(TokenKind::EOF.to_string(), "EOF");
    }

    #[test]
    fn test_token_span() {
        let span = Span::new(0, 1, 1, 1, 1, 2);
        let token = Token::new(TokenKind::Underscore, span);
        assert_eq!(token.span(), span);
    }
}
