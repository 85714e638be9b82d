//! Error types for the lexer, parser and elaboration.
//!
//! Lexer and parser errors are about text. [`LangError`] additionally wraps
//! the engine's declaration and typing errors with the span of the syntax
//! that caused them, keeping the two families apart.

use crate::span::{Span, Spanned};
use std::fmt;
use talg_types::{Catalogue, DeclError, TypeError};

/// Errors that can occur during tokenization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexerError {
    /// Unknown character encountered in source.
    ///
    /// ```text
    /// f @ x
    ///   ^
    /// error: unknown character '@'
    /// ```
    UnknownChar {
        /// The unexpected character
        ch: char,

        /// Location in source
        span: Span,
    },

    /// A source number that does not fit in 32 bits.
    InvalidNumeric {
        /// The invalid literal text
        literal: String,

        /// Location in source
        span: Span,
    },
}

impl fmt::Display for LexerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownChar { ch, .. } => write!(f, "unknown character '{ch}'"),
            Self::InvalidNumeric { literal, .. } => {
                write!(f, "invalid source number '{literal}'")
            }
        }
    }
}

impl std::error::Error for LexerError {}

impl Spanned for LexerError {
    fn span(&self) -> Span {
        match self {
            Self::UnknownChar { span, .. } | Self::InvalidNumeric { span, .. } => *span,
        }
    }
}

/// Errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// Unexpected token encountered.
    ///
    /// ```text
    /// - : A * A
    ///       ^
    /// error: expected one of: ;, ), found '*'
    /// ```
    UnexpectedToken {
        /// List of expected token descriptions
        expected: Vec<String>,

        /// The token found instead
        found: String,

        /// Location in source
        span: Span,
    },

    /// A name that is not an operator, alias or definition in scope.
    UnknownName {
        /// The name
        name: String,

        /// Location in source
        span: Span,
    },

    /// A parenthesised list of types that is not the domain of an arrow.
    ///
    /// ```text
    /// (A, B) * C
    /// ^^^^^^
    /// error: a list of types must be followed by '**'
    /// ```
    DanglingTypeList {
        /// Location in source
        span: Span,
    },
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken {
                expected, found, ..
            } => {
                write!(f, "expected ")?;
                if expected.len() == 1 {
                    write!(f, "{}", expected[0])?;
                } else {
                    write!(f, "one of: {}", expected.join(", "))?;
                }
                write!(f, ", found '{found}'")
            }
            Self::UnknownName { name, .. } => write!(f, "unknown name '{name}'"),
            Self::DanglingTypeList { .. } => {
                write!(f, "a list of types must be followed by '**'")
            }
        }
    }
}

impl std::error::Error for ParserError {}

impl Spanned for ParserError {
    fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnknownName { span, .. }
            | Self::DanglingTypeList { span } => *span,
        }
    }
}

/// Any failure while reading text against a [`Language`](crate::Language).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LangError {
    /// Lexer error
    Lexer(LexerError),

    /// Parser error
    Parser(ParserError),

    /// Structural error: bad arity, alias misuse, duplicate declaration.
    Decl {
        /// The engine error
        error: DeclError,
        /// Offending syntax, if the error came from text
        span: Option<Span>,
    },

    /// Typing error while assembling an expression.
    Type {
        /// The engine error
        error: TypeError,
        /// Offending syntax, if the error came from text
        span: Option<Span>,
    },
}

impl LangError {
    /// Where in the source the error was raised, if anywhere.
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::Lexer(err) => Some(err.span()),
            Self::Parser(err) => Some(err.span()),
            Self::Decl { span, .. } | Self::Type { span, .. } => *span,
        }
    }

    /// The typing error, if this is one.
    #[must_use]
    pub fn as_type_error(&self) -> Option<&TypeError> {
        match self {
            Self::Type { error, .. } => Some(error),
            _ => None,
        }
    }

    /// The declaration error, if this is one.
    #[must_use]
    pub fn as_decl_error(&self) -> Option<&DeclError> {
        match self {
            Self::Decl { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Renders the error with operator names.
    #[must_use]
    pub fn render(&self, cat: &Catalogue) -> String {
        match self {
            Self::Lexer(err) => err.to_string(),
            Self::Parser(err) => err.to_string(),
            Self::Decl { error, .. } => error.render(cat),
            Self::Type { error, .. } => error.render(cat),
        }
    }
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexer(err) => write!(f, "lexer error: {err}"),
            Self::Parser(err) => write!(f, "parser error: {err}"),
            Self::Decl { error, .. } => write!(f, "declaration error: {error}"),
            Self::Type { error, .. } => write!(f, "type error: {error}"),
        }
    }
}

impl std::error::Error for LangError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Lexer(err) => Some(err),
            Self::Parser(err) => Some(err),
            Self::Decl { error, .. } => Some(error),
            Self::Type { error, .. } => Some(error),
        }
    }
}

impl From<LexerError> for LangError {
    fn from(err: LexerError) -> Self {
        Self::Lexer(err)
    }
}

impl From<ParserError> for LangError {
    fn from(err: ParserError) -> Self {
        Self::Parser(err)
    }
}

impl From<DeclError> for LangError {
    fn from(error: DeclError) -> Self {
        Self::Decl { error, span: None }
    }
}

impl From<TypeError> for LangError {
    fn from(error: TypeError) -> Self {
        Self::Type { error, span: None }
    }
}

/// Result type for lexer operations.
pub type LexerResult<T> = Result<T, LexerError>;

/// Result type for parser operations.
pub type ParserResult<T> = Result<T, ParserError>;

/// Result type for [`Language`](crate::Language) operations.
pub type LangResult<T> = Result<T, LangError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_error_display() {
        let err = ParserError::UnexpectedToken {
            expected: vec![";".to_string(), ")".to_string()],
            found: "*".to_string(),
            span: Span::new(6, 7, 1, 7, 1, 8),
        };
        assert_eq!(err.to_string(), "expected one of: ;, ), found '*'");

        let err = ParserError::UnknownName {
            name: "Q".to_string(),
            span: Span::new(0, 1, 1, 1, 1, 2),
        };
        assert_eq!(err.to_string(), "unknown name 'Q'");
    }

    #[test]
    fn test_lang_error_from_and_span() {
        let span = Span::new(2, 3, 1, 3, 1, 4);
        let err: LangError = LexerError::UnknownChar { ch: '@', span }.into();
        assert!(matches!(err, LangError::Lexer(_)));
        assert_eq!(err.span(), Some(span));
        assert_eq!(err.to_string(), "lexer error: unknown character '@'");

        let err: LangError = DeclError::AliasParamCount {
            expected: 1,
            found: 0,
        }
        .into();
        assert_eq!(err.span(), None);
        assert!(err.as_decl_error().is_some());
        assert!(err.as_type_error().is_none());
    }
}
