//! Untyped syntax trees produced by the parser.
//!
//! Names are still [`Symbol`]s here; they are resolved against a
//! [`Language`](crate::Language) scope during elaboration.

use crate::span::{Span, Spanned};
use talg_mem::Symbol;

/// A type as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `_`
    Wildcard {
        /// Location in source
        span: Span,
    },

    /// An operator or alias, bare (`A`) or applied (`F(A, B)`).
    Name {
        /// The name
        name: Symbol,
        /// Parameters, `None` when written without parentheses
        args: Option<Vec<TypeExpr>>,
        /// Location in source
        span: Span,
    },

    /// `left * right`
    Product {
        /// Left operand
        left: Box<TypeExpr>,
        /// Right operand
        right: Box<TypeExpr>,
        /// Location in source
        span: Span,
    },

    /// `domain ** codomain`
    Function {
        /// Argument type
        domain: Box<TypeExpr>,
        /// Result type
        codomain: Box<TypeExpr>,
        /// Location in source
        span: Span,
    },
}

impl Spanned for TypeExpr {
    fn span(&self) -> Span {
        match self {
            Self::Wildcard { span }
            | Self::Name { span, .. }
            | Self::Product { span, .. }
            | Self::Function { span, .. } => *span,
        }
    }
}

/// An expression term as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// A defined operation, e.g. `f`.
    Name {
        /// The name
        name: Symbol,
        /// Location in source
        span: Span,
    },

    /// A numbered source, e.g. `1`. The same number denotes the same source
    /// throughout a program.
    Source {
        /// Source number
        id: u32,
        /// Location in source
        span: Span,
    },

    /// An anonymous source of explicit type, `- : A`.
    Anonymous {
        /// Its type
        ty: TypeExpr,
        /// Location in source
        span: Span,
    },

    /// Juxtaposition `func arg`.
    Apply {
        /// The function
        func: Box<Term>,
        /// The argument
        arg: Box<Term>,
        /// Location in source
        span: Span,
    },

    /// `term : type`.
    Ascribe {
        /// The annotated term
        term: Box<Term>,
        /// The annotation
        ty: TypeExpr,
        /// Location in source
        span: Span,
    },
}

impl Spanned for Term {
    fn span(&self) -> Span {
        match self {
            Self::Name { span, .. }
            | Self::Source { span, .. }
            | Self::Anonymous { span, .. }
            | Self::Apply { span, .. }
            | Self::Ascribe { span, .. } => *span,
        }
    }
}

/// `;`-separated statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Statements in order
    pub statements: Vec<Term>,
}
