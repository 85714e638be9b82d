//! Text front end for the `talg` type engine.
//!
//! This crate provides:
//! - A lexer and recursive-descent parser for type and expression text
//! - A [`Language`] holding operators, aliases and named definitions
//! - Typed expression trees checked against the language
//! - Diagnostics with source highlighting
//!
//! # Grammar
//!
//! ```text
//! type    := product ('**' type)?
//! product := atom ('*' product)?
//! atom    := '_' | IDENT ('(' types ')')? | '(' types ')'
//!
//! program := stmt (';' stmt)* ';'?
//! stmt    := app (':' atom)?
//! app     := term term*
//! term    := IDENT | NUMBER | '-' ':' atom | '(' stmt ')'
//! ```

#![warn(missing_docs)]

pub mod ast;
pub mod diagnostic;
mod elab;
pub mod error;
pub mod expr;
pub mod language;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticLevel, Emitter};
pub use error::{LangError, LangResult, LexerError, ParserError};
pub use expr::{DisplayExpr, Expr};
pub use language::{Language, LanguageBuilder};
pub use lexer::Lexer;
pub use parser::Parser;
pub use span::{Span, Spanned};
pub use token::{Token, TokenKind};
