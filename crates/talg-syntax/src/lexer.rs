//! Tokenization of type and expression text.
//!
//! The lexer turns text into [`Token`]s: identifiers (interned to
//! [`Symbol`](talg_mem::Symbol)s), source numbers, `*`, `**`, `-`, `_`, parentheses, `,`, `:`
//! and `;`. Whitespace and `//` line comments are skipped.
//!
//! ```
//! use talg_syntax::lexer::Lexer;
//! use talg_syntax::token::TokenKind;
//!
//! let tokens = Lexer::new("f 1 : A ** B").lex().unwrap();
//! assert_eq!(tokens.len(), 7); // f, 1, :, A, **, B, EOF
//! assert_eq!(tokens[4].kind, TokenKind::StarStar);
//! ```

use crate::error::{LexerError, LexerResult};
use crate::span::Span;
use crate::token::{Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;
use talg_mem::StringInterner;

/// Lexical analyzer over one piece of text.
pub struct Lexer<'input> {
    /// The text being tokenized
    input: &'input str,

    /// Character iterator with peek capability
    chars: Peekable<Chars<'input>>,

    /// Current byte offset
    position: usize,

    /// Current line number (1-indexed)
    line: usize,

    /// Current column number in bytes (1-indexed)
    column: usize,

    /// Accumulated tokens
    tokens: Vec<Token>,

    /// Accumulated errors
    errors: Vec<LexerError>,

    /// Identifier names
    interner: StringInterner,
}

impl<'input> Lexer<'input> {
    /// Creates a new lexer for the given text.
    #[must_use]
    pub fn new(input: &'input str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
            interner: StringInterner::new(),
        }
    }

    /// Tokenizes the whole input. The last token is always `EOF`.
    ///
    /// # Errors
    ///
    /// Returns the first [`LexerError`]; lexing continues past bad
    /// characters so that the reported error is the earliest one.
    pub fn lex(self) -> LexerResult<Vec<Token>> {
        self.lex_with_interner().map(|(tokens, _)| tokens)
    }

    /// Tokenizes the whole input and hands back the identifier names.
    ///
    /// # Errors
    ///
    /// As for [`lex`](Self::lex).
    pub fn lex_with_interner(mut self) -> LexerResult<(Vec<Token>, StringInterner)> {
        loop {
            self.skip_trivia();
            if self.peek().is_none() {
                break;
            }
            match self.next_token() {
                Ok(token) => self.tokens.push(token),
                Err(err) => self.errors.push(err),
            }
        }

        let eof_span = Span::point(self.position, self.line, self.column);
        self.tokens.push(Token::new(TokenKind::EOF, eof_span));

        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok((self.tokens, self.interner)),
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Consumes the next character, updating position tracking.
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Skips whitespace and line comments.
    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == '/' && self.input[self.position..].starts_with("//") {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.bump();
                }
            } else {
                break;
            }
        }
    }

    fn span_from(&self, start: usize, line: usize, col: usize) -> Span {
        Span::new(start, self.position, line, col, self.line, self.column)
    }

    /// Reads the next token. The caller guarantees input remains.
    fn next_token(&mut self) -> LexerResult<Token> {
        let (start, line, col) = (self.position, self.line, self.column);
        let Some(ch) = self.bump() else {
            return Ok(Token::new(TokenKind::EOF, Span::point(start, line, col)));
        };

        let kind = match ch {
            '_' if self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') => {
                self.read_identifier(start)
            }
            '_' => TokenKind::Underscore,
            c if c.is_alphabetic() => self.read_identifier(start),
            '0'..='9' => self.read_number(start, line, col)?,
            '*' => {
                if self.peek() == Some('*') {
                    self.bump();
                    TokenKind::StarStar
                } else {
                    TokenKind::Star
                }
            }
            '-' => TokenKind::Minus,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            other => {
                return Err(LexerError::UnknownChar {
                    ch: other,
                    span: self.span_from(start, line, col),
                });
            }
        };

        Ok(Token::new(kind, self.span_from(start, line, col)))
    }

    /// Reads the rest of an identifier whose first character is consumed.
    fn read_identifier(&mut self, start: usize) -> TokenKind {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let text = &self.input[start..self.position];
        TokenKind::Ident(self.interner.intern(text))
    }

    /// Reads the rest of a source number whose first digit is consumed.
    fn read_number(&mut self, start: usize, line: usize, col: usize) -> LexerResult<TokenKind> {
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        let text = &self.input[start..self.position];
        text.parse::<u32>()
            .map(TokenKind::Number)
            .map_err(|_| LexerError::InvalidNumeric {
                literal: text.to_string(),
                span: self.span_from(start, line, col),
            })
    }
}
