//! Recursive descent parser for types and expressions.
//!
//! Types:
//!
//! ```text
//! type    := product ('**' type)?
//! product := atom ('*' product)?
//! atom    := '_' | ident ('(' type (',' type)* ')')? | '(' type (',' type)* ')'
//! ```
//!
//! Both `**` and `*` group to the right, so `A * A * A` is `A * (A * A)`.
//! A parenthesised list of two or more types is only valid as the domain of
//! an arrow, where `(A, B) ** C` means `A ** B ** C`.
//!
//! Expressions:
//!
//! ```text
//! program := stmt (';' stmt)* ';'?
//! stmt    := app (':' atom)?
//! app     := term term*
//! term    := ident | number | '-' ':' atom | '(' stmt ')'
//! ```

use crate::ast::{Program, Term, TypeExpr};
use crate::error::{ParserError, ParserResult};
use crate::span::{Span, Spanned};
use crate::token::{Token, TokenKind};

/// A parsed atom or product: one type, or a parenthesised list awaiting `**`.
enum Group {
    Single(TypeExpr),
    List(Vec<TypeExpr>, Span),
}

impl Group {
    fn single(self) -> ParserResult<TypeExpr> {
        match self {
            Group::Single(ty) => Ok(ty),
            Group::List(_, span) => Err(ParserError::DanglingTypeList { span }),
        }
    }
}

/// Parser over a token stream ending in `EOF`.
pub struct Parser {
    /// Token stream from lexer
    tokens: Vec<Token>,
    /// Current position in token stream
    pos: usize,
}

impl Parser {
    /// Creates a new parser.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses the whole input as one type.
    ///
    /// # Errors
    ///
    /// Fails on any syntax error or trailing input.
    pub fn parse_type_expr(&mut self) -> ParserResult<TypeExpr> {
        let ty = self.parse_type()?;
        self.expect(&TokenKind::EOF)?;
        Ok(ty)
    }

    /// Parses the whole input as a program.
    ///
    /// # Errors
    ///
    /// Fails on any syntax error or trailing input.
    pub fn parse_program(&mut self) -> ParserResult<Program> {
        let mut statements = vec![self.parse_stmt()?];
        while self.check(&TokenKind::Semicolon) {
            self.bump();
            if self.check(&TokenKind::EOF) {
                break;
            }
            statements.push(self.parse_stmt()?);
        }

        if !self.check(&TokenKind::EOF) {
            return Err(self.unexpected(&[";", "EOF"]));
        }
        Ok(Program { statements })
    }

    fn kind(&self) -> &TokenKind {
        self.tokens.get(self.pos).map_or(&TokenKind::EOF, |t| &t.kind)
    }

    fn span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Span::point(0, 1, 1), |t| t.span)
    }

    /// Advances and returns the span of the consumed token.
    fn bump(&mut self) -> Span {
        let span = self.span();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        span
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.kind() == kind
    }

    fn expect(&mut self, kind: &TokenKind) -> ParserResult<Span> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            let expected = kind.to_string();
            Err(self.unexpected(&[expected.as_str()]))
        }
    }

    fn unexpected(&self, expected: &[&str]) -> ParserError {
        ParserError::UnexpectedToken {
            expected: expected.iter().map(|s| (*s).to_string()).collect(),
            found: self.kind().to_string(),
            span: self.span(),
        }
    }

    // ===== Types =====

    fn parse_type(&mut self) -> ParserResult<TypeExpr> {
        let lhs = self.parse_product()?;
        if !self.check(&TokenKind::StarStar) {
            return lhs.single();
        }

        self.bump();
        let codomain = self.parse_type()?;
        let domains = match lhs {
            Group::Single(ty) => vec![ty],
            Group::List(tys, _) => tys,
        };
        Ok(domains.into_iter().rev().fold(codomain, |acc, domain| {
            TypeExpr::Function {
                span: Span::merge(domain.span(), acc.span()),
                domain: Box::new(domain),
                codomain: Box::new(acc),
            }
        }))
    }

    fn parse_product(&mut self) -> ParserResult<Group> {
        let first = self.parse_atom()?;
        if !self.check(&TokenKind::Star) {
            return Ok(first);
        }
        let Group::Single(left) = first else {
            return Ok(first);
        };

        self.bump();
        let right = self.parse_product()?.single()?;
        Ok(Group::Single(TypeExpr::Product {
            span: Span::merge(left.span(), right.span()),
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    fn parse_atom(&mut self) -> ParserResult<Group> {
        match self.kind().clone() {
            TokenKind::Underscore => Ok(Group::Single(TypeExpr::Wildcard { span: self.bump() })),
            TokenKind::Ident(name) => {
                let start = self.bump();
                if !self.check(&TokenKind::LParen) {
                    return Ok(Group::Single(TypeExpr::Name {
                        name,
                        args: None,
                        span: start,
                    }));
                }
                self.bump();
                let args = self.parse_type_list()?;
                let end = self.expect(&TokenKind::RParen)?;
                Ok(Group::Single(TypeExpr::Name {
                    name,
                    args: Some(args),
                    span: Span::merge(start, end),
                }))
            }
            TokenKind::LParen => {
                let start = self.bump();
                let mut items = self.parse_type_list()?;
                let end = self.expect(&TokenKind::RParen)?;
                if items.len() == 1 {
                    if let Some(only) = items.pop() {
                        return Ok(Group::Single(only));
                    }
                }
                Ok(Group::List(items, Span::merge(start, end)))
            }
            _ => Err(self.unexpected(&["type"])),
        }
    }

    fn parse_type_list(&mut self) -> ParserResult<Vec<TypeExpr>> {
        let mut items = vec![self.parse_type()?];
        while self.check(&TokenKind::Comma) {
            self.bump();
            items.push(self.parse_type()?);
        }
        Ok(items)
    }

    // ===== Expressions =====

    fn parse_stmt(&mut self) -> ParserResult<Term> {
        let term = self.parse_app()?;
        if !self.check(&TokenKind::Colon) {
            return Ok(term);
        }

        self.bump();
        let ty = self.parse_atom()?.single()?;
        Ok(Term::Ascribe {
            span: Span::merge(term.span(), ty.span()),
            term: Box::new(term),
            ty,
        })
    }

    fn parse_app(&mut self) -> ParserResult<Term> {
        let mut func = self.parse_term()?;
        while self.kind().starts_term() {
            let arg = self.parse_term()?;
            func = Term::Apply {
                span: Span::merge(func.span(), arg.span()),
                func: Box::new(func),
                arg: Box::new(arg),
            };
        }
        Ok(func)
    }

    fn parse_term(&mut self) -> ParserResult<Term> {
        match self.kind().clone() {
            TokenKind::Ident(name) => Ok(Term::Name {
                name,
                span: self.bump(),
            }),
            TokenKind::Number(id) => Ok(Term::Source {
                id,
                span: self.bump(),
            }),
            TokenKind::Minus => {
                let start = self.bump();
                self.expect(&TokenKind::Colon)?;
                let ty = self.parse_atom()?.single()?;
                Ok(Term::Anonymous {
                    span: Span::merge(start, ty.span()),
                    ty,
                })
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_stmt()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected(&["expression"])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use talg_mem::StringInterner;

    fn parse_type(source: &str) -> (ParserResult<TypeExpr>, StringInterner) {
        let (tokens, names) = Lexer::new(source).lex_with_interner().unwrap();
        (Parser::new(tokens).parse_type_expr(), names)
    }

    fn parse_program(source: &str) -> ParserResult<Program> {
        let tokens = Lexer::new(source).lex().unwrap();
        Parser::new(tokens).parse_program()
    }

    /// Renders a type tree with explicit grouping.
    fn shape(ty: &TypeExpr, names: &StringInterner) -> String {
        match ty {
            TypeExpr::Wildcard { .. } => "_".to_string(),
            TypeExpr::Name { name, args, .. } => {
                let name = names.resolve(*name).unwrap_or("?");
                match args {
                    None => name.to_string(),
                    Some(args) => {
                        let args: Vec<String> = args.iter().map(|a| shape(a, names)).collect();
                        format!("{name}({})", args.join(", "))
                    }
                }
            }
            TypeExpr::Product { left, right, .. } => {
                format!("[{} * {}]", shape(left, names), shape(right, names))
            }
            TypeExpr::Function {
                domain, codomain, ..
            } => format!("[{} ** {}]", shape(domain, names), shape(codomain, names)),
        }
    }

    fn grouping(source: &str) -> String {
        let (ty, names) = parse_type(source);
        shape(&ty.unwrap(), &names)
    }

    #[test]
    fn test_parse_products_group_right() {
        assert_eq!(grouping("A * A"), "[A * A]");
        assert_eq!(grouping("A * A * A"), "[A * [A * A]]");
        assert_eq!(grouping("(A * A) * A"), "[[A * A] * A]");
        assert_eq!(grouping("F((A * A), (A))"), "F([A * A], A)");
    }

    #[test]
    fn test_parse_arrows() {
        assert_eq!(grouping("A ** B ** C"), "[A ** [B ** C]]");
        assert_eq!(grouping("(A, B) ** C"), "[A ** [B ** C]]");
        assert_eq!(grouping("(A ** B) ** C"), "[[A ** B] ** C]");
        assert_eq!(grouping("A * B ** _"), "[[A * B] ** _]");
    }

    #[test]
    fn test_parse_dangling_type_list() {
        let (result, _) = parse_type("(A, B)");
        assert!(matches!(result, Err(ParserError::DanglingTypeList { .. })));

        let (result, _) = parse_type("(A, B) * C");
        assert!(matches!(result, Err(ParserError::DanglingTypeList { .. })));
    }

    #[test]
    fn test_parse_type_errors() {
        let (result, _) = parse_type("F(");
        assert!(matches!(result, Err(ParserError::UnexpectedToken { .. })));

        let (result, _) = parse_type("A B");
        assert!(matches!(result, Err(ParserError::UnexpectedToken { .. })));
    }

    #[test]
    fn test_parse_application_is_left_associative() {
        let program = parse_program("f 1 (- : A)").unwrap();
        let [Term::Apply { func, arg, .. }] = program.statements.as_slice() else {
            panic!("expected one application");
        };
        assert!(matches!(**arg, Term::Anonymous { .. }));
        assert!(matches!(**func, Term::Apply { .. }));
    }

    #[test]
    fn test_parse_ascription_and_statements() {
        let program = parse_program("1 : B; f 1 : A;").unwrap();
        assert_eq!(program.statements.len(), 2);
        assert!(
            program
                .statements
                .iter()
                .all(|s| matches!(s, Term::Ascribe { .. }))
        );
    }

    #[test]
    fn test_parse_anonymous_requires_atom() {
        assert!(parse_program("- : (A * A)").is_ok());
        assert!(matches!(
            parse_program("- : A * A"),
            Err(ParserError::UnexpectedToken { .. })
        ));
        assert!(matches!(
            parse_program("- A"),
            Err(ParserError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_parse_spans_cover_application() {
        let program = parse_program("f  x").unwrap();
        let span = program.statements[0].span();
        assert_eq!((span.start, span.end), (0, 4));
    }
}
