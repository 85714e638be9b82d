//! A vocabulary of operators, aliases and definitions, with parsing and
//! lattice queries against it.
//!
//! ```
//! use talg_syntax::Language;
//! use talg_types::{Scheme, Ty};
//!
//! let mut builder = Language::builder();
//! let a = builder.declare("A", 0, None).unwrap();
//! let f = builder.declare("F", 1, None).unwrap();
//! builder
//!     .define("f", Scheme::new(1, move |v: &[Ty]| {
//!         Ty::arrow(v[0].clone(), Ty::op(f, vec![v[0].clone()]))
//!     }))
//!     .unwrap();
//! let lang = builder.build().unwrap();
//!
//! let expr = lang.parse("f (- : A)").unwrap();
//! assert_eq!(expr.ty(), &Ty::op(f, vec![Ty::basic(a)]));
//! assert_eq!(lang.parse_type("F(A)").unwrap(), Ty::op(f, vec![Ty::basic(a)]));
//! ```

use crate::elab::Elaborator;
use crate::error::{LangResult, ParserError};
use crate::expr::Expr;
use crate::lexer::Lexer;
use crate::parser::Parser;
use crate::span::Span;
use fxhash::FxHashMap;
use talg_log::{debug, info};
use talg_types::{Canon, Catalogue, DeclError, OpId, Scheme, Ty, TypeAlias};

/// A frozen vocabulary.
#[derive(Debug)]
pub struct Language {
    catalogue: Catalogue,
    aliases: FxHashMap<String, TypeAlias>,
    definitions: FxHashMap<String, Scheme>,
    canon: Canon,
}

impl Language {
    /// Starts declaring a vocabulary.
    #[must_use]
    pub fn builder() -> LanguageBuilder {
        LanguageBuilder::new()
    }

    /// The operator catalogue.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// The canon computed at build time.
    #[must_use]
    pub fn canon(&self) -> &Canon {
        &self.canon
    }

    /// The alias with this name.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&TypeAlias> {
        self.aliases.get(name)
    }

    /// The definition with this name.
    #[must_use]
    pub fn definition(&self, name: &str) -> Option<&Scheme> {
        self.definitions.get(name)
    }

    /// Direct subtypes of `ty` within the canon.
    pub fn subtypes<'a>(&'a self, ty: &Ty) -> impl Iterator<Item = &'a Ty> + use<'a> {
        self.canon.subtypes(ty)
    }

    /// Direct supertypes of `ty` within the canon.
    pub fn supertypes<'a>(&'a self, ty: &Ty) -> impl Iterator<Item = &'a Ty> + use<'a> {
        self.canon.supertypes(ty)
    }

    /// Parses a type.
    ///
    /// # Errors
    ///
    /// Syntax errors, unknown names, and arity or alias misuse.
    pub fn parse_type(&self, text: &str) -> LangResult<Ty> {
        let (tokens, names) = Lexer::new(text).lex_with_interner()?;
        let expr = Parser::new(tokens).parse_type_expr()?;
        Elaborator::new(self, &names, text).ty(&expr)
    }

    /// Parses and types a program, returning its last statement.
    ///
    /// Statements are typed in order in one context, so a numbered source
    /// has the same type in every statement that mentions it.
    ///
    /// # Errors
    ///
    /// Syntax errors, unknown names, structural errors in type annotations,
    /// and typing errors with the span of the offending expression.
    pub fn parse(&self, text: &str) -> LangResult<Expr> {
        let (tokens, names) = Lexer::new(text).lex_with_interner()?;
        let program = Parser::new(tokens).parse_program()?;
        debug!("typing {} statement(s)", program.statements.len());

        let mut elab = Elaborator::new(self, &names, text);
        let mut last = None;
        for statement in &program.statements {
            last = Some(elab.term(statement)?);
        }

        match last {
            Some(expr) => elab.finish(expr),
            None => Err(ParserError::UnexpectedToken {
                expected: vec!["expression".to_string()],
                found: "EOF".to_string(),
                span: Span::point(0, 1, 1),
            }
            .into()),
        }
    }
}

/// Collects declarations for a [`Language`].
#[derive(Debug, Default)]
pub struct LanguageBuilder {
    catalogue: Catalogue,
    aliases: FxHashMap<String, TypeAlias>,
    definitions: FxHashMap<String, Scheme>,
    seed: Vec<Ty>,
}

impl LanguageBuilder {
    /// An empty vocabulary without `Top`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `Top` is part of the vocabulary.
    pub fn include_top(&mut self, enabled: bool) -> &mut Self {
        self.catalogue.set_top(enabled);
        self
    }

    /// The catalogue so far.
    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Declares a type operator.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken by an operator or alias, or on a supertype
    /// arity mismatch.
    pub fn declare(
        &mut self,
        name: &str,
        arity: usize,
        supertype: Option<OpId>,
    ) -> Result<OpId, DeclError> {
        if self.aliases.contains_key(name) {
            return Err(DeclError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.catalogue.declare(name, arity, supertype)
    }

    /// Declares a type alias.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken by an operator or alias.
    pub fn alias(&mut self, name: &str, alias: TypeAlias) -> Result<(), DeclError> {
        if self.aliases.contains_key(name) || self.catalogue.lookup(name).is_some() {
            return Err(DeclError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.aliases.insert(name.to_string(), alias);
        Ok(())
    }

    /// Defines a named operation usable in expressions.
    ///
    /// # Errors
    ///
    /// Fails if the name is already defined.
    pub fn define(&mut self, name: &str, scheme: impl Into<Scheme>) -> Result<(), DeclError> {
        if self.definitions.contains_key(name) {
            return Err(DeclError::DuplicateName {
                name: name.to_string(),
            });
        }
        self.definitions.insert(name.to_string(), scheme.into());
        Ok(())
    }

    /// Adds instances to the canon seed.
    pub fn canon(&mut self, seed: impl IntoIterator<Item = Ty>) -> &mut Self {
        self.seed.extend(seed);
        self
    }

    /// Freezes the vocabulary and computes the canon.
    ///
    /// # Errors
    ///
    /// Fails if a canon seed contains variables or wildcards.
    pub fn build(self) -> Result<Language, DeclError> {
        let canon = Canon::new(&self.catalogue, self.seed)?;
        info!(
            "language built: {} operators, {} aliases, {} definitions",
            self.catalogue.len(),
            self.aliases.len(),
            self.definitions.len()
        );
        Ok(Language {
            catalogue: self.catalogue,
            aliases: self.aliases,
            definitions: self.definitions,
            canon,
        })
    }
}
