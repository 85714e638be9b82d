//! Elaboration: resolving syntax trees against a language scope and typing
//! them in one inference context.

use crate::ast::{Term, TypeExpr};
use crate::error::{LangError, LangResult, ParserError};
use crate::expr::Expr;
use crate::language::Language;
use crate::span::Span;
use fxhash::FxHashMap;
use talg_log::trace;
use talg_mem::{StringInterner, Symbol};
use talg_types::{Context, Ty, TypeError};

pub(crate) struct Elaborator<'l> {
    lang: &'l Language,
    names: &'l StringInterner,
    text: &'l str,
    ctx: Context<'l>,
    /// Types of numbered sources, shared by all statements of a program
    sources: FxHashMap<u32, Ty>,
}

impl<'l> Elaborator<'l> {
    pub(crate) fn new(lang: &'l Language, names: &'l StringInterner, text: &'l str) -> Self {
        Self {
            lang,
            names,
            text,
            ctx: Context::new(lang.catalogue()),
            sources: FxHashMap::default(),
        }
    }

    fn name(&self, sym: Symbol) -> &'l str {
        self.names.resolve(sym).unwrap_or("<invalid>")
    }

    fn type_error(&self, error: TypeError, span: Span) -> LangError {
        let snippet = self.text.get(span.start..span.end).unwrap_or_default();
        LangError::Type {
            error: error.with_context(|| snippet.to_string()),
            span: Some(span),
        }
    }

    /// Builds the instance a type expression denotes.
    pub(crate) fn ty(&self, expr: &TypeExpr) -> LangResult<Ty> {
        match expr {
            TypeExpr::Wildcard { .. } => Ok(Ty::Wild),
            TypeExpr::Product { left, right, .. } => {
                Ok(Ty::product(self.ty(left)?, self.ty(right)?))
            }
            TypeExpr::Function {
                domain, codomain, ..
            } => Ok(Ty::arrow(self.ty(domain)?, self.ty(codomain)?)),
            TypeExpr::Name { name, args, span } => {
                let name = self.name(*name);
                let args = match args {
                    Some(args) => args.iter().map(|a| self.ty(a)).collect::<LangResult<_>>()?,
                    None => Vec::new(),
                };
                let decl = |error| LangError::Decl {
                    error,
                    span: Some(*span),
                };

                let cat = self.lang.catalogue();
                if let Some(alias) = self.lang.alias(name) {
                    alias.instance(cat, &args).map_err(decl)
                } else if let Some(op) = cat.lookup(name) {
                    cat.instance(op, args).map_err(decl)
                } else {
                    Err(ParserError::UnknownName {
                        name: name.to_string(),
                        span: *span,
                    }
                    .into())
                }
            }
        }
    }

    /// Types one statement.
    pub(crate) fn term(&mut self, term: &Term) -> LangResult<Expr> {
        match term {
            Term::Name { name, span } => {
                let name = self.name(*name);
                let Some(scheme) = self.lang.definition(name) else {
                    return Err(ParserError::UnknownName {
                        name: name.to_string(),
                        span: *span,
                    }
                    .into());
                };
                let ty = self
                    .ctx
                    .instantiate(scheme)
                    .map_err(|e| self.type_error(e, *span))?;
                Ok(Expr::operation(name, ty))
            }
            Term::Source { id, .. } => {
                let ty = match self.sources.get(id) {
                    Some(ty) => ty.clone(),
                    None => {
                        let ty = self.ctx.fresh_var();
                        self.sources.insert(*id, ty.clone());
                        ty
                    }
                };
                Ok(Expr::numbered(*id, ty))
            }
            Term::Anonymous { ty, .. } => Ok(Expr::source(self.ty(ty)?)),
            Term::Apply { func, arg, span } => {
                let func = self.term(func)?;
                let arg = self.term(arg)?;
                let ty = self
                    .ctx
                    .apply(func.ty(), arg.ty())
                    .map_err(|e| self.type_error(e, *span))?;
                Ok(func.apply(arg, ty))
            }
            Term::Ascribe { term, ty, span } => {
                let expr = self.term(term)?;
                let ascribed = self.ty(ty)?;
                trace!("ascribe {}", self.lang.catalogue().display(&ascribed));

                // A source takes its annotation as its type; anything else
                // must fit inside it.
                let checked = if expr.is_source() {
                    self.ctx.equate(expr.ty(), &ascribed)
                } else {
                    self.ctx.unify(expr.ty(), &ascribed)
                };
                checked.map_err(|e| self.type_error(e, *span))?;
                Ok(expr)
            }
        }
    }

    /// Reads off final types for every node.
    pub(crate) fn finish(mut self, expr: Expr) -> LangResult<Expr> {
        let ctx = &mut self.ctx;
        expr.try_map_types(&mut |ty| ctx.resolve(&ty))
            .map_err(LangError::from)
    }
}
