//! Typed expressions.
//!
//! An [`Expr`] is what a successfully typed program elaborates to: defined
//! operations, sources and applications, each carrying its inferred type.

use std::fmt;
use talg_types::{Catalogue, Ty};

/// A typed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A defined operation, instantiated at this use.
    Operation {
        /// Definition name
        name: String,
        /// Instance type
        ty: Ty,
    },

    /// An input: numbered (`1`) or anonymous (`- : A`).
    Source {
        /// Source number, `None` when anonymous
        id: Option<u32>,
        /// Type of the input
        ty: Ty,
    },

    /// `func arg`.
    Application {
        /// The function
        func: Box<Expr>,
        /// The argument
        arg: Box<Expr>,
        /// Result type
        ty: Ty,
    },
}

impl Expr {
    /// An operation node.
    pub fn operation(name: impl Into<String>, ty: Ty) -> Self {
        Expr::Operation {
            name: name.into(),
            ty,
        }
    }

    /// An anonymous source of type `ty`.
    #[must_use]
    pub fn source(ty: Ty) -> Self {
        Expr::Source { id: None, ty }
    }

    /// Source number `id` of type `ty`.
    #[must_use]
    pub fn numbered(id: u32, ty: Ty) -> Self {
        Expr::Source { id: Some(id), ty }
    }

    /// Applies `self` to `arg`, with result type `ty`.
    #[must_use]
    pub fn apply(self, arg: Expr, ty: Ty) -> Self {
        Expr::Application {
            func: Box::new(self),
            arg: Box::new(arg),
            ty,
        }
    }

    /// Type of this node.
    #[must_use]
    pub fn ty(&self) -> &Ty {
        match self {
            Expr::Operation { ty, .. } | Expr::Source { ty, .. } | Expr::Application { ty, .. } => {
                ty
            }
        }
    }

    /// Whether this is a source, numbered or anonymous.
    #[must_use]
    pub fn is_source(&self) -> bool {
        matches!(self, Expr::Source { .. })
    }

    /// Structural match against a pattern expression.
    ///
    /// Shapes and operation names must agree and every type must match the
    /// pattern's type (see [`Ty::matches`]). An anonymous source in the
    /// pattern matches a source of any number.
    #[must_use]
    pub fn matches(&self, pattern: &Expr) -> bool {
        if !self.ty().matches(pattern.ty()) {
            return false;
        }
        match (self, pattern) {
            (Expr::Operation { name: a, .. }, Expr::Operation { name: b, .. }) => a == b,
            (Expr::Source { id: a, .. }, Expr::Source { id: b, .. }) => b.is_none() || a == b,
            (
                Expr::Application { func, arg, .. },
                Expr::Application {
                    func: pf, arg: pa, ..
                },
            ) => func.matches(pf) && arg.matches(pa),
            _ => false,
        }
    }

    /// Rewrites every type in the tree, innermost first.
    pub(crate) fn try_map_types<E>(
        self,
        f: &mut impl FnMut(Ty) -> Result<Ty, E>,
    ) -> Result<Expr, E> {
        Ok(match self {
            Expr::Operation { name, ty } => Expr::Operation { name, ty: f(ty)? },
            Expr::Source { id, ty } => Expr::Source { id, ty: f(ty)? },
            Expr::Application { func, arg, ty } => Expr::Application {
                func: Box::new(func.try_map_types(f)?),
                arg: Box::new(arg.try_map_types(f)?),
                ty: f(ty)?,
            },
        })
    }

    /// Displays the expression in surface syntax with operator names.
    #[must_use]
    pub fn display<'a>(&'a self, catalogue: &'a Catalogue) -> DisplayExpr<'a> {
        DisplayExpr {
            expr: self,
            catalogue,
        }
    }
}

/// Surface-syntax rendering of an [`Expr`].
pub struct DisplayExpr<'a> {
    expr: &'a Expr,
    catalogue: &'a Catalogue,
}

impl DisplayExpr<'_> {
    fn write(&self, expr: &Expr, f: &mut fmt::Formatter<'_>, as_arg: bool) -> fmt::Result {
        match expr {
            Expr::Operation { name, .. } => f.write_str(name),
            Expr::Source { id: Some(id), .. } => write!(f, "{id}"),
            Expr::Source { id: None, ty } => {
                let ty = self.catalogue.display(ty);
                if as_arg {
                    write!(f, "(- : {ty})")
                } else {
                    write!(f, "- : {ty}")
                }
            }
            Expr::Application { func, arg, .. } => {
                if as_arg {
                    f.write_str("(")?;
                }
                self.write(func, f, false)?;
                f.write_str(" ")?;
                self.write(arg, f, true)?;
                if as_arg {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DisplayExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(self.expr, f, false)
    }
}
