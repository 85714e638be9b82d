//! Type pretty-printing in the surface syntax.
//!
//! Functions render as `A ** B`, products as `A * B`, compound operators as
//! `F(A, B)`, wildcards as `_` and variables as `_0`, `_1`, …

use crate::context::Catalogue;
use crate::types::{OpId, Ty};
use std::fmt;

/// A wrapper for displaying an instance with operator names.
///
/// Without a catalogue, operators print as their ids (`#3`).
pub struct DisplayTy<'a> {
    ty: &'a Ty,
    catalogue: Option<&'a Catalogue>,
}

impl<'a> DisplayTy<'a> {
    /// Create a new display wrapper for an instance.
    pub fn new(ty: &'a Ty, catalogue: &'a Catalogue) -> Self {
        Self {
            ty,
            catalogue: Some(catalogue),
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        DisplayTy {
            ty: self,
            catalogue: None,
        }
        .fmt(f)
    }
}

impl fmt::Display for DisplayTy<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.format_type(self.ty, Prec::Arrow, f)
    }
}

/// Binding context of the position being printed.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    /// Anything goes
    Arrow,
    /// Right operand of `*` or left operand of `**`
    Product,
    /// Left operand of `*`
    Atom,
}

impl DisplayTy<'_> {
    fn format_type(&self, ty: &Ty, prec: Prec, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match ty {
            Ty::Var(v) => write!(f, "{v}"),
            Ty::Wild => write!(f, "_"),

            Ty::Op { op, params } if *op == OpId::FUNCTION && params.len() == 2 => {
                let parens = prec > Prec::Arrow;
                if parens {
                    write!(f, "(")?;
                }
                self.format_type(&params[0], Prec::Product, f)?;
                write!(f, " ** ")?;
                self.format_type(&params[1], Prec::Arrow, f)?;
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }

            Ty::Op { op, params } if *op == OpId::PRODUCT && params.len() == 2 => {
                let parens = prec > Prec::Product;
                if parens {
                    write!(f, "(")?;
                }
                self.format_type(&params[0], Prec::Atom, f)?;
                write!(f, " * ")?;
                self.format_type(&params[1], Prec::Product, f)?;
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }

            Ty::Op { op, params } => {
                match self.catalogue {
                    Some(cat) => write!(f, "{}", cat.name(*op))?,
                    None => write!(f, "{op}")?,
                }
                if !params.is_empty() {
                    write!(f, "(")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        self.format_type(param, Prec::Arrow, f)?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TyVar;

    fn setup() -> (Catalogue, Ty, Ty, OpId) {
        let mut cat = Catalogue::new();
        let a = cat.declare("A", 0, None).unwrap();
        let b = cat.declare("B", 0, None).unwrap();
        let f = cat.declare("F", 2, None).unwrap();
        (cat, Ty::basic(a), Ty::basic(b), f)
    }

    #[test]
    fn test_display_compound() {
        let (cat, a, b, f) = setup();
        let ty = Ty::op(f, vec![a, Ty::product(b, Ty::Wild)]);
        assert_eq!(cat.display(&ty).to_string(), "F(A, B * _)");
    }

    #[test]
    fn test_display_arrows_right_associative() {
        let (cat, a, b, _) = setup();
        let right = Ty::arrow(a.clone(), Ty::arrow(b.clone(), a.clone()));
        let left = Ty::arrow(Ty::arrow(a.clone(), b), a);
        assert_eq!(cat.display(&right).to_string(), "A ** B ** A");
        assert_eq!(cat.display(&left).to_string(), "(A ** B) ** A");
    }

    #[test]
    fn test_display_product_grouping() {
        let (cat, a, _, _) = setup();
        let right = Ty::product(a.clone(), Ty::product(a.clone(), a.clone()));
        let left = Ty::product(Ty::product(a.clone(), a.clone()), a.clone());
        assert_eq!(cat.display(&right).to_string(), "A * A * A");
        assert_eq!(cat.display(&left).to_string(), "(A * A) * A");

        let mixed = Ty::arrow(Ty::product(a.clone(), a.clone()), a);
        assert_eq!(cat.display(&mixed).to_string(), "A * A ** A");
    }

    #[test]
    fn test_display_without_catalogue() {
        let ty = Ty::arrow(Ty::basic(OpId(3)), Ty::Wild);
        assert_eq!(ty.to_string(), "#3 ** _");
    }

    #[test]
    fn test_display_variables() {
        let (cat, a, _, _) = setup();
        let ty = Ty::arrow(Ty::Var(TyVar(3)), a);
        assert_eq!(cat.display(&ty).to_string(), "_3 ** A");
    }
}
