//! The three-valued subtype relation.
//!
//! `Some(true)` and `Some(false)` are definite answers. `None` means the
//! answer depends on a variable. A pure subtype query never binds anything.

use crate::context::Catalogue;
use crate::types::{OpId, Ty, Variance};

/// Conjunction over three-valued results: `false` dominates unknown, which
/// dominates `true`.
fn all(results: impl IntoIterator<Item = Option<bool>>) -> Option<bool> {
    let mut acc = Some(true);
    for result in results {
        match result {
            Some(false) => return Some(false),
            None => acc = None,
            Some(true) => {}
        }
    }
    acc
}

impl Catalogue {
    /// `sub <= sup`.
    ///
    /// ```
    /// use talg_types::{Catalogue, Ty};
    ///
    /// let mut cat = Catalogue::new();
    /// let int = cat.declare("Int", 0, None).unwrap();
    /// let uint = cat.declare("UInt", 0, Some(int)).unwrap();
    /// let (int, uint) = (Ty::basic(int), Ty::basic(uint));
    ///
    /// let f = Ty::arrow(int.clone(), int.clone());
    /// assert_eq!(cat.subtype(&f, &Ty::arrow(uint.clone(), int.clone())), Some(true));
    /// assert_eq!(cat.subtype(&f, &Ty::arrow(int.clone(), uint)), Some(false));
    /// assert_eq!(cat.subtype(&Ty::arrow(Ty::Wild, int.clone()), &f), Some(true));
    /// ```
    #[must_use]
    pub fn subtype(&self, sub: &Ty, sup: &Ty) -> Option<bool> {
        match (sub, sup) {
            (Ty::Wild, _) | (_, Ty::Wild) => Some(true),
            (_, Ty::Op { op: OpId::TOP, .. }) if self.has_top() => Some(true),
            (Ty::Var(_), _) | (_, Ty::Var(_)) => None,
            (Ty::Op { op: p, params: ps }, Ty::Op { op: q, params: qs }) => {
                if ps.is_empty() && qs.is_empty() {
                    return Some(self.is_subtype_op(*p, *q));
                }
                if p != q || ps.len() != qs.len() {
                    return Some(false);
                }
                all(ps.iter().zip(qs).enumerate().map(|(i, (x, y))| {
                    match self.variance(*p, i) {
                        Variance::Covariant => self.subtype(x, y),
                        Variance::Contravariant => self.subtype(y, x),
                    }
                }))
            }
        }
    }

    /// `sub < sup`: a subtype and not structurally equal.
    #[must_use]
    pub fn strict_subtype(&self, sub: &Ty, sup: &Ty) -> Option<bool> {
        self.subtype(sub, sup).map(|le| le && sub != sup)
    }
}
