//! Unification with subtyping.
//!
//! `unify(a, b)` makes `a <= b` hold by narrowing variables. A variable that
//! meets a basic operator gains a lower or upper bound instead of a binding;
//! it is bound only once both bounds coincide. A variable that meets a
//! compound instance is bound to the same operator over fresh variables, and
//! the parameters are unified in turn. Two variables are merged.

use crate::context::{Catalogue, Subst};
use crate::error::{Result, TypeError};
use crate::types::{OpId, Ty, TyVar, Variance};
use talg_log::trace;

/// Narrows the variable arena so that subtype relations hold.
pub struct Unifier<'a> {
    /// The operator catalogue
    pub(crate) cat: &'a Catalogue,
    /// The arena being narrowed
    pub(crate) subst: &'a mut Subst,
}

impl<'a> Unifier<'a> {
    /// Create a new unifier over an arena.
    pub fn new(cat: &'a Catalogue, subst: &'a mut Subst) -> Self {
        Self { cat, subst }
    }

    /// Make `sub <= sup` hold.
    ///
    /// # Errors
    ///
    /// Returns [`TypeError::SubtypeMismatch`] when bounds or operators
    /// conflict and [`TypeError::RecursiveType`] when the occurs check fails.
    /// The arena may be partially narrowed on error.
    pub fn unify(&mut self, sub: &Ty, sup: &Ty) -> Result<()> {
        let a = self.subst.find(sub);
        let b = self.subst.find(sup);

        match (&a, &b) {
            (Ty::Wild, _) | (_, Ty::Wild) => Ok(()),

            (Ty::Var(v), Ty::Var(w)) if v == w => Ok(()),
            (Ty::Var(v), Ty::Var(w)) => self.union(*v, *w),

            (Ty::Var(v), Ty::Op { op, params }) => {
                if params.is_empty() {
                    self.set_upper(*v, *op)
                } else {
                    self.bind_shape(*v, &b)?;
                    self.unify(&a, &b)
                }
            }

            (Ty::Op { op, params }, Ty::Var(w)) => {
                if params.is_empty() {
                    self.set_lower(*w, *op)
                } else {
                    self.bind_shape(*w, &a)?;
                    self.unify(&a, &b)
                }
            }

            (Ty::Op { op: p, params: ps }, Ty::Op { op: q, params: qs }) => {
                if *q == OpId::TOP && self.cat.has_top() {
                    return Ok(());
                }

                if ps.is_empty() && qs.is_empty() {
                    return if self.cat.is_subtype_op(*p, *q) {
                        Ok(())
                    } else {
                        Err(TypeError::mismatch(a.clone(), b.clone()))
                    };
                }

                if p != q || ps.len() != qs.len() {
                    return Err(TypeError::mismatch(a.clone(), b.clone()));
                }

                for (i, (x, y)) in ps.iter().zip(qs).enumerate() {
                    match self.cat.variance(*p, i) {
                        Variance::Covariant => self.unify(x, y)?,
                        Variance::Contravariant => self.unify(y, x)?,
                    }
                }
                Ok(())
            }
        }
    }

    /// Merge two unbound variables. The bounds of `v` move to `w`.
    fn union(&mut self, v: TyVar, w: TyVar) -> Result<()> {
        let (lower, upper) = self.subst.bounds(v);
        trace!("bind {v} := {w}");
        self.subst.bind(v, Ty::Var(w));

        let w = Ty::Var(w);
        if let Some(lower) = lower {
            self.unify(&Ty::basic(lower), &w)?;
        }
        if let Some(upper) = upper {
            self.unify(&w, &Ty::basic(upper))?;
        }
        Ok(())
    }

    /// Raise the lower bound of an unbound variable to at least `new`.
    pub(crate) fn set_lower(&mut self, var: TyVar, new: OpId) -> Result<()> {
        let (lower, upper) = self.subst.bounds(var);

        if let Some(upper) = upper {
            if !self.cat.is_subtype_op(new, upper) {
                return Err(TypeError::mismatch(Ty::basic(new), Ty::basic(upper)));
            }
        }

        let lower = match lower {
            None => new,
            Some(old) if self.cat.is_subtype_op(new, old) => old,
            Some(old) if self.cat.is_subtype_op(old, new) => new,
            Some(old) => return Err(TypeError::mismatch(Ty::basic(old), Ty::basic(new))),
        };

        trace!("{var} >= {}", self.cat.name(lower));
        if let Some(slot) = self.subst.slot_mut(var) {
            slot.lower = Some(lower);
        }
        self.settle_bounds(var, Some(lower), upper);
        Ok(())
    }

    /// Lower the upper bound of an unbound variable to at most `new`.
    pub(crate) fn set_upper(&mut self, var: TyVar, new: OpId) -> Result<()> {
        let (lower, upper) = self.subst.bounds(var);

        if let Some(lower) = lower {
            if !self.cat.is_subtype_op(lower, new) {
                return Err(TypeError::mismatch(Ty::basic(lower), Ty::basic(new)));
            }
        }

        let upper = match upper {
            None => new,
            Some(old) if self.cat.is_subtype_op(old, new) => old,
            Some(old) if self.cat.is_subtype_op(new, old) => new,
            Some(old) => return Err(TypeError::mismatch(Ty::basic(new), Ty::basic(old))),
        };

        trace!("{var} <= {}", self.cat.name(upper));
        if let Some(slot) = self.subst.slot_mut(var) {
            slot.upper = Some(upper);
        }
        self.settle_bounds(var, lower, Some(upper));
        Ok(())
    }

    /// A variable squeezed between equal bounds is that operator.
    fn settle_bounds(&mut self, var: TyVar, lower: Option<OpId>, upper: Option<OpId>) {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower == upper {
                trace!("bind {var} := {}", self.cat.name(lower));
                self.subst.bind(var, Ty::basic(lower));
            }
        }
    }

    /// Bind an unbound variable to the operator of `pattern` over fresh
    /// variables, fixing the shape but none of the parameters.
    pub(crate) fn bind_shape(&mut self, var: TyVar, pattern: &Ty) -> Result<()> {
        let Ty::Op { op, params } = pattern else {
            return Ok(());
        };

        let resolved = self.subst.apply_ty(pattern);
        if resolved.occurs(var) {
            return Err(TypeError::RecursiveType { var, ty: resolved });
        }

        let (lower, upper) = self.subst.bounds(var);
        if let Some(lower) = lower {
            return Err(TypeError::mismatch(Ty::basic(lower), resolved));
        }
        if let Some(upper) = upper.filter(|&u| !(u == OpId::TOP && self.cat.has_top())) {
            return Err(TypeError::mismatch(resolved, Ty::basic(upper)));
        }

        let skeleton = Ty::op(
            *op,
            (0..params.len())
                .map(|_| Ty::Var(self.subst.fresh_var()))
                .collect(),
        );
        trace!("bind {var} := {}", self.cat.display(&skeleton));
        self.subst.bind(var, skeleton);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture {
        cat: Catalogue,
        any: OpId,
        int: OpId,
        uint: OpId,
        str: OpId,
        set: OpId,
    }

    fn fixture() -> Fixture {
        let mut cat = Catalogue::new();
        let any = cat.declare("Any", 0, None).unwrap();
        let int = cat.declare("Int", 0, Some(any)).unwrap();
        let uint = cat.declare("UInt", 0, Some(int)).unwrap();
        let str = cat.declare("Str", 0, Some(any)).unwrap();
        let set = cat.declare("Set", 1, None).unwrap();
        Fixture {
            cat,
            any,
            int,
            uint,
            str,
            set,
        }
    }

    #[test]
    fn test_unify_basic() {
        let fx = fixture();
        let mut subst = Subst::new();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::basic(fx.uint), &Ty::basic(fx.any)).unwrap();
        assert!(matches!(
            u.unify(&Ty::basic(fx.any), &Ty::basic(fx.int)),
            Err(TypeError::SubtypeMismatch { .. })
        ));
    }

    #[test]
    fn test_lower_bound_rises() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::basic(fx.uint), &Ty::Var(x)).unwrap();
        u.unify(&Ty::basic(fx.int), &Ty::Var(x)).unwrap();
        u.unify(&Ty::basic(fx.uint), &Ty::Var(x)).unwrap();
        assert_eq!(subst.bounds(x), (Some(fx.int), None));
    }

    #[test]
    fn test_lower_bounds_from_other_lineage() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::basic(fx.int), &Ty::Var(x)).unwrap();
        assert!(u.unify(&Ty::basic(fx.str), &Ty::Var(x)).is_err());
    }

    #[test]
    fn test_equal_bounds_bind() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::Var(x), &Ty::basic(fx.int)).unwrap();
        u.unify(&Ty::basic(fx.int), &Ty::Var(x)).unwrap();
        assert_eq!(subst.binding(x), Some(&Ty::basic(fx.int)));
    }

    #[test]
    fn test_crossing_bounds_fail() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::Var(x), &Ty::basic(fx.uint)).unwrap();
        assert!(u.unify(&Ty::basic(fx.int), &Ty::Var(x)).is_err());
    }

    #[test]
    fn test_compound_binds_shape_only() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::op(fx.set, vec![Ty::basic(fx.uint)]), &Ty::Var(x)).unwrap();

        let Some(Ty::Op { op, params }) = subst.binding(x).cloned() else {
            panic!("x should be bound to an operation");
        };
        assert_eq!(op, fx.set);
        let Ty::Var(inner) = params[0] else {
            panic!("parameter should stay a variable");
        };
        assert_eq!(subst.bounds(inner), (Some(fx.uint), None));
    }

    #[test]
    fn test_union_merges_bounds() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let y = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::basic(fx.uint), &Ty::Var(x)).unwrap();
        u.unify(&Ty::Var(y), &Ty::basic(fx.any)).unwrap();
        u.unify(&Ty::Var(x), &Ty::Var(y)).unwrap();

        assert_eq!(subst.find(&Ty::Var(x)), Ty::Var(y));
        assert_eq!(subst.bounds(y), (Some(fx.uint), Some(fx.any)));
    }

    #[test]
    fn test_occurs_check() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        let err = u.unify(&Ty::Var(x), &Ty::op(fx.set, vec![Ty::Var(x)]));
        assert!(matches!(err, Err(TypeError::RecursiveType { .. })));
    }

    #[test]
    fn test_bounded_variable_rejects_compound() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        u.unify(&Ty::basic(fx.int), &Ty::Var(x)).unwrap();
        assert!(matches!(
            u.unify(&Ty::op(fx.set, vec![Ty::basic(fx.int)]), &Ty::Var(x)),
            Err(TypeError::SubtypeMismatch { .. })
        ));
    }

    #[test]
    fn test_function_variance() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        let mut u = Unifier::new(&fx.cat, &mut subst);

        // Int ** UInt <= x ** x gives UInt <= x <= Int
        let f = Ty::arrow(Ty::basic(fx.int), Ty::basic(fx.uint));
        u.unify(&f, &Ty::arrow(Ty::Var(x), Ty::Var(x))).unwrap();
        assert_eq!(subst.bounds(x), (Some(fx.uint), Some(fx.int)));
    }
}
