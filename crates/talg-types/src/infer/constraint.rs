//! Constraint propagation.
//!
//! After every narrowing step each constraint recomputes its viable
//! alternatives from the previous viable set: an alternative stays viable
//! while the owner can still match it, and alternatives subsumed by another
//! viable alternative are dropped. An empty set is a violation. A single
//! remaining alternative is applied to the owner once, by shape only: its
//! compound operators are bound, its basic leaves never are.

use crate::error::{Result, TypeError};
use crate::infer::Unifier;
use crate::types::{OpId, Ty, Variance};
use talg_log::debug;

impl Unifier<'_> {
    /// Prune every constraint until nothing changes.
    ///
    /// # Errors
    ///
    /// [`TypeError::ConstraintViolation`] when a constraint runs out of
    /// alternatives, or any unification error raised while settling one.
    pub fn propagate(&mut self) -> Result<()> {
        loop {
            let mut settled_any = false;

            for index in 0..self.subst.constraints().len() {
                let constraint = self.subst.constraints()[index].clone();

                let compatible: Vec<usize> = constraint
                    .viable
                    .iter()
                    .copied()
                    .filter(|&i| {
                        let alt = &constraint.alternatives[i];
                        self.compatible(&constraint.owner, alt, Variance::Covariant)
                    })
                    .collect();
                let viable = self.minimise(&constraint.alternatives, compatible);

                if viable.is_empty() {
                    return Err(TypeError::ConstraintViolation {
                        owner: self.subst.apply_ty(&constraint.owner),
                        alternatives: constraint
                            .alternatives
                            .iter()
                            .map(|alt| self.subst.apply_ty(alt))
                            .collect(),
                    });
                }

                if viable.len() < constraint.viable.len() {
                    debug!(
                        "constraint on {} narrowed to {} of {} alternatives",
                        self.cat.display(&self.subst.apply_ty(&constraint.owner)),
                        viable.len(),
                        constraint.alternatives.len()
                    );
                }

                let settle = viable.len() == 1 && !constraint.settled;
                let chosen = viable[0];
                if let Some(slot) = self.subst.constraint_mut(index) {
                    slot.viable = viable;
                    slot.settled |= settle;
                }

                if settle {
                    let alt = &constraint.alternatives[chosen];
                    debug!(
                        "constraint on {} settled on {}",
                        self.cat.display(&self.subst.apply_ty(&constraint.owner)),
                        self.cat.display(&self.subst.apply_ty(alt))
                    );
                    self.settle(&constraint.owner, alt, Variance::Covariant)?;
                    settled_any = true;
                }
            }

            if !settled_any {
                return Ok(());
            }
        }
    }

    /// Whether `owner` can still match `alt` at a position of the given
    /// variance, judging variables by their bounds.
    fn compatible(&self, owner: &Ty, alt: &Ty, variance: Variance) -> bool {
        let a = self.subst.find(owner);
        let b = self.subst.find(alt);
        let top = |op: OpId| op == OpId::TOP && self.cat.has_top();
        let comparable =
            |x: OpId, y: OpId| self.cat.is_subtype_op(x, y) || self.cat.is_subtype_op(y, x);

        match (&a, &b) {
            (Ty::Wild, _) | (_, Ty::Wild) | (_, Ty::Var(_)) => true,

            (Ty::Var(v), Ty::Op { op, params }) => {
                let (lower, upper) = self.subst.bounds(*v);
                if !params.is_empty() {
                    return lower.is_none() && upper.is_none_or(top);
                }
                match variance {
                    Variance::Covariant => {
                        lower.is_none_or(|l| self.cat.is_subtype_op(l, *op))
                            && upper.is_none_or(|u| comparable(u, *op))
                    }
                    Variance::Contravariant => {
                        upper.is_none_or(|u| self.cat.is_subtype_op(*op, u))
                            && lower.is_none_or(|l| comparable(l, *op))
                    }
                }
            }

            (Ty::Op { op: p, params: ps }, Ty::Op { op: q, params: qs }) => {
                let (sub, sup) = match variance {
                    Variance::Covariant => (*p, *q),
                    Variance::Contravariant => (*q, *p),
                };
                if top(sup) {
                    return true;
                }
                if ps.is_empty() && qs.is_empty() {
                    return self.cat.is_subtype_op(sub, sup);
                }
                p == q
                    && ps.len() == qs.len()
                    && ps.iter().zip(qs).enumerate().all(|(i, (x, y))| {
                        self.compatible(x, y, variance.compose(self.cat.variance(*p, i)))
                    })
            }
        }
    }

    /// Drops alternatives that are definitely subtypes of another viable
    /// alternative. Of equal alternatives the first is kept.
    fn minimise(&self, alternatives: &[Ty], viable: Vec<usize>) -> Vec<usize> {
        let resolved: Vec<Ty> = viable
            .iter()
            .map(|&i| self.subst.apply_ty(&alternatives[i]))
            .collect();
        let le = |i: usize, j: usize| self.cat.subtype(&resolved[i], &resolved[j]) == Some(true);

        (0..viable.len())
            .filter(|&i| {
                !(0..viable.len()).any(|j| j != i && le(i, j) && (!le(j, i) || j < i))
            })
            .map(|i| viable[i])
            .collect()
    }

    /// Applies the last remaining alternative to its owner.
    fn settle(&mut self, owner: &Ty, alt: &Ty, variance: Variance) -> Result<()> {
        let a = self.subst.find(owner);
        let b = self.subst.find(alt);

        match (&a, &b) {
            (Ty::Wild, _) | (_, Ty::Wild) => Ok(()),
            (_, Ty::Op { params, .. }) if params.is_empty() => Ok(()),

            (Ty::Var(v), Ty::Op { .. }) => {
                self.bind_shape(*v, &b)?;
                self.settle(&a, &b, variance)
            }

            (Ty::Op { op: p, params: ps }, Ty::Op { op: q, params: qs }) => {
                if p != q || ps.len() != qs.len() {
                    return Ok(());
                }
                for (i, (x, y)) in ps.iter().zip(qs).enumerate() {
                    self.settle(x, y, variance.compose(self.cat.variance(*p, i)))?;
                }
                Ok(())
            }

            (_, Ty::Var(_)) => match variance {
                Variance::Covariant => self.unify(&a, &b),
                Variance::Contravariant => self.unify(&b, &a),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Catalogue, Constraint, Subst};

    struct Fixture {
        cat: Catalogue,
        any: OpId,
        ord: OpId,
        int: OpId,
        bool: OpId,
        set: OpId,
    }

    fn fixture() -> Fixture {
        let mut cat = Catalogue::new();
        let any = cat.declare("Any", 0, None).unwrap();
        let ord = cat.declare("Ord", 0, Some(any)).unwrap();
        let int = cat.declare("Int", 0, Some(ord)).unwrap();
        let bool = cat.declare("Bool", 0, Some(ord)).unwrap();
        let set = cat.declare("Set", 1, None).unwrap();
        Fixture {
            cat,
            any,
            ord,
            int,
            bool,
            set,
        }
    }

    #[test]
    fn test_comparable_alternatives_collapse_to_dominant() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        subst.add_constraint(Constraint::new(
            Ty::Var(x),
            vec![Ty::basic(fx.ord), Ty::basic(fx.bool)],
        ));

        Unifier::new(&fx.cat, &mut subst).propagate().unwrap();
        let remaining: Vec<_> = subst.constraints()[0].remaining().cloned().collect();
        assert_eq!(remaining, vec![Ty::basic(fx.ord)]);
        assert_eq!(subst.binding(x), None);
    }

    #[test]
    fn test_equal_alternatives_keep_first() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        subst.add_constraint(Constraint::new(
            Ty::Var(x),
            vec![Ty::op(fx.set, vec![Ty::Wild]), Ty::op(fx.set, vec![Ty::basic(fx.int)])],
        ));

        Unifier::new(&fx.cat, &mut subst).propagate().unwrap();
        assert_eq!(subst.constraints()[0].viable, vec![0]);
    }

    #[test]
    fn test_lower_bound_prunes() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        subst.add_constraint(Constraint::new(
            Ty::Var(x),
            vec![Ty::basic(fx.int), Ty::op(fx.set, vec![Ty::basic(fx.int)])],
        ));

        let mut u = Unifier::new(&fx.cat, &mut subst);
        u.unify(&Ty::basic(fx.bool), &Ty::Var(x)).unwrap();
        assert!(matches!(u.propagate(), Err(TypeError::ConstraintViolation { .. })));
    }

    #[test]
    fn test_single_compound_alternative_fixes_shape() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        subst.add_constraint(Constraint::new(
            Ty::Var(x),
            vec![Ty::op(fx.set, vec![Ty::basic(fx.int)])],
        ));

        Unifier::new(&fx.cat, &mut subst).propagate().unwrap();
        let bound = subst.apply_ty(&Ty::Var(x));
        assert_eq!(bound.operator(), Some(fx.set));
        assert!(matches!(bound.params()[0], Ty::Var(_)));
        assert!(subst.constraints()[0].settled);
    }

    #[test]
    fn test_single_basic_alternative_never_binds() {
        let fx = fixture();
        let mut subst = Subst::new();
        let x = subst.fresh_var();
        subst.add_constraint(Constraint::new(Ty::Var(x), vec![Ty::basic(fx.any)]));

        let mut u = Unifier::new(&fx.cat, &mut subst);
        u.propagate().unwrap();
        u.unify(&Ty::basic(fx.int), &Ty::Var(x)).unwrap();
        u.propagate().unwrap();
        assert_eq!(subst.bounds(x), (Some(fx.int), None));
    }
}
