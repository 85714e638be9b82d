//! Inference context.
//!
//! A [`Context`] owns one variable arena and borrows the catalogue it types
//! against. Every public operation is all-or-nothing: on error the arena is
//! restored to its state before the call. Variables handed in from outside
//! must have been allocated by the same context.

use crate::context::{Catalogue, Constraint, Scheme, Subst};
use crate::error::{Result, TypeError};
use crate::infer::Unifier;
use crate::types::{OpId, Ty, TyVar, Variance};
use talg_log::debug;

/// Main inference context.
pub struct Context<'cat> {
    /// The operator catalogue
    catalogue: &'cat Catalogue,

    /// Variable arena
    subst: Subst,
}

impl<'cat> Context<'cat> {
    /// Create a new inference context.
    pub fn new(catalogue: &'cat Catalogue) -> Self {
        Self {
            catalogue,
            subst: Subst::new(),
        }
    }

    /// The catalogue this context types against.
    pub fn catalogue(&self) -> &'cat Catalogue {
        self.catalogue
    }

    /// Read access to the variable arena.
    pub fn subst(&self) -> &Subst {
        &self.subst
    }

    /// Create a fresh type variable.
    pub fn fresh_var(&mut self) -> Ty {
        Ty::Var(self.subst.fresh_var())
    }

    /// Rejects variables this context did not allocate.
    fn check_issued<'t>(&self, tys: impl IntoIterator<Item = &'t Ty>) -> Result<()> {
        for ty in tys {
            if let Some(var) = ty.variables().into_iter().find(|&v| !self.subst.contains(v)) {
                return Err(TypeError::UnknownVariable { var });
            }
        }
        Ok(())
    }

    /// Runs `f` and propagates constraints, rolling back on error.
    fn transaction<T>(&mut self, f: impl FnOnce(&mut Unifier<'_>) -> Result<T>) -> Result<T> {
        let snapshot = self.subst.clone();
        let result = {
            let mut unifier = Unifier::new(self.catalogue, &mut self.subst);
            f(&mut unifier).and_then(|value| unifier.propagate().map(|()| value))
        };
        if result.is_err() {
            self.subst = snapshot;
        }
        result
    }

    /// Instantiate a scheme with fresh variables.
    ///
    /// # Errors
    ///
    /// [`TypeError::ConstrainFreeVariable`] if a constraint mentions a
    /// variable that does not occur in the generated instance, checked before
    /// any propagation; [`TypeError::ConstraintViolation`] if a constraint is
    /// unsatisfiable from the start.
    pub fn instantiate(&mut self, scheme: &Scheme) -> Result<Ty> {
        let snapshot = self.subst.clone();
        let vars: Vec<Ty> = (0..scheme.arity()).map(|_| self.fresh_var()).collect();
        let signature = scheme.generate(&vars);

        let signature_vars = signature.ty.variables();
        for clause in &signature.constraints {
            let mentioned = clause
                .owner
                .variables()
                .into_iter()
                .chain(clause.alternatives.iter().flat_map(Ty::variables));
            for var in mentioned {
                if !signature_vars.contains(&var) {
                    self.subst = snapshot;
                    return Err(TypeError::ConstrainFreeVariable { var });
                }
            }
        }
        if let Err(err) = self.check_issued([&signature.ty]) {
            self.subst = snapshot;
            return Err(err);
        }

        let result = self.transaction(|u| {
            for clause in signature.constraints {
                u.subst
                    .add_constraint(Constraint::new(clause.owner, clause.alternatives));
            }
            Ok(())
        });
        if let Err(err) = result {
            self.subst = snapshot;
            return Err(err);
        }

        Ok(signature.ty)
    }

    /// Apply an argument to a function instance.
    ///
    /// The argument must be a subtype of the domain. Returns the codomain
    /// with current bindings substituted.
    ///
    /// # Errors
    ///
    /// [`TypeError::FunctionApplication`] if `function` is not (bound to) a
    /// function, [`TypeError::UnknownVariable`] for a variable this context
    /// did not allocate, otherwise any unification or constraint error.
    pub fn apply(&mut self, function: &Ty, argument: &Ty) -> Result<Ty> {
        self.check_issued([function, argument])?;
        let found = self.subst.find(function);
        let (Some(domain), Some(codomain)) = (found.domain().cloned(), found.codomain().cloned())
        else {
            return Err(TypeError::FunctionApplication {
                function: self.subst.apply_ty(function),
                argument: self.subst.apply_ty(argument),
            });
        };

        debug!(
            "apply {} to {}",
            self.catalogue.display(&self.subst.apply_ty(&found)),
            self.catalogue.display(&self.subst.apply_ty(argument))
        );

        self.transaction(|u| u.unify(argument, &domain))?;
        Ok(self.subst.apply_ty(&codomain))
    }

    /// Make `sub <= sup` hold.
    ///
    /// # Errors
    ///
    /// Any unification or constraint error; the context is left unchanged.
    pub fn unify(&mut self, sub: &Ty, sup: &Ty) -> Result<()> {
        self.check_issued([sub, sup])?;
        self.transaction(|u| u.unify(sub, sup))
    }

    /// Make `a` and `b` equal: each is a subtype of the other.
    ///
    /// # Errors
    ///
    /// Any unification or constraint error; the context is left unchanged.
    pub fn equate(&mut self, a: &Ty, b: &Ty) -> Result<()> {
        self.check_issued([a, b])?;
        self.transaction(|u| {
            u.unify(a, b)?;
            u.unify(b, a)
        })
    }

    /// Constrain `owner` to match one of `alternatives`.
    ///
    /// # Errors
    ///
    /// [`TypeError::ConstraintViolation`] if no alternative fits.
    pub fn constrain(&mut self, owner: Ty, alternatives: Vec<Ty>) -> Result<()> {
        self.check_issued(std::iter::once(&owner).chain(&alternatives))?;
        self.transaction(|u| {
            u.subst.add_constraint(Constraint::new(owner, alternatives));
            Ok(())
        })
    }

    /// Three-valued subtype query under current bindings. Binds nothing.
    pub fn subtype(&self, sub: &Ty, sup: &Ty) -> Option<bool> {
        self.catalogue
            .subtype(&self.subst.apply_ty(sub), &self.subst.apply_ty(sup))
    }

    /// Substitute current bindings, leaving unbound variables in place.
    pub fn apply_ty(&self, ty: &Ty) -> Ty {
        self.subst.apply_ty(ty)
    }

    /// Structural match of an instance, under current bindings, against a
    /// pattern.
    pub fn matches(&self, ty: &Ty, pattern: &Ty) -> bool {
        self.subst.apply_ty(ty).matches(pattern)
    }

    /// Current `(lower, upper)` bounds of a variable.
    pub fn bounds(&self, var: TyVar) -> (Option<OpId>, Option<OpId>) {
        let root = match self.subst.find(&Ty::Var(var)) {
            Ty::Var(root) => root,
            _ => return (None, None),
        };
        self.subst.bounds(root)
    }

    /// Alternatives still viable for the first constraint whose owner is,
    /// or has been merged with, `var`.
    pub fn alternatives(&self, var: TyVar) -> Option<Vec<Ty>> {
        let root = self.subst.find(&Ty::Var(var));
        let merged = |owner: &Ty| match (self.subst.find(owner), &root) {
            (Ty::Var(a), Ty::Var(b)) => a == *b,
            _ => false,
        };
        self.subst
            .constraints()
            .iter()
            .find(|c| c.owner == Ty::Var(var) || merged(&c.owner))
            .map(|c| c.remaining().map(|alt| self.subst.apply_ty(alt)).collect())
    }

    /// Read off the most informative instance for `ty`.
    ///
    /// Bound variables are substituted. An unbound variable becomes its lower
    /// bound in covariant position and its upper bound in contravariant
    /// position, falling back to the other bound; unbounded variables stay.
    ///
    /// # Errors
    ///
    /// Fails if a constraint has become unsatisfiable.
    pub fn resolve(&mut self, ty: &Ty) -> Result<Ty> {
        self.transaction(|_| Ok(()))?;
        Ok(self.read_off(ty, Variance::Covariant))
    }

    fn read_off(&self, ty: &Ty, variance: Variance) -> Ty {
        match self.subst.find(ty) {
            Ty::Var(v) => {
                let (lower, upper) = self.subst.bounds(v);
                let bound = match variance {
                    Variance::Covariant => lower.or(upper),
                    Variance::Contravariant => upper.or(lower),
                };
                bound.map_or(Ty::Var(v), Ty::basic)
            }
            Ty::Wild => Ty::Wild,
            Ty::Op { op, params } => Ty::Op {
                op,
                params: params
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let inner = self.catalogue.variance(op, i);
                        self.read_off(p, variance.compose(inner))
                    })
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_non_function() {
        let mut cat = Catalogue::new();
        let int = Ty::basic(cat.declare("Int", 0, None).unwrap());
        let mut ctx = Context::new(&cat);

        assert!(matches!(
            ctx.apply(&int, &int),
            Err(TypeError::FunctionApplication { .. })
        ));

        let x = ctx.fresh_var();
        assert!(matches!(
            ctx.apply(&x, &int),
            Err(TypeError::FunctionApplication { .. })
        ));
    }

    #[test]
    fn test_failed_apply_rolls_back() {
        let mut cat = Catalogue::new();
        let int = cat.declare("Int", 0, None).unwrap();
        let str = cat.declare("Str", 0, None).unwrap();
        let mut ctx = Context::new(&cat);

        // x ** x ** x
        let x = ctx.fresh_var();
        let f = Ty::curried([x.clone(), x.clone()], x.clone());
        let g = ctx.apply(&f, &Ty::basic(int)).unwrap();

        let before = ctx.subst().clone();
        assert!(ctx.apply(&g, &Ty::basic(str)).is_err());
        let Ty::Var(v) = x else { unreachable!() };
        assert_eq!(ctx.bounds(v), before.bounds(v));
        assert_eq!(ctx.subst().len(), before.len());
    }

    #[test]
    fn test_resolve_prefers_position_bound() {
        let mut cat = Catalogue::new();
        let int = cat.declare("Int", 0, None).unwrap();
        let uint = cat.declare("UInt", 0, Some(int)).unwrap();
        let mut ctx = Context::new(&cat);

        let x = ctx.fresh_var();
        ctx.unify(&Ty::basic(uint), &x).unwrap();
        ctx.unify(&x, &Ty::basic(int)).unwrap();

        let f = Ty::arrow(x.clone(), x.clone());
        assert_eq!(
            ctx.resolve(&f).unwrap(),
            Ty::arrow(Ty::basic(int), Ty::basic(uint))
        );
    }

    #[test]
    fn test_equate() {
        let mut cat = Catalogue::new();
        let int = cat.declare("Int", 0, None).unwrap();
        let mut ctx = Context::new(&cat);

        let x = ctx.fresh_var();
        ctx.equate(&x, &Ty::basic(int)).unwrap();
        assert_eq!(ctx.apply_ty(&x), Ty::basic(int));
    }

    #[test]
    fn test_subtype_follows_bindings() {
        let mut cat = Catalogue::new();
        let int = cat.declare("Int", 0, None).unwrap();
        let any = cat.declare("Any", 0, None).unwrap();
        let mut ctx = Context::new(&cat);

        let x = ctx.fresh_var();
        assert_eq!(ctx.subtype(&x, &Ty::basic(int)), None);
        ctx.equate(&x, &Ty::basic(int)).unwrap();
        assert_eq!(ctx.subtype(&x, &Ty::basic(int)), Some(true));
        assert_eq!(ctx.subtype(&x, &Ty::basic(any)), Some(false));
    }

    #[test]
    fn test_alternatives_follow_merged_variables() {
        let mut cat = Catalogue::new();
        let int = Ty::basic(cat.declare("Int", 0, None).unwrap());
        let str = Ty::basic(cat.declare("Str", 0, None).unwrap());
        let mut ctx = Context::new(&cat);

        let x = ctx.fresh_var();
        let y = ctx.fresh_var();
        ctx.constrain(x.clone(), vec![int.clone(), str.clone()]).unwrap();
        ctx.unify(&x, &y).unwrap();

        let (Ty::Var(vx), Ty::Var(vy)) = (x, y) else { unreachable!() };
        let expected = Some(vec![int, str]);
        assert_eq!(ctx.alternatives(vx), expected);
        assert_eq!(ctx.alternatives(vy), expected);
    }

    #[test]
    fn test_foreign_variables_rejected() {
        let mut cat = Catalogue::new();
        let int = Ty::basic(cat.declare("Int", 0, None).unwrap());
        let mut ctx = Context::new(&cat);
        let foreign = Ty::Var(TyVar(1_000_000_000));

        for result in [
            ctx.unify(&foreign, &int),
            ctx.equate(&int, &foreign),
            ctx.constrain(foreign.clone(), vec![int.clone()]),
            ctx.apply(&Ty::arrow(foreign.clone(), int.clone()), &int).map(drop),
        ] {
            assert!(matches!(result, Err(TypeError::UnknownVariable { .. })));
        }
        assert!(ctx.subst().is_empty());

        let leaky = Scheme::new(1, |v: &[Ty]| Ty::arrow(v[0].clone(), Ty::Var(TyVar(99))));
        assert!(matches!(
            ctx.instantiate(&leaky),
            Err(TypeError::UnknownVariable { var: TyVar(99) })
        ));
        assert!(ctx.subst().is_empty());
    }
}
