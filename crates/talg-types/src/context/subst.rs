//! The variable arena.
//!
//! Every variable allocated by a [`Context`](crate::Context) owns one slot.
//! A slot either holds a binding (to another variable or to an operation) or
//! the operator bounds accumulated so far. Bindings form chains that end in
//! an unbound root or in an operation; [`Subst::find`] follows them.
//!
//! Constraints live next to the slots so that a snapshot of the arena also
//! captures which alternatives are still viable.

use crate::types::{OpId, Ty, TyVar};

/// State of one variable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// What the variable stands for, once known
    pub binding: Option<Ty>,
    /// Greatest known basic operator the variable must be above
    pub lower: Option<OpId>,
    /// Least known basic operator the variable must be below
    pub upper: Option<OpId>,
}

/// A constraint: the owner must match at least one alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// The constrained instance, usually a variable
    pub owner: Ty,
    /// Alternatives as declared; never modified
    pub alternatives: Vec<Ty>,
    /// Indices into `alternatives` that are still viable
    pub viable: Vec<usize>,
    /// Whether the last remaining alternative has been applied to the owner
    pub settled: bool,
}

impl Constraint {
    /// A constraint with every alternative viable.
    pub fn new(owner: Ty, alternatives: Vec<Ty>) -> Self {
        let viable = (0..alternatives.len()).collect();
        Self {
            owner,
            alternatives,
            viable,
            settled: false,
        }
    }

    /// The alternatives that are still viable.
    pub fn remaining(&self) -> impl Iterator<Item = &Ty> {
        self.viable.iter().filter_map(|&i| self.alternatives.get(i))
    }
}

/// Variable bindings, bounds and constraints.
#[derive(Debug, Clone, Default)]
pub struct Subst {
    slots: Vec<Slot>,
    constraints: Vec<Constraint>,
}

impl Subst {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of variables allocated.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no variable has been allocated.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate a fresh, unbound and unbounded variable.
    pub fn fresh_var(&mut self) -> TyVar {
        let var = TyVar(self.slots.len() as u32);
        self.slots.push(Slot::default());
        var
    }

    /// State of a variable. Unknown variables read as unbound.
    pub fn slot(&self, var: TyVar) -> Slot {
        self.slots.get(var.index()).cloned().unwrap_or_default()
    }

    /// Whether `var` was allocated by this arena.
    pub fn contains(&self, var: TyVar) -> bool {
        var.index() < self.slots.len()
    }

    /// Mutable state of a variable allocated by this arena.
    pub fn slot_mut(&mut self, var: TyVar) -> Option<&mut Slot> {
        self.slots.get_mut(var.index())
    }

    /// The binding of a variable, if any.
    pub fn binding(&self, var: TyVar) -> Option<&Ty> {
        self.slots.get(var.index())?.binding.as_ref()
    }

    /// Bounds of a variable as `(lower, upper)`.
    pub fn bounds(&self, var: TyVar) -> (Option<OpId>, Option<OpId>) {
        self.slots
            .get(var.index())
            .map_or((None, None), |slot| (slot.lower, slot.upper))
    }

    /// Bind a variable. Its bounds are no longer consulted. Variables from
    /// another arena are ignored.
    pub fn bind(&mut self, var: TyVar, ty: Ty) {
        if let Some(slot) = self.slot_mut(var) {
            slot.binding = Some(ty);
        }
    }

    /// Follows bindings at the outermost position only.
    ///
    /// The result is an unbound variable, a wildcard or an operation whose
    /// parameters may still mention bound variables.
    pub fn find(&self, ty: &Ty) -> Ty {
        let mut current = ty;
        while let Ty::Var(v) = current {
            match self.binding(*v) {
                Some(next) => current = next,
                None => break,
            }
        }
        current.clone()
    }

    /// Replaces every bound variable by its binding, recursively.
    pub fn apply_ty(&self, ty: &Ty) -> Ty {
        match self.find(ty) {
            Ty::Op { op, params } => Ty::Op {
                op,
                params: params.iter().map(|p| self.apply_ty(p)).collect(),
            },
            other => other,
        }
    }

    /// Unbound variables, in allocation order.
    pub fn unbound_vars(&self) -> Vec<TyVar> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.binding.is_none())
            .map(|(i, _)| TyVar(i as u32))
            .collect()
    }

    /// Registers a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// All constraints, in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Mutable access to one constraint.
    pub fn constraint_mut(&mut self, index: usize) -> Option<&mut Constraint> {
        self.constraints.get_mut(index)
    }
}
