//! Type instance representation.

use std::collections::BTreeSet;
use std::fmt;

/// Identifier of an operator declared in a [`Catalogue`](crate::Catalogue).
///
/// The first three ids are reserved for the builtin operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpId(pub u32);

impl OpId {
    /// `Function(domain, codomain)`, written `A ** B`
    pub const FUNCTION: OpId = OpId(0);

    /// `Product(left, right)`, written `A * B`
    pub const PRODUCT: OpId = OpId(1);

    /// The synthetic top of the lattice, only nameable when enabled
    pub const TOP: OpId = OpId(2);

    /// Index into the catalogue's operator table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a type variable, an index into the variable arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TyVar(pub u32);

impl TyVar {
    /// Index into the variable arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TyVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.0)
    }
}

/// How a parameter position relates the subtype order of its arguments to
/// the order of the enclosing instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variance {
    /// `a <= b` implies `F(a) <= F(b)`
    Covariant,
    /// `a <= b` implies `F(b) <= F(a)`
    Contravariant,
}

impl Variance {
    /// The variance seen through a contravariant position.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Variance::Covariant => Variance::Contravariant,
            Variance::Contravariant => Variance::Covariant,
        }
    }

    /// Composes a nested position with the enclosing one.
    #[must_use]
    pub const fn compose(self, inner: Variance) -> Self {
        match self {
            Variance::Covariant => inner,
            Variance::Contravariant => inner.flip(),
        }
    }
}

/// A type instance.
///
/// Instances are plain trees. Variables carry no state of their own; their
/// bindings, bounds and constraints live in the variable arena of the
/// [`Context`](crate::Context) that allocated them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ty {
    /// A type variable
    Var(TyVar),

    /// A wildcard: matches anything, carries no identity and never binds
    Wild,

    /// An operator applied to exactly `arity` parameters
    Op {
        /// The operator
        op: OpId,
        /// Parameters, in declaration order
        params: Vec<Ty>,
    },
}

impl Ty {
    /// An arity-0 operator as an instance.
    #[must_use]
    pub fn basic(op: OpId) -> Self {
        Ty::Op {
            op,
            params: Vec::new(),
        }
    }

    /// An operator applied to parameters, without an arity check.
    ///
    /// Use [`Catalogue::instance`](crate::Catalogue::instance) for a checked
    /// constructor.
    #[must_use]
    pub fn op(op: OpId, params: Vec<Ty>) -> Self {
        Ty::Op { op, params }
    }

    /// The function instance `domain ** codomain`.
    #[must_use]
    pub fn arrow(domain: Ty, codomain: Ty) -> Self {
        Ty::op(OpId::FUNCTION, vec![domain, codomain])
    }

    /// Curried function over several arguments: `a ** b ** … ** result`.
    #[must_use]
    pub fn curried(
        args: impl IntoIterator<Item = Ty, IntoIter: DoubleEndedIterator>,
        result: Ty,
    ) -> Self {
        args.into_iter()
            .rev()
            .fold(result, |acc, arg| Ty::arrow(arg, acc))
    }

    /// The product instance `left * right`.
    #[must_use]
    pub fn product(left: Ty, right: Ty) -> Self {
        Ty::op(OpId::PRODUCT, vec![left, right])
    }

    /// A variable as an instance.
    #[must_use]
    pub const fn var(v: TyVar) -> Self {
        Ty::Var(v)
    }

    /// The outermost operator, if this is an operation.
    #[must_use]
    pub fn operator(&self) -> Option<OpId> {
        match self {
            Ty::Op { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// The parameters of an operation; empty for variables and wildcards.
    #[must_use]
    pub fn params(&self) -> &[Ty] {
        match self {
            Ty::Op { params, .. } => params,
            _ => &[],
        }
    }

    /// Whether this is an operation without parameters.
    #[must_use]
    pub fn is_basic(&self) -> bool {
        matches!(self, Ty::Op { params, .. } if params.is_empty())
    }

    /// Whether this is a `Function` instance.
    ///
    /// Variables are not functions, even if they may later be bound to one.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.operator() == Some(OpId::FUNCTION)
    }

    /// Domain of a function instance.
    #[must_use]
    pub fn domain(&self) -> Option<&Ty> {
        if self.is_function() { self.params().first() } else { None }
    }

    /// Codomain of a function instance.
    #[must_use]
    pub fn codomain(&self) -> Option<&Ty> {
        if self.is_function() { self.params().get(1) } else { None }
    }

    /// Occurs check: does `var` appear anywhere in this instance?
    #[must_use]
    pub fn occurs(&self, var: TyVar) -> bool {
        match self {
            Ty::Var(v) => *v == var,
            Ty::Wild => false,
            Ty::Op { params, .. } => params.iter().any(|p| p.occurs(var)),
        }
    }

    /// Variables in order of first appearance, without duplicates.
    #[must_use]
    pub fn variables(&self) -> Vec<TyVar> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut Vec<TyVar>) {
        match self {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Wild => {}
            Ty::Op { params, .. } => {
                for p in params {
                    p.collect_variables(out);
                }
            }
        }
    }

    /// All operators mentioned, transitively.
    #[must_use]
    pub fn operators(&self) -> BTreeSet<OpId> {
        let mut out = BTreeSet::new();
        self.collect_operators(&mut out);
        out
    }

    fn collect_operators(&self, out: &mut BTreeSet<OpId>) {
        if let Ty::Op { op, params } = self {
            out.insert(*op);
            for p in params {
                p.collect_operators(out);
            }
        }
    }

    /// Whether the only unknowns are wildcards.
    ///
    /// A concrete instance denotes a pattern rather than a true unknown.
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            Ty::Var(_) => false,
            Ty::Wild => true,
            Ty::Op { params, .. } => params.iter().all(Ty::is_concrete),
        }
    }

    /// Whether this instance has neither variables nor wildcards.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match self {
            Ty::Var(_) | Ty::Wild => false,
            Ty::Op { params, .. } => params.iter().all(Ty::is_closed),
        }
    }

    /// Structural match against a pattern.
    ///
    /// A wildcard in the pattern matches anything; everything else must be
    /// equal. No subtyping is involved.
    #[must_use]
    pub fn matches(&self, pattern: &Ty) -> bool {
        match (self, pattern) {
            (_, Ty::Wild) => true,
            (Ty::Var(a), Ty::Var(b)) => a == b,
            (Ty::Op { op: a, params: ps }, Ty::Op { op: b, params: qs }) => {
                a == b && ps.len() == qs.len() && ps.iter().zip(qs).all(|(p, q)| p.matches(q))
            }
            _ => false,
        }
    }

    /// Replaces every variable by the result of `f`.
    #[must_use]
    pub fn map_vars(&self, f: &mut impl FnMut(TyVar) -> Ty) -> Ty {
        match self {
            Ty::Var(v) => f(*v),
            Ty::Wild => Ty::Wild,
            Ty::Op { op, params } => Ty::Op {
                op: *op,
                params: params.iter().map(|p| p.map_vars(f)).collect(),
            },
        }
    }
}
