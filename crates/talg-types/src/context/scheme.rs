//! Polymorphic type schemes.
//!
//! A scheme is a pure function from a supply of fresh variables to a
//! [`Signature`]. It stores no variables itself, so every instantiation is
//! independent of every other.
//!
//! ```
//! use talg_types::{Catalogue, Context, Scheme, Signature, Ty};
//!
//! let mut cat = Catalogue::new();
//! let int = cat.declare("Int", 0, None).unwrap();
//! let set = cat.declare("Set", 1, None).unwrap();
//!
//! // x ** x, where x is Int or a Set of Int
//! let sum = Scheme::new(1, move |v| {
//!     Signature::new(Ty::arrow(v[0].clone(), v[0].clone()))
//!         .constrain(v[0].clone(), [Ty::basic(int), Ty::op(set, vec![Ty::basic(int)])])
//! });
//!
//! let mut ctx = Context::new(&cat);
//! let a = ctx.instantiate(&sum).unwrap();
//! let b = ctx.instantiate(&sum).unwrap();
//! assert_ne!(a, b);
//! ```

use crate::types::Ty;
use std::fmt;
use std::sync::Arc;

/// A constraint clause produced by a scheme's generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintDecl {
    /// The constrained instance
    pub owner: Ty,
    /// Alternatives, at least one of which the owner must match
    pub alternatives: Vec<Ty>,
}

/// An instance together with the constraints over its variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The instance
    pub ty: Ty,
    /// Constraints over variables of `ty`
    pub constraints: Vec<ConstraintDecl>,
}

impl Signature {
    /// An unconstrained signature.
    pub fn new(ty: Ty) -> Self {
        Self {
            ty,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint clause.
    #[must_use]
    pub fn constrain(mut self, owner: Ty, alternatives: impl IntoIterator<Item = Ty>) -> Self {
        self.constraints.push(ConstraintDecl {
            owner,
            alternatives: alternatives.into_iter().collect(),
        });
        self
    }
}

impl From<Ty> for Signature {
    fn from(ty: Ty) -> Self {
        Signature::new(ty)
    }
}

type Generator = Arc<dyn Fn(&[Ty]) -> Signature + Send + Sync>;

/// A type scheme: `forall v0 … vn. signature`.
#[derive(Clone)]
pub struct Scheme {
    arity: usize,
    generator: Generator,
}

impl Scheme {
    /// A scheme with `arity` quantified variables.
    ///
    /// The generator receives exactly `arity` fresh variables per
    /// instantiation.
    pub fn new<S, F>(arity: usize, generator: F) -> Self
    where
        S: Into<Signature>,
        F: Fn(&[Ty]) -> S + Send + Sync + 'static,
    {
        Self {
            arity,
            generator: Arc::new(move |vars: &[Ty]| -> Signature { generator(vars).into() }),
        }
    }

    /// A monomorphic scheme.
    pub fn mono(ty: Ty) -> Self {
        Self::new(0, move |_| ty.clone())
    }

    /// Number of quantified variables.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Whether nothing is quantified.
    pub fn is_mono(&self) -> bool {
        self.arity == 0
    }

    /// Runs the generator over the given variables.
    pub fn generate(&self, vars: &[Ty]) -> Signature {
        (self.generator)(vars)
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheme").field("arity", &self.arity).finish_non_exhaustive()
    }
}

impl From<Ty> for Scheme {
    fn from(ty: Ty) -> Self {
        Scheme::mono(ty)
    }
}
