//! Declarations and inference state.
//!
//! - **Catalogue**: the append-only operator registry
//! - **Subst**: the variable arena with bindings, bounds and constraints
//! - **Scheme**: polymorphic signatures built from fresh variables
//! - **TypeAlias**: named instance templates

pub mod alias;
pub mod registry;
pub mod scheme;
pub mod subst;

pub use alias::TypeAlias;
pub use registry::{Catalogue, Operator};
pub use scheme::{ConstraintDecl, Scheme, Signature};
pub use subst::{Constraint, Slot, Subst};
