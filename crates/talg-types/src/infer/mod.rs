//! Type inference engine.
//!
//! This module implements unification with subtyping, constraint propagation
//! and the inference context that ties them together.

pub mod constraint;
pub mod context;
pub mod subtype;
pub mod unify;

pub use context::Context;
pub use unify::Unifier;
