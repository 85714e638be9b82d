//! Type instances and their textual rendering.

pub mod display;
pub mod ty;

pub use display::DisplayTy;
pub use ty::{OpId, Ty, TyVar, Variance};
