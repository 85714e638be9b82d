//! `talg` type engine: subtyping-aware inference for typed expressions.
//!
//! This crate provides:
//! - An append-only catalogue of type operators with single supertypes
//! - Type instances and a three-valued subtype relation
//! - Unification with lower and upper bounds on variables
//! - Constraints over structural alternatives
//! - Polymorphic schemas and type aliases
//! - The canonical lattice of a seed set of instances
//!
//! # Example
//!
//! ```
//! use talg_types::{Catalogue, Context, Ty};
//!
//! let mut cat = Catalogue::new();
//! let any = cat.declare("Any", 0, None).unwrap();
//! let int = cat.declare("Int", 0, Some(any)).unwrap();
//! let str = cat.declare("Str", 0, None).unwrap();
//!
//! let f = Ty::arrow(Ty::basic(any), Ty::basic(str));
//!
//! let mut ctx = Context::new(&cat);
//! let out = ctx.apply(&f, &Ty::basic(int)).unwrap();
//! assert_eq!(out, Ty::basic(str));
//! assert!(ctx.apply(&f, &Ty::basic(str)).is_err());
//! ```

#![warn(missing_docs)]

pub mod canon;
pub mod context;
pub mod error;
pub mod infer;
pub mod types;

pub use canon::Canon;
pub use context::{Catalogue, ConstraintDecl, Operator, Scheme, Signature, TypeAlias};
pub use error::{DeclError, Result, TypeError};
pub use infer::Context;
pub use types::{DisplayTy, OpId, Ty, TyVar, Variance};
