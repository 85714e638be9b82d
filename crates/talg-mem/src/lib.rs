//! Name storage for the `talg` crates.
//!
//! - [`Symbol`]: a 32-bit handle for an interned name
//! - [`StringInterner`]: bidirectional name ↔ symbol table (requires the
//!   `string-interner` feature, enabled by default)
//!
//! Operator catalogues and the lexer both intern their identifiers so that
//! name comparison is an integer comparison.

pub mod symbol;

#[cfg(feature = "string-interner")]
pub mod interner;

pub use symbol::Symbol;

#[cfg(feature = "string-interner")]
pub use interner::StringInterner;
