//! Interned name handles.
//!
//! ```
//! use talg_mem::Symbol;
//!
//! let a = Symbol::new(7);
//! assert_eq!(a, Symbol::from(7));
//! assert_eq!(a.as_usize(), 7);
//! ```

use std::fmt;

/// A handle to a name stored in a [`StringInterner`](crate::StringInterner).
///
/// Two symbols from the same interner are equal iff their names are equal.
/// Symbols from different interners must not be mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// Creates a symbol from a raw id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// The raw id as an index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for Symbol {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_symbol_roundtrip() {
        let sym = Symbol::new(42);
        assert_eq!(sym.as_u32(), 42);
        assert_eq!(sym.as_usize(), 42);
        assert_eq!(Symbol::from(42), sym);
    }

    #[test]
    fn test_symbol_ordering() {
        assert!(Symbol::new(1) < Symbol::new(2));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new(3).to_string(), "#3");
    }

    #[test]
    fn test_symbol_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Symbol::new(1), "Int");
        map.insert(Symbol::new(1), "UInt");
        map.insert(Symbol::new(2), "Str");

        assert_eq!(map.len(), 2);
        assert_eq!(map[&Symbol::new(1)], "UInt");
    }
}
