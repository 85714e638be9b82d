//! Bidirectional string interning.
//!
//! Names are stored once; lookups by name go through a `hashbrown` map and
//! lookups by symbol are a vector index.
//!
//! ```
//! use talg_mem::StringInterner;
//!
//! let mut interner = StringInterner::new();
//! let int = interner.intern("Int");
//! assert_eq!(interner.intern("Int"), int);
//! assert_eq!(interner.resolve(int), Some("Int"));
//! assert_eq!(interner.get("Str"), None);
//! ```

use crate::symbol::Symbol;
use hashbrown::HashMap;

/// Interned name table.
///
/// Append-only: a symbol, once handed out, resolves to the same name for
/// the lifetime of the interner.
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    /// Symbol id → name
    strings: Vec<Box<str>>,

    /// Name → symbol
    symbols: HashMap<Box<str>, Symbol>,
}

impl StringInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an interner whose first symbols are `names`, in order.
    ///
    /// Duplicate names receive the symbol of their first occurrence.
    #[must_use]
    pub fn with_pre_interned(names: &[&str]) -> Self {
        let mut interner = Self::new();
        for name in names {
            interner.intern(name);
        }
        interner
    }

    /// Returns the symbol for `s`, allocating one if it is new.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct names are interned.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.symbols.get(s) {
            return sym;
        }

        let id = u32::try_from(self.strings.len()).expect("symbol space exhausted");
        let sym = Symbol::new(id);
        let boxed: Box<str> = s.into();
        self.strings.push(boxed.clone());
        self.symbols.insert(boxed, sym);
        sym
    }

    /// Looks up the symbol of an already interned name.
    #[must_use]
    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.symbols.get(s).copied()
    }

    /// Resolves a symbol back to its name.
    #[must_use]
    pub fn resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.as_usize()).map(AsRef::as_ref)
    }

    /// Number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Whether nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
