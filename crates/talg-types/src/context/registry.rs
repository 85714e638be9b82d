//! The operator catalogue.
//!
//! Every configuration owns one append-only [`Catalogue`]. It is built once,
//! then shared read-only by every [`Context`](crate::Context) and
//! [`Canon`](crate::Canon) derived from it.

use crate::error::DeclError;
use crate::types::{DisplayTy, OpId, Ty, Variance};
use fxhash::FxHashMap;
use talg_mem::{StringInterner, Symbol};

/// Names of the builtin operators, in [`OpId`] order.
const BUILTINS: [&str; 3] = ["Function", "Product", "Top"];

/// A declared type operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// Interned name
    pub name: Symbol,
    /// Number of parameters
    pub arity: usize,
    /// Direct supertype, of the same arity
    pub supertype: Option<OpId>,
    /// Variance of each parameter position
    pub variance: Vec<Variance>,
}

/// Registry of type operators.
///
/// # Example
///
/// ```
/// use talg_types::{Catalogue, Ty};
///
/// let mut cat = Catalogue::new();
/// let ord = cat.declare("Ord", 0, None).unwrap();
/// let int = cat.declare("Int", 0, Some(ord)).unwrap();
/// let set = cat.declare("Set", 1, None).unwrap();
///
/// assert!(cat.is_subtype_op(int, ord));
/// assert!(cat.instance(set, vec![]).is_err());
/// assert_eq!(cat.lookup("Int"), Some(int));
/// ```
#[derive(Debug, Clone)]
pub struct Catalogue {
    names: StringInterner,
    operators: Vec<Operator>,
    by_name: FxHashMap<Symbol, OpId>,
    top: bool,
}

impl Catalogue {
    /// Creates a catalogue with the builtin operators and no `Top`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(false)
    }

    /// Creates a catalogue in which `Top` is enabled.
    #[must_use]
    pub fn with_top() -> Self {
        Self::with_config(true)
    }

    fn with_config(top: bool) -> Self {
        let names = StringInterner::with_pre_interned(&BUILTINS);
        let mut operators = Vec::with_capacity(BUILTINS.len());
        let mut by_name = FxHashMap::default();

        for (i, name) in BUILTINS.iter().enumerate() {
            let id = OpId(i as u32);
            let (arity, variance) = match id {
                OpId::FUNCTION => (2, vec![Variance::Contravariant, Variance::Covariant]),
                OpId::PRODUCT => (2, vec![Variance::Covariant; 2]),
                _ => (0, Vec::new()),
            };
            let symbol = Symbol::new(i as u32);
            operators.push(Operator {
                name: symbol,
                arity,
                supertype: None,
                variance,
            });
            debug_assert_eq!(names.get(name), Some(symbol));
            by_name.insert(symbol, id);
        }

        Self {
            names,
            operators,
            by_name,
            top,
        }
    }

    /// Whether the synthetic `Top` is part of this configuration.
    #[must_use]
    pub fn has_top(&self) -> bool {
        self.top
    }

    /// Enables or disables `Top`. Only meaningful before any context or
    /// canon is derived from this catalogue.
    pub fn set_top(&mut self, enabled: bool) {
        self.top = enabled;
    }

    /// Declares a new operator with covariant parameters.
    ///
    /// # Errors
    ///
    /// Fails if the name is taken, if the supertype was not issued by this
    /// catalogue, or if it has another arity.
    pub fn declare(
        &mut self,
        name: &str,
        arity: usize,
        supertype: Option<OpId>,
    ) -> Result<OpId, DeclError> {
        if self.names.get(name).is_some() {
            return Err(DeclError::DuplicateOperator {
                name: name.to_string(),
            });
        }

        if let Some(sup) = supertype {
            // Only issued ids, so the supertype graph stays acyclic.
            if self.operator(sup).is_none() {
                return Err(DeclError::UnknownOperator {
                    name: name.to_string(),
                    supertype: sup,
                });
            }
            let supertype_arity = self.arity(sup);
            if supertype_arity != arity {
                return Err(DeclError::SupertypeArity {
                    name: name.to_string(),
                    arity,
                    supertype_arity,
                });
            }
        }

        let symbol = self.names.intern(name);
        let id = OpId(self.operators.len() as u32);
        self.operators.push(Operator {
            name: symbol,
            arity,
            supertype,
            variance: vec![Variance::Covariant; arity],
        });
        self.by_name.insert(symbol, id);

        talg_log::trace!("declared {name}/{arity} as {id}");
        Ok(id)
    }

    /// Finds an operator by name. `Top` is only found when enabled.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<OpId> {
        let id = *self.by_name.get(&self.names.get(name)?)?;
        if id == OpId::TOP && !self.top {
            return None;
        }
        Some(id)
    }

    /// Declaration of an operator, if `id` was issued by this catalogue.
    #[must_use]
    pub fn operator(&self, id: OpId) -> Option<&Operator> {
        self.operators.get(id.index())
    }

    /// Name of an operator, or `"?"` for foreign ids.
    #[must_use]
    pub fn name(&self, id: OpId) -> &str {
        self.operators
            .get(id.index())
            .and_then(|op| self.names.resolve(op.name))
            .unwrap_or("?")
    }

    /// Arity of an operator; foreign ids count as basic.
    #[must_use]
    pub fn arity(&self, id: OpId) -> usize {
        self.operators.get(id.index()).map_or(0, |op| op.arity)
    }

    /// Variance of parameter `index` of `id`.
    #[must_use]
    pub fn variance(&self, id: OpId, index: usize) -> Variance {
        self.operators
            .get(id.index())
            .and_then(|op| op.variance.get(index).copied())
            .unwrap_or(Variance::Covariant)
    }

    /// Number of operators, builtins included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether only the builtins exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operators.len() == BUILTINS.len()
    }

    /// User-declared operators, in declaration order.
    pub fn declared(&self) -> impl Iterator<Item = OpId> + '_ {
        (BUILTINS.len()..self.operators.len()).map(|i| OpId(i as u32))
    }

    /// User-declared operators of arity 0.
    pub fn basic_operators(&self) -> impl Iterator<Item = OpId> + '_ {
        self.declared().filter(|&id| self.arity(id) == 0)
    }

    /// Operator-level subtyping: `sub` reaches `sup` by its supertype chain,
    /// or `sup` is the enabled `Top`.
    #[must_use]
    pub fn is_subtype_op(&self, sub: OpId, sup: OpId) -> bool {
        if sub == sup || (sup == OpId::TOP && self.top) {
            return true;
        }

        let mut current = sub;
        while let Some(next) = self.operators.get(current.index()).and_then(|op| op.supertype) {
            if next == sup {
                return true;
            }
            current = next;
        }
        false
    }

    /// Chain of supertypes of `id`, nearest first. Ends in `Top` when it is
    /// enabled and `id` is basic.
    #[must_use]
    pub fn supertypes(&self, id: OpId) -> Vec<OpId> {
        let mut chain = Vec::new();
        let mut current = id;
        while let Some(next) = self.operators.get(current.index()).and_then(|op| op.supertype) {
            chain.push(next);
            current = next;
        }
        if self.top && id != OpId::TOP && self.arity(id) == 0 && !chain.contains(&OpId::TOP) {
            chain.push(OpId::TOP);
        }
        chain
    }

    /// Builds `op(params…)`, checking the arity.
    ///
    /// # Errors
    ///
    /// Fails with [`DeclError::WrongParamCount`] on an arity mismatch.
    pub fn instance(&self, op: OpId, params: Vec<Ty>) -> Result<Ty, DeclError> {
        let expected = self.arity(op);
        if params.len() != expected {
            return Err(DeclError::WrongParamCount {
                name: self.name(op).to_string(),
                expected,
                found: params.len(),
            });
        }
        Ok(Ty::op(op, params))
    }

    /// Displays an instance with operator names.
    #[must_use]
    pub fn display<'a>(&'a self, ty: &'a Ty) -> DisplayTy<'a> {
        DisplayTy::new(ty, self)
    }
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}
