//! Type aliases: names standing for an instance template.

use crate::context::Catalogue;
use crate::error::DeclError;
use crate::types::Ty;
use std::fmt;
use std::sync::Arc;

type Template = Arc<dyn Fn(&[Ty]) -> Ty + Send + Sync>;

/// An alias, expanded on use.
///
/// ```
/// use talg_types::{Catalogue, Ty, TypeAlias};
///
/// let mut cat = Catalogue::new();
/// let a = cat.declare("A", 0, None).unwrap();
/// let b = cat.declare("B", 0, Some(a)).unwrap();
/// let f = cat.declare("F", 2, None).unwrap();
///
/// // G(x) = F(x, B) for x <= A
/// let g = TypeAlias::parametrized(vec![Ty::basic(a)], move |p| {
///     Ty::op(f, vec![p[0].clone(), Ty::basic(b)])
/// });
/// assert_eq!(
///     g.instance(&cat, &[Ty::basic(b)]).unwrap(),
///     Ty::op(f, vec![Ty::basic(b), Ty::basic(b)])
/// );
/// assert!(g.instance(&cat, &[]).is_err());
/// ```
#[derive(Clone)]
pub struct TypeAlias {
    bounds: Vec<Ty>,
    template: Template,
}

impl TypeAlias {
    /// An alias for a closed instance.
    ///
    /// # Errors
    ///
    /// Fails if `body` contains variables or wildcards.
    pub fn new(body: Ty) -> Result<Self, DeclError> {
        if !body.is_closed() {
            return Err(DeclError::AliasNotClosed { body });
        }
        Ok(Self {
            bounds: Vec::new(),
            template: Arc::new(move |_: &[Ty]| body.clone()),
        })
    }

    /// An alias with one parameter per bound; each argument must be a
    /// subtype of its bound.
    pub fn parametrized<F>(bounds: Vec<Ty>, template: F) -> Self
    where
        F: Fn(&[Ty]) -> Ty + Send + Sync + 'static,
    {
        Self {
            bounds,
            template: Arc::new(template),
        }
    }

    /// Number of parameters.
    pub fn arity(&self) -> usize {
        self.bounds.len()
    }

    /// Declared parameter bounds.
    pub fn bounds(&self) -> &[Ty] {
        &self.bounds
    }

    /// Expands the alias.
    ///
    /// # Errors
    ///
    /// Fails if the argument count is wrong or an argument is definitely not
    /// a subtype of its bound.
    pub fn instance(&self, cat: &Catalogue, args: &[Ty]) -> Result<Ty, DeclError> {
        if args.len() != self.bounds.len() {
            return Err(DeclError::AliasParamCount {
                expected: self.bounds.len(),
                found: args.len(),
            });
        }

        for (arg, bound) in args.iter().zip(&self.bounds) {
            if cat.subtype(arg, bound) == Some(false) {
                return Err(DeclError::AliasBound {
                    arg: arg.clone(),
                    bound: bound.clone(),
                });
            }
        }

        Ok((self.template)(args))
    }
}

impl fmt::Debug for TypeAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeAlias")
            .field("bounds", &self.bounds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_alias() {
        let mut cat = Catalogue::new();
        let a = cat.declare("A", 0, None).unwrap();
        let f = cat.declare("F", 1, None).unwrap();

        let fa = TypeAlias::new(Ty::op(f, vec![Ty::basic(a)])).unwrap();
        assert_eq!(fa.arity(), 0);
        assert_eq!(fa.instance(&cat, &[]).unwrap(), Ty::op(f, vec![Ty::basic(a)]));
        assert!(fa.instance(&cat, &[Ty::basic(a)]).is_err());
    }

    #[test]
    fn test_alias_rejects_wildcards() {
        let mut cat = Catalogue::new();
        let f = cat.declare("F", 1, None).unwrap();
        assert!(matches!(
            TypeAlias::new(Ty::op(f, vec![Ty::Wild])),
            Err(DeclError::AliasNotClosed { .. })
        ));
    }

    #[test]
    fn test_alias_bound_checked() {
        let mut cat = Catalogue::new();
        let a = cat.declare("A", 0, None).unwrap();
        let b = cat.declare("B", 0, Some(a)).unwrap();
        let c = cat.declare("C", 0, None).unwrap();
        let f = cat.declare("F", 1, None).unwrap();

        let g = TypeAlias::parametrized(vec![Ty::basic(a)], move |p| Ty::op(f, vec![p[0].clone()]));
        assert!(g.instance(&cat, &[Ty::basic(b)]).is_ok());
        assert!(g.instance(&cat, &[Ty::Wild]).is_ok());
        assert_eq!(
            g.instance(&cat, &[Ty::basic(c)]),
            Err(DeclError::AliasBound {
                arg: Ty::basic(c),
                bound: Ty::basic(a),
            })
        );
    }
}
