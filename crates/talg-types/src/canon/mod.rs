//! The canonical lattice of a seed set.
//!
//! A basic seed `X` contributes every declared basic operator below it. A
//! compound seed `F(p…)` contributes `F` over every combination of what its
//! parameters contribute, with `Top` added at each position when enabled.
//! `Top` itself is a member when enabled. Members are related by the
//! covering relation of the subtype order: `y` is a direct subtype of `x`
//! when `y < x` and no member lies strictly between them.

use crate::context::Catalogue;
use crate::error::DeclError;
use crate::types::{OpId, Ty};
use fxhash::FxHashMap;
use talg_log::info;

/// An immutable set of concrete instances with direct sub/supertype links.
///
/// ```
/// use talg_types::{Canon, Catalogue, OpId, Ty};
///
/// let mut cat = Catalogue::with_top();
/// let a = cat.declare("A", 0, None).unwrap();
/// let b = cat.declare("B", 0, Some(a)).unwrap();
///
/// let canon = Canon::new(&cat, [Ty::basic(a)]).unwrap();
/// assert_eq!(canon.len(), 3);
/// assert_eq!(canon.subtypes(&Ty::basic(OpId::TOP)).collect::<Vec<_>>(), vec![&Ty::basic(a)]);
/// assert_eq!(canon.supertypes(&Ty::basic(b)).collect::<Vec<_>>(), vec![&Ty::basic(a)]);
/// ```
#[derive(Debug, Clone)]
pub struct Canon {
    members: Vec<Ty>,
    index: FxHashMap<Ty, usize>,
    subtypes: Vec<Vec<usize>>,
    supertypes: Vec<Vec<usize>>,
}

impl Canon {
    /// Computes the canon of `seed`.
    ///
    /// # Errors
    ///
    /// Fails with [`DeclError::CanonVariable`] if a seed contains variables
    /// or wildcards.
    pub fn new(cat: &Catalogue, seed: impl IntoIterator<Item = Ty>) -> Result<Self, DeclError> {
        let mut canon = Canon {
            members: Vec::new(),
            index: FxHashMap::default(),
            subtypes: Vec::new(),
            supertypes: Vec::new(),
        };

        if cat.has_top() {
            canon.insert(Ty::basic(OpId::TOP));
        }
        for ty in seed {
            if !ty.is_closed() {
                return Err(DeclError::CanonVariable { seed: ty });
            }
            for member in expand(cat, &ty) {
                canon.insert(member);
            }
        }

        canon.link(cat);
        info!("canon built with {} members", canon.members.len());
        Ok(canon)
    }

    fn insert(&mut self, ty: Ty) {
        if !self.index.contains_key(&ty) {
            self.index.insert(ty.clone(), self.members.len());
            self.members.push(ty);
        }
    }

    /// Keeps the covering edges of the subtype order.
    fn link(&mut self, cat: &Catalogue) {
        let n = self.members.len();
        let le: Vec<Vec<bool>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        i != j && cat.subtype(&self.members[i], &self.members[j]) == Some(true)
                    })
                    .collect()
            })
            .collect();

        self.subtypes = vec![Vec::new(); n];
        self.supertypes = vec![Vec::new(); n];
        for lo in 0..n {
            for hi in 0..n {
                if le[lo][hi] && !(0..n).any(|mid| le[lo][mid] && le[mid][hi]) {
                    self.subtypes[hi].push(lo);
                    self.supertypes[lo].push(hi);
                }
            }
        }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `ty` is a member.
    pub fn contains(&self, ty: &Ty) -> bool {
        self.index.contains_key(ty)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Ty> {
        self.members.iter()
    }

    /// Direct subtypes of `ty` within the canon; empty for non-members.
    pub fn subtypes<'a>(&'a self, ty: &Ty) -> impl Iterator<Item = &'a Ty> + use<'a> {
        self.neighbours(ty, &self.subtypes)
    }

    /// Direct supertypes of `ty` within the canon; empty for non-members.
    pub fn supertypes<'a>(&'a self, ty: &Ty) -> impl Iterator<Item = &'a Ty> + use<'a> {
        self.neighbours(ty, &self.supertypes)
    }

    fn neighbours<'a>(
        &'a self,
        ty: &Ty,
        edges: &'a [Vec<usize>],
    ) -> impl Iterator<Item = &'a Ty> + use<'a> {
        let links: &'a [usize] = self.index.get(ty).map_or(&[], |&i| edges[i].as_slice());
        links.iter().map(move |&j| &self.members[j])
    }
}

/// The instances a closed seed contributes.
fn expand(cat: &Catalogue, ty: &Ty) -> Vec<Ty> {
    let Ty::Op { op, params } = ty else {
        return Vec::new();
    };

    if params.is_empty() {
        if *op == OpId::TOP {
            return vec![ty.clone()];
        }
        return cat
            .basic_operators()
            .filter(|&sub| cat.is_subtype_op(sub, *op))
            .map(Ty::basic)
            .collect();
    }

    let mut combos: Vec<Vec<Ty>> = vec![Vec::new()];
    for param in params {
        let mut fillers = expand(cat, param);
        if cat.has_top() && !fillers.contains(&Ty::basic(OpId::TOP)) {
            fillers.push(Ty::basic(OpId::TOP));
        }

        let mut next = Vec::with_capacity(combos.len() * fillers.len());
        for prefix in &combos {
            for filler in &fillers {
                let mut combo = prefix.clone();
                combo.push(filler.clone());
                next.push(combo);
            }
        }
        combos = next;
    }

    combos.into_iter().map(|params| Ty::op(*op, params)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canon_without_top() {
        let mut cat = Catalogue::new();
        let a = cat.declare("A", 0, None).unwrap();
        let b = cat.declare("B", 0, Some(a)).unwrap();
        let f = cat.declare("F", 1, None).unwrap();

        let canon = Canon::new(&cat, [Ty::op(f, vec![Ty::basic(a)])]).unwrap();
        assert_eq!(canon.len(), 2);
        assert!(canon.contains(&Ty::op(f, vec![Ty::basic(b)])));
        assert!(!canon.contains(&Ty::basic(a)));
    }

    #[test]
    fn test_canon_rejects_variables() {
        let cat = Catalogue::new();
        assert!(matches!(
            Canon::new(&cat, [Ty::Wild]),
            Err(DeclError::CanonVariable { .. })
        ));
    }

    #[test]
    fn test_non_members_have_no_neighbours() {
        let mut cat = Catalogue::with_top();
        let a = cat.declare("A", 0, None).unwrap();
        let c = cat.declare("C", 0, None).unwrap();

        let canon = Canon::new(&cat, [Ty::basic(a)]).unwrap();
        assert_eq!(canon.subtypes(&Ty::basic(c)).count(), 0);
        assert_eq!(canon.supertypes(&Ty::basic(c)).count(), 0);
    }

    #[test]
    fn test_seed_duplicates_collapse() {
        let mut cat = Catalogue::new();
        let a = cat.declare("A", 0, None).unwrap();
        let canon = Canon::new(&cat, [Ty::basic(a), Ty::basic(a)]).unwrap();
        assert_eq!(canon.iter().collect::<Vec<_>>(), vec![&Ty::basic(a)]);
    }
}
