//! Typing and declaration errors.
//!
//! Runtime typing errors ([`TypeError`]) are raised while applying,
//! instantiating or resolving instances. Structural errors ([`DeclError`]) are
//! raised while declaring operators and aliases or building instances, before
//! any inference happens. The two are never mixed.

use crate::context::Catalogue;
use crate::types::{OpId, Ty, TyVar};
use std::fmt;

/// Errors raised during inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// An argument was applied to something that is not a function.
    FunctionApplication {
        /// The instance in function position
        function: Ty,
        /// The argument
        argument: Ty,
    },

    /// A required subtype relation does not hold.
    SubtypeMismatch {
        /// The instance that should be the subtype
        sub: Ty,
        /// The instance that should be the supertype
        sup: Ty,
        /// Rendering of the expression being assembled, when known
        context: Option<String>,
    },

    /// No alternative of a constraint can be satisfied anymore.
    ConstraintViolation {
        /// The constrained instance, as far as it is known
        owner: Ty,
        /// The declared alternatives
        alternatives: Vec<Ty>,
    },

    /// A schema constrains a variable that is not part of its signature.
    ConstrainFreeVariable {
        /// The offending variable
        var: TyVar,
    },

    /// A variable would have to contain itself.
    RecursiveType {
        /// The variable
        var: TyVar,
        /// The instance it would be bound to
        ty: Ty,
    },

    /// A variable that was not allocated by this context.
    UnknownVariable {
        /// The variable
        var: TyVar,
    },
}

impl TypeError {
    /// Shorthand for a mismatch without context.
    pub fn mismatch(sub: Ty, sup: Ty) -> Self {
        TypeError::SubtypeMismatch {
            sub,
            sup,
            context: None,
        }
    }

    /// Attaches the rendering of the outer expression to a mismatch.
    ///
    /// Other errors are returned unchanged, as is a mismatch that already
    /// carries context.
    #[must_use]
    pub fn with_context(self, outer: impl FnOnce() -> String) -> Self {
        match self {
            TypeError::SubtypeMismatch {
                sub,
                sup,
                context: None,
            } => TypeError::SubtypeMismatch {
                sub,
                sup,
                context: Some(outer()),
            },
            other => other,
        }
    }

    /// Short, stable description of the error kind.
    pub fn description(&self) -> &'static str {
        match self {
            TypeError::FunctionApplication { .. } => "function application to a non-function",
            TypeError::SubtypeMismatch { .. } => "subtype mismatch",
            TypeError::ConstraintViolation { .. } => "constraint violation",
            TypeError::ConstrainFreeVariable { .. } => "constraint over a free variable",
            TypeError::RecursiveType { .. } => "recursive type",
            TypeError::UnknownVariable { .. } => "unknown variable",
        }
    }

    /// Renders the error with operator names.
    pub fn render(&self, cat: &Catalogue) -> String {
        match self {
            TypeError::FunctionApplication { function, argument } => format!(
                "cannot apply {} to non-function {}",
                cat.display(argument),
                cat.display(function)
            ),
            TypeError::SubtypeMismatch { sub, sup, context } => {
                let mut out = format!(
                    "{} is not a subtype of {}",
                    cat.display(sub),
                    cat.display(sup)
                );
                if let Some(context) = context {
                    out.push_str(&format!("\n  in: {context}"));
                }
                out
            }
            TypeError::ConstraintViolation {
                owner,
                alternatives,
            } => {
                let alts: Vec<String> = alternatives
                    .iter()
                    .map(|alt| cat.display(alt).to_string())
                    .collect();
                format!(
                    "{} violates the constraint [{}]",
                    cat.display(owner),
                    alts.join(", ")
                )
            }
            TypeError::ConstrainFreeVariable { var } => {
                format!("constraint mentions {var}, which is not in the signature")
            }
            TypeError::RecursiveType { var, ty } => {
                format!("cannot bind {var} to {}, which contains it", cat.display(ty))
            }
            TypeError::UnknownVariable { var } => {
                format!("{var} was not allocated by this context")
            }
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeError::FunctionApplication { function, argument } => {
                write!(f, "cannot apply {argument} to non-function {function}")
            }
            TypeError::SubtypeMismatch { sub, sup, context } => {
                write!(f, "{sub} is not a subtype of {sup}")?;
                if let Some(context) = context {
                    write!(f, " in {context}")?;
                }
                Ok(())
            }
            TypeError::ConstraintViolation { owner, .. } => {
                write!(f, "{owner} violates its constraint")
            }
            TypeError::ConstrainFreeVariable { var } => {
                write!(f, "constraint over free variable {var}")
            }
            TypeError::RecursiveType { var, ty } => {
                write!(f, "recursive type: {var} occurs in {ty}")
            }
            TypeError::UnknownVariable { var } => write!(f, "unknown variable {var}"),
        }
    }
}

impl std::error::Error for TypeError {}

/// Errors raised while declaring operators and aliases or building instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclError {
    /// An operator with this name already exists.
    DuplicateOperator {
        /// The name
        name: String,
    },

    /// An alias or definition with this name already exists.
    DuplicateName {
        /// The name
        name: String,
    },

    /// The declared supertype was not issued by this catalogue.
    UnknownOperator {
        /// The operator being declared
        name: String,
        /// The unknown supertype id
        supertype: OpId,
    },

    /// The declared supertype has a different arity.
    SupertypeArity {
        /// The operator being declared
        name: String,
        /// Its arity
        arity: usize,
        /// Arity of the supertype
        supertype_arity: usize,
    },

    /// An operator was given the wrong number of parameters.
    WrongParamCount {
        /// Operator or alias name
        name: String,
        /// Declared arity
        expected: usize,
        /// Parameters supplied
        found: usize,
    },

    /// A non-parametrized alias body contains variables or wildcards.
    AliasNotClosed {
        /// The body
        body: Ty,
    },

    /// An alias was given the wrong number of parameters.
    AliasParamCount {
        /// Declared parameters
        expected: usize,
        /// Parameters supplied
        found: usize,
    },

    /// An alias argument is not a subtype of its declared bound.
    AliasBound {
        /// The argument
        arg: Ty,
        /// The bound
        bound: Ty,
    },

    /// A canon seed contains variables.
    CanonVariable {
        /// The seed instance
        seed: Ty,
    },
}

impl DeclError {
    /// Renders the error with operator names.
    pub fn render(&self, cat: &Catalogue) -> String {
        match self {
            DeclError::AliasNotClosed { body } => {
                format!("alias body {} must not contain variables", cat.display(body))
            }
            DeclError::AliasBound { arg, bound } => format!(
                "alias argument {} is not a subtype of its bound {}",
                cat.display(arg),
                cat.display(bound)
            ),
            DeclError::CanonVariable { seed } => {
                format!("canon seed {} must not contain variables", cat.display(seed))
            }
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DeclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclError::DuplicateOperator { name } => {
                write!(f, "operator {name} is already declared")
            }
            DeclError::DuplicateName { name } => write!(f, "{name} is already defined"),
            DeclError::UnknownOperator { name, supertype } => {
                write!(f, "supertype {supertype} of {name} is not a declared operator")
            }
            DeclError::SupertypeArity {
                name,
                arity,
                supertype_arity,
            } => write!(
                f,
                "operator {name} has {arity} parameter(s) but its supertype has {supertype_arity}"
            ),
            DeclError::WrongParamCount {
                name,
                expected,
                found,
            } => write!(f, "{name} takes {expected} parameter(s), {found} given"),
            DeclError::AliasNotClosed { body } => {
                write!(f, "alias body {body} must not contain variables")
            }
            DeclError::AliasParamCount { expected, found } => {
                write!(f, "alias takes {expected} parameter(s), {found} given")
            }
            DeclError::AliasBound { arg, bound } => {
                write!(f, "alias argument {arg} is not a subtype of {bound}")
            }
            DeclError::CanonVariable { seed } => {
                write!(f, "canon seed {seed} must not contain variables")
            }
        }
    }
}

impl std::error::Error for DeclError {}

/// Result type for inference.
pub type Result<T> = std::result::Result<T, TypeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_only_fills_empty_mismatch() {
        let err = TypeError::mismatch(Ty::basic(OpId(3)), Ty::basic(OpId(4)));
        let err = err.with_context(|| "f x".to_string());
        let err = err.with_context(|| "g (f x)".to_string());
        assert_eq!(
            err,
            TypeError::SubtypeMismatch {
                sub: Ty::basic(OpId(3)),
                sup: Ty::basic(OpId(4)),
                context: Some("f x".to_string()),
            }
        );

        let other = TypeError::ConstrainFreeVariable { var: TyVar(0) };
        assert_eq!(other.clone().with_context(|| "x".to_string()), other);
    }

    #[test]
    fn test_render_uses_names() {
        let mut cat = Catalogue::new();
        let int = cat.declare("Int", 0, None).unwrap();
        let str = cat.declare("Str", 0, None).unwrap();

        let err = TypeError::mismatch(Ty::basic(str), Ty::basic(int));
        assert_eq!(err.render(&cat), "Str is not a subtype of Int");
        assert_eq!(err.description(), "subtype mismatch");
    }

    #[test]
    fn test_decl_error_display() {
        let err = DeclError::WrongParamCount {
            name: "Map".to_string(),
            expected: 2,
            found: 1,
        };
        assert_eq!(err.to_string(), "Map takes 2 parameter(s), 1 given");
    }
}
