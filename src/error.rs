//! Error types for sketch construction and queries

use std::fmt;

/// Errors that can occur while constructing or querying a sketch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SketchError {
    /// An argument violated a documented constraint
    InvalidArgument {
        /// Parameter name
        param: String,
        /// Invalid value provided, rendered for display
        value: String,
        /// Constraint that was violated
        constraint: String,
    },

    /// A rank/min/max query was made against an empty sketch or store
    NoSuchElement {
        /// What was being looked up (e.g. `"min_index"`, `"value_at_quantile"`)
        what: String,
    },
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SketchError::InvalidArgument {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "invalid argument '{}': value '{}' {}",
                    param, value, constraint
                )
            }
            SketchError::NoSuchElement { what } => {
                write!(f, "no such element: {}", what)
            }
        }
    }
}

impl std::error::Error for SketchError {}

/// Result type alias for sketch operations
pub type Result<T> = std::result::Result<T, SketchError>;

pub(crate) fn invalid_argument(
    param: impl Into<String>,
    value: impl Into<String>,
    constraint: impl Into<String>,
) -> SketchError {
    SketchError::InvalidArgument {
        param: param.into(),
        value: value.into(),
        constraint: constraint.into(),
    }
}

pub(crate) fn no_such_element(what: impl Into<String>) -> SketchError {
    SketchError::NoSuchElement { what: what.into() }
}
