use crate::operator::{Arity, Operator};
use crate::path::PathError;
use crate::value::CastError;
use thiserror::Error;

/// Rejection of a filter clause. Always raised while contextualizing, never while testing an entity.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// The clause is structurally wrong for its operator
    #[error("malformed predicate `{path} {operator}`: {reason}")]
    MalformedPredicate { operator: Operator, path: String, reason: Malformation },

    /// A raw argument could not be coerced into the terminal field's declared type
    #[error("invalid value: {0}")]
    InvalidValue(#[from] CastError),

    /// The clause's field reference could not be resolved against the schema
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Malformation {
    #[error("expected {expected} argument(s), got {given}")]
    Arity { expected: Arity, given: usize },
    #[error("operator requires a multi-valued field")]
    NotACollection,
    #[error("operator requires a single-valued field")]
    NotAScalar,
}
