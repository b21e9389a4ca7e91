//! The closed set of filter operators.
//!
//! Each operator validates and coerces its raw arguments once, in [`Operator::contextualize`],
//! producing a [`CompiledPredicate`] that can then be tested against any number of entities.

use crate::error::{FilterError, Malformation};
use crate::path::{Path, PathError};
use crate::predicate::CompiledPredicate;
use crate::schema::{Cardinality, FieldType, SchemaDictionary};
use crate::value::{coerce, Value, ValueType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    In,
    Not,
    IsNull,
    NotNull,
    IsEmpty,
    NotEmpty,
    HasMember,
    HasNoMember,
    Prefix,
    Infix,
    Postfix,
    Lt,
    Le,
    Gt,
    Ge,
}

/// How many arguments an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Any number, including none
    Any,
    /// Arguments are accepted and disregarded
    Ignored,
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn admits(&self, given: usize) -> bool {
        match self {
            Arity::Any | Arity::Ignored => true,
            Arity::Exactly(n) => given == *n,
            Arity::AtLeast(n) => given >= *n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Any | Arity::Ignored => f.write_str("any number of"),
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// Which terminal shapes an operator applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Scalar,
    Collection,
    Either,
}

impl Operator {
    pub const ALL: [Operator; 15] = [
        Operator::In,
        Operator::Not,
        Operator::IsNull,
        Operator::NotNull,
        Operator::IsEmpty,
        Operator::NotEmpty,
        Operator::HasMember,
        Operator::HasNoMember,
        Operator::Prefix,
        Operator::Infix,
        Operator::Postfix,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
    ];

    /// Textual notation, as used in filter clauses
    pub fn notation(&self) -> &'static str {
        match self {
            Operator::In => "in",
            Operator::Not => "not",
            Operator::IsNull => "isnull",
            Operator::NotNull => "notnull",
            Operator::IsEmpty => "isempty",
            Operator::NotEmpty => "notempty",
            Operator::HasMember => "hasmember",
            Operator::HasNoMember => "hasnomember",
            Operator::Prefix => "prefix",
            Operator::Infix => "infix",
            Operator::Postfix => "postfix",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operator::In | Operator::Not => Arity::Any,
            Operator::IsNull | Operator::NotNull | Operator::IsEmpty | Operator::NotEmpty => Arity::Ignored,
            Operator::HasMember | Operator::HasNoMember | Operator::Prefix | Operator::Infix | Operator::Postfix => Arity::Exactly(1),
            Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge => Arity::AtLeast(1),
        }
    }

    /// Whether arguments are coerced to the terminal field's declared type
    pub fn coerces(&self) -> bool {
        matches!(self, Operator::In | Operator::Not | Operator::Lt | Operator::Le | Operator::Gt | Operator::Ge)
    }

    fn shape(&self) -> Shape {
        match self {
            Operator::IsNull | Operator::NotNull | Operator::IsEmpty | Operator::NotEmpty => Shape::Either,
            Operator::HasMember | Operator::HasNoMember => Shape::Collection,
            _ => Shape::Scalar,
        }
    }

    /// Validate and coerce `values` for `path`, producing a reusable predicate.
    ///
    /// Arity, terminal shape and coercion failures are all reported here, before any entity is tested.
    pub fn contextualize<S, V>(self, path: Path, values: &[V], dictionary: &S) -> Result<CompiledPredicate, FilterError>
    where
        S: SchemaDictionary + ?Sized,
        V: AsRef<str>,
    {
        match self.compile(path, values, dictionary) {
            Ok(predicate) => {
                debug!("contextualized {} {} with {} argument(s)", predicate.path(), self, values.len());
                Ok(predicate)
            }
            Err(e) => {
                warn!("rejected {} filter clause: {}", self, e);
                Err(e)
            }
        }
    }

    fn compile<S, V>(self, path: Path, values: &[V], dictionary: &S) -> Result<CompiledPredicate, FilterError>
    where
        S: SchemaDictionary + ?Sized,
        V: AsRef<str>,
    {
        let malformed = |path: &Path, reason| FilterError::MalformedPredicate { operator: self, path: path.to_string(), reason };

        let arity = self.arity();
        if !arity.admits(values.len()) {
            return Err(malformed(&path, Malformation::Arity { expected: arity, given: values.len() }));
        }

        match (self.shape(), path.terminal_cardinality()) {
            (Shape::Scalar, Cardinality::Many) => return Err(malformed(&path, Malformation::NotAScalar)),
            (Shape::Collection, Cardinality::One) => return Err(malformed(&path, Malformation::NotACollection)),
            _ => {}
        }

        let values: Vec<Value> = if self.coerces() {
            let target = comparison_type(&path, dictionary)?;
            values.iter().map(|raw| coerce(raw.as_ref(), target)).collect::<Result<Vec<_>, _>>()?
        } else if self.shape() == Shape::Collection {
            // Typed when the argument parses as the element type, textual otherwise
            let target = comparison_type(&path, dictionary)?;
            values.iter().map(|raw| coerce(raw.as_ref(), target).unwrap_or_else(|_| Value::from(raw.as_ref()))).collect()
        } else if arity == Arity::Ignored {
            Vec::new()
        } else {
            values.iter().map(|raw| Value::from(raw.as_ref())).collect()
        };

        Ok(CompiledPredicate::new(path, self, values))
    }
}

/// The type arguments are coerced to: the terminal's declared scalar (or element) type, or the
/// related entity's identifier type when the path ends at a relationship.
fn comparison_type<S: SchemaDictionary + ?Sized>(path: &Path, dictionary: &S) -> Result<ValueType, FilterError> {
    match path.terminal_type() {
        FieldType::Value(value_type) => Ok(*value_type),
        FieldType::Entity(name) => dictionary.id_type(name).ok_or_else(|| PathError::UnknownType(name.clone()).into()),
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.notation()) }
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL.into_iter().find(|op| op.notation().eq_ignore_ascii_case(s)).ok_or_else(|| UnknownOperator(s.to_string()))
    }
}
