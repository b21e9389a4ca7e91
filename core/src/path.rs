//! Path represents a (possibly multi-hop) field reference from a root entity type to a terminal field,
//! such as `book.author.name`.

use crate::schema::{Cardinality, FieldType, SchemaDictionary};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PathError {
    #[error("path has no segments")]
    Empty,
    #[error("unknown entity type: {0}")]
    UnknownType(String),
    #[error("unknown field {field:?} on {ty}")]
    UnknownField { ty: String, field: String },
    #[error("segment {index} starts at {found}, expected {expected}")]
    Discontinuous { index: usize, expected: String, found: String },
    #[error("cannot traverse through to-many relationship {ty}.{field}")]
    TraversesToMany { ty: String, field: String },
    #[error("cannot traverse through non-relationship field {ty}.{field}")]
    NotAnEntity { ty: String, field: String },
}

/// One hop of a [`Path`]: `field` on entity type `source`, declared as `target`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub source: String,
    pub field: String,
    pub target: FieldType,
    pub cardinality: Cardinality,
}

impl PathSegment {
    pub fn new(source: impl Into<String>, field: impl Into<String>, target: FieldType, cardinality: Cardinality) -> Self {
        Self { source: source.into(), field: field.into(), target, cardinality }
    }

    pub fn is_many(&self) -> bool { self.cardinality == Cardinality::Many }
}

/// Non-empty chain of segments where each interior segment is a to-one relationship
/// whose target type is the source type of the next segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }

        for (index, pair) in segments.windows(2).enumerate() {
            let (hop, next) = (&pair[0], &pair[1]);
            let Some(target) = hop.target.entity_name() else {
                return Err(PathError::NotAnEntity { ty: hop.source.clone(), field: hop.field.clone() });
            };
            if hop.is_many() {
                return Err(PathError::TraversesToMany { ty: hop.source.clone(), field: hop.field.clone() });
            }
            if target != next.source {
                return Err(PathError::Discontinuous { index: index + 1, expected: target.to_string(), found: next.source.clone() });
            }
        }

        Ok(Self { segments })
    }

    pub fn from_segment(segment: PathSegment) -> Self { Self { segments: vec![segment] } }

    /// Build a path from a dotted field reference, looking up each hop in the dictionary.
    ///
    /// A segment named `id` resolves to the identifier type of the entity it is on.
    pub fn parse<S: SchemaDictionary + ?Sized>(root_type: &str, dotted: &str, dictionary: &S) -> Result<Self, PathError> {
        if dotted.is_empty() {
            return Err(PathError::Empty);
        }
        if dictionary.id_type(root_type).is_none() {
            return Err(PathError::UnknownType(root_type.to_string()));
        }

        let mut segments: Vec<PathSegment> = Vec::new();
        let mut current = root_type.to_string();

        for field in dotted.split('.') {
            if let Some(prev) = segments.last() {
                if prev.target.entity_name().is_none() {
                    return Err(PathError::NotAnEntity { ty: prev.source.clone(), field: prev.field.clone() });
                }
            }

            let segment = if field.eq_ignore_ascii_case("id") {
                let id_type = dictionary.id_type(&current).ok_or_else(|| PathError::UnknownType(current.clone()))?;
                PathSegment::new(current.as_str(), field, FieldType::Value(id_type), Cardinality::One)
            } else {
                let unknown = || PathError::UnknownField { ty: current.clone(), field: field.to_string() };
                let target = dictionary.field_type(&current, field).ok_or_else(unknown)?;
                let cardinality = dictionary.cardinality(&current, field).ok_or_else(unknown)?;
                PathSegment::new(current.as_str(), field, target, cardinality)
            };

            if let Some(next) = segment.target.entity_name() {
                current = next.to_string();
            }
            segments.push(segment);
        }

        Self::new(segments)
    }

    pub fn segments(&self) -> &[PathSegment] { &self.segments }

    pub fn last(&self) -> &PathSegment {
        // non-empty by construction
        &self.segments[self.segments.len() - 1]
    }

    pub fn root_type(&self) -> &str { &self.segments[0].source }

    pub fn terminal_type(&self) -> &FieldType { &self.last().target }

    pub fn terminal_cardinality(&self) -> Cardinality { self.last().cardinality }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.segments.len() }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.field)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntityDef, StaticSchema};
    use crate::value::ValueType;

    fn schema() -> StaticSchema {
        StaticSchema::new()
            .with(EntityDef::new("author", ValueType::I64).attribute("name", ValueType::String).to_many("books", "book"))
            .with(EntityDef::new("book", ValueType::I64).attribute("title", ValueType::String).to_one("author", "author"))
    }

    #[test]
    fn test_parse_multi_hop() {
        let path = Path::parse("book", "author.name", &schema()).unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path.root_type(), "book");
        assert_eq!(path.segments()[1].source, "author");
        assert_eq!(path.terminal_type(), &FieldType::Value(ValueType::String));
        assert_eq!(path.to_string(), "author.name");
    }

    #[test]
    fn test_parse_id_uses_id_type() {
        let path = Path::parse("book", "author.id", &schema()).unwrap();
        assert_eq!(path.terminal_type(), &FieldType::Value(ValueType::I64));
        assert_eq!(path.terminal_cardinality(), Cardinality::One);
    }

    #[test]
    fn test_parse_unknown_field() {
        assert_eq!(
            Path::parse("book", "author.age", &schema()),
            Err(PathError::UnknownField { ty: "author".into(), field: "age".into() })
        );
        assert_eq!(Path::parse("shelf", "id", &schema()), Err(PathError::UnknownType("shelf".into())));
    }

    #[test]
    fn test_to_many_hop_is_rejected() {
        assert_eq!(
            Path::parse("author", "books.title", &schema()),
            Err(PathError::TraversesToMany { ty: "author".into(), field: "books".into() })
        );
        // to-many as the final segment is fine
        assert_eq!(Path::parse("author", "books", &schema()).unwrap().terminal_cardinality(), Cardinality::Many);
    }

    #[test]
    fn test_scalar_hop_is_rejected() {
        assert_eq!(
            Path::parse("author", "name.length", &schema()),
            Err(PathError::NotAnEntity { ty: "author".into(), field: "name".into() })
        );
    }

    #[test]
    fn test_new_checks_continuity() {
        let segments = vec![
            PathSegment::new("book", "author", FieldType::entity("author"), Cardinality::One),
            PathSegment::new("publisher", "name", FieldType::Value(ValueType::String), Cardinality::One),
        ];
        assert_eq!(
            Path::new(segments),
            Err(PathError::Discontinuous { index: 1, expected: "author".into(), found: "publisher".into() })
        );
        assert_eq!(Path::new(vec![]), Err(PathError::Empty));
    }
}
