//! Walks a [`Path`] across an entity graph to the value the path refers to.

use crate::path::{Path, PathSegment};
use crate::schema::Cardinality;
use crate::selection::filter::{FieldValue, Filterable};
use crate::value::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::{trace, warn};

/// Value found at the end of a path.
///
/// `Absent` (null or an unset to-one hop) is distinct from an empty `Collection`:
/// a multi-valued terminal is never absent.
pub enum Terminal<'a> {
    Absent,
    Scalar(Value),
    Entity(&'a dyn Filterable),
    Collection(Vec<Element<'a>>),
}

/// One member of a multi-valued terminal.
pub enum Element<'a> {
    Value(Value),
    Entity(&'a dyn Filterable),
}

/// Resolve `path` against `root`.
///
/// Never fails: a missing related entity along the way short-circuits to [`Terminal::Absent`].
pub fn resolve<'a, E: Filterable + ?Sized>(root: &'a E, path: &Path) -> Terminal<'a> {
    if root.collection() != path.root_type() {
        warn!("resolving path {} rooted at {} against a {} entity", path, path.root_type(), root.collection());
    }
    walk(root, path.segments())
}

fn walk<'a, E: Filterable + ?Sized>(entity: &'a E, segments: &[PathSegment]) -> Terminal<'a> {
    match segments {
        [] => Terminal::Absent,
        [last] => terminal(entity.value(&last.field), last.cardinality),
        [hop, rest @ ..] => match entity.value(&hop.field) {
            FieldValue::One(related) => walk(related, rest),
            FieldValue::Absent => {
                trace!("{}.{} is absent, short-circuiting", entity.collection(), hop.field);
                Terminal::Absent
            }
            _ => {
                warn!("{}.{} did not yield a single related entity", entity.collection(), hop.field);
                Terminal::Absent
            }
        },
    }
}

fn terminal(value: FieldValue<'_>, cardinality: Cardinality) -> Terminal<'_> {
    match (value, cardinality) {
        (FieldValue::Absent, Cardinality::One) => Terminal::Absent,
        (FieldValue::Absent, Cardinality::Many) => Terminal::Collection(Vec::new()),
        (FieldValue::Scalar(value), Cardinality::One) => Terminal::Scalar(value),
        (FieldValue::Scalar(value), Cardinality::Many) => Terminal::Collection(vec![Element::Value(value)]),
        (FieldValue::One(entity), Cardinality::One) => Terminal::Entity(entity),
        (FieldValue::One(entity), Cardinality::Many) => Terminal::Collection(vec![Element::Entity(entity)]),
        (FieldValue::List(values), _) => Terminal::Collection(values.into_iter().map(Element::Value).collect()),
        (FieldValue::Many(entities), _) => Terminal::Collection(entities.into_iter().map(Element::Entity).collect()),
    }
}

impl<'a> Terminal<'a> {
    pub fn is_absent(&self) -> bool { matches!(self, Terminal::Absent) }

    /// The single comparable value, if any. A related entity contributes its identifier.
    pub fn scalar(&self) -> Option<Cow<'_, Value>> {
        match self {
            Terminal::Scalar(value) => Some(Cow::Borrowed(value)),
            Terminal::Entity(entity) => entity.id().map(Cow::Owned),
            Terminal::Absent | Terminal::Collection(_) => None,
        }
    }

    /// Textual form of a single-valued terminal
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Terminal::Scalar(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
            other => other.scalar().map(|value| Cow::Owned(value.to_text())),
        }
    }

    /// Absent terminals, empty collections and empty strings are empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Terminal::Absent => true,
            Terminal::Collection(elements) => elements.is_empty(),
            Terminal::Scalar(Value::String(s)) => s.is_empty(),
            Terminal::Scalar(_) | Terminal::Entity(_) => false,
        }
    }

    /// Whether any member of a multi-valued terminal equals `needle`.
    ///
    /// Members compare with typed equality; a textual needle also matches a member's exact text form.
    pub fn has_member(&self, needle: &Value) -> bool {
        match self {
            Terminal::Collection(elements) => elements.iter().any(|element| element.matches(needle)),
            _ => false,
        }
    }
}

impl<'a> Element<'a> {
    pub fn value(&self) -> Option<Cow<'_, Value>> {
        match self {
            Element::Value(value) => Some(Cow::Borrowed(value)),
            Element::Entity(entity) => entity.id().map(Cow::Owned),
        }
    }

    fn matches(&self, needle: &Value) -> bool {
        self.value().is_some_and(|value| value.matches(needle) || needle.as_str().is_some_and(|text| value.to_text() == text))
    }
}

impl fmt::Debug for Terminal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::Absent => f.write_str("Absent"),
            Terminal::Scalar(value) => f.debug_tuple("Scalar").field(value).finish(),
            Terminal::Entity(entity) => f.debug_tuple("Entity").field(&entity.collection()).field(&entity.id()).finish(),
            Terminal::Collection(elements) => f.debug_tuple("Collection").field(elements).finish(),
        }
    }
}

impl fmt::Debug for Element<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Element::Entity(entity) => f.debug_tuple("Entity").field(&entity.collection()).field(&entity.id()).finish(),
        }
    }
}
