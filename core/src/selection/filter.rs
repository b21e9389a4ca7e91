//! Filter items based on a compiled predicate. This is the in-memory path: items are read through
//! [`Filterable`] and tested one at a time, nothing is pushed down to storage.

use crate::value::Value;

/// What an entity reports for one of its fields.
pub enum FieldValue<'a> {
    /// Null, or an unset relationship
    Absent,
    Scalar(Value),
    /// A multi-valued attribute
    List(Vec<Value>),
    /// A to-one relationship
    One(&'a dyn Filterable),
    /// A to-many relationship
    Many(Vec<&'a dyn Filterable>),
}

impl From<Option<Value>> for FieldValue<'_> {
    fn from(value: Option<Value>) -> Self {
        match value {
            Some(value) => FieldValue::Scalar(value),
            None => FieldValue::Absent,
        }
    }
}

impl From<Value> for FieldValue<'_> {
    fn from(value: Value) -> Self { FieldValue::Scalar(value) }
}

/// Trait for items that can be filtered by predicate evaluation
///
/// Reading a field must never fail for a merely absent value; return [`FieldValue::Absent`].
pub trait Filterable {
    /// Entity type name, as known to the schema dictionary
    fn collection(&self) -> &str;

    fn value(&self, name: &str) -> FieldValue<'_>;

    /// Identifier of this entity, used when a path ends at a relationship
    fn id(&self) -> Option<Value> {
        match self.value("id") {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

/// Anything that can decide whether an entity passes
pub trait Evaluate {
    fn test<E: Filterable + ?Sized>(&self, item: &E) -> bool;
}

impl<P: Evaluate + ?Sized> Evaluate for &P {
    fn test<E: Filterable + ?Sized>(&self, item: &E) -> bool { (**self).test(item) }
}

#[derive(Debug, PartialEq)]
pub enum FilterResult<R> {
    Pass(R),
    Skip(R),
}

impl<R> FilterResult<R> {
    pub fn passed(&self) -> bool { matches!(self, FilterResult::Pass(_)) }

    pub fn into_inner(self) -> R {
        match self {
            FilterResult::Pass(item) | FilterResult::Skip(item) => item,
        }
    }
}

pub struct FilterIterator<I, P> {
    iter: I,
    predicate: P,
}

impl<I, R, P> FilterIterator<I, P>
where
    I: Iterator<Item = R>,
    R: Filterable,
    P: Evaluate,
{
    pub fn new(iter: I, predicate: P) -> Self { Self { iter, predicate } }

    /// Only the items that pass
    pub fn passing(self) -> impl Iterator<Item = R> { self.filter(FilterResult::passed).map(FilterResult::into_inner) }
}

impl<I, R, P> Iterator for FilterIterator<I, P>
where
    I: Iterator<Item = R>,
    R: Filterable,
    P: Evaluate,
{
    type Item = FilterResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|item| if self.predicate.test(&item) { FilterResult::Pass(item) } else { FilterResult::Skip(item) })
    }
}
