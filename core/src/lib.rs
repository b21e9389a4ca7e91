pub mod error;
pub mod id;
pub mod operator;
pub mod path;
pub mod predicate;
pub mod resolve;
pub mod schema;
pub mod selection;
pub mod value;

pub use error::{FilterError, Malformation};
pub use id::EntityId;
pub use operator::{Arity, Operator};
pub use path::{Path, PathError, PathSegment};
pub use predicate::{CompiledPredicate, FilterClause, FilterPredicate};
pub use schema::{Cardinality, EntityDef, FieldType, SchemaDictionary, StaticSchema};
pub use selection::expression::FilterExpression;
pub use selection::filter::{Evaluate, FieldValue, FilterIterator, FilterResult, Filterable};
pub use value::{CastError, Value, ValueType};
