//! Schema metadata consumed by path construction and predicate contextualization.
//!
//! The engine only ever reads from a [`SchemaDictionary`]. [`StaticSchema`] is a small in-memory
//! implementation for callers whose entity metadata is declared in code.

use crate::value::ValueType;
use std::collections::HashMap;

/// Whether a field holds one value/related entity or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    One,
    Many,
}

/// Declared type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// A scalar attribute, or the element type of a multi-valued attribute
    Value(ValueType),
    /// A relationship to the named entity type
    Entity(String),
}

impl FieldType {
    pub fn entity(name: impl Into<String>) -> Self { FieldType::Entity(name.into()) }

    /// The entity type name when this is a relationship
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            FieldType::Entity(name) => Some(name),
            FieldType::Value(_) => None,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Value(value_type) => write!(f, "{}", value_type),
            FieldType::Entity(name) => write!(f, "{}", name),
        }
    }
}

/// Trait for providing schema information about entity types
pub trait SchemaDictionary {
    /// Declared type of `field` on entity type `ty`
    fn field_type(&self, ty: &str, field: &str) -> Option<FieldType>;

    /// Cardinality of `field` on entity type `ty`
    fn cardinality(&self, ty: &str, field: &str) -> Option<Cardinality>;

    /// Type of the identifier field of entity type `ty`
    fn id_type(&self, ty: &str) -> Option<ValueType>;
}

impl<S: SchemaDictionary + ?Sized> SchemaDictionary for &S {
    fn field_type(&self, ty: &str, field: &str) -> Option<FieldType> { (**self).field_type(ty, field) }

    fn cardinality(&self, ty: &str, field: &str) -> Option<Cardinality> { (**self).cardinality(ty, field) }

    fn id_type(&self, ty: &str) -> Option<ValueType> { (**self).id_type(ty) }
}

#[derive(Debug, Clone)]
struct FieldDef {
    ty: FieldType,
    cardinality: Cardinality,
}

/// Declaration of one entity type for a [`StaticSchema`].
#[derive(Debug, Clone)]
pub struct EntityDef {
    name: String,
    id_type: ValueType,
    fields: HashMap<String, FieldDef>,
}

impl EntityDef {
    pub fn new(name: impl Into<String>, id_type: ValueType) -> Self { Self { name: name.into(), id_type, fields: HashMap::new() } }

    /// Single-valued scalar attribute
    pub fn attribute(self, field: &str, ty: ValueType) -> Self { self.field(field, FieldType::Value(ty), Cardinality::One) }

    /// Multi-valued scalar attribute (e.g. a list of strings)
    pub fn attributes(self, field: &str, element_ty: ValueType) -> Self { self.field(field, FieldType::Value(element_ty), Cardinality::Many) }

    pub fn to_one(self, field: &str, entity: &str) -> Self { self.field(field, FieldType::entity(entity), Cardinality::One) }

    pub fn to_many(self, field: &str, entity: &str) -> Self { self.field(field, FieldType::entity(entity), Cardinality::Many) }

    pub fn field(mut self, field: &str, ty: FieldType, cardinality: Cardinality) -> Self {
        self.fields.insert(field.to_string(), FieldDef { ty, cardinality });
        self
    }
}

/// In-memory [`SchemaDictionary`] built from [`EntityDef`]s.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    entities: HashMap<String, EntityDef>,
}

impl StaticSchema {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    fn lookup(&self, ty: &str, field: &str) -> Option<&FieldDef> { self.entities.get(ty)?.fields.get(field) }
}

impl SchemaDictionary for StaticSchema {
    fn field_type(&self, ty: &str, field: &str) -> Option<FieldType> { self.lookup(ty, field).map(|def| def.ty.clone()) }

    fn cardinality(&self, ty: &str, field: &str) -> Option<Cardinality> { self.lookup(ty, field).map(|def| def.cardinality) }

    fn id_type(&self, ty: &str) -> Option<ValueType> { self.entities.get(ty).map(|entity| entity.id_type) }
}
