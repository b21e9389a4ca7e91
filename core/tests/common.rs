#![allow(dead_code)]

use sift_core::{EntityDef, EntityId, FieldValue, Filterable, StaticSchema, Value, ValueType};
use tracing::Level;

#[derive(Debug, Clone, Default)]
pub struct Publisher {
    pub id: EntityId,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Book {
    pub id: i64,
    pub title: Option<String>,
    pub author: Option<Box<Author>>,
    pub publisher: Option<Publisher>,
}

#[derive(Debug, Clone, Default)]
pub struct Author {
    pub id: i64,
    pub name: Option<String>,
    pub awards: Option<Vec<String>>,
    pub books: Vec<Book>,
}

impl Filterable for Author {
    fn collection(&self) -> &str { "author" }

    fn value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => Value::I64(self.id).into(),
            "name" => self.name.clone().map(Value::String).into(),
            "awards" => match &self.awards {
                Some(awards) => FieldValue::List(awards.iter().cloned().map(Value::String).collect()),
                None => FieldValue::Absent,
            },
            "books" => FieldValue::Many(self.books.iter().map(|book| book as &dyn Filterable).collect()),
            _ => FieldValue::Absent,
        }
    }
}

impl Filterable for Book {
    fn collection(&self) -> &str { "book" }

    fn value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => Value::I64(self.id).into(),
            "title" => self.title.clone().map(Value::String).into(),
            "author" => match &self.author {
                Some(author) => FieldValue::One(author.as_ref()),
                None => FieldValue::Absent,
            },
            "publisher" => match &self.publisher {
                Some(publisher) => FieldValue::One(publisher),
                None => FieldValue::Absent,
            },
            _ => FieldValue::Absent,
        }
    }
}

impl Filterable for Publisher {
    fn collection(&self) -> &str { "publisher" }

    fn value(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => Value::EntityId(self.id).into(),
            "name" => self.name.clone().map(Value::String).into(),
            _ => FieldValue::Absent,
        }
    }
}

pub fn schema() -> StaticSchema {
    StaticSchema::new()
        .with(
            EntityDef::new("author", ValueType::I64)
                .attribute("name", ValueType::String)
                .attributes("awards", ValueType::String)
                .to_many("books", "book"),
        )
        .with(
            EntityDef::new("book", ValueType::I64)
                .attribute("title", ValueType::String)
                .to_one("author", "author")
                .to_one("publisher", "publisher"),
        )
        .with(EntityDef::new("publisher", ValueType::EntityId).attribute("name", ValueType::String))
}

/// The author used throughout the operator scenarios
pub fn author_for_test() -> Author {
    Author {
        id: 10,
        name: Some("AuthorForTest".to_string()),
        awards: Some(vec!["Booker Prize".to_string(), "National Book Awards".to_string()]),
        books: Vec::new(),
    }
}

// Initialize tracing for tests
#[ctor::ctor]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_test_writer()
        .init();
}
