//! Filter clauses, before and after contextualization.

use crate::error::FilterError;
use crate::operator::Operator;
use crate::path::{Path, PathError};
use crate::resolve::resolve;
use crate::schema::SchemaDictionary;
use crate::selection::filter::{Evaluate, Filterable};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A contextualized filter clause: path, operator and coerced arguments.
///
/// Immutable once built. Testing reads the entity graph and nothing else, so one instance can be
/// reused (and shared between threads) for as many entities as needed.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    path: Path,
    operator: Operator,
    values: Vec<Value>,
    // uppercased argument of prefix/infix/postfix
    folded: Option<String>,
}

impl CompiledPredicate {
    pub(crate) fn new(path: Path, operator: Operator, values: Vec<Value>) -> Self {
        let folded = match operator {
            Operator::Prefix | Operator::Infix | Operator::Postfix => values.first().map(|v| v.to_text().to_uppercase()),
            _ => None,
        };
        Self { path, operator, values, folded }
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn operator(&self) -> Operator { self.operator }

    pub fn values(&self) -> &[Value] { &self.values }

    pub fn test<E: Filterable + ?Sized>(&self, entity: &E) -> bool {
        let terminal = resolve(entity, &self.path);

        match self.operator {
            Operator::In => terminal.scalar().is_some_and(|v| self.any_matches(&v)),
            Operator::Not => !terminal.scalar().is_some_and(|v| self.any_matches(&v)),

            Operator::IsNull => terminal.is_absent(),
            Operator::NotNull => !terminal.is_absent(),
            Operator::IsEmpty => terminal.is_empty(),
            Operator::NotEmpty => !terminal.is_empty(),

            Operator::HasMember => self.values.first().is_some_and(|member| terminal.has_member(member)),
            Operator::HasNoMember => !self.values.first().is_some_and(|member| terminal.has_member(member)),

            Operator::Prefix => self.text_matches(terminal.text().as_deref(), |text, needle| text.starts_with(needle)),
            Operator::Infix => self.text_matches(terminal.text().as_deref(), |text, needle| text.contains(needle)),
            Operator::Postfix => self.text_matches(terminal.text().as_deref(), |text, needle| text.ends_with(needle)),

            Operator::Lt => terminal.scalar().is_some_and(|v| self.all_compare(&v, Ordering::is_lt)),
            Operator::Le => terminal.scalar().is_some_and(|v| self.all_compare(&v, Ordering::is_le)),
            Operator::Gt => terminal.scalar().is_some_and(|v| self.all_compare(&v, Ordering::is_gt)),
            Operator::Ge => terminal.scalar().is_some_and(|v| self.all_compare(&v, Ordering::is_ge)),
        }
    }

    fn any_matches(&self, actual: &Value) -> bool { self.values.iter().any(|arg| actual.matches(arg)) }

    // Conjunction: the value must satisfy the relation against every argument
    fn all_compare(&self, actual: &Value, relation: fn(Ordering) -> bool) -> bool {
        self.values.iter().all(|arg| actual.compare(arg).is_some_and(relation))
    }

    fn text_matches(&self, text: Option<&str>, test: impl Fn(&str, &str) -> bool) -> bool {
        match (text, &self.folded) {
            (Some(text), Some(needle)) => test(&text.to_uppercase(), needle),
            _ => false,
        }
    }
}

impl Evaluate for CompiledPredicate {
    fn test<E: Filterable + ?Sized>(&self, item: &E) -> bool { CompiledPredicate::test(self, item) }
}

impl fmt::Display for CompiledPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [", self.path, self.operator)?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

/// A filter clause with its raw textual arguments, not yet validated or coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub path: Path,
    pub operator: Operator,
    pub values: Vec<String>,
}

impl FilterPredicate {
    pub fn new<V: Into<String>>(path: Path, operator: Operator, values: impl IntoIterator<Item = V>) -> Self {
        Self { path, operator, values: values.into_iter().map(Into::into).collect() }
    }

    pub fn in_<V: Into<String>>(path: Path, values: impl IntoIterator<Item = V>) -> Self { Self::new(path, Operator::In, values) }

    pub fn not_in<V: Into<String>>(path: Path, values: impl IntoIterator<Item = V>) -> Self { Self::new(path, Operator::Not, values) }

    pub fn lt(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Lt, [value]) }

    pub fn le(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Le, [value]) }

    pub fn gt(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Gt, [value]) }

    pub fn ge(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Ge, [value]) }

    pub fn prefix(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Prefix, [value]) }

    pub fn infix(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Infix, [value]) }

    pub fn postfix(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::Postfix, [value]) }

    pub fn has_member(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::HasMember, [value]) }

    pub fn has_no_member(path: Path, value: impl Into<String>) -> Self { Self::new(path, Operator::HasNoMember, [value]) }

    pub fn is_null(path: Path) -> Self { Self::new(path, Operator::IsNull, Vec::<String>::new()) }

    pub fn not_null(path: Path) -> Self { Self::new(path, Operator::NotNull, Vec::<String>::new()) }

    pub fn is_empty(path: Path) -> Self { Self::new(path, Operator::IsEmpty, Vec::<String>::new()) }

    pub fn not_empty(path: Path) -> Self { Self::new(path, Operator::NotEmpty, Vec::<String>::new()) }

    pub fn contextualize<S: SchemaDictionary + ?Sized>(&self, dictionary: &S) -> Result<CompiledPredicate, FilterError> {
        self.operator.contextualize(self.path.clone(), &self.values, dictionary)
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{} {} [{}]", self.path, self.operator, self.values.join(", ")) }
}

/// Serializable form of a filter clause, with the path still in dotted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterClause {
    pub path: String,
    #[serde(rename = "op")]
    pub operator: Operator,
    #[serde(default)]
    pub values: Vec<String>,
}

impl FilterClause {
    /// Resolve the dotted path from `root_type`
    pub fn bind<S: SchemaDictionary + ?Sized>(&self, root_type: &str, dictionary: &S) -> Result<FilterPredicate, PathError> {
        let path = Path::parse(root_type, &self.path, dictionary)?;
        Ok(FilterPredicate::new(path, self.operator, self.values.iter().cloned()))
    }

    pub fn compile<S: SchemaDictionary + ?Sized>(&self, root_type: &str, dictionary: &S) -> Result<CompiledPredicate, FilterError> {
        Ok(self.bind(root_type, dictionary)?.contextualize(dictionary)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EntityDef, StaticSchema};
    use crate::selection::filter::FieldValue;
    use crate::value::ValueType;

    struct Author {
        id: Option<i64>,
        name: Option<String>,
    }

    impl Filterable for Author {
        fn collection(&self) -> &str { "author" }

        fn value(&self, name: &str) -> FieldValue<'_> {
            match name {
                "id" => self.id.map(Value::I64).into(),
                "name" => self.name.clone().map(Value::String).into(),
                _ => FieldValue::Absent,
            }
        }
    }

    fn schema() -> StaticSchema { StaticSchema::new().with(EntityDef::new("author", ValueType::I64).attribute("name", ValueType::String)) }

    fn path(dotted: &str) -> Path { Path::parse("author", dotted, &schema()).unwrap() }

    fn check(predicate: FilterPredicate, author: &Author) -> bool { predicate.contextualize(&schema()).unwrap().test(author) }

    #[test]
    fn test_comparisons_are_conjunctive() {
        let author = Author { id: Some(10), name: None };
        assert!(check(FilterPredicate::new(path("id"), Operator::Lt, ["11"]), &author));
        assert!(!check(FilterPredicate::new(path("id"), Operator::Lt, ["10", "9"]), &author));
        assert!(!check(FilterPredicate::new(path("id"), Operator::Le, ["9", "8"]), &author));
        assert!(!check(FilterPredicate::new(path("id"), Operator::Gt, ["10", "11"]), &author));
        assert!(check(FilterPredicate::new(path("id"), Operator::Ge, ["10", "9"]), &author));
        assert!(!check(FilterPredicate::new(path("id"), Operator::Ge, ["11", "12"]), &author));
    }

    #[test]
    fn test_text_operators_fold_case() {
        let author = Author { id: Some(1), name: Some("AuthorForTest".into()) };
        assert!(check(FilterPredicate::prefix(path("name"), "author"), &author));
        assert!(check(FilterPredicate::infix(path("name"), "FORt"), &author));
        assert!(check(FilterPredicate::postfix(path("name"), "TEST"), &author));
        assert!(!check(FilterPredicate::postfix(path("name"), "Author"), &author));
    }

    #[test]
    fn test_text_operators_on_numbers_use_text_form() {
        let author = Author { id: Some(1024), name: None };
        let predicate = FilterPredicate::prefix(path("id"), "10").contextualize(&schema()).unwrap();
        assert!(predicate.test(&author));
    }

    #[test]
    fn test_reusable_and_pure() {
        let predicate = FilterPredicate::in_(path("id"), ["1", "2"]).contextualize(&schema()).unwrap();
        let one = Author { id: Some(1), name: None };
        let three = Author { id: Some(3), name: None };
        assert!(predicate.test(&one));
        assert!(!predicate.test(&three));
        assert!(predicate.test(&one));
    }

    #[test]
    fn test_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledPredicate>();
    }

    #[test]
    fn test_display() {
        let clause = FilterPredicate::in_(path("id"), ["1", "2"]);
        assert_eq!(clause.to_string(), "id in [1, 2]");
        assert_eq!(clause.contextualize(&schema()).unwrap().to_string(), "id in [1, 2]");
        let clause = FilterPredicate::prefix(path("name"), "Au");
        assert_eq!(clause.contextualize(&schema()).unwrap().to_string(), "name prefix [\"Au\"]");
    }

    #[test]
    fn test_clause_from_json() {
        let clause: FilterClause = serde_json::from_str(r#"{ "path": "name", "op": "isnull" }"#).unwrap();
        assert_eq!(clause.operator, Operator::IsNull);
        assert!(clause.values.is_empty());
        assert!(clause.compile("author", &schema()).unwrap().test(&Author { id: None, name: None }));

        let clause: FilterClause = serde_json::from_str(r#"{ "path": "age", "op": "lt", "values": ["3"] }"#).unwrap();
        assert!(matches!(clause.compile("author", &schema()), Err(FilterError::InvalidPath(PathError::UnknownField { .. }))));
    }
}
