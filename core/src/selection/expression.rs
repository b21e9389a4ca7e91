//! Boolean composition of compiled predicates.

use crate::predicate::CompiledPredicate;
use crate::selection::filter::{Evaluate, Filterable};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpression {
    Predicate(CompiledPredicate),
    And(Box<FilterExpression>, Box<FilterExpression>),
    Or(Box<FilterExpression>, Box<FilterExpression>),
    Not(Box<FilterExpression>),
}

impl FilterExpression {
    pub fn and(self, other: impl Into<FilterExpression>) -> Self { FilterExpression::And(Box::new(self), Box::new(other.into())) }

    pub fn or(self, other: impl Into<FilterExpression>) -> Self { FilterExpression::Or(Box::new(self), Box::new(other.into())) }

    pub fn negate(self) -> Self { FilterExpression::Not(Box::new(self)) }

    /// Conjunction of all `predicates`; `None` if there are none
    pub fn all(predicates: impl IntoIterator<Item = CompiledPredicate>) -> Option<Self> {
        predicates.into_iter().map(FilterExpression::Predicate).reduce(FilterExpression::and)
    }

    /// Disjunction of all `predicates`; `None` if there are none
    pub fn any(predicates: impl IntoIterator<Item = CompiledPredicate>) -> Option<Self> {
        predicates.into_iter().map(FilterExpression::Predicate).reduce(FilterExpression::or)
    }
}

impl From<CompiledPredicate> for FilterExpression {
    fn from(predicate: CompiledPredicate) -> Self { FilterExpression::Predicate(predicate) }
}

impl Evaluate for FilterExpression {
    fn test<E: Filterable + ?Sized>(&self, item: &E) -> bool {
        match self {
            FilterExpression::Predicate(predicate) => predicate.test(item),
            FilterExpression::And(left, right) => left.test(item) && right.test(item),
            FilterExpression::Or(left, right) => left.test(item) || right.test(item),
            FilterExpression::Not(inner) => !inner.test(item),
        }
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterExpression::Predicate(predicate) => write!(f, "{}", predicate),
            FilterExpression::And(left, right) => write!(f, "({} AND {})", left, right),
            FilterExpression::Or(left, right) => write!(f, "({} OR {})", left, right),
            FilterExpression::Not(inner) => write!(f, "NOT {}", inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operator::Operator;
    use crate::path::Path;
    use crate::schema::{EntityDef, StaticSchema};
    use crate::selection::filter::FieldValue;
    use crate::value::{Value, ValueType};

    struct User {
        name: &'static str,
        age: i64,
    }

    impl Filterable for User {
        fn collection(&self) -> &str { "user" }

        fn value(&self, name: &str) -> FieldValue<'_> {
            match name {
                "name" => Value::from(self.name).into(),
                "age" => Value::I64(self.age).into(),
                _ => FieldValue::Absent,
            }
        }
    }

    fn schema() -> StaticSchema {
        StaticSchema::new().with(EntityDef::new("user", ValueType::I64).attribute("name", ValueType::String).attribute("age", ValueType::I64))
    }

    fn compile(field: &str, op: Operator, values: &[&str]) -> CompiledPredicate {
        let schema = schema();
        op.contextualize(Path::parse("user", field, &schema).unwrap(), values, &schema).unwrap()
    }

    #[test]
    fn test_and_or_not() {
        let adult = compile("age", Operator::Ge, &["18"]);
        let named_a = compile("name", Operator::Prefix, &["a"]);

        let both = FilterExpression::from(adult.clone()).and(named_a.clone());
        let either = FilterExpression::from(adult.clone()).or(named_a.clone());
        let minor = FilterExpression::from(adult).negate();

        let alice = User { name: "Alice", age: 30 };
        let anna = User { name: "Anna", age: 12 };
        let bob = User { name: "Bob", age: 12 };

        assert!(both.test(&alice));
        assert!(!both.test(&anna));
        assert!(either.test(&anna));
        assert!(!either.test(&bob));
        assert!(minor.test(&bob));
        assert!(!minor.test(&alice));
    }

    #[test]
    fn test_all_and_any() {
        let clauses = || vec![compile("age", Operator::Gt, &["10"]), compile("name", Operator::In, &["Bob"])];
        let bob = User { name: "Bob", age: 12 };
        let carl = User { name: "Carl", age: 12 };

        let all = FilterExpression::all(clauses()).unwrap();
        assert!(all.test(&bob));
        assert!(!all.test(&carl));
        assert!(FilterExpression::any(clauses()).unwrap().test(&carl));
        assert_eq!(FilterExpression::all(Vec::new()), None);
    }

    #[test]
    fn test_display() {
        let expr = FilterExpression::from(compile("age", Operator::Lt, &["3"])).or(compile("name", Operator::IsNull, &[])).negate();
        assert_eq!(expr.to_string(), "NOT (age lt [3] OR name isnull [])");
    }
}
