use crate::value::Value;
use std::cmp::Ordering;

impl Value {
    /// Compare two values in their typed order.
    ///
    /// Values of the same type compare directly. Values within the numeric family are widened
    /// (to i64 when both sides are integral, otherwise to f64) before comparing. Returns `None`
    /// for different type families and for NaN.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
            (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
            (Value::EntityId(l), Value::EntityId(r)) => Some(l.cmp(r)),
            (Value::Timestamp(l), Value::Timestamp(r)) => Some(l.cmp(r)),
            (l, r) => match (l.as_i64(), r.as_i64()) {
                (Some(l), Some(r)) => Some(l.cmp(&r)),
                _ => l.as_f64()?.partial_cmp(&r.as_f64()?),
            },
        }
    }

    /// Typed equality, with the same widening rules as [`Value::compare`].
    pub fn matches(&self, other: &Value) -> bool { self.compare(other) == Some(Ordering::Equal) }

    fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I16(n) => Some(*n as i64),
            Value::I32(n) => Some(*n as i64),
            Value::I64(n) => Some(*n),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(n) => Some(*n),
            other => other.as_i64().map(|n| n as f64),
        }
    }
}
