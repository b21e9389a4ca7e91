use crate::id::EntityId;
use crate::value::{Value, ValueType};
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CastError {
    /// Invalid format for the target type (e.g., non-numeric text against a numeric field)
    #[error("Invalid value '{value}' for type {target_type}")]
    InvalidFormat { value: String, target_type: ValueType },
}

/// Coerce a raw textual filter argument into the declared type of a field.
///
/// Textual targets pass through unchanged; every other target is parsed with that type's
/// canonical parser.
pub fn coerce(raw: &str, target_type: ValueType) -> Result<Value, CastError> {
    match target_type {
        ValueType::String => Ok(Value::String(raw.to_string())),
        ValueType::I16 => raw.parse().map(Value::I16).map_err(|_| invalid(raw, target_type)),
        ValueType::I32 => raw.parse().map(Value::I32).map_err(|_| invalid(raw, target_type)),
        ValueType::I64 => raw.parse().map(Value::I64).map_err(|_| invalid(raw, target_type)),
        ValueType::F64 => raw.parse().map(Value::F64).map_err(|_| invalid(raw, target_type)),
        ValueType::Bool => match raw.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" => Ok(Value::Bool(false)),
            _ => Err(invalid(raw, target_type)),
        },
        ValueType::EntityId => raw.parse::<EntityId>().map(Value::EntityId).map_err(|_| invalid(raw, target_type)),
        ValueType::Timestamp => DateTime::parse_from_rfc3339(raw)
            .map(|ts| Value::Timestamp(ts.with_timezone(&Utc)))
            .map_err(|_| invalid(raw, target_type)),
    }
}

fn invalid(raw: &str, target_type: ValueType) -> CastError { CastError::InvalidFormat { value: raw.to_string(), target_type } }
