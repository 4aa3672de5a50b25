//! Shape checks for the homework status response

use serde_json::Value;
use thiserror::Error;

pub const HOMEWORKS_KEY: &str = "homeworks";
pub const CURRENT_DATE_KEY: &str = "current_date";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Ответ API содержит пустой словарь")]
    EmptyResponse,

    #[error("Ответ API не является словарём")]
    NotARecord,

    #[error("В ответе API отсутствует ключ {key}")]
    MissingKey { key: &'static str },

    #[error("Объект homeworks не является списком")]
    NotASequence,

    #[error("Значение current_date в ответе API не является целым числом")]
    InvalidCurrentDate,
}

/// Extract the homework list from a raw response.
///
/// Only the presence of `homeworks` is required; other keys are ignored. The
/// entries are returned as-is, field checks happen when a status is mapped.
pub fn validate(raw: &Value) -> Result<&[Value], ValidationError> {
    let record = as_record(raw)?;

    match record.get(HOMEWORKS_KEY) {
        Some(Value::Array(homeworks)) => Ok(homeworks),
        Some(_) => Err(ValidationError::NotASequence),
        None => Err(ValidationError::MissingKey { key: HOMEWORKS_KEY }),
    }
}

/// Extract the server-reported `current_date` from a raw response
pub fn current_date(raw: &Value) -> Result<i64, ValidationError> {
    let record = as_record(raw)?;

    match record.get(CURRENT_DATE_KEY) {
        Some(value) => value.as_i64().ok_or(ValidationError::InvalidCurrentDate),
        None => Err(ValidationError::MissingKey { key: CURRENT_DATE_KEY }),
    }
}

fn as_record(raw: &Value) -> Result<&serde_json::Map<String, Value>, ValidationError> {
    match raw {
        Value::Null => Err(ValidationError::EmptyResponse),
        Value::Object(map) if map.is_empty() => Err(ValidationError::EmptyResponse),
        Value::Array(items) if items.is_empty() => Err(ValidationError::EmptyResponse),
        Value::Object(map) => Ok(map),
        _ => Err(ValidationError::NotARecord),
    }
}
