//! Translation of homework records into status messages

use serde_json::Value;
use thiserror::Error;

use crate::domain::{Homework, HomeworkStatus, StatusMessage};

pub const NAME_FIELD: &str = "homework_name";
pub const STATUS_FIELD: &str = "status";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatusError {
    #[error("В ответе API отсутствует ключ {field}")]
    MissingField { field: &'static str },

    #[error("Обнаружен недокументированный статус домашней работы: \"{status}\"")]
    UnknownStatus { status: String },
}

/// Build the status message for a single homework record.
///
/// `homework_name` and `status` must be present as strings and `status` must be
/// one of the known codes; anything else fails.
pub fn map_status(record: &Value) -> Result<StatusMessage, StatusError> {
    Ok(StatusMessage::new(parse_homework(record)?))
}

pub fn parse_homework(record: &Value) -> Result<Homework, StatusError> {
    let name = string_field(record, NAME_FIELD)?;
    let code = string_field(record, STATUS_FIELD)?;

    let status = HomeworkStatus::from_code(code)
        .ok_or_else(|| StatusError::UnknownStatus { status: code.to_string() })?;

    Ok(Homework { name: name.into(), status })
}

fn string_field<'a>(record: &'a Value, field: &'static str) -> Result<&'a str, StatusError> {
    record
        .get(field)
        .and_then(Value::as_str)
        .ok_or(StatusError::MissingField { field })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn approved_message_contains_name_and_verdict() {
        let message = map_status(&json!({"homework_name": "X", "status": "approved"})).unwrap();
        assert_eq!(
            message.text,
            "Изменился статус проверки работы \"X\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
        assert!(message.text.contains("ревьюеру всё понравилось"));
    }

    #[test]
    fn every_known_status_maps() {
        let cases = [
            ("approved", HomeworkStatus::Approved),
            ("reviewing", HomeworkStatus::Reviewing),
            ("rejected", HomeworkStatus::Rejected),
        ];
        for (code, expected) in cases {
            let message = map_status(&json!({"homework_name": "hw", "status": code})).unwrap();
            assert_eq!(message.homework.status, expected);
            assert!(message.text.ends_with(expected.verdict()));
        }
    }

    #[test]
    fn unknown_statuses_fail_closed() {
        for code in ["Approved", "REVIEWING", "", "done", " rejected"] {
            let result = map_status(&json!({"homework_name": "hw", "status": code}));
            assert_eq!(
                result,
                Err(StatusError::UnknownStatus { status: code.to_string() }),
                "status {code:?} should be rejected"
            );
        }
    }

    #[test]
    fn missing_fields() {
        assert_eq!(
            map_status(&json!({"status": "approved"})),
            Err(StatusError::MissingField { field: "homework_name" })
        );
        assert_eq!(
            map_status(&json!({"homework_name": "hw"})),
            Err(StatusError::MissingField { field: "status" })
        );
    }

    #[test]
    fn non_string_fields_count_as_missing() {
        assert_eq!(
            map_status(&json!({"homework_name": 7, "status": "approved"})),
            Err(StatusError::MissingField { field: "homework_name" })
        );
        assert_eq!(
            map_status(&json!("hw")),
            Err(StatusError::MissingField { field: "homework_name" })
        );
    }

    #[test]
    fn name_is_substituted_verbatim() {
        let message =
            map_status(&json!({"homework_name": "user__hw05.zip", "status": "reviewing"})).unwrap();
        assert_eq!(message.homework.name, "user__hw05.zip");
        assert_eq!(
            message.text,
            "Изменился статус проверки работы \"user__hw05.zip\". Работа взята на проверку ревьюером."
        );
    }
}
