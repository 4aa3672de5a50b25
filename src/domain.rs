use std::fmt;

use chrono::Utc;
use compact_str::{CompactString, format_compact};
use tracing::warn;

/// Lower bound of the next fetch window, as a Unix timestamp
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
pub struct Cursor {
    value: i64,
}

impl Cursor {
    pub fn new(value: i64) -> Self {
        Self { value }
    }

    /// Cursor positioned at the current wall-clock time
    pub fn now() -> Self {
        Self::new(Utc::now().timestamp())
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Move the cursor to the server-reported date.
    ///
    /// Returns `false` and leaves the cursor untouched when `to` lies behind it.
    pub fn advance(&mut self, to: i64) -> bool {
        if to < self.value {
            warn!(
                cursor = self.value,
                current_date = to,
                "Server reported a date behind the cursor, keeping cursor"
            );
            return false;
        }
        self.value = to;
        true
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Review status codes reported by the upstream API
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Parse a status code. Matching is exact: case variants are unknown codes.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Fixed user-facing verdict for this status
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Homework {
    pub name: CompactString,
    pub status: HomeworkStatus,
}

/// Message announcing a status change of a single homework
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StatusMessage {
    pub homework: Homework,
    pub text: CompactString,
}

impl StatusMessage {
    pub fn new(homework: Homework) -> Self {
        let text = format_compact!(
            "Изменился статус проверки работы \"{}\". {}",
            homework.name,
            homework.status.verdict()
        );
        Self { homework, text }
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
