//! Telegram bot reporting Practicum homework review status changes.
//!
//! The poller fetches updates newer than its cursor, validates the response,
//! maps the most recent homework to a message and sends it to a single chat.

pub mod client;
pub mod config;
pub mod domain;
pub mod logging;
pub mod notifier;
pub mod result;
pub mod startup;
pub mod status;
pub mod validator;
