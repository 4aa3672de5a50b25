//! Practicum client modules
//!
//! HTTP access to the homework status endpoint and the polling loop built on it.

pub mod api;
pub mod config;
pub mod error;
pub mod poller;

pub use api::PracticumApi;
pub use config::{ClientConfig, CycleOutcome, FixedInterval, PollingConfig, RetryPolicy};
pub use error::ClientError;
pub use poller::{HomeworkPoller, HomeworkPollerBuilder};
