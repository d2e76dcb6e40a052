//! Contract smoke tests for the card-drawing conversation game API.
//!
//! The runner replays a fixed, ordered list of request/expectation pairs
//! against a live server and records one [`model::TestResult`] per case.

pub mod client;
pub mod config;
pub mod model;
pub mod report;
pub mod runner;

pub use config::HarnessConfig;
pub use runner::{Branch, ContractRunner};
