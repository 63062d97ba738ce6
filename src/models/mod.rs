//! # Models
//!
//! The single entity managed by the service and its client-facing body.

pub mod http_check;

pub use http_check::{HttpCheck, HttpCheckDefinition};
