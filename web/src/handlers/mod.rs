//! HTTP request handlers.

pub mod health;
pub mod resource;

pub use health::{health_check, readiness_check};
