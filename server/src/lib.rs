//! Eventhub server: configuration and startup.
//!
//! The `eventhub` binary loads [`config::Config`], builds the database with
//! [`bootstrap::build_database`] and serves [`eventhub_web::build_router`].

pub mod bootstrap;
pub mod config;

pub use bootstrap::{build_database, seed, SEED_CATEGORY};
pub use config::Config;
