//! Core types for casebook schema migrations
//!
//! Domain types shared by the storage, service, HTTP and CLI crates.

mod constants;
mod env_config;
mod migration;

pub use constants::*;
pub use env_config::*;
pub use migration::*;
