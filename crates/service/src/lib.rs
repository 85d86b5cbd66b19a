//! Service layer for casebook migrations
//!
//! Holds the migration runner between the HTTP/CLI surfaces and the
//! storage and file-system collaborators it is constructed with.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod config;
mod error;
mod migration_service;
mod source;

pub use config::RunnerConfig;
pub use error::{ApplyError, FileSystemError, MigrationError};
pub use migration_service::MigrationService;
pub use source::{DirSource, MigrationSource};
