//! Response types (Serialize)

use casebook_core::MigrationRecord;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub migrations: Vec<MigrationRecord>,
}
