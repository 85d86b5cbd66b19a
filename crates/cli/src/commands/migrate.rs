//! `casebook migrate` subcommands. Results go to stdout as JSON; logs go to stderr.

use anyhow::Result;
use casebook_service::MigrationService;

pub(crate) async fn run(service: &MigrationService) -> Result<()> {
    let summary = service.run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

pub(crate) async fn status(service: &MigrationService) -> Result<()> {
    let report = service.status().await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) async fn history(service: &MigrationService) -> Result<()> {
    let records = service.list_records().await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
