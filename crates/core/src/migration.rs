use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SQL_EXTENSION;

/// Ledger row for a migration whose body has been executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    pub name: String,
    pub applied_at: DateTime<Utc>,
}

/// A migration file found in the migrations directory.
///
/// The body is not held here; it is read from the source at apply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationFile {
    /// Ledger key: `file_name` without the `.sql` extension.
    pub name: String,
    /// Directory entry name. Also the sort key.
    pub file_name: String,
}

impl MigrationFile {
    /// Returns `None` for entries that are not migrations.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        migration_name(file_name)
            .map(|name| Self { name: name.to_owned(), file_name: file_name.to_owned() })
    }
}

/// Derive the ledger name of a migration file.
///
/// `005_add_index.sql` becomes `005_add_index`. The extension match is
/// case-sensitive and nothing else about the name is changed. A bare
/// `.sql` has no usable name and yields `None`.
pub fn migration_name(file_name: &str) -> Option<&str> {
    file_name.strip_suffix(SQL_EXTENSION).filter(|name| !name.is_empty())
}

/// Turn raw directory entries into migration files in apply order.
///
/// Order is plain byte-wise comparison of file names. Numeric prefixes must
/// be zero-padded for this to match authoring order.
pub fn collect_migration_files<I, S>(entries: I) -> Vec<MigrationFile>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut files: Vec<MigrationFile> = entries
        .into_iter()
        .filter_map(|entry| {
            let entry = entry.as_ref();
            let file = MigrationFile::from_file_name(entry);
            if file.is_none() && entry == SQL_EXTENSION {
                tracing::warn!(entry, "skipping migration file with an empty name");
            }
            file
        })
        .collect();
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    files
}

/// Files from `available` whose name is absent from `applied`, order kept.
pub fn pending_files<'a>(applied: &[String], available: &'a [MigrationFile]) -> Vec<&'a MigrationFile> {
    let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();
    available.iter().filter(|file| !applied.contains(file.name.as_str())).collect()
}

/// Counts reported by a migration run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub applied: usize,
    pub failed: usize,
}

/// Read-only comparison of the ledger against the migration directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    /// Ledger names in the order they were applied.
    pub applied: Vec<String>,
    /// Available names not yet in the ledger, in file order.
    pub pending: Vec<String>,
    /// Number of migration files available.
    pub total: usize,
    pub applied_count: usize,
    pub pending_count: usize,
}

impl StatusReport {
    pub fn new(applied: Vec<String>, available: &[MigrationFile]) -> Self {
        let pending: Vec<String> =
            pending_files(&applied, available).into_iter().map(|file| file.name.clone()).collect();
        Self {
            total: available.len(),
            applied_count: applied.len(),
            pending_count: pending.len(),
            applied,
            pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_strips_only_the_extension() {
        assert_eq!(migration_name("005_add_index.sql"), Some("005_add_index"));
        assert_eq!(migration_name("2024.01.01_seed.sql"), Some("2024.01.01_seed"));
        assert_eq!(migration_name("001_a.sql.sql"), Some("001_a.sql"));
    }

    #[test]
    fn name_rejects_other_entries() {
        assert_eq!(migration_name("README.md"), None);
        assert_eq!(migration_name("001_init.SQL"), None);
        assert_eq!(migration_name("001_init.sql.bak"), None);
        assert_eq!(migration_name(".sql"), None);
    }

    #[test]
    fn collect_sorts_lexically_and_filters() {
        let files = collect_migration_files(["003_c.sql", "notes.txt", "001_a.sql", "002_b.sql"]);
        let names: Vec<&str> = files.iter().map(|f| f.file_name.as_str()).collect();
        assert_eq!(names, ["001_a.sql", "002_b.sql", "003_c.sql"]);
        assert_eq!(files[0].name, "001_a");
    }

    #[test]
    fn collect_does_not_sort_numerically() {
        let files = collect_migration_files(["10_late.sql", "9_early.sql", "2_mid.sql"]);
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["10_late", "2_mid", "9_early"]);
    }

    #[test]
    fn pending_preserves_file_order() {
        let available = collect_migration_files(["001_a.sql", "002_b.sql", "003_c.sql"]);
        let applied = vec!["002_b".to_owned()];
        let pending: Vec<&str> =
            pending_files(&applied, &available).iter().map(|f| f.name.as_str()).collect();
        assert_eq!(pending, ["001_a", "003_c"]);
    }

    #[test]
    fn pending_requires_exact_match() {
        let available = collect_migration_files(["001_a.sql"]);
        let applied = vec!["001_A".to_owned(), "001_a ".to_owned()];
        assert_eq!(pending_files(&applied, &available).len(), 1);
    }

    #[test]
    fn status_report_counts() {
        let available = collect_migration_files(["001_init.sql", "002_seed.sql"]);
        let report = StatusReport::new(vec!["001_init".to_owned()], &available);
        assert_eq!(report.applied, ["001_init"]);
        assert_eq!(report.pending, ["002_seed"]);
        assert_eq!(report.total, 2);
        assert_eq!(report.applied_count, 1);
        assert_eq!(report.pending_count, 1);
    }

    #[test]
    fn status_report_serializes_camel_case() {
        let report = StatusReport::new(Vec::new(), &[]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "applied": [],
                "pending": [],
                "total": 0,
                "appliedCount": 0,
                "pendingCount": 0
            })
        );
    }

    #[test]
    fn run_summary_serializes_counts() {
        let json = serde_json::to_value(RunSummary { applied: 2, failed: 0 }).unwrap();
        assert_eq!(json, serde_json::json!({"applied": 2, "failed": 0}));
    }
}
