//! Where migration files come from.

use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use casebook_core::SQL_EXTENSION;

use crate::error::FileSystemError;

/// Read access to the migration files.
#[async_trait]
pub trait MigrationSource: Send + Sync {
    /// Entry names in whatever order the backing store yields them.
    /// A missing directory is an empty list, not an error.
    async fn list_entries(&self) -> Result<Vec<String>, FileSystemError>;

    /// Full text of one entry returned by [`Self::list_entries`].
    async fn read_text(&self, file_name: &str) -> Result<String, FileSystemError>;
}

/// Migration files in a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    dir: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn list_error(&self, source: io::Error) -> FileSystemError {
        FileSystemError::List { path: self.dir.clone(), source }
    }
}

#[async_trait]
impl MigrationSource for DirSource {
    async fn list_entries(&self) -> Result<Vec<String>, FileSystemError> {
        let mut reader = match tokio::fs::read_dir(&self.dir).await {
            Ok(reader) => reader,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!(dir = %self.dir.display(), "migrations directory not found");
                return Ok(Vec::new());
            },
            Err(err) => return Err(self.list_error(err)),
        };

        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await.map_err(|e| self.list_error(e))? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!(entry = ?raw, "skipping non-UTF-8 directory entry");
                    continue;
                },
            };
            let file_type = entry.file_type().await.map_err(|e| self.list_error(e))?;
            if file_type.is_dir() {
                if name.ends_with(SQL_EXTENSION) {
                    tracing::warn!(entry = %name, "skipping directory named like a migration");
                }
                continue;
            }
            names.push(name);
        }
        Ok(names)
    }

    async fn read_text(&self, file_name: &str) -> Result<String, FileSystemError> {
        let path = self.dir.join(file_name);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| FileSystemError::Read { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_directory_lists_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let source = DirSource::new(temp_dir.path().join("does-not-exist"));
        assert!(source.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_files_and_skips_directories() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("001_init.sql"), "SELECT 1;").unwrap();
        std::fs::write(temp_dir.path().join("README.md"), "docs").unwrap();
        std::fs::create_dir(temp_dir.path().join("002_nested.sql")).unwrap();

        let source = DirSource::new(temp_dir.path());
        let mut names = source.list_entries().await.unwrap();
        names.sort();
        assert_eq!(names, ["001_init.sql", "README.md"]);
    }

    #[tokio::test]
    async fn reads_body_relative_to_directory() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("001_init.sql"), "CREATE TABLE t(id int);").unwrap();

        let source = DirSource::new(temp_dir.path());
        let body = source.read_text("001_init.sql").await.unwrap();
        assert_eq!(body, "CREATE TABLE t(id int);");
    }

    #[tokio::test]
    async fn read_of_missing_file_is_read_error() {
        let temp_dir = TempDir::new().unwrap();
        let source = DirSource::new(temp_dir.path());
        let err = source.read_text("404.sql").await.unwrap_err();
        match err {
            FileSystemError::Read { path, .. } => assert!(path.ends_with("404.sql")),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn path_that_is_a_file_is_list_error() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("migrations");
        std::fs::write(&file, "not a directory").unwrap();

        let err = DirSource::new(&file).list_entries().await.unwrap_err();
        assert!(matches!(err, FileSystemError::List { .. }));
    }
}
