//! Log archive
//!
//! Raw report text is written to one file per request, named after the
//! second it arrived. Two reports in the same second share a name and the
//! later one overwrites the earlier.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Counts from one retention sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

/// Store for raw report text
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Persists `content` and returns the reference used in log links
    async fn store(&self, content: &str) -> Result<String>;

    /// Deletes entries older than `max_age`
    ///
    /// Per-entry failures are counted, not returned.
    async fn sweep(&self, max_age: Duration) -> Result<SweepReport>;
}

/// Filesystem implementation of [`LogStore`]
#[derive(Debug, Clone)]
pub struct FsLogStore {
    root: PathBuf,
}

impl FsLogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `YYYY-MM-DD.HH-MM-SS.log` for the given receipt time
    pub fn file_name(at: &DateTime<Local>) -> String {
        at.format("%Y-%m-%d.%H-%M-%S.log").to_string()
    }

    /// Write `content` under the name derived from `at`
    pub async fn store_at(&self, content: &str, at: DateTime<Local>) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(ArchiveError::io(&self.root))?;

        let file_name = Self::file_name(&at);
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, content)
            .await
            .map_err(ArchiveError::io(&path))?;

        Ok(file_name)
    }

    /// Delete files whose modification time is more than `max_age` before `now`
    pub async fn sweep_at(&self, now: SystemTime, max_age: Duration) -> Result<SweepReport> {
        let mut report = SweepReport::default();

        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!("Log directory {} does not exist yet", self.root.display());
                return Ok(report);
            }
            Err(err) => return Err(ArchiveError::io(&self.root)(err)),
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    tracing::warn!("Failed to read {}: {}", self.root.display(), err);
                    report.failed += 1;
                    break;
                }
            };
            let path = entry.path();

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!("Failed to stat {}: {}", path.display(), err);
                    report.failed += 1;
                    continue;
                }
            };
            report.scanned += 1;

            let age = match metadata.modified() {
                Ok(modified) => now.duration_since(modified).unwrap_or_default(),
                Err(err) => {
                    tracing::warn!("No modification time for {}: {}", path.display(), err);
                    report.failed += 1;
                    continue;
                }
            };
            if age <= max_age {
                continue;
            }

            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!("Deleted old log file: {}", entry.file_name().to_string_lossy());
                    report.deleted += 1;
                }
                Err(err) => {
                    tracing::warn!("Failed to delete {}: {}", path.display(), err);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl LogStore for FsLogStore {
    async fn store(&self, content: &str) -> Result<String> {
        self.store_at(content, Local::now()).await
    }

    async fn sweep(&self, max_age: Duration) -> Result<SweepReport> {
        self.sweep_at(SystemTime::now(), max_age).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(86_400);

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    fn age_file(path: &Path, age: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn test_file_name_format() {
        assert_eq!(FsLogStore::file_name(&at(2, 3, 4)), "2024-05-01.02-03-04.log");
    }

    #[tokio::test]
    async fn test_store_creates_root_and_writes_content() {
        let dir = TempDir::new().unwrap();
        let store = FsLogStore::new(dir.path().join("logs"));

        let name = store.store_at("report body", at(2, 0, 0)).await.unwrap();

        assert_eq!(name, "2024-05-01.02-00-00.log");
        let written = std::fs::read_to_string(store.root().join(&name)).unwrap();
        assert_eq!(written, "report body");
    }

    #[tokio::test]
    async fn test_same_second_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = FsLogStore::new(dir.path());

        let first = store.store_at("first", at(2, 0, 0)).await.unwrap();
        let second = store.store_at("second", at(2, 0, 0)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        let written = std::fs::read_to_string(dir.path().join(&second)).unwrap();
        assert_eq!(written, "second");
    }

    #[tokio::test]
    async fn test_store_uses_current_time() {
        let dir = TempDir::new().unwrap();
        let store = FsLogStore::new(dir.path());

        let name = store.store("now").await.unwrap();
        assert!(name.ends_with(".log"));
        assert_eq!(name.len(), "2024-05-01.02-00-00.log".len());
        assert!(dir.path().join(&name).exists());
    }

    #[tokio::test]
    async fn test_sweep_deletes_only_expired_files() {
        let dir = TempDir::new().unwrap();
        let store = FsLogStore::new(dir.path());
        let old = store.store_at("old", at(1, 0, 0)).await.unwrap();
        let fresh = store.store_at("fresh", at(2, 0, 0)).await.unwrap();
        age_file(&dir.path().join(&old), 4 * DAY);
        age_file(&dir.path().join(&fresh), DAY);
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let report = store.sweep(3 * DAY).await.unwrap();

        assert_eq!(
            report,
            SweepReport {
                scanned: 2,
                deleted: 1,
                failed: 0
            }
        );
        assert!(!dir.path().join(&old).exists());
        assert!(dir.path().join(&fresh).exists());
        assert!(dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_sweep_of_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FsLogStore::new(dir.path().join("absent"));

        let report = store.sweep(DAY).await.unwrap();
        assert_eq!(report, SweepReport::default());
    }

    #[tokio::test]
    async fn test_sweep_of_unreadable_root_is_error() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();

        let err = FsLogStore::new(&file).sweep(DAY).await.unwrap_err();
        assert!(err.to_string().contains("not-a-dir"));
    }
}
