use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::Mutex;

use super::{TelemetryError, TelemetryRecord};

/// Read and decode the whole telemetry file.
pub async fn load_telemetry(path: &Path) -> Result<Vec<TelemetryRecord>, TelemetryError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| io_error(path, e))?;

    let records: Vec<TelemetryRecord> =
        serde_json::from_slice(&bytes).map_err(|source| TelemetryError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), records = records.len(), "telemetry loaded");
    Ok(records)
}

fn io_error(path: &Path, source: io::Error) -> TelemetryError {
    if source.kind() == io::ErrorKind::NotFound {
        TelemetryError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        TelemetryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ─── Source with optional read-through cache ─────────────────────

/// Where handlers get their records from.
///
/// Without caching every call re-reads the file. With caching the file's
/// modification time is still checked on each call, so an edited file is
/// picked up and a deleted one still reports `NotFound`.
pub struct TelemetrySource {
    path: PathBuf,
    cache: Option<Mutex<Option<Cached>>>,
}

struct Cached {
    modified: SystemTime,
    records: Arc<Vec<TelemetryRecord>>,
}

impl TelemetrySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    pub fn cached(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Some(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub async fn load(&self) -> Result<Arc<Vec<TelemetryRecord>>, TelemetryError> {
        let Some(cache) = &self.cache else {
            return Ok(Arc::new(load_telemetry(&self.path).await?));
        };

        let modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|m| m.modified())
            .map_err(|e| io_error(&self.path, e))?;

        if let Some(hit) = cache.lock().as_ref() {
            if hit.modified == modified {
                tracing::debug!(path = %self.path.display(), "telemetry cache hit");
                return Ok(hit.records.clone());
            }
        }

        tracing::debug!(path = %self.path.display(), "telemetry cache miss");
        let records = Arc::new(load_telemetry(&self.path).await?);
        *cache.lock() = Some(Cached {
            modified,
            records: records.clone(),
        });
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    fn write_file(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("telemetry.json");
        fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_telemetry(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, TelemetryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "{ not json");
        let err = load_telemetry(&path).await.unwrap_err();
        assert!(matches!(err, TelemetryError::Malformed { .. }));
    }

    #[tokio::test]
    async fn loads_records_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            r#"[{"region":"a","latency_ms":1},{"region":"b","latency_ms":2,"uptime_pct":99}]"#,
        );
        let records = load_telemetry(&path).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region.as_deref(), Some("a"));
        assert_eq!(records[1].uptime_pct, 99.0);
    }

    #[tokio::test]
    async fn uncached_source_rereads_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"[{"region":"a"}]"#);
        let source = TelemetrySource::new(&path);
        assert!(!source.is_cached());
        assert_eq!(source.load().await.unwrap().len(), 1);

        fs::write(&path, r#"[{"region":"a"},{"region":"b"}]"#).unwrap();
        assert_eq!(source.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cached_source_reuses_records_until_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"[{"region":"a"}]"#);
        let source = TelemetrySource::cached(&path);

        let first = source.load().await.unwrap();
        let second = source.load().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        fs::write(&path, r#"[{"region":"a"},{"region":"b"}]"#).unwrap();
        let later = SystemTime::now() + Duration::from_secs(60);
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(later)
            .unwrap();

        assert_eq!(source.load().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn cached_source_still_reports_deleted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, r#"[{"region":"a"}]"#);
        let source = TelemetrySource::cached(&path);
        source.load().await.unwrap();

        fs::remove_file(&path).unwrap();
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, TelemetryError::NotFound { .. }));
    }
}
