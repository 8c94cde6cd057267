//! Cache materializer.
//!
//! Fallback used whenever an authority does not disclose a real path: the
//! locator's bytes are copied into `<cache_dir>/<sanitized name>` and that
//! path is returned. Entries are overwritten on every materialization and
//! never evicted here.

mod writer;

pub use writer::{CacheWriter, TEMP_SUFFIX};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::locator::Locator;
use crate::metadata::{mime_type, sanitize_filename};
use crate::provider::{ContentProvider, ProviderError, DISPLAY_NAME_COLUMN};

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("relative locator {0:?} cannot be materialized")]
    Relative(String),
    #[error("no usable file name for {0}")]
    NoFileName(String),
    #[error("failed to create cache directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open content of {locator}")]
    Open {
        locator: String,
        #[source]
        source: ProviderError,
    },
    #[error("failed to write cache file {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Copies provider-backed content into a private cache directory.
pub struct CacheMaterializer<'a, P: ?Sized> {
    provider: &'a P,
    cache_dir: &'a Path,
}

impl<'a, P: ContentProvider + ?Sized> CacheMaterializer<'a, P> {
    pub fn new(provider: &'a P, cache_dir: &'a Path) -> Self {
        Self {
            provider,
            cache_dir,
        }
    }

    pub fn cache_dir(&self) -> &Path {
        self.cache_dir
    }

    /// Materializes `locator` and returns the absolute path of the cache
    /// entry. Nothing is returned unless the whole stream was copied.
    pub fn materialize(&self, locator: &Locator) -> Result<PathBuf, MaterializeError> {
        if locator.is_relative() {
            return Err(MaterializeError::Relative(locator.to_string()));
        }

        let file_name = self
            .display_name(locator)
            .or_else(|| {
                sanitize_filename(locator.last_path_segment().map(str::trim))
                    .filter(|name| !name.is_empty())
            })
            .ok_or_else(|| MaterializeError::NoFileName(locator.to_string()))?;

        fs::create_dir_all(self.cache_dir).map_err(|source| MaterializeError::CreateDir {
            path: self.cache_dir.to_path_buf(),
            source,
        })?;

        let dest = self.cache_dir.join(&file_name);
        tracing::debug!(
            locator = %locator,
            file_name = %file_name,
            mime = mime_type(locator.path()),
            "materializing into cache"
        );

        let mut reader =
            self.provider
                .open_read(locator)
                .map_err(|source| MaterializeError::Open {
                    locator: locator.to_string(),
                    source,
                })?;

        let write_err = |source: io::Error| MaterializeError::Write {
            path: dest.clone(),
            source,
        };
        let mut writer = CacheWriter::create_in(self.cache_dir).map_err(write_err)?;
        tracing::trace!(temp = %writer.temp_path().display(), "copying into temp file");
        let copied = writer.copy_from(&mut reader).map_err(write_err)?;
        drop(reader);
        writer.sync().map_err(write_err)?;
        writer.finalize(&dest).map_err(write_err)?;

        let dest = std::path::absolute(&dest).map_err(write_err)?;
        tracing::info!(bytes = copied, path = %dest.display(), "materialized cache entry");
        Ok(dest)
    }

    /// Best-effort display name lookup. Provider errors only cost us the
    /// nicer name.
    fn display_name(&self, locator: &Locator) -> Option<String> {
        match self
            .provider
            .query_column(locator, DISPLAY_NAME_COLUMN, None)
        {
            Ok(name) => sanitize_filename(name.as_deref()).filter(|n| !n.is_empty()),
            Err(err) => {
                tracing::debug!(locator = %locator, error = %err, "display name unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::memory::{Failure, InMemoryProvider};

    const LOC: &str = "content://com.example.files/item/7";

    fn loc(s: &str) -> Locator {
        Locator::parse(s).unwrap()
    }

    #[test]
    fn copies_bytes_under_display_name() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("cache").join("Entries");
        let provider = InMemoryProvider::new()
            .with_column(LOC, DISPLAY_NAME_COLUMN, "Quarterly Report.pdf")
            .with_content(LOC, b"%PDF-1.7 body".to_vec());

        let path = CacheMaterializer::new(&provider, &cache)
            .materialize(&loc(LOC))
            .unwrap();

        assert!(path.is_absolute());
        assert_eq!(path, cache.join("Quarterly Report.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7 body");
    }

    #[test]
    fn display_name_with_path_is_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new()
            .with_column(LOC, DISPLAY_NAME_COLUMN, "../../escape.txt")
            .with_content(LOC, b"x".to_vec());

        let path = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        assert_eq!(path, dir.path().join("escape.txt"));
    }

    #[test]
    fn falls_back_to_last_segment_when_query_fails() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new()
            .with_query_failure(LOC, Failure::Unavailable("provider died".into()))
            .with_content(LOC, b"abc".to_vec());

        let path = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        assert_eq!(path, dir.path().join("7"));
        assert_eq!(fs::read(&path).unwrap(), b"abc");
    }

    #[test]
    fn empty_display_name_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new()
            .with_column(LOC, DISPLAY_NAME_COLUMN, "")
            .with_content(LOC, b"abc".to_vec());

        let path = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        assert_eq!(path.file_name().unwrap(), "7");
    }

    #[test]
    fn relative_locator_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new();
        let err = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc("relative/file.txt"))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Relative(_)));
        assert!(provider.queries().is_empty());
    }

    #[test]
    fn no_name_at_all_fails() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new();
        let err = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc("content://com.example.files"))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::NoFileName(_)));
    }

    #[test]
    fn missing_content_fails_without_creating_entry() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new();
        let err = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Open { .. }));
        assert!(!dir.path().join("7").exists());
    }

    #[test]
    fn denied_open_surfaces_provider_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = InMemoryProvider::new()
            .with_content(LOC, b"abc".to_vec())
            .with_open_failure(LOC, Failure::PermissionDenied("grant expired".into()));
        let err = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap_err();
        let MaterializeError::Open { source, .. } = &err else {
            panic!("expected Open, got {err:?}");
        };
        assert!(matches!(source, ProviderError::PermissionDenied(_)));
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            format!("failed to open content of {LOC}: permission denied: grant expired")
        );
        assert!(!dir.path().join("7").exists());
    }

    #[test]
    fn synced_copy_is_complete_and_temp_free() {
        let dir = tempfile::tempdir().unwrap();
        let body: Vec<u8> = (0u8..=255).cycle().take(64 * 1024).collect();
        let provider = InMemoryProvider::new().with_content(LOC, body.clone());
        let path = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), body);
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("7")]);
    }

    #[test]
    fn broken_stream_leaves_previous_entry_untouched() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("7"), b"previous complete copy").unwrap();
        let provider = InMemoryProvider::new().with_truncated_content(LOC, b"partial".to_vec());

        let err = CacheMaterializer::new(&provider, dir.path())
            .materialize(&loc(LOC))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::Write { .. }));
        assert_eq!(
            fs::read(dir.path().join("7")).unwrap(),
            b"previous complete copy"
        );
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(TEMP_SUFFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn cache_dir_blocked_by_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("cache");
        fs::write(&blocker, b"not a directory").unwrap();
        let provider = InMemoryProvider::new().with_content(LOC, b"abc".to_vec());

        let err = CacheMaterializer::new(&provider, &blocker.join("sub"))
            .materialize(&loc(LOC))
            .unwrap_err();
        assert!(matches!(err, MaterializeError::CreateDir { .. }));
    }

    #[test]
    fn rematerializing_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let first = InMemoryProvider::new().with_content(LOC, b"first version, long".to_vec());
        let second = InMemoryProvider::new().with_content(LOC, b"second".to_vec());

        let p1 = CacheMaterializer::new(&first, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        let p2 = CacheMaterializer::new(&second, dir.path())
            .materialize(&loc(LOC))
            .unwrap();
        assert_eq!(p1, p2);
        assert_eq!(fs::read(&p2).unwrap(), b"second");
    }
}
