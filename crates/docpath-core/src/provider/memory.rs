//! In-memory content provider.
//!
//! Backs locators with registered column values and byte blobs, records
//! every query and open, and can inject failures. Keys are the locator
//! strings exactly as passed to [`Locator::parse`].

use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::sync::{Mutex, PoisonError};

use super::{ByteStreamProvider, MetadataProvider, ProviderError, Selection};
use crate::locator::Locator;

/// One call to [`MetadataProvider::query_column`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRecord {
    pub locator: String,
    pub column: String,
    pub selection: Option<Selection>,
}

#[derive(Debug, Clone)]
struct ColumnEntry {
    column: String,
    /// `None` matches any selection.
    selection: Option<Selection>,
    value: String,
}

/// Failure injected by [`InMemoryProvider::with_query_failure`] and
/// [`InMemoryProvider::with_open_failure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Unavailable(String),
    PermissionDenied(String),
    /// Reports the queried column as absent.
    MissingColumn,
    Io(io::ErrorKind),
}

impl Failure {
    fn to_error(&self, column: &str) -> ProviderError {
        match self {
            Failure::Unavailable(message) => ProviderError::Unavailable(message.clone()),
            Failure::PermissionDenied(message) => ProviderError::PermissionDenied(message.clone()),
            Failure::MissingColumn => ProviderError::MissingColumn(column.to_string()),
            Failure::Io(kind) => io::Error::new(*kind, "injected i/o failure").into(),
        }
    }
}

#[derive(Debug, Clone)]
enum Content {
    Complete(Vec<u8>),
    /// Yields the bytes, then fails instead of reporting end of stream.
    Truncated(Vec<u8>),
}

#[derive(Debug, Default)]
pub struct InMemoryProvider {
    columns: HashMap<String, Vec<ColumnEntry>>,
    contents: HashMap<String, Content>,
    failing_queries: HashMap<String, Failure>,
    failing_opens: HashMap<String, Failure>,
    queries: Mutex<Vec<QueryRecord>>,
    opens: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `column = value` for `locator`, whatever the selection.
    pub fn with_column(
        mut self,
        locator: &str,
        column: &str,
        value: impl Into<String>,
    ) -> Self {
        self.push_column(locator, column, None, value.into());
        self
    }

    /// Registers `column = value` for `locator`, only for queries made with
    /// exactly `selection`.
    pub fn with_row(
        mut self,
        locator: &str,
        column: &str,
        selection: Selection,
        value: impl Into<String>,
    ) -> Self {
        self.push_column(locator, column, Some(selection), value.into());
        self
    }

    pub fn with_content(mut self, locator: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.contents
            .insert(locator.to_string(), Content::Complete(bytes.into()));
        self
    }

    /// Content whose stream breaks after `bytes` have been read.
    pub fn with_truncated_content(mut self, locator: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.contents
            .insert(locator.to_string(), Content::Truncated(bytes.into()));
        self
    }

    /// Every metadata query against `locator` fails with `failure`.
    pub fn with_query_failure(mut self, locator: &str, failure: Failure) -> Self {
        self.failing_queries.insert(locator.to_string(), failure);
        self
    }

    /// Opening `locator` fails with `failure`, even if content is registered.
    pub fn with_open_failure(mut self, locator: &str, failure: Failure) -> Self {
        self.failing_opens.insert(locator.to_string(), failure);
        self
    }

    /// Metadata queries made so far, oldest first.
    pub fn queries(&self) -> Vec<QueryRecord> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Locators opened for reading so far, oldest first.
    pub fn opens(&self) -> Vec<String> {
        self.opens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push_column(
        &mut self,
        locator: &str,
        column: &str,
        selection: Option<Selection>,
        value: String,
    ) {
        self.columns
            .entry(locator.to_string())
            .or_default()
            .push(ColumnEntry {
                column: column.to_string(),
                selection,
                value,
            });
    }
}

impl MetadataProvider for InMemoryProvider {
    fn query_column(
        &self,
        locator: &Locator,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, ProviderError> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(QueryRecord {
                locator: locator.as_str().to_string(),
                column: column.to_string(),
                selection: selection.cloned(),
            });

        if let Some(failure) = self.failing_queries.get(locator.as_str()) {
            return Err(failure.to_error(column));
        }

        let value = self.columns.get(locator.as_str()).and_then(|entries| {
            entries
                .iter()
                .find(|e| {
                    e.column == column
                        && e.selection.as_ref().map_or(true, |s| Some(s) == selection)
                })
                .map(|e| e.value.clone())
        });
        Ok(value)
    }
}

impl ByteStreamProvider for InMemoryProvider {
    fn open_read(&self, locator: &Locator) -> Result<Box<dyn Read + '_>, ProviderError> {
        self.opens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(locator.as_str().to_string());

        if let Some(failure) = self.failing_opens.get(locator.as_str()) {
            return Err(failure.to_error(""));
        }

        match self.contents.get(locator.as_str()) {
            Some(Content::Complete(bytes)) => Ok(Box::new(Cursor::new(bytes.as_slice()))),
            Some(Content::Truncated(bytes)) => Ok(Box::new(TruncatedReader {
                inner: Cursor::new(bytes.as_slice()),
            })),
            None => Err(ProviderError::NotFound(locator.to_string())),
        }
    }
}

struct TruncatedReader<'a> {
    inner: Cursor<&'a [u8]>,
}

impl Read for TruncatedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.inner.read(buf)? {
            0 => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "content stream closed early",
            )),
            n => Ok(n),
        }
    }
}
