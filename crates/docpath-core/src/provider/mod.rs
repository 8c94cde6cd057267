//! Content provider contracts.
//!
//! The resolver never talks to a platform directly; it goes through these
//! traits. A host implements them on top of whatever content system it has
//! (Android `ContentResolver`, a sandboxed file picker, a test double).

pub mod memory;

use std::io::Read;

use crate::locator::Locator;

/// Column holding a provider's human-readable file name.
pub const DISPLAY_NAME_COLUMN: &str = "_display_name";
/// Column holding a provider's stored filesystem path.
pub const DATA_COLUMN: &str = "_data";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("no such resource: {0}")]
    NotFound(String),
    #[error("column {0:?} is not present")]
    MissingColumn(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Row filter passed along with a metadata query (`_id=?` plus arguments).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub clause: String,
    pub args: Vec<String>,
}

impl Selection {
    /// `_id=?` with a single row id argument.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            clause: "_id=?".to_string(),
            args: vec![id.into()],
        }
    }
}

/// Metadata lookups against a locator.
pub trait MetadataProvider {
    /// Returns the value of `column` in the first matching row, `Ok(None)`
    /// when there is no row or the value is null.
    fn query_column(
        &self,
        locator: &Locator,
        column: &str,
        selection: Option<&Selection>,
    ) -> Result<Option<String>, ProviderError>;
}

/// Access to the bytes behind a locator.
pub trait ByteStreamProvider {
    /// Opens a reader over the locator's content. The stream is closed when
    /// the returned box is dropped.
    fn open_read(&self, locator: &Locator) -> Result<Box<dyn Read + '_>, ProviderError>;
}

/// Everything the resolver needs from a host.
pub trait ContentProvider: MetadataProvider + ByteStreamProvider {}

impl<T: MetadataProvider + ByteStreamProvider + ?Sized> ContentProvider for T {}
