//! Resolution outcome types.

use std::fmt;
use std::path::{Path, PathBuf};

/// How a resolved path was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The authority (or the locator itself) disclosed the path.
    Direct,
    /// The content was copied into the private cache directory.
    Materialized,
}

/// Why a locator could not be turned into a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// Input could not be parsed as a locator at all.
    InvalidLocator,
    /// Scheme is neither `content` nor `file`.
    UnsupportedScheme,
    /// External-storage volume other than `primary`.
    UnsupportedStorageType,
    EmptyDocumentId,
    /// Document id lacks its `type:value` structure or a row id is not numeric.
    MalformedDocumentId,
    /// Provider answered but had no row or value.
    NoProviderRow,
    /// Provider query failed.
    ProviderQuery,
    /// Locator has no usable path segment.
    MissingPathSegment,
    /// Copy into the cache failed.
    Materialize,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnresolvedReason::InvalidLocator => "invalid locator",
            UnresolvedReason::UnsupportedScheme => "unsupported scheme",
            UnresolvedReason::UnsupportedStorageType => "unsupported storage type",
            UnresolvedReason::EmptyDocumentId => "empty document id",
            UnresolvedReason::MalformedDocumentId => "malformed document id",
            UnresolvedReason::NoProviderRow => "no provider row",
            UnresolvedReason::ProviderQuery => "provider query failed",
            UnresolvedReason::MissingPathSegment => "missing path segment",
            UnresolvedReason::Materialize => "materialization failed",
        };
        f.write_str(s)
    }
}

/// Result of resolving a locator. Failures are values, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved {
        path: PathBuf,
        source: ResolutionSource,
    },
    Unresolved(UnresolvedReason),
}

impl Resolution {
    pub(crate) fn direct(path: impl Into<PathBuf>) -> Self {
        Resolution::Resolved {
            path: path.into(),
            source: ResolutionSource::Direct,
        }
    }

    pub(crate) fn materialized(path: PathBuf) -> Self {
        Resolution::Resolved {
            path,
            source: ResolutionSource::Materialized,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Resolved { path, .. } => Some(path),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Resolution::Resolved { path, .. } => Some(path),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn source(&self) -> Option<ResolutionSource> {
        match self {
            Resolution::Resolved { source, .. } => Some(*source),
            Resolution::Unresolved(_) => None,
        }
    }

    pub fn unresolved_reason(&self) -> Option<UnresolvedReason> {
        match self {
            Resolution::Resolved { .. } => None,
            Resolution::Unresolved(reason) => Some(*reason),
        }
    }
}
