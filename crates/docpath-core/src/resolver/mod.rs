//! Resource resolver.
//!
//! Classifies a locator by scheme and authority and turns it into a local
//! path, first match wins:
//!
//! 1. Document locators of a registered authority go through that
//!    authority's strategy (external storage, downloads, media).
//! 2. Other `content` locators: Google Photos yields its last path segment,
//!    everything else is copied into the cache.
//! 3. `file` locators yield their path.
//! 4. Anything else is unresolved.
//!
//! Nothing here returns an error: provider and I/O failures are logged and
//! folded into [`Resolution::Unresolved`].

mod authority;
mod document;
mod resolution;

pub use authority::{
    AuthorityKind, AuthorityTable, DOWNLOADS_AUTHORITY, EXTERNAL_STORAGE_AUTHORITY,
    GOOGLE_PHOTOS_AUTHORITY, MEDIA_AUTHORITY,
};
pub use document::{MediaCollection, MEDIA_STORE_AUTHORITY};
pub use resolution::{Resolution, ResolutionSource, UnresolvedReason};

use std::path::PathBuf;

use crate::attachment::Attachment;
use crate::config::DocpathConfig;
use crate::locator::{Locator, CONTENT_SCHEME, FILE_SCHEME};
use crate::materialize::CacheMaterializer;
use crate::provider::ContentProvider;

/// Everything the resolver needs besides the provider.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Root that `primary:` external-storage ids are relative to.
    pub public_storage_root: PathBuf,
    /// Directory cache entries are written to (created on demand).
    pub cache_dir: PathBuf,
    pub authorities: AuthorityTable,
}

impl ResolverSettings {
    /// Settings with the built-in authority table.
    pub fn new(public_storage_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_storage_root: public_storage_root.into(),
            cache_dir: cache_dir.into(),
            authorities: AuthorityTable::default(),
        }
    }

    /// Builds settings from a loaded config: XDG defaults for unset roots,
    /// configured authorities registered over the built-in ones.
    pub fn from_config(cfg: &DocpathConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let mut authorities = AuthorityTable::default();
        authorities.extend(cfg.authorities.clone());
        Ok(Self {
            public_storage_root: cfg.public_storage_root(),
            cache_dir: cfg.cache_dir()?,
            authorities,
        })
    }
}

/// Resolves locators against a content provider.
///
/// Holds no mutable state, so one resolver can serve several threads as
/// long as the provider is `Sync`.
pub struct Resolver<'p, P: ?Sized> {
    provider: &'p P,
    settings: ResolverSettings,
}

impl<'p, P: ContentProvider + ?Sized> Resolver<'p, P> {
    pub fn new(provider: &'p P, settings: ResolverSettings) -> Self {
        Self { provider, settings }
    }

    /// Parses `input` and resolves it. Unparseable input is unresolved.
    pub fn resolve_str(&self, input: &str) -> Resolution {
        match Locator::parse(input) {
            Ok(locator) => self.resolve(&locator),
            Err(err) => {
                tracing::debug!(input, error = %err, "rejecting locator");
                Resolution::Unresolved(UnresolvedReason::InvalidLocator)
            }
        }
    }

    pub fn resolve(&self, locator: &Locator) -> Resolution {
        let resolution = self.classify(locator);
        match &resolution {
            Resolution::Resolved { path, source } => {
                tracing::debug!(locator = %locator, path = %path.display(), ?source, "resolved");
            }
            Resolution::Unresolved(reason) => {
                tracing::debug!(locator = %locator, %reason, "unresolved");
            }
        }
        resolution
    }

    /// Resolves `locator` and describes the result as an upload attachment.
    /// `None` when unresolved or when the path is not a readable file.
    pub fn attachment(&self, locator: &Locator) -> Option<Attachment> {
        let Resolution::Resolved { path, source } = self.resolve(locator) else {
            return None;
        };
        match Attachment::from_path(path, source) {
            Ok(attachment) => Some(attachment),
            Err(err) => {
                tracing::warn!(locator = %locator, error = %err, "resolved path is not attachable");
                None
            }
        }
    }

    fn classify(&self, locator: &Locator) -> Resolution {
        let kind = locator
            .authority()
            .and_then(|authority| self.settings.authorities.get(authority));

        if let (Some(document_id), Some(kind)) = (locator.document_id(), kind) {
            if let Some(resolution) = self.resolve_document(kind, locator, document_id) {
                return resolution;
            }
        }

        if locator.has_scheme(CONTENT_SCHEME) {
            if kind == Some(AuthorityKind::GooglePhotos) {
                return match locator.last_path_segment() {
                    Some(segment) => Resolution::direct(segment),
                    None => Resolution::Unresolved(UnresolvedReason::MissingPathSegment),
                };
            }
            return self.materialize(locator);
        }

        if locator.has_scheme(FILE_SCHEME) {
            return Resolution::direct(locator.path());
        }

        Resolution::Unresolved(UnresolvedReason::UnsupportedScheme)
    }

    fn materialize(&self, locator: &Locator) -> Resolution {
        match CacheMaterializer::new(self.provider, &self.settings.cache_dir).materialize(locator)
        {
            Ok(path) => Resolution::materialized(path),
            Err(err) => {
                let err = anyhow::Error::new(err);
                tracing::warn!(locator = %locator, "materialization failed: {err:#}");
                Resolution::Unresolved(UnresolvedReason::Materialize)
            }
        }
    }
}
