//! Strategies for provider document locators.

use std::ffi::OsString;
use std::path::Path;

use super::authority::AuthorityKind;
use super::resolution::{Resolution, UnresolvedReason};
use super::Resolver;
use crate::locator::Locator;
use crate::provider::{ContentProvider, Selection, DATA_COLUMN};

/// Authority of the media store collections queried for `_data`.
pub const MEDIA_STORE_AUTHORITY: &str = "media";

/// Only external-storage volume that maps onto the public storage root.
const PRIMARY_VOLUME: &str = "primary";

/// Downloads document ids carrying an absolute path.
const RAW_PREFIX: &str = "raw:";

/// Media store collection a media document id points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCollection {
    Image,
    Video,
    Audio,
}

impl MediaCollection {
    /// Maps the type half of a media document id (`image:42` → `image`).
    pub fn from_type(media_type: &str) -> Option<Self> {
        match media_type {
            "image" => Some(MediaCollection::Image),
            "video" => Some(MediaCollection::Video),
            "audio" => Some(MediaCollection::Audio),
            _ => None,
        }
    }

    pub fn content_path(self) -> &'static str {
        match self {
            MediaCollection::Image => "/external/images/media",
            MediaCollection::Video => "/external/video/media",
            MediaCollection::Audio => "/external/audio/media",
        }
    }

    /// Locator of the whole collection (`content://media/external/...`).
    pub fn locator(self) -> Locator {
        Locator::content(MEDIA_STORE_AUTHORITY, self.content_path())
    }
}

impl<P: ContentProvider + ?Sized> Resolver<'_, P> {
    /// Resolves a document locator through its authority's strategy.
    /// `None` means the kind has no document strategy and the caller should
    /// keep classifying.
    pub(super) fn resolve_document(
        &self,
        kind: AuthorityKind,
        locator: &Locator,
        document_id: &str,
    ) -> Option<Resolution> {
        let resolution = match kind {
            AuthorityKind::ExternalStorage => {
                external_storage(&self.settings.public_storage_root, document_id)
            }
            AuthorityKind::Downloads => self.downloads(locator, document_id),
            AuthorityKind::Media => self.media(locator, document_id),
            AuthorityKind::GooglePhotos => return None,
        };
        Some(resolution)
    }

    fn downloads(&self, locator: &Locator, document_id: &str) -> Resolution {
        if document_id.is_empty() {
            return Resolution::Unresolved(UnresolvedReason::EmptyDocumentId);
        }
        match document_id.strip_prefix(RAW_PREFIX) {
            Some(raw) => Resolution::direct(raw),
            None => self.materialize(locator),
        }
    }

    fn media(&self, locator: &Locator, document_id: &str) -> Resolution {
        let (media_type, row_id) = match document_id.split_once(':') {
            Some((media_type, row_id)) => (media_type, Some(row_id)),
            None => (document_id, None),
        };

        let Some(collection) = MediaCollection::from_type(media_type) else {
            return self.materialize(locator);
        };

        let Some(row_id) = row_id.filter(|id| id.parse::<u64>().is_ok()) else {
            tracing::warn!(locator = %locator, document_id, "media document id has no numeric row id");
            return Resolution::Unresolved(UnresolvedReason::MalformedDocumentId);
        };

        let selection = Selection::by_id(row_id);
        match self
            .provider
            .query_column(&collection.locator(), DATA_COLUMN, Some(&selection))
        {
            Ok(Some(path)) if !path.is_empty() => Resolution::direct(path),
            Ok(_) => {
                tracing::debug!(?collection, row_id, "media store has no path for row");
                Resolution::Unresolved(UnresolvedReason::NoProviderRow)
            }
            Err(err) => {
                tracing::warn!(?collection, row_id, error = %err, "media store query failed");
                Resolution::Unresolved(UnresolvedReason::ProviderQuery)
            }
        }
    }
}

/// `primary:<value>` → `<root>/<value>`; other volumes are not resolvable.
fn external_storage(root: &Path, document_id: &str) -> Resolution {
    let Some((volume, relative)) = document_id.split_once(':') else {
        return Resolution::Unresolved(UnresolvedReason::MalformedDocumentId);
    };
    if !volume.eq_ignore_ascii_case(PRIMARY_VOLUME) {
        tracing::debug!(volume, "external storage volume is not primary");
        return Resolution::Unresolved(UnresolvedReason::UnsupportedStorageType);
    }

    let mut path = OsString::from(root.as_os_str());
    if !root.as_os_str().as_encoded_bytes().ends_with(b"/") {
        path.push("/");
    }
    path.push(relative);
    Resolution::direct(path)
}
