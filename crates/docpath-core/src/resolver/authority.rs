//! Authority → resolution strategy registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const EXTERNAL_STORAGE_AUTHORITY: &str = "com.android.externalstorage.documents";
pub const DOWNLOADS_AUTHORITY: &str = "com.android.providers.downloads.documents";
pub const MEDIA_AUTHORITY: &str = "com.android.providers.media.documents";
pub const GOOGLE_PHOTOS_AUTHORITY: &str = "com.google.android.apps.photos.content";

/// Resolution strategy applied to locators issued by an authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorityKind {
    /// Document ids of the form `<volume>:<relative path>`; only the
    /// `primary` volume maps onto the public storage root.
    ExternalStorage,
    /// Document ids are either `raw:<absolute path>` or opaque ids whose
    /// bytes have to be copied.
    Downloads,
    /// Document ids of the form `<image|video|audio>:<row id>`, looked up in
    /// the matching media collection.
    Media,
    /// Plain content locators whose last path segment is already usable.
    GooglePhotos,
}

/// Registry consulted by the resolver. Defaults to the four built-in
/// authorities; hosts can register more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityTable {
    entries: HashMap<String, AuthorityKind>,
}

impl Default for AuthorityTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(EXTERNAL_STORAGE_AUTHORITY, AuthorityKind::ExternalStorage);
        table.register(DOWNLOADS_AUTHORITY, AuthorityKind::Downloads);
        table.register(MEDIA_AUTHORITY, AuthorityKind::Media);
        table.register(GOOGLE_PHOTOS_AUTHORITY, AuthorityKind::GooglePhotos);
        table
    }
}

impl AuthorityTable {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registers `authority`, returning the kind it replaced, if any.
    pub fn register(
        &mut self,
        authority: impl Into<String>,
        kind: AuthorityKind,
    ) -> Option<AuthorityKind> {
        self.entries.insert(authority.into(), kind)
    }

    pub fn get(&self, authority: &str) -> Option<AuthorityKind> {
        self.entries.get(authority).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> Extend<(S, AuthorityKind)> for AuthorityTable {
    fn extend<I: IntoIterator<Item = (S, AuthorityKind)>>(&mut self, iter: I) {
        for (authority, kind) in iter {
            self.register(authority, kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registers_builtin_authorities() {
        let table = AuthorityTable::default();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get(EXTERNAL_STORAGE_AUTHORITY),
            Some(AuthorityKind::ExternalStorage)
        );
        assert_eq!(table.get(DOWNLOADS_AUTHORITY), Some(AuthorityKind::Downloads));
        assert_eq!(table.get(MEDIA_AUTHORITY), Some(AuthorityKind::Media));
        assert_eq!(
            table.get(GOOGLE_PHOTOS_AUTHORITY),
            Some(AuthorityKind::GooglePhotos)
        );
        assert_eq!(table.get("media"), None);
    }

    #[test]
    fn register_replaces_and_extends() {
        let mut table = AuthorityTable::empty();
        assert!(table.is_empty());
        assert_eq!(table.register("x.docs", AuthorityKind::Downloads), None);
        assert_eq!(
            table.register("x.docs", AuthorityKind::Media),
            Some(AuthorityKind::Downloads)
        );
        table.extend([("y.photos", AuthorityKind::GooglePhotos)]);
        assert_eq!(table.get("x.docs"), Some(AuthorityKind::Media));
        assert_eq!(table.get("y.photos"), Some(AuthorityKind::GooglePhotos));
    }

    #[test]
    fn kind_serde_names() {
        #[derive(Deserialize)]
        struct Wrap {
            kind: AuthorityKind,
        }
        let w: Wrap = toml::from_str(r#"kind = "external-storage""#).unwrap();
        assert_eq!(w.kind, AuthorityKind::ExternalStorage);
        let w: Wrap = toml::from_str(r#"kind = "google-photos""#).unwrap();
        assert_eq!(w.kind, AuthorityKind::GooglePhotos);
    }
}
