//! Locator model.
//!
//! A [`Locator`] is the parsed, immutable form of a URI-like identifier
//! handed out by a content authority (`content://<authority>/...`,
//! `file:///...`) or a bare relative reference. Path segments are
//! percent-decoded individually, so a document id such as
//! `raw%3A%2Fx%2Fy` is exposed as `raw:/x/y`.

mod decode;

use std::fmt;

use url::Url;

pub use decode::percent_decode;

/// Scheme of provider-backed locators.
pub const CONTENT_SCHEME: &str = "content";
/// Scheme of plain filesystem locators.
pub const FILE_SCHEME: &str = "file";

#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    #[error("empty locator")]
    Empty,
    #[error("invalid locator {input:?}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },
}

/// Parsed resource locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    raw: String,
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    segments: Vec<String>,
}

impl Locator {
    /// Parses `input`. Schemeless input (e.g. `dir/file.txt`) is accepted
    /// as a relative reference rather than rejected.
    pub fn parse(input: &str) -> Result<Self, LocatorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LocatorError::Empty);
        }

        match Url::parse(trimmed) {
            Ok(url) => Ok(Self::from_url(trimmed, &url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::relative(trimmed)),
            Err(source) => Err(LocatorError::Invalid {
                input: trimmed.to_string(),
                source,
            }),
        }
    }

    /// Builds a `content://<authority><path>` locator without going through
    /// the parser. `path` is taken as already encoded.
    pub fn content(authority: &str, path: &str) -> Self {
        Self {
            raw: format!("{CONTENT_SCHEME}://{authority}{path}"),
            scheme: Some(CONTENT_SCHEME.to_string()),
            authority: Some(authority.to_string()),
            path: percent_decode(path),
            segments: split_segments(path),
        }
    }

    /// `url` validates the input and splits off scheme and host. The path is
    /// read from `raw` because the parser normalizes it (dot segments,
    /// backslashes in `file` paths, embedded tabs and newlines).
    fn from_url(raw: &str, url: &Url) -> Self {
        let authority = url
            .host_str()
            .filter(|host| !host.is_empty())
            .map(str::to_string);
        let path = raw_path(raw);
        Self {
            raw: raw.to_string(),
            scheme: Some(url.scheme().to_ascii_lowercase()),
            authority,
            path: percent_decode(path),
            segments: split_segments(path),
        }
    }

    fn relative(raw: &str) -> Self {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        Self {
            raw: raw.to_string(),
            scheme: None,
            authority: None,
            path: percent_decode(path),
            segments: split_segments(path),
        }
    }

    /// The locator exactly as it was received (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased scheme; `None` for relative references.
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.scheme
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(scheme))
    }

    pub fn is_relative(&self) -> bool {
        self.scheme.is_none()
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    /// Decoded path component.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Last non-empty decoded path segment.
    pub fn last_path_segment(&self) -> Option<&str> {
        self.segments
            .iter()
            .rev()
            .find(|s| !s.is_empty())
            .map(String::as_str)
    }

    /// Document id of a provider document locator.
    ///
    /// Recognizes `content://<authority>/document/<id>` and
    /// `content://<authority>/tree/<tree>/document/<id>`. The id may be empty
    /// (`.../document/`); callers decide what that means.
    pub fn document_id(&self) -> Option<&str> {
        if !self.has_scheme(CONTENT_SCHEME) || self.authority.is_none() {
            return None;
        }
        match self.segments.as_slice() {
            [document, id] if document == "document" => Some(id),
            [tree, _, document, id] if tree == "tree" && document == "document" => Some(id),
            _ => None,
        }
    }

    pub fn is_document(&self) -> bool {
        self.document_id().is_some()
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for Locator {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Encoded path of an absolute locator as written: everything after
/// `scheme:` and the `//authority` part, up to the query or fragment.
fn raw_path(raw: &str) -> &str {
    let rest = raw.split_once(':').map_or(raw, |(_, rest)| rest);
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    match rest.strip_prefix("//") {
        Some(after) => after.find('/').map_or("", |slash| &after[slash..]),
        None => rest,
    }
}

fn split_segments(encoded_path: &str) -> Vec<String> {
    let path = encoded_path.strip_prefix('/').unwrap_or(encoded_path);
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').map(percent_decode).collect()
}
