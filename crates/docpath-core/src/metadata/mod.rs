//! Filename and MIME metadata helpers.
//!
//! Small pure functions shared by the resolver and the cache materializer.

mod mime;
mod sanitize;

pub use mime::{mime_from_extension, mime_type, OCTET_STREAM};
pub use sanitize::sanitize_filename;

/// Returns the extension of `name` including the leading dot, taken from
/// the last `.` (`"a.b.txt"` → `".txt"`). Returns `""` when there is no dot
/// and `None` when `name` is `None`.
pub fn extension(name: Option<&str>) -> Option<&str> {
    let name = name?;
    Some(name.rfind('.').map_or("", |dot| &name[dot..]))
}
