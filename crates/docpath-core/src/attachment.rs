//! Upload attachment descriptor built from a resolved path.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::metadata::mime_type;
use crate::resolver::ResolutionSource;

/// What a multipart body needs to attach a resolved file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    /// File name sent in the part's `Content-Disposition`.
    pub file_name: String,
    pub mime_type: &'static str,
    pub len: u64,
    pub source: ResolutionSource,
}

impl Attachment {
    /// Stats `path` and derives name and MIME type from it. Fails if the path
    /// does not exist or is not a regular file.
    pub fn from_path(path: impl Into<PathBuf>, source: ResolutionSource) -> io::Result<Self> {
        let path = path.into();
        let meta = fs::metadata(&path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            mime_type: mime_type(&path),
            file_name,
            len: meta.len(),
            source,
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        fs::write(&path, vec![1u8; 42]).unwrap();

        let att = Attachment::from_path(&path, ResolutionSource::Direct).unwrap();
        assert_eq!(att.path, path);
        assert_eq!(att.file_name, "clip.mp4");
        assert_eq!(att.mime_type, "video/mp4");
        assert_eq!(att.len, 42);
    }

    #[test]
    fn rejects_directories_and_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::from_path(dir.path(), ResolutionSource::Direct).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = Attachment::from_path(dir.path().join("nope"), ResolutionSource::Direct)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
