//! Cache file writer: stream into a temp file, then rename into place.

use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Temporary file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Writer for one cache entry. Content goes into a uniquely named sibling
/// temp file; [`CacheWriter::finalize`] renames it onto the destination, so
/// readers of the destination only ever see a complete copy. Dropping the
/// writer without finalizing removes the temp file.
pub struct CacheWriter {
    file: NamedTempFile,
}

impl CacheWriter {
    /// Create a new temp file inside `dir` (which must already exist).
    pub fn create_in(dir: &Path) -> io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(".docpath-")
            .suffix(TEMP_SUFFIX)
            .tempfile_in(dir)?;
        Ok(Self { file })
    }

    /// Copy everything from `reader`. Returns the number of bytes written.
    pub fn copy_from(&mut self, reader: &mut dyn Read) -> io::Result<u64> {
        let out = self.file.as_file_mut();
        let n = io::copy(reader, out)?;
        out.flush()?;
        Ok(n)
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.as_file().sync_all()
    }

    /// Path to the current temp file.
    pub fn temp_path(&self) -> &Path {
        self.file.path()
    }

    /// Atomically rename the temp file to `final_path`, replacing any
    /// existing file. Consumes the writer and closes the file.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        self.file
            .persist(final_path)
            .map(drop)
            .map_err(|e| e.error)
    }
}
