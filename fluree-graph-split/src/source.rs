//! Random-access byte sources.
//!
//! Each reader owns its own source (and file handle), so reads from
//! different workers never share a seek position.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// A file-like sequence of bytes that supports reads at arbitrary offsets.
pub trait ByteSource: Send {
    /// Path used for error messages and cache keys.
    fn path(&self) -> &Path;

    /// Total length in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last modification time, when the source has one.
    fn modified(&self) -> Option<SystemTime> {
        None
    }

    /// Read `range`, clamped to the source length.
    fn read_range(&mut self, range: Range<u64>) -> io::Result<Vec<u8>>;
}

/// A file on the local filesystem.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    file: File,
    len: u64,
    modified: Option<SystemTime>,
}

impl FileSource {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let meta = file.metadata()?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

impl ByteSource for FileSource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    fn read_range(&mut self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let start = range.start.min(self.len);
        let end = range.end.min(self.len).max(start);
        let mut buf = vec![0u8; (end - start) as usize];
        self.file.seek(SeekFrom::Start(start))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

/// Bytes held in memory, addressed by a nominal path.
#[derive(Debug, Clone)]
pub struct MemorySource {
    path: PathBuf,
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            path: path.into(),
            bytes: bytes.into(),
        }
    }

    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::new(path, text.as_bytes())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl ByteSource for MemorySource {
    fn path(&self) -> &Path {
        &self.path
    }

    fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn read_range(&mut self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let len = self.bytes.len();
        let start = (range.start.min(len as u64)) as usize;
        let end = (range.end.min(len as u64) as usize).max(start);
        Ok(self.bytes[start..end].to_vec())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn path(&self) -> &Path {
        (**self).path()
    }

    fn len(&self) -> u64 {
        (**self).len()
    }

    fn modified(&self) -> Option<SystemTime> {
        (**self).modified()
    }

    fn read_range(&mut self, range: Range<u64>) -> io::Result<Vec<u8>> {
        (**self).read_range(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_reads_and_clamps() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(b"0123456789").unwrap();
        f.flush().unwrap();

        let mut source = FileSource::open(f.path()).unwrap();
        assert_eq!(source.len(), 10);
        assert!(source.modified().is_some());
        assert_eq!(source.read_range(2..5).unwrap(), b"234");
        assert_eq!(source.read_range(8..100).unwrap(), b"89");
        assert!(source.read_range(20..30).unwrap().is_empty());
    }

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::from_text("mem.ttl", "abcdef");
        assert_eq!(source.path(), Path::new("mem.ttl"));
        assert_eq!(source.read_range(1..3).unwrap(), b"bc");
        assert_eq!(source.read_range(6..9).unwrap(), b"");
        assert!(source.modified().is_none());
    }
}
