//! Destinations rows are appended to

use std::{
    borrow::Cow,
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Append-only target for formatted rows
pub trait Destination {
    /// `true` if nothing has been written to the destination yet (missing or empty)
    fn is_empty_or_new(&mut self) -> io::Result<bool>;
    /// Append `bytes` to the destination
    fn write(&mut self, bytes: &[u8]) -> io::Result<()>;
    /// Flush buffered bytes
    fn flush(&mut self) -> io::Result<()>;
}

/// File opened lazily in append mode
///
/// Missing parent directories are created on first write.
#[derive(Debug)]
pub struct FileDestination {
    path: PathBuf,
    file: Option<BufWriter<File>>,
}

impl FileDestination {
    /// Destination for `path`; nothing is opened until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: None,
        }
    }

    /// Path of the destination file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `true` if the file handle is currently open
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Flush and release the file handle; a later write reopens it
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
            tracing::debug!(path = %self.path.display(), "closed destination");
        }
        Ok(())
    }

    fn handle(&mut self) -> io::Result<&mut BufWriter<File>> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?;
                tracing::debug!(path = %self.path.display(), "opened destination");
                BufWriter::new(file)
            }
        };
        Ok(self.file.insert(file))
    }
}

impl Destination for FileDestination {
    fn is_empty_or_new(&mut self) -> io::Result<bool> {
        // Buffered bytes are not reflected in the file metadata yet
        if let Some(file) = &mut self.file {
            file.flush()?;
        }
        match fs::metadata(&self.path) {
            Ok(metadata) => Ok(metadata.len() == 0),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.handle()?.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.file {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for FileDestination {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to flush destination on drop"
            );
        }
    }
}

/// In-memory destination collecting all written bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDestination {
    bytes: Vec<u8>,
}

impl MemoryDestination {
    /// Empty destination
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Everything written so far as text (invalid UTF-8 is replaced)
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Consume the destination, returning the written bytes
    pub fn into_inner(self) -> Vec<u8> {
        self.bytes
    }
}

impl Destination for MemoryDestination {
    fn is_empty_or_new(&mut self) -> io::Result<bool> {
        Ok(self.bytes.is_empty())
    }

    fn write(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
