use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Blob an empty store reads as.
pub const EMPTY_STATE: &str = "{}";

/// Where the serialized state blob round-trips to between sessions.
pub trait Store {
    fn read(&self) -> io::Result<String>;
    fn write(&mut self, blob: &str) -> io::Result<()>;
}

/// Persists the blob in a single file. A missing file is not an error, it
/// reads as [`EMPTY_STATE`].
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for FileStore {
    fn read(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(blob),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(EMPTY_STATE.to_string()),
            Err(err) => Err(err),
        }
    }

    fn write(&mut self, blob: &str) -> io::Result<()> {
        tracing::debug!("writing state to {}", self.path.display());
        fs::write(&self.path, blob)
    }
}

/// Keeps the blob in memory, for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    blob: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl Store for MemoryStore {
    fn read(&self) -> io::Result<String> {
        Ok(self
            .blob
            .clone()
            .unwrap_or_else(|| EMPTY_STATE.to_string()))
    }

    fn write(&mut self, blob: &str) -> io::Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }
}
