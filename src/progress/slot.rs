use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// One named durable entry holding the serialized save.
pub trait SaveSlot {
    /// `Ok(None)` when nothing has been saved yet.
    fn read(&self) -> io::Result<Option<String>>;

    /// Replaces the whole entry. Readers see either the old or the new
    /// contents, never a mix.
    fn write(&mut self, contents: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSlot { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SaveSlot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write beside the target and rename over it
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Slot kept in memory, for tests and embedders without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    contents: Option<String>,
}

impl MemorySlot {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        MemorySlot {
            contents: Some(contents.into()),
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl SaveSlot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents.clone())
    }

    fn write(&mut self, contents: &str) -> io::Result<()> {
        self.contents = Some(contents.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_slot_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let slot = FileSlot::new(dir.path().join("save.json"));
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn file_slot_overwrites_whole_entry() {
        let dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(dir.path().join("nested").join("save.json"));
        slot.write("a much longer first value").unwrap();
        slot.write("short").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("short"));

        // no temp files left behind
        let entries = std::fs::read_dir(dir.path().join("nested")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn memory_slot() {
        let mut slot = MemorySlot::default();
        assert_eq!(slot.read().unwrap(), None);
        slot.write("x").unwrap();
        assert_eq!(slot.contents(), Some("x"));
    }
}
