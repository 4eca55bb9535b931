//! The index file
//!
//! The index has no partial-update path: every write encodes the whole
//! snapshot into a temporary file next to the index and renames it over the
//! old one, so readers see either the previous index or the new one.

use crate::artifacts::index::snapshot::Index;
use crate::errors::Result;
use fake::rand;
use std::io::Write;
use std::path::Path;

#[derive(Debug)]
pub struct IndexFile {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
}

impl IndexFile {
    pub fn new(path: Box<Path>) -> Self {
        IndexFile { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the index from disk
    ///
    /// A missing or empty index file is an empty index.
    pub fn load(&self, verify_checksum: bool) -> Result<Index> {
        if !self.path.exists() {
            return Ok(Index::default());
        }

        let content = std::fs::read(&self.path)?;
        if content.is_empty() {
            return Ok(Index::default());
        }

        Index::decode(&content, verify_checksum)
    }

    pub fn write(&self, index: &Index) -> Result<()> {
        let content = index.encode()?;

        let index_dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let temp_index_path = index_dir.join(format!("tmp-index-{}", rand::random::<u32>()));

        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_index_path)
            .and_then(|mut file| {
                file.write_all(&content)?;
                file.sync_all()
            })
            .and_then(|()| std::fs::rename(&temp_index_path, &self.path));

        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_index_path);
            return Err(e.into());
        }

        tracing::debug!(
            path = %self.path.display(),
            entries = index.entries().len(),
            bytes = content.len(),
            "rewrote index"
        );

        Ok(())
    }
}
