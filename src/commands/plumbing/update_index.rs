use crate::areas::repository::Repository;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::snapshot::Index;
use crate::errors::Result;
use std::path::PathBuf;

impl Repository {
    /// Rebuild the index from `paths` (every working tree file when empty).
    ///
    /// Each file is stored as a blob and stat'ed; the previous index is
    /// replaced as a whole.
    pub fn write_index(&self, paths: &[PathBuf]) -> Result<()> {
        let mut entries = Vec::new();

        for (name, path) in self.workspace().select_files(paths)? {
            let blob_id = self.build_blob(&path)?;
            let stat = self.workspace().stat_file(&path)?;

            entries.push(IndexEntry::new(name, blob_id, stat)?);
        }

        self.index_file().write(&Index::new(entries))
    }
}
