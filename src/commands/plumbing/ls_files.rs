use crate::areas::repository::Repository;
use crate::artifacts::index::snapshot::Index;
use crate::errors::Result;
use std::io::Write;

impl Repository {
    pub fn read_index(&self) -> Result<Index> {
        self.index_file()
            .load(self.config().index.verify_checksum)
    }

    /// List index entries by name, or with `stage` as
    /// `<mode> <id> <stage>\t<name>`.
    ///
    /// `verify` off accepts an index whose checksum is missing or wrong.
    pub fn ls_files(&self, stage: bool, verify: bool) -> Result<()> {
        let index = match verify {
            true => self.read_index()?,
            false => self.index_file().load(false)?,
        };

        let mut writer = self.writer();
        for entry in index.entries() {
            if stage {
                write!(
                    writer,
                    "{:o} {} {}\t",
                    entry.metadata().mode.as_u32(),
                    entry.oid(),
                    entry.flags().stage(),
                )?;
            }
            // names are raw bytes and are written through untouched
            writer.write_all(entry.name())?;
            writer.write_all(b"\n")?;
        }

        Ok(())
    }
}
