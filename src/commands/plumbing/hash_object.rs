use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Id the file's content would be stored under. Nothing is written.
    pub fn hash_file(&self, path: &Path) -> Result<ObjectId> {
        let blob = Blob::new(self.workspace().read_file(path)?);

        blob.object_id()
    }

    /// Store the file's content as a blob.
    pub fn build_blob(&self, path: &Path) -> Result<ObjectId> {
        let blob = Blob::new(self.workspace().read_file(path)?);

        self.database().store(&blob)
    }

    pub fn hash_object(&self, object_path: &str, write: bool) -> Result<()> {
        let object_id = match write {
            true => self.build_blob(object_path.as_ref())?,
            false => self.hash_file(object_path.as_ref())?,
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(())
    }
}
