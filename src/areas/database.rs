use crate::artifacts::database::codec;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Object store rooted at `<metadata root>/objects`.
///
/// Objects are write-once: an id that is already present is never rewritten.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    pub fn exists(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Store a typed payload and return its id.
    ///
    /// Storing the same payload twice is a no-op that returns the same id.
    pub fn put(&self, object_type: ObjectType, payload: &[u8]) -> Result<ObjectId> {
        let object_id = codec::identify(object_type, payload);

        if self.exists(&object_id) {
            tracing::debug!(oid = %object_id, %object_type, "object already stored");
            return Ok(object_id);
        }

        let object_path = self.object_path(&object_id);
        let object_content = codec::compress(&codec::frame(object_type, payload))?;
        self.write_object(&object_path, &object_content)?;

        tracing::debug!(
            oid = %object_id,
            %object_type,
            size = payload.len(),
            "stored object"
        );

        Ok(object_id)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let payload = object.serialize()?;
        self.put(object.object_type(), &payload)
    }

    /// Read an object back as its type and payload.
    pub fn get(&self, object_id: &ObjectId) -> Result<(ObjectType, Bytes)> {
        let object_path = self.object_path(object_id);

        let object_content = std::fs::read(&object_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::NotFound(object_path.clone()),
            _ => Error::IoFailure(e),
        })?;

        let object_content =
            codec::decompress(&object_content).map_err(|e| Error::CorruptObject {
                oid: object_id.clone(),
                reason: format!("unable to decompress: {e}"),
            })?;

        codec::unframe(object_id, object_content)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let (object_type, payload) = self.get(object_id)?;
        let object_reader = Cursor::new(payload);

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Tree => Ok(ObjectBox::Tree(Box::new(Tree::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> Result<Option<Commit>> {
        let (object_type, payload) = self.get(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(Cursor::new(payload))?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_tree(&self, object_id: &ObjectId) -> Result<Option<Tree>> {
        let (object_type, payload) = self.get(object_id)?;

        match object_type {
            ObjectType::Tree => Ok(Some(Tree::deserialize(Cursor::new(payload))?)),
            _ => Ok(None),
        }
    }

    fn write_object(&self, object_path: &Path, object_content: &[u8]) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::NotFound(object_path.to_path_buf()))?;

        // the shard directory is created on first use, the objects root is not
        match std::fs::create_dir(object_dir) {
            Err(e) if e.kind() != ErrorKind::AlreadyExists => return Err(e.into()),
            _ => {}
        }

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let written = Self::write_temp_file(&temp_object_path, object_content)
            // rename the temp file to the object file to make it atomic
            .and_then(|()| std::fs::rename(&temp_object_path, object_path));

        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp_object_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn write_temp_file(temp_path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp_path)?;
        file.write_all(content)?;
        file.sync_all()
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn objects_dir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().into())
    }

    #[rstest]
    fn stores_under_the_shard_path(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let oid = database.put(ObjectType::Blob, b"hi\n").unwrap();

        assert_eq!(oid.as_ref(), "45b983be36b73c0788dc9cbcb76cbb80fc7bb057");
        let stored = objects_dir
            .path()
            .join("45")
            .join("b983be36b73c0788dc9cbcb76cbb80fc7bb057");
        let inflated = codec::decompress(&std::fs::read(stored).unwrap()).unwrap();
        assert_eq!(&inflated[..], b"blob 3\0hi\n");
    }

    #[rstest]
    fn second_put_is_a_no_op(objects_dir: TempDir) {
        let database = database(&objects_dir);

        let first = database.put(ObjectType::Blob, b"same").unwrap();
        let modified = std::fs::metadata(database.object_path(&first))
            .unwrap()
            .modified()
            .unwrap();
        let second = database.put(ObjectType::Blob, b"same").unwrap();

        assert_eq!(first, second);
        assert_eq!(
            std::fs::metadata(database.object_path(&second))
                .unwrap()
                .modified()
                .unwrap(),
            modified
        );
    }

    #[rstest]
    fn leaves_no_temp_files_behind(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = database.put(ObjectType::Blob, b"content").unwrap();

        let shard = database.object_path(&oid);
        let files: Vec<_> = std::fs::read_dir(shard.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();

        assert_eq!(files.len(), 1);
    }

    #[rstest]
    fn failed_rename_removes_the_temp_file(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = codec::identify(ObjectType::Blob, b"blocked");
        let path = database.object_path(&oid);
        // a non-empty directory where the object file should go
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        assert!(matches!(
            database.put(ObjectType::Blob, b"blocked"),
            Err(Error::IoFailure(_))
        ));

        let files: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec![path.file_name().unwrap().to_os_string()]);
    }

    #[rstest]
    fn missing_object_is_not_found(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = codec::identify(ObjectType::Blob, b"never stored");

        assert!(!database.exists(&oid));
        assert!(matches!(database.get(&oid), Err(Error::NotFound(_))));
    }

    #[rstest]
    fn garbage_is_a_corrupt_object(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = codec::identify(ObjectType::Blob, b"x");
        let path = database.object_path(&oid);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"not zlib at all").unwrap();

        assert!(matches!(
            database.get(&oid),
            Err(Error::CorruptObject { .. })
        ));
    }

    #[rstest]
    fn length_mismatch_is_a_corrupt_object(objects_dir: TempDir) {
        let database = database(&objects_dir);
        let oid = codec::identify(ObjectType::Blob, b"abc");
        let path = database.object_path(&oid);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, codec::compress(b"blob 5\0abc").unwrap()).unwrap();

        assert!(matches!(
            database.get(&oid),
            Err(Error::CorruptObject { .. })
        ));
    }

    #[test]
    fn missing_objects_root_is_an_io_failure() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("absent").into_boxed_path());

        assert!(matches!(
            database.put(ObjectType::Blob, b"data"),
            Err(Error::IoFailure(_))
        ));
    }

    proptest! {
        #[test]
        fn get_returns_what_put_stored(
            payload in proptest::collection::vec(any::<u8>(), 0..512),
            object_type in prop_oneof![
                Just(ObjectType::Blob),
                Just(ObjectType::Tree),
                Just(ObjectType::Commit),
            ],
        ) {
            let dir = TempDir::new().unwrap();
            let database = database(&dir);

            let oid = database.put(object_type, &payload).unwrap();
            let (stored_type, stored_payload) = database.get(&oid).unwrap();

            prop_assert_eq!(stored_type, object_type);
            prop_assert_eq!(&stored_payload[..], &payload[..]);
        }
    }
}
