use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Store a commit and move HEAD (or the ref it names) to it.
    pub fn build_commit(
        &self,
        tree_oid: ObjectId,
        parent: Option<ObjectId>,
        author: Author,
        committer: Author,
        message: String,
    ) -> Result<ObjectId> {
        let commit = Commit::new(parent, tree_oid, author, committer, message);

        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;

        Ok(commit_id)
    }
}
