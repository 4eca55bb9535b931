use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::Result;

impl Repository {
    /// Store a flat tree of `entries`.
    ///
    /// Entries are sorted by name when `tree.sort_entries` is set, otherwise
    /// they are written in the given order.
    pub fn build_tree(&self, entries: Vec<TreeEntry>) -> Result<ObjectId> {
        let tree = Tree::build(entries, self.config().tree.sort_entries);

        self.database().store(&tree)
    }
}
