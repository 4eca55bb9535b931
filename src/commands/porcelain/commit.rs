use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Author;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::errors::{Error, Result};
use std::io::Write;
use std::path::PathBuf;

impl Repository {
    /// Snapshot `paths` (every working tree file when empty) into a new
    /// commit on top of HEAD.
    pub fn commit(&self, paths: &[PathBuf], message: &str) -> Result<ObjectId> {
        let mut entries = Vec::new();
        for (name, path) in self.workspace().select_files(paths)? {
            let blob_id = self.build_blob(&path)?;
            let stat = self.workspace().stat_file(&path)?;

            entries.push(TreeEntry::new(stat.mode, name, blob_id));
        }
        let tree_id = self.build_tree(entries)?;

        // an unborn branch or a missing HEAD both mean a root commit
        let parent = match self.refs().resolve_head() {
            Ok(parent) => parent,
            Err(Error::HeadUnresolved) => None,
            Err(e) => return Err(e),
        };
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = Author::load(&self.config().commit)?;
        let committer = author.clone();
        let message = message.trim().to_string();
        let subject = message.lines().next().unwrap_or_default().to_string();

        let commit_id = self.build_commit(tree_id, parent, author, committer, message)?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            subject
        )?;

        Ok(commit_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::repository::Repository;
    use crate::artifacts::objects::object::Object;
    use crate::config::{CONFIG_FILE_NAME, Config};
    use crate::errors::Error;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::path::PathBuf;

    #[fixture]
    fn repository_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        dir.child("a.txt").write_str("alpha\n").unwrap();
        dir.child("b.txt").write_str("beta\n").unwrap();

        let repository = open(&dir);
        repository.init().unwrap();

        // pin the signature so ids do not depend on the clock
        let mut config = Config::default();
        config.commit.identity = "tester <tester@example.com>".to_string();
        config.commit.offset = "+0100".to_string();
        config.save(&repository.git_path()).unwrap();

        dir
    }

    fn open(dir: &TempDir) -> Repository {
        Repository::new(&dir.path().to_string_lossy(), Box::new(std::io::sink())).unwrap()
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[rstest]
    fn commits_chain_through_head(repository_dir: TempDir) {
        let repository = open(&repository_dir);

        let first = repository.commit(&paths(&["a.txt"]), "first").unwrap();
        let first_commit = repository
            .database()
            .parse_object_as_commit(&first)
            .unwrap()
            .unwrap();
        assert_eq!(first_commit.parent(), None);
        assert!(!first_commit.display().contains("parent "));

        let second = repository
            .commit(&paths(&["a.txt", "b.txt"]), "second")
            .unwrap();
        let second_commit = repository
            .database()
            .parse_object_as_commit(&second)
            .unwrap()
            .unwrap();

        assert_eq!(second_commit.parent(), Some(&first));
        assert_eq!(repository.refs().resolve_head().unwrap(), Some(second.clone()));
        assert_eq!(
            std::fs::read_to_string(repository_dir.path().join(".git/refs/heads/master"))
                .unwrap(),
            format!("{second}\n")
        );
    }

    #[rstest]
    fn tree_lists_the_committed_files(repository_dir: TempDir) {
        let repository = open(&repository_dir);

        let commit_id = repository.commit(&paths(&["b.txt", "a.txt"]), "both").unwrap();
        let commit = repository
            .database()
            .parse_object_as_commit(&commit_id)
            .unwrap()
            .unwrap();
        let tree = repository
            .database()
            .parse_object_as_tree(commit.tree_oid())
            .unwrap()
            .unwrap();

        let names: Vec<&[u8]> = tree.entries().map(|entry| &entry.name[..]).collect();
        assert_eq!(names, [&b"a.txt"[..], b"b.txt"]);
        assert!(tree.entries().all(|entry| entry.mode.as_str().starts_with("100")));
    }

    #[rstest]
    fn unsorted_trees_keep_the_given_order(repository_dir: TempDir) {
        std::fs::write(
            repository_dir.path().join(".git").join(CONFIG_FILE_NAME),
            "[tree]\nsort_entries = false\n",
        )
        .unwrap();
        let repository = open(&repository_dir);

        let commit_id = repository.commit(&paths(&["b.txt", "a.txt"]), "both").unwrap();
        let commit = repository
            .database()
            .parse_object_as_commit(&commit_id)
            .unwrap()
            .unwrap();
        let tree = repository
            .database()
            .parse_object_as_tree(commit.tree_oid())
            .unwrap()
            .unwrap();

        let names: Vec<&[u8]> = tree.entries().map(|entry| &entry.name[..]).collect();
        assert_eq!(names, [&b"b.txt"[..], b"a.txt"]);
    }

    #[rstest]
    fn missing_head_still_commits(repository_dir: TempDir) {
        std::fs::remove_file(repository_dir.path().join(".git/HEAD")).unwrap();
        let repository = open(&repository_dir);

        let commit_id = repository.commit(&paths(&["a.txt"]), "detached").unwrap();

        assert_eq!(
            std::fs::read_to_string(repository_dir.path().join(".git/HEAD")).unwrap(),
            format!("{commit_id}\n")
        );
    }

    #[rstest]
    fn directories_cannot_be_committed(repository_dir: TempDir) {
        repository_dir.child("dir/c.txt").write_str("c").unwrap();
        let repository = open(&repository_dir);

        assert!(matches!(
            repository.commit(&paths(&["dir"]), "nope"),
            Err(Error::IsDirectory(_))
        ));
    }
}
