use crate::areas::repository::Repository;
use crate::errors::Result;
use std::fs;
use std::io::Write;

const DEFAULT_BRANCH: &str = "master";

impl Repository {
    /// Create the metadata root. An existing HEAD is left untouched.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.refs().heads_path())?;

        if !self.refs().head_path().exists() {
            self.refs()
                .set_head(&format!("ref: refs/heads/{DEFAULT_BRANCH}"))?;
        }

        writeln!(
            self.writer(),
            "Initialized empty Git repository in {}",
            self.path().display()
        )?;

        Ok(())
    }
}
