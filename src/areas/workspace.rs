use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::HashSet;
use std::os::unix::ffi::OsStrExt;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".git"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every regular file under the root, relative to it, in name order.
    ///
    /// The metadata root is skipped.
    pub fn list_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()));
        for entry in walker {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io_error) => Error::IoFailure(io_error),
                None => Error::IoFailure(std::io::Error::other("filesystem loop")),
            })?;

            if entry.file_type().is_file()
                && let Ok(relative_path) = entry.path().strip_prefix(&self.path)
            {
                files.push(relative_path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    /// Name recorded in trees and index entries: the raw bytes of the path
    /// relative to the root, with `/` separators.
    pub fn entry_name(&self, file_path: &Path) -> Result<Bytes> {
        let relative_path = match file_path.strip_prefix(&self.path) {
            Ok(relative_path) => relative_path,
            Err(_) => file_path,
        };

        let mut parts = Vec::new();
        for component in relative_path.components() {
            match component {
                Component::Normal(part) => parts.push(part.as_bytes()),
                Component::CurDir => {}
                _ => return Err(Error::NotFound(file_path.to_path_buf())),
            }
        }

        if parts.is_empty() {
            return Err(Error::IsDirectory(file_path.to_path_buf()));
        }

        Ok(Bytes::from(parts.join(&b'/')))
    }

    /// Pair each path with its entry name, dropping repeated names.
    ///
    /// No paths selects every file in the working tree.
    pub fn select_files(&self, paths: &[PathBuf]) -> Result<Vec<(Bytes, PathBuf)>> {
        let paths = match paths.is_empty() {
            true => self.list_files()?,
            false => paths.to_vec(),
        };

        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(paths.len());
        for path in paths {
            let name = self.entry_name(&path)?;
            if seen.insert(name.clone()) {
                selected.push((name, path));
            }
        }

        Ok(selected)
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let file_path = self.checked_file_path(file_path)?;

        Ok(std::fs::read(file_path)?.into())
    }

    pub fn stat_file(&self, file_path: &Path) -> Result<EntryMetadata> {
        let file_path = self.checked_file_path(file_path)?;
        let metadata = std::fs::metadata(file_path)?;

        Ok(EntryMetadata::from(&metadata))
    }

    fn checked_file_path(&self, file_path: &Path) -> Result<PathBuf> {
        let full_path = self.path.join(file_path);

        if !full_path.exists() {
            return Err(Error::NotFound(file_path.to_path_buf()));
        }
        if full_path.is_dir() {
            return Err(Error::IsDirectory(file_path.to_path_buf()));
        }

        Ok(full_path)
    }
}
