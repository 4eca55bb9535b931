//! HEAD and the ref it points at
//!
//! `HEAD` holds either a 40-character object id (detached) or
//! `ref: <relative path>`, naming a ref file under the metadata root. Only
//! one level of indirection is followed: the named ref file must hold an id.
//!
//! Ref files hold a 40-character id followed by a newline.

use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use derive_new::new;
use fake::rand;
use regex::Regex;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the metadata root (typically `.git`)
    path: Box<Path>,
}

/// What `HEAD` holds
#[derive(Debug, Clone, PartialEq, Eq)]
enum SymRefOrOid {
    /// Path of the ref file, relative to the metadata root
    SymRef(PathBuf),
    Oid(ObjectId),
}

impl Refs {
    /// Commit id HEAD currently resolves to.
    ///
    /// `Ok(None)` when HEAD names a ref file that does not exist yet (no
    /// commit on that branch). `HeadUnresolved` when HEAD itself is missing
    /// or empty.
    pub fn resolve_head(&self) -> Result<Option<ObjectId>> {
        match self.read_head()? {
            SymRefOrOid::Oid(oid) => Ok(Some(oid)),
            SymRefOrOid::SymRef(ref_path) => {
                let path = self.path.join(ref_path);
                if !path.exists() {
                    tracing::debug!(path = %path.display(), "HEAD points at an unborn ref");
                    return Ok(None);
                }

                let content = std::fs::read_to_string(&path)?;
                ObjectId::try_parse(content.trim().to_string())
                    .map(Some)
                    .map_err(|_| Error::MalformedRef {
                        path,
                        reason: format!("expected an object id, found {:?}", content.trim()),
                    })
            }
        }
    }

    /// Point HEAD, or the ref HEAD names, at `oid`.
    ///
    /// A missing HEAD is written directly, leaving HEAD detached. The target
    /// file is replaced atomically; its parent directory must already exist.
    pub fn update_head(&self, oid: &ObjectId) -> Result<()> {
        let target = match self.read_head() {
            Ok(SymRefOrOid::SymRef(ref_path)) => self.path.join(ref_path),
            Ok(SymRefOrOid::Oid(_)) | Err(Error::HeadUnresolved) => self.head_path().into(),
            Err(e) => return Err(e),
        };

        self.write_ref_file(&target, &format!("{oid}\n"))
            .map_err(|source| Error::RefTargetUnwritable {
                path: target.clone(),
                source,
            })?;

        tracing::debug!(path = %target.display(), %oid, "updated ref");

        Ok(())
    }

    /// Overwrite HEAD with `raw_ref`, e.g. `ref: refs/heads/master`.
    pub fn set_head(&self, raw_ref: &str) -> Result<()> {
        let head_path = self.head_path();

        self.write_ref_file(&head_path, &format!("{raw_ref}\n"))
            .map_err(|source| Error::RefTargetUnwritable {
                path: head_path.to_path_buf(),
                source,
            })
    }

    fn read_head(&self) -> Result<SymRefOrOid> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Err(Error::HeadUnresolved);
        }

        let content = std::fs::read_to_string(&head_path)?;
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::HeadUnresolved);
        }

        if let Ok(oid) = ObjectId::try_parse(content.to_string()) {
            return Ok(SymRefOrOid::Oid(oid));
        }

        let malformed = |reason: String| Error::MalformedRef {
            path: head_path.to_path_buf(),
            reason,
        };
        let symref_match = Regex::new(SYMREF_REGEX)?
            .captures(content)
            .ok_or_else(|| malformed(format!("unrecognized content {content:?}")))?;

        let ref_path = PathBuf::from(&symref_match[1]);
        if !ref_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(malformed(format!(
                "ref path {} leaves the metadata root",
                ref_path.display()
            )));
        }

        Ok(SymRefOrOid::SymRef(ref_path))
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> std::io::Result<()> {
        let ref_dir = path.parent().unwrap_or(&*self.path);
        let temp_ref_path = ref_dir.join(format!("tmp-ref-{}", rand::random::<u32>()));

        let written = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_ref_path)
            .and_then(|mut file| file.write_all(content.as_bytes()))
            .and_then(|()| std::fs::rename(&temp_ref_path, path));

        if written.is_err() {
            let _ = std::fs::remove_file(&temp_ref_path);
        }

        written
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
