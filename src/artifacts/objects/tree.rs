//! Tree object
//!
//! A tree lists `(permission, name, object id)` triples for the files of a
//! snapshot. Entries are flat: a name may contain `/`, nested trees are not
//! produced.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `100<permission> <name>\0<20-byte-sha1>`
//!
//! ## Ordering
//!
//! Entry order changes the tree id. Trees keep the caller's order unless
//! built with `sort_entries`, which orders them byte-wise by name.

use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::{BufRead, ErrorKind, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,
    /// Raw name bytes, `/`-separated
    pub name: Bytes,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn new(mode: EntryMode, name: impl Into<Bytes>, oid: ObjectId) -> Self {
        TreeEntry {
            mode,
            name: name.into(),
            oid,
        }
    }

    /// Build an entry from a three-digit octal permission string.
    pub fn from_permission(
        permission: &str,
        name: impl Into<Bytes>,
        oid: ObjectId,
    ) -> Result<Self> {
        Ok(Self::new(EntryMode::from_permission_str(permission)?, name, oid))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn build(entries: Vec<TreeEntry>, sort_entries: bool) -> Self {
        let mut entries = entries;
        if sort_entries {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }

        Tree { entries }
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for entry in &self.entries {
            content.write_all(entry.mode.as_str().as_bytes())?;
            content.push(b' ');
            content.write_all(&entry.name)?;
            content.push(0);
            entry.oid.write_h40_to(&mut content)?;
        }

        Ok(Bytes::from(content))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> Result<Self> {
        let mut entries = Vec::new();
        let mut reader = reader;

        // Reuse scratch buffers to reduce allocs
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            // Read "mode " (space-delimited)
            let n = reader.read_until(b' ', &mut mode_bytes)?;
            if n == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(malformed("unexpected end of tree in mode"));
            }
            let mode_str =
                std::str::from_utf8(&mode_bytes).map_err(|_| malformed("mode is not UTF-8"))?;
            let mode = EntryMode::from_octal_str(mode_str)?;

            // Read "name\0"
            name_bytes.clear();
            reader.read_until(b'\0', &mut name_bytes)?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(malformed("unexpected end of tree in name"));
            }
            let name = Bytes::copy_from_slice(&name_bytes);

            let oid = ObjectId::read_h40_from(&mut reader).map_err(|e| match e {
                Error::IoFailure(io_error) if io_error.kind() == ErrorKind::UnexpectedEof => {
                    malformed("unexpected end of tree in object id")
                }
                e => e,
            })?;

            entries.push(TreeEntry::new(mode, name, oid));
        }

        Ok(Tree { entries })
    }
}

fn malformed(reason: &str) -> Error {
    Error::MalformedPayload(ObjectType::Tree, reason.to_string())
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "{} {} {}\t{}",
                    entry.mode.as_str(),
                    ObjectType::Blob.as_str(),
                    entry.oid,
                    String::from_utf8_lossy(&entry.name)
                )
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}
