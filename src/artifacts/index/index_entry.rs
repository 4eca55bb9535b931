//! Index entry representation
//!
//! Each entry records a tracked file's name, blob id, stat data and flags.
//!
//! ## Entry Format
//!
//! ```text
//! ctime sec | ctime nsec | mtime sec | mtime nsec | dev | ino | mode | uid | gid | size
//!   (ten 32-bit big-endian words, 40 bytes)
//! object id (20 raw bytes)
//! flags (16 bits, see `entry_flags`)
//! name (name length bytes)
//! NUL padding (1-8 bytes) up to a multiple of 8
//! ```
//!
//! Stat values wider than 32 bits are truncated to their low 32 bits.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::entry_flags::EntryFlags;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::fs::Metadata;
use std::io::{Read, Write};
use std::os::unix::prelude::MetadataExt;

/// Block size for entry alignment (8 bytes)
pub const ENTRY_BLOCK: usize = 8;

/// Size of the fixed-width part of an entry, before the name
pub const ENTRY_FIXED_SIZE: usize = 62;

/// Number of NUL bytes following a name of `name_length` bytes.
///
/// Always at least one, so the fixed fields plus name plus padding end on a
/// multiple of `ENTRY_BLOCK`.
pub fn padding_length(name_length: usize) -> usize {
    ENTRY_BLOCK - (ENTRY_FIXED_SIZE + name_length) % ENTRY_BLOCK
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    /// Path relative to the repository root, as raw bytes
    name: Bytes,
    /// Blob id of the file content
    oid: ObjectId,
    metadata: EntryMetadata,
    flags: EntryFlags,
}

impl IndexEntry {
    /// Build an entry with stage 0 and no flag bits set.
    ///
    /// Fails with `NameTooLong` when the name does not fit in 12 bits.
    pub fn new(name: impl Into<Bytes>, oid: ObjectId, metadata: EntryMetadata) -> Result<Self> {
        let name = name.into();
        let flags = EntryFlags::new(name.len())?;

        Ok(IndexEntry {
            name,
            oid,
            metadata,
            flags,
        })
    }

    pub fn with_flags(self, assume_valid: bool, extended: bool, stage: u8) -> Result<Self> {
        let flags = self
            .flags
            .with_stage(stage)?
            .with_assume_valid(assume_valid)
            .with_extended(extended);

        Ok(IndexEntry { flags, ..self })
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn metadata(&self) -> &EntryMetadata {
        &self.metadata
    }

    pub fn flags(&self) -> &EntryFlags {
        &self.flags
    }

    /// Decode one entry: fixed fields, then the name, then the padding.
    pub fn read_from<R: Read>(reader: &mut Checksum<R>) -> Result<Self> {
        let bytes = reader.read(ENTRY_FIXED_SIZE)?;

        let word = |i: usize| byteorder::NetworkEndian::read_u32(&bytes[i * 4..i * 4 + 4]);
        let metadata = EntryMetadata {
            ctime: word(0),
            ctime_nsec: word(1),
            mtime: word(2),
            mtime_nsec: word(3),
            dev: word(4),
            ino: word(5),
            mode: EntryMode::from(word(6)),
            uid: word(7),
            gid: word(8),
            size: word(9),
        };
        let oid = ObjectId::read_h40_from(&mut &bytes[40..60])?;
        let flags = EntryFlags::from(byteorder::NetworkEndian::read_u16(&bytes[60..62]));

        let name = Bytes::from(reader.read(flags.name_length())?);
        reader.read(padding_length(flags.name_length()))?;

        tracing::trace!(
            name = %String::from_utf8_lossy(&name),
            oid = %oid,
            mode = format_args!("{:o}", metadata.mode.as_u32()),
            size = metadata.size,
            stage = flags.stage(),
            "decoded index entry"
        );

        Ok(IndexEntry {
            name,
            oid,
            metadata,
            flags,
        })
    }
}

impl Packable for IndexEntry {
    fn serialize(&self) -> Result<Bytes> {
        let metadata = &self.metadata;

        let mut entry_bytes = Vec::with_capacity(ENTRY_FIXED_SIZE + self.name.len() + ENTRY_BLOCK);
        for word in [
            metadata.ctime,
            metadata.ctime_nsec,
            metadata.mtime,
            metadata.mtime_nsec,
            metadata.dev,
            metadata.ino,
            metadata.mode.as_u32(),
            metadata.uid,
            metadata.gid,
            metadata.size,
        ] {
            entry_bytes.write_u32::<byteorder::NetworkEndian>(word)?;
        }
        self.oid.write_h40_to(&mut entry_bytes)?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(self.flags.as_u16())?;
        entry_bytes.write_all(&self.name)?;

        entry_bytes.resize(entry_bytes.len() + padding_length(self.name.len()), 0);

        Ok(Bytes::from(entry_bytes))
    }
}

/// Stat data stored in index entries
///
/// Every field is the low 32 bits of the value reported by the filesystem.
///
/// ## Timestamps
///
/// - `ctime`: File status change time (inode modification)
/// - `mtime`: File content modification time
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    pub mode: EntryMode,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

impl From<&Metadata> for EntryMetadata {
    fn from(metadata: &Metadata) -> Self {
        Self {
            ctime: metadata.ctime() as u32,
            ctime_nsec: metadata.ctime_nsec() as u32,
            mtime: metadata.mtime() as u32,
            mtime_nsec: metadata.mtime_nsec() as u32,
            dev: metadata.dev() as u32,
            ino: metadata.ino() as u32,
            mode: EntryMode::regular(metadata.mode()),
            uid: metadata.uid(),
            gid: metadata.gid(),
            size: metadata.size() as u32,
        }
    }
}
