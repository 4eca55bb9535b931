//! Index file format
//!
//! The index (staging area) snapshots filesystem metadata and blob ids for a
//! working set of files. It is always rewritten as a whole.
//!
//! ## File Format (Version 2)
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "DIRC" (4 bytes)
//!   - Version: 2 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length, sorted by name on write):
//!   - 62 bytes of fixed fields, big-endian
//!   - name (name length taken from the flags field)
//!   - 1 to 8 NUL bytes, padding fixed fields + name to a multiple of 8
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod entry_flags;
pub mod entry_mode;
pub mod index_entry;
pub mod index_header;
pub mod snapshot;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of index header in bytes
pub const HEADER_SIZE: usize = 12;

/// Magic signature identifying index files
pub const SIGNATURE: &[u8; 4] = b"DIRC";

/// Index file format version
pub const VERSION: u32 = 2;
