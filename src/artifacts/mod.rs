//! Repository data structures and codecs
//!
//! Everything here is pure: no module in `artifacts` touches the filesystem
//! on its own.
//!
//! - `database`: Object framing, hashing and compression
//! - `index`: Index (staging area) entries and the binary index format
//! - `objects`: Object types (blob, tree, commit) and identifiers

pub mod database;
pub mod index;
pub mod objects;
