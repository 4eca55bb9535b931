//! Plumbing commands (low-level operations)
//!
//! ## Commands
//!
//! - `hash-object`: Compute a blob id and optionally store the blob
//! - `cat-file`: Print an object or its type
//! - `update-index`: Rebuild the index from working tree files
//! - `ls-files`: List index entries
//! - `write_tree` / `write_commit`: Store tree and commit objects

pub mod cat_file;
pub mod hash_object;
pub mod ls_files;
pub mod update_index;
pub mod write_commit;
pub mod write_tree;
