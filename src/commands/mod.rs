//! Command implementations
//!
//! - `plumbing`: Low-level commands working on single objects and the index
//!   (hash-object, cat-file, update-index, ls-files, tree and commit writing)
//! - `porcelain`: User-facing commands composed from them (init, commit)

pub mod plumbing;
pub mod porcelain;
