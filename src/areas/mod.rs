//! Core repository components
//!
//! - `database`: Object store for blobs, trees and commits
//! - `index`: The index file on disk
//! - `refs`: HEAD and the ref it points at
//! - `repository`: Ties the areas together around one repository root
//! - `workspace`: Working tree enumeration, file content and stat data

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
