//! A content-addressed snapshot store in the style of git.
//!
//! - `areas`: the stateful stores under the metadata root (objects, index
//!   file, refs) plus the working tree
//! - `artifacts`: object and index types with their binary formats
//! - `commands`: operations exposed to the CLI, as `impl Repository` blocks

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
