//! Porcelain commands (user-facing operations)
//!
//! - `init`: Initialize a new repository
//! - `commit`: Snapshot working tree files into a new commit

pub mod commit;
pub mod init;
