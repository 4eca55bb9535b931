//! Error types shared by every area of the repository.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;

/// Failures surfaced by the object store, the index codec and the refs.
///
/// Corruption is never repaired in place; it always reaches the caller as
/// one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path or an object file does not exist.
    #[error("no such file or object: {}", .0.display())]
    NotFound(PathBuf),

    /// A blob was requested for a directory.
    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),

    /// The index does not start with the `DIRC` signature.
    #[error("invalid index signature: {0:?}")]
    BadSignature([u8; 4]),

    /// The index ended before the decoder got the bytes it needed.
    #[error("index truncated: needed {needed} more bytes at offset {offset}")]
    TruncatedIndex { offset: usize, needed: usize },

    /// The trailing digest of the index disagrees with its contents.
    #[error("index checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch { stored: String, computed: String },

    #[error("unsupported index version: {0}")]
    UnsupportedIndexVersion(u32),

    /// An entry name does not fit in the 12-bit length field.
    #[error("entry name is {0} bytes long, the index supports at most 4095")]
    NameTooLong(usize),

    #[error("invalid merge stage: {0}")]
    InvalidMergeStage(u8),

    /// A stored object could not be decompressed or its header is wrong.
    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: ObjectId, reason: String },

    #[error("malformed {0} payload: {1}")]
    MalformedPayload(ObjectType, String),

    #[error("invalid object id: {0:?}")]
    InvalidObjectId(String),

    #[error("invalid object type: {0:?}")]
    InvalidObjectType(String),

    #[error("invalid permission string: {0:?}")]
    InvalidPermission(String),

    /// A ref file does not hold what it should.
    #[error("malformed ref {}: {reason}", path.display())]
    MalformedRef { path: PathBuf, reason: String },

    /// HEAD is missing or empty.
    #[error("HEAD cannot be resolved")]
    HeadUnresolved,

    #[error("unable to write ref {}: {source}", path.display())]
    RefTargetUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    IoFailure(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
