//! Object framing, hashing and compression
//!
//! A stored object is the zlib stream of:
//!
//! ```text
//! <type> SP <decimal payload length> NUL <payload>
//! ```
//!
//! and its id is the SHA-1 of the same uncompressed bytes.

use crate::artifacts::objects::RAW_OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::{Read, Write};

/// Prefix `payload` with its `"<type> <len>\0"` header.
pub fn frame(object_type: ObjectType, payload: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), payload.len());

    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);

    Bytes::from(framed)
}

/// Content identifier of a typed payload.
pub fn identify(object_type: ObjectType, payload: &[u8]) -> ObjectId {
    let mut hasher = Sha1::new();
    hasher.update(format!("{} {}\0", object_type.as_str(), payload.len()).as_bytes());
    hasher.update(payload);

    let mut raw = [0u8; RAW_OBJECT_ID_LENGTH];
    raw.copy_from_slice(&hasher.finalize());
    ObjectId::from_raw(&raw)
}

/// Compress with the maximum-ratio setting.
pub fn compress(data: &[u8]) -> Result<Bytes> {
    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(data)?;

    Ok(encoder.finish()?.into())
}

pub fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
    let mut decoder = flate2::read::ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    Ok(decompressed.into())
}

/// Split framed bytes back into type and payload.
///
/// The declared length must match the number of bytes after the NUL.
pub fn unframe(oid: &ObjectId, data: Bytes) -> Result<(ObjectType, Bytes)> {
    let corrupt = |reason: String| Error::CorruptObject {
        oid: oid.clone(),
        reason,
    };

    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| corrupt("missing header terminator".to_string()))?;
    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| corrupt("header is not valid UTF-8".to_string()))?;
    let (object_type, declared_len) = header
        .split_once(' ')
        .ok_or_else(|| corrupt(format!("malformed header {header:?}")))?;

    let object_type = ObjectType::try_from(object_type)
        .map_err(|_| corrupt(format!("unknown object type {object_type:?}")))?;
    let declared_len = declared_len
        .parse::<usize>()
        .map_err(|_| corrupt(format!("invalid length {declared_len:?}")))?;

    let payload = data.slice(nul + 1..);
    if payload.len() != declared_len {
        return Err(corrupt(format!(
            "header declares {declared_len} bytes but {} follow",
            payload.len()
        )));
    }

    Ok((object_type, payload))
}
