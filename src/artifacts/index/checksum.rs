use crate::artifacts::index::CHECKSUM_SIZE;
use crate::errors::{Error, Result};
use sha1::{Digest, Sha1};
use std::io::{ErrorKind, Read, Write};

/// Stream wrapper that feeds every byte read or written into a SHA-1 digest.
///
/// The index trailer is the digest of everything before it.
#[derive(Debug)]
pub struct Checksum<T> {
    inner: T,
    digest: Sha1,
    offset: usize,
}

impl<T> Checksum<T> {
    pub fn new(inner: T) -> Self {
        Checksum {
            inner,
            digest: Sha1::new(),
            offset: 0,
        }
    }

    /// Number of bytes consumed or produced so far.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<R: Read> Checksum<R> {
    /// Read exactly `size` bytes, failing with `TruncatedIndex` when the
    /// stream ends first.
    pub fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        let mut buffer = vec![0; size];
        self.inner.read_exact(&mut buffer).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => Error::TruncatedIndex {
                offset: self.offset,
                needed: size,
            },
            _ => Error::IoFailure(e),
        })?;

        self.digest.update(&buffer);
        self.offset += size;
        Ok(buffer)
    }

    /// Check the trailing digest.
    ///
    /// Bytes between the last entry and the trailer (extensions) are hashed
    /// but otherwise ignored. With `verify` off a missing or wrong trailer is
    /// accepted.
    pub fn verify(mut self, verify: bool) -> Result<()> {
        let mut rest = Vec::new();
        self.inner.read_to_end(&mut rest)?;

        if rest.len() < CHECKSUM_SIZE {
            return match verify {
                true => Err(Error::TruncatedIndex {
                    offset: self.offset + rest.len(),
                    needed: CHECKSUM_SIZE - rest.len(),
                }),
                false => Ok(()),
            };
        }

        let (extensions, stored) = rest.split_at(rest.len() - CHECKSUM_SIZE);
        self.digest.update(extensions);
        let computed = self.digest.finalize();

        if verify && stored != computed.as_slice() {
            return Err(Error::ChecksumMismatch {
                stored: to_hex(stored),
                computed: to_hex(&computed),
            });
        }

        Ok(())
    }
}

impl<W: Write> Checksum<W> {
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.digest.update(data);
        self.offset += data.len();
        Ok(())
    }

    /// Append the digest of everything written so far and hand back the
    /// underlying writer.
    pub fn write_checksum(mut self) -> Result<W> {
        let checksum = self.digest.finalize();
        self.inner.write_all(checksum.as_slice())?;

        Ok(self.inner)
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}
