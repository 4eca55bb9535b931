use crate::errors::{Error, Result};

/// Type tag of a regular file in a mode word.
pub const REGULAR_FILE: u32 = 0o100000;

/// Prefix written in front of the permission digits in tree entries.
pub const REGULAR_FILE_PREFIX: &str = "100";

const PERMISSION_BITS: u32 = 0o777;

/// 32-bit mode word: type tag plus permission bits.
///
/// Only the regular-file type tag is ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryMode(u32);

impl EntryMode {
    /// Regular file carrying the permission bits of `mode`.
    pub fn regular(mode: u32) -> Self {
        EntryMode(REGULAR_FILE | (mode & PERMISSION_BITS))
    }

    pub fn permissions(&self) -> u32 {
        self.0 & PERMISSION_BITS
    }

    /// Three octal digits, e.g. `"644"`.
    pub fn permission_string(&self) -> String {
        format!("{:03o}", self.permissions())
    }

    /// Mode as written in tree entries, e.g. `"100644"`.
    pub fn as_str(&self) -> String {
        format!("{}{}", REGULAR_FILE_PREFIX, self.permission_string())
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    /// Parse a three-digit octal permission string.
    pub fn from_permission_str(permission: &str) -> Result<Self> {
        if permission.len() != 3 || !permission.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
            return Err(Error::InvalidPermission(permission.to_string()));
        }
        let bits = u32::from_str_radix(permission, 8)
            .map_err(|_| Error::InvalidPermission(permission.to_string()))?;

        Ok(Self::regular(bits))
    }

    /// Parse a tree entry mode, e.g. `"100755"`.
    pub fn from_octal_str(mode: &str) -> Result<Self> {
        mode.strip_prefix(REGULAR_FILE_PREFIX)
            .ok_or_else(|| Error::InvalidPermission(mode.to_string()))
            .and_then(Self::from_permission_str)
    }
}

impl Default for EntryMode {
    fn default() -> Self {
        EntryMode::regular(0o644)
    }
}

impl From<u32> for EntryMode {
    fn from(mode: u32) -> Self {
        EntryMode(mode)
    }
}

impl From<EntryMode> for u32 {
    fn from(mode: EntryMode) -> Self {
        mode.0
    }
}
