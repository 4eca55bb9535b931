//! 16-bit flags field of an index entry
//!
//! ```text
//!  15   14   13-12   11 ........ 0
//! +----+----+-------+--------------+
//! | EX | AV | stage |   name len   |
//! +----+----+-------+--------------+
//! ```
//!
//! - EX: extended flag
//! - AV: assume-valid
//! - stage: merge stage, 0-3
//! - name len: byte length of the entry name, at most 0xFFF

use crate::errors::{Error, Result};
use bitflags::bitflags;

/// Longest name the 12-bit length field can describe.
pub const MAX_NAME_LENGTH: usize = 0x0FFF;

/// Highest merge stage the 2-bit field can hold.
pub const MAX_STAGE: u8 = 3;

const STAGE_MASK: u16 = 0x3000;
const STAGE_SHIFT: u16 = 12;
const NAME_LENGTH_MASK: u16 = 0x0FFF;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct FlagBits: u16 {
        const EXTENDED = 0x8000;
        const ASSUME_VALID = 0x4000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryFlags {
    bits: FlagBits,
    stage: u8,
    name_length: u16,
}

impl EntryFlags {
    /// Flags for a name of `name_length` bytes, stage 0, no bits set.
    pub fn new(name_length: usize) -> Result<Self> {
        if name_length > MAX_NAME_LENGTH {
            return Err(Error::NameTooLong(name_length));
        }

        Ok(EntryFlags {
            bits: FlagBits::empty(),
            stage: 0,
            name_length: name_length as u16,
        })
    }

    pub fn with_stage(self, stage: u8) -> Result<Self> {
        if stage > MAX_STAGE {
            return Err(Error::InvalidMergeStage(stage));
        }

        Ok(EntryFlags { stage, ..self })
    }

    pub fn with_assume_valid(mut self, assume_valid: bool) -> Self {
        self.bits.set(FlagBits::ASSUME_VALID, assume_valid);
        self
    }

    pub fn with_extended(mut self, extended: bool) -> Self {
        self.bits.set(FlagBits::EXTENDED, extended);
        self
    }

    pub fn extended(&self) -> bool {
        self.bits.contains(FlagBits::EXTENDED)
    }

    pub fn assume_valid(&self) -> bool {
        self.bits.contains(FlagBits::ASSUME_VALID)
    }

    pub fn stage(&self) -> u8 {
        self.stage
    }

    pub fn name_length(&self) -> usize {
        self.name_length as usize
    }

    pub fn as_u16(&self) -> u16 {
        self.bits.bits() | ((self.stage as u16) << STAGE_SHIFT) | self.name_length
    }
}

impl From<u16> for EntryFlags {
    fn from(raw: u16) -> Self {
        EntryFlags {
            bits: FlagBits::from_bits_truncate(raw),
            stage: ((raw & STAGE_MASK) >> STAGE_SHIFT) as u8,
            name_length: raw & NAME_LENGTH_MASK,
        }
    }
}
