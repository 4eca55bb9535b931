use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, VERSION};
use crate::artifacts::objects::object::Packable;
use crate::errors::Result;
use bytes::Bytes;

/// In-memory image of an index file.
///
/// Entries keep the order they were decoded in; `encode` always writes them
/// sorted by name bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    version: u32,
    entries: Vec<IndexEntry>,
}

impl Index {
    pub fn new(entries: Vec<IndexEntry>) -> Self {
        Index {
            version: VERSION,
            entries,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Header, entries in byte-wise name order, then the SHA-1 trailer.
    pub fn encode(&self) -> Result<Bytes> {
        let mut entries: Vec<&IndexEntry> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.name().cmp(b.name()));

        let mut writer = Checksum::new(Vec::new());
        writer.write(&IndexHeader::new(VERSION, entries.len() as u32).serialize()?)?;
        for entry in entries {
            writer.write(&entry.serialize()?)?;
        }

        Ok(Bytes::from(writer.write_checksum()?))
    }

    pub fn decode(bytes: &[u8], verify_checksum: bool) -> Result<Self> {
        let mut reader = Checksum::new(bytes);

        let header = IndexHeader::parse(&reader.read(HEADER_SIZE)?)?;
        tracing::debug!(
            version = header.version,
            entries = header.entries_count,
            "decoding index"
        );

        // the count is untrusted; entries are only allocated once read
        let mut entries = Vec::new();
        for _ in 0..header.entries_count {
            entries.push(IndexEntry::read_from(&mut reader)?);
        }

        reader.verify(verify_checksum)?;

        Ok(Index {
            version: header.version,
            entries,
        })
    }
}
