//! `.huf` container layout:
//!
//! ```text
//! [0, 4)          u32 LE  metadata length M
//! [4, 8)          u32 LE  tree length T
//! [8, 8+M)        metadata JSON object
//! [8+M, 8+M+T)    tree JSON record (or `null` for empty input)
//! [8+M+T, end)    packed payload
//! ```

use std::io::Write;

use super::constants::CONTAINER_HEADER_SIZE;
use super::metadata::Metadata;
use crate::bits::{checked_bit_len, BitReader};
use crate::codec::CompressionResult;
use crate::error::{Error, Result};
use crate::huffman::HuffmanTree;

/// Read the (metadata length, tree length) header and bounds-check it against the buffer
pub fn read_header(bytes: &[u8]) -> Result<(usize, usize)> {
    if bytes.len() < CONTAINER_HEADER_SIZE {
        return Err(Error::ContainerTooShort { len: bytes.len() });
    }

    let metadata_len = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let tree_len = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

    let declared = CONTAINER_HEADER_SIZE as u64 + metadata_len as u64 + tree_len as u64;
    if declared > bytes.len() as u64 {
        return Err(Error::ContainerTruncated { declared, actual: bytes.len() });
    }

    Ok((metadata_len as usize, tree_len as usize))
}

/// A parsed or about-to-be-written container. The payload is borrowed.
#[derive(Clone, Debug)]
pub struct Container<'a> {
    pub metadata: Metadata,
    /// `None` only for an empty original
    pub tree: Option<HuffmanTree>,
    pub payload: &'a [u8],
}

impl<'a> Container<'a> {
    /// Assemble a container from a compression result
    pub fn from_result(result: &'a CompressionResult, file_name: &str) -> Self {
        Self {
            metadata: Metadata::from_result(result, file_name),
            tree: result.tree.clone(),
            payload: &result.payload.bytes,
        }
    }

    /// Split a container buffer and parse its metadata and tree blocks
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let (metadata_len, tree_len) = read_header(bytes)?;

        let metadata_end = CONTAINER_HEADER_SIZE + metadata_len;
        let tree_end = metadata_end + tree_len;

        let metadata = Metadata::from_json(&bytes[CONTAINER_HEADER_SIZE..metadata_end])?;
        let tree: Option<HuffmanTree> = serde_json::from_slice(&bytes[metadata_end..tree_end])
            .map_err(|e| Error::InvalidTree(e.to_string()))?;

        Ok(Self { metadata, tree, payload: &bytes[tree_end..] })
    }

    /// Write the container and return the number of bytes written
    pub fn write<W: Write>(&self, mut writer: W) -> Result<usize> {
        let metadata = self.metadata.to_json()?;
        let tree = serde_json::to_vec(&self.tree).map_err(|e| Error::Internal(e.to_string()))?;

        let metadata_len = u32::try_from(metadata.len())
            .map_err(|_| Error::Internal("metadata block exceeds 4 GiB".to_string()))?;
        let tree_len = u32::try_from(tree.len())
            .map_err(|_| Error::Internal("tree block exceeds 4 GiB".to_string()))?;

        writer.write_all(&metadata_len.to_le_bytes())?;
        writer.write_all(&tree_len.to_le_bytes())?;
        writer.write_all(&metadata)?;
        writer.write_all(&tree)?;
        writer.write_all(self.payload)?;

        Ok(CONTAINER_HEADER_SIZE + metadata.len() + tree.len() + self.payload.len())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(CONTAINER_HEADER_SIZE + 512 + self.payload.len());
        self.write(&mut bytes)?;
        Ok(bytes)
    }

    /// Reader over the payload bits, excluding the padding recorded in the metadata
    pub fn bit_reader(&self) -> Result<BitReader<'a>> {
        let bit_len = checked_bit_len(self.payload.len(), self.metadata.padding)?;
        Ok(BitReader::new(self.payload, bit_len))
    }
}
