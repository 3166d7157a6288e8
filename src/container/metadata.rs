use serde::{Deserialize, Serialize};

use super::constants::{FORMAT_VERSION, SUPPORTED_MAJOR_VERSION};
use crate::codec::CompressionResult;
use crate::error::{Error, Result};

/// Metadata block of a container, stored as a JSON object
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Size of the uncompressed input in bytes
    pub original_size: u64,
    /// Filler bits at the end of the payload (0-7)
    pub padding: u8,
    /// Distinct byte values in the RLE-transformed input
    pub distinct_bytes: usize,
    /// Bits per symbol of the RLE-transformed input
    pub entropy: f64,
    /// Payload size as a percentage of the original size
    pub compression_ratio: f64,
    pub file_name: String,
    /// Theoretical minimum as a percentage of the payload size
    pub efficiency: f64,
    pub version: String,
    /// CRC32 of the original bytes; absent in containers from older writers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc32: Option<u32>,
}

impl Metadata {
    pub fn from_result(result: &CompressionResult, file_name: &str) -> Self {
        let stats = &result.stats;
        Self {
            original_size: stats.original_size,
            padding: result.payload.padding,
            distinct_bytes: stats.distinct_bytes,
            entropy: stats.entropy,
            compression_ratio: stats.compression_ratio,
            file_name: file_name.to_string(),
            efficiency: stats.efficiency,
            version: FORMAT_VERSION.to_string(),
            crc32: Some(result.crc32),
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| Error::Internal(e.to_string()))
    }

    /// Parse and version-check a metadata block
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let metadata: Self =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidMetadata(e.to_string()))?;

        if metadata.version.split('.').next() != Some(SUPPORTED_MAJOR_VERSION) {
            return Err(Error::UnsupportedVersion(metadata.version));
        }
        if metadata.padding > 7 {
            return Err(Error::InvalidPadding(metadata.padding));
        }

        Ok(metadata)
    }
}
