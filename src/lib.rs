//! Lossless byte codec: a run-length preprocessor feeding a static Huffman coder,
//! wrapped in the self-describing `.huf` container.
//!
//! ```
//! let data = b"aaaaabbbbbcccccdddddeeeee and some text".to_vec();
//! let container = rlehuff::compress(&data)?;
//! let restored = rlehuff::decompress(&container)?;
//! assert_eq!(restored.data, data);
//! # Ok::<(), rlehuff::Error>(())
//! ```

pub mod bits;
pub mod codec;
pub mod container;
pub mod error;
pub mod huffman;
pub mod rle;

pub use codec::{
    BatchJob, BatchMode, BatchProcessor, ChannelProgress, CompressionResult, Decompressed,
    HufCodec, NoProgress, ProgressEvent, ProgressSink,
};
pub use container::{Container, Metadata};
pub use error::{Error, Result};
pub use huffman::{CodeTable, FrequencyTable, HuffmanNode, HuffmanTree};

/// Structural bytes of markup and structured text that get a frequency boost
pub const DEFAULT_MARKER_BYTES: &[u8] = b"<>/=\"{}[]:,\n";

/// Multiplier applied to the counts of present marker bytes
pub const DEFAULT_MARKER_BOOST: f64 = 1.2;

/// Configuration for compression and decompression
#[derive(Clone, Debug)]
pub struct CodecConfig {
    /// Bytes whose frequency is boosted before tree construction
    pub marker_bytes: Vec<u8>,
    /// Boost factor for marker bytes (counts are floored after scaling)
    pub marker_boost: f64,
    /// Number of evenly spaced progress reports during encoding
    pub progress_steps: usize,
    /// Original file name recorded in the container metadata
    pub file_name: String,
    /// Check the CRC32 recorded in the metadata after decoding
    pub verify_checksum: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            marker_bytes: DEFAULT_MARKER_BYTES.to_vec(),
            marker_boost: DEFAULT_MARKER_BOOST,
            progress_steps: 20,
            file_name: String::new(),
            verify_checksum: true,
        }
    }
}

/// Statistics from a compression call
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompressionStats {
    pub original_size: u64,
    /// Size after the run-length transform
    pub transformed_size: u64,
    /// Packed payload size
    pub compressed_size: u64,
    /// Distinct byte values after the run-length transform
    pub distinct_bytes: usize,
    /// Bits per symbol of the transformed input
    pub entropy: f64,
    pub theoretical_min_size: u64,
    /// Theoretical minimum as a percentage of the payload size, capped at 100
    pub efficiency: f64,
    /// Payload size as a percentage of the original size
    pub compression_ratio: f64,
    pub tree_depth: usize,
    /// Input contains a literal 0xFF the run decoder will misread
    pub sentinel_collision: bool,
}

/// Compress `data` into container bytes with the default configuration
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    HufCodec::default().compress_to_container(data, &mut NoProgress)
}

/// Decompress container bytes with the default configuration
pub fn decompress(bytes: &[u8]) -> Result<Decompressed> {
    HufCodec::default().decompress(bytes, &mut NoProgress)
}
