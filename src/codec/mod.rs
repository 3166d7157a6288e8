pub mod batch;
pub mod compress;
pub mod decompress;
pub mod progress;
pub mod stats;

pub use batch::{BatchJob, BatchMode, BatchProcessor, JobOutcome, JobReport};
pub use compress::{compress, CompressionResult};
pub use decompress::{decompress, Decompressed};
pub use progress::{ChannelProgress, NoProgress, ProgressEvent, ProgressSink};

use crate::container::{Container, Metadata};
use crate::error::Result;
use crate::CodecConfig;

/// RLE + Huffman codec bound to one configuration
#[derive(Clone, Debug, Default)]
pub struct HufCodec {
    config: CodecConfig,
}

impl HufCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress without assembling a container
    pub fn compress(&self, data: &[u8], progress: &mut dyn ProgressSink) -> Result<CompressionResult> {
        compress(data, &self.config, progress)
    }

    /// Compress and assemble the `.huf` container bytes
    pub fn compress_to_container(&self, data: &[u8], progress: &mut dyn ProgressSink) -> Result<Vec<u8>> {
        let result = self.compress(data, progress)?;
        Container::from_result(&result, &self.config.file_name).to_bytes()
    }

    pub fn decompress(&self, bytes: &[u8], progress: &mut dyn ProgressSink) -> Result<Decompressed> {
        decompress(bytes, &self.config, progress)
    }

    /// Read a container's metadata without decoding its payload
    pub fn inspect(bytes: &[u8]) -> Result<Metadata> {
        Ok(Container::parse(bytes)?.metadata)
    }
}
