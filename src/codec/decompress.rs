use log::debug;

use super::progress::{stage, ProgressSink, ProgressTracker};
use crate::container::{Container, Metadata};
use crate::error::{Error, Result};
use crate::rle::rle_decode;
use crate::CodecConfig;

/// Output of one decompression call
#[derive(Clone, Debug)]
pub struct Decompressed {
    pub data: Vec<u8>,
    pub metadata: Metadata,
}

/// Recover the original bytes from a container buffer
pub fn decompress(
    bytes: &[u8],
    config: &CodecConfig,
    progress: &mut dyn ProgressSink,
) -> Result<Decompressed> {
    let mut progress = ProgressTracker::new(progress);

    // Phase 1: Split container and parse blocks
    progress.report(0, stage::READING);
    let container = Container::parse(bytes)?;
    let mut bits = container.bit_reader()?;
    debug!(
        "Container: {} payload bytes, {} bits, original size {}",
        container.payload.len(),
        bits.remaining(),
        container.metadata.original_size
    );

    // Phase 2: Walk the tree
    progress.report(20, stage::DECODING);
    let transformed = match &container.tree {
        Some(tree) => {
            // Every code is at least one bit; most are several
            let size_hint = bits.remaining() / tree.depth().max(1);
            tree.decode(&mut bits, size_hint)?
        }
        None if container.metadata.original_size == 0 && bits.is_exhausted() => Vec::new(),
        None => return Err(Error::InvalidTree("missing tree for non-empty payload".to_string())),
    };

    // Phase 3: Undo the run-length transform
    progress.report(80, stage::EXPANDING);
    let data = rle_decode(&transformed);
    debug!("Decoded {} symbols, expanded to {} bytes", transformed.len(), data.len());

    // Phase 4: Integrity checks
    progress.report(90, stage::VERIFYING);
    let metadata = container.metadata;
    if data.len() as u64 != metadata.original_size {
        return Err(Error::SizeMismatch { expected: metadata.original_size, found: data.len() as u64 });
    }
    if config.verify_checksum {
        if let Some(expected) = metadata.crc32 {
            let found = crc32fast::hash(&data);
            if found != expected {
                return Err(Error::ChecksumMismatch { expected, found });
            }
        }
    }

    progress.report(100, stage::COMPLETE);

    Ok(Decompressed { data, metadata })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{compress, NoProgress};

    fn container_for(data: &[u8]) -> Vec<u8> {
        let result = compress(data, &CodecConfig::default(), &mut NoProgress).unwrap();
        Container::from_result(&result, "test.bin").to_bytes().unwrap()
    }

    fn decompress_default(bytes: &[u8]) -> Result<Decompressed> {
        decompress(bytes, &CodecConfig::default(), &mut NoProgress)
    }

    #[test]
    fn test_round_trip_scenarios() {
        for data in [
            vec![],
            vec![42],
            vec![65, 65, 65, 65, 65, 66],
            vec![7, 7, 7, 7, 7],
            vec![7, 7, 7],
            vec![1, 2, 1, 2, 2],
            b"the quick brown fox jumps over the lazy dog".to_vec(),
        ] {
            let out = decompress_default(&container_for(&data)).unwrap();
            assert_eq!(out.data, data);
            assert_eq!(out.metadata.original_size, data.len() as u64);
            assert_eq!(out.metadata.file_name, "test.bin");
        }
    }

    #[test]
    fn test_sentinel_collision_surfaces_as_error() {
        // [255, 3, 7] expands to [7, 7, 7]: same length, different bytes
        let err = decompress_default(&container_for(&[255, 3, 7])).unwrap_err();
        assert!(matches!(err, Error::ChecksumMismatch { .. }));

        // [1, 255, 9, 9] expands to 1 followed by nine 9s
        let err = decompress_default(&container_for(&[1, 255, 9, 9])).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 4, found: 10 }));
    }

    #[test]
    fn test_corrupt_payload_detected() {
        let mut bytes = container_for(b"abcdefgh abcdefgh abcdefgh");
        let (metadata_len, tree_len) = crate::container::read_header(&bytes).unwrap();
        let payload_start = 8 + metadata_len + tree_len;
        bytes[payload_start] ^= 0x80;
        assert!(decompress_default(&bytes).is_err());
    }

    #[test]
    fn test_checksum_can_be_skipped() {
        let data = b"hello hello";
        let result = compress(data, &CodecConfig::default(), &mut NoProgress).unwrap();
        let mut container = Container::from_result(&result, "");
        container.metadata.crc32 = Some(result.crc32 ^ 1);
        let bytes = container.to_bytes().unwrap();

        assert!(matches!(decompress_default(&bytes), Err(Error::ChecksumMismatch { .. })));
        let config = CodecConfig { verify_checksum: false, ..Default::default() };
        assert_eq!(decompress(&bytes, &config, &mut NoProgress).unwrap().data, data);
    }

    #[test]
    fn test_missing_tree_with_payload() {
        let result = compress(b"abc", &CodecConfig::default(), &mut NoProgress).unwrap();
        let mut container = Container::from_result(&result, "");
        container.tree = None;
        let bytes = container.to_bytes().unwrap();
        let err = decompress_default(&bytes).unwrap_err();
        assert!(matches!(err, Error::InvalidTree(_)));
    }

    #[test]
    fn test_progress_reaches_complete() {
        let bytes = container_for(b"progress");
        let mut last = None;
        {
            let mut sink = |p: u8, s: &str| last = Some((p, s.to_string()));
            decompress(&bytes, &CodecConfig::default(), &mut sink).unwrap();
        }
        assert_eq!(last, Some((100, stage::COMPLETE.to_string())));
    }
}
