use log::{debug, trace, warn};

use super::progress::{stage, ProgressSink, ProgressTracker};
use super::stats::{compression_ratio, efficiency, theoretical_min_size};
use crate::bits::{BitWriter, PackedPayload};
use crate::error::{Error, Result};
use crate::huffman::{CodeTable, FrequencyTable, HuffmanTree};
use crate::rle::{has_sentinel_collision, rle_encode};
use crate::{CodecConfig, CompressionStats};

/// Percentage band covered by the encode loop
const ENCODE_START: u8 = 30;
const ENCODE_END: u8 = 90;

/// Output of one compression call
#[derive(Clone, Debug)]
pub struct CompressionResult {
    pub payload: PackedPayload,
    /// `None` only for empty input
    pub tree: Option<HuffmanTree>,
    pub stats: CompressionStats,
    /// CRC32 of the original bytes
    pub crc32: u32,
}

impl CompressionResult {
    /// Degenerate result for zero-length input
    fn empty() -> Self {
        Self {
            payload: PackedPayload::default(),
            tree: None,
            stats: CompressionStats::default(),
            crc32: crc32fast::hash(&[]),
        }
    }
}

/// Run the full compression pipeline over `data`
pub fn compress(
    data: &[u8],
    config: &CodecConfig,
    progress: &mut dyn ProgressSink,
) -> Result<CompressionResult> {
    let mut progress = ProgressTracker::new(progress);

    // Phase 1: Run-length preprocessing
    progress.report(0, stage::PREPROCESSING);
    if data.is_empty() {
        debug!("Empty input, producing degenerate result");
        progress.report(100, stage::COMPLETE);
        return Ok(CompressionResult::empty());
    }

    let crc32 = crc32fast::hash(data);
    let transformed = rle_encode(data);
    debug!("RLE transform: {} -> {} bytes", data.len(), transformed.len());

    let sentinel_collision = has_sentinel_collision(data, &transformed);
    if sentinel_collision {
        warn!("Input contains literal 0xFF bytes that the run decoder will misread; round-trip will fail");
    }

    // Phase 2: Frequency analysis
    progress.report(10, stage::ANALYZING);
    let frequencies = FrequencyTable::from_bytes(&transformed);
    let weights = frequencies.boosted(&config.marker_bytes, config.marker_boost);
    trace!("Frequency table: {:?}", frequencies.iter().collect::<Vec<_>>());

    // Phase 3: Tree and code table
    progress.report(20, stage::BUILDING_TREE);
    let tree = HuffmanTree::build(&weights)
        .ok_or_else(|| Error::Internal("empty frequency table for non-empty input".to_string()))?;
    let codes = CodeTable::from_tree(&tree);
    debug!("Huffman tree: {} leaves, depth {}", tree.leaf_count(), tree.depth());

    // Phase 4: Encode
    progress.report(ENCODE_START, stage::ENCODING);
    let lookup = codes.to_lookup();
    let mut writer = BitWriter::with_capacity(transformed.len());
    let report_every = (transformed.len() / config.progress_steps.max(1)).max(1);

    for (i, &byte) in transformed.iter().enumerate() {
        let code = lookup[byte as usize]
            .ok_or_else(|| Error::Internal(format!("byte {} not in code table", byte)))?;
        writer.write_code(code);

        if (i + 1) % report_every == 0 {
            progress.report_fraction(ENCODE_START, ENCODE_END, i + 1, transformed.len(), stage::ENCODING);
        }
    }

    // Phase 5: Pack and summarize
    progress.report(ENCODE_END, stage::PACKING);
    let payload = writer.finish();

    let original_size = data.len() as u64;
    let compressed_size = payload.len() as u64;
    let entropy = frequencies.entropy(transformed.len() as u64);
    let theoretical_min = theoretical_min_size(original_size, entropy);

    let stats = CompressionStats {
        original_size,
        transformed_size: transformed.len() as u64,
        compressed_size,
        distinct_bytes: frequencies.distinct(),
        entropy,
        theoretical_min_size: theoretical_min,
        efficiency: efficiency(theoretical_min, compressed_size),
        compression_ratio: compression_ratio(original_size, compressed_size),
        tree_depth: tree.depth(),
        sentinel_collision,
    };
    debug!(
        "Compressed {} -> {} bytes ({:.2}%), entropy {:.4} bits/symbol, padding {}",
        original_size, compressed_size, stats.compression_ratio, entropy, payload.padding
    );

    progress.report(100, stage::COMPLETE);

    Ok(CompressionResult { payload, tree: Some(tree), stats, crc32 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::unpack_bits;
    use crate::codec::NoProgress;

    fn compress_default(data: &[u8]) -> CompressionResult {
        compress(data, &CodecConfig::default(), &mut NoProgress).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let result = compress_default(&[]);
        assert!(result.payload.is_empty());
        assert_eq!(result.payload.padding, 0);
        assert!(result.tree.is_none());
        assert_eq!(result.stats.original_size, 0);
        assert_eq!(result.stats.compressed_size, 0);
        assert_eq!(result.crc32, 0);
    }

    #[test]
    fn test_five_a_one_b() {
        let result = compress_default(&[65, 65, 65, 65, 65, 66]);
        assert_eq!(result.stats.original_size, 6);
        assert_eq!(result.stats.transformed_size, 4);
        assert_eq!(result.stats.distinct_bytes, 4);
        assert!((result.stats.entropy - 2.0).abs() < 1e-12);
        // Four 2-bit codes: 5=00 65=01 66=10 255=11, stream 11 00 01 10
        assert_eq!(result.payload.bytes, vec![0b1100_0110]);
        assert_eq!(result.payload.padding, 0);
        assert_eq!(result.stats.compressed_size, 1);
        assert_eq!(result.stats.theoretical_min_size, 2);
        assert_eq!(result.stats.efficiency, 100.0);
    }

    #[test]
    fn test_single_symbol_input() {
        let result = compress_default(&[7, 7, 7]);
        let tree = result.tree.as_ref().unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.weight(), 3);
        assert_eq!(unpack_bits(&result.payload), vec![false; 3]);
        assert_eq!(result.payload.padding, 5);
    }

    #[test]
    fn test_marker_boost_changes_weights_only() {
        let data = b"<a><b>";
        let plain = compress(data, &CodecConfig { marker_bytes: vec![], ..Default::default() }, &mut NoProgress)
            .unwrap();
        let boosted = compress_default(data);
        assert_eq!(plain.stats.entropy, boosted.stats.entropy);
        assert_eq!(plain.tree.as_ref().unwrap().weight(), 6);
        // '<' and '>' occur twice each: floor(2 * 1.2) = 2, so the tree weight is unchanged
        assert_eq!(boosted.tree.as_ref().unwrap().weight(), 6);

        let heavy = b"<<<>>><<<";
        let boosted = compress_default(heavy);
        // '<' x6 -> 7, '>' x3 -> 3
        assert_eq!(boosted.tree.as_ref().unwrap().weight(), 10);
    }

    #[test]
    fn test_progress_milestones() {
        let mut seen: Vec<(u8, String)> = Vec::new();
        let data: Vec<u8> = (0..1000u32).map(|i| (i % 50) as u8).collect();
        {
            let mut sink = |p: u8, s: &str| seen.push((p, s.to_string()));
            compress(&data, &CodecConfig::default(), &mut sink).unwrap();
        }
        assert_eq!(seen.first().map(|(p, _)| *p), Some(0));
        assert_eq!(seen.last(), Some(&(100, stage::COMPLETE.to_string())));
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
        let encoding = seen.iter().filter(|(_, s)| s == stage::ENCODING).count();
        assert!(encoding > 5);
        for label in [stage::PREPROCESSING, stage::ANALYZING, stage::BUILDING_TREE, stage::PACKING] {
            assert!(seen.iter().any(|(_, s)| s == label), "missing {}", label);
        }
    }

    #[test]
    fn test_sentinel_collision_flag() {
        assert!(compress_default(&[255, 3, 7]).stats.sentinel_collision);
        assert!(!compress_default(&[255, 255, 255, 255, 1]).stats.sentinel_collision);
        assert!(!compress_default(b"plain text").stats.sentinel_collision);
    }
}
