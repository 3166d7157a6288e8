//! Diagnostic statistics derived during compression. None of these affect the output bytes.

/// Smallest whole-byte size the input could reach at `entropy` bits per symbol
pub fn theoretical_min_size(original_size: u64, entropy: f64) -> u64 {
    (original_size as f64 * entropy / 8.0).ceil() as u64
}

/// Theoretical minimum as a percentage of the actual compressed size, capped at 100
pub fn efficiency(theoretical_min: u64, compressed_size: u64) -> f64 {
    if compressed_size == 0 {
        return 0.0;
    }
    (theoretical_min as f64 / compressed_size as f64 * 100.0).min(100.0)
}

/// Compressed size as a percentage of the original size
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    compressed_size as f64 / original_size as f64 * 100.0
}
