//! Byte-level run-length transform applied before entropy coding.
//!
//! Runs of [`RLE_MIN_RUN`] or more identical bytes become a three byte
//! triplet `[RLE_SENTINEL, count, value]`. Shorter runs are copied through
//! unchanged, which includes literal sentinel bytes. The decoder treats any
//! sentinel followed by at least two bytes as a triplet, so a literal 255
//! in the input can be misread on the way back. [`has_sentinel_collision`]
//! detects inputs where that happens.

use super::constants::*;

/// Forward transform: collapse runs of 4..=255 identical bytes into triplets
pub fn rle_encode(data: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        let value = data[i];

        // Count consecutive same values, capped at the triplet maximum
        let run = data[i..].iter().take(RLE_MAX_RUN).take_while(|&&b| b == value).count();

        if run >= RLE_MIN_RUN {
            encoded.push(RLE_SENTINEL);
            encoded.push(run as u8);
            encoded.push(value);
        } else {
            encoded.extend_from_slice(&data[i..i + run]);
        }

        i += run;
    }

    encoded
}

/// Inverse transform: expand every sentinel that has two bytes after it
pub fn rle_decode(data: &[u8]) -> Vec<u8> {
    let mut decoded = Vec::with_capacity(data.len() * 2);
    let mut i = 0;

    while i < data.len() {
        if data[i] == RLE_SENTINEL && i + 2 < data.len() {
            let count = data[i + 1] as usize;
            let value = data[i + 2];
            decoded.resize(decoded.len() + count, value);
            i += RLE_TRIPLET_SIZE;
        } else {
            decoded.push(data[i]);
            i += 1;
        }
    }

    decoded
}

/// Whether `rle_decode(encoded)` would fail to reproduce `original`.
///
/// Inputs without a sentinel byte always round-trip, so the full inverse is
/// only run when one is present.
pub fn has_sentinel_collision(original: &[u8], encoded: &[u8]) -> bool {
    if memchr::memchr(RLE_SENTINEL, original).is_none() {
        return false;
    }
    rle_decode(encoded) != original
}
