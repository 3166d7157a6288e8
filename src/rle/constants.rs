/// Escape byte that introduces a (count, value) run triplet
pub const RLE_SENTINEL: u8 = 255;

/// Shortest run that is collapsed into a triplet
pub const RLE_MIN_RUN: usize = 4;

/// Longest run a single triplet can describe
pub const RLE_MAX_RUN: usize = 255;

/// Bytes in one escape triplet (sentinel, count, value)
pub const RLE_TRIPLET_SIZE: usize = 3;
