pub mod constants;
pub mod transform;

pub use constants::*;
pub use transform::{has_sentinel_collision, rle_decode, rle_encode};
