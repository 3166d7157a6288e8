pub mod pack;
pub mod reader;
pub mod writer;

pub use pack::{checked_bit_len, pack_bits, unpack_bits, PackedPayload};
pub use reader::BitReader;
pub use writer::BitWriter;
