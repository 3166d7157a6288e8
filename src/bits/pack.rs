use super::{BitReader, BitWriter};
use crate::error::{Error, Result};

/// Packed bit stream: whole bytes plus the count of zero filler bits in the last one
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PackedPayload {
    pub bytes: Vec<u8>,
    /// Filler bits at the end of the last byte (0-7)
    pub padding: u8,
}

impl PackedPayload {
    /// Validate a payload read back from a container
    pub fn new(bytes: Vec<u8>, padding: u8) -> Result<Self> {
        checked_bit_len(bytes.len(), padding)?;
        Ok(Self { bytes, padding })
    }

    /// Number of meaningful bits
    pub fn bit_len(&self) -> usize {
        (self.bytes.len() * 8).saturating_sub(self.padding as usize)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Meaningful bits in `byte_len` bytes ending in `padding` filler bits
pub fn checked_bit_len(byte_len: usize, padding: u8) -> Result<usize> {
    if padding > 7 || (byte_len == 0 && padding != 0) {
        return Err(Error::InvalidPadding(padding));
    }
    Ok(byte_len * 8 - padding as usize)
}

/// Pack a bit sequence MSB-first, zero-padding the final byte
pub fn pack_bits(bits: &[bool]) -> PackedPayload {
    let mut writer = BitWriter::with_capacity(bits.len().div_ceil(8));
    for &bit in bits {
        writer.write_bit(bit);
    }
    writer.finish()
}

/// Expand a payload back into its bits, dropping the padding
pub fn unpack_bits(payload: &PackedPayload) -> Vec<bool> {
    BitReader::from_payload(payload).collect()
}
