use super::pack::PackedPayload;
use crate::huffman::Code;

/// Bit-level writer for the packed payload
///
/// Writes bits MSB-first: the first bit written lands in bit 7 of the first byte.
pub struct BitWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { output: Vec::with_capacity(65536), current_byte: 0, bits_in_byte: 0 }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { output: Vec::with_capacity(capacity), current_byte: 0, bits_in_byte: 0 }
    }

    /// Write a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.current_byte |= (bit as u8) << (7 - self.bits_in_byte);
        self.bits_in_byte += 1;

        if self.bits_in_byte == 8 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Write a Huffman code path
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Zero bits needed to reach the next byte boundary (0-7)
    pub fn padding(&self) -> u8 {
        (8 - self.bits_in_byte) % 8
    }

    /// Total bits written so far
    pub fn bit_len(&self) -> usize {
        self.output.len() * 8 + self.bits_in_byte as usize
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Finish and return the output bytes with the padding that was added
    pub fn finish(mut self) -> PackedPayload {
        let padding = self.padding();
        self.align_to_byte();
        PackedPayload { bytes: self.output, padding }
    }

    /// Get current output length in bytes (including partial byte)
    pub fn len(&self) -> usize {
        self.output.len() + if self.bits_in_byte > 0 { 1 } else { 0 }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.bits_in_byte == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
