use super::pack::PackedPayload;

/// Bit-level reader over a packed payload
///
/// Bits are read MSB-first within each byte and stop at `bit_len`, so the
/// trailing padding of the final byte is never returned.
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Number of meaningful bits in `data`
    bit_len: usize,
    /// Next byte to load into the buffer
    byte_pos: usize,
    /// Buffer holding up to 64 bits, next bit in the MSB
    buffer: u64,
    /// Number of valid bits in buffer (0-64)
    bits_available: u8,
    /// Bits consumed so far
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader over the first `bit_len` bits of `data`
    pub fn new(data: &'a [u8], bit_len: usize) -> Self {
        let bit_len = bit_len.min(data.len() * 8);
        Self { data, bit_len, byte_pos: 0, buffer: 0, bits_available: 0, position: 0 }
    }

    /// Reader over a payload, excluding its padding bits
    pub fn from_payload(payload: &'a PackedPayload) -> Self {
        Self::new(&payload.bytes, payload.bit_len())
    }

    /// Bulk refill: load up to 8 bytes at once when the buffer runs dry
    fn fill_buffer(&mut self) {
        while self.bits_available <= 56 && self.byte_pos < self.data.len() {
            let byte = self.data[self.byte_pos] as u64;
            self.buffer |= byte << (56 - self.bits_available);
            self.bits_available += 8;
            self.byte_pos += 1;
        }
    }

    /// Read a single bit, or `None` once `bit_len` bits were consumed
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        if self.position >= self.bit_len {
            return None;
        }
        if self.bits_available == 0 {
            self.fill_buffer();
        }

        let bit = self.buffer >> 63 != 0;
        self.buffer <<= 1;
        self.bits_available -= 1;
        self.position += 1;
        Some(bit)
    }

    /// Bits consumed so far
    pub fn bit_position(&self) -> usize {
        self.position
    }

    /// Bits left before the end of the stream
    pub fn remaining(&self) -> usize {
        self.bit_len - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Read eight bits MSB-first into a byte
    fn read_byte(reader: &mut BitReader<'_>) -> Option<u8> {
        let mut value = 0u8;
        for _ in 0..8 {
            value = (value << 1) | reader.read_bit()? as u8;
        }
        Some(value)
    }

    #[test]
    fn test_read_bytes_msb_first() {
        let data = vec![0xD3, 0xAA];
        let mut reader = BitReader::new(&data, 16);
        assert_eq!(read_byte(&mut reader), Some(0xD3));
        assert_eq!(read_byte(&mut reader), Some(0xAA));
        assert_eq!(reader.read_bit(), None);
    }

    #[test]
    fn test_bit_position_through_mut_ref() {
        // Position must stay reachable while the reader is borrowed as an iterator
        let data = vec![0b1010_0000];
        let mut reader = BitReader::new(&data, 4);
        let borrowed = &mut reader;
        assert_eq!(borrowed.next(), Some(true));
        assert_eq!(borrowed.read_bit(), Some(false));
        assert_eq!(borrowed.bit_position(), 2);
        assert_eq!(borrowed.remaining(), 2);
    }

    #[test]
    fn test_read_bit() {
        let data = vec![0b1011_0001];
        let bits: Vec<bool> = BitReader::new(&data, 8).collect();
        assert_eq!(bits, vec![true, false, true, true, false, false, false, true]);
    }

    #[test]
    fn test_stops_at_bit_len() {
        let data = vec![0xFF, 0xFF];
        let mut reader = BitReader::new(&data, 10);
        assert_eq!(reader.remaining(), 10);
        assert_eq!(reader.by_ref().count(), 10);
        assert!(reader.is_exhausted());
        assert_eq!(reader.bit_position(), 10);
    }

    #[test]
    fn test_bit_len_clamped_to_data() {
        let data = vec![0x00];
        let reader = BitReader::new(&data, 100);
        assert_eq!(reader.remaining(), 8);
    }

    #[test]
    fn test_long_stream_refills() {
        let data: Vec<u8> = (0..=255u8).collect();
        let mut reader = BitReader::new(&data, data.len() * 8);
        for expected in 0..=255u8 {
            assert_eq!(read_byte(&mut reader), Some(expected));
        }
        assert_eq!(reader.read_bit(), None);
    }
}
