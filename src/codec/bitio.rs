//! MSB-first bit packing for the grid stream.
//!
//! The writer zero pads its last byte. The reader cannot tell padding from
//! data, so callers stop once they have read as many symbols as they need.

/// Appends bits MSB-first after an optional byte prefix.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    /// the partial byte, filled from the most significant bit down
    bit_buffer: u8,
    bit_count: u8,
}

impl BitWriter {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a writer whose output begins with the given bytes
    pub fn with_prefix(prefix: &[u8]) -> Self {
        Self {
            bytes: prefix.to_vec(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    #[allow(missing_docs)]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Writes the lowest `count` bits of `value`, most significant first
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32);
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }
    }

    /// Flushes the partial byte, zero padded, and returns everything written
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// total bits written, prefix included
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }
}

/// Reads bits MSB-first. Every read returns `None` once the data runs out.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// 0 is the MSB of the first byte
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    #[allow(missing_docs)]
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    #[allow(missing_docs)]
    pub fn read_bit(&mut self) -> Option<bool> {
        let byte = *self.data.get(self.bit_position / 8)?;
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Some(bit)
    }

    /// Reads `count` bits in to the low end of the result. Nothing is
    /// consumed when fewer than `count` bits remain.
    pub fn read_bits(&mut self, count: u8) -> Option<u32> {
        debug_assert!(count <= 32);
        if (count as usize) > self.bits_remaining() {
            return None;
        }
        let mut value = 0;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Some(value)
    }

    #[allow(missing_docs)]
    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_byte_is_zero_padded() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.write_bits(0b11, 2);
        assert_eq!(writer.bit_len(), 5);
        assert_eq!(writer.finish(), vec![0b1011_1000]);
    }

    #[test]
    fn test_prefix_is_kept_verbatim() {
        let mut writer = BitWriter::with_prefix(&[7, 9]);
        writer.write_bits(0b1_0100_0001, 9);
        assert_eq!(writer.bit_len(), 25);
        assert_eq!(writer.finish(), vec![7, 9, 0b1010_0000, 0b1000_0000]);
    }

    #[test]
    fn test_read_across_bytes() {
        let data = [0b1010_1011, 0b1111_0000];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bit(), Some(true));
        assert_eq!(reader.read_bits(5), Some(0b01010));
        assert_eq!(reader.read_bits(6), Some(0b111111));
        assert_eq!(reader.bits_remaining(), 4);
        assert_eq!(reader.read_bits(5), None);
        assert_eq!(reader.bits_remaining(), 4);
        assert_eq!(reader.read_bits(4), Some(0));
        assert_eq!(reader.read_bit(), None);
    }
}
