//! An immutable MSB-first bit reader over a byte buffer, built on top of
//! `bitstream-io` (already a dependency of this crate for the encoder
//! direction) rather than a hand-rolled bit cursor.

use bitstream_io::{BigEndian, BitRead, BitReader};
use std::io::Cursor;

use crate::error::{QrError, Result};

pub struct BitStream<'a> {
    reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    total_bits: usize,
    bits_read: usize,
}

impl<'a> BitStream<'a> {
    pub fn new(bytes: &'a [u8]) -> BitStream<'a> {
        BitStream {
            reader: BitReader::new(Cursor::new(bytes)),
            total_bits: bytes.len() * 8,
            bits_read: 0,
        }
    }

    pub fn remaining_bits(&self) -> usize {
        self.total_bits - self.bits_read
    }

    /// Reads `n` bits (n <= 32) MSB-first and returns them right-aligned.
    pub fn read_bits(&mut self, n: u32) -> Result<u32> {
        if (n as usize) > self.remaining_bits() {
            return Err(QrError::decode("not enough bits remaining in stream"));
        }
        let value: u32 = self
            .reader
            .read(n)
            .map_err(|e| QrError::decode(format!("bitstream read error: {}", e)))?;
        self.bits_read += n as usize;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_match_expected_sequence() {
        let bytes = [0x12u8, 0x34, 0x56, 0x78];
        let mut stream = BitStream::new(&bytes);
        assert_eq!(stream.remaining_bits(), 32);

        assert_eq!(stream.read_bits(4).unwrap(), 0x1);
        assert_eq!(stream.remaining_bits(), 28);

        assert_eq!(stream.read_bits(12).unwrap(), 0x234);
        assert_eq!(stream.remaining_bits(), 16);

        assert_eq!(stream.read_bits(12).unwrap(), 0x567);
        assert_eq!(stream.remaining_bits(), 4);

        assert_eq!(stream.read_bits(2).unwrap(), 2);
        assert_eq!(stream.remaining_bits(), 2);

        assert_eq!(stream.read_bits(2).unwrap(), 0);
        assert_eq!(stream.remaining_bits(), 0);
    }

    #[test]
    fn reading_past_the_end_is_a_decode_error() {
        let bytes = [0xFFu8];
        let mut stream = BitStream::new(&bytes);
        assert!(stream.read_bits(9).is_err());
    }
}
