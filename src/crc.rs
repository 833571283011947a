/*
    ti99hfe

    Copyright 2024 ti99hfe contributors

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/crc.rs

    Implements the byte-wise CRC-16 used to protect address and data records.

*/

//! CRC-16 used to protect the address and data records embedded in each encoded sector.
//!
//! This is not the standard bit-shifting CRC-CCITT; it is the nibble-folded byte-wise variant
//! the original toolchain uses, seeded with 0xffff for both address and data records.

/// Running CRC-16 state, expressed as the (msb, lsb) pair the original format stores on disk.
pub fn crc16(seed: u16, stream: &[u8]) -> (u8, u8) {
    let mut msb = (seed >> 8) as u8;
    let mut lsb = (seed & 0xff) as u8;
    for &b in stream {
        let mut x = b ^ msb;
        x ^= x >> 4;
        let new_msb = (lsb ^ (x >> 3) ^ (x << 4)) & 0xff;
        let new_lsb = (x ^ (x << 5)) & 0xff;
        msb = new_msb;
        lsb = new_lsb;
    }
    (msb, lsb)
}

/// Seed used for both ID and DATA record CRCs.
pub const SEED: u16 = 0xffff;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_is_deterministic() {
        let a = crc16(SEED, &[0xfe, 0, 0, 1, 1]);
        let b = crc16(SEED, &[0xfe, 0, 0, 1, 1]);
        assert_eq!(a, b);
    }

    #[test]
    fn crc_reacts_to_every_input_byte() {
        let a = crc16(SEED, &[0xfe, 0, 0, 1, 1]);
        let b = crc16(SEED, &[0xfe, 0, 0, 1, 2]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_stream_returns_seed() {
        let (msb, lsb) = crc16(SEED, &[]);
        assert_eq!((msb, lsb), ((SEED >> 8) as u8, (SEED & 0xff) as u8));
    }
}
