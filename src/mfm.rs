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

    src/mfm.rs

    Implements the double-density MFM bitstream codec: encoding table, decode, and field layout.

*/

//! Double-density (MFM, modified frequency modulation) bitstream codec.
//!
//! Each decoded byte is encoded as 2 bytes on the media. [`encode`] is a table lookup;
//! [`decode`] inverts the table via a lazily built reverse map, special-casing the address
//! mark word (which intentionally violates the normal clock-bit rule) and falling back to
//! an alternate clock bit when the direct word is not present in the table.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Number of sectors per MFM track.
pub const SECTORS: usize = 18;
/// Length in decoded bytes of a complete MFM track (leadin + 18 sectors + leadout).
pub const TRACK_LEN: usize = 32 + SECTORS * 342 + 84;

pub const LV_LEADIN: usize = 32;
pub const LV_LEADOUT: usize = 84;
pub const LV_PREGAP: usize = 12;
pub const LV_ADDRESS_MARK: usize = 4;
pub const LV_GAP1: usize = 34;
pub const LV_DATA_MARK: usize = 4;
pub const LV_GAP2: usize = 24;

/// Decoded value of the sector address mark, repeated three times before the mark byte.
pub const V_ADDRESS_MARK_BYTE: u8 = 0xa1;
/// Decoded value of the whole 4-byte ID address mark.
pub const V_ADDRESS_MARK: [u8; 4] = [0xa1, 0xa1, 0xa1, 0xfe];
/// Decoded value of the whole 4-byte data mark.
pub const V_DATA_MARK: [u8; 4] = [0xa1, 0xa1, 0xa1, 0xfb];

/// Encoded word for the synchronization mark shared by the address and data marks.
const ADDRESS_MARK_WORD: u16 = 0x2291;

/// Raw encoded leadin bytes.
pub fn leadin() -> Vec<u8> {
    std::iter::repeat([0x49u8, 0x2a]).take(LV_LEADIN).flatten().collect()
}

/// Raw encoded leadout bytes.
pub fn leadout() -> Vec<u8> {
    std::iter::repeat([0x49u8, 0x2a]).take(LV_LEADOUT).flatten().collect()
}

/// Raw encoded address mark (three sync bytes, then the byte that decodes to 0xfe).
pub const ADDRESS_MARK: [u8; 8] = [0x22, 0x91, 0x22, 0x91, 0x22, 0x91, 0xaa, 0x2a];
/// Raw encoded data mark (three sync bytes, then the byte that decodes to 0xfb).
pub const DATA_MARK: [u8; 8] = [0x22, 0x91, 0x22, 0x91, 0x22, 0x91, 0xaa, 0xa2];

/// Raw encoded pregap.
pub fn pregap() -> Vec<u8> {
    std::iter::repeat(0x55u8).take(2 * LV_PREGAP).collect()
}

/// Raw encoded gap1.
pub fn gap1() -> Vec<u8> {
    let mut v: Vec<u8> = std::iter::repeat([0x49u8, 0x2a]).take(22).flatten().collect();
    v.extend(std::iter::repeat(0x55u8).take(2 * 12));
    v
}

/// Raw encoded gap2.
pub fn gap2() -> Vec<u8> {
    std::iter::repeat([0x49u8, 0x2a]).take(24).flatten().collect()
}

/// Encode a single byte into its 2-byte MFM representation.
pub fn encode(byte: u8) -> [u8; 2] {
    MVM_CODES[byte as usize]
}

fn reverse_table() -> &'static HashMap<u16, u8> {
    static TABLE: OnceLock<HashMap<u16, u8>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut map = HashMap::with_capacity(MVM_CODES.len());
        for (byte, word) in MVM_CODES.iter().enumerate() {
            let key = ((word[0] as u16) << 8) | word[1] as u16;
            map.insert(key, byte as u8);
        }
        for (&key, _) in map.clone().iter() {
            debug_assert!(
                !map.contains_key(&(key | 0x0100)) || map[&(key | 0x0100)] == map[&key],
                "MVM_CODES entries collide under the alternate clock bit"
            );
        }
        map
    })
}

/// Decode a 2-byte MFM group back into a single byte.
pub fn decode(group: [u8; 2]) -> u8 {
    let w = ((group[0] as u16) << 8) | group[1] as u16;
    if w == ADDRESS_MARK_WORD {
        return V_ADDRESS_MARK_BYTE;
    }
    let table = reverse_table();
    if let Some(&b) = table.get(&w) {
        b
    } else {
        *table
            .get(&(w | 0x0100))
            .unwrap_or_else(|| panic!("MFM word {w:#06x} has no table entry under either clock bit"))
    }
}

/// Decode a whole MFM-encoded byte stream (length a multiple of 2).
pub fn decode_stream(stream: &[u8]) -> Vec<u8> {
    stream.chunks_exact(2).map(|c| decode([c[0], c[1]])).collect()
}

/// Regular sector interleave table; the only one DD uses (no 80-track quirk on DD media).
pub const SECTOR_INTERLEAVE: [u8; 18] = [0, 11, 4, 15, 8, 1, 12, 5, 16, 9, 2, 13, 6, 17, 10, 3, 14, 7];

/// Compute the physical sector id for a given logical slot. `side`/`track`/`wtf_80t` are
/// accepted for interface parity with [`crate::fm::interleave`] but unused: DD interleave
/// depends only on the sector slot.
pub fn interleave(_side: u8, _track: usize, sector: usize, _wtf_80t: bool) -> u8 {
    ((sector * 11) % SECTORS) as u8
}

/// Clear the extra clock bit the table encoding leaves set between adjacent encoded bytes.
///
/// Walks the already-assembled track two bytes at a time; whenever the high bit of an
/// odd-positioned encoded byte is set, the low bit of the following byte is cleared.
pub fn fix_clocks(stream: &mut [u8]) {
    let mut idx = 1;
    while idx + 1 < stream.len() {
        if stream[idx] & 0x80 != 0 {
            stream[idx + 1] &= 0xfe;
        }
        idx += 2;
    }
}

// Entries computed as w = int(bits[7::-1], 2) * 256 + int(bits[:7:-1], 2) in the reference
// implementation; reproduced here verbatim, indexed by the decoded data byte.
#[rustfmt::skip]
pub const MVM_CODES: [[u8; 2]; 256] = [
    [0x55, 0x55], [0x55, 0x95], [0x55, 0x25], [0x55, 0xA5], [0x55, 0x49], [0x55, 0x89], [0x55, 0x29], [0x55, 0xA9],
    [0x55, 0x52], [0x55, 0x92], [0x55, 0x22], [0x55, 0xA2], [0x55, 0x4A], [0x55, 0x8A], [0x55, 0x2A], [0x55, 0xAA],
    [0x95, 0x54], [0x95, 0x94], [0x95, 0x24], [0x95, 0xA4], [0x95, 0x48], [0x95, 0x88], [0x95, 0x28], [0x95, 0xA8],
    [0x95, 0x52], [0x95, 0x92], [0x95, 0x22], [0x95, 0xA2], [0x95, 0x4A], [0x95, 0x8A], [0x95, 0x2A], [0x95, 0xAA],
    [0x25, 0x55], [0x25, 0x95], [0x25, 0x25], [0x25, 0xA5], [0x25, 0x49], [0x25, 0x89], [0x25, 0x29], [0x25, 0xA9],
    [0x25, 0x52], [0x25, 0x92], [0x25, 0x22], [0x25, 0xA2], [0x25, 0x4A], [0x25, 0x8A], [0x25, 0x2A], [0x25, 0xAA],
    [0xA5, 0x54], [0xA5, 0x94], [0xA5, 0x24], [0xA5, 0xA4], [0xA5, 0x48], [0xA5, 0x88], [0xA5, 0x28], [0xA5, 0xA8],
    [0xA5, 0x52], [0xA5, 0x92], [0xA5, 0x22], [0xA5, 0xA2], [0xA5, 0x4A], [0xA5, 0x8A], [0xA5, 0x2A], [0xA5, 0xAA],
    [0x49, 0x55], [0x49, 0x95], [0x49, 0x25], [0x49, 0xA5], [0x49, 0x49], [0x49, 0x89], [0x49, 0x29], [0x49, 0xA9],
    [0x49, 0x52], [0x49, 0x92], [0x49, 0x22], [0x49, 0xA2], [0x49, 0x4A], [0x49, 0x8A], [0x49, 0x2A], [0x49, 0xAA],
    [0x89, 0x54], [0x89, 0x94], [0x89, 0x24], [0x89, 0xA4], [0x89, 0x48], [0x89, 0x88], [0x89, 0x28], [0x89, 0xA8],
    [0x89, 0x52], [0x89, 0x92], [0x89, 0x22], [0x89, 0xA2], [0x89, 0x4A], [0x89, 0x8A], [0x89, 0x2A], [0x89, 0xAA],
    [0x29, 0x55], [0x29, 0x95], [0x29, 0x25], [0x29, 0xA5], [0x29, 0x49], [0x29, 0x89], [0x29, 0x29], [0x29, 0xA9],
    [0x29, 0x52], [0x29, 0x92], [0x29, 0x22], [0x29, 0xA2], [0x29, 0x4A], [0x29, 0x8A], [0x29, 0x2A], [0x29, 0xAA],
    [0xA9, 0x54], [0xA9, 0x94], [0xA9, 0x24], [0xA9, 0xA4], [0xA9, 0x48], [0xA9, 0x88], [0xA9, 0x28], [0xA9, 0xA8],
    [0xA9, 0x52], [0xA9, 0x92], [0xA9, 0x22], [0xA9, 0xA2], [0xA9, 0x4A], [0xA9, 0x8A], [0xA9, 0x2A], [0xA9, 0xAA],
    [0x52, 0x55], [0x52, 0x95], [0x52, 0x25], [0x52, 0xA5], [0x52, 0x49], [0x52, 0x89], [0x52, 0x29], [0x52, 0xA9],
    [0x52, 0x52], [0x52, 0x92], [0x52, 0x22], [0x52, 0xA2], [0x52, 0x4A], [0x52, 0x8A], [0x52, 0x2A], [0x52, 0xAA],
    [0x92, 0x54], [0x92, 0x94], [0x92, 0x24], [0x92, 0xA4], [0x92, 0x48], [0x92, 0x88], [0x92, 0x28], [0x92, 0xA8],
    [0x92, 0x52], [0x92, 0x92], [0x92, 0x22], [0x92, 0xA2], [0x92, 0x4A], [0x92, 0x8A], [0x92, 0x2A], [0x92, 0xAA],
    [0x22, 0x55], [0x22, 0x95], [0x22, 0x25], [0x22, 0xA5], [0x22, 0x49], [0x22, 0x89], [0x22, 0x29], [0x22, 0xA9],
    [0x22, 0x52], [0x22, 0x92], [0x22, 0x22], [0x22, 0xA2], [0x22, 0x4A], [0x22, 0x8A], [0x22, 0x2A], [0x22, 0xAA],
    [0xA2, 0x54], [0xA2, 0x94], [0xA2, 0x24], [0xA2, 0xA4], [0xA2, 0x48], [0xA2, 0x88], [0xA2, 0x28], [0xA2, 0xA8],
    [0xA2, 0x52], [0xA2, 0x92], [0xA2, 0x22], [0xA2, 0xA2], [0xA2, 0x4A], [0xA2, 0x8A], [0xA2, 0x2A], [0xA2, 0xAA],
    [0x4A, 0x55], [0x4A, 0x95], [0x4A, 0x25], [0x4A, 0xA5], [0x4A, 0x49], [0x4A, 0x89], [0x4A, 0x29], [0x4A, 0xA9],
    [0x4A, 0x52], [0x4A, 0x92], [0x4A, 0x22], [0x4A, 0xA2], [0x4A, 0x4A], [0x4A, 0x8A], [0x4A, 0x2A], [0x4A, 0xAA],
    [0x8A, 0x54], [0x8A, 0x94], [0x8A, 0x24], [0x8A, 0xA4], [0x8A, 0x48], [0x8A, 0x88], [0x8A, 0x28], [0x8A, 0xA8],
    [0x8A, 0x52], [0x8A, 0x92], [0x8A, 0x22], [0x8A, 0xA2], [0x8A, 0x4A], [0x8A, 0x8A], [0x8A, 0x2A], [0x8A, 0xAA],
    [0x2A, 0x55], [0x2A, 0x95], [0x2A, 0x25], [0x2A, 0xA5], [0x2A, 0x49], [0x2A, 0x89], [0x2A, 0x29], [0x2A, 0xA9],
    [0x2A, 0x52], [0x2A, 0x92], [0x2A, 0x22], [0x2A, 0xA2], [0x2A, 0x4A], [0x2A, 0x8A], [0x2A, 0x2A], [0x2A, 0xAA],
    [0xAA, 0x54], [0xAA, 0x94], [0xAA, 0x24], [0xAA, 0xA4], [0xAA, 0x48], [0xAA, 0x88], [0xAA, 0x28], [0xAA, 0xA8],
    [0xAA, 0x52], [0xAA, 0x92], [0xAA, 0x22], [0xAA, 0xA2], [0xAA, 0x4A], [0xAA, 0x8A], [0xAA, 0x2A], [0xAA, 0xAA],
];
