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

    src/format.rs

    Ties a bitstream codec to its field widths and raw gap/mark bytes behind one enum.

*/

//! Ties a bitstream codec to its field widths and raw gap/mark bytes behind one small enum,
//! the way [`crate::hfe`] and [`crate::track`] need to switch between single- and
//! double-density media without duplicating the track layout logic per encoding.

use crate::{fm, mfm};

/// Disk encoding: single-density (FM) or double-density (MFM).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    Sd,
    Dd,
}

impl Format {
    /// Maps an HFE encoding byte to a [`Format`]. HFE uses 2 for SD and 0 for DD.
    pub fn from_hfe_byte(byte: u8) -> Option<Self> {
        match byte {
            2 => Some(Format::Sd),
            0 => Some(Format::Dd),
            _ => None,
        }
    }

    /// The HFE encoding byte for this format.
    pub fn to_hfe_byte(self) -> u8 {
        match self {
            Format::Sd => 2,
            Format::Dd => 0,
        }
    }

    pub fn sectors(self) -> usize {
        match self {
            Format::Sd => fm::SECTORS,
            Format::Dd => mfm::SECTORS,
        }
    }

    pub fn track_len(self) -> usize {
        match self {
            Format::Sd => fm::TRACK_LEN,
            Format::Dd => mfm::TRACK_LEN,
        }
    }

    pub fn lv_leadin(self) -> usize {
        match self {
            Format::Sd => fm::LV_LEADIN,
            Format::Dd => mfm::LV_LEADIN,
        }
    }

    pub fn lv_leadout(self) -> usize {
        match self {
            Format::Sd => fm::LV_LEADOUT,
            Format::Dd => mfm::LV_LEADOUT,
        }
    }

    pub fn lv_pregap(self) -> usize {
        match self {
            Format::Sd => fm::LV_PREGAP,
            Format::Dd => mfm::LV_PREGAP,
        }
    }

    pub fn lv_address_mark(self) -> usize {
        match self {
            Format::Sd => fm::LV_ADDRESS_MARK,
            Format::Dd => mfm::LV_ADDRESS_MARK,
        }
    }

    pub fn lv_gap1(self) -> usize {
        match self {
            Format::Sd => fm::LV_GAP1,
            Format::Dd => mfm::LV_GAP1,
        }
    }

    pub fn lv_data_mark(self) -> usize {
        match self {
            Format::Sd => fm::LV_DATA_MARK,
            Format::Dd => mfm::LV_DATA_MARK,
        }
    }

    pub fn lv_gap2(self) -> usize {
        match self {
            Format::Sd => fm::LV_GAP2,
            Format::Dd => mfm::LV_GAP2,
        }
    }

    pub fn leadin(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::leadin(),
            Format::Dd => mfm::leadin(),
        }
    }

    pub fn leadout(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::leadout(),
            Format::Dd => mfm::leadout(),
        }
    }

    pub fn raw_address_mark(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::ADDRESS_MARK.to_vec(),
            Format::Dd => mfm::ADDRESS_MARK.to_vec(),
        }
    }

    pub fn raw_data_mark(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::DATA_MARK.to_vec(),
            Format::Dd => mfm::DATA_MARK.to_vec(),
        }
    }

    pub fn pregap(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::pregap(),
            Format::Dd => mfm::pregap(),
        }
    }

    pub fn gap1(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::gap1(),
            Format::Dd => mfm::gap1(),
        }
    }

    pub fn gap2(self) -> Vec<u8> {
        match self {
            Format::Sd => fm::gap2(),
            Format::Dd => mfm::gap2(),
        }
    }

    /// Decoded value the ID address mark's mark byte must equal.
    pub fn v_address_mark(self) -> Vec<u8> {
        match self {
            Format::Sd => vec![fm::V_ADDRESS_MARK],
            Format::Dd => mfm::V_ADDRESS_MARK.to_vec(),
        }
    }

    /// Decoded value the data mark must equal.
    pub fn v_data_mark(self) -> Vec<u8> {
        match self {
            Format::Sd => vec![fm::V_DATA_MARK],
            Format::Dd => mfm::V_DATA_MARK.to_vec(),
        }
    }

    pub fn encode(self, byte: u8) -> Vec<u8> {
        match self {
            Format::Sd => fm::encode(byte).to_vec(),
            Format::Dd => mfm::encode(byte).to_vec(),
        }
    }

    pub fn encode_bytes(self, bytes: &[u8]) -> Vec<u8> {
        bytes.iter().flat_map(|&b| self.encode(b)).collect()
    }

    pub fn decode_stream(self, stream: &[u8]) -> Vec<u8> {
        match self {
            Format::Sd => fm::decode_stream(stream),
            Format::Dd => mfm::decode_stream(stream),
        }
    }

    pub fn interleave(self, side: u8, track: usize, sector: usize, wtf_80t: bool) -> u8 {
        match self {
            Format::Sd => fm::interleave(side, track, sector, wtf_80t),
            Format::Dd => mfm::interleave(side, track, sector, wtf_80t),
        }
    }

    pub fn fix_clocks(self, stream: &mut [u8]) {
        match self {
            Format::Sd => fm::fix_clocks(stream),
            Format::Dd => mfm::fix_clocks(stream),
        }
    }

    /// Encoded byte-width of a raw decoded field width, e.g. `lv_pregap() * field_width()`
    /// gives the encoded byte count of the pregap.
    pub fn field_width(self) -> usize {
        match self {
            Format::Sd => 4,
            Format::Dd => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_encoding_byte() {
        assert_eq!(Format::from_hfe_byte(2), Some(Format::Sd));
        assert_eq!(Format::from_hfe_byte(0), Some(Format::Dd));
        assert_eq!(Format::from_hfe_byte(9), None);
        assert_eq!(Format::Sd.to_hfe_byte(), 2);
        assert_eq!(Format::Dd.to_hfe_byte(), 0);
    }

    #[test]
    fn track_len_matches_field_width_sums() {
        for fmt in [Format::Sd, Format::Dd] {
            let per_sector = fmt.lv_pregap()
                + fmt.lv_address_mark()
                + 6
                + fmt.lv_gap1()
                + fmt.lv_data_mark()
                + 258
                + fmt.lv_gap2();
            let total = fmt.lv_leadin() + per_sector * fmt.sectors() + fmt.lv_leadout();
            assert_eq!(total, fmt.track_len());
        }
    }
}
