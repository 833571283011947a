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

    src/track.rs

    Assembles and disassembles whole encoded tracks from and to raw sector payloads.

*/

//! Assembles and disassembles whole encoded tracks from/to raw 256-byte sector payloads.
//!
//! A track is built sector by sector in interleave order, each sector framed by its pregap,
//! address mark, ID header (with CRC), gap1, data mark, payload (with CRC), and gap2, then
//! wrapped in a leadin/leadout. Disassembly walks the same field widths in the same order and
//! validates that the marks read back as expected.

use crate::crc::{crc16, SEED};
use crate::format::Format;
use crate::{HfeError, Result};

/// Build the two per-side encoded byte streams (side 0, side 1) for an entire disk.
///
/// `sector_image` must contain exactly `sides * tracks * fmt.sectors() * 256` bytes, laid out
/// side-major, track-ascending, physical-sector-ascending. Returns `(side_0, side_1)`; `side_1`
/// is empty when `sides == 1`.
pub fn assemble_disk(tracks: usize, sides: usize, fmt: Format, sector_image: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let mut per_side: Vec<Vec<u8>> = vec![Vec::new(), Vec::new()];
    for s in 0..sides {
        for j in 0..tracks {
            let track_id = if s == 0 { j } else { tracks - 1 - j };
            let track = assemble_track(tracks, s as u8, j, track_id, fmt, sector_image);
            per_side[s].push(track);
        }
    }
    per_side[1].reverse();
    (per_side[0].concat(), per_side[1].concat())
}

fn assemble_track(tracks: usize, side: u8, logical_track: usize, track_id: usize, fmt: Format, sector_image: &[u8]) -> Vec<u8> {
    let wtf_80t = tracks == 80;
    let mut body = Vec::with_capacity(fmt.track_len() * fmt.field_width());
    for i in 0..fmt.sectors() {
        let sector_id = fmt.interleave(side, logical_track, i, wtf_80t) as usize;
        let offset = ((side as usize * tracks + logical_track) * fmt.sectors() + sector_id) * 256;
        let sector = &sector_image[offset..offset + 256];

        let addr = [track_id as u8, side, sector_id as u8, 0x01];
        let (a_msb, a_lsb) = crc16(SEED, &[fmt.v_address_mark(), addr.to_vec()].concat());
        let (d_msb, d_lsb) = crc16(SEED, &[fmt.v_data_mark(), sector.to_vec()].concat());

        body.extend(fmt.pregap());
        body.extend(fmt.raw_address_mark());
        body.extend(fmt.encode_bytes(&[addr.as_slice(), &[a_msb, a_lsb]].concat()));
        body.extend(fmt.gap1());
        body.extend(fmt.raw_data_mark());
        body.extend(fmt.encode_bytes(&[sector, &[d_msb, d_lsb]].concat()));
        body.extend(fmt.gap2());
    }
    fmt.fix_clocks(&mut body);

    let mut track = fmt.leadin();
    track.extend(body);
    track.extend(fmt.leadout());
    track
}

/// Disassemble a single decoded (not encoded) track of exactly `fmt.track_len()` bytes into
/// its `fmt.sectors()` 256-byte sector payloads, ordered by ascending sector id.
pub fn disassemble_track(track: &[u8], fmt: Format) -> Result<Vec<u8>> {
    if track.len() != fmt.track_len() {
        return Err(HfeError::MalformedTrack(format!(
            "expected {} decoded bytes, found {}",
            fmt.track_len(),
            track.len()
        )));
    }

    let v_address_mark = fmt.v_address_mark();
    let v_data_mark = fmt.v_data_mark();

    let mut sectors: std::collections::BTreeMap<u8, Vec<u8>> = std::collections::BTreeMap::new();
    let mut cursor = fmt.lv_leadin();

    for _ in 0..fmt.sectors() {
        cursor += fmt.lv_pregap();

        let address_mark = &track[cursor..cursor + fmt.lv_address_mark()];
        if address_mark != v_address_mark.as_slice() {
            return Err(HfeError::MalformedTrack(format!(
                "address mark mismatch: expected {v_address_mark:02x?}, found {address_mark:02x?}"
            )));
        }
        cursor += fmt.lv_address_mark();

        let id_header = &track[cursor..cursor + 6];
        let sector_id = id_header[2];
        cursor += 6;

        cursor += fmt.lv_gap1();

        let data_mark = &track[cursor..cursor + fmt.lv_data_mark()];
        if data_mark != v_data_mark.as_slice() {
            return Err(HfeError::MalformedTrack(format!(
                "data mark mismatch: expected {v_data_mark:02x?}, found {data_mark:02x?}"
            )));
        }
        cursor += fmt.lv_data_mark();

        let payload = track[cursor..cursor + 256].to_vec();
        cursor += 258;

        if sectors.insert(sector_id, payload).is_some() {
            return Err(HfeError::MalformedTrack(format!("duplicate sector id {sector_id}")));
        }

        cursor += fmt.lv_gap2();
    }

    cursor += fmt.lv_leadout();
    if cursor != track.len() {
        return Err(HfeError::MalformedTrack(format!(
            "track field widths summed to {cursor}, expected {}",
            track.len()
        )));
    }

    if sectors.len() != fmt.sectors() {
        return Err(HfeError::MalformedTrack(format!(
            "expected {} sectors, found {}",
            fmt.sectors(),
            sectors.len()
        )));
    }

    Ok(sectors.into_values().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image(tracks: usize, sides: usize, fmt: Format) -> Vec<u8> {
        let total = tracks * sides * fmt.sectors() * 256;
        (0..total).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn round_trips_a_single_density_disk() {
        let tracks = 2;
        let sides = 2;
        let fmt = Format::Sd;
        let image = sample_image(tracks, sides, fmt);
        let (side0, side1) = assemble_disk(tracks, sides, fmt, &image);

        let decoded0 = fmt.decode_stream(&side0);
        let decoded1 = fmt.decode_stream(&side1);

        let mut recovered = Vec::new();
        for chunk in decoded0.chunks(fmt.track_len()) {
            recovered.push(disassemble_track(chunk, fmt).unwrap());
        }
        let mut track1s: Vec<_> = decoded1.chunks(fmt.track_len()).map(|c| disassemble_track(c, fmt).unwrap()).collect();
        track1s.reverse();
        recovered.extend(track1s);

        assert_eq!(recovered.concat(), image);
    }

    #[test]
    fn round_trips_a_double_density_disk() {
        let tracks = 2;
        let sides = 1;
        let fmt = Format::Dd;
        let image = sample_image(tracks, sides, fmt);
        let (side0, _side1) = assemble_disk(tracks, sides, fmt, &image);
        let decoded0 = fmt.decode_stream(&side0);

        let recovered: Vec<u8> = decoded0
            .chunks(fmt.track_len())
            .flat_map(|c| disassemble_track(c, fmt).unwrap())
            .collect();

        assert_eq!(recovered, image);
    }

    #[test]
    fn rejects_wrong_length_track() {
        let fmt = Format::Sd;
        let bogus = vec![0u8; fmt.track_len() - 1];
        assert!(disassemble_track(&bogus, fmt).is_err());
    }

    #[test]
    fn rejects_corrupted_address_mark() {
        let fmt = Format::Sd;
        let image = sample_image(1, 1, fmt);
        let (side0, _) = assemble_disk(1, 1, fmt, &image);
        let mut decoded = fmt.decode_stream(&side0);
        decoded[fmt.lv_leadin() + fmt.lv_pregap()] ^= 0xff;
        assert!(disassemble_track(&decoded, fmt).is_err());
    }
}
