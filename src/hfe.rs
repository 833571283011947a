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

    src/hfe.rs

    A parser and writer for the HFE disk image container format.

*/

//! Parses and emits the HFE container itself: the 512-byte header, the 512-byte track
//! look-up table, and the side-interleaved 256-byte track data chunks that follow.
//!
//! Parsing only needs the header; the look-up table is not consulted on read (ti99hfe tracks
//! are always exactly `fmt.track_len() * fmt.field_width()` encoded bytes long and are found by
//! simple chunk deinterleaving, not by following LUT offsets) but is reproduced verbatim on
//! emission.

use binrw::BinRead;

use crate::format::Format;
use crate::track::disassemble_track;
use crate::{HfeError, Result};

const SIGNATURE: &[u8; 8] = b"HXCPICFE";
const HEADER_LEN: usize = 512;
const LUT_LEN: usize = 512;
const INTERFACE_MODE: u8 = 7;
const BIT_RATE: u16 = 250;

#[derive(Debug, BinRead)]
#[br(little, magic = b"HXCPICFE")]
struct HfeHeader {
    revision: u8,
    tracks: u8,
    sides: u8,
    encoding: u8,
    bit_rate: u16,
    rpm: u16,
    interface_mode: u8,
    unused: u8,
    lut_offset: u16,
    write_protect: u8,
}

/// The handful of parameters an embedding application might want to report about an image,
/// without decoding any track data.
#[derive(Copy, Clone, Debug)]
pub struct ImageParameters {
    pub tracks: u8,
    pub sides: u8,
    pub format: Format,
    pub bit_rate: u16,
    pub write_protected: bool,
}

fn read_header(image: &[u8]) -> Result<HfeHeader> {
    if image.len() < HEADER_LEN || &image[0..8] != SIGNATURE {
        return Err(HfeError::NotAnHfeImage);
    }
    let mut cursor = std::io::Cursor::new(image);
    let header = HfeHeader::read(&mut cursor).map_err(|_| HfeError::NotAnHfeImage)?;
    if header.interface_mode != INTERFACE_MODE {
        return Err(HfeError::UnsupportedInterfaceMode(header.interface_mode));
    }
    let format = Format::from_hfe_byte(header.encoding).ok_or(HfeError::UnsupportedEncoding(header.encoding))?;
    log::trace!(
        "HFE header: tracks={} sides={} format={:?} bit_rate={}",
        header.tracks,
        header.sides,
        format,
        header.bit_rate
    );
    Ok(header)
}

/// Read the small set of parameters an embedding application might report, without decoding
/// any track content.
pub fn report_parameters(image: &[u8]) -> Result<ImageParameters> {
    let header = read_header(image)?;
    let format = Format::from_hfe_byte(header.encoding).expect("validated by read_header");
    Ok(ImageParameters {
        tracks: header.tracks,
        sides: header.sides,
        format,
        bit_rate: header.bit_rate,
        write_protected: header.write_protect == 0x00,
    })
}

/// Split the HFE track data region into per-side decoded track byte streams, already
/// deinterleaved and with side 1 restored to logical track-ascending order.
fn decoded_tracks(image: &[u8]) -> Result<(Format, u8, u8, Vec<Vec<u8>>)> {
    let header = read_header(image)?;
    let format = Format::from_hfe_byte(header.encoding).expect("validated by read_header");
    let track_data = &image[HEADER_LEN + LUT_LEN..];

    let chunk_width = 256;
    let mut side0 = Vec::new();
    let mut side1 = Vec::new();
    for (i, chunk) in track_data.chunks(chunk_width).enumerate() {
        if i % 2 == 0 {
            side0.extend_from_slice(chunk);
        } else {
            side1.extend_from_slice(chunk);
        }
    }

    let mut tracks0: Vec<Vec<u8>> = format
        .decode_stream(&side0)
        .chunks(format.track_len())
        .map(|c| c.to_vec())
        .collect();
    let mut tracks1: Vec<Vec<u8>> = if header.sides == 2 {
        format
            .decode_stream(&side1)
            .chunks(format.track_len())
            .map(|c| c.to_vec())
            .collect()
    } else {
        Vec::new()
    };
    tracks1.reverse();

    if tracks0.iter().any(|t| t.len() != format.track_len()) {
        return Err(HfeError::MalformedTrack("trailing partial track in side 0".into()));
    }

    tracks0.append(&mut tracks1);
    Ok((format, header.tracks, header.sides, tracks0))
}

/// Parse an HFE image into its decoded tracks, in (side 0 ascending, side 1 ascending) order.
pub fn parse_tracks(image: &[u8]) -> Result<Vec<Vec<u8>>> {
    let (_, tracks, sides, decoded) = decoded_tracks(image)?;
    let expected = tracks as usize * sides as usize;
    if decoded.len() != expected {
        return Err(HfeError::InvalidTrackCount {
            expected,
            actual: decoded.len(),
        });
    }
    Ok(decoded)
}

/// Parse an HFE image all the way down to sector payloads, concatenated in (side, track,
/// ascending sector id) order.
pub fn parse_sectors(image: &[u8]) -> Result<Vec<u8>> {
    let (format, tracks, sides, decoded) = decoded_tracks(image)?;
    let expected = tracks as usize * sides as usize;
    if decoded.len() != expected {
        return Err(HfeError::InvalidTrackCount {
            expected,
            actual: decoded.len(),
        });
    }
    let mut sectors = Vec::with_capacity(expected * format.sectors() * 256);
    for track in &decoded {
        sectors.extend(disassemble_track(track, format)?);
    }
    Ok(sectors)
}

/// Emit an HFE image from a raw sector image plus the small set of parameters that, in the
/// original toolchain, live in the sector image's reserved system bytes (0x10..0x14).
pub fn emit(tracks: u8, sides: u8, format: Format, write_protected: bool, sector_image: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + LUT_LEN + sector_image.len() * 4);
    out.extend(create_header(tracks, sides, format, write_protected));
    out.extend(create_lut(tracks, format));

    let (side0, side1) = crate::track::assemble_disk(tracks as usize, sides as usize, format, sector_image);
    let dummy = vec![0u8; 256];
    let chunks = side0.len() / 256;
    for i in 0..chunks {
        out.extend_from_slice(&side0[i * 256..i * 256 + 256]);
        if sides == 2 {
            out.extend_from_slice(&side1[i * 256..i * 256 + 256]);
        } else {
            out.extend_from_slice(&dummy);
        }
    }
    out
}

fn create_header(tracks: u8, sides: u8, format: Format, write_protected: bool) -> Vec<u8> {
    let mut header = Vec::with_capacity(HEADER_LEN);
    header.extend_from_slice(SIGNATURE);
    header.push(0); // revision
    header.push(tracks);
    header.push(sides);
    header.push(format.to_hfe_byte());
    header.extend_from_slice(&BIT_RATE.to_le_bytes());
    header.extend_from_slice(&0u16.to_le_bytes()); // rpm, unused
    header.push(INTERFACE_MODE);
    header.push(1);
    header.extend_from_slice(&1u16.to_le_bytes()); // LUT offset, in 512-byte blocks
    header.push(if write_protected { 0x00 } else { 0xff });
    header.resize(HEADER_LEN, 0xff);
    header
}

fn create_lut(tracks: u8, format: Format) -> Vec<u8> {
    let mut lut = Vec::with_capacity(LUT_LEN);
    for i in 0..tracks as u32 {
        let offset = 0x31 * i + 2;
        lut.extend_from_slice(&(offset as u16).to_le_bytes());
        lut.extend_from_slice(if format == Format::Dd { &[0xc0, 0x61] } else { &[0xb0, 0x61] });
    }
    lut.resize(LUT_LEN, 0xff);
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_image(tracks: usize, sides: usize, format: Format) -> Vec<u8> {
        let total = tracks * sides * format.sectors() * 256;
        (0..total).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn rejects_bad_magic() {
        let image = vec![0u8; 1024];
        assert!(matches!(report_parameters(&image), Err(HfeError::NotAnHfeImage)));
    }

    #[test]
    fn round_trips_sector_image_sd() {
        let tracks = 2u8;
        let sides = 2u8;
        let format = Format::Sd;
        let sector_image = sample_image(tracks as usize, sides as usize, format);

        let hfe = emit(tracks, sides, format, false, &sector_image);
        let params = report_parameters(&hfe).unwrap();
        assert_eq!(params.tracks, tracks);
        assert_eq!(params.sides, sides);
        assert_eq!(params.format, format);

        let recovered = parse_sectors(&hfe).unwrap();
        assert_eq!(recovered, sector_image);
    }

    #[test]
    fn round_trips_sector_image_dd_single_sided() {
        let tracks = 2u8;
        let sides = 1u8;
        let format = Format::Dd;
        let sector_image = sample_image(tracks as usize, sides as usize, format);

        let hfe = emit(tracks, sides, format, true, &sector_image);
        let params = report_parameters(&hfe).unwrap();
        assert!(params.write_protected);

        let recovered = parse_sectors(&hfe).unwrap();
        assert_eq!(recovered, sector_image);
    }

    #[test]
    fn parse_tracks_returns_one_entry_per_side_track() {
        let tracks = 2u8;
        let sides = 2u8;
        let format = Format::Sd;
        let sector_image = sample_image(tracks as usize, sides as usize, format);
        let hfe = emit(tracks, sides, format, false, &sector_image);

        let tracks_out = parse_tracks(&hfe).unwrap();
        assert_eq!(tracks_out.len(), tracks as usize * sides as usize);
        assert!(tracks_out.iter().all(|t| t.len() == format.track_len()));
    }
}
