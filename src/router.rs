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

    src/router.rs

    A façade composing the codec, track, and container modules into whole-image operations.

*/

//! Thin façade composing [`crate::hfe`], [`crate::track`], [`crate::fm`], and [`crate::mfm`]
//! into whole-image operations. Works purely on in-memory byte slices: no file I/O, no
//! argument parsing, no terminal output. An embedding application supplies the bytes and
//! consumes the bytes back.

use crate::hfe;
use crate::hfe::ImageParameters;
use crate::Result;

/// Extract a raw sector image from an HFE image.
pub fn hfe_to_sector_image(hfe_bytes: &[u8]) -> Result<Vec<u8>> {
    hfe::parse_sectors(hfe_bytes)
}

/// Synthesize an HFE image from a raw sector image.
///
/// The track/side count, encoding, and write-protect flag are read from the sector image's
/// reserved system bytes at 0x11 (tracks), 0x12 (sides), 0x13 (2 for DD, else SD), and 0x10
/// ('P' for write-protected), matching where the original toolchain stores them.
pub fn sector_image_to_hfe(sector_bytes: &[u8]) -> Result<Vec<u8>> {
    let tracks = sector_bytes[0x11];
    let sides = sector_bytes[0x12];
    let format = if sector_bytes[0x13] == 2 {
        crate::format::Format::Dd
    } else {
        crate::format::Format::Sd
    };
    let write_protected = sector_bytes.get(0x10) == Some(&b'P');
    Ok(hfe::emit(tracks, sides, format, write_protected, sector_bytes))
}

/// Return every decoded track of an HFE image, flattened with no separators, in
/// (side 0 ascending, side 1 ascending) order. Callers must know `tracks`/`sides`/`format`
/// (via [`report_parameters`]) to split this back into individual tracks.
pub fn dump_tracks(hfe_bytes: &[u8]) -> Result<Vec<Vec<u8>>> {
    hfe::parse_tracks(hfe_bytes)
}

/// Report the small set of parameters (tracks, sides, encoding, bit rate, write-protect)
/// carried in an HFE header, without decoding any track content.
pub fn report_parameters(hfe_bytes: &[u8]) -> Result<ImageParameters> {
    hfe::report_parameters(hfe_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Format;

    fn sample_sector_image(tracks: u8, sides: u8, format: Format, protected: bool) -> Vec<u8> {
        let total = tracks as usize * sides as usize * format.sectors() * 256;
        let mut image: Vec<u8> = (0..total).map(|i| (i % 251) as u8).collect();
        image[0x10] = if protected { b'P' } else { 0 };
        image[0x11] = tracks;
        image[0x12] = sides;
        image[0x13] = if format == Format::Dd { 2 } else { 1 };
        image
    }

    #[test]
    fn sector_to_hfe_to_sector_round_trips() {
        let image = sample_sector_image(2, 2, Format::Sd, false);
        let hfe = sector_image_to_hfe(&image).unwrap();
        let recovered = hfe_to_sector_image(&hfe).unwrap();
        assert_eq!(recovered, image);
    }

    #[test]
    fn write_protect_flag_is_carried_through() {
        let image = sample_sector_image(1, 1, Format::Dd, true);
        let hfe = sector_image_to_hfe(&image).unwrap();
        let params = report_parameters(&hfe).unwrap();
        assert!(params.write_protected);
    }

    #[test]
    fn dump_tracks_returns_one_entry_per_side_track() {
        let image = sample_sector_image(2, 1, Format::Sd, false);
        let hfe = sector_image_to_hfe(&image).unwrap();
        let tracks = dump_tracks(&hfe).unwrap();
        assert_eq!(tracks.len(), 2);
    }
}
