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
*/

//! # ti99hfe
//!
//! ti99hfe is a Rust library for converting between HFE floppy images (the bitstream
//! container format used by hardware flux emulators and their software counterparts) and
//! raw sector images, for the single- and double-density floppy formats used by the TI 99
//! cross-development toolchain.
//!
//! The library works entirely on in-memory byte slices; it performs no file I/O and offers
//! no command-line front end. Callers read an image into memory and hand it to
//! [`router::hfe_to_sector_image`] or [`router::sector_image_to_hfe`].
//!
//! Internally the crate is organized bottom-up:
//! - [`crc`] implements the CRC-16 used to protect address and data records.
//! - [`fm`] and [`mfm`] implement the single- and double-density bit-level codecs.
//! - [`format`] ties a codec to its field widths and raw gap/mark bytes behind one [`format::Format`] enum.
//! - [`track`] assembles and disassembles whole tracks from/to sector payloads.
//! - [`hfe`] parses and emits the HFE container itself.
//! - [`router`] is the small façade that composes the above into whole-image operations.

pub mod crc;
pub mod fm;
pub mod format;
pub mod hfe;
pub mod mfm;
pub mod router;
pub mod track;

use thiserror::Error;

/// Errors produced while parsing, decoding, or assembling an HFE image or its sectors.
#[derive(Debug, Error)]
pub enum HfeError {
    #[error("image does not begin with the HXCPICFE signature")]
    NotAnHfeImage,
    #[error("unsupported HFE encoding byte {0:#04x}")]
    UnsupportedEncoding(u8),
    #[error("unsupported HFE interface mode {0:#04x}")]
    UnsupportedInterfaceMode(u8),
    #[error("expected {expected} tracks, found {actual}")]
    InvalidTrackCount { expected: usize, actual: usize },
    #[error("malformed track: {0}")]
    MalformedTrack(String),
    #[error("I/O error reading or writing an image")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HfeError>;
