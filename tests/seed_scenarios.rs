//! Concrete scenario tests pinning exact byte values, to catch regressions in the header,
//! LUT, CRC, and codec table constants that a purely property-based test suite might miss.

use ti99hfe::crc::crc16;
use ti99hfe::fm;
use ti99hfe::format::Format;
use ti99hfe::mfm;
use ti99hfe::router;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn s1_header_bytes_for_40_track_double_sided_dd() {
    init();
    let tracks = 40u8;
    let sides = 2u8;
    let total = tracks as usize * sides as usize * Format::Dd.sectors() * 256;
    let mut sector_image = vec![0u8; total];
    sector_image[0x10] = 0; // not write protected
    sector_image[0x11] = tracks;
    sector_image[0x12] = sides;
    sector_image[0x13] = 2; // dd

    let hfe = router::sector_image_to_hfe(&sector_image).unwrap();
    let expected: [u8; 21] = [
        0x48, 0x58, 0x43, 0x50, 0x49, 0x43, 0x46, 0x45, 0x00, 0x28, 0x02, 0x02, 0xfa, 0x00, 0x00, 0x00, 0x07, 0x01,
        0x01, 0x00, 0xff,
    ];
    assert_eq!(&hfe[0..21], &expected);
    assert!(hfe[21..512].iter().all(|&b| b == 0xff));
}

#[test]
fn s2_lut_bytes_for_2_track_dd() {
    init();
    let tracks = 2u8;
    let sides = 1u8;
    let total = tracks as usize * sides as usize * Format::Dd.sectors() * 256;
    let mut sector_image = vec![0u8; total];
    sector_image[0x11] = tracks;
    sector_image[0x12] = sides;
    sector_image[0x13] = 2;

    let hfe = router::sector_image_to_hfe(&sector_image).unwrap();
    let lut = &hfe[512..1024];
    let expected: [u8; 8] = [0x02, 0x00, 0xc0, 0x61, 0x33, 0x00, 0xc0, 0x61];
    assert_eq!(&lut[0..8], &expected);
    assert!(lut[8..].iter().all(|&b| b == 0xff));
}

#[test]
fn s3_crc16_self_check() {
    init();
    let addr = [0xa1u8, 0xa1, 0xa1, 0xfe, 0x00, 0x00, 0x00, 0x01];
    let (msb, lsb) = crc16(0xffff, &addr);
    let mut with_crc = addr.to_vec();
    with_crc.push(msb);
    with_crc.push(lsb);
    assert_eq!(crc16(0xffff, &with_crc), (0, 0));
}

#[test]
fn s4_fm_encode_decode_extremes() {
    init();
    assert_eq!(fm::encode(0x00), [0x22, 0x22, 0x22, 0x22]);
    assert_eq!(fm::encode(0xff), [0xaa, 0xaa, 0xaa, 0xaa]);
    assert_eq!(fm::decode([0x22, 0x22, 0x22, 0x22]), 0x00);
    assert_eq!(fm::decode([0xaa, 0xaa, 0xaa, 0xaa]), 0xff);
}

#[test]
fn s5_mfm_encode_decode_and_address_mark_shortcut() {
    init();
    assert_eq!(mfm::encode(0x00), [0x55, 0x55]);
    assert_eq!(mfm::encode(0xff), [0xaa, 0xaa]);
    assert_eq!(mfm::decode([0x22, 0x91]), 0xa1);
}

#[test]
fn s6_all_zero_sd_image_is_deterministic_and_correctly_sized() {
    init();
    let tracks = 40u8;
    let sides = 1u8;
    let total = tracks as usize * sides as usize * Format::Sd.sectors() * 256;
    let mut sector_image = vec![0u8; total];
    sector_image[0x11] = tracks;
    sector_image[0x12] = sides;
    sector_image[0x13] = 1;

    let hfe_a = router::sector_image_to_hfe(&sector_image).unwrap();
    let hfe_b = router::sector_image_to_hfe(&sector_image).unwrap();
    assert_eq!(hfe_a, hfe_b, "HFE emission must be deterministic");

    let encoded_track_bytes = Format::Sd.track_len() * Format::Sd.field_width();
    let chunks_per_track = encoded_track_bytes.div_ceil(256);
    let expected_len = 1024 + tracks as usize * 2 * 256 * chunks_per_track;
    assert_eq!(hfe_a.len(), expected_len);
}
