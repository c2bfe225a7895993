//! Frame checksums.
//!
//! HS304 frames carry two MSB-first (unreflected) CRCs with non-standard parameters:
//!
//! | CRC   | Polynomial | Init     | XorOut   |
//! |-------|------------|----------|----------|
//! | CRC8  | `0x01`     | `0x1D`   | `0x00`   |
//! | CRC16 | `0x1021`   | `0x422E` | `0x0000` |
//!
//! The CRC8 covers the sync word and payload. The CRC16 covers the sync word,
//! payload and the CRC8 byte, so the two are cascaded.

use crate::consts::{CRC8_INIT, CRC8_POLY, CRC16_INIT, CRC16_POLY};

/// Feeds one byte into a running frame CRC8.
pub const fn crc8_update(crc: u8, data: u8) -> u8 {
    let mut crc = crc ^ data;
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x80 != 0 {
            (crc << 1) ^ CRC8_POLY
        } else {
            crc << 1
        };
        bit += 1;
    }
    crc
}

/// Feeds one byte into a running frame CRC16.
pub const fn crc16_update(crc: u16, data: u8) -> u16 {
    let mut crc = crc ^ ((data as u16) << 8);
    let mut bit = 0;
    while bit < 8 {
        crc = if crc & 0x8000 != 0 {
            (crc << 1) ^ CRC16_POLY
        } else {
            crc << 1
        };
        bit += 1;
    }
    crc
}

/// Computes the frame CRC8 of `bytes`.
///
/// Returns the initial register (`0x1D`) for empty input.
pub fn crc8(bytes: &[u8]) -> u8 {
    bytes.iter().fold(CRC8_INIT, |crc, &b| crc8_update(crc, b))
}

/// Computes the frame CRC16 of `bytes`.
///
/// Returns the initial register (`0x422E`) for empty input. Frames carry the
/// result big-endian.
pub fn crc16(bytes: &[u8]) -> u16 {
    bytes.iter().fold(CRC16_INIT, |crc, &b| crc16_update(crc, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECK: &[u8] = b"123456789";

    #[test]
    fn test_crc8_check_value() {
        assert_eq!(crc8(CHECK), 0x2C);
    }

    #[test]
    fn test_crc16_check_value() {
        assert_eq!(crc16(CHECK), 0x4D04);
    }

    #[test]
    fn test_empty_input_returns_init() {
        assert_eq!(crc8(&[]), CRC8_INIT);
        assert_eq!(crc16(&[]), CRC16_INIT);
    }

    #[test]
    fn test_crcs_are_deterministic() {
        let data = [0x44, 0x75, 0x94, 0xE1, 0xA5, 0x31, 0x78, 0x66];
        assert_eq!(crc8(&data), crc8(&data));
        assert_eq!(crc16(&data), crc16(&data));
    }

    #[test]
    fn test_incremental_update_matches_slice() {
        let mut c8 = CRC8_INIT;
        let mut c16 = CRC16_INIT;
        for &b in CHECK {
            c8 = crc8_update(c8, b);
            c16 = crc16_update(c16, b);
        }
        assert_eq!(c8, crc8(CHECK));
        assert_eq!(c16, crc16(CHECK));
    }

    #[test]
    fn test_golden_frame_checksums() {
        let sync_payload = [
            0x44, 0x75, 0x94, 0xE1, 0xA5, 0x31, 0x78, 0x66, 0x0D, 0xAE, 0x88, 0x00,
        ];
        assert_eq!(crc8(&sync_payload), 0xF8);

        let mut with_crc8 = [0u8; 13];
        with_crc8[..12].copy_from_slice(&sync_payload);
        with_crc8[12] = 0xF8;
        assert_eq!(crc16(&with_crc8), 0x08F8);
    }
}
