//! HS304 frame layout and codec.
//!
//! This module turns a logical [`HidEvent`] into the 15-byte [`RawFrame`] the dongle
//! expects, and parses captured frames back into events.
//!
//! ## Frame Layout
//!
//! ```text
//! offset  0..4    sync word            44 75 94 E1
//! offset  4..12   payload (8 bytes)
//!           +0    scan code            scrambled
//!           +1    magic                31 (not scrambled)
//!           +2    magic                78 (not scrambled)
//!           +3    mouse buttons        scrambled
//!           +4    mouse X              scrambled
//!           +5    mouse Y              scrambled
//!           +6    modifiers            scrambled
//!           +7    reserved             00
//! offset 12       CRC8  over bytes 0..12
//! offset 13..15   CRC16 over bytes 0..13, big-endian
//! ```
//!
//! For transmission the frame is wrapped in a fixed transport envelope, see
//! [`RawFrame::envelope`].
//!
//! ## Validation
//!
//! [`FrameCodec::decode`] accepts a frame on the strength of its CRC16 alone. The CRC8,
//! the magic bytes and the reserved byte are not checked; this matches what the
//! dongle's own receive path accepts. [`RawFrame::verify`] performs the strict check.

use core::ops::{BitOr, BitOrAssign};

use crate::consts::{
    CRC8_OFFSET, CRC16_OFFSET, EMPTY_CAPTURE_MARKER, ENVELOPE_LEN, FRAME_LEN, PAYLOAD_LEN,
    PAYLOAD_MAGIC, PAYLOAD_RESERVED, SYNC_LEN, SYNC_WORD, TRANSPORT_PREAMBLE, TRANSPORT_TRAILER,
};
use crate::crc::{crc8, crc16};
use crate::scrambler::{ByteScrambler, Role};

/// Keyboard modifier bitmap as carried in the HS304 payload.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifier held.
    pub const NONE: Modifiers = Modifiers(0x00);
    /// Control.
    pub const CTRL: Modifiers = Modifiers(0x01);
    /// Windows / GUI key.
    pub const WIN: Modifiers = Modifiers(0x08);
    /// Shift.
    pub const SHIFT: Modifiers = Modifiers(0x20);

    /// Wraps a raw modifier byte, keeping every bit.
    pub const fn from_bits_retain(bits: u8) -> Self {
        Modifiers(bits)
    }

    /// Builds the modifier byte from individual key states.
    pub const fn from_flags(shift: bool, ctrl: bool, win: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT.0;
        }
        if ctrl {
            bits |= Self::CTRL.0;
        }
        if win {
            bits |= Self::WIN.0;
        }
        Modifiers(bits)
    }

    /// Returns the raw modifier byte.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no modifier bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.0 |= rhs.0;
    }
}

/// One keyboard + mouse state snapshot, as carried by a single frame.
///
/// Mouse deltas are raw bytes. Whether they are read as two's complement is up to the
/// HID consumer.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct HidEvent {
    /// Keyboard usage ID of the pressed key (`0x00` for none).
    pub scan_code: u8,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// Mouse button bitmap.
    pub mouse_buttons: u8,
    /// Mouse X delta.
    pub mouse_x: u8,
    /// Mouse Y delta.
    pub mouse_y: u8,
}

impl HidEvent {
    /// A key press with no mouse activity.
    pub const fn keystroke(scan_code: u8, modifiers: Modifiers) -> Self {
        Self {
            scan_code,
            modifiers,
            mouse_buttons: 0,
            mouse_x: 0,
            mouse_y: 0,
        }
    }

    /// Mouse movement and buttons with no key held.
    pub const fn mouse(buttons: u8, x: u8, y: u8) -> Self {
        Self {
            scan_code: 0,
            modifiers: Modifiers::NONE,
            mouse_buttons: buttons,
            mouse_x: x,
            mouse_y: y,
        }
    }

    /// Returns a copy of this event with `modifiers` held.
    pub const fn with_modifiers(self, modifiers: Modifiers) -> Self {
        Self { modifiers, ..self }
    }
}

/// Reasons a capture does not decode into a [`HidEvent`].
///
/// All of these are routine while sniffing a shared channel.
#[derive(PartialEq, Eq, Clone, Copy, Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DecodeError {
    /// The capture is shorter than a frame.
    #[error("capture too short: {len} bytes")]
    FrameTooShort {
        /// Length of the rejected capture.
        len: usize,
    },
    /// The radio reported an empty capture slot.
    #[error("empty capture")]
    EmptyCapture,
    /// The CRC16 carried in the frame does not match its contents.
    #[error("CRC16 mismatch: computed {expected:#06x}, frame carries {actual:#06x}")]
    ChecksumMismatch {
        /// CRC16 computed over the received bytes.
        expected: u16,
        /// CRC16 carried by the frame.
        actual: u16,
    },
}

/// A complete over-the-air frame.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    /// Returns the frame bytes.
    pub const fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Returns the sync word.
    pub fn sync(&self) -> &[u8] {
        &self.0[..SYNC_LEN]
    }

    /// Returns the 8 scrambled payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.0[SYNC_LEN..CRC8_OFFSET]
    }

    /// Returns the CRC8 byte.
    pub const fn crc8(&self) -> u8 {
        self.0[CRC8_OFFSET]
    }

    /// Returns the CRC16 field.
    pub const fn crc16(&self) -> u16 {
        u16::from_be_bytes([self.0[CRC16_OFFSET], self.0[CRC16_OFFSET + 1]])
    }

    /// Returns `true` if both checksums match the frame contents.
    pub fn verify(&self) -> bool {
        crc8(&self.0[..CRC8_OFFSET]) == self.crc8()
            && crc16(&self.0[..CRC16_OFFSET]) == self.crc16()
    }

    /// Returns `true` if the unscrambled magic and reserved payload bytes hold their fixed values.
    pub fn has_expected_magic(&self) -> bool {
        payload_magic_ok(self.payload())
    }

    /// Wraps the frame in the radio transport envelope: preamble, frame, trailer.
    pub fn envelope(&self) -> [u8; ENVELOPE_LEN] {
        let mut out = [0u8; ENVELOPE_LEN];
        let (preamble, rest) = out.split_at_mut(TRANSPORT_PREAMBLE.len());
        let (frame, trailer) = rest.split_at_mut(FRAME_LEN);
        preamble.copy_from_slice(&TRANSPORT_PREAMBLE);
        frame.copy_from_slice(&self.0);
        trailer.copy_from_slice(&TRANSPORT_TRAILER);
        out
    }
}

impl AsRef<[u8]> for RawFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for RawFrame {
    type Error = DecodeError;

    /// Copies the first [`FRAME_LEN`] bytes of a capture. No checksum is checked.
    fn try_from(raw: &[u8]) -> Result<Self, Self::Error> {
        let bytes = raw
            .get(..FRAME_LEN)
            .ok_or(DecodeError::FrameTooShort { len: raw.len() })?;
        let mut frame = [0u8; FRAME_LEN];
        frame.copy_from_slice(bytes);
        Ok(RawFrame(frame))
    }
}

fn payload_magic_ok(payload: &[u8]) -> bool {
    payload[1..3] == PAYLOAD_MAGIC && payload[7] == PAYLOAD_RESERVED
}

/// Encodes [`HidEvent`]s into [`RawFrame`]s and decodes captures back.
///
/// The codec only holds references to the static scramblers, so it is `Copy` and can
/// be shared freely between threads.
#[derive(Clone, Copy, Debug)]
pub struct FrameCodec {
    scan_code: &'static ByteScrambler,
    mouse_buttons: &'static ByteScrambler,
    mouse_x: &'static ByteScrambler,
    mouse_y: &'static ByteScrambler,
    modifiers: &'static ByteScrambler,
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameCodec {
    /// Creates a codec using the HS304 scrambler tables.
    pub fn new() -> Self {
        Self {
            scan_code: Role::ScanCode.scrambler(),
            mouse_buttons: Role::MouseButtons.scrambler(),
            mouse_x: Role::MouseX.scrambler(),
            mouse_y: Role::MouseY.scrambler(),
            modifiers: Role::Modifiers.scrambler(),
        }
    }

    /// Builds the over-the-air frame for `event`.
    pub fn encode(&self, event: &HidEvent) -> RawFrame {
        let payload: [u8; PAYLOAD_LEN] = [
            self.scan_code.encode(event.scan_code),
            PAYLOAD_MAGIC[0],
            PAYLOAD_MAGIC[1],
            self.mouse_buttons.encode(event.mouse_buttons),
            self.mouse_x.encode(event.mouse_x),
            self.mouse_y.encode(event.mouse_y),
            self.modifiers.encode(event.modifiers.bits()),
            PAYLOAD_RESERVED,
        ];

        let mut frame = [0u8; FRAME_LEN];
        frame[..SYNC_LEN].copy_from_slice(&SYNC_WORD);
        frame[SYNC_LEN..CRC8_OFFSET].copy_from_slice(&payload);
        frame[CRC8_OFFSET] = crc8(&frame[..CRC8_OFFSET]);
        let crc = crc16(&frame[..CRC16_OFFSET]);
        frame[CRC16_OFFSET..].copy_from_slice(&crc.to_be_bytes());
        RawFrame(frame)
    }

    /// Parses a raw capture into a [`HidEvent`].
    ///
    /// Bytes past the end of the frame are ignored.
    ///
    /// # Errors
    /// - [`DecodeError::FrameTooShort`] if `raw` holds fewer than [`FRAME_LEN`] bytes
    /// - [`DecodeError::EmptyCapture`] if the radio marked the slot as empty (`0xFF`)
    /// - [`DecodeError::ChecksumMismatch`] if the CRC16 does not match
    pub fn decode(&self, raw: &[u8]) -> Result<HidEvent, DecodeError> {
        if raw.len() < FRAME_LEN {
            return Err(DecodeError::FrameTooShort { len: raw.len() });
        }
        if raw[0] == EMPTY_CAPTURE_MARKER {
            return Err(DecodeError::EmptyCapture);
        }

        let expected = crc16(&raw[..CRC16_OFFSET]);
        let actual = u16::from_be_bytes([raw[CRC16_OFFSET], raw[CRC16_OFFSET + 1]]);
        if expected != actual {
            return Err(DecodeError::ChecksumMismatch { expected, actual });
        }

        let payload = &raw[SYNC_LEN..CRC8_OFFSET];
        if !payload_magic_ok(payload) {
            debug!(
                "hs304: unexpected magic {:#x} {:#x} / reserved {:#x}",
                payload[1], payload[2], payload[7]
            );
        }

        Ok(HidEvent {
            scan_code: self.scan_code.decode(payload[Role::ScanCode.payload_offset()]),
            modifiers: Modifiers::from_bits_retain(
                self.modifiers.decode(payload[Role::Modifiers.payload_offset()]),
            ),
            mouse_buttons: self
                .mouse_buttons
                .decode(payload[Role::MouseButtons.payload_offset()]),
            mouse_x: self.mouse_x.decode(payload[Role::MouseX.payload_offset()]),
            mouse_y: self.mouse_y.decode(payload[Role::MouseY.payload_offset()]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `{scan_code: 0x04, modifiers: SHIFT}` as it goes on air.
    const GOLDEN: [u8; FRAME_LEN] = [
        0x44, 0x75, 0x94, 0xE1, 0xA5, 0x31, 0x78, 0x66, 0x0D, 0xAE, 0x88, 0x00, 0xF8, 0x08, 0xF8,
    ];

    #[test]
    fn test_encode_keystroke_matches_golden_frame() {
        let codec = FrameCodec::new();
        let event = HidEvent::keystroke(0x04, Modifiers::SHIFT);
        let frame = codec.encode(&event);

        assert_eq!(frame.as_bytes().len(), 15);
        assert_eq!(frame.sync(), &SYNC_WORD);
        assert_eq!(frame.as_bytes(), &GOLDEN);
        assert_eq!(codec.decode(frame.as_bytes()), Ok(event));
    }

    #[test]
    fn test_encode_idle_and_mixed_events() {
        let codec = FrameCodec::new();
        assert_eq!(
            codec.encode(&HidEvent::default()).as_bytes(),
            &[0x44, 0x75, 0x94, 0xE1, 0x85, 0x31, 0x78, 0x66, 0x0D, 0xAE, 0x8C, 0x00, 0xDC, 0x17, 0x22]
        );
        let event = HidEvent {
            scan_code: 0x1E,
            modifiers: Modifiers::CTRL | Modifiers::WIN,
            mouse_buttons: 0x01,
            mouse_x: 0x05,
            mouse_y: 0xFB,
        };
        assert_eq!(
            codec.encode(&event).as_bytes(),
            &[0x44, 0x75, 0x94, 0xE1, 0xFD, 0x31, 0x78, 0xE6, 0x2D, 0x71, 0x1C, 0x00, 0x4B, 0xBE, 0x18]
        );
    }

    #[test]
    fn test_frame_layout() {
        let frame = FrameCodec::new().encode(&HidEvent::mouse(0x02, 0x10, 0xF0));
        let payload = frame.payload();
        assert_eq!(payload.len(), PAYLOAD_LEN);
        assert_eq!(&payload[1..3], &PAYLOAD_MAGIC);
        assert_eq!(payload[7], PAYLOAD_RESERVED);
        assert_eq!(frame.crc8(), crc8(&frame.as_bytes()[..12]));
        assert_eq!(frame.crc16(), crc16(&frame.as_bytes()[..13]));
        assert!(frame.verify());
        assert!(frame.has_expected_magic());
    }

    #[test]
    fn test_round_trip_keys_and_modifiers() {
        let codec = FrameCodec::new();
        for scan_code in 0..=255u8 {
            for bits in 0..8u8 {
                let modifiers =
                    Modifiers::from_flags(bits & 0b001 != 0, bits & 0b010 != 0, bits & 0b100 != 0);
                let event = HidEvent::keystroke(scan_code, modifiers);
                assert_eq!(codec.decode(codec.encode(&event).as_bytes()), Ok(event));
            }
        }
    }

    #[test]
    fn test_round_trip_mouse_fields() {
        let codec = FrameCodec::new();
        for v in 0..=255u8 {
            let event = HidEvent::mouse(v, v.wrapping_add(1), v.wrapping_mul(3))
                .with_modifiers(Modifiers::SHIFT);
            assert_eq!(codec.decode(codec.encode(&event).as_bytes()), Ok(event));
        }
    }

    #[test]
    fn test_decode_short_capture() {
        let codec = FrameCodec::new();
        assert_eq!(codec.decode(&[]), Err(DecodeError::FrameTooShort { len: 0 }));
        assert_eq!(
            codec.decode(&GOLDEN[..14]),
            Err(DecodeError::FrameTooShort { len: 14 })
        );
        // Length is checked before the empty-slot marker.
        assert_eq!(
            codec.decode(&[0xFF; 3]),
            Err(DecodeError::FrameTooShort { len: 3 })
        );
    }

    #[test]
    fn test_decode_empty_capture_marker() {
        let codec = FrameCodec::new();
        assert_eq!(codec.decode(&[0xFF; 15]), Err(DecodeError::EmptyCapture));

        let mut marked = GOLDEN;
        marked[0] = 0xFF;
        assert_eq!(codec.decode(&marked), Err(DecodeError::EmptyCapture));
    }

    #[test]
    fn test_decode_corrupted_fixture() {
        let mut corrupted = GOLDEN;
        corrupted[4] ^= 0x01;
        assert_eq!(
            FrameCodec::new().decode(&corrupted),
            Err(DecodeError::ChecksumMismatch {
                expected: 0xE3DB,
                actual: 0x08F8,
            })
        );
    }

    #[test]
    fn test_every_single_bit_flip_is_rejected() {
        let codec = FrameCodec::new();
        for byte in 0..FRAME_LEN {
            for bit in 0..8 {
                let mut corrupted = GOLDEN;
                corrupted[byte] ^= 1 << bit;
                assert!(
                    matches!(
                        codec.decode(&corrupted),
                        Err(DecodeError::ChecksumMismatch { .. })
                    ),
                    "flip of byte {} bit {} was accepted",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_decode_ignores_crc8() {
        let mut frame = GOLDEN;
        frame[CRC8_OFFSET] = 0x00;
        frame[CRC16_OFFSET..].copy_from_slice(&0x66EFu16.to_be_bytes());

        let codec = FrameCodec::new();
        assert_eq!(
            codec.decode(&frame),
            Ok(HidEvent::keystroke(0x04, Modifiers::SHIFT))
        );
        let raw = RawFrame::try_from(&frame[..]).unwrap();
        assert!(!raw.verify());
    }

    #[test]
    fn test_decode_tolerates_bad_magic() {
        let mut frame = GOLDEN;
        frame[SYNC_LEN + 1] = 0x00;
        let crc = crc16(&frame[..CRC16_OFFSET]);
        frame[CRC16_OFFSET..].copy_from_slice(&crc.to_be_bytes());

        assert!(FrameCodec::new().decode(&frame).is_ok());
        assert!(!RawFrame::try_from(&frame[..]).unwrap().has_expected_magic());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut capture = [0u8; 32];
        capture[..FRAME_LEN].copy_from_slice(&GOLDEN);
        capture[FRAME_LEN..FRAME_LEN + 2].copy_from_slice(&TRANSPORT_TRAILER);
        assert_eq!(
            FrameCodec::new().decode(&capture),
            Ok(HidEvent::keystroke(0x04, Modifiers::SHIFT))
        );
    }

    #[test]
    fn test_envelope_wraps_frame() {
        let frame = RawFrame::try_from(&GOLDEN[..]).unwrap();
        let env = frame.envelope();
        assert_eq!(env.len(), 20);
        assert_eq!(&env[..3], &[0xF1, 0x0F, 0x55]);
        assert_eq!(&env[3..18], &GOLDEN);
        assert_eq!(&env[18..], &[0xAF, 0xFF]);
    }

    #[test]
    fn test_try_from_short_slice() {
        assert_eq!(
            RawFrame::try_from(&GOLDEN[..10]),
            Err(DecodeError::FrameTooShort { len: 10 })
        );
    }

    #[test]
    fn test_role_offsets_match_layout() {
        let event = HidEvent {
            scan_code: 0x11,
            modifiers: Modifiers::from_bits_retain(0x22),
            mouse_buttons: 0x33,
            mouse_x: 0x44,
            mouse_y: 0x55,
        };
        let frame = FrameCodec::new().encode(&event);
        let payload = frame.payload();
        let logical = [0x11, 0x33, 0x44, 0x55, 0x22];
        for (role, value) in Role::ALL.iter().zip(logical) {
            assert_eq!(role.scrambler().decode(payload[role.payload_offset()]), value);
        }
    }

    #[test]
    fn test_modifier_flags() {
        assert_eq!(Modifiers::from_flags(true, false, false), Modifiers::SHIFT);
        assert_eq!(Modifiers::from_flags(true, true, true).bits(), 0x29);
        let mut m = Modifiers::NONE;
        assert!(m.is_empty());
        m |= Modifiers::CTRL;
        assert!(m.contains(Modifiers::CTRL));
        assert!(!m.contains(Modifiers::WIN));
    }
}
