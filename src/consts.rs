//! Constants used across the HS304 protocol implementation.
//!
//! This module defines the bit-exact protocol constants of the HS304 link:
//! frame geometry, the sync word the dongle locks onto, the fixed payload
//! bytes, the radio transport envelope and the injection timing.
//!
//! ## Key Concepts
//!
//! - **Sync word**: 4-byte pattern at the start of every frame. The radio uses it to
//!   recognise candidate captures in promiscuous mode.
//! - **Payload**: 8 bytes carrying one keyboard + mouse state snapshot.
//! - **Checksums**: a CRC8 over sync and payload, then a CRC16 over everything before it.
//! - **Envelope**: fixed bytes wrapped around the frame when it is handed to the radio.
//!
//! These values must match the receiver dongle exactly; none of them are tunable.

/// The 4-byte sync word that opens every frame.
pub const SYNC_WORD: [u8; 4] = [0x44, 0x75, 0x94, 0xE1];

/// Length (in bytes) of the sync word.
pub const SYNC_LEN: usize = SYNC_WORD.len();

/// Length (in bytes) of the scrambled HID payload.
pub const PAYLOAD_LEN: usize = 8;

/// Offset of the CRC8 byte within a frame.
pub const CRC8_OFFSET: usize = SYNC_LEN + PAYLOAD_LEN;

/// Offset of the big-endian CRC16 within a frame.
///
/// The CRC16 covers every byte before this offset (sync, payload and CRC8).
pub const CRC16_OFFSET: usize = CRC8_OFFSET + 1;

/// Total length (in bytes) of an over-the-air frame.
pub const FRAME_LEN: usize = CRC16_OFFSET + 2;

/// The two fixed "magic" bytes carried unscrambled at payload offsets 1 and 2.
pub const PAYLOAD_MAGIC: [u8; 2] = [0x31, 0x78];

/// Value of the reserved last payload byte.
pub const PAYLOAD_RESERVED: u8 = 0x00;

/// First byte the radio reports when a capture slot held no data.
pub const EMPTY_CAPTURE_MARKER: u8 = 0xFF;

/// Bytes the radio transport prepends to a frame.
pub const TRANSPORT_PREAMBLE: [u8; 3] = [0xF1, 0x0F, 0x55];

/// Bytes the radio transport appends after a frame.
pub const TRANSPORT_TRAILER: [u8; 2] = [0xAF, 0xFF];

/// Total length (in bytes) of a frame wrapped in its transport envelope.
pub const ENVELOPE_LEN: usize = TRANSPORT_PREAMBLE.len() + FRAME_LEN + TRANSPORT_TRAILER.len();

/// Link-layer address every injected packet is sent to.
pub const LINK_ADDRESS: [u8; 5] = [0x00; 5];

/// RF channels used by the HS304 family. Only one: channel 7 (2407 MHz).
pub const CHANNELS: [u8; 1] = [7];

/// Largest raw capture (in bytes) the radio can hand back.
///
/// Matches the 32-byte payload limit of nRF24-class transceivers.
pub const MAX_CAPTURE_LEN: usize = 32;

/// Number of times each injected frame is transmitted.
///
/// The link has no acknowledgements, so repetition is the only reliability mechanism.
pub const INJECT_REPEAT_COUNT: u8 = 10;

/// Pause (in milliseconds) after each injected transmission.
pub const INJECT_SPACING_MS: u32 = 2;

/// Initial register of the frame CRC8.
pub const CRC8_INIT: u8 = 0x1D;

/// Generator polynomial of the frame CRC8 (x⁸ + 1, top bit implicit).
pub const CRC8_POLY: u8 = 0x01;

/// Initial register of the frame CRC16.
pub const CRC16_INIT: u16 = 0x422E;

/// Generator polynomial of the frame CRC16 (x¹⁶ + x¹² + x⁵ + 1, top bit implicit).
pub const CRC16_POLY: u16 = 0x1021;
