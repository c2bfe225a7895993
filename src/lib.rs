//! # hs304
//!
//! A portable, no_std Rust codec for the HS304 2.4 GHz wireless keyboard/mouse link,
//! as spoken between cheap combo keyboards and their USB receiver dongles.
//!
//! The dongle accepts a short over-the-air frame carrying one HID state snapshot
//! (scan code, modifier byte, mouse buttons and deltas). Every payload field is
//! obfuscated through its own byte substitution table, and the frame is
//! authenticated with two cascaded, non-standard CRCs. This crate implements:
//!
//! - the CRC8/CRC16 checksum engine ([`crc`])
//! - the five per-field byte scramblers ([`scrambler`])
//! - the frame codec and radio transport envelope ([`frame`])
//! - a blind, repeated injection session ([`injection`])
//! - a cancellable sniffing loop that decodes captured frames ([`discovery`])
//!
//! The radio itself is not part of this crate. Anything that can tune a channel,
//! enter a promiscuous capture mode and move raw packets (an nRF24-style
//! transceiver, a USB research dongle, a simulator) plugs in through the
//! [`radio::Radio`] trait.
//!
//! ## Crate features
//! | Feature     | Description |
//! |-------------|-------------|
//! | `std`       | Disables `#![no_std]` support and replaces `heapless::Vec` captures with
//! `std::vec::Vec`s |
//! | `defmt-0-3` | Uses `defmt` logging |
//! | `log`       | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust
//! use hs304::frame::{FrameCodec, HidEvent, Modifiers};
//!
//! let codec = FrameCodec::new();
//! let event = HidEvent::keystroke(0x04, Modifiers::SHIFT); // 'A'
//! let frame = codec.encode(&event);
//!
//! assert_eq!(frame.as_bytes().len(), 15);
//! assert_eq!(codec.decode(frame.as_bytes()), Ok(event));
//! ```
//!
//! Injection and discovery wrap a [`radio::Radio`] implementation:
//!
//! ```rust,ignore
//! let mut session = InjectionSession::new(radio, delay);
//! session.configure()?;
//! session.keystroke(0x04, Modifiers::SHIFT)?;
//! ```
//!
//! ## Integration Notes
//!
//! - The link has no acknowledgements. Injection repeats each frame ten times, 2 ms apart.
//! - Frames that fail their checksum are routine on a shared channel; the discovery loop
//!   counts and skips them.
//! - Only one session should own a radio at a time.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

pub use critical_section;

#[cfg(not(feature = "std"))]
pub use heapless;

#[macro_use]
mod fmt;

pub mod consts;
pub mod crc;
pub mod discovery;
pub mod frame;
pub mod injection;
pub mod radio;
pub mod scrambler;
