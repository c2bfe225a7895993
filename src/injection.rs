//! Keystroke and mouse injection.
//!
//! The HS304 link has no acknowledgement or retransmission at this layer, so the
//! [`InjectionSession`] makes delivery likely by brute repetition: every frame is
//! sent [`INJECT_REPEAT_COUNT`] times, [`INJECT_SPACING_MS`] milliseconds apart.
//! It is a blind broadcast; nothing reports whether the dongle heard it.
//!
//! ## Example
//!
//! ```rust
//! # use hs304::radio::{Capture, DataRate, Radio};
//! # struct NullRadio;
//! # impl Radio for NullRadio {
//! #     type Error = ();
//! #     fn set_channel(&mut self, _: u8) -> Result<(), ()> { Ok(()) }
//! #     fn enter_promiscuous_capture(&mut self, _: &[u8], _: DataRate) -> Result<(), ()> { Ok(()) }
//! #     fn transmit_raw(&mut self, _: &[u8], _: &[u8]) -> Result<(), ()> { Ok(()) }
//! #     fn receive_raw(&mut self) -> nb::Result<Capture, ()> { Err(nb::Error::WouldBlock) }
//! # }
//! use embedded_hal_mock::eh1::delay::NoopDelay;
//! use hs304::frame::Modifiers;
//! use hs304::injection::InjectionSession;
//!
//! let mut session = InjectionSession::new(NullRadio, NoopDelay::new());
//! session.configure().unwrap();
//! session.keystroke(0x04, Modifiers::SHIFT).unwrap(); // 'A'
//! session.keystroke(0x00, Modifiers::NONE).unwrap(); // release
//! assert_eq!(session.bursts_sent, 2);
//! ```

use embedded_hal::delay::DelayNs;

use crate::consts::{INJECT_REPEAT_COUNT, INJECT_SPACING_MS, LINK_ADDRESS};
use crate::frame::{FrameCodec, HidEvent, Modifiers};
use crate::radio::{Radio, configure_radio};

/// Transmits HID events to an HS304 dongle through an owned [`Radio`].
///
/// ## Type Parameters
///
/// - `R`: the radio adapter
/// - `D`: a type implementing [`embedded_hal::delay::DelayNs`], used for the pause
///   between repeated transmissions
#[derive(Debug)]
pub struct InjectionSession<R, D>
where
    R: Radio,
    D: DelayNs,
{
    /// The radio adapter
    pub radio: R,
    /// Delay provider for transmission spacing
    pub delay: D,
    codec: FrameCodec,

    /// Counter of completed injections.
    /// Incremented once all repetitions of an event have been handed to the radio.
    pub bursts_sent: u16,
}

impl<R, D> InjectionSession<R, D>
where
    R: Radio,
    D: DelayNs,
{
    /// Creates a new session. The radio is not touched until [`configure`](Self::configure)
    /// or [`inject`](Self::inject) is called.
    pub fn new(radio: R, delay: D) -> Self {
        Self {
            radio,
            delay,
            codec: FrameCodec::new(),
            bursts_sent: 0,
        }
    }

    /// Puts the radio into HS304 mode (sync word, 1 Mbps, channel 7).
    pub fn configure(&mut self) -> Result<(), R::Error> {
        configure_radio(&mut self.radio)
    }

    /// Sends `event` to the dongle.
    ///
    /// The frame is encoded once, wrapped in the transport envelope and transmitted
    /// [`INJECT_REPEAT_COUNT`] times to [`LINK_ADDRESS`], pausing
    /// [`INJECT_SPACING_MS`] after each send.
    ///
    /// # Errors
    /// The first radio error aborts the burst and is returned unmodified.
    pub fn inject(&mut self, event: &HidEvent) -> Result<(), R::Error> {
        let envelope = self.codec.encode(event).envelope();

        for _ in 0..INJECT_REPEAT_COUNT {
            self.radio.transmit_raw(&LINK_ADDRESS, &envelope)?;
            self.delay.delay_ms(INJECT_SPACING_MS);
        }

        self.bursts_sent = self.bursts_sent.wrapping_add(1);
        trace!(
            "hs304: injected scan code {:#x} modifiers {:#x}",
            event.scan_code,
            event.modifiers.bits()
        );
        Ok(())
    }

    /// Sends a key press with no mouse activity.
    ///
    /// The dongle holds the key until another event replaces it, so a typed character
    /// is normally followed by `keystroke(0x00, Modifiers::NONE)`.
    pub fn keystroke(&mut self, scan_code: u8, modifiers: Modifiers) -> Result<(), R::Error> {
        self.inject(&HidEvent::keystroke(scan_code, modifiers))
    }

    /// Ends the session and hands back the radio and delay provider.
    pub fn release(self) -> (R, D) {
        (self.radio, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ENVELOPE_LEN;
    use crate::radio::mock::{Call, MockError, MockRadio};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    /// Records every pause requested through [`DelayNs`].
    #[derive(Debug, Default)]
    struct RecordingDelay {
        pauses_ms: Vec<u32>,
        other_ns: u64,
    }

    impl DelayNs for RecordingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.other_ns += u64::from(ns);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.pauses_ms.push(ms);
        }
    }

    #[test]
    fn test_inject_sends_ten_identical_envelopes() {
        let mut session = InjectionSession::new(MockRadio::default(), NoopDelay::new());
        let event = HidEvent::keystroke(0x04, Modifiers::SHIFT);
        session.inject(&event).unwrap();

        let expected = FrameCodec::new().encode(&event).envelope();
        let sent = session.radio.transmissions();
        assert_eq!(sent.len(), 10);
        for (address, payload) in sent {
            assert_eq!(address, &[0u8; 5]);
            assert_eq!(payload.len(), ENVELOPE_LEN);
            assert_eq!(payload, &expected);
        }
        assert_eq!(session.bursts_sent, 1);
    }

    #[test]
    fn test_inject_pauses_two_ms_after_each_send() {
        let mut session = InjectionSession::new(MockRadio::default(), RecordingDelay::default());
        session.keystroke(0x05, Modifiers::NONE).unwrap();

        let (_, delay) = session.release();
        assert_eq!(delay.pauses_ms, vec![2; 10]);
        assert_eq!(delay.other_ns, 0);
    }

    #[test]
    fn test_inject_envelope_bytes() {
        let mut session = InjectionSession::new(MockRadio::default(), NoopDelay::new());
        session.keystroke(0x04, Modifiers::SHIFT).unwrap();

        let sent = session.radio.transmissions();
        assert_eq!(
            sent[0].1,
            &[
                0xF1, 0x0F, 0x55, 0x44, 0x75, 0x94, 0xE1, 0xA5, 0x31, 0x78, 0x66, 0x0D, 0xAE,
                0x88, 0x00, 0xF8, 0x08, 0xF8, 0xAF, 0xFF
            ]
        );
    }

    #[test]
    fn test_radio_error_aborts_burst() {
        let radio = MockRadio {
            fail_tx_after: Some(3),
            ..MockRadio::default()
        };
        let mut session = InjectionSession::new(radio, RecordingDelay::default());

        let result = session.keystroke(0x04, Modifiers::NONE);
        assert_eq!(result, Err(MockError::TxFailed));
        assert_eq!(session.bursts_sent, 0);

        let (radio, delay) = session.release();
        assert_eq!(radio.transmissions().len(), 3);
        assert_eq!(delay.pauses_ms.len(), 3);
    }

    #[test]
    fn test_configure_does_not_transmit() {
        let mut session = InjectionSession::new(MockRadio::default(), NoopDelay::new());
        session.configure().unwrap();
        assert!(session.radio.transmissions().is_empty());
        assert!(session.radio.calls.contains(&Call::SetChannel(7)));
    }
}
