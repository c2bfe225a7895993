//! The radio seam.
//!
//! This crate does not drive RF hardware. The transceiver (an nRF24-class radio, a
//! USB research dongle, a simulator) is supplied by the caller through the [`Radio`]
//! trait, and the sessions in [`crate::injection`] and [`crate::discovery`] own it
//! explicitly for as long as they run.
//!
//! ## Empty captures
//!
//! Radios that poll a capture FIFO report "nothing this slot" with a capture whose
//! first byte is `0xFF` (see [`EMPTY_CAPTURE_MARKER`](crate::consts::EMPTY_CAPTURE_MARKER)).
//! Such captures are skipped by the discovery loop, not treated as errors.

#[cfg(not(feature = "std"))]
use crate::consts::MAX_CAPTURE_LEN;
use crate::consts::{CHANNELS, SYNC_WORD};

#[cfg(not(feature = "std"))]
use heapless::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

/// One raw packet captured by the radio.
#[cfg(not(feature = "std"))]
pub type Capture = Vec<u8, MAX_CAPTURE_LEN>;

/// One raw packet captured by the radio.
#[cfg(feature = "std")]
pub type Capture = Vec<u8>;

/// Over-the-air bit rate.
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum DataRate {
    /// 250 kbps.
    Rate250K,
    /// 1 Mbps. The HS304 link runs at this rate.
    #[default]
    Rate1M,
    /// 2 Mbps.
    Rate2M,
}

/// Capabilities the HS304 codec needs from a 2.4 GHz transceiver.
///
/// Errors are the adapter's own; the sessions in this crate pass them through
/// unmodified and never retry.
pub trait Radio {
    /// Adapter-level failure (I/O error, unsupported configuration, ...).
    type Error;

    /// Tunes the radio to `channel`.
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::Error>;

    /// Captures every packet that starts with `sync`, regardless of address.
    fn enter_promiscuous_capture(
        &mut self,
        sync: &[u8],
        rate: DataRate,
    ) -> Result<(), Self::Error>;

    /// Sends one raw link-layer packet to `address`.
    fn transmit_raw(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error>;

    /// Returns the next captured packet.
    ///
    /// Returns [`nb::Error::WouldBlock`] while nothing has been captured yet. A capture
    /// starting with `0xFF` means the slot was empty.
    fn receive_raw(&mut self) -> nb::Result<Capture, Self::Error>;
}

impl<R: Radio + ?Sized> Radio for &mut R {
    type Error = R::Error;

    fn set_channel(&mut self, channel: u8) -> Result<(), Self::Error> {
        (**self).set_channel(channel)
    }

    fn enter_promiscuous_capture(
        &mut self,
        sync: &[u8],
        rate: DataRate,
    ) -> Result<(), Self::Error> {
        (**self).enter_promiscuous_capture(sync, rate)
    }

    fn transmit_raw(&mut self, address: &[u8], payload: &[u8]) -> Result<(), Self::Error> {
        (**self).transmit_raw(address, payload)
    }

    fn receive_raw(&mut self) -> nb::Result<Capture, Self::Error> {
        (**self).receive_raw()
    }
}

/// Puts `radio` into HS304 mode.
///
/// Enters promiscuous capture on the HS304 sync word at 1 Mbps, then tunes to the
/// first (and only) HS304 channel.
pub fn configure_radio<R: Radio + ?Sized>(radio: &mut R) -> Result<(), R::Error> {
    radio.enter_promiscuous_capture(&SYNC_WORD, DataRate::Rate1M)?;
    radio.set_channel(CHANNELS[0])?;
    debug!("hs304: radio configured on channel {}", CHANNELS[0]);
    Ok(())
}

#[cfg(test)]
pub(crate) mod mock {
    //! In-memory radio for tests.
    #![allow(dead_code)]

    use super::{Capture, DataRate, Radio};
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Error returned by [`MockRadio`].
    #[derive(PartialEq, Eq, Clone, Copy, Debug)]
    pub enum MockError {
        /// The scripted capture queue ran dry.
        Exhausted,
        /// Transmission failed on purpose.
        TxFailed,
    }

    /// A call recorded by [`MockRadio`].
    #[derive(PartialEq, Eq, Clone, Debug)]
    pub enum Call {
        SetChannel(u8),
        Promiscuous(Vec<u8>, DataRate),
        Transmit(Vec<u8>, Vec<u8>),
    }

    /// Records configuration and transmissions, replays scripted captures.
    #[derive(Debug, Default)]
    pub struct MockRadio {
        pub calls: Vec<Call>,
        pub captures: VecDeque<nb::Result<Capture, MockError>>,
        pub receive_calls: usize,
        pub fail_tx_after: Option<usize>,
    }

    impl MockRadio {
        pub fn with_captures<I>(captures: I) -> Self
        where
            I: IntoIterator<Item = Vec<u8>>,
        {
            Self {
                captures: captures.into_iter().map(Ok).collect(),
                ..Self::default()
            }
        }

        pub fn transmissions(&self) -> Vec<(&[u8], &[u8])> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Transmit(addr, payload) => Some((addr.as_slice(), payload.as_slice())),
                    _ => None,
                })
                .collect()
        }
    }

    impl Radio for MockRadio {
        type Error = MockError;

        fn set_channel(&mut self, channel: u8) -> Result<(), MockError> {
            self.calls.push(Call::SetChannel(channel));
            Ok(())
        }

        fn enter_promiscuous_capture(
            &mut self,
            sync: &[u8],
            rate: DataRate,
        ) -> Result<(), MockError> {
            self.calls.push(Call::Promiscuous(sync.to_vec(), rate));
            Ok(())
        }

        fn transmit_raw(&mut self, address: &[u8], payload: &[u8]) -> Result<(), MockError> {
            if let Some(limit) = self.fail_tx_after {
                if self.transmissions().len() >= limit {
                    return Err(MockError::TxFailed);
                }
            }
            self.calls.push(Call::Transmit(address.to_vec(), payload.to_vec()));
            Ok(())
        }

        fn receive_raw(&mut self) -> nb::Result<Capture, MockError> {
            self.receive_calls += 1;
            self.captures
                .pop_front()
                .unwrap_or(Err(nb::Error::Other(MockError::Exhausted)))
        }
    }
}
