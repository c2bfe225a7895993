//! Passive sniffing of HS304 traffic.
//!
//! The [`DiscoveryLoop`] pulls raw captures from a [`Radio`] in promiscuous mode,
//! decodes the ones that carry a valid HS304 frame and hands the resulting
//! [`HidEvent`]s to the caller.
//!
//! On a shared channel most captures are noise: empty slots, truncated packets and
//! frames from neighbours that fail their checksum. These are counted in
//! [`DiscoveryStats`], logged at debug/trace level and skipped. They never end the
//! loop. Only a radio error does.
//!
//! ## Cancellation
//!
//! [`DiscoveryLoop::run`] has no stop condition of its own. It checks a
//! [`CancelSignal`] at the top of every iteration; a capture already in flight
//! completes (and is reported) before the cancellation is observed.
//!
//! [`CancelFlag`] can live in a `static` and be raised from an interrupt handler:
//!
//! ```rust
//! use hs304::discovery::{CancelFlag, CancelSignal};
//!
//! static STOP: CancelFlag = CancelFlag::new();
//!
//! // in the button ISR
//! STOP.cancel();
//! assert!(STOP.is_cancelled());
//! ```

use core::cell::Cell;
#[cfg(target_has_atomic = "8")]
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use crate::frame::{DecodeError, FrameCodec, HidEvent};
use crate::radio::{Radio, configure_radio};

/// A cooperative stop request, polled once per capture.
pub trait CancelSignal {
    /// Returns `true` once the loop should stop.
    fn is_cancelled(&self) -> bool;
}

impl<T: CancelSignal + ?Sized> CancelSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

impl CancelSignal for Cell<bool> {
    fn is_cancelled(&self) -> bool {
        self.get()
    }
}

#[cfg(target_has_atomic = "8")]
impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// A cancellation flag guarded by `critical_section`, usable as a `static`.
pub struct CancelFlag(Mutex<Cell<bool>>);

impl CancelFlag {
    /// Creates a flag in the "running" state.
    pub const fn new() -> Self {
        CancelFlag(Mutex::new(Cell::new(false)))
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        critical_section::with(|cs| self.0.borrow(cs).set(true));
    }

    /// Clears a previous cancellation so the flag can be reused.
    pub fn reset(&self) {
        critical_section::with(|cs| self.0.borrow(cs).set(false));
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelSignal for CancelFlag {
    fn is_cancelled(&self) -> bool {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }
}

impl core::fmt::Debug for CancelFlag {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("CancelFlag")
            .field(&self.is_cancelled())
            .finish()
    }
}

/// Counters kept by a [`DiscoveryLoop`].
#[derive(PartialEq, Eq, Clone, Copy, Default, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub struct DiscoveryStats {
    /// Captures that decoded into an event.
    pub good: u32,
    /// Captures the radio marked as empty.
    pub empty: u32,
    /// Captures too short to hold a frame.
    pub short: u32,
    /// Captures whose CRC16 did not match.
    pub bad_crc: u32,
}

/// Sniffs HS304 frames through an owned [`Radio`].
#[derive(Debug)]
pub struct DiscoveryLoop<R: Radio> {
    /// The radio adapter
    pub radio: R,
    codec: FrameCodec,
    stats: DiscoveryStats,
}

impl<R: Radio> DiscoveryLoop<R> {
    /// Creates a new loop. The radio is not touched until [`configure`](Self::configure),
    /// [`poll`](Self::poll) or [`run`](Self::run) is called.
    pub fn new(radio: R) -> Self {
        Self {
            radio,
            codec: FrameCodec::new(),
            stats: DiscoveryStats::default(),
        }
    }

    /// Puts the radio into HS304 capture mode (sync word, 1 Mbps, channel 7).
    pub fn configure(&mut self) -> Result<(), R::Error> {
        configure_radio(&mut self.radio)
    }

    /// Returns the capture counters accumulated so far.
    pub fn stats(&self) -> &DiscoveryStats {
        &self.stats
    }

    /// Waits for one capture and tries to decode it.
    ///
    /// # Returns
    /// - `Ok(Some(event))`: the capture was a valid HS304 frame
    /// - `Ok(None)`: the capture was empty, short or failed its checksum
    /// - `Err(e)`: the radio failed
    pub fn poll(&mut self) -> Result<Option<HidEvent>, R::Error> {
        let capture = nb::block!(self.radio.receive_raw())?;

        match self.codec.decode(&capture) {
            Ok(event) => {
                self.stats.good = self.stats.good.wrapping_add(1);
                info!(
                    "hs304: scan code {:#x}, modifiers {:#x}, mouse buttons {:#x}, mouse x {}, mouse y {}",
                    event.scan_code,
                    event.modifiers.bits(),
                    event.mouse_buttons,
                    event.mouse_x,
                    event.mouse_y
                );
                Ok(Some(event))
            }
            Err(DecodeError::EmptyCapture) => {
                self.stats.empty = self.stats.empty.wrapping_add(1);
                Ok(None)
            }
            Err(DecodeError::FrameTooShort { len }) => {
                self.stats.short = self.stats.short.wrapping_add(1);
                trace!("hs304: short capture ({} bytes)", len);
                Ok(None)
            }
            Err(DecodeError::ChecksumMismatch { expected, actual }) => {
                self.stats.bad_crc = self.stats.bad_crc.wrapping_add(1);
                debug!(
                    "hs304: CRC failure (computed {:#x}, received {:#x})",
                    expected, actual
                );
                Ok(None)
            }
        }
    }

    /// Sniffs until `cancel` is raised, calling `on_event` for every decoded frame.
    ///
    /// # Errors
    /// A radio error ends the loop and is returned unmodified. Decode failures never do.
    pub fn run<C, F>(&mut self, cancel: &C, mut on_event: F) -> Result<(), R::Error>
    where
        C: CancelSignal + ?Sized,
        F: FnMut(HidEvent),
    {
        while !cancel.is_cancelled() {
            if let Some(event) = self.poll()? {
                on_event(event);
            }
        }
        debug!("hs304: discovery cancelled after {} frames", self.stats.good);
        Ok(())
    }

    /// Ends the loop and hands back the radio.
    pub fn release(self) -> R {
        self.radio
    }
}
