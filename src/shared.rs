//! State shared between the timer interrupt and the main loop.
//!
//! Every field is a single byte accessed with plain atomic loads and stores,
//! which `portable-atomic` provides on all targets, including cores without
//! compare-and-swap. Each field has exactly one writer per direction, so no
//! read-modify-write is ever needed.

use portable_atomic::{AtomicBool, AtomicU8, Ordering};

/// Why the candle wants to go to sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepReason {
    /// The configured on-time elapsed.
    Timeout,

    /// The button was held for the long-press threshold.
    LongPress,
}

const NO_REQUEST: u8 = 0;
const TIMEOUT: u8 = 1;
const LONG_PRESS: u8 = 2;

impl SleepReason {
    const fn encode(self) -> u8 {
        match self {
            SleepReason::Timeout => TIMEOUT,
            SleepReason::LongPress => LONG_PRESS,
        }
    }

    const fn decode(raw: u8) -> Option<Self> {
        match raw {
            TIMEOUT => Some(SleepReason::Timeout),
            LONG_PRESS => Some(SleepReason::LongPress),
            _ => None,
        }
    }
}

/// Cells linking the interrupt context with the main loop.
///
/// Intended to live in a `static`:
///
/// ```
/// use led_candle::CandleShared;
///
/// static SHARED: CandleShared = CandleShared::new();
/// SHARED.set_brightness(128);
/// assert_eq!(SHARED.brightness(), 128);
/// ```
#[derive(Debug)]
pub struct CandleShared {
    /// Main loop -> tick: current intensity.
    brightness: AtomicU8,
    /// Main loop -> tick: which LED lines light during ON phases.
    lines: AtomicU8,
    /// Tick -> main loop: pending [`SleepReason`].
    sleep_request: AtomicU8,
    /// Main loop -> tick: clear the monitor counters on the next tick.
    monitor_reset: AtomicBool,
    /// Tick -> main loop: alternate flicker speed.
    alternate: AtomicBool,
}

impl CandleShared {
    /// Creates the cells with the LED dark and every line enabled.
    pub const fn new() -> Self {
        Self {
            brightness: AtomicU8::new(0),
            lines: AtomicU8::new(u8::MAX),
            sleep_request: AtomicU8::new(NO_REQUEST),
            monitor_reset: AtomicBool::new(false),
            alternate: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn brightness(&self) -> u8 {
        self.brightness.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_brightness(&self, level: u8) {
        self.brightness.store(level, Ordering::Relaxed);
    }

    /// Lines lit during ON phases, before masking with the configured lines.
    #[inline]
    pub fn lines(&self) -> u8 {
        self.lines.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_lines(&self, lines: u8) {
        self.lines.store(lines, Ordering::Relaxed);
    }

    /// Raises a sleep request. Called from the tick interrupt.
    #[inline]
    pub fn request_sleep(&self, reason: SleepReason) {
        self.sleep_request.store(reason.encode(), Ordering::Release);
    }

    /// Returns the pending request without consuming it.
    #[inline]
    pub fn pending_sleep(&self) -> Option<SleepReason> {
        SleepReason::decode(self.sleep_request.load(Ordering::Acquire))
    }

    /// Consumes the pending request. Called from the main loop.
    ///
    /// A request raised between the load and the clear is the same request
    /// seen twice, so losing it is harmless.
    #[inline]
    pub fn take_sleep_request(&self) -> Option<SleepReason> {
        let reason = self.pending_sleep();
        if reason.is_some() {
            self.sleep_request.store(NO_REQUEST, Ordering::Release);
        }
        reason
    }

    /// Asks the monitor to zero its counters on its next tick.
    #[inline]
    pub fn request_monitor_reset(&self) {
        self.monitor_reset.store(true, Ordering::Release);
    }

    /// Consumes a pending counter reset. Called from the tick interrupt.
    #[inline]
    pub fn take_monitor_reset(&self) -> bool {
        let pending = self.monitor_reset.load(Ordering::Acquire);
        if pending {
            self.monitor_reset.store(false, Ordering::Release);
        }
        pending
    }

    #[inline]
    pub fn alternate(&self) -> bool {
        self.alternate.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set_alternate(&self, on: bool) {
        self.alternate.store(on, Ordering::Relaxed);
    }
}

impl Default for CandleShared {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_dark_with_all_lines() {
        let shared = CandleShared::new();
        assert_eq!(shared.brightness(), 0);
        assert_eq!(shared.lines(), 0xFF);
        assert_eq!(shared.pending_sleep(), None);
        assert!(!shared.alternate());
    }

    #[test]
    fn sleep_request_is_consumed_once() {
        let shared = CandleShared::new();
        shared.request_sleep(SleepReason::LongPress);

        assert_eq!(shared.pending_sleep(), Some(SleepReason::LongPress));
        assert_eq!(shared.take_sleep_request(), Some(SleepReason::LongPress));
        assert_eq!(shared.take_sleep_request(), None);
    }

    #[test]
    fn monitor_reset_is_consumed_once() {
        let shared = CandleShared::new();
        assert!(!shared.take_monitor_reset());

        shared.request_monitor_reset();
        assert!(shared.take_monitor_reset());
        assert!(!shared.take_monitor_reset());
    }
}
