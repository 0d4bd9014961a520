//! Flame-like brightness patterns driven by the LFSR.
//!
//! Runs in the main loop. Every wait is a blocking [`DelayNs`] call. A step
//! checks for a pending sleep request after each wait and returns early when
//! one is seen, so the main loop notices a request within one wait, see
//! [`Flicker::max_step_millis`].

use embedded_hal::delay::DelayNs;

use crate::config::{CandleConfig, FlickerMode};
use crate::rng::Lfsr;
use crate::shared::CandleShared;

/// Scatter mode dwell unit, in microseconds per count of the high byte.
pub const SCATTER_DWELL_US: u32 = 100;

/// Moves the shared brightness one unit at a time from `from` to `to`.
///
/// Writes every level after `from` up to and including `to`, waiting
/// `step_ms` after each write. Does nothing when `from == to`.
pub fn ramp<D: DelayNs>(shared: &CandleShared, delay: &mut D, from: u8, to: u8, step_ms: u32) {
    let mut level = from;
    while level != to {
        level = if level < to { level + 1 } else { level - 1 };
        shared.set_brightness(level);
        delay.delay_ms(step_ms);
    }
}

/// Flicker pattern generator.
#[derive(Debug, Clone)]
pub struct Flicker {
    mode: FlickerMode,
    max_level: u8,
    led_mask: u8,
    current: u8,
}

impl Flicker {
    /// Creates a generator starting from a dark LED.
    pub fn new(config: &CandleConfig) -> Self {
        Self {
            mode: config.mode(),
            max_level: config.max_level(),
            led_mask: config.led_mask(),
            current: 0,
        }
    }

    /// Tells the generator where the brightness was left by someone else
    /// (the wake fade-in), so fade mode continues smoothly from there.
    pub fn resume_from(&mut self, level: u8) {
        self.current = level;
    }

    /// Brightness the generator last wrote.
    pub fn current(&self) -> u8 {
        self.current
    }

    /// Draws once from `rng` and plays one flicker step, blocking until done.
    ///
    /// Returns early, leaving the level where it got to, as soon as a sleep
    /// request is pending after any wait.
    pub fn step<D: DelayNs>(&mut self, rng: &mut Lfsr, shared: &CandleShared, delay: &mut D) {
        let r = rng.next();
        let alternate = shared.alternate();

        match self.mode {
            FlickerMode::Direct => {
                let level = r as u8 & self.max_level;
                let dwell = dwell_ms((r >> 24) as u8, alternate);

                shared.set_brightness(0);
                self.current = 0;
                delay.delay_ms(dwell);
                if shared.pending_sleep().is_some() {
                    return;
                }

                shared.set_brightness(level);
                self.current = level;
                delay.delay_ms(dwell);
            }
            FlickerMode::Fade { floor, max_step_ms } => {
                let mut target = r as u8 & self.max_level;
                let mut rest = false;
                if let Some(floor) = floor.map(|f| f.min(self.max_level))
                    && target <= floor
                {
                    target = floor;
                    rest = true;
                }

                let mut step_ms = 1 + ((r >> 8) as u8 % max_step_ms) as u32;
                if alternate {
                    step_ms = (step_ms / 2).max(1);
                }

                let reached = self.fade_toward(shared, delay, target, step_ms);
                if reached && rest && shared.pending_sleep().is_none() {
                    delay.delay_ms(dwell_ms((r >> 24) as u8, alternate));
                }
            }
            FlickerMode::Scatter => {
                let anchor = 0x80 >> self.led_mask.leading_zeros();
                let lines = (!(r as u8) & self.led_mask) | anchor;

                shared.set_lines(lines);
                shared.set_brightness(self.max_level);
                self.current = self.max_level;

                let mut dwell_us = ((r >> 24) as u8) as u32 * SCATTER_DWELL_US;
                if alternate {
                    dwell_us /= 2;
                }
                delay.delay_us(dwell_us);
            }
        }
    }

    /// Longest single wait inside a [`step`](Self::step), in milliseconds.
    ///
    /// A step stops after the wait during which a sleep request was raised,
    /// so this bounds how long the request waits before the main loop sees it.
    pub fn max_step_millis(&self) -> u32 {
        match self.mode {
            FlickerMode::Direct => u8::MAX as u32,
            FlickerMode::Fade { floor, max_step_ms } => {
                let rest = if floor.is_some() { u8::MAX } else { 0 };
                max_step_ms.max(rest) as u32
            }
            FlickerMode::Scatter => (u8::MAX as u32 * SCATTER_DWELL_US).div_ceil(1000),
        }
    }

    /// Moves one unit at a time toward `target`, stopping early on a pending
    /// sleep request. Returns whether `target` was reached.
    fn fade_toward<D: DelayNs>(
        &mut self,
        shared: &CandleShared,
        delay: &mut D,
        target: u8,
        step_ms: u32,
    ) -> bool {
        while self.current != target {
            self.current = if self.current < target {
                self.current + 1
            } else {
                self.current - 1
            };
            shared.set_brightness(self.current);
            delay.delay_ms(step_ms);

            if self.current != target && shared.pending_sleep().is_some() {
                return false;
            }
        }
        true
    }
}

fn dwell_ms(raw: u8, alternate: bool) -> u32 {
    if alternate { (raw >> 1) as u32 } else { raw as u32 }
}
