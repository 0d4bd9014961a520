//! Binary-weighted software PWM.
//!
//! One cycle has one phase per brightness bit plus a dark wrap phase. Phase
//! `p` lights the LED when bit `p` of the brightness is set and lasts `2^p`
//! timer units, so the lit time over a cycle is the brightness itself. An
//! 8-bit level therefore costs nine interrupts per cycle instead of 256.
//!
//! ```text
//! phase:    0   1    2      3         ...   7               wrap
//! length:   1   2    4      8               128             wrap_ticks
//! ```

use crate::config::{CandleConfig, Polarity};
use crate::hal::{LedBank, TickTimer};

/// Result of one PWM tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmTick {
    /// A bit-plane phase started.
    Phase,

    /// The wrap phase started and a full cycle was completed.
    CycleComplete,
}

/// Phase scheduler of the software PWM.
///
/// Owned by the timer interrupt. The only operation is [`tick`](Self::tick).
#[derive(Debug, Clone)]
pub struct PwmEngine {
    bits: u8,
    wrap_ticks: u8,
    polarity: Polarity,
    led_mask: u8,
    phase: u8,
    cycles: u16,
}

impl PwmEngine {
    /// Creates an engine positioned at bit 0.
    pub const fn new(config: &CandleConfig) -> Self {
        Self {
            bits: config.bits(),
            wrap_ticks: config.wrap_ticks(),
            polarity: config.polarity(),
            led_mask: config.led_mask(),
            phase: 0,
            cycles: 0,
        }
    }

    /// Runs one phase: drives the LEDs for it, schedules its end and advances.
    ///
    /// `lines` selects which configured lines light while the phase bit is
    /// set; the others stay dark.
    pub fn tick<L: LedBank, T: TickTimer>(
        &mut self,
        brightness: u8,
        lines: u8,
        leds: &mut L,
        timer: &mut T,
    ) -> PwmTick {
        if self.phase >= self.bits {
            self.drive(leds, 0);
            timer.schedule(self.wrap_ticks);
            self.phase = 0;
            self.cycles = self.cycles.wrapping_add(1);
            return PwmTick::CycleComplete;
        }

        let lit = if brightness & (1 << self.phase) != 0 {
            lines & self.led_mask
        } else {
            0
        };
        self.drive(leds, lit);
        timer.schedule(1 << self.phase);
        self.phase += 1;
        PwmTick::Phase
    }

    fn drive<L: LedBank>(&self, leds: &mut L, lit: u8) {
        let dark = self.led_mask & !lit;
        match self.polarity {
            Polarity::ActiveHigh => {
                leds.set_high(lit);
                leds.set_low(dark);
            }
            Polarity::ActiveLow => {
                leds.set_low(lit);
                leds.set_high(dark);
            }
        }
    }

    /// Bit-plane the next tick will output (equals the bit depth for wrap).
    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Completed cycles, wrapping.
    pub fn cycles(&self) -> u16 {
        self.cycles
    }

    /// Timer units in one full cycle.
    pub fn cycle_length(&self) -> u32 {
        ((1u32 << self.bits) - 1) + self.wrap_ticks as u32
    }
}
