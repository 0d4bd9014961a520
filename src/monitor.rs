//! Button hold and on-time tracking, sampled once per timer tick.

use crate::config::CandleConfig;

/// Shortest hold, in milliseconds, that counts as a click for the speed toggle.
pub const CLICK_MIN_MS: u32 = 20;

/// Signals raised by one monitor sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MonitorSignals {
    /// The hold counter just reached the long-press threshold.
    pub long_press: bool,

    /// The on-time just reached the auto-off duration.
    pub timeout: bool,

    /// A short press was released.
    pub toggled: bool,
}

/// Counts how long the button has been held and how long the candle has been on.
///
/// Runs in the timer interrupt. Long press fires once, on the tick the hold
/// counter reaches the threshold, so a button kept down does not re-fire.
#[derive(Debug, Clone)]
pub struct ButtonMonitor {
    long_press_ticks: u32,
    click_ticks: u32,
    auto_off_secs: Option<u16>,
    cycles_per_second: u16,
    mode_toggle: bool,
    hold_ticks: u32,
    cycles: u16,
    seconds: u16,
    toggle_armed: bool,
}

impl ButtonMonitor {
    /// Creates a monitor with all counters at zero.
    pub fn new(config: &CandleConfig) -> Self {
        let click_ticks = config.ticks_for_millis(CLICK_MIN_MS);
        Self {
            long_press_ticks: config.long_press_ticks(),
            click_ticks: if click_ticks == 0 { 1 } else { click_ticks },
            auto_off_secs: config.auto_off_secs(),
            cycles_per_second: config.cycles_per_second(),
            mode_toggle: config.mode_toggle(),
            hold_ticks: 0,
            cycles: 0,
            seconds: 0,
            toggle_armed: false,
        }
    }

    /// Takes one button sample.
    ///
    /// `cycle_complete` is true on the tick the PWM engine finished a cycle;
    /// seconds are counted in cycles, not ticks, because tick lengths vary.
    pub fn sample(&mut self, pressed: bool, cycle_complete: bool) -> MonitorSignals {
        let mut signals = MonitorSignals::default();

        if cycle_complete {
            self.cycles += 1;
            if self.cycles >= self.cycles_per_second {
                self.cycles = 0;
                self.seconds = self.seconds.saturating_add(1);
            }
        }

        if pressed {
            self.hold_ticks = self.hold_ticks.saturating_add(1);
        } else {
            if self.hold_ticks > 0 {
                signals.toggled = self.mode_toggle
                    && self.toggle_armed
                    && self.hold_ticks >= self.click_ticks
                    && self.hold_ticks < self.long_press_ticks;
            }
            self.hold_ticks = 0;
            // A press already under way at reset (the wake press) is not a click.
            self.toggle_armed = true;
        }

        if self.hold_ticks == self.long_press_ticks {
            self.seconds = 0;
            signals.long_press = true;
        }

        if let Some(limit) = self.auto_off_secs
            && self.seconds >= limit
        {
            self.seconds = 0;
            signals.timeout = true;
        }

        signals
    }

    /// Zeroes every counter. The press in progress, if any, will not toggle.
    pub fn reset(&mut self) {
        self.hold_ticks = 0;
        self.cycles = 0;
        self.seconds = 0;
        self.toggle_armed = false;
    }

    /// Consecutive ticks the button has read pressed.
    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    /// Whole seconds counted since power-on, wake or the last timeout.
    pub fn seconds(&self) -> u16 {
        self.seconds
    }
}
