//! Power state machine and the main-loop driver.
//!
//! ```text
//!            long press / timeout
//!   Active ──────────────────────▶ SleepRequested
//!     ▲                                  │ fade out, debounce,
//!     │ fade in, reset counters          │ arm wake, halt
//!     └──────────── Sleeping ◀───────────┘
//!               (wake interrupt)
//! ```

use embedded_hal::delay::DelayNs;

use crate::config::CandleConfig;
use crate::flicker::{Flicker, ramp};
use crate::hal::{Button, PowerControl};
use crate::rng::Lfsr;
use crate::shared::{CandleShared, SleepReason};

/// Power state of the candle. Owned by the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Flickering normally.
    Active,

    /// A long press or timeout was seen; the sleep transition is next.
    SleepRequested,

    /// Halted waiting for the wake interrupt.
    Sleeping,
}

/// Main-loop half of the candle: flicker generator plus power state machine.
///
/// The timer interrupt half is [`TickHandler`](crate::TickHandler); both meet
/// in the [`CandleShared`] cells.
///
/// # Type Parameters
/// * `'s` - Lifetime of the shared cells (usually `'static`)
/// * `D` - Busy-wait delay
/// * `B` - Button reader used by the sleep debounce
/// * `P` - Interrupt masking and halt control
pub struct Candle<'s, D: DelayNs, B: Button, P: PowerControl> {
    config: CandleConfig,
    rng: Lfsr,
    flicker: Flicker,
    state: PowerState,
    delay: D,
    button: B,
    power: P,
    shared: &'s CandleShared,
}

impl<'s, D: DelayNs, B: Button, P: PowerControl> Candle<'s, D, B, P> {
    /// Creates the driver in `Active` state with the LED dark.
    ///
    /// Call [`power_on`](Self::power_on) before the first [`poll`](Self::poll)
    /// to fade in, or use [`run`](Self::run).
    pub fn new(
        config: CandleConfig,
        delay: D,
        button: B,
        power: P,
        shared: &'s CandleShared,
    ) -> Self {
        Self {
            rng: Lfsr::new(config.seed()),
            flicker: Flicker::new(&config),
            config,
            state: PowerState::Active,
            delay,
            button,
            power,
            shared,
        }
    }

    /// Fades in from dark and never returns.
    pub fn run(&mut self) -> ! {
        self.power_on();
        loop {
            self.poll();
        }
    }

    /// Initial fade-in after reset.
    pub fn power_on(&mut self) {
        self.fade_in();
    }

    /// One iteration of the main loop.
    ///
    /// Checks for a sleep request first; if none is pending, plays one
    /// flicker step. A request is handled by sleeping and, once the wake
    /// interrupt has resumed execution, waking up again.
    pub fn poll(&mut self) {
        self.check_request();

        match self.state {
            PowerState::Active => {
                self.flicker.step(&mut self.rng, self.shared, &mut self.delay);
            }
            PowerState::SleepRequested => {
                self.sleep();
                self.wake();
            }
            PowerState::Sleeping => {
                self.wake();
            }
        }
    }

    /// Moves `Active` to `SleepRequested` if the tick interrupt raised a
    /// request. Returns the reason when the transition happened.
    pub fn check_request(&mut self) -> Option<SleepReason> {
        if self.state != PowerState::Active {
            return None;
        }

        let reason = self.shared.take_sleep_request()?;
        #[cfg(feature = "defmt")]
        defmt::debug!("sleep requested: {}", reason);

        self.state = PowerState::SleepRequested;
        Some(reason)
    }

    /// Performs the sleep transition and halts.
    ///
    /// Fades to dark while the PWM tick is still running, waits until the
    /// button reads released on two samples `debounce_ms` apart, masks the
    /// tick, arms the wake interrupt and halts. Returns after the wake
    /// interrupt with the state left at `Sleeping`.
    ///
    /// Only acts from `SleepRequested`; any other state is a no-op returning
    /// `false`, so a duplicate call cannot fade or arm twice.
    pub fn sleep(&mut self) -> bool {
        if self.state != PowerState::SleepRequested {
            return false;
        }

        self.shared.set_lines(u8::MAX);
        ramp(
            self.shared,
            &mut self.delay,
            self.shared.brightness(),
            0,
            self.config.fade_step_ms(),
        );
        self.shared.set_brightness(0);

        // A held or bouncing button would wake us straight back up.
        self.wait_for_release();

        self.power.disable_tick();
        self.power.arm_wake();
        self.state = PowerState::Sleeping;

        #[cfg(feature = "defmt")]
        defmt::debug!("sleeping");

        self.power.halt();
        true
    }

    /// Leaves `Sleeping` after the wake interrupt: restarts the tick, clears
    /// the monitor counters and any stale request, then fades in.
    ///
    /// No-op returning `false` from any other state.
    pub fn wake(&mut self) -> bool {
        if self.state != PowerState::Sleeping {
            return false;
        }

        self.shared.request_monitor_reset();
        self.shared.take_sleep_request();
        self.power.enable_tick();
        self.state = PowerState::Active;

        #[cfg(feature = "defmt")]
        defmt::debug!("awake");

        self.fade_in();
        true
    }

    fn fade_in(&mut self) {
        let target = self.config.max_level();

        self.shared.set_lines(u8::MAX);
        self.shared.set_brightness(0);
        ramp(self.shared, &mut self.delay, 0, target, self.config.fade_step_ms());
        self.flicker.resume_from(target);
    }

    fn wait_for_release(&mut self) {
        loop {
            let first = self.button.is_pressed();
            self.delay.delay_ms(self.config.debounce_ms());
            if !first && !self.button.is_pressed() {
                return;
            }
        }
    }

    /// Current power state.
    pub fn state(&self) -> PowerState {
        self.state
    }

    /// Flicker generator, for its level and latency bound.
    pub fn flicker(&self) -> &Flicker {
        &self.flicker
    }

    /// Busy-wait delay driver.
    pub fn delay(&self) -> &D {
        &self.delay
    }

    /// Power control driver.
    pub fn power(&self) -> &P {
        &self.power
    }
}
