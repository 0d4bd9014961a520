//! Periodic timer interrupt: PWM output followed by the button monitor.

use crate::config::CandleConfig;
use crate::hal::{Button, LedBank, TickTimer};
use crate::monitor::ButtonMonitor;
use crate::pwm::{PwmEngine, PwmTick};
use crate::shared::{CandleShared, SleepReason};

/// Everything the timer interrupt owns.
///
/// Keep it in an [`IrqCell`](crate::IrqCell) and call
/// [`on_tick`](Self::on_tick) from the timer compare handler. The handler
/// never blocks; the main loop learns about long presses and timeouts through
/// [`CandleShared`].
pub struct TickHandler<'s, L: LedBank, B: Button, T: TickTimer> {
    pwm: PwmEngine,
    monitor: ButtonMonitor,
    leds: L,
    button: B,
    timer: T,
    shared: &'s CandleShared,
}

impl<'s, L: LedBank, B: Button, T: TickTimer> TickHandler<'s, L, B, T> {
    /// Creates the handler and schedules the first tick.
    pub fn new(
        config: &CandleConfig,
        leds: L,
        button: B,
        mut timer: T,
        shared: &'s CandleShared,
    ) -> Self {
        timer.schedule(1);
        Self {
            pwm: PwmEngine::new(config),
            monitor: ButtonMonitor::new(config),
            leds,
            button,
            timer,
            shared,
        }
    }

    /// Body of the timer interrupt.
    pub fn on_tick(&mut self) -> PwmTick {
        if self.shared.take_monitor_reset() {
            self.monitor.reset();
        }

        let tick = self.pwm.tick(
            self.shared.brightness(),
            self.shared.lines(),
            &mut self.leds,
            &mut self.timer,
        );

        let pressed = self.button.is_pressed();
        let signals = self
            .monitor
            .sample(pressed, tick == PwmTick::CycleComplete);

        if signals.long_press {
            self.shared.request_sleep(SleepReason::LongPress);
        } else if signals.timeout {
            self.shared.request_sleep(SleepReason::Timeout);
        }
        if signals.toggled {
            self.shared.set_alternate(!self.shared.alternate());
        }

        tick
    }

    /// PWM phase and cycle state.
    pub fn pwm(&self) -> &PwmEngine {
        &self.pwm
    }

    /// Button hold and on-time counters.
    pub fn monitor(&self) -> &ButtonMonitor {
        &self.monitor
    }

    /// LED output driver.
    pub fn leds(&self) -> &L {
        &self.leds
    }

    /// Tick timer driver.
    pub fn timer(&self) -> &T {
        &self.timer
    }
}
