//! Hardware abstraction traits consumed by the candle core.
//!
//! The core never touches registers. Firmware implements these traits for its
//! board (pin masks, timer compare register, sleep instruction) and hands the
//! implementations to [`TickHandler`](crate::TickHandler) and
//! [`Candle`](crate::Candle). Blocking waits in the main loop go through
//! [`embedded_hal::delay::DelayNs`].

use embedded_hal::digital::{InputPin, OutputPin};

/// Electrical driver for a bank of LED lines.
///
/// Bit `n` of `lines` selects line `n`. Lines not selected are left as they
/// are. Polarity is resolved by the core before these are called, so
/// implementations only set levels.
pub trait LedBank {
    /// Drives the selected lines high.
    fn set_high(&mut self, lines: u8);

    /// Drives the selected lines low.
    fn set_low(&mut self, lines: u8);
}

/// Read-only view of the push button.
pub trait Button {
    /// Returns true while the button is held down.
    fn is_pressed(&mut self) -> bool;
}

/// The periodic timer that paces the PWM engine.
pub trait TickTimer {
    /// Arranges for the next tick interrupt `ticks` base units from now.
    ///
    /// Implementations reprogram the compare value, restart the count so the
    /// handler's own runtime is not charged to the next phase, and clear any
    /// pending compare flag so a stale match cannot re-enter the handler.
    fn schedule(&mut self, ticks: u8);
}

/// Interrupt masking and low-power control used by the sleep transition.
pub trait PowerControl {
    /// Masks the periodic tick interrupt.
    fn disable_tick(&mut self);

    /// Unmasks the periodic tick interrupt.
    fn enable_tick(&mut self);

    /// Clears any stale pin-change flag and arms the button wake interrupt.
    fn arm_wake(&mut self);

    /// Disarms the wake interrupt and clears its pending flag.
    fn disarm_wake(&mut self);

    /// Halts in the deepest sleep mode until an unmasked interrupt fires.
    ///
    /// The wake edge may arrive between [`arm_wake`](Self::arm_wake) and this
    /// call, in which case the wake interrupt has already disarmed itself and
    /// a plain halt would never end. Implementations must close that window:
    /// mask interrupts, return at once if the wake interrupt is no longer
    /// armed, and otherwise enable interrupts and enter sleep in a single
    /// uninterruptible sequence (on AVR, `sei` directly followed by `sleep`).
    fn halt(&mut self);
}

/// Body of the pin-change wake interrupt.
///
/// Disarms itself and returns; the main loop resumes right after
/// [`PowerControl::halt`].
#[inline]
pub fn on_wake_interrupt<P: PowerControl>(power: &mut P) {
    power.disarm_wake();
}

/// Single LED on an `embedded-hal` output pin, occupying line 0.
///
/// Pin errors are ignored; the next PWM phase rewrites the level anyway.
pub struct PinLed<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> PinLed<P> {
    /// Wraps an output pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Releases the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LedBank for PinLed<P> {
    fn set_high(&mut self, lines: u8) {
        if lines & 1 != 0 {
            let _ = self.pin.set_high();
        }
    }

    fn set_low(&mut self, lines: u8) {
        if lines & 1 != 0 {
            let _ = self.pin.set_low();
        }
    }
}

/// Active-low button on an `embedded-hal` input pin with pull-up.
///
/// A failed read counts as released.
pub struct PinButton<P: InputPin> {
    pin: P,
}

impl<P: InputPin> PinButton<P> {
    /// Wraps an input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Releases the pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: InputPin> Button for PinButton<P> {
    fn is_pressed(&mut self) -> bool {
        self.pin.is_low().unwrap_or(false)
    }
}
