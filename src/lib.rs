#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Lfsr`**: 32-bit Galois LFSR; the same seed gives the same flicker on every power-up
//! - **`PwmEngine`**: Binary-weighted software PWM, one timer interrupt per brightness bit
//! - **`ButtonMonitor`**: Hold and on-time counters sampled on every PWM tick
//! - **`TickHandler`**: The whole timer interrupt (PWM engine + button monitor + owned hardware)
//! - **`Flicker`**: Flame pattern generator (`Direct`, `Fade` or `Scatter`)
//! - **`Candle`**: Main-loop driver and power state machine (`Active` / `SleepRequested` / `Sleeping`)
//! - **`CandleShared`**: Atomic cells linking the interrupt with the main loop
//! - **`CandleConfig`**: Build-time constants, validated by a `const` builder
//! - **`LedBank`**, **`Button`**, **`TickTimer`**, **`PowerControl`**: Traits to implement for your board
//!
//! Brightness is a `u8`; with fewer than eight PWM bit-planes only the low
//! bits are shown.

pub mod config;
pub mod flicker;
pub mod hal;
pub mod irq;
pub mod monitor;
pub mod power;
pub mod pwm;
pub mod rng;
pub mod shared;
pub mod tick;

pub use config::{CandleConfig, ConfigBuilder, ConfigError, FlickerMode, Polarity};
pub use flicker::{Flicker, ramp};
pub use hal::{Button, LedBank, PinButton, PinLed, PowerControl, TickTimer, on_wake_interrupt};
pub use irq::IrqCell;
pub use monitor::{ButtonMonitor, MonitorSignals};
pub use power::{Candle, PowerState};
pub use pwm::{PwmEngine, PwmTick};
pub use rng::{DEFAULT_SEED, Lfsr};
pub use shared::{CandleShared, SleepReason};
pub use tick::TickHandler;
