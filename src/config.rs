//! Build-time configuration for the candle core.

use core::num::NonZeroU32;

use crate::rng::DEFAULT_SEED;

/// Electrical level that lights an LED line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Driving the line high lights the LED.
    ActiveHigh,

    /// Driving the line low lights the LED (LED tied to VCC).
    ActiveLow,
}

/// How the flicker generator turns random draws into light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlickerMode {
    /// Low byte is the brightness, high byte the dwell in milliseconds.
    ///
    /// Each step blanks to the floor for one dwell, then holds the new level
    /// for another.
    Direct,

    /// Ramps one unit at a time toward a random target.
    Fade {
        /// Minimum brightness. Targets below it are raised to it and the flame
        /// rests there for a random pause.
        floor: Option<u8>,

        /// Upper bound for the per-unit step delay in milliseconds.
        max_step_ms: u8,
    },

    /// Lights a random subset of LED lines at full brightness.
    ///
    /// The highest configured line always stays lit so the candle never goes
    /// fully dark.
    Scatter,
}

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The generator seed was zero.
    ZeroSeed,

    /// PWM bit depth outside 1..=8.
    BitDepthOutOfRange(u8),

    /// The wrap phase was given zero timer ticks.
    ZeroWrapTicks,

    /// Auto-off enabled with a zero duration. Use `None` to disable it.
    ZeroAutoOff,

    /// Zero PWM cycles per second.
    ZeroCalibration,

    /// Zero long-press threshold.
    ZeroLongPress,

    /// No LED line selected.
    EmptyLedMask,

    /// A fade step delay of zero milliseconds.
    ZeroFadeStep,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroSeed => write!(f, "generator seed must be nonzero"),
            ConfigError::BitDepthOutOfRange(bits) => {
                write!(f, "PWM bit depth {} is outside 1..=8", bits)
            }
            ConfigError::ZeroWrapTicks => write!(f, "wrap phase needs at least one tick"),
            ConfigError::ZeroAutoOff => {
                write!(f, "auto-off duration must be nonzero (use None to disable)")
            }
            ConfigError::ZeroCalibration => {
                write!(f, "PWM cycles per second must be nonzero")
            }
            ConfigError::ZeroLongPress => write!(f, "long-press threshold must be nonzero"),
            ConfigError::EmptyLedMask => write!(f, "at least one LED line must be selected"),
            ConfigError::ZeroFadeStep => write!(f, "fade step delay must be nonzero"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Validated, build-time candle configuration.
///
/// Construct with [`CandleConfig::builder`]. All builder methods are `const`,
/// so firmware can evaluate the configuration at compile time:
///
/// ```
/// use led_candle::{CandleConfig, Polarity};
///
/// const CONFIG: CandleConfig = match CandleConfig::builder()
///     .polarity(Polarity::ActiveLow)
///     .led_mask(0b0001_1110)
///     .auto_off_secs(Some(3600))
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => panic!("invalid candle configuration"),
/// };
///
/// assert_eq!(CONFIG.led_mask(), 0b0001_1110);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandleConfig {
    seed: NonZeroU32,
    bits: u8,
    wrap_ticks: u8,
    cycles_per_second: u16,
    auto_off_secs: Option<u16>,
    long_press_ticks: u32,
    debounce_ms: u32,
    fade_step_ms: u32,
    polarity: Polarity,
    led_mask: u8,
    mode: FlickerMode,
    mode_toggle: bool,
}

impl CandleConfig {
    /// Default configuration: 8-bit PWM, one active-high LED on line 0,
    /// two hours auto-off and direct flicker.
    pub const DEFAULT: CandleConfig = match CandleConfig::builder().build() {
        Ok(config) => config,
        Err(_) => panic!("default configuration must be valid"),
    };

    /// Creates a builder populated with the defaults.
    pub const fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Generator seed.
    pub const fn seed(&self) -> NonZeroU32 {
        self.seed
    }

    /// Number of PWM bit-planes.
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Timer ticks spent in the dark wrap phase closing each PWM cycle.
    pub const fn wrap_ticks(&self) -> u8 {
        self.wrap_ticks
    }

    /// Completed PWM cycles that make up one second on this target.
    pub const fn cycles_per_second(&self) -> u16 {
        self.cycles_per_second
    }

    /// Seconds of on-time before the candle puts itself to sleep.
    pub const fn auto_off_secs(&self) -> Option<u16> {
        self.auto_off_secs
    }

    /// Consecutive pressed ticks that count as a long press.
    pub const fn long_press_ticks(&self) -> u32 {
        self.long_press_ticks
    }

    /// Delay between the two released samples of the sleep debounce.
    pub const fn debounce_ms(&self) -> u32 {
        self.debounce_ms
    }

    /// Delay per brightness unit while fading in or out of sleep.
    pub const fn fade_step_ms(&self) -> u32 {
        self.fade_step_ms
    }

    /// Electrical level that lights an LED.
    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// LED lines driven by the PWM engine.
    pub const fn led_mask(&self) -> u8 {
        self.led_mask
    }

    /// Flicker generator variant.
    pub const fn mode(&self) -> FlickerMode {
        self.mode
    }

    /// Whether a short press toggles the alternate flicker speed.
    pub const fn mode_toggle(&self) -> bool {
        self.mode_toggle
    }

    /// Maximum brightness representable with the configured bit depth.
    pub const fn max_level(&self) -> u8 {
        ((1u16 << self.bits) - 1) as u8
    }

    /// Timer interrupts in one full PWM cycle (one per bit-plane plus wrap).
    pub const fn ticks_per_cycle(&self) -> u32 {
        self.bits as u32 + 1
    }

    /// Approximate timer interrupts per second.
    pub const fn ticks_per_second(&self) -> u32 {
        self.ticks_per_cycle() * self.cycles_per_second as u32
    }

    /// Converts milliseconds into timer interrupts, rounding down.
    pub const fn ticks_for_millis(&self, millis: u32) -> u32 {
        ((self.ticks_per_second() as u64 * millis as u64) / 1000) as u32
    }
}

impl Default for CandleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`CandleConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    seed: u32,
    bits: u8,
    wrap_ticks: u8,
    cycles_per_second: u16,
    auto_off_secs: Option<u16>,
    long_press_ticks: u32,
    long_press_ms: Option<u32>,
    debounce_ms: u32,
    fade_step_ms: u32,
    polarity: Polarity,
    led_mask: u8,
    mode: FlickerMode,
    mode_toggle: bool,
}

impl ConfigBuilder {
    /// Creates a builder with the default values.
    pub const fn new() -> Self {
        Self {
            seed: DEFAULT_SEED.get(),
            bits: 8,
            wrap_ticks: 1,
            cycles_per_second: 293,
            auto_off_secs: Some(7200),
            long_press_ticks: 7032,
            long_press_ms: None,
            debounce_ms: 500,
            fade_step_ms: 5,
            polarity: Polarity::ActiveHigh,
            led_mask: 0b0000_0001,
            mode: FlickerMode::Direct,
            mode_toggle: true,
        }
    }

    /// Sets the generator seed. Must be nonzero.
    pub const fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the number of PWM bit-planes (1..=8).
    pub const fn bits(mut self, bits: u8) -> Self {
        self.bits = bits;
        self
    }

    /// Sets the length of the dark wrap phase in timer ticks.
    ///
    /// Defaults to 1, which keeps the duty cycle within one tick of
    /// `brightness / (2^bits - 1)`. Longer wrap phases dim every level by
    /// `(2^bits - 1) / (2^bits - 1 + ticks)`.
    pub const fn wrap_ticks(mut self, ticks: u8) -> Self {
        self.wrap_ticks = ticks;
        self
    }

    /// Sets the tuned number of PWM cycles per second for this target clock.
    pub const fn cycles_per_second(mut self, cycles: u16) -> Self {
        self.cycles_per_second = cycles;
        self
    }

    /// Sets the auto-off duration. `None` keeps the candle lit until a long press.
    pub const fn auto_off_secs(mut self, secs: Option<u16>) -> Self {
        self.auto_off_secs = secs;
        self
    }

    /// Sets the long-press threshold directly in timer ticks.
    pub const fn long_press_ticks(mut self, ticks: u32) -> Self {
        self.long_press_ticks = ticks;
        self.long_press_ms = None;
        self
    }

    /// Sets the long-press threshold in milliseconds.
    ///
    /// Converted to ticks in [`build`](Self::build) with the final bit depth
    /// and calibration.
    pub const fn long_press_millis(mut self, millis: u32) -> Self {
        self.long_press_ms = Some(millis);
        self
    }

    /// Sets the debounce delay used before sleeping.
    pub const fn debounce_ms(mut self, millis: u32) -> Self {
        self.debounce_ms = millis;
        self
    }

    /// Sets the per-unit delay of the sleep fade-out and wake fade-in.
    pub const fn fade_step_ms(mut self, millis: u32) -> Self {
        self.fade_step_ms = millis;
        self
    }

    /// Sets the LED polarity.
    pub const fn polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    /// Selects the LED lines (bit n = line n).
    pub const fn led_mask(mut self, mask: u8) -> Self {
        self.led_mask = mask;
        self
    }

    /// Selects the flicker variant.
    pub const fn mode(mut self, mode: FlickerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables the short-press speed toggle.
    pub const fn mode_toggle(mut self, enabled: bool) -> Self {
        self.mode_toggle = enabled;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub const fn build(self) -> Result<CandleConfig, ConfigError> {
        let seed = match NonZeroU32::new(self.seed) {
            Some(seed) => seed,
            None => return Err(ConfigError::ZeroSeed),
        };

        if self.bits == 0 || self.bits > 8 {
            return Err(ConfigError::BitDepthOutOfRange(self.bits));
        }
        if self.wrap_ticks == 0 {
            return Err(ConfigError::ZeroWrapTicks);
        }
        if self.cycles_per_second == 0 {
            return Err(ConfigError::ZeroCalibration);
        }
        if let Some(0) = self.auto_off_secs {
            return Err(ConfigError::ZeroAutoOff);
        }
        if self.led_mask == 0 {
            return Err(ConfigError::EmptyLedMask);
        }
        if self.fade_step_ms == 0 {
            return Err(ConfigError::ZeroFadeStep);
        }
        if let FlickerMode::Fade { max_step_ms: 0, .. } = self.mode {
            return Err(ConfigError::ZeroFadeStep);
        }

        let mut config = CandleConfig {
            seed,
            bits: self.bits,
            wrap_ticks: self.wrap_ticks,
            cycles_per_second: self.cycles_per_second,
            auto_off_secs: self.auto_off_secs,
            long_press_ticks: self.long_press_ticks,
            debounce_ms: self.debounce_ms,
            fade_step_ms: self.fade_step_ms,
            polarity: self.polarity,
            led_mask: self.led_mask,
            mode: self.mode,
            mode_toggle: self.mode_toggle,
        };

        if let Some(millis) = self.long_press_ms {
            config.long_press_ticks = config.ticks_for_millis(millis);
        }
        if config.long_press_ticks == 0 {
            return Err(ConfigError::ZeroLongPress);
        }

        Ok(config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
