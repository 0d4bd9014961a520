//! Shared test infrastructure for led-candle integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use led_candle::{
    Button, CandleShared, LedBank, PowerControl, SleepReason, TickTimer, on_wake_interrupt,
};

// ============================================================================
// Mock Clock
// ============================================================================

/// Simulated time, advanced only by [`MockDelay`]
pub struct MockClock {
    now_ns: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now_ns: Cell::new(0),
        }
    }

    pub fn advance_ns(&self, ns: u64) {
        self.now_ns.set(self.now_ns.get() + ns);
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }
}

// ============================================================================
// Mock Delay
// ============================================================================

/// Busy-wait stand-in that advances the clock and samples the shared brightness
pub struct MockDelay<'a> {
    clock: &'a MockClock,
    shared: &'a CandleShared,
    samples: heapless::Vec<u8, 2048>,
    calls: u32,
    request_at_call: Option<u32>,
    requested_at_ms: Option<u64>,
}

impl<'a> MockDelay<'a> {
    pub fn new(clock: &'a MockClock, shared: &'a CandleShared) -> Self {
        Self {
            clock,
            shared,
            samples: heapless::Vec::new(),
            calls: 0,
            request_at_call: None,
            requested_at_ms: None,
        }
    }

    /// Raises a long-press sleep request at the start of delay call `call`
    /// (zero-based), as if the tick interrupt fired during that wait.
    pub fn requesting_sleep_at(mut self, call: u32) -> Self {
        self.request_at_call = Some(call);
        self
    }

    /// Simulated time at which the scripted request was raised
    pub fn requested_at_ms(&self) -> Option<u64> {
        self.requested_at_ms
    }

    fn record(&mut self, ns: u64) {
        if self.request_at_call == Some(self.calls) {
            self.shared.request_sleep(SleepReason::LongPress);
            self.requested_at_ms = Some(self.clock.now_ms());
        }
        let _ = self.samples.push(self.shared.brightness());
        self.calls += 1;
        self.clock.advance_ns(ns);
    }

    /// Brightness seen at the start of every delay call
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.record(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms as u64 * 1_000_000);
    }
}

// ============================================================================
// Mock Buttons
// ============================================================================

/// Button held during fixed windows of simulated time (ms, end exclusive)
pub struct ScriptedButton<'a> {
    clock: &'a MockClock,
    held: heapless::Vec<(u64, u64), 8>,
}

impl<'a> ScriptedButton<'a> {
    pub fn new(clock: &'a MockClock, held: &[(u64, u64)]) -> Self {
        let mut windows = heapless::Vec::new();
        for &window in held {
            windows.push(window).unwrap();
        }
        Self {
            clock,
            held: windows,
        }
    }

    pub fn released(clock: &'a MockClock) -> Self {
        Self::new(clock, &[])
    }
}

impl Button for ScriptedButton<'_> {
    fn is_pressed(&mut self) -> bool {
        let now = self.clock.now_ms();
        self.held
            .iter()
            .any(|&(start, end)| start <= now && now < end)
    }
}

/// Button switched directly by the test
pub struct SwitchButton<'a> {
    pressed: &'a Cell<bool>,
}

impl<'a> SwitchButton<'a> {
    pub fn new(pressed: &'a Cell<bool>) -> Self {
        Self { pressed }
    }
}

impl Button for SwitchButton<'_> {
    fn is_pressed(&mut self) -> bool {
        self.pressed.get()
    }
}

// ============================================================================
// Mock LEDs and Timer
// ============================================================================

/// Output port latch
#[derive(Default)]
pub struct MockLeds {
    pub level: u8,
}

impl LedBank for MockLeds {
    fn set_high(&mut self, lines: u8) {
        self.level |= lines;
    }

    fn set_low(&mut self, lines: u8) {
        self.level &= !lines;
    }
}

/// Timer that remembers the last scheduled interval
#[derive(Default)]
pub struct MockTimer {
    pub last: u8,
    pub scheduled: u32,
}

impl TickTimer for MockTimer {
    fn schedule(&mut self, ticks: u8) {
        self.last = ticks;
        self.scheduled += 1;
    }
}

// ============================================================================
// Mock Power Control
// ============================================================================

/// Records interrupt masking and halts; a halt with wake armed behaves as if
/// the button edge fired the wake interrupt immediately. A halt with wake
/// already disarmed returns at once, as a correct implementation must.
pub struct MockPower<'a> {
    clock: &'a MockClock,
    pub tick_enabled: bool,
    pub wake_armed: bool,
    pub arm_calls: u32,
    pub disarm_calls: u32,
    pub halt_calls: u32,
    pub armed_at_ms: Option<u64>,
    pub edge_before_halt: bool,
}

impl<'a> MockPower<'a> {
    pub fn new(clock: &'a MockClock) -> Self {
        Self {
            clock,
            tick_enabled: true,
            wake_armed: false,
            arm_calls: 0,
            disarm_calls: 0,
            halt_calls: 0,
            armed_at_ms: None,
            edge_before_halt: false,
        }
    }

    /// Fires the wake interrupt right after arming, before the halt
    pub fn with_edge_before_halt(mut self) -> Self {
        self.edge_before_halt = true;
        self
    }
}

impl PowerControl for MockPower<'_> {
    fn disable_tick(&mut self) {
        self.tick_enabled = false;
    }

    fn enable_tick(&mut self) {
        self.tick_enabled = true;
    }

    fn arm_wake(&mut self) {
        self.wake_armed = true;
        self.arm_calls += 1;
        self.armed_at_ms = Some(self.clock.now_ms());
        if self.edge_before_halt {
            on_wake_interrupt(self);
        }
    }

    fn disarm_wake(&mut self) {
        self.wake_armed = false;
        self.disarm_calls += 1;
    }

    fn halt(&mut self) {
        self.halt_calls += 1;
        if self.wake_armed {
            on_wake_interrupt(self);
        }
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// True when the samples never decrease
pub fn is_monotonic_rising(samples: &[u8]) -> bool {
    samples.windows(2).all(|pair| pair[0] <= pair[1])
}
