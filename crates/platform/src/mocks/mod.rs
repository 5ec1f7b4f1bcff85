//! Mock implementations for testing
//!
//! This module provides mock implementations of all platform traits for use
//! in unit and integration tests. Each mock records its calls for assertion.

#![cfg(any(test, feature = "std"))]
// Mock counters and frame buffers; overflow and indexing are test concerns.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]

use core::cell::Cell;

use crate::alarm::{AlarmConfig, AlarmError, AlarmTimer, TimerConfig};
use crate::clock::MonotonicClock;
use crate::gpio::{OutputPort, PinState};
use crate::sensor::ClimateSensor;
use crate::strip::{LedStrip, Rgb, StripError};

/// Largest strip any test instantiates.
pub const MOCK_STRIP_MAX: usize = 64;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Manually-advanced microsecond clock.
pub struct MockClock {
    now: Cell<u64>,
}

impl MockClock {
    /// Clock starting at zero.
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    /// Clock starting at `start_us`.
    pub fn starting_at(start_us: u64) -> Self {
        Self {
            now: Cell::new(start_us),
        }
    }

    /// Move time forward by `delta_us`.
    pub fn advance(&self, delta_us: u64) {
        self.now.set(self.now.get() + delta_us);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for MockClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}

// ---------------------------------------------------------------------------
// GPIO output
// ---------------------------------------------------------------------------

/// Mock output pin — records every level transition.
pub struct MockPin {
    /// Current driven level.
    pub level: PinState,
    /// Total number of `set_level` calls.
    pub write_count: usize,
    /// Number of calls that changed the level.
    pub transition_count: usize,
}

impl MockPin {
    /// Pin initially driven low.
    pub fn new() -> Self {
        Self {
            level: PinState::Low,
            write_count: 0,
            transition_count: 0,
        }
    }
}

impl Default for MockPin {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for MockPin {
    type Error = core::convert::Infallible;

    fn set_level(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.write_count += 1;
        if self.level != state {
            self.transition_count += 1;
        }
        self.level = state;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Alarm timer
// ---------------------------------------------------------------------------

/// Mock alarm timer — records lifecycle calls and can fire its callback
/// on demand.
pub struct MockAlarmTimer {
    /// Static configuration the timer was created with.
    pub config: TimerConfig,
    /// Whether another alarm action already owns the physical timer.
    pub bound_elsewhere: bool,
    /// Registered callback, if any.
    pub callback: Option<fn()>,
    /// Whether `enable` has been called.
    pub enabled: bool,
    /// Currently configured alarm action.
    pub alarm: Option<AlarmConfig>,
    /// Whether the counter is running.
    pub running: bool,
    /// Number of `start` calls that actually started the counter.
    pub start_count: usize,
    /// Number of `stop` calls that actually stopped the counter.
    pub stop_count: usize,
}

impl MockAlarmTimer {
    /// Free timer with the given static configuration.
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            bound_elsewhere: false,
            callback: None,
            enabled: false,
            alarm: None,
            running: false,
            start_count: 0,
            stop_count: 0,
        }
    }

    /// Timer whose physical instance is already bound to another alarm;
    /// every binding operation fails with [`AlarmError::ResourceUnavailable`].
    pub fn already_bound(config: TimerConfig) -> Self {
        Self {
            bound_elsewhere: true,
            ..Self::new(config)
        }
    }

    /// Simulate one alarm firing: invokes the registered callback if the
    /// counter is running.
    pub fn fire(&self) {
        if self.running {
            if let Some(cb) = self.callback {
                cb();
            }
        }
    }
}

impl AlarmTimer for MockAlarmTimer {
    fn register_callback(&mut self, on_alarm: fn()) -> Result<(), AlarmError> {
        if self.bound_elsewhere {
            return Err(AlarmError::ResourceUnavailable);
        }
        self.callback = Some(on_alarm);
        Ok(())
    }

    fn enable(&mut self) -> Result<(), AlarmError> {
        if self.bound_elsewhere {
            return Err(AlarmError::ResourceUnavailable);
        }
        self.enabled = true;
        Ok(())
    }

    fn set_alarm(&mut self, alarm: AlarmConfig) -> Result<(), AlarmError> {
        if self.bound_elsewhere {
            return Err(AlarmError::ResourceUnavailable);
        }
        if self.running {
            return Err(AlarmError::Running);
        }
        if alarm.alarm_count == 0 {
            return Err(AlarmError::InvalidAlarm);
        }
        self.alarm = Some(alarm);
        Ok(())
    }

    fn start(&mut self) -> Result<(), AlarmError> {
        if !self.running {
            self.running = true;
            self.start_count += 1;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AlarmError> {
        if self.running {
            self.running = false;
            self.stop_count += 1;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn resolution_hz(&self) -> u32 {
        self.config.resolution_hz
    }
}

// ---------------------------------------------------------------------------
// LED strip
// ---------------------------------------------------------------------------

/// Mock LED strip — stages pixels like a real driver and records every
/// refresh. Refresh failures are injectable for fault-isolation tests.
pub struct MockStrip {
    len: u16,
    /// Staged frame (what `set_pixel` wrote since the last refresh).
    pub staged: heapless::Vec<Rgb, MOCK_STRIP_MAX>,
    /// Frame visible on the strip after the last successful refresh.
    pub shown: heapless::Vec<Rgb, MOCK_STRIP_MAX>,
    /// Number of successful refreshes.
    pub refresh_count: usize,
    /// Number of `clear` calls.
    pub clear_count: usize,
    /// Upcoming refreshes to fail with [`StripError::Render`].
    pub fail_refreshes: usize,
}

impl MockStrip {
    /// Strip of `len` pixels, all off. `len` is capped at
    /// [`MOCK_STRIP_MAX`].
    pub fn new(len: u16) -> Self {
        let len = len.min(MOCK_STRIP_MAX as u16);
        let mut staged = heapless::Vec::new();
        let mut shown = heapless::Vec::new();
        for _ in 0..len {
            let _ = staged.push(Rgb::OFF);
            let _ = shown.push(Rgb::OFF);
        }
        Self {
            len,
            staged,
            shown,
            refresh_count: 0,
            clear_count: 0,
            fail_refreshes: 0,
        }
    }

    /// Indices of currently lit pixels (after the last successful refresh).
    pub fn lit_pixels(&self) -> heapless::Vec<u16, MOCK_STRIP_MAX> {
        let mut lit = heapless::Vec::new();
        for (i, px) in self.shown.iter().enumerate() {
            if *px != Rgb::OFF {
                let _ = lit.push(i as u16);
            }
        }
        lit
    }
}

impl LedStrip for MockStrip {
    type Error = StripError;

    fn len(&self) -> u16 {
        self.len
    }

    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error> {
        if index >= self.len {
            return Err(StripError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.staged[usize::from(index)] = color;
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), Self::Error> {
        if self.fail_refreshes > 0 {
            self.fail_refreshes -= 1;
            return Err(StripError::Render);
        }
        self.shown = self.staged.clone();
        self.refresh_count += 1;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), Self::Error> {
        for px in &mut self.staged {
            *px = Rgb::OFF;
        }
        self.clear_count += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Climate sensor
// ---------------------------------------------------------------------------

/// Mock sensor failure modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockSensorError {
    /// Init-time failure.
    Init,
    /// Single-cycle read failure.
    Read,
}

/// Mock climate sensor with injectable init and read failures.
pub struct MockSensor {
    /// Temperature returned by successful reads.
    pub temperature_c: f32,
    /// Humidity returned by successful reads.
    pub humidity_pct: f32,
    /// Whether `init` should fail.
    pub fail_init: bool,
    /// Upcoming reads (of either quantity) to fail.
    pub fail_reads: usize,
    /// Number of `init` calls.
    pub init_count: usize,
    /// Number of read calls attempted (successful or not).
    pub read_count: usize,
}

impl MockSensor {
    /// Sensor reporting fixed readings.
    pub fn new(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            fail_init: false,
            fail_reads: 0,
            init_count: 0,
            read_count: 0,
        }
    }
}

impl ClimateSensor for MockSensor {
    type Error = MockSensorError;

    async fn init(&mut self) -> Result<(), Self::Error> {
        self.init_count += 1;
        if self.fail_init {
            return Err(MockSensorError::Init);
        }
        Ok(())
    }

    async fn read_temperature(&mut self) -> Result<f32, Self::Error> {
        self.read_count += 1;
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(MockSensorError::Read);
        }
        Ok(self.temperature_c)
    }

    async fn read_humidity(&mut self) -> Result<f32, Self::Error> {
        self.read_count += 1;
        if self.fail_reads > 0 {
            self.fail_reads -= 1;
            return Err(MockSensorError::Read);
        }
        Ok(self.humidity_pct)
    }
}
