//! Hardware alarm timer abstraction
//!
//! A countable hardware timer that fires a callback every `alarm_count`
//! ticks. Lifecycle: create → [`register_callback`] → [`enable`] →
//! [`set_alarm`] → [`start`], optionally [`stop`] before reconfiguration.
//!
//! At most one alarm action may be active per physical timer instance; a
//! second attempt to bind the same timer fails with
//! [`AlarmError::ResourceUnavailable`].
//!
//! The callback runs in interrupt context. It preempts every task regardless
//! of priority and must not block, allocate, or call anything with unbounded
//! or scheduler-yielding latency.
//!
//! [`register_callback`]: AlarmTimer::register_callback
//! [`enable`]: AlarmTimer::enable
//! [`set_alarm`]: AlarmTimer::set_alarm
//! [`start`]: AlarmTimer::start
//! [`stop`]: AlarmTimer::stop

use thiserror_no_std::Error;

/// Count direction of the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CountDirection {
    /// Counter increments from `reload_count` toward the alarm value.
    Up,
    /// Counter decrements toward zero.
    Down,
}

/// Static timer configuration, fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Tick rate of the counter in Hz. 1 MHz gives 1 µs per tick.
    pub resolution_hz: u32,
    /// Count direction.
    pub direction: CountDirection,
}

impl TimerConfig {
    /// 1 MHz up-counter: one tick per microsecond.
    pub const fn microsecond() -> Self {
        Self {
            resolution_hz: 1_000_000,
            direction: CountDirection::Up,
        }
    }
}

/// One alarm action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    /// Counter value loaded when the alarm fires with `auto_reload`.
    pub reload_count: u32,
    /// Counter value at which the alarm fires.
    pub alarm_count: u32,
    /// Re-arm the alarm in hardware after each firing, without software
    /// intervention.
    pub auto_reload: bool,
}

impl AlarmConfig {
    /// Periodic alarm every `alarm_count` ticks, counting from zero.
    pub const fn periodic(alarm_count: u32) -> Self {
        Self {
            reload_count: 0,
            alarm_count,
            auto_reload: true,
        }
    }
}

/// Alarm timer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// The physical timer is already bound to another alarm action.
    #[error("timer already bound to an active alarm")]
    ResourceUnavailable,
    /// The alarm count is zero or exceeds the counter width.
    #[error("alarm count outside the timer's supported range")]
    InvalidAlarm,
    /// Operation requires the timer to be stopped first.
    #[error("timer must be stopped before reconfiguration")]
    Running,
}

/// Countable hardware timer with a periodic alarm callback.
pub trait AlarmTimer {
    /// Register the interrupt callback invoked on each alarm firing.
    ///
    /// Must be called before [`start`](AlarmTimer::start). A plain `fn`
    /// pointer keeps the ISR path free of captured state; anything the
    /// callback mutates lives in state exclusively owned by the interrupt
    /// context.
    fn register_callback(&mut self, on_alarm: fn()) -> Result<(), AlarmError>;

    /// Enable the timer peripheral (clock gating, interrupt unmasking).
    fn enable(&mut self) -> Result<(), AlarmError>;

    /// Configure the alarm action. Fails with [`AlarmError::Running`] if
    /// called while started.
    fn set_alarm(&mut self, alarm: AlarmConfig) -> Result<(), AlarmError>;

    /// Start counting. Idempotent: starting a started timer is a no-op.
    fn start(&mut self) -> Result<(), AlarmError>;

    /// Stop counting. Idempotent: stopping a stopped timer is a no-op.
    fn stop(&mut self) -> Result<(), AlarmError>;

    /// Whether the counter is currently running.
    fn is_running(&self) -> bool;

    /// Tick rate of the counter in Hz.
    fn resolution_hz(&self) -> u32;
}
