//! Square-wave generation on a GPIO test pin.
//!
//! Produces a periodic logic-level transition with the tightest achievable
//! period while preserving system liveness: whatever strategy is selected,
//! the idle/watchdog context must still run.
//!
//! Three runtime-selectable strategies ([`WaveformMethod`]):
//!
//! - **PollingDelta** — busy-loop against the monotonic clock, with a forced
//!   cooperative yield every N iterations. Tightest polling period, worst
//!   scheduler citizenship.
//! - **PollingBurst** — same toggle logic plus a blocking sleep at a coarser
//!   interval. Trades waveform duty-cycle purity for guaranteed liveness.
//! - **InterruptDriven** — hardware alarm timer fires an ISR that does the
//!   minimal work (toggle, count) and returns. Costs no CPU between alarms;
//!   the recommended default.
//!
//! The strategy is chosen once at configuration time; all three share the
//! same toggle semantics and are validated by [`WaveformConfig::plan`].

mod alarm_math;
mod generator;

pub use alarm_math::{alarm_ticks, realized_period_us, realized_toggle_hz, TIMER_COUNTER_MAX};
pub use generator::{
    AlarmWaveform, PollAction, PollKind, PollingWaveform, WaveError, WaveformConfig,
    WaveformMethod, WaveformPlan, WaveformState,
};

#[cfg(feature = "hardware")]
pub mod isr;

#[cfg(feature = "hardware")]
pub mod task;
