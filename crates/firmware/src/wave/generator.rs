//! Waveform configuration, strategy selection, and toggle state.
//!
//! The strategy is a runtime value ([`WaveformMethod`]), chosen once when
//! the generator is configured. Validation happens synchronously in
//! [`WaveformConfig::plan`]; a configuration that cannot uphold its
//! liveness precondition never starts.

use platform::alarm::{AlarmConfig, AlarmError, AlarmTimer};
use platform::gpio::{PinId, PinState};
use thiserror_no_std::Error;

use super::alarm_math::{alarm_ticks, TIMER_COUNTER_MAX};

/// Waveform generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveformMethod {
    /// Busy-loop against the monotonic clock with a forced cooperative
    /// yield every `yield_every` iterations. The yield point is mandatory:
    /// `yield_every == 0` is rejected at plan time.
    PollingDelta {
        /// Busy-loop iterations between cooperative yields.
        yield_every: u32,
    },
    /// Busy-loop with a blocking sleep of `block_ms` whenever
    /// `yield_every_us` has elapsed since the previous sleep. The sleep
    /// interval must be strictly shorter than the watchdog timeout.
    PollingBurst {
        /// Microseconds of busy polling between blocking sleeps.
        yield_every_us: u64,
        /// Duration of each blocking sleep, in milliseconds.
        block_ms: u64,
    },
    /// Hardware alarm timer fires an ISR per half-period. No CPU cost
    /// between alarms; the recommended default.
    InterruptDriven,
}

impl WaveformMethod {
    /// Delta polling with the bench-tuned default yield spacing.
    pub const fn polling_delta() -> Self {
        Self::PollingDelta {
            yield_every: crate::boot::DELTA_YIELD_EVERY,
        }
    }

    /// Burst polling with the bench-tuned default interval and block.
    pub const fn polling_burst() -> Self {
        Self::PollingBurst {
            yield_every_us: crate::boot::BURST_YIELD_EVERY_US,
            block_ms: crate::boot::BURST_BLOCK_MS,
        }
    }
}

/// Waveform generator configuration. Immutable once the generator starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformConfig {
    /// Output pin carrying the square wave.
    pub pin: PinId,
    /// Full waveform period in microseconds. The pin toggles every
    /// half-period.
    pub period_us: u64,
    /// Generation strategy.
    pub method: WaveformMethod,
}

/// Waveform configuration errors. All are detected synchronously at plan
/// time and prevent the generator from starting; other activities are
/// unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaveError {
    /// Period is zero, rounds to a zero alarm count, or exceeds the
    /// timer's counter width.
    #[error("period outside the timer's representable range")]
    InvalidPeriod,
    /// A polling strategy was configured without an auditable yield point.
    #[error("polling strategy has no yield point")]
    MissingYieldPoint,
    /// Burst polling's sleep interval does not fit inside the watchdog
    /// window, so liveness cannot be guaranteed.
    #[error("burst interval not strictly below the watchdog timeout")]
    BurstExceedsWatchdog,
    /// The requested hardware timer is already bound to another alarm.
    #[error("hardware timer unavailable")]
    ResourceUnavailable,
}

impl From<AlarmError> for WaveError {
    fn from(err: AlarmError) -> Self {
        match err {
            AlarmError::ResourceUnavailable | AlarmError::Running => Self::ResourceUnavailable,
            AlarmError::InvalidAlarm => Self::InvalidPeriod,
        }
    }
}

/// Polling strategy parameters extracted from a validated plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollKind {
    /// Forced yield every N iterations.
    Delta {
        /// Busy-loop iterations between cooperative yields.
        yield_every: u32,
    },
    /// Blocking sleep at a coarser interval.
    Burst {
        /// Microseconds of busy polling between blocking sleeps.
        yield_every_us: u64,
        /// Duration of each blocking sleep, in milliseconds.
        block_ms: u64,
    },
}

/// A validated waveform configuration, ready to drive either the polling
/// loop or the alarm timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformPlan {
    /// Toggle interval in microseconds (`period_us / 2`).
    pub half_period_us: u64,
    /// Alarm interval in timer ticks; fits the 32-bit counter.
    pub alarm_count: u32,
    /// Selected strategy.
    pub method: WaveformMethod,
}

impl WaveformPlan {
    /// Polling parameters, or `None` for the interrupt-driven strategy.
    pub fn poll_kind(&self) -> Option<PollKind> {
        match self.method {
            WaveformMethod::PollingDelta { yield_every } => Some(PollKind::Delta { yield_every }),
            WaveformMethod::PollingBurst {
                yield_every_us,
                block_ms,
            } => Some(PollKind::Burst {
                yield_every_us,
                block_ms,
            }),
            WaveformMethod::InterruptDriven => None,
        }
    }
}

impl WaveformConfig {
    /// Validate this configuration against the timer resolution and the
    /// watchdog window.
    ///
    /// Errors:
    /// - [`WaveError::InvalidPeriod`] — period below 2 µs, rounding to a
    ///   zero alarm count, or beyond the 32-bit counter.
    /// - [`WaveError::MissingYieldPoint`] — delta polling with
    ///   `yield_every == 0`, or burst polling with `block_ms == 0`.
    /// - [`WaveError::BurstExceedsWatchdog`] — burst interval not strictly
    ///   below `watchdog_timeout_ms`.
    pub fn plan(
        &self,
        resolution_hz: u32,
        watchdog_timeout_ms: u32,
    ) -> Result<WaveformPlan, WaveError> {
        if self.period_us < 2 {
            return Err(WaveError::InvalidPeriod);
        }
        let ticks = alarm_ticks(self.period_us, resolution_hz);
        if ticks == 0 || ticks > TIMER_COUNTER_MAX {
            return Err(WaveError::InvalidPeriod);
        }

        match self.method {
            WaveformMethod::PollingDelta { yield_every } if yield_every == 0 => {
                return Err(WaveError::MissingYieldPoint);
            }
            WaveformMethod::PollingBurst { block_ms, .. } if block_ms == 0 => {
                return Err(WaveError::MissingYieldPoint);
            }
            WaveformMethod::PollingBurst { yield_every_us, .. }
                if yield_every_us >= u64::from(watchdog_timeout_ms).saturating_mul(1_000) =>
            {
                return Err(WaveError::BurstExceedsWatchdog);
            }
            _ => {}
        }

        Ok(WaveformPlan {
            half_period_us: self.period_us / 2,
            alarm_count: ticks as u32,
            method: self.method,
        })
    }
}

/// Toggle state, exclusively owned by the generator's execution context —
/// the ISR for the interrupt-driven strategy, the polling task otherwise.
/// Never shared; values needed elsewhere leave through an atomic handoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformState {
    /// Clock timestamp of the last toggle, in microseconds.
    pub last_toggle_us: u64,
    /// Level currently driven on the pin.
    pub level: PinState,
}

impl WaveformState {
    /// Initial state: pin low, no toggle recorded.
    pub const fn new() -> Self {
        Self {
            last_toggle_us: 0,
            level: PinState::Low,
        }
    }

    /// Polling-side step: if more than `half_period_us` has elapsed since
    /// the last toggle, flip the level, record `now_us`, and return the new
    /// level to drive.
    pub fn advance(&mut self, now_us: u64, half_period_us: u64) -> Option<PinState> {
        if now_us.saturating_sub(self.last_toggle_us) > half_period_us {
            self.level = self.level.toggled();
            self.last_toggle_us = now_us;
            Some(self.level)
        } else {
            None
        }
    }

    /// Alarm-side step: unconditionally flip and return the new level.
    /// The hardware alarm cadence provides the timing.
    pub fn toggle(&mut self) -> PinState {
        self.level = self.level.toggled();
        self.level
    }
}

impl Default for WaveformState {
    fn default() -> Self {
        Self::new()
    }
}

/// Scheduling action the polling loop must take after a poll step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollAction {
    /// Keep polling.
    Continue,
    /// Cooperatively yield to the executor (delta strategy's forced yield).
    YieldNow,
    /// Blocking sleep (burst strategy's watchdog relief).
    Block {
        /// Sleep duration in milliseconds.
        ms: u64,
    },
}

/// Polling-strategy engine: toggle decisions plus yield/block scheduling,
/// as pure state so the whole loop body is host-testable.
pub struct PollingWaveform {
    state: WaveformState,
    half_period_us: u64,
    kind: PollKind,
    iterations: u32,
    last_block_us: u64,
}

impl PollingWaveform {
    /// Engine for a validated plan. Returns `None` if the plan selects the
    /// interrupt-driven strategy (which has no polling loop).
    pub fn new(plan: &WaveformPlan) -> Option<Self> {
        plan.poll_kind().map(|kind| Self {
            state: WaveformState::new(),
            half_period_us: plan.half_period_us,
            kind,
            iterations: 0,
            last_block_us: 0,
        })
    }

    /// One loop iteration at clock time `now_us`: possibly a level to
    /// drive, plus the scheduling action to take.
    #[allow(clippy::arithmetic_side_effects)] // iteration counter wraps by design
    pub fn poll(&mut self, now_us: u64) -> (Option<PinState>, PollAction) {
        let toggle = self.state.advance(now_us, self.half_period_us);

        let action = match self.kind {
            PollKind::Delta { yield_every } => {
                self.iterations = self.iterations.wrapping_add(1);
                if self.iterations % yield_every == 0 {
                    PollAction::YieldNow
                } else {
                    PollAction::Continue
                }
            }
            PollKind::Burst {
                yield_every_us,
                block_ms,
            } => {
                if now_us.saturating_sub(self.last_block_us) > yield_every_us {
                    self.last_block_us = now_us;
                    PollAction::Block { ms: block_ms }
                } else {
                    PollAction::Continue
                }
            }
        };

        (toggle, action)
    }

    /// Current toggle state (for reporting).
    pub fn state(&self) -> &WaveformState {
        &self.state
    }
}

/// Interrupt-driven engine: owns the alarm timer for the lifetime of the
/// generator. At most one exists per physical timer.
pub struct AlarmWaveform<T: AlarmTimer> {
    timer: T,
    alarm_count: u32,
    started: bool,
}

impl<T: AlarmTimer> AlarmWaveform<T> {
    /// Bind `config` to `timer`, registering `on_alarm` as the ISR.
    ///
    /// Fails with [`WaveError::ResourceUnavailable`] if the timer is
    /// already bound to another alarm, [`WaveError::InvalidPeriod`] if the
    /// period rounds to an alarm count the counter cannot hold. On failure
    /// nothing is started and other activities are unaffected.
    pub fn configure(
        config: &WaveformConfig,
        mut timer: T,
        on_alarm: fn(),
        watchdog_timeout_ms: u32,
    ) -> Result<Self, WaveError> {
        let plan = config.plan(timer.resolution_hz(), watchdog_timeout_ms)?;
        timer.register_callback(on_alarm)?;
        timer.enable()?;
        timer.set_alarm(AlarmConfig::periodic(plan.alarm_count))?;
        Ok(Self {
            timer,
            alarm_count: plan.alarm_count,
            started: false,
        })
    }

    /// Start the wave. Idempotent: a second `start` without an intervening
    /// [`stop`](Self::stop) is a success no-op and does not disturb the
    /// running cadence.
    pub fn start(&mut self) -> Result<(), WaveError> {
        if self.started {
            return Ok(());
        }
        self.timer.start()?;
        self.started = true;
        Ok(())
    }

    /// Stop the wave. Idempotent.
    pub fn stop(&mut self) -> Result<(), WaveError> {
        if !self.started {
            return Ok(());
        }
        self.timer.stop()?;
        self.started = false;
        Ok(())
    }

    /// Whether the wave is currently running.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Configured alarm interval in timer ticks.
    pub fn alarm_count(&self) -> u32 {
        self.alarm_count
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::alarm::TimerConfig;
    use platform::mocks::MockAlarmTimer;

    fn nop_alarm() {}

    fn usec_timer() -> MockAlarmTimer {
        MockAlarmTimer::new(TimerConfig::microsecond())
    }

    fn config(period_us: u64, method: WaveformMethod) -> WaveformConfig {
        WaveformConfig {
            pin: PinId(18),
            period_us,
            method,
        }
    }

    const WATCHDOG_MS: u32 = 8_000;

    #[test]
    fn plan_rejects_zero_and_sub_tick_periods() {
        let cfg = config(0, WaveformMethod::InterruptDriven);
        assert_eq!(cfg.plan(1_000_000, WATCHDOG_MS), Err(WaveError::InvalidPeriod));

        // 2 µs full period at 32.768 kHz rounds to a zero alarm count.
        let cfg = config(2, WaveformMethod::InterruptDriven);
        assert_eq!(cfg.plan(32_768, WATCHDOG_MS), Err(WaveError::InvalidPeriod));
    }

    #[test]
    fn plan_rejects_period_beyond_counter_width() {
        let cfg = config(u64::MAX / 4, WaveformMethod::InterruptDriven);
        assert_eq!(cfg.plan(1_000_000, WATCHDOG_MS), Err(WaveError::InvalidPeriod));
    }

    #[test]
    fn plan_requires_yield_point_for_delta_polling() {
        let cfg = config(100, WaveformMethod::PollingDelta { yield_every: 0 });
        assert_eq!(
            cfg.plan(1_000_000, WATCHDOG_MS),
            Err(WaveError::MissingYieldPoint)
        );
    }

    #[test]
    fn plan_rejects_burst_interval_at_or_above_watchdog() {
        let cfg = config(
            100,
            WaveformMethod::PollingBurst {
                yield_every_us: u64::from(WATCHDOG_MS) * 1_000,
                block_ms: 10,
            },
        );
        assert_eq!(
            cfg.plan(1_000_000, WATCHDOG_MS),
            Err(WaveError::BurstExceedsWatchdog)
        );

        // One microsecond under the window is accepted.
        let cfg = config(
            100,
            WaveformMethod::PollingBurst {
                yield_every_us: u64::from(WATCHDOG_MS) * 1_000 - 1,
                block_ms: 10,
            },
        );
        assert!(cfg.plan(1_000_000, WATCHDOG_MS).is_ok());
    }

    #[test]
    fn plan_computes_reference_alarm_count() {
        let plan = config(100, WaveformMethod::InterruptDriven)
            .plan(1_000_000, WATCHDOG_MS)
            .unwrap();
        assert_eq!(plan.alarm_count, 50);
        assert_eq!(plan.half_period_us, 50);
        assert!(plan.poll_kind().is_none());
    }

    #[test]
    fn configure_fails_on_bound_timer() {
        let timer = MockAlarmTimer::already_bound(TimerConfig::microsecond());
        let err = AlarmWaveform::configure(
            &config(100, WaveformMethod::InterruptDriven),
            timer,
            nop_alarm,
            WATCHDOG_MS,
        )
        .err();
        assert_eq!(err, Some(WaveError::ResourceUnavailable));
    }

    #[test]
    fn start_is_idempotent() {
        let timer = usec_timer();
        let mut wave = AlarmWaveform::configure(
            &config(100, WaveformMethod::InterruptDriven),
            timer,
            nop_alarm,
            WATCHDOG_MS,
        )
        .unwrap();

        wave.start().unwrap();
        wave.start().unwrap();
        assert!(wave.is_started());
        // A double start must not restart the counter: the cadence is
        // identical to a single start.
        assert_eq!(wave.timer.start_count, 1);

        wave.stop().unwrap();
        wave.stop().unwrap();
        assert_eq!(wave.timer.stop_count, 1);
        assert!(!wave.is_started());

        wave.start().unwrap();
        assert_eq!(wave.timer.start_count, 2);
    }

    #[test]
    fn advance_toggles_strictly_after_half_period() {
        let mut state = WaveformState::new();
        assert_eq!(state.advance(50, 50), None, "at the boundary: no toggle");
        let level = state.advance(51, 50);
        assert_eq!(level, Some(PinState::High));
        assert_eq!(state.last_toggle_us, 51);
        // Next toggle measured from the recorded toggle time.
        assert_eq!(state.advance(101, 50), None);
        assert_eq!(state.advance(102, 50), Some(PinState::Low));
    }

    #[test]
    fn toggle_sequence_is_strictly_ordered() {
        let mut state = WaveformState::new();
        let mut seen = [PinState::Low; 6];
        for slot in &mut seen {
            *slot = state.toggle();
        }
        assert_eq!(
            seen,
            [
                PinState::High,
                PinState::Low,
                PinState::High,
                PinState::Low,
                PinState::High,
                PinState::Low
            ]
        );
    }

    #[test]
    fn delta_polling_yields_every_n_iterations() {
        let plan = config(100, WaveformMethod::PollingDelta { yield_every: 4 })
            .plan(1_000_000, WATCHDOG_MS)
            .unwrap();
        let mut poller = PollingWaveform::new(&plan).unwrap();

        let mut yields = 0;
        for i in 0..12_u64 {
            let (_, action) = poller.poll(i);
            if action == PollAction::YieldNow {
                yields += 1;
            }
        }
        assert_eq!(yields, 3, "exactly one yield per 4 iterations");
    }

    #[test]
    fn burst_polling_blocks_at_configured_interval() {
        let plan = config(
            100,
            WaveformMethod::PollingBurst {
                yield_every_us: 10_000,
                block_ms: 10,
            },
        )
        .plan(1_000_000, WATCHDOG_MS)
        .unwrap();
        let mut poller = PollingWaveform::new(&plan).unwrap();

        // Within the first interval: no block requested.
        let (_, action) = poller.poll(5_000);
        assert_eq!(action, PollAction::Continue);
        // Past the interval: block once, then the window restarts.
        let (_, action) = poller.poll(10_001);
        assert_eq!(action, PollAction::Block { ms: 10 });
        let (_, action) = poller.poll(10_002);
        assert_eq!(action, PollAction::Continue);
    }

    #[test]
    fn polling_toggles_track_half_period() {
        let plan = config(100, WaveformMethod::polling_burst())
            .plan(1_000_000, WATCHDOG_MS)
            .unwrap();
        let mut poller = PollingWaveform::new(&plan).unwrap();

        let mut toggles = heapless::Vec::<u64, 8>::new();
        let mut now = 0_u64;
        while toggles.len() < 4 {
            now += 1;
            if let (Some(_), _) = poller.poll(now) {
                toggles.push(now).unwrap();
            }
        }
        // First toggle at 51 µs (strictly past the 50 µs half-period),
        // then every 51 µs: the polling loop's one-tick lag is inherent.
        assert_eq!(toggles.as_slice(), &[51, 102, 153, 204]);
    }
}
