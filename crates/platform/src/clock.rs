//! Monotonic clock abstraction
//!
//! Wraps the platform's free-running microsecond counter. Read-only: the
//! firmware never sets or resets the clock, it only samples it to measure
//! elapsed time. On hardware this is backed by `embassy_time::Instant`
//! (TIM2 time driver); in host tests by [`crate::mocks::MockClock`].

/// Free-running microsecond counter.
///
/// Implementations must be monotonic: successive calls to [`now_us`] never
/// return a smaller value. Wrap-around is not modelled — a u64 microsecond
/// counter wraps after ~584 000 years.
///
/// [`now_us`]: MonotonicClock::now_us
pub trait MonotonicClock {
    /// Microseconds since an arbitrary epoch (typically boot).
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `earlier_us`.
    ///
    /// Saturates at zero if `earlier_us` is in the future (callers pass
    /// timestamps previously obtained from the same clock, so this only
    /// happens on misuse).
    fn elapsed_since(&self, earlier_us: u64) -> u64 {
        self.now_us().saturating_sub(earlier_us)
    }
}
