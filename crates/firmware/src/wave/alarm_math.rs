//! Alarm-count arithmetic for the wave timer.
//!
//! The hardware timer fires its alarm every `alarm_count` ticks and the ISR
//! toggles the pin once per firing, so the alarm interval is the waveform's
//! *half*-period:
//!
//! ```text
//! alarm_count      = round(period_us × resolution_hz / 2_000_000)
//! toggle frequency = resolution_hz / (2 × alarm_count)
//! ```
//!
//! Reference point: `resolution_hz = 1_000_000`, `alarm_count = 50`
//! ⇒ toggles every 50 µs ⇒ 100 µs full period ⇒ 10 kHz square wave.
//!
//! Rounding rule: **round half up** on the half-period tick count. The
//! realized full period therefore differs from the request by at most one
//! tick on each half-period. All arithmetic is widened to u128 so no input
//! combination can overflow.

/// Microseconds per second.
const US_PER_SEC: u128 = 1_000_000;

/// Widest alarm count the 32-bit counter (TIM5) supports.
pub const TIMER_COUNTER_MAX: u64 = u32::MAX as u64;

/// Half-period alarm count for a full waveform period of `period_us` at
/// `resolution_hz` ticks per second, rounded half up.
///
/// Returns 0 when the period is too short to represent at this resolution;
/// callers treat that as an invalid period.
// u128 intermediates cannot overflow: period_us and resolution_hz are both
// bounded well below 2^64.
#[allow(clippy::arithmetic_side_effects)]
pub const fn alarm_ticks(period_us: u64, resolution_hz: u32) -> u64 {
    let numer = period_us as u128 * resolution_hz as u128;
    let denom = 2 * US_PER_SEC;
    ((numer + denom / 2) / denom) as u64
}

/// Realized full waveform period in microseconds for a given alarm count,
/// rounded half up.
#[allow(clippy::arithmetic_side_effects)]
pub const fn realized_period_us(alarm_count: u64, resolution_hz: u32) -> u64 {
    let numer = 2 * alarm_count as u128 * US_PER_SEC;
    let denom = resolution_hz as u128;
    ((numer + denom / 2) / denom) as u64
}

/// Realized toggle (full-wave) frequency in Hz: `resolution_hz / (2 × alarm_count)`.
///
/// Integer division truncates; used for reporting, not for configuration.
#[allow(clippy::arithmetic_side_effects)]
pub const fn realized_toggle_hz(alarm_count: u64, resolution_hz: u32) -> u64 {
    if alarm_count == 0 {
        return 0;
    }
    (resolution_hz as u64) / (2 * alarm_count)
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    /// 100 µs at 1 MHz is the reference 10 kHz wave: alarm every 50 ticks.
    #[test]
    fn reference_10khz_wave() {
        assert_eq!(alarm_ticks(100, 1_000_000), 50);
        assert_eq!(realized_period_us(50, 1_000_000), 100);
        assert_eq!(realized_toggle_hz(50, 1_000_000), 10_000);
    }

    /// Round-half-up on the half-period: 101 µs ⇒ 50.5 ticks ⇒ 51.
    #[test]
    fn half_tick_rounds_up() {
        assert_eq!(alarm_ticks(101, 1_000_000), 51);
        // 99 µs ⇒ 49.5 ticks ⇒ 50, same alarm as the 100 µs request.
        assert_eq!(alarm_ticks(99, 1_000_000), 50);
    }

    /// Sub-tick periods collapse to zero and must be rejected upstream.
    #[test]
    fn too_short_period_yields_zero_ticks() {
        // 1 µs full period at 32.768 kHz: half-period 0.016 ticks.
        assert_eq!(alarm_ticks(1, 32_768), 0);
    }

    /// One-tick half-period is the fastest representable wave.
    #[test]
    fn fastest_representable_wave() {
        // 2 µs full period at 1 MHz: one tick per half-period, 500 kHz wave.
        assert_eq!(alarm_ticks(2, 1_000_000), 1);
        assert_eq!(realized_toggle_hz(1, 1_000_000), 500_000);
    }

    /// For any valid request, the realized period is within one rounding
    /// unit (one tick per half-period, i.e. two ticks total) of the request.
    #[test]
    fn realized_period_within_one_rounding_unit() {
        let resolution_hz = 1_000_000_u32;
        let tick_us = 1_u64; // 1 MHz
        for period_us in [2_u64, 3, 7, 99, 100, 101, 1_000, 32_767, 1_000_000] {
            let ticks = alarm_ticks(period_us, resolution_hz);
            assert!(ticks > 0, "period {period_us} µs must be representable");
            let realized = realized_period_us(ticks, resolution_hz);
            let err = realized.abs_diff(period_us);
            assert!(
                err <= 2 * tick_us,
                "period {period_us} µs realized as {realized} µs (err {err})"
            );
        }
    }

    /// Coarse clocks round the same way: 32.768 kHz tick is ~30.5 µs.
    #[test]
    fn coarse_resolution_rounds_half_up() {
        // 1000 µs full period: the 500 µs half-period is 16.384 ticks ⇒ 16.
        assert_eq!(alarm_ticks(1_000, 32_768), 16);
        let realized = realized_period_us(16, 32_768);
        // 32 ticks full-wave at 32.768 kHz = 976.5625 µs, rounds to 977.
        assert_eq!(realized, 977);
    }

    /// Huge periods stay within the u128 widening and land above the
    /// 32-bit counter limit, which the caller must reject.
    #[test]
    fn huge_period_exceeds_counter_width() {
        let ticks = alarm_ticks(u64::MAX / 2, 1_000_000);
        assert!(ticks > TIMER_COUNTER_MAX);
    }
}
