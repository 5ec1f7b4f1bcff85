//! Hardware boot configuration for the Benchwatch node.
//!
//! Initialization order (order matters for correctness):
//!   1. Build the RCC configuration ([`build_embassy_config`]) — the wave
//!      timer's tick rate is derived from the APB1 timer kernel clock set
//!      here.
//!   2. `embassy_stm32::init(...)`.
//!   3. Arm the IWDG watchdog. Once unleashed it cannot be stopped; the
//!      heartbeat loop in `main` must feed it every
//!      [`WATCHDOG_TIMEOUT_MS`] at the latest.
//!   4. Configure activity hardware and spawn tasks.
//!
//! All timing relations between these constants are host-tested at the
//! bottom of this file.

/// IWDG timeout in milliseconds.
///
/// The watchdog uses the 32 kHz LSI clock and is independent of the main
/// PLL. Any task (or a mis-configured polling waveform) that stalls the
/// executor past this window resets the MCU.
pub const WATCHDOG_TIMEOUT_MS: u32 = 8_000;

/// Heartbeat interval of the idle loop in `main`, which feeds the watchdog.
/// Must be well below [`WATCHDOG_TIMEOUT_MS`].
pub const HEARTBEAT_INTERVAL_MS: u32 = 1_000;

/// APB1 timer kernel clock in Hz, as produced by [`build_embassy_config`]
/// (APB1 at 100 MHz with a non-unity prescaler doubles the timer clock).
pub const TIMER_KERNEL_HZ: u32 = 200_000_000;

/// Wave alarm timer tick rate: 1 MHz, one tick per microsecond.
pub const WAVE_TIMER_RESOLUTION_HZ: u32 = 1_000_000;

/// TIM5 prescaler dividing [`TIMER_KERNEL_HZ`] down to
/// [`WAVE_TIMER_RESOLUTION_HZ`]. The `- 1` is the hardware's off-by-one
/// convention (PSC register holds divider minus one).
pub const WAVE_TIMER_PRESCALER: u32 = TIMER_KERNEL_HZ / WAVE_TIMER_RESOLUTION_HZ - 1;

// ── Activity cadences ────────────────────────────────────────────────────────

/// Full square-wave period in microseconds: 100 µs → 10 kHz, alarm every
/// 50 ticks at 1 MHz resolution.
pub const WAVE_PERIOD_US: u64 = 100;

/// Waveform strategy the node boots with. All three strategies are built
/// and validated the same way; switching is a configuration change, not a
/// rebuild.
pub const WAVE_METHOD: crate::wave::WaveformMethod =
    crate::wave::WaveformMethod::InterruptDriven;

/// Chase sweep color: dim red, easy on bench-adjacent eyes.
pub const CHASE_COLOR: platform::strip::Rgb = platform::strip::Rgb::new(16, 0, 0);

/// Sensor bus wiring: HTU21D on I2C1, PB6 SCL / PB7 SDA, internal
/// pull-ups (the breakout carries none).
pub const SENSOR_BUS: platform::sensor::SensorBusConfig = platform::sensor::SensorBusConfig {
    sda: platform::gpio::PinId(7),
    scl: platform::gpio::PinId(6),
    pull: platform::gpio::Pull::Up,
};

/// Chase animation tick interval in milliseconds.
pub const CHASE_TICK_MS: u64 = 50;

/// Number of pixels on the bench strip.
pub const STRIP_LEN: u16 = 20;

/// Climate sampling interval in milliseconds.
pub const SENSOR_INTERVAL_MS: u64 = 2_000;

/// Default forced-yield spacing for the delta-polling waveform strategy:
/// one cooperative yield per this many busy-loop iterations.
pub const DELTA_YIELD_EVERY: u32 = 4_096;

/// Default interval between blocking sleeps for the burst-polling waveform
/// strategy, in microseconds. Empirically tuned on the bench; must stay
/// strictly below the watchdog timeout (host-tested below).
pub const BURST_YIELD_EVERY_US: u64 = 10_000;

/// Default duration of each blocking sleep for the burst-polling strategy,
/// in milliseconds.
pub const BURST_BLOCK_MS: u64 = 10;

/// IWDG configuration value: timeout in microseconds, as taken by
/// `embassy_stm32::wdg::IndependentWatchdog::new`.
pub const fn init_watchdog_config() -> u32 {
    WATCHDOG_TIMEOUT_MS * 1_000
}

/// Build the `embassy_stm32::Config` with the RCC settings for the node.
///
/// # Clock Tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz
/// APB1 timer kernel clock: 2 × 100 MHz = 200 MHz ([`TIMER_KERNEL_HZ`]) —
/// feeds TIM5 (wave alarm) and TIM2 (embassy time driver).
///
/// # DO NOT call `embassy_stm32::init(Default::default())`
///
/// Always call `embassy_stm32::init(build_embassy_config())` from `main.rs`.
/// The wave timer prescaler ([`WAVE_TIMER_PRESCALER`]) is computed for this
/// clock tree; a default RCC config runs the timers from a different kernel
/// clock and silently detunes the generated waveform.
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    // ── Oscillators ─────────────────────────────────────────────────────────
    // HSI: 64 MHz internal oscillator (no prescaler). No crystal dependency;
    // available immediately on power-on.
    config.rcc.hsi = Some(HSIPrescaler::DIV1);

    // ── PLL1: system clock ──────────────────────────────────────────────────
    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = VCO / divp(2) = 400 MHz  → system clock
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2), // 400 MHz — system clock
        divq: None,
        divr: None,
    });

    // ── System clock + bus prescalers ────────────────────────────────────────
    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz, timer kernel 200 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    /// The heartbeat must fit many times into the watchdog window, or a
    /// single delayed wakeup would reset the MCU.
    #[test]
    fn heartbeat_is_well_inside_watchdog_window() {
        assert!(
            HEARTBEAT_INTERVAL_MS * 4 <= WATCHDOG_TIMEOUT_MS,
            "heartbeat {HEARTBEAT_INTERVAL_MS} ms leaves no margin against \
             the {WATCHDOG_TIMEOUT_MS} ms watchdog"
        );
    }

    /// Liveness precondition of the burst-polling strategy: the interval
    /// between its blocking sleeps must be strictly shorter than the
    /// watchdog timeout, or the idle task cannot run in time.
    #[test]
    fn burst_interval_strictly_below_watchdog() {
        assert!(
            BURST_YIELD_EVERY_US < u64::from(WATCHDOG_TIMEOUT_MS) * 1_000,
            "burst yield interval must be < watchdog timeout"
        );
    }

    /// The prescaler must divide the kernel clock exactly, or every alarm
    /// count computed from WAVE_TIMER_RESOLUTION_HZ is off.
    #[test]
    fn prescaler_divides_kernel_clock_exactly() {
        assert_eq!(TIMER_KERNEL_HZ % WAVE_TIMER_RESOLUTION_HZ, 0);
        assert_eq!(WAVE_TIMER_PRESCALER, 199);
    }

    /// 100 µs at 1 MHz resolution is the 10 kHz reference square wave:
    /// alarm every 50 ticks.
    #[test]
    fn default_wave_period_is_10khz_reference() {
        let half_ticks =
            crate::wave::alarm_ticks(WAVE_PERIOD_US, WAVE_TIMER_RESOLUTION_HZ);
        assert_eq!(half_ticks, 50);
    }

    /// Chase and sensor cadences are independent: neither is a multiple of
    /// the other's phase requirement, and both yield far more often than
    /// the watchdog window.
    #[test]
    fn activity_cadences_yield_inside_watchdog_window() {
        assert!(CHASE_TICK_MS < u64::from(WATCHDOG_TIMEOUT_MS));
        assert!(SENSOR_INTERVAL_MS < u64::from(WATCHDOG_TIMEOUT_MS));
    }
}
