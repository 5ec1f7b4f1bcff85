//! Benchwatch Node Firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI. Wires the three periodic
//! activities to their hardware, arms the watchdog, and then becomes the
//! idle heartbeat that feeds it.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals;
use embassy_stm32::spi::{Config as SpiConfig, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::Timer;

use platform::alarm::TimerConfig;
use platform::gpio::{PinId, Pull};
use platform::strip::StripConfig;
use static_cell::StaticCell;

use firmware::boot;
use firmware::chase::{task::spawn_chase_task, ChaseConfig};
use firmware::sensor::{task::spawn_sensor_task, Htu21d};
use firmware::strip::{BenchStrip, Ws2812Spi, WS2812_SPI_HZ};
use firmware::wave::{self, task::spawn_wave_task, AlarmWaveform, WaveformConfig, WaveformMethod};

// Panic handler + RTT logger
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
});

// The strip's encoded-frame buffer is too large for a task stack.
static STRIP: StaticCell<BenchStrip> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!("Benchwatch node v{=str}", "0.1.0");
    defmt::info!("Initializing STM32H743ZI — Cortex-M7 @ 400 MHz");

    let p = embassy_stm32::init(boot::build_embassy_config());

    // Arm the IWDG first. Once unleashed it cannot be stopped — the
    // heartbeat loop below MUST pet it inside every WATCHDOG_TIMEOUT_MS
    // window, which is exactly the liveness contract the activities are
    // designed around.
    let mut watchdog =
        embassy_stm32::wdg::IndependentWatchdog::new(p.IWDG1, boot::init_watchdog_config());
    watchdog.unleash();
    defmt::info!(
        "IWDG watchdog armed: timeout={=u32}ms",
        boot::WATCHDOG_TIMEOUT_MS
    );

    // -----------------------------------------------------------------------
    // Waveform generator — PA8, strategy selected once at configure time.
    //
    // A configuration error here (period out of range, timer already bound,
    // polling strategy without a yield point) prevents only this component
    // from starting; the chase and sensor activities are unaffected.
    // -----------------------------------------------------------------------
    let wave_config = WaveformConfig {
        pin: PinId(8),
        period_us: boot::WAVE_PERIOD_US,
        method: boot::WAVE_METHOD,
    };
    let wave_pin = Output::new(p.PA8, Level::Low, Speed::VeryHigh).degrade();

    // Keeps the interrupt-driven generator alive for the firmware's
    // lifetime; main never returns.
    let mut _wave_generator = None;

    match wave_config.method {
        WaveformMethod::InterruptDriven => {
            wave::isr::bind_wave_output(wave_pin);
            match wave::isr::Tim5Alarm::take(TimerConfig::microsecond()) {
                Some(timer) => {
                    match AlarmWaveform::configure(
                        &wave_config,
                        timer,
                        wave::isr::on_wave_alarm,
                        boot::WATCHDOG_TIMEOUT_MS,
                    ) {
                        Ok(mut generator) => {
                            // start() is idempotent; a second call would be
                            // a success no-op.
                            match generator.start() {
                                Ok(()) => defmt::info!(
                                    "wave: {=u64} us period, alarm every {=u32} ticks, {=u64} Hz",
                                    wave_config.period_us,
                                    generator.alarm_count(),
                                    wave::realized_toggle_hz(
                                        u64::from(generator.alarm_count()),
                                        boot::WAVE_TIMER_RESOLUTION_HZ,
                                    )
                                ),
                                Err(e) => defmt::error!("wave: start failed: {}", e),
                            }
                            _wave_generator = Some(generator);
                        }
                        Err(e) => defmt::error!("wave: configuration rejected: {}", e),
                    }
                }
                None => defmt::error!("wave: TIM5 already bound, generator disabled"),
            }
        }
        WaveformMethod::PollingDelta { .. } | WaveformMethod::PollingBurst { .. } => {
            match wave_config.plan(boot::WAVE_TIMER_RESOLUTION_HZ, boot::WATCHDOG_TIMEOUT_MS) {
                Ok(plan) => spawn_wave_task(&spawner, wave_pin, plan),
                Err(e) => defmt::error!("wave: configuration rejected: {}", e),
            }
        }
    }

    // -----------------------------------------------------------------------
    // LED chase — WS2812 strip on SPI1 MOSI (PA7), 20 pixels.
    // -----------------------------------------------------------------------
    let mut spi_config = SpiConfig::default();
    spi_config.frequency = Hertz(WS2812_SPI_HZ);
    let spi = Spi::new(
        p.SPI1, p.PA5,      // SCK (unused by the strip, required by the HAL)
        p.PA7,      // MOSI — strip data line
        p.PA6,      // MISO (unused)
        p.DMA1_CH0, // TX DMA
        p.DMA1_CH1, // RX DMA
        spi_config,
    );

    let chase_config = ChaseConfig {
        color: boot::CHASE_COLOR,
        tick_ms: boot::CHASE_TICK_MS,
    };
    match Ws2812Spi::new(
        spi,
        StripConfig {
            data_pin: PinId(7),
            len: boot::STRIP_LEN,
        },
    ) {
        Ok(strip) => match chase_config.validate() {
            Ok(()) => spawn_chase_task(&spawner, STRIP.init(strip), chase_config),
            Err(e) => defmt::error!("chase: configuration rejected: {}", e),
        },
        Err(e) => defmt::error!("chase: strip rejected: {}", e),
    }

    // -----------------------------------------------------------------------
    // Climate sensor — HTU21D on I2C1, wiring per boot::SENSOR_BUS.
    // -----------------------------------------------------------------------
    let mut i2c_config = i2c::Config::default();
    i2c_config.sda_pullup = matches!(boot::SENSOR_BUS.pull, Pull::Up);
    i2c_config.scl_pullup = matches!(boot::SENSOR_BUS.pull, Pull::Up);
    let i2c_bus = I2c::new(
        p.I2C1,
        p.PB6, // SCL
        p.PB7, // SDA
        Irqs,
        p.DMA1_CH2,
        p.DMA1_CH3,
        Hertz(100_000),
        i2c_config,
    );
    defmt::info!(
        "sensor bus: SCL PB{=u8} SDA PB{=u8}, internal pull-ups",
        boot::SENSOR_BUS.scl.0,
        boot::SENSOR_BUS.sda.0
    );
    spawn_sensor_task(&spawner, Htu21d::new(i2c_bus), boot::SENSOR_INTERVAL_MS);

    // Main loop - heartbeat. This is the cooperative idle context every
    // activity must leave room for; it feeds the watchdog and publishes
    // the wave ISR's toggle count.
    defmt::info!("Entering heartbeat loop");
    let mut counter = 0u32;

    loop {
        Timer::after_millis(u64::from(boot::HEARTBEAT_INTERVAL_MS)).await;
        counter = counter.wrapping_add(1);
        defmt::debug!(
            "heartbeat tick={=u32} wave_toggles={=u32}",
            counter,
            wave::isr::toggle_count()
        );
        watchdog.pet();
    }
}
