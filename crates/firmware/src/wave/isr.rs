//! Interrupt-driven waveform backend: TIM5 alarm + minimal ISR.
//!
//! TIM5 is a 32-bit general-purpose timer on APB1 (kernel clock
//! [`crate::boot::TIMER_KERNEL_HZ`]), prescaled to
//! [`crate::boot::WAVE_TIMER_RESOLUTION_HZ`]. TIM2, the other 32-bit timer,
//! is taken by the embassy time driver (`time-driver-tim2`).
//!
//! The ISR does the minimal possible work — toggle the pin, bump a counter —
//! and returns. It runs outside the task-scheduling contract and preempts
//! every task, so it must not block, allocate, or touch the executor.
//!
//! Ownership: the output pin and toggle state are exclusively owned by the
//! interrupt context once [`bind_wave_output`] has run. The only value that
//! leaves the ISR is the toggle count, published through an atomic
//! ([`toggle_count`]) — tasks never read the ISR's private state directly.

use core::cell::{Cell, RefCell};
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use critical_section::Mutex;
use embassy_stm32::gpio::{AnyPin, Level, Output};
use embassy_stm32::interrupt;

use platform::alarm::{AlarmConfig, AlarmError, AlarmTimer, CountDirection, TimerConfig};
use platform::gpio::PinState;

use super::generator::WaveformState;

/// Output pin driven by the wave ISR. Exclusively owned by the interrupt
/// context after [`bind_wave_output`].
static WAVE_PIN: Mutex<RefCell<Option<Output<'static, AnyPin>>>> =
    Mutex::new(RefCell::new(None));

/// Toggle state owned by the interrupt context. Single writer: the ISR.
static WAVE_STATE: Mutex<RefCell<WaveformState>> = Mutex::new(RefCell::new(WaveformState::new()));

/// Callback registered through [`Tim5Alarm::register_callback`], invoked
/// from the TIM5 vector.
static ALARM_CALLBACK: Mutex<Cell<Option<fn()>>> = Mutex::new(Cell::new(None));

/// Atomic handoff out of the ISR: total level transitions since boot.
static TOGGLE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Single-binding guard for the physical TIM5 instance.
static TIM5_TAKEN: AtomicBool = AtomicBool::new(false);

/// Total pin toggles performed by the wave ISR since boot.
///
/// This is the published view of the ISR's private state; the heartbeat
/// loop logs it. Wraps at `u32::MAX`.
pub fn toggle_count() -> u32 {
    TOGGLE_COUNT.load(Ordering::Relaxed)
}

/// Hand the wave output pin to the interrupt context. Call once before
/// starting the interrupt-driven generator.
pub fn bind_wave_output(pin: Output<'static, AnyPin>) {
    critical_section::with(|cs| {
        WAVE_PIN.borrow_ref_mut(cs).replace(pin);
    });
}

/// Alarm callback for the interrupt-driven strategy: flip the level, drive
/// the pin, bump the published counter. Nothing else.
pub fn on_wave_alarm() {
    critical_section::with(|cs| {
        if let Some(pin) = WAVE_PIN.borrow_ref_mut(cs).as_mut() {
            let level = WAVE_STATE.borrow_ref_mut(cs).toggle();
            pin.set_level(match level {
                PinState::High => Level::High,
                PinState::Low => Level::Low,
            });
        }
    });
    TOGGLE_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// TIM5-backed [`AlarmTimer`].
///
/// At most one instance exists ([`take`](Self::take)); a second caller gets
/// `None`, which the generator surfaces as `ResourceUnavailable`.
pub struct Tim5Alarm {
    resolution_hz: u32,
    running: bool,
}

impl Tim5Alarm {
    /// Claim TIM5, enable its kernel clock, and program the prescaler for
    /// `config.resolution_hz`. Returns `None` if TIM5 is already claimed,
    /// if the resolution does not divide the kernel clock into a 16-bit
    /// prescaler, or if a down-counting alarm is requested (this backend
    /// counts up only).
    pub fn take(config: TimerConfig) -> Option<Self> {
        if config.direction != CountDirection::Up {
            return None;
        }
        let prescaler = crate::boot::TIMER_KERNEL_HZ
            .checked_div(config.resolution_hz)?
            .checked_sub(1)?;
        if prescaler > u32::from(u16::MAX) {
            return None;
        }
        if TIM5_TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }

        let tim = embassy_stm32::pac::TIM5;
        embassy_stm32::pac::RCC.apb1lenr().modify(|w| w.set_tim5en(true));
        tim.psc().write_value(prescaler as u16);

        Some(Self {
            resolution_hz: config.resolution_hz,
            running: false,
        })
    }
}

impl AlarmTimer for Tim5Alarm {
    fn register_callback(&mut self, on_alarm: fn()) -> Result<(), AlarmError> {
        critical_section::with(|cs| ALARM_CALLBACK.borrow(cs).set(Some(on_alarm)));
        Ok(())
    }

    fn enable(&mut self) -> Result<(), AlarmError> {
        let tim = embassy_stm32::pac::TIM5;
        tim.dier().modify(|w| w.set_uie(true));
        // SAFETY: unmasking TIM5 is sound — its handler below only touches
        // interrupt-owned statics behind critical sections.
        unsafe {
            cortex_m::peripheral::NVIC::unmask(embassy_stm32::pac::Interrupt::TIM5);
        }
        Ok(())
    }

    fn set_alarm(&mut self, alarm: AlarmConfig) -> Result<(), AlarmError> {
        if self.running {
            return Err(AlarmError::Running);
        }
        if alarm.alarm_count == 0 {
            return Err(AlarmError::InvalidAlarm);
        }

        let tim = embassy_stm32::pac::TIM5;
        // Update event fires when the counter wraps at ARR; the alarm
        // interval is alarm_count ticks.
        tim.arr().write_value(alarm.alarm_count.saturating_sub(1));
        tim.cnt().write_value(alarm.reload_count);
        // One-pulse mode is the inverse of auto-reload.
        tim.cr1().modify(|w| w.set_opm(!alarm.auto_reload));
        // Latch the prescaler, then discard the update flag the latch raised.
        tim.egr().write(|w| w.set_ug(true));
        tim.sr().modify(|w| w.set_uif(false));
        Ok(())
    }

    fn start(&mut self) -> Result<(), AlarmError> {
        if !self.running {
            embassy_stm32::pac::TIM5.cr1().modify(|w| w.set_cen(true));
            self.running = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AlarmError> {
        if self.running {
            embassy_stm32::pac::TIM5.cr1().modify(|w| w.set_cen(false));
            self.running = false;
        }
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn resolution_hz(&self) -> u32 {
        self.resolution_hz
    }
}

#[interrupt]
unsafe fn TIM5() {
    let tim = embassy_stm32::pac::TIM5;
    // Clear the update flag first; a late clear loses a pending alarm.
    tim.sr().modify(|w| w.set_uif(false));
    let callback = critical_section::with(|cs| ALARM_CALLBACK.borrow(cs).get());
    if let Some(callback) = callback {
        callback();
    }
}
