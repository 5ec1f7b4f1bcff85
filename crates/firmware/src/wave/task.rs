//! Embassy task for the polling waveform strategies.
//!
//! The interrupt-driven strategy never reaches this module — it lives
//! entirely in [`super::isr`]. Polling strategies run here as an ordinary
//! preemptible task whose only suspension points are the ones the strategy
//! itself schedules ([`PollAction`]).

use embassy_executor::Spawner;
use embassy_futures::yield_now;
use embassy_stm32::gpio::{AnyPin, Level, Output};
use embassy_time::Timer;

use platform::clock::MonotonicClock;
use platform::gpio::{OutputPort, PinState};

use super::generator::{PollAction, PollingWaveform, WaveformPlan};

/// Monotonic clock adapter over the embassy time driver.
pub struct EmbassyClock;

impl MonotonicClock for EmbassyClock {
    fn now_us(&self) -> u64 {
        embassy_time::Instant::now().as_micros()
    }
}

/// Embassy output pin as a platform [`OutputPort`].
pub struct EmbassyOutput(Output<'static, AnyPin>);

impl EmbassyOutput {
    /// Wrap an already-configured push-pull output.
    pub fn new(pin: Output<'static, AnyPin>) -> Self {
        Self(pin)
    }
}

impl OutputPort for EmbassyOutput {
    type Error = core::convert::Infallible;

    fn set_level(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.0.set_level(match state {
            PinState::High => Level::High,
            PinState::Low => Level::Low,
        });
        Ok(())
    }
}

/// Spawn the polling waveform task.
///
/// Call once from main, only when the configured method is a polling
/// variant; the plan has already been validated at configure time.
pub fn spawn_wave_task(spawner: &Spawner, pin: Output<'static, AnyPin>, plan: WaveformPlan) {
    spawner.must_spawn(wave_polling_task(pin, plan));
}

/// Polling waveform generator task.
#[embassy_executor::task]
async fn wave_polling_task(pin: Output<'static, AnyPin>, plan: WaveformPlan) {
    let Some(mut poller) = PollingWaveform::new(&plan) else {
        defmt::error!("wave: polling task spawned with an interrupt-driven plan");
        return;
    };

    defmt::info!(
        "wave: polling generator running, half-period {=u64} us",
        plan.half_period_us
    );

    let clock = EmbassyClock;
    let mut port = EmbassyOutput::new(pin);
    loop {
        let (toggle, action) = poller.poll(clock.now_us());
        if let Some(level) = toggle {
            // Infallible on this HAL.
            let _ = port.set_level(level);
        }
        match action {
            PollAction::Continue => {}
            // The strategy's designed suspension points — the only places
            // this task lets the executor breathe.
            PollAction::YieldNow => yield_now().await,
            PollAction::Block { ms } => Timer::after_millis(ms).await,
        }
    }
}
