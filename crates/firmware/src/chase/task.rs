//! Embassy task driving the chase animation.

use embassy_executor::Spawner;
use embassy_time::Timer;

use platform::strip::LedStrip;

use super::{chase_tick, ChaseConfig, ChaseState};
use crate::strip::BenchStrip;

/// Spawn the chase animation task. The strip hardware is owned by the task
/// for the lifetime of the firmware; the encoded-frame buffer inside it is
/// large, so it lives in a `StaticCell`, not on a task stack.
pub fn spawn_chase_task(spawner: &Spawner, strip: &'static mut BenchStrip, config: ChaseConfig) {
    spawner.must_spawn(chase_task(strip, config));
}

/// Chase animation task: one sweep step per tick, fixed cadence.
#[embassy_executor::task]
async fn chase_task(strip: &'static mut BenchStrip, config: ChaseConfig) {
    defmt::info!(
        "chase: {=u16} pixels, tick {=u64} ms",
        strip.len(),
        config.tick_ms
    );

    let mut state = ChaseState::new(config.color);
    loop {
        // A failed render is fatal to this tick only: log and keep sweeping.
        match chase_tick(&mut state, &mut strip).await {
            Ok(position) => defmt::trace!("chase: pixel {=u16}", position),
            Err(e) => defmt::warn!("chase: render fault, frame dropped: {}", e),
        }
        Timer::after_millis(config.tick_ms).await;
    }
}
