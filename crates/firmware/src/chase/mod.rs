//! LED chase animation: one lit pixel sweeping the strip end to end.
//!
//! The sweep is a strict reflecting ping-pong — `0, 1, …, L-1, L-2, …, 1,
//! 0, 1, …` — with the direction flipping exactly on arrival at either
//! boundary, never elsewhere. State is an owned value threaded through the
//! task loop; nothing animation-related lives in globals.
//!
//! A failed render is logged and dropped: the state machine has already
//! advanced, so the next tick continues the sweep as if the frame had been
//! shown.

mod state;

pub use state::{ChaseConfig, ChaseError, ChaseState, Direction};

#[cfg(feature = "hardware")]
pub mod task;

use platform::strip::LedStrip;

/// One animation tick: advance the sweep, then render it — clear, stage the
/// single lit pixel, push the frame.
///
/// Returns the position rendered. A render error is returned to the caller
/// for logging; the state has already advanced, which is what isolates a
/// render fault to its own tick.
pub async fn chase_tick<S: LedStrip>(
    state: &mut ChaseState,
    strip: &mut S,
) -> Result<u16, S::Error> {
    let position = state.tick(strip.len());
    strip.clear().await?;
    strip.set_pixel(position, state.color())?;
    strip.refresh().await?;
    Ok(position)
}
