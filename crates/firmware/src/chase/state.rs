//! Ping-pong sweep state machine.

use platform::strip::Rgb;
use thiserror_no_std::Error;

/// Sweep direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Position increasing.
    Forward,
    /// Position decreasing.
    Reverse,
}

/// Chase configuration errors, detected synchronously before the task
/// starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChaseError {
    /// The sweep color is all-off; the animation would be invisible.
    #[error("chase color must not be all-off")]
    InvalidColor,
    /// Zero tick cadence.
    #[error("chase tick interval must be non-zero")]
    InvalidCadence,
}

/// Chase task configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChaseConfig {
    /// Sweep color.
    pub color: Rgb,
    /// Tick interval in milliseconds.
    pub tick_ms: u64,
}

impl ChaseConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ChaseError> {
        if self.color == Rgb::OFF {
            return Err(ChaseError::InvalidColor);
        }
        if self.tick_ms == 0 {
            return Err(ChaseError::InvalidCadence);
        }
        Ok(())
    }
}

/// Sweep state. Owned by the animation task and mutated once per tick;
/// `position` is `-1` only before the first tick, afterwards always within
/// `[0, len-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChaseState {
    position: i16,
    direction: Direction,
    color: Rgb,
}

impl ChaseState {
    /// Pre-start state: position sentinel `-1`, sweeping forward.
    pub const fn new(color: Rgb) -> Self {
        Self {
            position: -1,
            direction: Direction::Forward,
            color,
        }
    }

    /// Sweep color.
    pub const fn color(&self) -> Rgb {
        self.color
    }

    /// Current direction.
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Current position; `-1` before the first tick.
    pub const fn position(&self) -> i16 {
        self.position
    }

    /// Advance one step of the reflecting sweep across `len` positions and
    /// return the new position.
    ///
    /// The direction flips on *arrival* at a boundary — at `len-1` going
    /// forward, at `0` going reverse — so each extreme appears exactly once
    /// per traversal and the position sequence is the strict ping-pong
    /// `0, 1, …, len-1, len-2, …, 1, 0, 1, …`.
    #[allow(clippy::arithmetic_side_effects)] // position bounded by [0, len-1] below
    pub fn tick(&mut self, len: u16) -> u16 {
        let last = len.saturating_sub(1) as i16;
        if last == 0 {
            // Single-pixel strip: nowhere to sweep.
            self.position = 0;
            return 0;
        }

        match self.direction {
            Direction::Forward => {
                self.position += 1;
                if self.position >= last {
                    self.position = last;
                    self.direction = Direction::Reverse;
                }
            }
            Direction::Reverse => {
                self.position -= 1;
                if self.position <= 0 {
                    self.position = 0;
                    self.direction = Direction::Forward;
                }
            }
        }
        self.position as u16
    }
}
