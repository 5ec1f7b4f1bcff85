//! Addressable LED strip abstraction
//!
//! Mirrors the three-call surface of typical WS2812-class strip drivers:
//! stage pixels into a framebuffer with [`set_pixel`], push the frame with
//! [`refresh`], blank with [`clear`]. The strip hardware is exclusively
//! owned by whichever task drives it.
//!
//! [`set_pixel`]: LedStrip::set_pixel
//! [`refresh`]: LedStrip::refresh
//! [`clear`]: LedStrip::clear

use crate::gpio::PinId;
use thiserror_no_std::Error;

/// 8-bit-per-channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rgb {
    /// Red channel, 0 (off) to 255 (full)
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const OFF: Self = Self::new(0, 0, 0);

    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Strip creation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StripConfig {
    /// Data pin the strip is wired to.
    pub data_pin: PinId,
    /// Number of addressable pixels.
    pub len: u16,
}

/// LED strip errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StripError {
    /// Pushing the frame to the strip failed (bus fault, timing overrun).
    #[error("strip refresh failed")]
    Render,
    /// Pixel index beyond the configured strip length.
    #[error("pixel index {index} out of range for strip of {len}")]
    OutOfRange {
        /// Requested pixel index.
        index: u16,
        /// Configured strip length.
        len: u16,
    },
}

/// Addressable LED strip driver.
pub trait LedStrip {
    /// Error type
    type Error: core::fmt::Debug;

    /// Number of addressable pixels.
    fn len(&self) -> u16;

    /// `true` if the strip has no pixels.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stage `color` for the pixel at `index`. Takes effect at the next
    /// [`refresh`](LedStrip::refresh).
    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error>;

    /// Push the staged frame to the strip.
    async fn refresh(&mut self) -> Result<(), Self::Error>;

    /// Blank every pixel and push the blank frame.
    async fn clear(&mut self) -> Result<(), Self::Error>;
}
