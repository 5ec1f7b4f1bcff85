//! WS2812 driver over an SPI bus.
//!
//! # Encoding
//!
//! The strip's single-wire protocol is bit-banged through SPI MOSI at
//! [`WS2812_SPI_HZ`] (3.2 MHz): every WS2812 data bit expands to one 4-bit
//! SPI symbol, so each symbol lasts 1.25 µs and its high time encodes the
//! bit:
//!
//! ```text
//! data 0 → 1000  (high 312 ns)
//! data 1 → 1110  (high 937 ns)
//! ```
//!
//! Both are inside the WS2812B ±150 ns timing windows. Pixels are sent in
//! GRB channel order, MSB first; the frame ends with 120 zero bytes
//! (300 µs of line idle) to latch.
//!
//! The driver stages pixels in an internal buffer; nothing reaches the
//! strip until [`LedStrip::refresh`]. SPI transfer faults surface as
//! [`StripError::Render`] and are the caller's per-tick problem, never
//! fatal.

use embedded_hal_async::spi::SpiBus;

use platform::strip::{LedStrip, Rgb, StripConfig, StripError};

/// SPI clock for the 4-symbols-per-bit encoding.
pub const WS2812_SPI_HZ: u32 = 3_200_000;

/// Largest strip this driver supports.
pub const WS2812_MAX_PIXELS: usize = 64;

/// Encoded bytes per pixel: 3 channels × 8 bits × 4 SPI bits.
const BYTES_PER_PIXEL: usize = 12;

/// Zero bytes appended to hold the line low for the ≥280 µs latch window:
/// 120 bytes at 3.2 MHz is 300 µs.
const RESET_BYTES: usize = 120;

const FRAME_CAPACITY: usize = WS2812_MAX_PIXELS * BYTES_PER_PIXEL + RESET_BYTES;

/// Expand one channel byte into four SPI bytes (two data bits per byte,
/// MSB first).
// Bit arithmetic over fixed-size buffers; indices are bounded by the loop.
#[allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
pub(crate) fn encode_channel(value: u8) -> [u8; 4] {
    const SYMBOLS: [u8; 2] = [0b1000, 0b1110];
    let mut out = [0u8; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let hi = SYMBOLS[usize::from(value >> (7 - 2 * i) & 1)];
        let lo = SYMBOLS[usize::from(value >> (6 - 2 * i) & 1)];
        *slot = hi << 4 | lo;
    }
    out
}

/// WS2812 strip on an SPI bus (MOSI only; SCK and MISO unused by the
/// strip).
pub struct Ws2812Spi<SPI> {
    spi: SPI,
    pixels: [Rgb; WS2812_MAX_PIXELS],
    len: u16,
    frame: [u8; FRAME_CAPACITY],
}

impl<SPI: SpiBus> Ws2812Spi<SPI> {
    /// Driver for a strip of `config.len` pixels on `spi`.
    ///
    /// Fails if the requested length exceeds [`WS2812_MAX_PIXELS`].
    pub fn new(spi: SPI, config: StripConfig) -> Result<Self, StripError> {
        if usize::from(config.len) > WS2812_MAX_PIXELS {
            return Err(StripError::OutOfRange {
                index: config.len,
                len: WS2812_MAX_PIXELS as u16,
            });
        }
        Ok(Self {
            spi,
            pixels: [Rgb::OFF; WS2812_MAX_PIXELS],
            len: config.len,
            frame: [0; FRAME_CAPACITY],
        })
    }

    /// Encode the staged pixels into the frame buffer; returns the number
    /// of bytes to transfer.
    // Frame layout is fixed: len ≤ WS2812_MAX_PIXELS keeps every index in
    // bounds of FRAME_CAPACITY.
    #[allow(clippy::arithmetic_side_effects, clippy::indexing_slicing)]
    fn encode_frame(&mut self) -> usize {
        let mut n = 0;
        for px in &self.pixels[..usize::from(self.len)] {
            // GRB channel order, per the WS2812 datasheet.
            for ch in [px.g, px.r, px.b] {
                self.frame[n..n + 4].copy_from_slice(&encode_channel(ch));
                n += 4;
            }
        }
        self.frame[n..n + RESET_BYTES].fill(0);
        n + RESET_BYTES
    }

    async fn push_frame(&mut self) -> Result<(), StripError> {
        let n = self.encode_frame();
        // Frame slice is within FRAME_CAPACITY by construction.
        #[allow(clippy::indexing_slicing)]
        self.spi
            .write(&self.frame[..n])
            .await
            .map_err(|_| StripError::Render)
    }
}

impl<SPI: SpiBus> LedStrip for Ws2812Spi<SPI> {
    type Error = StripError;

    fn len(&self) -> u16 {
        self.len
    }

    fn set_pixel(&mut self, index: u16, color: Rgb) -> Result<(), Self::Error> {
        if index >= self.len {
            return Err(StripError::OutOfRange {
                index,
                len: self.len,
            });
        }
        // Index < len ≤ WS2812_MAX_PIXELS.
        #[allow(clippy::indexing_slicing)]
        {
            self.pixels[usize::from(index)] = color;
        }
        Ok(())
    }

    async fn refresh(&mut self) -> Result<(), Self::Error> {
        self.push_frame().await
    }

    async fn clear(&mut self) -> Result<(), Self::Error> {
        self.pixels = [Rgb::OFF; WS2812_MAX_PIXELS];
        self.push_frame().await
    }
}
