//! Addressable LED strip backend.
//!
//! WS2812-class strips are driven over a plain SPI MOSI line: each data bit
//! becomes a 4-bit SPI symbol whose high time encodes the bit value. The
//! encoding lives in `ws2812` alongside the driver.

mod ws2812;

pub use ws2812::{Ws2812Spi, WS2812_MAX_PIXELS, WS2812_SPI_HZ};

/// Concrete strip type wired on the bench: WS2812 on SPI1 MOSI with DMA.
#[cfg(feature = "hardware")]
pub type BenchStrip = Ws2812Spi<
    embassy_stm32::spi::Spi<
        'static,
        embassy_stm32::peripherals::SPI1,
        embassy_stm32::peripherals::DMA1_CH0,
        embassy_stm32::peripherals::DMA1_CH1,
    >,
>;
