//! HTU21D temperature/humidity sensor driver
//!
//! I²C driver using hold-master measurements (the sensor stretches the
//! clock during conversion, so no polling or fixed delays are needed).

pub mod registers;

mod driver;

pub use driver::{Htu21d, Htu21dError};
