#![no_std]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod delay;
mod driver;
mod errors;
mod pin;
mod pixel;
mod timebase;

pub mod patterns;
pub mod timing;

pub use delay::SpinDelay;
pub use driver::Ws2812Driver;
pub use errors::Ws2812InitError;
pub use pin::MaskedPin;
pub use pixel::{scale_channel, scale_rgb, Pixel};
pub use timebase::{MmioTickCounter, Timebase};
