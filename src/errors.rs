use snafu::prelude::*;

/// Errors of driver, pin and delay construction.
#[derive(Debug, Snafu)]
pub enum Ws2812InitError {
    /// The data-line bit does not fit a 32-bit output register.
    PinBitOutOfRange,
    /// The CPU clock is too slow for the spin loop to resolve the shortest protocol pulse.
    ClockTooSlow,
    /// The tick counter reports a rate of zero.
    ZeroTickRate,
    /// The strip must contain at least one pixel.
    EmptyStrip,
}
