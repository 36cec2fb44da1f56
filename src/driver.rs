use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    errors::Ws2812InitError,
    pixel::{scale_rgb, Pixel},
    timebase::Timebase,
    timing,
};

/// A WS2812 Neopixel LED strip driver that bit-bangs the protocol over
/// a single GPIO line.
///
/// `LEN` is the number of pixels on the strip. The strip has no
/// out-of-band position marker; a pixel's position is purely "Nth pixel
/// since the last latch", so exactly `LEN` pixels must go out between
/// latches. [`write`](Self::write) makes that structural by padding or
/// truncating its input.
pub struct Ws2812Driver<P, D, T, const LEN: usize> {
    pin: P,
    delay: D,
    timebase: T,
    latch_ticks: u64,
}

impl<P, D, T, const LEN: usize> Ws2812Driver<P, D, T, LEN>
where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    /// Initializes the driver and parks the data line low.
    pub fn new(mut pin: P, delay: D, timebase: T) -> Result<Self, Ws2812InitError> {
        if LEN == 0 {
            return Err(Ws2812InitError::EmptyStrip);
        }

        let tick_hz = timebase.tick_hz();
        if tick_hz == 0 {
            return Err(Ws2812InitError::ZeroTickRate);
        }
        let latch_ticks = timebase.ticks_for_ns(u64::from(timing::RES));

        log::debug!("Initializing WS2812 bit-bang driver.");
        log::debug!("    Strip length: {} pixels", LEN);
        log::debug!("    Tick rate: {} Hz", tick_hz);
        log::debug!("    Latch hold: {} ticks", latch_ticks);

        pin.set_low().ok();

        Ok(Self {
            pin,
            delay,
            timebase,
            latch_ticks,
        })
    }

    /// Emits a single bit as one high/low pulse pair.
    pub fn send_bit(&mut self, bit: bool) {
        let (high_ns, low_ns) = timing::trimmed_pulse(bit);
        self.pin.set_high().ok();
        self.delay.delay_ns(high_ns);
        self.pin.set_low().ok();
        self.delay.delay_ns(low_ns);
    }

    /// Emits a byte, most significant bit first.
    pub fn send_byte(&mut self, mut byte: u8) {
        for _ in 0..8 {
            self.send_bit(byte & 0x80 != 0);
            byte <<= 1;
        }
    }

    /// Emits one pixel. The strip shifts channels in green, red, blue
    /// order; arguments are plain RGB.
    pub fn send_pixel(&mut self, r: u8, g: u8, b: u8) {
        self.send_byte(g);
        self.send_byte(r);
        self.send_byte(b);
    }

    /// Emits one pixel attenuated by `scale`; see [`scale_rgb`].
    pub fn send_pixel_scaled(&mut self, r: u8, g: u8, b: u8, scale: u8) {
        let [r, g, b] = scale_rgb(r, g, b, scale);
        self.send_pixel(r, g, b);
    }

    /// Holds the line low long enough for the strip to commit the
    /// shifted-in colors to the LEDs.
    ///
    /// Must follow the last pixel of a frame. Without it the next pixel
    /// continues the current frame instead of starting a new one.
    pub fn latch(&mut self) {
        self.pin.set_low().ok();
        self.timebase.wait_ticks(self.latch_ticks);
    }

    /// Writes one frame of pixels, then latches iff `show`.
    ///
    /// Exactly `LEN` pixels are emitted: shorter inputs are padded with
    /// black, longer inputs are truncated. The frame goes out inside a
    /// critical section so an interrupt cannot stretch a pulse
    /// mid-frame.
    pub fn write<I>(&mut self, pixels: I, show: bool)
    where
        I: IntoIterator,
        I::Item: Pixel,
    {
        let mut pixels = pixels.into_iter();
        critical_section::with(|_| {
            for _ in 0..LEN {
                let [g, r, b] = pixels.next().map(|p| p.grb_bytes()).unwrap_or([0, 0, 0]);
                self.send_byte(g);
                self.send_byte(r);
                self.send_byte(b);
            }
        });
        if show {
            self.latch();
        }
    }

    /// Sets the whole strip to one color, latching iff `show`.
    pub fn fill(&mut self, r: u8, g: u8, b: u8, show: bool) {
        critical_section::with(|_| {
            for _ in 0..LEN {
                self.send_pixel(r, g, b);
            }
        });
        if show {
            self.latch();
        }
    }

    /// Sets the whole strip to one attenuated color, never latching, so
    /// a caller can compose several partial fills into one frame.
    pub fn fill_scaled(&mut self, r: u8, g: u8, b: u8, scale: u8) {
        let [r, g, b] = scale_rgb(r, g, b, scale);
        critical_section::with(|_| {
            for _ in 0..LEN {
                self.send_pixel(r, g, b);
            }
        });
    }

    /// Turns the whole strip off.
    pub fn clear(&mut self, show: bool) {
        self.fill(0, 0, 0, show);
    }

    /// Polls the tick counter for at least `ns` nanoseconds.
    ///
    /// For inter-frame pacing, not for protocol pulses; granularity is
    /// the tick period, always rounded up.
    pub fn pause_ns(&mut self, ns: u64) {
        let ticks = self.timebase.ticks_for_ns(ns);
        self.timebase.wait_ticks(ticks);
    }
}
