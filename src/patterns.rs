//! Animation routines built from whole-strip writes.
//!
//! Each pattern is a pure composition of per-index color math, strip
//! writes and pacing, with no state carried across invocations beyond
//! its own loop counters. Every animation frame latches itself rather
//! than relying on the caller's pacing to exceed the strip's reset
//! threshold.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{driver::Ws2812Driver, pixel::scale_rgb, timebase::Timebase};

/// The hue wheel repeats after this many strip indices.
pub const RAINBOW_PERIOD: u32 = 60;

// Channel ramp per index step within a hue band.
const CSTEP: u32 = 28;

// Attenuation of the background behind a bouncing dot.
const BACKGROUND_SCALE: u8 = 64;

// Brightness of the rainbow animation.
const RAINBOW_SCALE: u8 = 32;

/// Breathes the whole strip: brightness ramps from 30 up to 225 and
/// back down to 31, one latched fill per step. `step_ns` paces the
/// steps and controls the perceived speed.
pub fn pulse<P, D, T, const LEN: usize>(
    strip: &mut Ws2812Driver<P, D, T, LEN>,
    color: [u8; 3],
    step_ns: u64,
) where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    let [r, g, b] = color;
    for scale in 30..=225u8 {
        strip.fill_scaled(r, g, b, scale);
        strip.latch();
        strip.pause_ns(step_ns);
    }
    for scale in (31..=225u8).rev() {
        strip.fill_scaled(r, g, b, scale);
        strip.latch();
        strip.pause_ns(step_ns);
    }
}

/// Bounces a full-brightness dot over an attenuated background, from
/// one end of the strip to the other and back.
pub fn bounce<P, D, T, const LEN: usize>(
    strip: &mut Ws2812Driver<P, D, T, LEN>,
    dot: [u8; 3],
    background: [u8; 3],
    frame_ns: u64,
) where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    for j in 0..LEN {
        dot_frame(strip, &[j], dot, background);
        strip.pause_ns(frame_ns);
    }
    for j in (0..LEN).rev() {
        dot_frame(strip, &[j], dot, background);
        strip.pause_ns(frame_ns);
    }
}

/// Sends two dots from opposite ends of the strip, crossing at the
/// midpoint, then back out again.
pub fn bounce_pair<P, D, T, const LEN: usize>(
    strip: &mut Ws2812Driver<P, D, T, LEN>,
    dot: [u8; 3],
    background: [u8; 3],
    frame_ns: u64,
) where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    for j in 0..LEN / 2 {
        dot_frame(strip, &[j, LEN - 1 - j], dot, background);
        strip.pause_ns(frame_ns);
    }
    for j in (0..LEN / 2).rev() {
        dot_frame(strip, &[j, LEN - 1 - j], dot, background);
        strip.pause_ns(frame_ns);
    }
}

/// One latched frame with `dots` at full brightness over the
/// attenuated background. Full scale passes a color through
/// [`scale_rgb`] unchanged, so the dot color is used as-is.
fn dot_frame<P, D, T, const LEN: usize>(
    strip: &mut Ws2812Driver<P, D, T, LEN>,
    dots: &[usize],
    dot: [u8; 3],
    background: [u8; 3],
) where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    let bg = scale_rgb(
        background[0],
        background[1],
        background[2],
        BACKGROUND_SCALE,
    );
    let frame = (0..LEN).map(|k| if dots.contains(&k) { dot } else { bg });
    strip.write(frame, true);
}

/// Cycles a rainbow across the strip: two passes shifting forward, two
/// shifting backward, one hue step per frame.
pub fn rainbow<P, D, T, const LEN: usize>(strip: &mut Ws2812Driver<P, D, T, LEN>, frame_ns: u64)
where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    for _ in 0..2 {
        for offset in 0..RAINBOW_PERIOD {
            rainbow_frame(strip, offset, false);
            strip.pause_ns(frame_ns);
        }
    }
    for _ in 0..2 {
        for offset in 0..RAINBOW_PERIOD {
            rainbow_frame(strip, offset, true);
            strip.pause_ns(frame_ns);
        }
    }
}

fn rainbow_frame<P, D, T, const LEN: usize>(
    strip: &mut Ws2812Driver<P, D, T, LEN>,
    offset: u32,
    reversed: bool,
) where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    let color = |k: usize| {
        let [r, g, b] = rainbow_color(offset + k as u32);
        scale_rgb(r, g, b, RAINBOW_SCALE)
    };
    if reversed {
        strip.write((0..LEN).rev().map(color), true);
    } else {
        strip.write((0..LEN).map(color), true);
    }
}

/// Maps a strip index onto a six-band hue wheel
/// (red, yellow, green, cyan, blue, magenta and back to red).
///
/// Within each 10-index band one channel ramps linearly while the
/// others hold, so adjacent indices never differ by more than the ramp
/// step. Periodic with [`RAINBOW_PERIOD`].
pub fn rainbow_color(index: u32) -> [u8; 3] {
    let idx = index % RAINBOW_PERIOD;
    let up = |i: u32| (i * CSTEP).min(255) as u8;
    let down = |i: u32| 255u32.saturating_sub(i * CSTEP) as u8;
    match idx / 10 {
        0 => [255, up(idx), 0],
        1 => [down(idx - 10), 255, 0],
        2 => [0, 255, up(idx - 20)],
        3 => [0, down(idx - 30), 255],
        4 => [up(idx - 40), 0, 255],
        _ => [255, 0, down(idx - 50)],
    }
}

/// The demo show: a white flash, four breathing pulses, two dual-dot
/// sweeps and two rainbow runs, drifting the base color a little each
/// cycle. Runs forever.
pub fn light_show<P, D, T, const LEN: usize>(strip: &mut Ws2812Driver<P, D, T, LEN>) -> !
where
    P: OutputPin,
    D: DelayNs,
    T: Timebase,
{
    let mut r: u8 = 128;
    let mut g: u8 = 128;
    let mut b: u8 = 128;

    loop {
        strip.fill(255, 255, 255, true);
        strip.clear(true);

        let bg = [r.wrapping_add(64), g.wrapping_sub(128), b.wrapping_sub(64)];
        let dot = [r.wrapping_sub(64), g, b.wrapping_add(64)];

        for i in 0..4 {
            log::info!("Pulse: {}", i);
            pulse(strip, bg, 100_000);
        }

        for _ in 0..2 {
            bounce_pair(strip, dot, bg, 25_000_000);
        }

        r = r.wrapping_add(8);
        g = g.wrapping_sub(8);
        b = b.wrapping_add(16);

        for _ in 0..2 {
            rainbow(strip, 15_000_000);
        }
    }
}
