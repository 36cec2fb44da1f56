use embedded_hal::delay::DelayNs;

use crate::{errors::Ws2812InitError, timebase::Timebase, timing};

/// Iterations to run when measuring the loop against a tick counter.
const PROBE_ITERS: u32 = 100_000;

/// Cycles one countdown iteration retires in on the simple in-order
/// cores this targets; empirical.
const CYCLES_PER_ITER: u64 = 10;

/// The coarsest loop granularity that can still resolve the shortest
/// protocol phase.
const MAX_NS_PER_ITER: u32 = timing::trimmed_pulse(false).0;

/// A calibrated busy-wait delay.
///
/// Delays are active spinning over a volatile countdown; there is no
/// scheduler to yield to. The divisor translating nanoseconds into
/// iterations is fixed for the life of the program, since the CPU
/// frequency is.
#[derive(Debug)]
pub struct SpinDelay {
    ns_per_iter: u32,
}

impl SpinDelay {
    /// Derives the calibration constant from the CPU clock frequency.
    pub fn from_clock_hz(cpu_hz: u32) -> Result<Self, Ws2812InitError> {
        if cpu_hz == 0 {
            return Err(Ws2812InitError::ClockTooSlow);
        }
        let ns_per_iter = (CYCLES_PER_ITER * 1_000_000_000 / u64::from(cpu_hz)) as u32;
        Self::from_ns_per_iter(ns_per_iter.max(1))
    }

    /// Measures the calibration constant against a tick counter.
    pub fn calibrated<T: Timebase>(timebase: &T) -> Result<Self, Ws2812InitError> {
        let tick_hz = timebase.tick_hz();
        if tick_hz == 0 {
            return Err(Ws2812InitError::ZeroTickRate);
        }

        let start = timebase.now();
        spin(PROBE_ITERS);
        let ticks = timebase.now().wrapping_sub(start);

        let elapsed_ns = u128::from(ticks) * 1_000_000_000 / u128::from(tick_hz);
        let ns_per_iter = (elapsed_ns / u128::from(PROBE_ITERS)) as u32;
        Self::from_ns_per_iter(ns_per_iter.max(1))
    }

    fn from_ns_per_iter(ns_per_iter: u32) -> Result<Self, Ws2812InitError> {
        if ns_per_iter > MAX_NS_PER_ITER {
            return Err(Ws2812InitError::ClockTooSlow);
        }
        log::debug!("Spin delay granularity: {} ns per iteration", ns_per_iter);
        Ok(Self { ns_per_iter })
    }

    /// The loop granularity this delay resolved to, in nanoseconds.
    pub fn ns_per_iteration(&self) -> u32 {
        self.ns_per_iter
    }
}

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        // A zero-iteration wait would fuse adjacent pulse edges.
        let iters = (ns / self.ns_per_iter).max(1);
        spin(iters);
    }
}

/// Counts `iters` down through a volatile slot so the loop survives
/// optimization.
fn spin(iters: u32) {
    let mut count = iters;
    loop {
        let remaining = unsafe { core::ptr::read_volatile(&count) };
        if remaining == 0 {
            break;
        }
        unsafe { core::ptr::write_volatile(&mut count, remaining - 1) };
    }
}
