//! Shared test infrastructure: a simulated data line, delay and tick
//! counter over one virtual clock, plus a decoder that turns recorded
//! edges back into bits, bytes and pixels.

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use ws2812_bitbang::{timing, Timebase, Ws2812Driver};

/// Tick rate at which one tick is one nanosecond.
pub const GHZ: u64 = 1_000_000_000;

/// Modeled cost of one tick-counter read, so polling loops advance the
/// virtual clock and terminate.
const POLL_COST_NS: u64 = 50;

/// One recorded level change on the simulated data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub at_ns: u64,
    pub high: bool,
}

#[derive(Default)]
struct BusState {
    now_ns: Cell<u64>,
    level: Cell<bool>,
    edges: RefCell<Vec<Edge>>,
}

/// Handle onto the simulated line and clock shared by the mock parts.
#[derive(Clone, Default)]
pub struct SimBus(Rc<BusState>);

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self) -> SimPin {
        SimPin(self.0.clone())
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(self.0.clone())
    }

    pub fn timebase(&self, tick_hz: u64) -> SimTimebase {
        SimTimebase {
            bus: self.0.clone(),
            tick_hz,
        }
    }

    pub fn now_ns(&self) -> u64 {
        self.0.now_ns.get()
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.0.edges.borrow().clone()
    }
}

/// Records level transitions with virtual timestamps.
pub struct SimPin(Rc<BusState>);

impl SimPin {
    fn set_level(&mut self, high: bool) {
        if self.0.level.get() != high {
            self.0.level.set(high);
            self.0.edges.borrow_mut().push(Edge {
                at_ns: self.0.now_ns.get(),
                high,
            });
        }
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.set_level(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.set_level(true);
        Ok(())
    }
}

/// Advances the virtual clock by exactly the requested delay.
pub struct SimDelay(Rc<BusState>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let now = self.0.now_ns.get();
        self.0.now_ns.set(now + u64::from(ns));
    }
}

/// A tick counter over the virtual clock. Each read costs a little
/// virtual time, like a real memory-mapped counter access would.
pub struct SimTimebase {
    bus: Rc<BusState>,
    tick_hz: u64,
}

impl Timebase for SimTimebase {
    fn tick_hz(&self) -> u64 {
        self.tick_hz
    }

    fn now(&self) -> u64 {
        let now = self.bus.now_ns.get() + POLL_COST_NS;
        self.bus.now_ns.set(now);
        (u128::from(now) * u128::from(self.tick_hz) / 1_000_000_000) as u64
    }
}

/// A driver over the simulated parts, ticking at [`GHZ`].
pub fn make_strip<const LEN: usize>(bus: &SimBus) -> Ws2812Driver<SimPin, SimDelay, SimTimebase, LEN> {
    Ws2812Driver::new(bus.pin(), bus.delay(), bus.timebase(GHZ)).unwrap()
}

/// Decodes the recorded edges into frames of bits. Pulses are bucketed
/// with [`timing::classify_pulse`]; a low period of at least
/// [`timing::RES`] ends a frame.
pub fn decode_bit_frames(bus: &SimBus) -> Vec<Vec<bool>> {
    let edges = bus.edges();
    let end_ns = bus.now_ns();
    assert_eq!(edges.len() % 2, 0, "line must end low");

    let mut frames = Vec::new();
    let mut bits = Vec::new();
    let mut i = 0;
    while i + 1 < edges.len() {
        let rise = edges[i];
        let fall = edges[i + 1];
        assert!(rise.high && !fall.high, "edges must alternate");

        let high = (fall.at_ns - rise.at_ns) as u32;
        let low_until = edges.get(i + 2).map_or(end_ns, |e| e.at_ns);
        let low = low_until - fall.at_ns;

        let bit = timing::classify_pulse(high, low.min(u64::from(u32::MAX)) as u32)
            .unwrap_or_else(|| panic!("unclassifiable pulse: {}ns high / {}ns low", high, low));
        bits.push(bit);

        if low >= u64::from(timing::RES) {
            frames.push(std::mem::take(&mut bits));
        }
        i += 2;
    }
    if !bits.is_empty() {
        frames.push(bits);
    }
    frames
}

/// Decodes the recorded edges into frames of wire bytes (GRB order).
pub fn decode_byte_frames(bus: &SimBus) -> Vec<Vec<u8>> {
    decode_bit_frames(bus)
        .iter()
        .map(|bits| bits_to_bytes(bits))
        .collect()
}

/// Decodes the recorded edges into frames of (r, g, b) pixels.
pub fn decode_pixel_frames(bus: &SimBus) -> Vec<Vec<[u8; 3]>> {
    decode_byte_frames(bus)
        .iter()
        .map(|bytes| frame_pixels(bytes))
        .collect()
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    assert_eq!(bits.len() % 8, 0, "frame is not byte aligned");
    bits.chunks(8)
        .map(|byte| byte.iter().fold(0u8, |acc, &bit| acc << 1 | u8::from(bit)))
        .collect()
}

/// Regroups a frame's wire bytes into (r, g, b) pixels.
pub fn frame_pixels(wire_bytes: &[u8]) -> Vec<[u8; 3]> {
    assert_eq!(wire_bytes.len() % 3, 0, "frame is not pixel aligned");
    wire_bytes
        .chunks(3)
        .map(|grb| [grb[1], grb[0], grb[2]])
        .collect()
}

/// The low gap in front of the line's final idle period, i.e. from the
/// last falling edge to the current virtual time.
pub fn trailing_low_ns(bus: &SimBus) -> u64 {
    let edges = bus.edges();
    let last = edges.last().expect("no edges recorded");
    assert!(!last.high, "line must end low");
    bus.now_ns() - last.at_ns
}
