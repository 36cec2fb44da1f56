use core::convert::Infallible;
use core::ptr;

use embedded_hal::digital::{ErrorType, OutputPin};

use crate::errors::Ws2812InitError;

/// A GPIO output driven through two precomputed register images.
///
/// Each toggle stores a full register value, so the two images must
/// differ in exactly the strip's data bit and agree everywhere else.
/// They are captured once at construction; deriving them per pulse
/// would add timing jitter.
pub struct MaskedPin {
    reg: *mut u32,
    on: u32,
    off: u32,
}

impl MaskedPin {
    /// Captures the on/off images for `bit` of the output-value
    /// register at `reg`, relative to its current contents.
    ///
    /// # Safety
    ///
    /// `reg` must point at a mapped, writable GPIO output-value
    /// register, the pin must already be configured for output, and no
    /// other code may write the register while this object exists.
    pub unsafe fn new(reg: *mut u32, bit: u32) -> Result<Self, Ws2812InitError> {
        if bit >= 32 {
            return Err(Ws2812InitError::PinBitOutOfRange);
        }
        let mask = 1u32 << bit;
        let on = ptr::read_volatile(reg) | mask;
        let off = on & !mask;
        log::debug!(
            "Data line on bit {}: on {:#010x}, off {:#010x}",
            bit,
            on,
            off
        );
        Ok(Self { reg, on, off })
    }
}

impl ErrorType for MaskedPin {
    type Error = Infallible;
}

impl OutputPin for MaskedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        unsafe { ptr::write_volatile(self.reg, self.off) };
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        unsafe { ptr::write_volatile(self.reg, self.on) };
        Ok(())
    }
}
