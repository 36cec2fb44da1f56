/// A pixel that can be rendered with this library.
pub trait Pixel {
    /// Return the raw bytes in the order they go onto the wire.
    ///
    /// IMPORTANT: Be aware that WS2812 strips are GRB encoded.
    fn grb_bytes(self) -> [u8; 3];
}

/// Raw RGB data.
impl Pixel for [u8; 3] {
    fn grb_bytes(self) -> [u8; 3] {
        // Neopixel strips want GRB data
        [self[1], self[0], self[2]]
    }
}

/// 8-bit Linear sRGB, which is the color space
/// most NeoPixel strips are in.
///
/// Be aware that this differs from normal,
/// gamma-corrected sRGB. A conversion has to take place.
///
/// More info can be found in the documentation of the
/// [palette] crate.
impl Pixel for palette::LinSrgb<u8> {
    fn grb_bytes(self) -> [u8; 3] {
        [self.green, self.red, self.blue]
    }
}

impl<'a, P> Pixel for &'a P
where
    P: Pixel + Clone,
{
    fn grb_bytes(self) -> [u8; 3] {
        self.clone().grb_bytes()
    }
}

/// Applies a brightness scale (0-255) to one channel.
///
/// A channel that was lit never scales down to fully off; the result
/// is clamped to 1 so dim colors keep their hue.
pub fn scale_channel(value: u8, scale: u8) -> u8 {
    if scale == 0 {
        return 0;
    }
    let scaled = (u16::from(value) * u16::from(scale) / 255) as u8;
    if scaled == 0 && value > 0 {
        1
    } else {
        scaled
    }
}

/// Applies a brightness scale (0-255) to a color.
///
/// A scale of 0 yields pure black; a scale of 255 leaves the color
/// unchanged.
pub fn scale_rgb(r: u8, g: u8, b: u8, scale: u8) -> [u8; 3] {
    if scale == 0 {
        return [0, 0, 0];
    }
    [
        scale_channel(r, scale),
        scale_channel(g, scale),
        scale_channel(b, scale),
    ]
}
