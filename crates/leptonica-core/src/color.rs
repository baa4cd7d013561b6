//! Color channel indices and helper functions for 32-bit RGBA pixels.
//!
//! # Pixel format
//!
//! 32-bit pixels are stored as `0xRRGGBBAA` (red in MSB, alpha in LSB).
//! HSV images reuse the same lanes: hue in the red byte, saturation in the
//! green byte and value in the blue byte.
//!
//! # See also
//!
//! C Leptonica: color component macros in `pix.h`, `colorspace.c`

use crate::error::{Error, Result};

/// Red channel (MSB, byte 0)
pub const RED: usize = 0;
/// Green channel (byte 1)
pub const GREEN: usize = 1;
/// Blue channel (byte 2)
pub const BLUE: usize = 2;
/// Alpha channel (LSB, byte 3)
pub const ALPHA: usize = 3;

/// Shift amounts for extracting color channels
pub const RED_SHIFT: u32 = 24;
pub const GREEN_SHIFT: u32 = 16;
pub const BLUE_SHIFT: u32 = 8;
pub const ALPHA_SHIFT: u32 = 0;

/// Number of hue steps in a full turn.
pub const HUE_RANGE: i32 = 240;

/// Extract red component from a 32-bit pixel.
#[inline]
pub fn red(pixel: u32) -> u8 {
    ((pixel >> RED_SHIFT) & 0xff) as u8
}

/// Extract green component from a 32-bit pixel.
#[inline]
pub fn green(pixel: u32) -> u8 {
    ((pixel >> GREEN_SHIFT) & 0xff) as u8
}

/// Extract blue component from a 32-bit pixel.
#[inline]
pub fn blue(pixel: u32) -> u8 {
    ((pixel >> BLUE_SHIFT) & 0xff) as u8
}

/// Extract alpha component from a 32-bit pixel.
#[inline]
pub fn alpha(pixel: u32) -> u8 {
    ((pixel >> ALPHA_SHIFT) & 0xff) as u8
}

/// Compose a 32-bit RGB pixel (alpha = 255).
#[inline]
pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
    compose_rgba(r, g, b, 255)
}

/// Compose a 32-bit RGBA pixel.
#[inline]
pub fn compose_rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << RED_SHIFT)
        | ((g as u32) << GREEN_SHIFT)
        | ((b as u32) << BLUE_SHIFT)
        | ((a as u32) << ALPHA_SHIFT)
}

/// Extract RGB values from a 32-bit pixel.
#[inline]
pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
    (red(pixel), green(pixel), blue(pixel))
}

/// Extract RGBA values from a 32-bit pixel.
#[inline]
pub fn extract_rgba(pixel: u32) -> (u8, u8, u8, u8) {
    (red(pixel), green(pixel), blue(pixel), alpha(pixel))
}

/// HSV color values.
///
/// Ranges: h [0..239], s [0..255], v [0..255].
/// Hue wraps: h=0 and h=240 are equivalent.
///
/// Hue correspondence:
/// - 0: red
/// - 40: yellow
/// - 80: green
/// - 120: cyan
/// - 160: blue
/// - 200: magenta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: i32,
    pub s: i32,
    pub v: i32,
}

/// Convert RGB to HSV color space.
///
/// `v` is the maximum component; for a gray (r = g = b) `h` and `s` are 0.
/// `s = 255 * (max - min) / max`, rounded. The hue is measured in sixths of
/// the 240-step circle relative to the dominant channel and rounded; a
/// rounded hue of 240 wraps to 0, so the result is always in `[0, 240)`.
///
/// # See also
///
/// C Leptonica: `convertRGBToHSV()` in `colorspace.c`
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let ri = r as i32;
    let gi = g as i32;
    let bi = b as i32;

    let min = ri.min(gi).min(bi);
    let max = ri.max(gi).max(bi);
    let delta = max - min;

    let v = max;
    if delta == 0 {
        return Hsv { h: 0, s: 0, v };
    }

    let s = (255.0 * delta as f32 / max as f32 + 0.5) as i32;
    let h_raw = if ri == max {
        (gi - bi) as f32 / delta as f32
    } else if gi == max {
        2.0 + (bi - ri) as f32 / delta as f32
    } else {
        4.0 + (ri - gi) as f32 / delta as f32
    };

    let mut h = h_raw * 40.0;
    if h < 0.0 {
        h += HUE_RANGE as f32;
    }
    let mut h = (h + 0.5) as i32;
    if h >= HUE_RANGE {
        h = 0;
    }

    Hsv { h, s, v }
}

/// Convert HSV to RGB color space.
///
/// A hue of 240 is accepted and treated as 0.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `h` is outside `[0, 240]` for a
/// saturated color.
///
/// # See also
///
/// C Leptonica: `convertHSVToRGB()` in `colorspace.c`
pub fn hsv_to_rgb(hsv: Hsv) -> Result<(u8, u8, u8)> {
    let Hsv {
        mut h,
        s: sval,
        v: vval,
    } = hsv;

    if sval == 0 {
        let v = vval.clamp(0, 255) as u8;
        return Ok((v, v, v));
    }

    if !(0..=HUE_RANGE).contains(&h) {
        return Err(Error::InvalidParameter(format!(
            "invalid hue {h}; must be in [0, {HUE_RANGE}]"
        )));
    }
    if h == HUE_RANGE {
        h = 0;
    }
    let hf = h as f32 / 40.0;
    let i = hf as i32;
    let f = hf - i as f32;
    let s = sval as f32 / 255.0;
    let x = (vval as f32 * (1.0 - s) + 0.5) as i32;
    let y = (vval as f32 * (1.0 - s * f) + 0.5) as i32;
    let z = (vval as f32 * (1.0 - s * (1.0 - f)) + 0.5) as i32;

    let (r, g, b) = match i {
        0 => (vval, z, x),
        1 => (y, vval, x),
        2 => (x, vval, z),
        3 => (x, y, vval),
        4 => (z, x, vval),
        _ => (vval, x, y),
    };

    let clip = |c: i32| c.clamp(0, 255) as u8;
    Ok((clip(r), clip(g), clip(b)))
}
