//! Synthetic test images
//!
//! Deterministic builders for the inputs the regression tests need, so no
//! image files have to be read from disk.

use crate::error::{TestError, TestResult};
use leptonica_core::{Pix, PixColormap, PixMut, PixelDepth, color};

/// Build an image of any depth from a per-pixel function.
///
/// Values are masked to the depth.
pub fn from_fn(
    width: u32,
    height: u32,
    depth: PixelDepth,
    f: impl Fn(u32, u32) -> u32,
) -> TestResult<Pix> {
    let mut pm = PixMut::new(width, height, depth)?;
    for y in 0..height {
        for x in 0..width {
            pm.set_pixel_unchecked(x, y, f(x, y));
        }
    }
    Ok(pm.into())
}

/// Build a 32 bpp RGB image (alpha 255) from a per-pixel function.
pub fn rgb_from_fn(
    width: u32,
    height: u32,
    f: impl Fn(u32, u32) -> (u8, u8, u8),
) -> TestResult<Pix> {
    from_fn(width, height, PixelDepth::Bit32, |x, y| {
        let (r, g, b) = f(x, y);
        color::compose_rgb(r, g, b)
    })
}

/// Horizontal 8 bpp ramp from 0 at the left edge to 255 at the right.
pub fn gray_ramp(width: u32, height: u32) -> TestResult<Pix> {
    let span = width.saturating_sub(1).max(1);
    from_fn(width, height, PixelDepth::Bit8, |x, _| 255 * x / span)
}

/// RGB gradient: red grows left to right, green top to bottom, blue fixed.
pub fn rgb_gradient(width: u32, height: u32) -> TestResult<Pix> {
    let wspan = width.saturating_sub(1).max(1);
    let hspan = height.saturating_sub(1).max(1);
    rgb_from_fn(width, height, |x, y| {
        ((255 * x / wspan) as u8, (255 * y / hspan) as u8, 128)
    })
}

/// 1 bpp checkerboard with square cells of side `cell`; the top-left cell is 0.
pub fn binary_checkerboard(width: u32, height: u32, cell: u32) -> TestResult<Pix> {
    if cell == 0 {
        return Err(TestError::InvalidParams("cell size must be > 0".into()));
    }
    from_fn(width, height, PixelDepth::Bit1, |x, y| ((x / cell) + (y / cell)) & 1)
}

/// RGB image cycling through `colors` in raster order.
///
/// The image contains exactly `min(colors.len(), width * height)` distinct
/// colors when `colors` has no duplicates.
pub fn palette_image(width: u32, height: u32, colors: &[(u8, u8, u8)]) -> TestResult<Pix> {
    if colors.is_empty() {
        return Err(TestError::InvalidParams("palette is empty".into()));
    }
    let n = colors.len();
    rgb_from_fn(width, height, |x, y| {
        colors[(y as usize * width as usize + x as usize) % n]
    })
}

/// Pseudo-random RGB noise from a xorshift generator.
///
/// The same `seed` always gives the same image.
pub fn rgb_noise(width: u32, height: u32, seed: u32) -> TestResult<Pix> {
    let mut state = seed.max(1);
    let mut pm = PixMut::new(width, height, PixelDepth::Bit32)?;
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            pm.set_pixel_unchecked(x, y, state | 0xff);
        }
    }
    Ok(pm.into())
}

/// Colormapped image whose indices cycle through `colors` in raster order.
pub fn colormapped(
    width: u32,
    height: u32,
    depth: PixelDepth,
    colors: &[(u8, u8, u8)],
) -> TestResult<Pix> {
    if colors.is_empty() {
        return Err(TestError::InvalidParams("palette is empty".into()));
    }
    let mut cmap = PixColormap::new(depth.bits())?;
    for &(r, g, b) in colors {
        cmap.add_rgb(r, g, b)?;
    }
    let n = colors.len() as u32;
    let mut pm = from_fn(width, height, depth, |x, y| (y * width + x) % n)?.into_mut();
    pm.set_colormap(Some(cmap))?;
    Ok(pm.into())
}
