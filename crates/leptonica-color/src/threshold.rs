//! Requantization of gray images to fewer levels
//!
//! - Fixed threshold binarization
//! - Thresholding 8 bpp to 1, 2, 4 or 8 bpp with equally spaced levels,
//!   optionally with a gray colormap
//!
//! Each pixel is treated independently; this is not dithering.
//!
//! # See also
//!
//! C Leptonica: `pixThreshold8()` in `pixconv.c`, `grayquant.c`

use crate::{ColorError, ColorResult};
use leptonica_core::pix::{get_data_byte, get_data_qbit, set_data_bit_val};
use leptonica_core::{Pix, PixColormap, PixMut, PixelDepth};

/// Convert a 4 or 8 bpp gray image to binary.
///
/// Pixels with a value below `thresh` become 1 (foreground); all others
/// become 0.
///
/// # Errors
///
/// Returns an error if the image is not 4 or 8 bpp, is colormapped, or if
/// `thresh` exceeds the number of gray levels.
///
/// # See also
///
/// C Leptonica: `pixThresholdToBinary()` in `grayquant.c`
pub fn threshold_to_binary(pix: &Pix, thresh: u32) -> ColorResult<Pix> {
    let depth = pix.depth();
    if !matches!(depth, PixelDepth::Bit4 | PixelDepth::Bit8) || pix.has_colormap() {
        return Err(ColorError::UnsupportedDepth {
            expected: "4 or 8 bpp without colormap",
            actual: depth.bits(),
        });
    }
    if thresh > depth.max_value() + 1 {
        return Err(ColorError::InvalidParameters(format!(
            "threshold {thresh} out of range for {} bpp",
            depth.bits()
        )));
    }

    let mut pm = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit1)?;
    pm.copy_resolution_from(pix);
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let dst = pm.row_data_mut(y);
        for x in 0..pix.width() {
            let v = if depth == PixelDepth::Bit8 {
                get_data_byte(src, x)
            } else {
                get_data_qbit(src, x)
            };
            if v < thresh {
                set_data_bit_val(dst, x);
            }
        }
    }
    Ok(pm.into())
}

/// Map each 8-bit value to the nearest of `nlevels` equally spaced levels.
///
/// Level `j` covers values up to `255 * (2j + 1) / (2 * (nlevels - 1))`.
fn gray_quant_index_table(nlevels: u32) -> [u8; 256] {
    core::array::from_fn(|i| {
        (0..nlevels)
            .find(|&j| i as u32 <= 255 * (2 * j + 1) / (2 * nlevels - 2))
            .unwrap_or(nlevels - 1) as u8
    })
}

fn check_levels(nlevels: u32, max: u32) -> ColorResult<()> {
    if !(2..=max).contains(&nlevels) {
        return Err(ColorError::InvalidParameters(format!(
            "nlevels {nlevels} not in [2, {max}]"
        )));
    }
    Ok(())
}

/// Requantize an 8 bpp gray image to `depth` bits per pixel.
///
/// - `depth` 1: threshold at 128. With `with_colormap` the bits are
///   flipped so that index 0 is black and index 1 is white in a
///   two-entry colormap.
/// - `depth` 2 or 4: without a colormap the most significant bits of each
///   value are kept and `nlevels` is ignored. With a colormap each pixel
///   becomes the index of the nearest of `nlevels` equally spaced grays.
/// - `depth` 8: each value is replaced by the nearest of `nlevels` equally
///   spaced grays, or by its index in a colormap of those grays.
///
/// # See also
///
/// C Leptonica: `pixThreshold8()` in `pixconv.c`
pub fn threshold_8(pix: &Pix, depth: u32, nlevels: u32, with_colormap: bool) -> ColorResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 || pix.has_colormap() {
        return Err(ColorError::UnsupportedDepth {
            expected: "8 bpp without colormap",
            actual: pix.depth().bits(),
        });
    }
    if with_colormap && nlevels < 2 {
        return Err(ColorError::InvalidParameters(
            "nlevels must be at least 2 with a colormap".into(),
        ));
    }

    let out_depth = match depth {
        1 => {
            let binary = threshold_to_binary(pix, 128)?;
            if !with_colormap {
                return Ok(binary);
            }
            let mut pm = binary.into_mut();
            pm.invert();
            let mut cmap = PixColormap::new(1)?;
            cmap.add_rgb(0, 0, 0)?;
            cmap.add_rgb(255, 255, 255)?;
            pm.set_colormap(Some(cmap))?;
            return Ok(pm.into());
        }
        2 => PixelDepth::Bit2,
        4 => PixelDepth::Bit4,
        8 => PixelDepth::Bit8,
        _ => {
            return Err(ColorError::InvalidParameters(format!(
                "depth {depth} not in {{1, 2, 4, 8}}"
            )));
        }
    };

    let max_levels = out_depth.max_value() + 1;
    let tab: [u32; 256] = if with_colormap || out_depth == PixelDepth::Bit8 {
        check_levels(nlevels, max_levels)?;
        let index = gray_quant_index_table(nlevels);
        if with_colormap {
            core::array::from_fn(|v| index[v] as u32)
        } else {
            core::array::from_fn(|v| 255 * index[v] as u32 / (nlevels - 1))
        }
    } else {
        let shift = 8 - depth;
        core::array::from_fn(|v| (v as u32) >> shift)
    };

    let mut pm = PixMut::new(pix.width(), pix.height(), out_depth)?;
    pm.copy_resolution_from(pix);
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        for x in 0..pix.width() {
            pm.set_pixel_unchecked(x, y, tab[get_data_byte(src, x) as usize]);
        }
    }
    if with_colormap {
        pm.set_colormap(Some(PixColormap::create_linear(depth, nlevels)?))?;
    }
    Ok(pm.into())
}
