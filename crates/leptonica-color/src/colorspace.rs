//! Image-level RGB <-> HSV conversion
//!
//! Hue, saturation and value are stored in the red, green and blue bytes of
//! each 32-bit pixel. Colormapped images are converted by transforming only
//! the colormap. The pixel math lives in [`leptonica_core::color`].
//!
//! # See also
//!
//! C Leptonica: `pixConvertRGBToHSV()`, `pixConvertHSVToRGB()`

use crate::{ColorError, ColorResult};
use leptonica_core::color::{self, HUE_RANGE, Hsv};
use leptonica_core::{Pix, PixMut, PixelDepth};

fn check_rgb_or_cmapped(has_colormap: bool, depth: PixelDepth) -> ColorResult<()> {
    if !has_colormap && depth != PixelDepth::Bit32 {
        return Err(ColorError::UnsupportedDepth {
            expected: "32 bpp or colormapped",
            actual: depth.bits(),
        });
    }
    Ok(())
}

/// Convert an RGB image (or its colormap) to HSV.
///
/// # See also
///
/// C Leptonica: `pixConvertRGBToHSV()` in `pixconv.c`
pub fn pix_convert_rgb_to_hsv(pix: &Pix) -> ColorResult<Pix> {
    check_rgb_or_cmapped(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    pix_convert_rgb_to_hsv_in_place(&mut pm)?;
    Ok(pm.into())
}

/// Convert an RGB image (or its colormap) to HSV in place.
///
/// The alpha byte of each pixel is left unchanged.
pub fn pix_convert_rgb_to_hsv_in_place(pix: &mut PixMut) -> ColorResult<()> {
    check_rgb_or_cmapped(pix.has_colormap(), pix.depth())?;
    if let Some(cmap) = pix.colormap_mut() {
        cmap.convert_rgb_to_hsv();
        return Ok(());
    }

    for word in pix.data_mut() {
        let (r, g, b, a) = color::extract_rgba(*word);
        let hsv = color::rgb_to_hsv(r, g, b);
        *word = color::compose_rgba(hsv.h as u8, hsv.s as u8, hsv.v as u8, a);
    }
    Ok(())
}

/// Convert an HSV image (or its colormap) back to RGB.
///
/// # Errors
///
/// Returns [`ColorError::Core`] with an invalid-parameter error if a
/// saturated pixel has a hue above 240.
///
/// # See also
///
/// C Leptonica: `pixConvertHSVToRGB()` in `pixconv.c`
pub fn pix_convert_hsv_to_rgb(pix: &Pix) -> ColorResult<Pix> {
    check_rgb_or_cmapped(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    pix_convert_hsv_to_rgb_in_place(&mut pm)?;
    Ok(pm.into())
}

/// Convert an HSV image (or its colormap) back to RGB in place.
///
/// The image is validated before any pixel is written, so on error it is
/// left unchanged.
pub fn pix_convert_hsv_to_rgb_in_place(pix: &mut PixMut) -> ColorResult<()> {
    check_rgb_or_cmapped(pix.has_colormap(), pix.depth())?;
    if let Some(cmap) = pix.colormap_mut() {
        cmap.convert_hsv_to_rgb()?;
        return Ok(());
    }

    let hsv_of = |word: u32| {
        let (h, s, v) = color::extract_rgb(word);
        Hsv {
            h: h as i32,
            s: s as i32,
            v: v as i32,
        }
    };
    if let Some(bad) = pix
        .data()
        .iter()
        .map(|&w| hsv_of(w))
        .find(|hsv| hsv.s != 0 && hsv.h > HUE_RANGE)
    {
        return Err(ColorError::InvalidParameters(format!(
            "hue {} out of range [0, {HUE_RANGE}]",
            bad.h
        )));
    }

    for word in pix.data_mut() {
        let (r, g, b) = color::hsv_to_rgb(hsv_of(*word))?;
        *word = color::compose_rgba(r, g, b, color::alpha(*word));
    }
    Ok(())
}
