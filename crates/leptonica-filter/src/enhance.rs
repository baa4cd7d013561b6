//! Tone reproduction curves and unsharp masking
//!
//! - Gamma and contrast TRC generation
//! - Generic TRC application, optionally restricted by a 1 bpp mask
//! - Gamma and contrast wrappers, as new images or in place
//! - Unsharp masking on gray and color images
//! - Half-edge extraction by a difference of two box filters
//!
//! For colormapped images the unmasked wrappers transform only the colormap.
//! Out-of-range parameters that have an obvious safe default are corrected
//! and reported through [`Diagnosed`].
//!
//! # See also
//!
//! C Leptonica: `enhance.c`

use crate::block_conv::{blockconv_accum, blockconv_gray};
use crate::{FilterError, FilterResult};
use leptonica_core::pix::{get_data_bit, get_data_byte, set_data_byte};
use leptonica_core::{
    ArithOp, Diagnosed, Pix, PixMut, PixelDepth, RemoveColormapTarget, RgbComponent, TrcLut,
    color,
};

/// Scale factor for contrast enhancement, matching C Leptonica.
const ENHANCE_SCALE_FACTOR: f64 = 5.0;

/// Offset that keeps signed intermediate values positive in the
/// unsharp-mask accumulator.
const UNSHARP_OFFSET: u32 = 0x1000_0000;

fn identity_trc() -> TrcLut {
    core::array::from_fn(|i| i as u8)
}

/// Generate a gamma TRC (tone reproduction curve) lookup table.
///
/// The mapping is `255 * ((input - minval) / (maxval - minval)) ^ (1/gamma)`,
/// with inputs below `minval` mapped to 0 and above `maxval` to 255.
///
/// # Arguments
///
/// * `gamma` - Gamma correction factor. Values > 1.0 lighten the image;
///   values < 1.0 darken it. A non-positive value is replaced by 1.0 with a
///   warning.
/// * `minval` - Input value that maps to 0 output. Can be negative.
/// * `maxval` - Input value that maps to 255 output. Can exceed 255.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] if `minval >= maxval`.
///
/// # See also
///
/// C Leptonica: `numaGammaTRC()` in `enhance.c`
pub fn gamma_trc(gamma: f32, minval: i32, maxval: i32) -> FilterResult<Diagnosed<TrcLut>> {
    if minval >= maxval {
        return Err(FilterError::InvalidParameters(format!(
            "minval {minval} not < maxval {maxval}"
        )));
    }
    let mut out = Diagnosed::clean(());
    let gamma = if gamma <= 0.0 {
        out.warn("gamma_trc", "gamma must be > 0.0; setting to 1.0");
        1.0
    } else {
        gamma as f64
    };

    let inv_gamma = 1.0 / gamma;
    let range = (maxval - minval) as f64;
    let lut = core::array::from_fn(|i| {
        let i = i as i32;
        if i < minval {
            0
        } else if i > maxval {
            255
        } else {
            let x = (i - minval) as f64 / range;
            ((255.0 * x.powf(inv_gamma) + 0.5) as i32).clamp(0, 255) as u8
        }
    });
    Ok(out.map(|()| lut))
}

/// Generate a contrast enhancement TRC lookup table.
///
/// Uses an atan-based mapping with maximum slope at value 127. Pixels below
/// 127 are darkened and pixels above 127 are lightened.
///
/// A `factor` of 0.0 gives the identity map exactly. A negative `factor`
/// also gives the identity map, with a warning. The useful range is
/// (0.0, 1.0) but larger values are allowed.
///
/// # See also
///
/// C Leptonica: `numaContrastTRC()` in `enhance.c`
pub fn contrast_trc(factor: f32) -> Diagnosed<TrcLut> {
    if factor < 0.0 {
        return Diagnosed::warned(
            identity_trc(),
            "contrast_trc",
            "factor must be >= 0.0; using 0.0; no enhancement",
        );
    }
    if factor == 0.0 {
        return Diagnosed::clean(identity_trc());
    }

    let scale = ENHANCE_SCALE_FACTOR * factor as f64;
    let ymax = scale.atan();
    let ymin = (-127.0 * scale / 128.0).atan();
    let dely = ymax - ymin;

    Diagnosed::clean(core::array::from_fn(|i| {
        let x = i as f64;
        let val = (255.0 / dely) * (-ymin + (scale * (x - 127.0) / 128.0).atan()) + 0.5;
        (val as i32).clamp(0, 255) as u8
    }))
}

/// Apply a TRC lookup table to an image in place.
///
/// For 8 bpp images each pixel value is remapped through the LUT. For
/// 32 bpp images R, G and B are remapped independently and alpha is left
/// untouched.
///
/// # Arguments
///
/// * `pix` - Mutable 8 or 32 bpp image, not colormapped
/// * `mask` - Optional 1 bpp mask aligned with the image origin; only
///   pixels under its foreground are modified, clipped to the overlap.
/// * `lut` - 256-entry lookup table
///
/// # See also
///
/// C Leptonica: `pixTRCMap()` in `enhance.c`
pub fn trc_map(pix: &mut PixMut, mask: Option<&Pix>, lut: &TrcLut) -> FilterResult<()> {
    if pix.has_colormap() {
        return Err(FilterError::InvalidParameters(
            "image is colormapped; map its colormap instead".into(),
        ));
    }
    let d = pix.depth();
    if d != PixelDepth::Bit8 && d != PixelDepth::Bit32 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 or 32 bpp",
            actual: d.bits(),
        });
    }
    if let Some(m) = mask
        && m.depth() != PixelDepth::Bit1
    {
        return Err(FilterError::UnsupportedDepth {
            expected: "1 bpp mask",
            actual: m.depth().bits(),
        });
    }

    let (w, h) = match mask {
        Some(m) => (pix.width().min(m.width()), pix.height().min(m.height())),
        None => (pix.width(), pix.height()),
    };

    for y in 0..h {
        let mline = mask.map(|m| m.row_data(y));
        let line = pix.row_data_mut(y);
        for x in 0..w {
            if let Some(ml) = mline
                && get_data_bit(ml, x) == 0
            {
                continue;
            }
            if d == PixelDepth::Bit8 {
                let val = get_data_byte(line, x);
                set_data_byte(line, x, lut[val as usize] as u32);
            } else {
                let word = &mut line[x as usize];
                let (r, g, b, a) = color::extract_rgba(*word);
                *word = color::compose_rgba(lut[r as usize], lut[g as usize], lut[b as usize], a);
            }
        }
    }

    Ok(())
}

fn check_trc_input(has_colormap: bool, depth: PixelDepth) -> FilterResult<()> {
    if !has_colormap && depth != PixelDepth::Bit8 && depth != PixelDepth::Bit32 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 or 32 bpp, or colormapped",
            actual: depth.bits(),
        });
    }
    Ok(())
}

fn check_masked_input(has_colormap: bool, depth: PixelDepth) -> FilterResult<()> {
    if has_colormap {
        return Err(FilterError::InvalidParameters(
            "masking is not supported for colormapped images".into(),
        ));
    }
    check_trc_input(false, depth)
}

/// Map either the colormap or the pixels of `pix` through `lut`.
fn apply_trc(pix: &mut PixMut, lut: &TrcLut) -> FilterResult<()> {
    if let Some(cmap) = pix.colormap_mut() {
        cmap.map_components(lut);
        return Ok(());
    }
    trc_map(pix, None, lut)
}

// =========================================================================
//  Gamma / contrast wrappers
// =========================================================================

/// Apply a gamma TRC to a copy of an image.
///
/// Accepts 8 or 32 bpp images and colormapped images; for the latter only
/// the colormap is changed.
///
/// # See also
///
/// C Leptonica: `pixGammaTRC()` in `enhance.c`
pub fn gamma_trc_pix(
    pix: &Pix,
    gamma: f32,
    minval: i32,
    maxval: i32,
) -> FilterResult<Diagnosed<Pix>> {
    check_trc_input(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    let out = gamma_trc_in_place(&mut pm, gamma, minval, maxval)?;
    Ok(out.map(|()| pm.into()))
}

/// Apply a gamma TRC in place.
///
/// The image is left untouched if an error is returned.
pub fn gamma_trc_in_place(
    pix: &mut PixMut,
    gamma: f32,
    minval: i32,
    maxval: i32,
) -> FilterResult<Diagnosed<()>> {
    check_trc_input(pix.has_colormap(), pix.depth())?;
    let lut = gamma_trc(gamma, minval, maxval)?;
    apply_trc(pix, &lut.value)?;
    Ok(lut.map(|_| ()))
}

/// Apply a gamma TRC to a copy of an image, restricted to a mask.
///
/// With no mask this is [`gamma_trc_pix`]. With a mask the image must be
/// 8 or 32 bpp without a colormap.
///
/// # See also
///
/// C Leptonica: `pixGammaTRCMasked()` in `enhance.c`
pub fn gamma_trc_masked(
    pix: &Pix,
    mask: Option<&Pix>,
    gamma: f32,
    minval: i32,
    maxval: i32,
) -> FilterResult<Diagnosed<Pix>> {
    let Some(mask) = mask else {
        return gamma_trc_pix(pix, gamma, minval, maxval);
    };
    check_masked_input(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    let out = gamma_trc_masked_in_place(&mut pm, Some(mask), gamma, minval, maxval)?;
    Ok(out.map(|()| pm.into()))
}

/// Apply a gamma TRC in place, restricted to a mask.
pub fn gamma_trc_masked_in_place(
    pix: &mut PixMut,
    mask: Option<&Pix>,
    gamma: f32,
    minval: i32,
    maxval: i32,
) -> FilterResult<Diagnosed<()>> {
    let Some(mask) = mask else {
        return gamma_trc_in_place(pix, gamma, minval, maxval);
    };
    check_masked_input(pix.has_colormap(), pix.depth())?;
    let lut = gamma_trc(gamma, minval, maxval)?;
    trc_map(pix, Some(mask), &lut.value)?;
    Ok(lut.map(|_| ()))
}

/// Apply contrast enhancement to a copy of an image.
///
/// Accepts 8 or 32 bpp images and colormapped images; for the latter only
/// the colormap is changed.
///
/// # See also
///
/// C Leptonica: `pixContrastTRC()` in `enhance.c`
pub fn contrast_trc_pix(pix: &Pix, factor: f32) -> FilterResult<Diagnosed<Pix>> {
    check_trc_input(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    let out = contrast_trc_in_place(&mut pm, factor)?;
    Ok(out.map(|()| pm.into()))
}

/// Apply contrast enhancement in place.
pub fn contrast_trc_in_place(pix: &mut PixMut, factor: f32) -> FilterResult<Diagnosed<()>> {
    check_trc_input(pix.has_colormap(), pix.depth())?;
    let lut = contrast_trc(factor);
    apply_trc(pix, &lut.value)?;
    Ok(lut.map(|_| ()))
}

/// Apply contrast enhancement to a copy of an image, restricted to a mask.
///
/// # See also
///
/// C Leptonica: `pixContrastTRCMasked()` in `enhance.c`
pub fn contrast_trc_masked(
    pix: &Pix,
    mask: Option<&Pix>,
    factor: f32,
) -> FilterResult<Diagnosed<Pix>> {
    let Some(mask) = mask else {
        return contrast_trc_pix(pix, factor);
    };
    check_masked_input(pix.has_colormap(), pix.depth())?;
    let mut pm = pix.to_mut();
    let out = contrast_trc_masked_in_place(&mut pm, Some(mask), factor)?;
    Ok(out.map(|()| pm.into()))
}

/// Apply contrast enhancement in place, restricted to a mask.
pub fn contrast_trc_masked_in_place(
    pix: &mut PixMut,
    mask: Option<&Pix>,
    factor: f32,
) -> FilterResult<Diagnosed<()>> {
    let Some(mask) = mask else {
        return contrast_trc_in_place(pix, factor);
    };
    check_masked_input(pix.has_colormap(), pix.depth())?;
    let lut = contrast_trc(factor);
    trc_map(pix, Some(mask), &lut.value)?;
    Ok(lut.map(|_| ()))
}

// =========================================================================
//  Unsharp masking
// =========================================================================

/// Sharpen an image by adding back a fraction of its high-pass part.
///
/// `smooth` is the half-width of the box smoothing filter (filter size is
/// `2 * smooth + 1`); `fract` is typically in (0.2, 0.7).
///
/// - `fract <= 0.0`: warning, and a shared handle to `pix` is returned.
/// - 2, 4 or 8 bpp with a colormap: warning, and the colormap is removed
///   based on its content first.
/// - 8 bpp goes through [`unsharp_mask_gray`], 32 bpp through
///   [`unsharp_mask_color`]. Other depths are an error.
///
/// # See also
///
/// C Leptonica: `pixUnsharpMask()` in `enhance.c`
pub fn unsharp_mask(pix: &Pix, smooth: u32, fract: f32) -> FilterResult<Diagnosed<Pix>> {
    if fract <= 0.0 {
        return Ok(Diagnosed::warned(
            pix.clone(),
            "unsharp_mask",
            "no fraction added back in",
        ));
    }

    let mut out = Diagnosed::clean(());
    let src = if pix.has_colormap()
        && matches!(
            pix.depth(),
            PixelDepth::Bit2 | PixelDepth::Bit4 | PixelDepth::Bit8
        ) {
        out.warn("unsharp_mask", "pix has colormap; removing");
        let removed = pix.remove_colormap(RemoveColormapTarget::BasedOnSrc)?;
        out.absorb(removed)
    } else {
        pix.clone()
    };

    let sharp = match src.depth() {
        PixelDepth::Bit8 => unsharp_mask_gray(&src, smooth, fract)?,
        PixelDepth::Bit32 => unsharp_mask_color(&src, smooth, fract)?,
        d => {
            return Err(FilterError::UnsupportedDepth {
                expected: "8 or 32 bpp, or colormapped",
                actual: d.bits(),
            });
        }
    };
    let sharp = out.absorb(sharp);
    Ok(out.map(|()| sharp))
}

/// Unsharp masking on an 8 bpp gray image.
///
/// The edge image `src - blur` is scaled by `fract` and added back to the
/// source inside a shifted 32 bpp accumulator, then clipped to [0, 255].
///
/// # See also
///
/// C Leptonica: `pixUnsharpMaskGray()` in `enhance.c`
pub fn unsharp_mask_gray(pix: &Pix, smooth: u32, fract: f32) -> FilterResult<Diagnosed<Pix>> {
    if pix.depth() != PixelDepth::Bit8 || pix.has_colormap() {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp without colormap",
            actual: pix.depth().bits(),
        });
    }
    if fract <= 0.0 {
        return Ok(Diagnosed::warned(
            pix.clone(),
            "unsharp_mask_gray",
            "no fraction added back in",
        ));
    }

    let blurred = blockconv_gray(pix, None, smooth, smooth)?;

    let mut acc = Pix::init_accumulate(pix.width(), pix.height(), UNSHARP_OFFSET)?;
    acc.accumulate(pix, ArithOp::Add)?;
    acc.accumulate(&blurred, ArithOp::Subtract)?;
    acc.mult_const_accumulate(fract, UNSHARP_OFFSET)?;
    acc.accumulate(pix, ArithOp::Add)?;

    let mut out = Pix::from(acc)
        .final_accumulate(UNSHARP_OFFSET, PixelDepth::Bit8)?
        .into_mut();
    out.copy_resolution_from(pix);
    Ok(Diagnosed::clean(out.into()))
}

/// Unsharp masking on a 32 bpp color image.
///
/// Each of R, G and B is sharpened independently with
/// [`unsharp_mask_gray`]. An alpha channel (spp 4) is carried over.
///
/// # See also
///
/// C Leptonica: `pixUnsharpMaskColor()` in `enhance.c`
pub fn unsharp_mask_color(pix: &Pix, smooth: u32, fract: f32) -> FilterResult<Diagnosed<Pix>> {
    if pix.depth() != PixelDepth::Bit32 {
        return Err(FilterError::UnsupportedDepth {
            expected: "32 bpp",
            actual: pix.depth().bits(),
        });
    }
    if fract <= 0.0 {
        return Ok(Diagnosed::warned(
            pix.clone(),
            "unsharp_mask_color",
            "no fraction added back in",
        ));
    }

    let mut out = Diagnosed::clean(());
    let mut sharpen = |comp: RgbComponent| -> FilterResult<Pix> {
        let channel = pix.get_rgb_component(comp)?;
        Ok(out.absorb(unsharp_mask_gray(&channel, smooth, fract)?))
    };
    let red = sharpen(RgbComponent::Red)?;
    let green = sharpen(RgbComponent::Green)?;
    let blue = sharpen(RgbComponent::Blue)?;

    let mut result = Pix::create_rgb_image(&red, &green, &blue)?.into_mut();
    if pix.spp() == 4 {
        let alpha = pix.get_rgb_component(RgbComponent::Alpha)?;
        result.set_rgb_component(&alpha, RgbComponent::Alpha)?;
    }
    result.copy_resolution_from(pix);
    Ok(out.map(|()| result.into()))
}

/// Half of the smoothed edge signal, by a bandpass filter.
///
/// Two box filters of half-sizes (`sm1h`, `sm1v`) and (`sm2h`, `sm2v`) are
/// applied and `c1 - c2` is clipped at 0. With `sm1 < sm2` the result is
/// positive on the upper half of each transition; with `sm1 > sm2` on the
/// lower half. Filters may be anisotropic. 32 bpp images are reduced to
/// luminance first.
///
/// # Errors
///
/// Returns an error if the two filters are the same size or if the image
/// is not 8 or 32 bpp.
///
/// # See also
///
/// C Leptonica: `pixHalfEdgeByBandpass()` in `enhance.c`
pub fn half_edge_by_bandpass(
    pix: &Pix,
    sm1h: u32,
    sm1v: u32,
    sm2h: u32,
    sm2v: u32,
) -> FilterResult<Pix> {
    if sm1h == sm2h && sm1v == sm2v {
        return Err(FilterError::InvalidParameters(
            "smoothing filters must differ".into(),
        ));
    }
    let gray = match pix.depth() {
        PixelDepth::Bit8 if !pix.has_colormap() => pix.clone(),
        PixelDepth::Bit32 => pix.convert_rgb_to_luminance()?,
        d => {
            return Err(FilterError::UnsupportedDepth {
                expected: "8 or 32 bpp",
                actual: d.bits(),
            });
        }
    };

    // One accumulator serves both filters
    let acc = blockconv_accum(&gray)?;
    let c1 = blockconv_gray(&gray, Some(&acc), sm1h, sm1v)?;
    let c2 = blockconv_gray(&gray, Some(&acc), sm2h, sm2v)?;

    let mut edge = c1.into_mut();
    edge.subtract_gray(&c2)?;
    Ok(edge.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leptonica_core::PixColormap;

    fn gray(w: u32, h: u32, f: impl Fn(u32, u32) -> u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit8).unwrap();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x, y, f(x, y));
            }
        }
        pm.into()
    }

    // ========== curve generation ==========

    #[test]
    fn test_gamma_trc_identity() {
        let lut = gamma_trc(1.0, 0, 255).unwrap();
        assert!(lut.is_clean());
        for (i, &val) in lut.value.iter().enumerate() {
            assert_eq!(val, i as u8, "identity mismatch at {i}");
        }
    }

    #[test]
    fn test_gamma_trc_lighten_and_darken() {
        let light = gamma_trc(2.0, 0, 255).unwrap().into_value();
        assert_eq!(light[0], 0);
        assert_eq!(light[255], 255);
        assert!(light[128] > 128, "got {}", light[128]);

        let dark = gamma_trc(0.5, 0, 255).unwrap().into_value();
        assert!(dark[128] < 128, "got {}", dark[128]);
    }

    #[test]
    fn test_gamma_trc_custom_range() {
        let lut = gamma_trc(1.0, 50, 200).unwrap().into_value();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[49], 0);
        assert_eq!(lut[200], 255);
        assert_eq!(lut[255], 255);
        assert!((lut[125] as i32 - 128).abs() <= 2, "got {}", lut[125]);
    }

    #[test]
    fn test_gamma_trc_bad_gamma_warns() {
        let lut = gamma_trc(0.0, 0, 255).unwrap();
        assert!(lut.has_warnings());
        assert_eq!(lut.diagnostics()[0].operation, "gamma_trc");
        assert_eq!(lut.value, identity_trc());
        assert!(gamma_trc(1.0, 100, 100).is_err());
    }

    #[test]
    fn test_contrast_trc() {
        let zero = contrast_trc(0.0);
        assert!(zero.is_clean());
        assert_eq!(zero.value, identity_trc());

        let neg = contrast_trc(-0.5);
        assert!(neg.has_warnings());
        assert_eq!(neg.value, identity_trc());

        let lut = contrast_trc(0.5).into_value();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        assert!(lut[60] < 60);
        assert!(lut[200] > 200);
        assert!(lut.windows(2).all(|p| p[0] <= p[1]));
    }

    // ========== trc_map ==========

    #[test]
    fn test_trc_map_preserves_alpha() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit32).unwrap();
        pm.set_rgba(0, 0, 10, 20, 30, 77).unwrap();
        pm.set_rgba(1, 0, 200, 100, 0, 5).unwrap();
        let invert: TrcLut = core::array::from_fn(|i| 255 - i as u8);
        trc_map(&mut pm, None, &invert).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgba(0, 0), Some((245, 235, 225, 77)));
        assert_eq!(pix.get_rgba(1, 0), Some((55, 155, 255, 5)));
    }

    #[test]
    fn test_trc_map_mask_clips_to_overlap() {
        let mut pm = gray(6, 6, |_, _| 100).into_mut();
        let mut mask = PixMut::new(3, 8, PixelDepth::Bit1).unwrap();
        mask.set_all();
        let mask: Pix = mask.into();
        let zero = [0u8; 256];
        trc_map(&mut pm, Some(&mask), &zero).unwrap();
        assert_eq!(pm.get_pixel(2, 5), Some(0));
        assert_eq!(pm.get_pixel(3, 0), Some(100));
    }

    #[test]
    fn test_trc_map_rejects_bad_inputs() {
        let mut pm = PixMut::new(4, 4, PixelDepth::Bit4).unwrap();
        assert!(trc_map(&mut pm, None, &identity_trc()).is_err());

        let mut pm = PixMut::new(4, 4, PixelDepth::Bit8).unwrap();
        let gray_mask = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        assert!(trc_map(&mut pm, Some(&gray_mask), &identity_trc()).is_err());
    }

    // ========== wrappers ==========

    #[test]
    fn test_gamma_on_colormap_changes_only_colormap() {
        let mut cmap = PixColormap::new(2).unwrap();
        cmap.add_rgb(64, 128, 192).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        let mut pm = PixMut::new(3, 3, PixelDepth::Bit2).unwrap();
        pm.set_pixel_unchecked(1, 1, 1);
        pm.set_colormap(Some(cmap)).unwrap();
        let pix: Pix = pm.into();

        let out = gamma_trc_pix(&pix, 2.0, 0, 255).unwrap().into_value();
        assert_eq!(out.data(), pix.data());
        let (r, g, b) = out.colormap().unwrap().get_rgb(0).unwrap();
        assert!(r > 64 && g > 128 && b > 192);
        assert_eq!(pix.colormap().unwrap().get_rgb(0), Some((64, 128, 192)));
    }

    #[test]
    fn test_masked_rejects_colormap() {
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit8).unwrap();
        pm.set_colormap(Some(PixColormap::create_linear(8, 4).unwrap()))
            .unwrap();
        let pix: Pix = pm.into();
        let mask = Pix::new(2, 2, PixelDepth::Bit1).unwrap();
        assert!(contrast_trc_masked(&pix, Some(&mask), 0.5).is_err());
        // Without a mask the colormap path is taken
        assert!(contrast_trc_masked(&pix, None, 0.5).is_ok());
    }

    #[test]
    fn test_in_place_matches_copy() {
        let pix = gray(16, 4, |x, y| x * 15 + y);
        let copy = contrast_trc_pix(&pix, 0.3).unwrap().into_value();
        let mut pm = pix.to_mut();
        contrast_trc_in_place(&mut pm, 0.3).unwrap();
        assert_eq!(pm.data(), copy.data());
    }

    // ========== unsharp masking ==========

    #[test]
    fn test_unsharp_mask_flat_image_unchanged() {
        let pix = gray(10, 10, |_, _| 90);
        let out = unsharp_mask(&pix, 2, 0.5).unwrap();
        assert!(out.is_clean());
        assert_eq!(out.value.data(), pix.data());
    }

    #[test]
    fn test_unsharp_mask_steepens_edge() {
        let pix = gray(20, 4, |x, _| if x < 10 { 50 } else { 200 });
        let out = unsharp_mask_gray(&pix, 2, 0.7).unwrap().into_value();
        assert!(out.get_pixel(9, 1).unwrap() < 50);
        assert!(out.get_pixel(10, 1).unwrap() > 200);
        assert_eq!(out.get_pixel(0, 1), Some(50));
        assert_eq!(out.get_pixel(19, 1), Some(200));
    }

    #[test]
    fn test_unsharp_mask_no_fraction() {
        let pix = gray(4, 4, |x, _| x);
        let out = unsharp_mask(&pix, 1, 0.0).unwrap();
        assert!(out.has_warnings());
        assert_eq!(out.value.ref_count(), pix.ref_count());
    }

    #[test]
    fn test_unsharp_mask_removes_colormap() {
        let mut pm = PixMut::new(4, 4, PixelDepth::Bit2).unwrap();
        pm.set_colormap(Some(PixColormap::create_linear(2, 4).unwrap()))
            .unwrap();
        let pix: Pix = pm.into();
        let out = unsharp_mask(&pix, 1, 0.5).unwrap();
        assert!(out.has_warnings());
        assert_eq!(out.value.depth(), PixelDepth::Bit8);
        assert!(!out.value.has_colormap());

        let binary = Pix::new(4, 4, PixelDepth::Bit1).unwrap();
        assert!(unsharp_mask(&binary, 1, 0.5).is_err());
    }

    #[test]
    fn test_unsharp_mask_color_keeps_alpha() {
        let mut pm = PixMut::new(6, 6, PixelDepth::Bit32).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                pm.set_rgba(x, y, 100, 150, 200, 40).unwrap();
            }
        }
        pm.set_spp(4);
        let pix: Pix = pm.into();
        let out = unsharp_mask(&pix, 1, 0.5).unwrap().into_value();
        assert_eq!(out.get_rgba(3, 3), Some((100, 150, 200, 40)));
    }

    #[test]
    fn test_half_edge_by_bandpass() {
        let pix = gray(40, 4, |x, _| if x < 20 { 0 } else { 255 });
        let edge = half_edge_by_bandpass(&pix, 1, 1, 4, 1).unwrap();
        assert_eq!(edge.get_pixel(2, 2), Some(0));
        assert_eq!(edge.get_pixel(37, 2), Some(0));
        // Upper half of the step is positive, lower half clipped
        assert!(edge.get_pixel(21, 2).unwrap() > 0);
        assert_eq!(edge.get_pixel(18, 2), Some(0));
        assert!(half_edge_by_bandpass(&pix, 2, 3, 2, 3).is_err());
    }
}
