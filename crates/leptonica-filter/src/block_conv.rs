//! Block convolution using integral images (summed area tables)
//!
//! Fast block average filter that runs in O(1) per pixel regardless of
//! kernel size, by precomputing an integral image (accumulator). The same
//! accumulator can be reused for several kernel sizes.
//!
//! # See also
//!
//! C Leptonica: `convolve.c` (`pixBlockconv`, `pixBlockconvGray`,
//! `pixBlockconvAccum`)

use crate::{FilterError, FilterResult};
use leptonica_core::pix::get_data_byte;
use leptonica_core::{Pix, PixMut, PixelDepth, RgbComponent};

/// Validate that the input image is 8 bpp grayscale.
fn check_8bpp(pix: &Pix) -> FilterResult<()> {
    if pix.depth() != PixelDepth::Bit8 || pix.has_colormap() {
        return Err(FilterError::UnsupportedDepth {
            expected: "8-bpp grayscale",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

/// Build an integral image (summed area table) from an 8 bpp grayscale image.
///
/// Each pixel in the output 32 bpp image contains the sum of all source
/// pixel values in the rectangle from (0,0) to (x,y) inclusive.
///
/// The recursion is: `a(i,j) = v(i,j) + a(i-1,j) + a(i,j-1) - a(i-1,j-1)`
///
/// # See also
///
/// C Leptonica: `pixBlockconvAccum()` in `convolve.c`
pub fn blockconv_accum(pix: &Pix) -> FilterResult<Pix> {
    check_8bpp(pix)?;

    let w = pix.width() as usize;
    let mut acc = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit32)?;
    let mut prev = vec![0u32; w];

    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let line = acc.row_data_mut(y);
        let mut row_sum = 0u32;
        for x in 0..w {
            // Running row sum plus the accumulated row above
            row_sum = row_sum.wrapping_add(get_data_byte(src, x as u32));
            line[x] = row_sum.wrapping_add(prev[x]);
        }
        prev.copy_from_slice(&line[..w]);
    }

    Ok(acc.into())
}

/// Fast block convolution on an 8 bpp grayscale image using an integral image.
///
/// `wc` and `hc` are the half-width and half-height of the convolution kernel.
/// The full kernel size is `(2*wc + 1) x (2*hc + 1)`.
///
/// If the kernel is larger than the image, it is reduced to fit. If either
/// half-size is then 0, a copy of the input is returned: a 1×N or N×1
/// kernel is treated as a no-op rather than one-dimensional averaging.
///
/// Near the image boundary the average is taken over the part of the
/// window that lies inside the image.
///
/// An optional pre-computed accumulator (`pixacc`) can be provided to avoid
/// redundant computation when the same image is convolved multiple times.
/// The accumulator must have the same dimensions as `pix` and be 32 bpp.
///
/// # See also
///
/// C Leptonica: `pixBlockconvGray()` in `convolve.c`
pub fn blockconv_gray(pix: &Pix, pixacc: Option<&Pix>, wc: u32, hc: u32) -> FilterResult<Pix> {
    check_8bpp(pix)?;

    let w = pix.width();
    let h = pix.height();

    let wc = wc.min((w - 1) / 2);
    let hc = hc.min((h - 1) / 2);
    if wc == 0 || hc == 0 {
        return Ok(pix.deep_clone());
    }

    let owned_acc;
    let acc = match pixacc {
        Some(a) => {
            if a.depth() != PixelDepth::Bit32 || a.width() != w || a.height() != h {
                return Err(FilterError::InvalidParameters(
                    "accumulator must be 32 bpp with same dimensions as input".into(),
                ));
            }
            a
        }
        None => {
            owned_acc = blockconv_accum(pix)?;
            &owned_acc
        }
    };

    let mut out = PixMut::new(w, h, PixelDepth::Bit8)?;
    out.copy_resolution_from(pix);

    for y in 0..h {
        // Rows (ymin, ymax] of the window; ymin is None above the top edge
        let ymin = y.checked_sub(hc + 1);
        let ymax = (y + hc).min(h - 1);
        let hn = ymax - ymin.map_or(0, |v| v + 1) + 1;

        for x in 0..w {
            let xmin = x.checked_sub(wc + 1);
            let xmax = (x + wc).min(w - 1);
            let wn = xmax - xmin.map_or(0, |v| v + 1) + 1;

            // Four-corner lookup on integral image
            let mut sum = acc.get_pixel_unchecked(xmax, ymax) as i64;
            if let Some(ym) = ymin {
                sum -= acc.get_pixel_unchecked(xmax, ym) as i64;
            }
            if let Some(xm) = xmin {
                sum -= acc.get_pixel_unchecked(xm, ymax) as i64;
            }
            if let (Some(xm), Some(ym)) = (xmin, ymin) {
                sum += acc.get_pixel_unchecked(xm, ym) as i64;
            }

            let area = (wn * hn) as f64;
            let val = (sum as f64 / area + 0.5) as u32;
            out.set_pixel_unchecked(x, y, val.min(255));
        }
    }

    Ok(out.into())
}

/// Fast block convolution on an 8 or 32 bpp image.
///
/// For 8 bpp, delegates to [`blockconv_gray`]. For 32 bpp, splits into
/// R/G/B channels, convolves each independently, and recombines.
///
/// `wc` and `hc` are the half-width and half-height of the convolution kernel.
///
/// # See also
///
/// C Leptonica: `pixBlockconv()` in `convolve.c`
pub fn blockconv(pix: &Pix, wc: u32, hc: u32) -> FilterResult<Pix> {
    match pix.depth() {
        PixelDepth::Bit8 => blockconv_gray(pix, None, wc, hc),
        PixelDepth::Bit32 => {
            let pix_r = pix.get_rgb_component(RgbComponent::Red)?;
            let pix_g = pix.get_rgb_component(RgbComponent::Green)?;
            let pix_b = pix.get_rgb_component(RgbComponent::Blue)?;

            let conv_r = blockconv_gray(&pix_r, None, wc, hc)?;
            let conv_g = blockconv_gray(&pix_g, None, wc, hc)?;
            let conv_b = blockconv_gray(&pix_b, None, wc, hc)?;

            Ok(Pix::create_rgb_image(&conv_r, &conv_g, &conv_b)?)
        }
        _ => Err(FilterError::UnsupportedDepth {
            expected: "8 or 32 bpp",
            actual: pix.depth().bits(),
        }),
    }
}
