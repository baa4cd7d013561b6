//! PixColormap conversion functions
//!
//! Built-in palettes, channel extraction and whole-map transforms. Tone
//! curves and color space changes on colormapped images act on the
//! colormap alone, leaving the pixel indices untouched.
//!
//! # See also
//!
//! C Leptonica: `colormap.c` (pixcmapGrayToFalseColor, pixcmapToArrays,
//! pixcmapGammaTRC, pixcmapContrastTRC), `colorspace.c`
//! (pixcmapConvertRGBToHSV, pixcmapConvertHSVToRGB)

use super::{PixColormap, RgbaQuad};
use crate::color::{self, Hsv};
use crate::error::Result;
use crate::TrcLut;

/// Extracted color channel arrays from a colormap.
///
/// # See also
///
/// C Leptonica: `pixcmapToArrays()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColormapArrays {
    /// Red channel values
    pub red: Vec<u8>,
    /// Green channel values
    pub green: Vec<u8>,
    /// Blue channel values
    pub blue: Vec<u8>,
    /// Alpha channel values (if requested)
    pub alpha: Option<Vec<u8>>,
}

impl PixColormap {
    /// Create the 256-entry "jet" false color colormap.
    ///
    /// Low values map to dark blue, through cyan, green, yellow, to dark red
    /// at the top. `gamma` shapes the 64-entry transition ramp
    /// `255 * (i/64)^(1/gamma) + 0.5`; a value <= 0 is treated as 1.0.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapGrayToFalseColor()` in `colormap.c`
    pub fn gray_to_false_color(gamma: f32) -> Self {
        let gamma = if gamma <= 0.0 { 1.0 } else { gamma };
        let inv_gamma = 1.0 / gamma;

        let curve: [u8; 64] = core::array::from_fn(|i| {
            let x = i as f32 / 64.0;
            (255.0 * x.powf(inv_gamma) + 0.5).min(255.0) as u8
        });

        let colors = (0..256usize)
            .map(|i| {
                let (r, g, b) = match i {
                    0..32 => (0, 0, curve[i + 32]),
                    32..96 => (0, curve[i - 32], 255),
                    96..160 => (curve[i - 96], 255, curve[159 - i]),
                    160..224 => (255, curve[223 - i], 0),
                    _ => (curve[287 - i], 0, 0),
                };
                RgbaQuad::rgb(r, g, b)
            })
            .collect();
        PixColormap { colors, depth: 8 }
    }

    /// Extract color channel arrays from the colormap.
    ///
    /// If `include_alpha` is true, the alpha array is included.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapToArrays()` in `colormap.c`
    pub fn to_arrays(&self, include_alpha: bool) -> ColormapArrays {
        let colors = self.colors();
        ColormapArrays {
            red: colors.iter().map(|c| c.red).collect(),
            green: colors.iter().map(|c| c.green).collect(),
            blue: colors.iter().map(|c| c.blue).collect(),
            alpha: include_alpha.then(|| colors.iter().map(|c| c.alpha).collect()),
        }
    }

    /// Map the red, green and blue components of every entry through `lut`.
    ///
    /// Alpha is unchanged. This is how gamma and contrast curves are applied
    /// to colormapped images.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapGammaTRC()`, `pixcmapContrastTRC()` in `colormap.c`
    pub fn map_components(&mut self, lut: &TrcLut) {
        for c in &mut self.colors {
            c.red = lut[c.red as usize];
            c.green = lut[c.green as usize];
            c.blue = lut[c.blue as usize];
        }
    }

    /// Convert every entry from RGB to HSV in place.
    ///
    /// H, S and V are stored in the red, green and blue fields respectively.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapConvertRGBToHSV()` in `colorspace.c`
    pub fn convert_rgb_to_hsv(&mut self) {
        for c in &mut self.colors {
            let hsv = color::rgb_to_hsv(c.red, c.green, c.blue);
            c.red = hsv.h as u8;
            c.green = hsv.s as u8;
            c.blue = hsv.v as u8;
        }
    }

    /// Convert every entry from HSV (stored in r/g/b) back to RGB in place.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry holds a hue above 240. The colormap is
    /// left unchanged in that case.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapConvertHSVToRGB()` in `colorspace.c`
    pub fn convert_hsv_to_rgb(&mut self) -> Result<()> {
        let converted = self
            .colors
            .iter()
            .map(|c| {
                let (r, g, b) = color::hsv_to_rgb(Hsv {
                    h: c.red as i32,
                    s: c.green as i32,
                    v: c.blue as i32,
                })?;
                Ok(RgbaQuad::new(r, g, b, c.alpha))
            })
            .collect::<Result<Vec<_>>>()?;
        self.colors = converted;
        Ok(())
    }
}
