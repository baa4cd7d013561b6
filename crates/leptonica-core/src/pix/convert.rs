//! Pixel depth conversion functions
//!
//! Functions for converting between different pixel depths, removing
//! colormaps and reducing RGB to gray. Most conversions are table driven:
//! a lookup table maps a whole source byte (or nibble) to one or more
//! destination words, so that the inner loops do one lookup per group of
//! pixels rather than per pixel.
//!
//! Tables whose contents are fixed are built at compile time. Tables that
//! depend on caller-supplied values are built per call.
//!
//! # See also
//!
//! C Leptonica: `pixconv.c` (`pixRemoveColormap`, `pixConvertTo8`,
//! `pixConvertTo32`, `pixConvertForPSWrap`, etc.)

use super::access::{get_data_byte, get_data_dibit, get_data_qbit, set_data_byte, set_data_two_bytes};
use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::colormap::PixColormap;
use crate::diagnostic::Diagnosed;
use crate::error::{Error, Result};

/// Default perceptual weights for RGB-to-gray conversion.
///
/// These match C Leptonica's `L_RED_WEIGHT`, `L_GREEN_WEIGHT`, `L_BLUE_WEIGHT`.
pub const L_RED_WEIGHT: f32 = 0.3;
pub const L_GREEN_WEIGHT: f32 = 0.5;
pub const L_BLUE_WEIGHT: f32 = 0.2;

/// Tolerance on the sum of gray conversion weights.
const WEIGHT_SUM_TOLERANCE: f32 = 0.0001;

/// Conversion type for 16 bpp to 8 bpp conversion.
///
/// # See also
///
/// C Leptonica: `L_LS_BYTE`, `L_MS_BYTE` in `pix.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convert16To8Type {
    /// Use least significant byte
    LsByte,
    /// Use most significant byte
    MsByte,
}

/// Target type for colormap removal.
///
/// # See also
///
/// C Leptonica: `REMOVE_CMAP_TO_BINARY`, `REMOVE_CMAP_TO_GRAYSCALE`, etc. in `pix.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveColormapTarget {
    /// Convert to 1 bpp binary (only for 1 bpp images)
    ToBinary,
    /// Convert to 8 bpp grayscale
    ToGrayscale,
    /// Convert to 32 bpp RGB (spp=3)
    ToFullColor,
    /// Choose the target from the colormap content
    BasedOnSrc,
}

/// 8 bpp gray to 32 bpp RGB: `v << 24 | v << 16 | v << 8 | 0xff`.
const GRAY_TO_RGB_TAB: [u32; 256] = {
    let mut tab = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let v = i as u32;
        tab[i] = (v << 24) | (v << 16) | (v << 8) | 0xff;
        i += 1;
    }
    tab
};

/// One source byte of two 4 bpp pixels to two 8 bpp pixels, each nibble
/// replicated into a full byte (`q -> 17 * q`).
const QBIT_PAIR_TO_BYTES_TAB: [u16; 256] = {
    let mut tab = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let hi = (i >> 4) as u16;
        let lo = (i & 0xf) as u16;
        tab[i] = (((hi << 4) | hi) << 8) | ((lo << 4) | lo);
        i += 1;
    }
    tab
};

/// Build the per-call table mapping one byte of four 2 bpp pixels to one
/// word of four 8 bpp pixels.
fn make_dibit_to_byte_tab(vals: [u8; 4]) -> [u32; 256] {
    core::array::from_fn(|index| {
        let v = |shift: usize| vals[(index >> shift) & 3] as u32;
        (v(6) << 24) | (v(4) << 16) | (v(2) << 8) | v(0)
    })
}

/// Create an empty destination with the source's dimensions and resolution.
pub(crate) fn new_like(src: &Pix, depth: PixelDepth) -> Result<PixMut> {
    let mut pm = PixMut::new(src.width(), src.height(), depth)?;
    pm.copy_resolution_from(src);
    Ok(pm)
}

/// Read a colormap index of a 1, 2, 4 or 8 bpp pixel.
#[inline]
fn index_at(line: &[u32], x: u32, depth: PixelDepth) -> usize {
    match depth {
        PixelDepth::Bit1 => super::access::get_data_bit(line, x) as usize,
        PixelDepth::Bit2 => get_data_dibit(line, x) as usize,
        PixelDepth::Bit4 => get_data_qbit(line, x) as usize,
        _ => get_data_byte(line, x) as usize,
    }
}

impl Pix {
    /// Remove the colormap and convert to the specified target format.
    ///
    /// - No colormap: returns a shared clone of `self`.
    /// - `ToBinary` on an image that is not 1 bpp records a warning and is
    ///   treated as `BasedOnSrc`.
    /// - `BasedOnSrc`: a colormap without color entries gives binary output
    ///   for 1 bpp and 8 bpp grayscale otherwise; any color entry gives
    ///   32 bpp full color.
    /// - Binary output copies the bits, inverting them when entry 0 has
    ///   red = 0 (entry 0 is black, photometrically inverted).
    /// - Grayscale output is `(r + 2g + b) / 4` per entry.
    /// - Full color output writes r, g, b from the colormap with alpha 255.
    ///
    /// Resolution is copied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the depth is not 1, 2, 4 or 8
    /// and [`Error::IndexOutOfBounds`] if a pixel indexes past the end of
    /// the colormap.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixRemoveColormap()` in `pixconv.c`
    pub fn remove_colormap(&self, target: RemoveColormapTarget) -> Result<Diagnosed<Pix>> {
        let Some(cmap) = self.colormap() else {
            return Ok(Diagnosed::clean(self.clone()));
        };

        let d = self.depth();
        if !d.colormap_allowed() {
            return Err(Error::UnsupportedDepth(d.bits()));
        }
        cmap.check_indices(self)?;

        let mut out = Diagnosed::clean(());
        let target = match target {
            RemoveColormapTarget::ToBinary if d != PixelDepth::Bit1 => {
                out.warn(
                    "remove_colormap",
                    format!("{} bpp is not 1 bpp; can't remove colormap to binary", d.bits()),
                );
                RemoveColormapTarget::BasedOnSrc
            }
            other => other,
        };
        let target = match target {
            RemoveColormapTarget::BasedOnSrc if cmap.has_color() => {
                RemoveColormapTarget::ToFullColor
            }
            RemoveColormapTarget::BasedOnSrc if d == PixelDepth::Bit1 => {
                RemoveColormapTarget::ToBinary
            }
            RemoveColormapTarget::BasedOnSrc => RemoveColormapTarget::ToGrayscale,
            other => other,
        };

        let pix = match target {
            RemoveColormapTarget::ToBinary => {
                let mut pm = self.to_mut();
                if cmap.get(0).is_some_and(|c| c.red == 0) {
                    pm.invert();
                }
                pm.set_colormap(None)?;
                pm.into()
            }
            RemoveColormapTarget::ToGrayscale => {
                let graymap: Vec<u32> = cmap
                    .colors()
                    .iter()
                    .map(|c| (c.red as u32 + 2 * c.green as u32 + c.blue as u32) / 4)
                    .collect();
                let mut pm = new_like(self, PixelDepth::Bit8)?;
                for y in 0..self.height() {
                    let src = self.row_data(y);
                    let dst = pm.row_data_mut(y);
                    for x in 0..self.width() {
                        set_data_byte(dst, x, graymap[index_at(src, x, d)]);
                    }
                }
                pm.into()
            }
            _ => {
                let lut: Vec<u32> = cmap
                    .colors()
                    .iter()
                    .map(|c| color::compose_rgb(c.red, c.green, c.blue))
                    .collect();
                let mut pm = new_like(self, PixelDepth::Bit32)?;
                for y in 0..self.height() {
                    let src = self.row_data(y);
                    let dst = pm.row_data_mut(y);
                    for (x, word) in dst.iter_mut().enumerate() {
                        *word = lut[index_at(src, x as u32, d)];
                    }
                }
                pm.into()
            }
        };
        Ok(out.map(|()| pix))
    }

    /// Convert 32 bpp RGB to 8 bpp grayscale using standard luminance weights.
    ///
    /// Uses the default perceptual weights: 0.3R + 0.5G + 0.2B.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertRGBToLuminance()` in `pixconv.c`
    pub fn convert_rgb_to_luminance(&self) -> Result<Pix> {
        self.convert_rgb_to_gray(0.0, 0.0, 0.0)
    }

    /// Convert 32 bpp RGB to 8 bpp grayscale with custom weights.
    ///
    /// If all weights are 0.0, the default perceptual weights are used.
    /// Each gray value is `rwt * r + gwt * g + bwt * b + 0.5`, truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 32 bpp and
    /// [`Error::InvalidWeights`] if the weights do not sum to 1.0 within
    /// 0.0001.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertRGBToGray()` in `pixconv.c`
    pub fn convert_rgb_to_gray(&self, rwt: f32, gwt: f32, bwt: f32) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let (rwt, gwt, bwt) = if rwt == 0.0 && gwt == 0.0 && bwt == 0.0 {
            (L_RED_WEIGHT, L_GREEN_WEIGHT, L_BLUE_WEIGHT)
        } else {
            (rwt, gwt, bwt)
        };
        let sum = rwt + gwt + bwt;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(Error::InvalidWeights { sum });
        }

        let mut pm = new_like(self, PixelDepth::Bit8)?;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &pixel) in src.iter().enumerate() {
                let (r, g, b) = color::extract_rgb(pixel);
                let gray = rwt * r as f32 + gwt * g as f32 + bwt * b as f32 + 0.5;
                set_data_byte(dst, x as u32, gray as u8 as u32);
            }
        }
        Ok(pm.into())
    }

    /// Convert 32 bpp RGB to 8 bpp grayscale using the green channel.
    ///
    /// This is the fastest RGB-to-gray conversion, extracting only the
    /// green channel as a reasonable approximation of luminance.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertRGBToGrayFast()` in `pixconv.c`
    pub fn convert_rgb_to_gray_fast(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let mut pm = new_like(self, PixelDepth::Bit8)?;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &pixel) in src.iter().enumerate() {
                set_data_byte(dst, x as u32, color::green(pixel) as u32);
            }
        }
        Ok(pm.into())
    }

    /// Convert 16 bpp to 8 bpp, keeping either the LSB or the MSB.
    ///
    /// Two source pixels (one word) are converted at a time.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert16To8()` in `pixconv.c`
    pub fn convert_16_to_8(&self, conversion_type: Convert16To8Type) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit16 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let mut pm = new_like(self, PixelDepth::Bit8)?;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (j, &sword) in src.iter().enumerate() {
                let dword = match conversion_type {
                    Convert16To8Type::LsByte => ((sword >> 8) & 0xff00) | (sword & 0xff),
                    Convert16To8Type::MsByte => ((sword >> 16) & 0xff00) | ((sword >> 8) & 0xff),
                };
                set_data_two_bytes(dst, j as u32, dword);
            }
        }
        Ok(pm.into())
    }

    /// Convert any-depth image to 8-bit grayscale.
    ///
    /// It always creates a new image.
    ///
    /// Conversion rules:
    /// - **1 bpp**: 0 -> 255 (white), 1 -> 0 (black)
    /// - **2 bpp**: evenly spaced values (0, 85, 170, 255)
    /// - **4 bpp**: evenly spaced values (0, 17, 34, ... 255)
    /// - **8 bpp**: copy
    /// - **16 bpp**: most significant byte
    /// - **32 bpp**: luminance (0.3R + 0.5G + 0.2B)
    ///
    /// Colormapped sources are resolved to grayscale through the colormap.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertTo8()` in `pixconv.c`
    ///
    /// # Examples
    ///
    /// ```
    /// use leptonica_core::{Pix, PixelDepth};
    ///
    /// let pix32 = Pix::new(10, 10, PixelDepth::Bit32).unwrap();
    /// let pix8 = pix32.convert_to_8().unwrap();
    /// assert_eq!(pix8.depth(), PixelDepth::Bit8);
    /// ```
    pub fn convert_to_8(&self) -> Result<Pix> {
        if self.has_colormap() {
            return self
                .remove_colormap(RemoveColormapTarget::ToGrayscale)
                .map(Diagnosed::into_value);
        }
        match self.depth() {
            PixelDepth::Bit1 => self.convert_1_to_8(255, 0),
            PixelDepth::Bit2 => self.convert_2_to_8([0, 85, 170, 255], false),
            PixelDepth::Bit4 => self.convert_4_to_8(false),
            PixelDepth::Bit8 => Ok(self.deep_clone()),
            PixelDepth::Bit16 => self.convert_16_to_8(Convert16To8Type::MsByte),
            PixelDepth::Bit32 => self.convert_rgb_to_luminance(),
        }
    }

    /// Convert 2 bpp to 8 bpp.
    ///
    /// - Without colormap output, each 2 bpp value `i` becomes `vals[i]`,
    ///   four pixels at a time through a 256-entry table. A colormapped
    ///   source is resolved to grayscale instead.
    /// - With `with_colormap`, the output holds the raw indices and an
    ///   8 bpp colormap: a copy of the source colormap, or a gray colormap
    ///   built from `vals`.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert2To8()` in `pixconv.c`
    pub fn convert_2_to_8(&self, vals: [u8; 4], with_colormap: bool) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit2 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if self.has_colormap() && !with_colormap {
            return self
                .remove_colormap(RemoveColormapTarget::ToGrayscale)
                .map(Diagnosed::into_value);
        }

        let mut pm = new_like(self, PixelDepth::Bit8)?;
        if with_colormap {
            let cmap = match self.colormap() {
                Some(src_cmap) => widen_colormap(src_cmap)?,
                None => {
                    let mut cmap = PixColormap::new(8)?;
                    for v in vals {
                        cmap.add_rgb(v, v, v)?;
                    }
                    cmap
                }
            };
            for y in 0..self.height() {
                let src = self.row_data(y);
                let dst = pm.row_data_mut(y);
                for x in 0..self.width() {
                    set_data_byte(dst, x, get_data_dibit(src, x));
                }
            }
            pm.set_colormap(Some(cmap))?;
            return Ok(pm.into());
        }

        let tab = make_dibit_to_byte_tab(vals);
        let nbytes = self.width().div_ceil(4);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for j in 0..nbytes {
                dst[j as usize] = tab[get_data_byte(src, j) as usize];
            }
        }
        Ok(pm.into())
    }

    /// Convert 4 bpp to 8 bpp.
    ///
    /// - Without colormap output, each nibble is replicated into a byte
    ///   (`q -> 17 * q`). A colormapped source is resolved to grayscale.
    /// - With `with_colormap`, the output holds the raw indices and an
    ///   8 bpp colormap: a copy of the source colormap, or a 16-level
    ///   linear gray colormap.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert4To8()` in `pixconv.c`
    pub fn convert_4_to_8(&self, with_colormap: bool) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit4 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if self.has_colormap() && !with_colormap {
            return self
                .remove_colormap(RemoveColormapTarget::ToGrayscale)
                .map(Diagnosed::into_value);
        }

        let mut pm = new_like(self, PixelDepth::Bit8)?;
        if with_colormap {
            let cmap = match self.colormap() {
                Some(src_cmap) => widen_colormap(src_cmap)?,
                None => {
                    let mut cmap = PixColormap::new(8)?;
                    for i in 0..16u8 {
                        cmap.add_rgb(17 * i, 17 * i, 17 * i)?;
                    }
                    cmap
                }
            };
            for y in 0..self.height() {
                let src = self.row_data(y);
                let dst = pm.row_data_mut(y);
                for x in 0..self.width() {
                    set_data_byte(dst, x, get_data_qbit(src, x));
                }
            }
            pm.set_colormap(Some(cmap))?;
            return Ok(pm.into());
        }

        let nbytes = self.width().div_ceil(2);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for j in 0..nbytes {
                let pair = QBIT_PAIR_TO_BYTES_TAB[get_data_byte(src, j) as usize];
                set_data_two_bytes(dst, j, pair as u32);
            }
        }
        Ok(pm.into())
    }

    /// Convert 8 bpp grayscale to 32 bpp RGB.
    ///
    /// Each gray value `v` becomes `v << 24 | v << 16 | v << 8 | 0xff`.
    /// A colormapped source is converted to full color through its
    /// colormap.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert8To32()` in `pixconv.c`
    pub fn convert_8_to_32(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if self.has_colormap() {
            return self
                .remove_colormap(RemoveColormapTarget::ToFullColor)
                .map(Diagnosed::into_value);
        }

        let mut pm = new_like(self, PixelDepth::Bit32)?;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, word) in dst.iter_mut().enumerate() {
                *word = GRAY_TO_RGB_TAB[get_data_byte(src, x as u32) as usize];
            }
        }
        Ok(pm.into())
    }

    /// Convert any-depth image to 32-bit RGB.
    ///
    /// Conversion rules:
    /// - **1 bpp**: 0 -> white, 1 -> black
    /// - **2 bpp**: indexed 8 bpp (levels 0, 85, 170, 255 or the source
    ///   colormap), then to RGB
    /// - **4 bpp**: indexed 8 bpp (levels 17 * i or the source colormap),
    ///   then to RGB
    /// - **8 bpp**: gray replicated into R = G = B
    /// - **16 bpp**: most significant byte, then to RGB
    /// - **32 bpp**: copy
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertTo32()` in `pixconv.c`
    pub fn convert_to_32(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit1 if self.has_colormap() => self
                .remove_colormap(RemoveColormapTarget::ToFullColor)
                .map(Diagnosed::into_value),
            PixelDepth::Bit1 => self.convert_1_to_32(0xffffffff, 0),
            PixelDepth::Bit2 => self.convert_2_to_8([0, 85, 170, 255], true)?.convert_8_to_32(),
            PixelDepth::Bit4 => self.convert_4_to_8(true)?.convert_8_to_32(),
            PixelDepth::Bit8 => self.convert_8_to_32(),
            PixelDepth::Bit16 => self
                .convert_16_to_8(Convert16To8Type::MsByte)?
                .convert_8_to_32(),
            PixelDepth::Bit32 => Ok(self.deep_clone()),
        }
    }

    /// Convert to a depth suitable for wrapping in a page description.
    ///
    /// - **1, 32 bpp**: shared clone
    /// - **2, 4 bpp**: colormap removed based on the source, else expanded
    ///   to 8 bpp gray
    /// - **8 bpp**: colormap removed based on the source (clone if none)
    /// - **16 bpp**: most significant byte
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertForPSWrap()` in `pixconv.c`
    pub fn convert_for_ps_wrap(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit1 | PixelDepth::Bit32 => Ok(self.clone()),
            PixelDepth::Bit2 | PixelDepth::Bit4 | PixelDepth::Bit8 if self.has_colormap() => self
                .remove_colormap(RemoveColormapTarget::BasedOnSrc)
                .map(Diagnosed::into_value),
            PixelDepth::Bit2 => self.convert_2_to_8([0, 0x55, 0xaa, 0xff], false),
            PixelDepth::Bit4 => self.convert_4_to_8(false),
            PixelDepth::Bit8 => Ok(self.clone()),
            PixelDepth::Bit16 => self.convert_16_to_8(Convert16To8Type::MsByte),
        }
    }

    /// Convert 8 or 16 bpp grayscale to 8 bpp with a "jet" false color
    /// colormap.
    ///
    /// 16 bpp input is first reduced to its MSB; a colormapped 8 bpp input
    /// is first resolved to grayscale. A `gamma` of 0.0 means 1.0.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvertGrayToFalseColor()` in `pixconv.c`
    pub fn convert_gray_to_false_color(&self, gamma: f32) -> Result<Pix> {
        let gray = match self.depth() {
            PixelDepth::Bit16 => self.convert_16_to_8(Convert16To8Type::MsByte)?,
            PixelDepth::Bit8 if self.has_colormap() => self
                .remove_colormap(RemoveColormapTarget::ToGrayscale)?
                .into_value(),
            PixelDepth::Bit8 => self.clone(),
            d => return Err(Error::UnsupportedDepth(d.bits())),
        };
        let mut pm = gray.into_mut();
        pm.set_colormap(Some(PixColormap::gray_to_false_color(gamma)))?;
        Ok(pm.into())
    }
}

/// Copy the RGB entries of a 2 or 4 bpp colormap into an 8 bpp one.
fn widen_colormap(src: &PixColormap) -> Result<PixColormap> {
    let mut cmap = PixColormap::new(8)?;
    for c in src.colors() {
        cmap.add_rgb(c.red, c.green, c.blue)?;
    }
    Ok(cmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_cmap(depth: u32, grays: &[u8]) -> PixColormap {
        let mut cmap = PixColormap::new(depth).unwrap();
        for &g in grays {
            cmap.add_rgb(g, g, g).unwrap();
        }
        cmap
    }

    #[test]
    fn test_const_tables() {
        assert_eq!(GRAY_TO_RGB_TAB[0], 0x0000_00ff);
        assert_eq!(GRAY_TO_RGB_TAB[0x80], 0x8080_80ff);
        assert_eq!(QBIT_PAIR_TO_BYTES_TAB[0x1f], 0x11ff);
        let tab = make_dibit_to_byte_tab([0, 85, 170, 255]);
        assert_eq!(tab[0b00_01_10_11], 0x0055_aaff);
    }

    #[test]
    fn test_remove_colormap_no_cmap_is_clone() {
        let pix = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
        let out = pix.remove_colormap(RemoveColormapTarget::ToFullColor).unwrap();
        assert!(out.is_clean());
        assert_eq!(pix.ref_count(), 2);
    }

    #[test]
    fn test_remove_colormap_to_binary_inverts_when_black_first() {
        let mut pm = PixMut::new(8, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(3, 0, 1).unwrap();
        pm.set_colormap(Some(gray_cmap(1, &[0, 255]))).unwrap();
        let pix: Pix = pm.into();

        let out = pix
            .remove_colormap(RemoveColormapTarget::BasedOnSrc)
            .unwrap()
            .into_value();
        assert_eq!(out.depth(), PixelDepth::Bit1);
        assert!(!out.has_colormap());
        assert_eq!(out.get_pixel(3, 0), Some(0));
        assert_eq!(out.get_pixel(0, 0), Some(1));
    }

    #[test]
    fn test_remove_colormap_to_binary_keeps_white_first() {
        let mut pm = PixMut::new(8, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(3, 0, 1).unwrap();
        pm.set_colormap(Some(gray_cmap(1, &[255, 0]))).unwrap();
        let pix: Pix = pm.into();
        let out = pix
            .remove_colormap(RemoveColormapTarget::ToBinary)
            .unwrap()
            .into_value();
        assert_eq!(out.get_pixel(3, 0), Some(1));
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_remove_colormap_binary_on_2bpp_warns() {
        let mut pm = PixMut::new(4, 1, PixelDepth::Bit2).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        pm.set_colormap(Some(gray_cmap(2, &[0, 100]))).unwrap();
        let pix: Pix = pm.into();
        let out = pix.remove_colormap(RemoveColormapTarget::ToBinary).unwrap();
        assert!(out.has_warnings());
        assert_eq!(out.diagnostics()[0].operation, "remove_colormap");
        let gray = out.into_value();
        assert_eq!(gray.depth(), PixelDepth::Bit8);
        assert_eq!(gray.get_pixel(1, 0), Some(100));
    }

    #[test]
    fn test_remove_colormap_grayscale_weights() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit4).unwrap();
        pm.set_pixel(0, 0, 1).unwrap();
        let mut cmap = PixColormap::new(4).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        cmap.add_rgb(100, 40, 20).unwrap();
        pm.set_colormap(Some(cmap)).unwrap();
        pm.set_resolution(72, 96);
        let pix: Pix = pm.into();
        let gray = pix
            .remove_colormap(RemoveColormapTarget::ToGrayscale)
            .unwrap()
            .into_value();
        // (100 + 80 + 20) / 4
        assert_eq!(gray.get_pixel(0, 0), Some(50));
        assert_eq!(gray.get_pixel(1, 0), Some(0));
        assert_eq!((gray.xres(), gray.yres()), (72, 96));
    }

    #[test]
    fn test_remove_colormap_full_color() {
        let mut pm = PixMut::new(3, 2, PixelDepth::Bit8).unwrap();
        pm.set_pixel(2, 1, 1).unwrap();
        let mut cmap = PixColormap::new(8).unwrap();
        cmap.add_rgb(1, 2, 3).unwrap();
        cmap.add_rgb(200, 100, 50).unwrap();
        pm.set_colormap(Some(cmap)).unwrap();
        let pix: Pix = pm.into();
        let rgb = pix
            .remove_colormap(RemoveColormapTarget::BasedOnSrc)
            .unwrap()
            .into_value();
        assert_eq!(rgb.depth(), PixelDepth::Bit32);
        assert_eq!(rgb.get_pixel(2, 1), Some(0xc8643200 | 0xff));
        assert_eq!(rgb.get_rgb(0, 0), Some((1, 2, 3)));
    }

    #[test]
    fn test_remove_colormap_bad_index() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit2).unwrap();
        pm.set_pixel(0, 0, 3).unwrap();
        pm.set_colormap(Some(gray_cmap(2, &[0, 255]))).unwrap();
        let pix: Pix = pm.into();
        assert!(matches!(
            pix.remove_colormap(RemoveColormapTarget::ToGrayscale),
            Err(Error::IndexOutOfBounds { index: 3, len: 2 })
        ));
    }

    #[test]
    fn test_convert_rgb_to_gray() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit32).unwrap();
        pm.set_rgb(0, 0, 100, 200, 50).unwrap();
        pm.set_rgb(1, 0, 255, 255, 255).unwrap();
        let pix: Pix = pm.into();

        let lum = pix.convert_rgb_to_luminance().unwrap();
        // 30 + 100 + 10 + 0.5
        assert_eq!(lum.get_pixel(0, 0), Some(140));
        assert_eq!(lum.get_pixel(1, 0), Some(255));

        let red = pix.convert_rgb_to_gray(1.0, 0.0, 0.0).unwrap();
        assert_eq!(red.get_pixel(0, 0), Some(100));

        assert!(matches!(
            pix.convert_rgb_to_gray(0.5, 0.5, 0.5),
            Err(Error::InvalidWeights { .. })
        ));
        let fast = pix.convert_rgb_to_gray_fast().unwrap();
        assert_eq!(fast.get_pixel(0, 0), Some(200));

        let gray = Pix::new(2, 2, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            gray.convert_rgb_to_luminance(),
            Err(Error::UnsupportedDepth(8))
        ));
    }

    #[test]
    fn test_convert_16_to_8() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit16).unwrap();
        pm.set_pixel(0, 0, 0x1234).unwrap();
        pm.set_pixel(1, 0, 0xabcd).unwrap();
        pm.set_pixel(2, 0, 0x00ff).unwrap();
        let pix: Pix = pm.into();
        let ms = pix.convert_16_to_8(Convert16To8Type::MsByte).unwrap();
        let ls = pix.convert_16_to_8(Convert16To8Type::LsByte).unwrap();
        assert_eq!(
            (0..3).map(|x| ms.get_pixel(x, 0).unwrap()).collect::<Vec<_>>(),
            vec![0x12, 0xab, 0x00]
        );
        assert_eq!(
            (0..3).map(|x| ls.get_pixel(x, 0).unwrap()).collect::<Vec<_>>(),
            vec![0x34, 0xcd, 0xff]
        );
    }

    #[test]
    fn test_convert_to_8_low_depths() {
        let mut pm = PixMut::new(5, 1, PixelDepth::Bit2).unwrap();
        for x in 0..4 {
            pm.set_pixel(x, 0, x).unwrap();
        }
        let pix: Pix = pm.into();
        let out = pix.convert_to_8().unwrap();
        assert_eq!(
            (0..5).map(|x| out.get_pixel(x, 0).unwrap()).collect::<Vec<_>>(),
            vec![0, 85, 170, 255, 0]
        );

        let mut pm = PixMut::new(17, 1, PixelDepth::Bit4).unwrap();
        for x in 0..16 {
            pm.set_pixel(x, 0, x).unwrap();
        }
        let pix: Pix = pm.into();
        let out = pix.convert_to_8().unwrap();
        for x in 0..16 {
            assert_eq!(out.get_pixel(x, 0), Some(17 * x));
        }
    }

    #[test]
    fn test_convert_2_to_8_with_colormap() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit2).unwrap();
        pm.set_pixel(1, 0, 3).unwrap();
        let pix: Pix = pm.into();
        let out = pix.convert_2_to_8([10, 20, 30, 40], true).unwrap();
        assert_eq!(out.get_pixel(1, 0), Some(3));
        let cmap = out.colormap().unwrap();
        assert_eq!(cmap.depth(), 8);
        assert_eq!(cmap.get_rgb(3), Some((40, 40, 40)));
    }

    #[test]
    fn test_convert_4_to_8_keeps_source_colormap() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit4).unwrap();
        pm.set_pixel(2, 0, 1).unwrap();
        let mut cmap = PixColormap::new(4).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        cmap.add_rgb(255, 0, 0).unwrap();
        pm.set_colormap(Some(cmap)).unwrap();
        let pix: Pix = pm.into();

        let indexed = pix.convert_4_to_8(true).unwrap();
        assert_eq!(indexed.get_pixel(2, 0), Some(1));
        assert_eq!(indexed.colormap().unwrap().get_rgb(1), Some((255, 0, 0)));

        let gray = pix.convert_4_to_8(false).unwrap();
        assert!(!gray.has_colormap());
        // (255 + 0 + 0) / 4
        assert_eq!(gray.get_pixel(2, 0), Some(63));
    }

    #[test]
    fn test_convert_8_to_32_and_back() {
        let mut pm = PixMut::new(7, 3, PixelDepth::Bit8).unwrap();
        for y in 0..3 {
            for x in 0..7 {
                pm.set_pixel(x, y, x * 37 + y).unwrap();
            }
        }
        let pix: Pix = pm.into();
        let rgb = pix.convert_8_to_32().unwrap();
        assert_eq!(rgb.get_pixel(1, 2), Some(0x2727_27ff));
        let back = rgb.convert_rgb_to_luminance().unwrap();
        assert_eq!(back.data(), pix.data());
    }

    #[test]
    fn test_convert_to_32() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        let pix: Pix = pm.into();
        let rgb = pix.convert_to_32().unwrap();
        assert_eq!(rgb.get_pixel(0, 0), Some(0xffffffff));
        assert_eq!(rgb.get_pixel(1, 0), Some(0));

        let mut pm = PixMut::new(2, 1, PixelDepth::Bit2).unwrap();
        pm.set_pixel(0, 0, 2).unwrap();
        let pix: Pix = pm.into();
        let rgb = pix.convert_to_32().unwrap();
        assert_eq!(rgb.get_rgb(0, 0), Some((170, 170, 170)));

        let mut pm = PixMut::new(2, 1, PixelDepth::Bit16).unwrap();
        pm.set_pixel(1, 0, 0x8001).unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.convert_to_32().unwrap().get_rgb(1, 0), Some((128, 128, 128)));
    }

    #[test]
    fn test_convert_for_ps_wrap() {
        let pix1 = Pix::new(4, 4, PixelDepth::Bit1).unwrap();
        let out = pix1.convert_for_ps_wrap().unwrap();
        assert_eq!(pix1.ref_count(), 2);
        assert_eq!(out.depth(), PixelDepth::Bit1);

        let pix16 = Pix::new(4, 4, PixelDepth::Bit16).unwrap();
        assert_eq!(pix16.convert_for_ps_wrap().unwrap().depth(), PixelDepth::Bit8);

        let pix2 = Pix::new(4, 4, PixelDepth::Bit2).unwrap();
        assert_eq!(pix2.convert_for_ps_wrap().unwrap().depth(), PixelDepth::Bit8);
    }

    #[test]
    fn test_convert_gray_to_false_color() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit16).unwrap();
        pm.set_pixel(1, 0, 0xff00).unwrap();
        let pix: Pix = pm.into();
        let out = pix.convert_gray_to_false_color(0.0).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit8);
        assert_eq!(out.get_pixel(1, 0), Some(255));
        assert_eq!(out.colormap().unwrap().len(), 256);

        let pix4 = Pix::new(2, 2, PixelDepth::Bit4).unwrap();
        assert!(pix4.convert_gray_to_false_color(1.0).is_err());
    }
}
