//! RGB component operations
//!
//! Functions for extracting, setting, and composing individual color
//! channels of 32 bpp images.
//!
//! # See also
//!
//! C Leptonica: `pix2.c` (`pixGetRGBComponent`, `pixSetRGBComponent`,
//! `pixCreateRGBImage`)

use super::access::{get_data_byte, set_data_byte};
use super::convert::new_like;
use super::{Pix, PixMut, PixelDepth};
use crate::color;
use crate::error::{Error, Result};

/// Color component selector for RGB channel operations.
///
/// # See also
///
/// C Leptonica: `COLOR_RED`, `COLOR_GREEN`, `COLOR_BLUE`, `L_ALPHA_CHANNEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbComponent {
    /// Red channel (bits 24-31)
    Red,
    /// Green channel (bits 16-23)
    Green,
    /// Blue channel (bits 8-15)
    Blue,
    /// Alpha channel (bits 0-7)
    Alpha,
}

impl RgbComponent {
    /// Bit shift of this component within a 32-bit pixel.
    #[inline]
    pub fn shift(self) -> u32 {
        match self {
            RgbComponent::Red => color::RED_SHIFT,
            RgbComponent::Green => color::GREEN_SHIFT,
            RgbComponent::Blue => color::BLUE_SHIFT,
            RgbComponent::Alpha => color::ALPHA_SHIFT,
        }
    }
}

fn check_depth(pix_depth: PixelDepth, expected: PixelDepth) -> Result<()> {
    if pix_depth != expected {
        return Err(Error::UnsupportedDepth(pix_depth.bits()));
    }
    Ok(())
}

fn check_size(expected: (u32, u32), actual: (u32, u32)) -> Result<()> {
    if expected != actual {
        return Err(Error::DimensionMismatch { expected, actual });
    }
    Ok(())
}

impl Pix {
    /// Extract a single color component as an 8 bpp grayscale image.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixGetRGBComponent()` in `pix2.c`
    pub fn get_rgb_component(&self, comp: RgbComponent) -> Result<Pix> {
        check_depth(self.depth(), PixelDepth::Bit32)?;

        let shift = comp.shift();
        let mut pm = new_like(self, PixelDepth::Bit8)?;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &pixel) in src.iter().enumerate() {
                set_data_byte(dst, x as u32, (pixel >> shift) & 0xff);
            }
        }
        Ok(pm.into())
    }

    /// Create a 32 bpp RGB image from three 8 bpp component images.
    ///
    /// All three images must have the same dimensions. Alpha is set to 255.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if a component is not 8 bpp and
    /// [`Error::DimensionMismatch`] if the sizes differ.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixCreateRGBImage()` in `pix2.c`
    pub fn create_rgb_image(pix_r: &Pix, pix_g: &Pix, pix_b: &Pix) -> Result<Pix> {
        for p in [pix_r, pix_g, pix_b] {
            check_depth(p.depth(), PixelDepth::Bit8)?;
        }
        let size = (pix_r.width(), pix_r.height());
        check_size(size, (pix_g.width(), pix_g.height()))?;
        check_size(size, (pix_b.width(), pix_b.height()))?;

        let mut pm = new_like(pix_r, PixelDepth::Bit32)?;
        for y in 0..size.1 {
            let (lr, lg, lb) = (pix_r.row_data(y), pix_g.row_data(y), pix_b.row_data(y));
            for (x, word) in pm.row_data_mut(y).iter_mut().enumerate() {
                let x = x as u32;
                *word = color::compose_rgb(
                    get_data_byte(lr, x) as u8,
                    get_data_byte(lg, x) as u8,
                    get_data_byte(lb, x) as u8,
                );
            }
        }
        Ok(pm.into())
    }
}

impl PixMut {
    /// Replace one component of a 32 bpp image with an 8 bpp image.
    ///
    /// Setting the alpha component also marks the image as RGBA (spp 4).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] on depth mismatch and
    /// [`Error::DimensionMismatch`] if the sizes differ.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSetRGBComponent()` in `pix2.c`
    pub fn set_rgb_component(&mut self, src: &Pix, comp: RgbComponent) -> Result<()> {
        check_depth(self.depth(), PixelDepth::Bit32)?;
        check_depth(src.depth(), PixelDepth::Bit8)?;
        check_size(
            (self.width(), self.height()),
            (src.width(), src.height()),
        )?;

        let shift = comp.shift();
        let mask = !(0xff << shift);
        for y in 0..self.height() {
            let line = src.row_data(y);
            for (x, word) in self.row_data_mut(y).iter_mut().enumerate() {
                *word = (*word & mask) | (get_data_byte(line, x as u32) << shift);
            }
        }
        if comp == RgbComponent::Alpha {
            self.set_spp(4);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_rgb() -> Pix {
        let mut pm = PixMut::new(5, 2, PixelDepth::Bit32).unwrap();
        for y in 0..2 {
            for x in 0..5 {
                pm.set_rgba(x, y, (x * 10) as u8, (y * 20) as u8, 7, 99).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_get_rgb_component() {
        let pix = make_rgb();
        let r = pix.get_rgb_component(RgbComponent::Red).unwrap();
        let a = pix.get_rgb_component(RgbComponent::Alpha).unwrap();
        assert_eq!(r.depth(), PixelDepth::Bit8);
        assert_eq!(r.get_pixel(3, 1), Some(30));
        assert_eq!(a.get_pixel(3, 1), Some(99));
    }

    #[test]
    fn test_split_and_merge() {
        let pix = make_rgb();
        let r = pix.get_rgb_component(RgbComponent::Red).unwrap();
        let g = pix.get_rgb_component(RgbComponent::Green).unwrap();
        let b = pix.get_rgb_component(RgbComponent::Blue).unwrap();
        let merged = Pix::create_rgb_image(&r, &g, &b).unwrap();
        assert_eq!(merged.get_rgba(4, 1), Some((40, 20, 7, 255)));

        let mut pm = merged.to_mut();
        let a = pix.get_rgb_component(RgbComponent::Alpha).unwrap();
        pm.set_rgb_component(&a, RgbComponent::Alpha).unwrap();
        assert_eq!(pm.spp(), 4);
        let restored: Pix = pm.into();
        assert_eq!(restored.data(), pix.data());
    }

    #[test]
    fn test_component_errors() {
        let pix = make_rgb();
        assert!(matches!(
            Pix::new(2, 2, PixelDepth::Bit8)
                .unwrap()
                .get_rgb_component(RgbComponent::Red),
            Err(Error::UnsupportedDepth(8))
        ));
        let r = pix.get_rgb_component(RgbComponent::Red).unwrap();
        let small = Pix::new(4, 2, PixelDepth::Bit8).unwrap();
        assert!(matches!(
            Pix::create_rgb_image(&r, &small, &r),
            Err(Error::DimensionMismatch { .. })
        ));
        let mut pm = pix.to_mut();
        assert!(pm.set_rgb_component(&small, RgbComponent::Blue).is_err());
    }
}
