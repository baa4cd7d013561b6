//! Shifted accumulator arithmetic
//!
//! A 32 bpp accumulator holds signed intermediate results as unsigned words
//! shifted by a fixed offset. Values are added or subtracted into it, scaled,
//! and finally shifted back and clipped to the requested output depth.
//!
//! ```
//! use leptonica_core::{ArithOp, Pix, PixelDepth};
//!
//! let offset = 0x1000_0000;
//! let gray = Pix::new(4, 4, PixelDepth::Bit8).unwrap();
//! let mut acc = Pix::init_accumulate(4, 4, offset).unwrap();
//! acc.accumulate(&gray, ArithOp::Add).unwrap();
//! let out = Pix::from(acc).final_accumulate(offset, PixelDepth::Bit8).unwrap();
//! assert_eq!(out.get_pixel(0, 0), Some(0));
//! ```
//!
//! # See also
//!
//! C Leptonica: `pixarith.c` (`pixInitAccumulate`, `pixAccumulate`,
//! `pixMultConstAccumulate`, `pixFinalAccumulate`, `pixSubtractGray`)

use super::access::{
    get_data_bit, get_data_byte, get_data_two_bytes, set_data_byte, set_data_two_bytes,
};
use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Operation used when folding an image into an accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    /// acc += src
    Add,
    /// acc -= src
    Subtract,
}

#[inline]
fn source_value(line: &[u32], x: u32, depth: PixelDepth) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        _ => line[x as usize],
    }
}

impl Pix {
    /// Create a 32 bpp accumulator with every word set to `offset`.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixInitAccumulate()` in `pixarith.c`
    pub fn init_accumulate(width: u32, height: u32, offset: u32) -> Result<PixMut> {
        let mut acc = PixMut::new(width, height, PixelDepth::Bit32)?;
        acc.data_mut().fill(offset);
        Ok(acc)
    }

    /// Remove the offset from an accumulator and clip to `depth`.
    ///
    /// 8 and 16 bpp outputs are clamped to `[0, max]`; a 32 bpp output is
    /// clamped below at 0 only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if `self` is not 32 bpp or
    /// `depth` is not 8, 16 or 32.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixFinalAccumulate()` in `pixarith.c`
    pub fn final_accumulate(&self, offset: u32, depth: PixelDepth) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        if !matches!(
            depth,
            PixelDepth::Bit8 | PixelDepth::Bit16 | PixelDepth::Bit32
        ) {
            return Err(Error::UnsupportedDepth(depth.bits()));
        }

        let mut pm = PixMut::new(self.width(), self.height(), depth)?;
        pm.copy_resolution_from(self);
        let max = depth.max_value() as i64;
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &word) in src.iter().enumerate() {
                let val = word as i64 - offset as i64;
                let x = x as u32;
                match depth {
                    PixelDepth::Bit8 => set_data_byte(dst, x, val.clamp(0, max) as u32),
                    PixelDepth::Bit16 => set_data_two_bytes(dst, x, val.clamp(0, max) as u32),
                    _ => dst[x as usize] = val.max(0) as u32,
                }
            }
        }
        Ok(pm.into())
    }
}

impl PixMut {
    /// Add or subtract `src` into this 32 bpp accumulator.
    ///
    /// `src` may be 1, 8, 16 or 32 bpp. Only the overlapping region is
    /// processed; arithmetic wraps like the underlying unsigned words.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixAccumulate()` in `pixarith.c`
    pub fn accumulate(&mut self, src: &Pix, op: ArithOp) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let sdepth = src.depth();
        if !matches!(
            sdepth,
            PixelDepth::Bit1 | PixelDepth::Bit8 | PixelDepth::Bit16 | PixelDepth::Bit32
        ) {
            return Err(Error::UnsupportedDepth(sdepth.bits()));
        }

        let w = self.width().min(src.width());
        let h = self.height().min(src.height());
        for y in 0..h {
            let line = src.row_data(y);
            let acc = self.row_data_mut(y);
            for x in 0..w {
                let v = source_value(line, x, sdepth);
                let word = &mut acc[x as usize];
                *word = match op {
                    ArithOp::Add => word.wrapping_add(v),
                    ArithOp::Subtract => word.wrapping_sub(v),
                };
            }
        }
        Ok(())
    }

    /// Scale the signed content of an accumulator: `(acc - offset) * factor + offset`.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixMultConstAccumulate()` in `pixarith.c`
    pub fn mult_const_accumulate(&mut self, factor: f32, offset: u32) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        for word in self.data_mut() {
            let val = word.wrapping_sub(offset) as i32;
            let scaled = (factor * val as f32) as i32;
            *word = (scaled as u32).wrapping_add(offset);
        }
        Ok(())
    }

    /// Subtract `other` from this image in place, clipping at 0.
    ///
    /// Both images must have the same depth (8, 16 or 32 bpp); only the
    /// overlapping region is modified.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixSubtractGray()` in `pixarith.c`
    pub fn subtract_gray(&mut self, other: &Pix) -> Result<()> {
        let depth = self.depth();
        if other.depth() != depth {
            return Err(Error::UnsupportedDepth(other.depth().bits()));
        }
        if !matches!(
            depth,
            PixelDepth::Bit8 | PixelDepth::Bit16 | PixelDepth::Bit32
        ) {
            return Err(Error::UnsupportedDepth(depth.bits()));
        }

        let w = self.width().min(other.width());
        let h = self.height().min(other.height());
        for y in 0..h {
            let line = other.row_data(y);
            let dst = self.row_data_mut(y);
            for x in 0..w {
                match depth {
                    PixelDepth::Bit8 => {
                        let v = get_data_byte(dst, x).saturating_sub(get_data_byte(line, x));
                        set_data_byte(dst, x, v);
                    }
                    PixelDepth::Bit16 => {
                        let v = get_data_two_bytes(dst, x)
                            .saturating_sub(get_data_two_bytes(line, x));
                        set_data_two_bytes(dst, x, v);
                    }
                    _ => {
                        let i = x as usize;
                        dst[i] = dst[i].saturating_sub(line[i]);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET: u32 = 0x4000_0000;

    fn gray(w: u32, h: u32, f: impl Fn(u32, u32) -> u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit8).unwrap();
        for y in 0..h {
            for x in 0..w {
                pm.set_pixel_unchecked(x, y, f(x, y));
            }
        }
        pm.into()
    }

    #[test]
    fn test_init_accumulate() {
        let acc = Pix::init_accumulate(7, 3, OFFSET).unwrap();
        assert_eq!(acc.depth(), PixelDepth::Bit32);
        assert!(acc.data().iter().all(|&w| w == OFFSET));
    }

    #[test]
    fn test_accumulate_add_subtract() {
        let a = gray(5, 5, |x, _| x * 10);
        let b = gray(5, 5, |_, y| y * 20);
        let mut acc = Pix::init_accumulate(5, 5, OFFSET).unwrap();
        acc.accumulate(&a, ArithOp::Add).unwrap();
        acc.accumulate(&b, ArithOp::Subtract).unwrap();
        assert_eq!(acc.get_pixel_unchecked(4, 1), OFFSET + 40 - 20);
        assert_eq!(acc.get_pixel_unchecked(0, 4), OFFSET - 80);

        let out = Pix::from(acc).final_accumulate(OFFSET, PixelDepth::Bit8).unwrap();
        assert_eq!(out.get_pixel(4, 1), Some(20));
        assert_eq!(out.get_pixel(0, 4), Some(0));
    }

    #[test]
    fn test_accumulate_binary() {
        let mut bin = PixMut::new(40, 1, PixelDepth::Bit1).unwrap();
        bin.set_pixel(33, 0, 1).unwrap();
        let bin: Pix = bin.into();
        let mut acc = Pix::init_accumulate(40, 1, 0).unwrap();
        acc.accumulate(&bin, ArithOp::Add).unwrap();
        assert_eq!(acc.get_pixel_unchecked(33, 0), 1);
        assert_eq!(acc.get_pixel_unchecked(32, 0), 0);
    }

    #[test]
    fn test_mult_const_accumulate() {
        let mut acc = Pix::init_accumulate(3, 3, OFFSET).unwrap();
        acc.data_mut().iter_mut().for_each(|w| *w = OFFSET + 1000);
        acc.mult_const_accumulate(0.5, OFFSET).unwrap();
        assert_eq!(acc.get_pixel_unchecked(1, 1), OFFSET + 500);

        acc.data_mut().iter_mut().for_each(|w| *w = OFFSET - 10);
        acc.mult_const_accumulate(3.0, OFFSET).unwrap();
        assert_eq!(acc.get_pixel_unchecked(2, 2), OFFSET - 30);

        let mut g = PixMut::new(2, 2, PixelDepth::Bit8).unwrap();
        assert!(g.mult_const_accumulate(2.0, 0).is_err());
    }

    #[test]
    fn test_final_accumulate_clamps() {
        let mut acc = Pix::init_accumulate(3, 1, OFFSET).unwrap();
        acc.set_pixel_unchecked(0, 0, OFFSET + 70_000);
        acc.set_pixel_unchecked(1, 0, OFFSET - 5);
        acc.set_pixel_unchecked(2, 0, OFFSET + 300);
        let acc: Pix = acc.into();

        let d8 = acc.final_accumulate(OFFSET, PixelDepth::Bit8).unwrap();
        assert_eq!(d8.get_pixel(0, 0), Some(255));
        assert_eq!(d8.get_pixel(1, 0), Some(0));
        let d16 = acc.final_accumulate(OFFSET, PixelDepth::Bit16).unwrap();
        assert_eq!(d16.get_pixel(0, 0), Some(65535));
        assert_eq!(d16.get_pixel(2, 0), Some(300));
        let d32 = acc.final_accumulate(OFFSET, PixelDepth::Bit32).unwrap();
        assert_eq!(d32.get_pixel(0, 0), Some(70_000));
        assert_eq!(d32.get_pixel(1, 0), Some(0));
        assert!(acc.final_accumulate(OFFSET, PixelDepth::Bit4).is_err());
    }

    #[test]
    fn test_subtract_gray() {
        let a = gray(4, 2, |x, _| 100 + x);
        let b = gray(4, 2, |x, _| 50 * x);
        let mut pm = a.to_mut();
        pm.subtract_gray(&b).unwrap();
        assert_eq!(pm.get_pixel(0, 0), Some(100));
        assert_eq!(pm.get_pixel(1, 0), Some(51));
        assert_eq!(pm.get_pixel(3, 1), Some(0));

        let other = Pix::new(4, 2, PixelDepth::Bit16).unwrap();
        assert!(pm.subtract_gray(&other).is_err());
    }
}
