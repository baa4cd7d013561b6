//! Unpacking conversion from 1 bpp to 2, 4, 8, 16 and 32 bpp
//!
//! Each source bit becomes `val0` (bit clear) or `val1` (bit set) at the
//! destination depth. A small per-call table maps a group of source bits to
//! the corresponding destination bits:
//!
//! | dest | group | table                   |
//! |------|-------|-------------------------|
//! | 2    | byte  | 256 x u16 (two bytes)   |
//! | 4    | byte  | 256 x u32 (one word)    |
//! | 8    | qbit  | 16 x u32 (one word)     |
//! | 16   | dibit | 4 x u32 (one word)      |
//! | 32   | bit   | direct                  |
//!
//! Every function has an `_into` variant that writes into an existing
//! destination of matching size and depth.
//!
//! # See also
//!
//! C Leptonica: `pixconv.c` (`pixUnpackBinary`, `pixConvert1To*`)

use super::access::{get_data_bit, get_data_byte, get_data_dibit, get_data_qbit, set_data_two_bytes};
use super::convert::new_like;
use super::{Pix, PixMut, PixelDepth};
use crate::colormap::PixColormap;
use crate::error::{Error, Result};

/// Check that `src` is 1 bpp and `dst` has its size and the given depth.
fn check_unpack(src: &Pix, dst: &PixMut, depth: PixelDepth) -> Result<()> {
    if src.depth() != PixelDepth::Bit1 {
        return Err(Error::UnsupportedDepth(src.depth().bits()));
    }
    if dst.width() != src.width() || dst.height() != src.height() {
        return Err(Error::DimensionMismatch {
            expected: (src.width(), src.height()),
            actual: (dst.width(), dst.height()),
        });
    }
    if dst.depth() != depth {
        return Err(Error::UnsupportedDepth(dst.depth().bits()));
    }
    Ok(())
}

fn require_binary(src: &Pix) -> Result<()> {
    if src.depth() != PixelDepth::Bit1 {
        return Err(Error::UnsupportedDepth(src.depth().bits()));
    }
    Ok(())
}

impl Pix {
    /// Unpack a 1 bpp image to 8, 16 or 32 bpp with values 0 and the
    /// maximum for the depth.
    ///
    /// Without `invert`, bit 0 maps to 0 and bit 1 to the maximum; with
    /// `invert` the mapping is reversed.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixUnpackBinary()` in `pixconv.c`
    pub fn unpack_binary(&self, depth: u32, invert: bool) -> Result<Pix> {
        require_binary(self)?;
        let (lo, hi) = match depth {
            8 => (0, 0xff),
            16 => (0, 0xffff),
            32 => (0, 0xffffffff),
            _ => return Err(Error::InvalidDepth(depth)),
        };
        let (val0, val1) = if invert { (hi, lo) } else { (lo, hi) };
        match depth {
            8 => self.convert_1_to_8(val0 as u8, val1 as u8),
            16 => self.convert_1_to_16(val0 as u16, val1 as u16),
            _ => self.convert_1_to_32(val0, val1),
        }
    }

    /// Convert 1 bpp to 2 bpp.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To2()` in `pixconv.c`
    pub fn convert_1_to_2(&self, val0: u8, val1: u8) -> Result<Pix> {
        require_binary(self)?;
        let mut pm = new_like(self, PixelDepth::Bit2)?;
        self.convert_1_to_2_into(&mut pm, val0, val1)?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 2 bpp into an existing destination.
    pub fn convert_1_to_2_into(&self, dst: &mut PixMut, val0: u8, val1: u8) -> Result<()> {
        check_unpack(self, dst, PixelDepth::Bit2)?;
        let val = [(val0 & 3) as u32, (val1 & 3) as u32];
        let tab: [u16; 256] = core::array::from_fn(|index| {
            (0..8).fold(0u32, |acc, k| {
                acc | (val[(index >> (7 - k)) & 1] << (14 - 2 * k))
            }) as u16
        });

        dst.copy_resolution_from(self);
        let nbytes = self.width().div_ceil(8);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let line = dst.row_data_mut(y);
            for j in 0..nbytes {
                set_data_two_bytes(line, j, tab[get_data_byte(src, j) as usize] as u32);
            }
        }
        Ok(())
    }

    /// Convert 1 bpp to 2 bpp with a two-entry colormap (white, black).
    ///
    /// Bit 0 becomes index 0 (white) and bit 1 index 1 (black).
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To2Cmap()` in `pixconv.c`
    pub fn convert_1_to_2_cmap(&self) -> Result<Pix> {
        let mut pm = self.convert_1_to_2(0, 1)?.into_mut();
        pm.set_colormap(Some(white_black_colormap(2)?))?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 4 bpp.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To4()` in `pixconv.c`
    pub fn convert_1_to_4(&self, val0: u8, val1: u8) -> Result<Pix> {
        require_binary(self)?;
        let mut pm = new_like(self, PixelDepth::Bit4)?;
        self.convert_1_to_4_into(&mut pm, val0, val1)?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 4 bpp into an existing destination.
    pub fn convert_1_to_4_into(&self, dst: &mut PixMut, val0: u8, val1: u8) -> Result<()> {
        check_unpack(self, dst, PixelDepth::Bit4)?;
        let val = [(val0 & 0xf) as u32, (val1 & 0xf) as u32];
        let tab: [u32; 256] = core::array::from_fn(|index| {
            (0..8).fold(0u32, |acc, k| {
                acc | (val[(index >> (7 - k)) & 1] << (28 - 4 * k))
            })
        });

        dst.copy_resolution_from(self);
        let nbytes = self.width().div_ceil(8);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let line = dst.row_data_mut(y);
            for j in 0..nbytes {
                line[j as usize] = tab[get_data_byte(src, j) as usize];
            }
        }
        Ok(())
    }

    /// Convert 1 bpp to 4 bpp with a two-entry colormap (white, black).
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To4Cmap()` in `pixconv.c`
    pub fn convert_1_to_4_cmap(&self) -> Result<Pix> {
        let mut pm = self.convert_1_to_4(0, 1)?.into_mut();
        pm.set_colormap(Some(white_black_colormap(4)?))?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 8 bpp.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To8()` in `pixconv.c`
    pub fn convert_1_to_8(&self, val0: u8, val1: u8) -> Result<Pix> {
        require_binary(self)?;
        let mut pm = new_like(self, PixelDepth::Bit8)?;
        self.convert_1_to_8_into(&mut pm, val0, val1)?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 8 bpp into an existing destination.
    pub fn convert_1_to_8_into(&self, dst: &mut PixMut, val0: u8, val1: u8) -> Result<()> {
        check_unpack(self, dst, PixelDepth::Bit8)?;
        let val = [val0 as u32, val1 as u32];
        let tab: [u32; 16] = core::array::from_fn(|index| {
            (val[(index >> 3) & 1] << 24)
                | (val[(index >> 2) & 1] << 16)
                | (val[(index >> 1) & 1] << 8)
                | val[index & 1]
        });

        dst.copy_resolution_from(self);
        let nqbits = self.width().div_ceil(4);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let line = dst.row_data_mut(y);
            for j in 0..nqbits {
                line[j as usize] = tab[get_data_qbit(src, j) as usize];
            }
        }
        Ok(())
    }

    /// Convert 1 bpp to 16 bpp.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To16()` in `pixconv.c`
    pub fn convert_1_to_16(&self, val0: u16, val1: u16) -> Result<Pix> {
        require_binary(self)?;
        let mut pm = new_like(self, PixelDepth::Bit16)?;
        self.convert_1_to_16_into(&mut pm, val0, val1)?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 16 bpp into an existing destination.
    pub fn convert_1_to_16_into(&self, dst: &mut PixMut, val0: u16, val1: u16) -> Result<()> {
        check_unpack(self, dst, PixelDepth::Bit16)?;
        let val = [val0 as u32, val1 as u32];
        let tab: [u32; 4] =
            core::array::from_fn(|index| (val[(index >> 1) & 1] << 16) | val[index & 1]);

        dst.copy_resolution_from(self);
        let ndibits = self.width().div_ceil(2);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let line = dst.row_data_mut(y);
            for j in 0..ndibits {
                line[j as usize] = tab[get_data_dibit(src, j) as usize];
            }
        }
        Ok(())
    }

    /// Convert 1 bpp to 32 bpp.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixConvert1To32()` in `pixconv.c`
    pub fn convert_1_to_32(&self, val0: u32, val1: u32) -> Result<Pix> {
        require_binary(self)?;
        let mut pm = new_like(self, PixelDepth::Bit32)?;
        self.convert_1_to_32_into(&mut pm, val0, val1)?;
        Ok(pm.into())
    }

    /// Convert 1 bpp to 32 bpp into an existing destination.
    pub fn convert_1_to_32_into(&self, dst: &mut PixMut, val0: u32, val1: u32) -> Result<()> {
        check_unpack(self, dst, PixelDepth::Bit32)?;
        let val = [val0, val1];

        dst.copy_resolution_from(self);
        for y in 0..self.height() {
            let src = self.row_data(y);
            let line = dst.row_data_mut(y);
            for (x, word) in line.iter_mut().enumerate() {
                *word = val[get_data_bit(src, x as u32) as usize];
            }
        }
        Ok(())
    }
}

fn white_black_colormap(depth: u32) -> Result<PixColormap> {
    let mut cmap = PixColormap::new(depth)?;
    cmap.add_rgb(255, 255, 255)?;
    cmap.add_rgb(0, 0, 0)?;
    Ok(cmap)
}
