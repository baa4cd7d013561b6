//! PixColormap query functions
//!
//! Color/gray classification, exact lookup, packed-pixel accessors and
//! index validation against an image.
//!
//! # See also
//!
//! C Leptonica: `colormap.c`

use super::PixColormap;
use crate::color;
use crate::error::{Error, Result};
use crate::pix::Pix;

impl PixColormap {
    /// True if any entry has r != g or g != b.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapHasColor()` in `colormap.c`
    pub fn has_color(&self) -> bool {
        self.colors().iter().any(|c| c.is_color())
    }

    /// True if every entry is a gray (r == g == b).
    ///
    /// An empty colormap counts as grayscale.
    pub fn is_grayscale(&self) -> bool {
        !self.has_color()
    }

    /// Count the gray entries.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapCountGrayColors()` in `colormap.c`
    pub fn count_gray_colors(&self) -> usize {
        self.colors().iter().filter(|c| !c.is_color()).count()
    }

    /// Find the index of an exact RGB color match.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapGetIndex()` in `colormap.c`
    pub fn get_index(&self, r: u8, g: u8, b: u8) -> Option<usize> {
        self.colors()
            .iter()
            .position(|c| c.red == r && c.green == g && c.blue == b)
    }

    /// Get a packed 32-bit RGB value at index (alpha = 255).
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapGetColor32()` in `colormap.c`
    pub fn get_color32(&self, index: usize) -> Option<u32> {
        self.get_rgb(index)
            .map(|(r, g, b)| color::compose_rgb(r, g, b))
    }

    /// Get a packed 32-bit RGBA value at index.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapGetRGBA32()` in `colormap.c`
    pub fn get_rgba32(&self, index: usize) -> Option<u32> {
        self.get_rgba(index)
            .map(|(r, g, b, a)| color::compose_rgba(r, g, b, a))
    }

    /// Verify that every pixel value of `pix` indexes an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] for the first pixel value that
    /// is `>= len()`.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapIsValid()` in `colormap.c`
    pub fn check_indices(&self, pix: &Pix) -> Result<()> {
        let len = self.len();
        // Every index representable at this depth is valid
        if len >= 1usize << pix.depth().bits().min(16) {
            return Ok(());
        }
        for y in 0..pix.height() {
            for x in 0..pix.width() {
                let index = pix.get_pixel_unchecked(x, y) as usize;
                if index >= len {
                    return Err(Error::IndexOutOfBounds { index, len });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::{PixMut, PixelDepth};

    #[test]
    fn test_has_color() {
        let mut cmap = PixColormap::new(2).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        cmap.add_rgb(200, 200, 200).unwrap();
        assert!(!cmap.has_color());
        assert!(cmap.is_grayscale());
        assert_eq!(cmap.count_gray_colors(), 2);

        cmap.add_rgb(200, 200, 201).unwrap();
        assert!(cmap.has_color());
        assert_eq!(cmap.get_index(200, 200, 201), Some(2));
        assert_eq!(cmap.get_index(1, 1, 1), None);
    }

    #[test]
    fn test_packed_accessors() {
        let mut cmap = PixColormap::new(4).unwrap();
        cmap.add_rgba(0x12, 0x34, 0x56, 0x78).unwrap();
        assert_eq!(cmap.get_color32(0), Some(0x123456ff));
        assert_eq!(cmap.get_rgba32(0), Some(0x12345678));
        assert_eq!(cmap.get_color32(1), None);
    }

    #[test]
    fn test_check_indices() {
        let mut pm = PixMut::new(3, 2, PixelDepth::Bit2).unwrap();
        pm.set_pixel(2, 1, 2).unwrap();
        let pix: Pix = pm.into();

        let mut cmap = PixColormap::new(2).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        cmap.add_rgb(9, 9, 9).unwrap();
        assert!(matches!(
            cmap.check_indices(&pix),
            Err(Error::IndexOutOfBounds { index: 2, len: 2 })
        ));
        cmap.add_rgb(10, 10, 10).unwrap();
        assert!(cmap.check_indices(&pix).is_ok());
    }
}
