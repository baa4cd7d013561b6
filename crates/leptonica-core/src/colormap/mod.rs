//! PixColormap - Color palette for indexed images
//!
//! A colormap is used with 1, 2, 4, and 8 bpp images to map
//! pixel values to RGBA colors. Every pixel value stored in a colormapped
//! image must be a valid index into its colormap.
//!
//! # See also
//!
//! C Leptonica: `colormap.c`

mod convert;
mod query;

pub use convert::ColormapArrays;

use crate::error::{Error, Result};

/// RGBA color entry
///
/// # See also
///
/// C Leptonica: `RGBA_QUAD` in `pix.h`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RgbaQuad {
    /// Blue component (stored first for BMP compatibility)
    pub blue: u8,
    /// Green component
    pub green: u8,
    /// Red component
    pub red: u8,
    /// Alpha component
    pub alpha: u8,
}

impl RgbaQuad {
    /// Create a new RGBA color
    pub fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an RGB color (alpha = 255)
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::new(red, green, blue, 255)
    }

    /// Create a grayscale color
    pub fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// True if the red, green and blue components differ.
    #[inline]
    pub fn is_color(&self) -> bool {
        self.red != self.green || self.green != self.blue
    }
}

/// Colormap for indexed images
///
/// # See also
///
/// C Leptonica: `PIXCMAP` in `pix.h`, `pixcmapCreate()` in `colormap.c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixColormap {
    colors: Vec<RgbaQuad>,
    depth: u32,
}

impl PixColormap {
    /// Create a new, empty colormap for the specified depth
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] unless depth is 1, 2, 4 or 8.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapCreate()`
    pub fn new(depth: u32) -> Result<Self> {
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidDepth(depth));
        }
        Ok(Self {
            colors: Vec::with_capacity(1 << depth),
            depth,
        })
    }

    /// Create a linear gray colormap with `levels` entries from black to white.
    ///
    /// Entry `i` has gray value `255 * i / (levels - 1)`.
    ///
    /// # Errors
    ///
    /// Returns an error if depth is invalid or `levels` is not in
    /// `2..=2^depth`.
    ///
    /// # See also
    ///
    /// C Leptonica: `pixcmapCreateLinear()`
    pub fn create_linear(depth: u32, levels: u32) -> Result<Self> {
        let mut cmap = Self::new(depth)?;
        if levels < 2 || levels as usize > cmap.max_entries() {
            return Err(Error::InvalidParameter(format!(
                "levels {levels} not in [2, {}]",
                cmap.max_entries()
            )));
        }
        for i in 0..levels {
            let val = (255 * i) / (levels - 1);
            cmap.add_color(RgbaQuad::gray(val as u8))?;
        }
        Ok(cmap)
    }

    /// Get the depth
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Get the number of colors
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get maximum number of entries (`2^depth`)
    #[inline]
    pub fn max_entries(&self) -> usize {
        1 << self.depth
    }

    /// True if no further entry can be added.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.max_entries()
    }

    /// Get a color by index
    pub fn get(&self, index: usize) -> Option<&RgbaQuad> {
        self.colors.get(index)
    }

    /// Get a mutable color by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut RgbaQuad> {
        self.colors.get_mut(index)
    }

    /// Add a color to the colormap, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColormapFull`] if the colormap already holds
    /// `2^depth` entries.
    pub fn add_color(&mut self, color: RgbaQuad) -> Result<usize> {
        if self.is_full() {
            return Err(Error::ColormapFull(self.colors.len()));
        }
        self.colors.push(color);
        Ok(self.colors.len() - 1)
    }

    /// Add an RGB color
    pub fn add_rgb(&mut self, r: u8, g: u8, b: u8) -> Result<usize> {
        self.add_color(RgbaQuad::rgb(r, g, b))
    }

    /// Add an RGBA color
    pub fn add_rgba(&mut self, r: u8, g: u8, b: u8, a: u8) -> Result<usize> {
        self.add_color(RgbaQuad::new(r, g, b, a))
    }

    /// Set a color at a specific index
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index >= len()`.
    pub fn set_color(&mut self, index: usize, color: RgbaQuad) -> Result<()> {
        let len = self.colors.len();
        let slot = self
            .colors
            .get_mut(index)
            .ok_or(Error::IndexOutOfBounds { index, len })?;
        *slot = color;
        Ok(())
    }

    /// Get RGB values at index
    pub fn get_rgb(&self, index: usize) -> Option<(u8, u8, u8)> {
        self.colors.get(index).map(|c| (c.red, c.green, c.blue))
    }

    /// Get RGBA values at index
    pub fn get_rgba(&self, index: usize) -> Option<(u8, u8, u8, u8)> {
        self.colors
            .get(index)
            .map(|c| (c.red, c.green, c.blue, c.alpha))
    }

    /// Get all colors as a slice
    pub fn colors(&self) -> &[RgbaQuad] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_depth() {
        assert!(PixColormap::new(8).is_ok());
        assert!(matches!(PixColormap::new(16), Err(Error::InvalidDepth(16))));
        assert!(PixColormap::new(3).is_err());
    }

    #[test]
    fn test_add_until_full() {
        let mut cmap = PixColormap::new(1).unwrap();
        assert_eq!(cmap.max_entries(), 2);
        assert_eq!(cmap.add_rgb(0, 0, 0).unwrap(), 0);
        assert_eq!(cmap.add_rgb(255, 255, 255).unwrap(), 1);
        assert!(cmap.is_full());
        assert!(matches!(cmap.add_rgb(1, 2, 3), Err(Error::ColormapFull(2))));
    }

    #[test]
    fn test_create_linear() {
        let cmap = PixColormap::create_linear(2, 4).unwrap();
        assert_eq!(cmap.len(), 4);
        let grays: Vec<u8> = cmap.colors().iter().map(|c| c.red).collect();
        assert_eq!(grays, vec![0, 85, 170, 255]);

        let cmap = PixColormap::create_linear(8, 256).unwrap();
        assert_eq!(cmap.get_rgb(128), Some((128, 128, 128)));

        assert!(PixColormap::create_linear(2, 5).is_err());
        assert!(PixColormap::create_linear(4, 1).is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut cmap = PixColormap::new(2).unwrap();
        cmap.add_rgba(10, 20, 30, 40).unwrap();
        assert_eq!(cmap.get_rgba(0), Some((10, 20, 30, 40)));
        cmap.set_color(0, RgbaQuad::rgb(1, 2, 3)).unwrap();
        assert_eq!(cmap.get_rgb(0), Some((1, 2, 3)));
        assert!(cmap.set_color(1, RgbaQuad::gray(0)).is_err());
        assert_eq!(cmap.get(5), None);
    }
}
