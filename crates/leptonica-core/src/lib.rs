//! Leptonica Core - Basic data structures for pixel-format conversion
//!
//! This crate provides the data structures and depth conversions used
//! throughout the workspace:
//!
//! - [`Pix`] / [`PixMut`] - The main image container (immutable / mutable)
//! - [`PixColormap`] - Color palette for indexed images
//! - [`color`] - 32-bit RGBA pixel helpers and HSV pixel math
//! - [`Diagnosed`] - A result value carrying recoverable warnings
//! - [`TrcLut`] - A 256-entry tone reproduction curve
//!
//! # See also
//!
//! C Leptonica: `pix.h`, `pixconv.c`, `colormap.c`

pub mod color;
pub mod colormap;
pub mod diagnostic;
pub mod error;
pub mod pix;

pub use colormap::{ColormapArrays, PixColormap, RgbaQuad};
pub use diagnostic::{Diagnosed, Diagnostic, Severity};
pub use error::{Error, Result};
pub use pix::{
    ArithOp, Convert16To8Type, Pix, PixMut, PixelDepth, RemoveColormapTarget, RgbComponent,
};

/// Tone reproduction curve: maps each 8-bit input value to an output value.
///
/// Applied per pixel to 8 bpp images, per R/G/B component to 32 bpp images,
/// and per entry to colormaps.
pub type TrcLut = [u8; 256];
