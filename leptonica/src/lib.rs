//! Leptonica - Pixel-format conversion and tone mapping for Rust
//!
//! A Rust port of the pixel conversion layer of the
//! [Leptonica](http://www.leptonica.org/) image processing library.
//!
//! # Overview
//!
//! - Colormap removal and depth conversion between 1, 2, 4, 8, 16 and
//!   32 bpp
//! - RGB to gray and RGB <-> HSV conversion
//! - Exact octcube colormap quantization with an octree fallback
//! - Gamma and contrast tone reproduction curves, optionally masked
//! - Unsharp masking
//!
//! Recoverable parameter problems are reported as [`Diagnostic`] values
//! attached to the result rather than printed.
//!
//! # Example
//!
//! ```
//! use leptonica::{Pix, PixelDepth};
//! use leptonica::filter::gamma_trc_pix;
//!
//! let pix = Pix::new(64, 48, PixelDepth::Bit8).unwrap();
//! let out = gamma_trc_pix(&pix, 1.0, 0, 255).unwrap();
//! assert!(out.is_clean());
//! assert_eq!(out.value.width(), 64);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use leptonica_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use leptonica_color as color;
pub use leptonica_filter as filter;
