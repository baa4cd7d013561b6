//! Leptonica Color - Colorspace and colormap conversion
//!
//! This crate provides the color-aware conversions built on
//! [`leptonica_core`]:
//!
//! - **Color space conversion** ([`colorspace`]): RGB <-> HSV for images and colormaps
//! - **Color quantization** ([`quantize`]): Exact octcube conversion to a colormap,
//!   octree quantization, gray to colormap
//! - **Thresholding** ([`threshold`]): Binary conversion and requantization of 8 bpp gray

pub mod colorspace;
pub mod error;
pub mod quantize;
pub mod threshold;

// Re-export core types
pub use leptonica_core;

// Re-export error types
pub use error::{ColorError, ColorResult};

// Re-export color space functions
pub use colorspace::{
    pix_convert_hsv_to_rgb, pix_convert_hsv_to_rgb_in_place, pix_convert_rgb_to_hsv,
    pix_convert_rgb_to_hsv_in_place,
};

// Re-export quantization types and functions
pub use quantize::{
    // Types
    ColormapConversion,
    RgbIndexTables,
    // Functions
    convert_gray_to_colormap,
    convert_gray_to_colormap_8,
    convert_rgb_to_colormap,
    octcube_histogram,
    octree_color_quant,
    rgb_to_index_tables,
};

// Re-export threshold functions
pub use threshold::{threshold_8, threshold_to_binary};
