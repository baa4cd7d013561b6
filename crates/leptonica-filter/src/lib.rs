//! leptonica-filter - Tone mapping and sharpening
//!
//! This crate provides:
//!
//! - Gamma and contrast tone reproduction curves (TRC)
//! - TRC application to 8 and 32 bpp images, colormaps, and masked regions
//! - Block (box) convolution with a reusable integral image
//! - Unsharp masking and half-edge bandpass filtering

pub mod block_conv;
pub mod enhance;
mod error;

pub use error::{FilterError, FilterResult};

pub use block_conv::{blockconv, blockconv_accum, blockconv_gray};
pub use enhance::{
    contrast_trc, contrast_trc_in_place, contrast_trc_masked, contrast_trc_masked_in_place,
    contrast_trc_pix, gamma_trc, gamma_trc_in_place, gamma_trc_masked, gamma_trc_masked_in_place,
    gamma_trc_pix, half_edge_by_bandpass, trc_map, unsharp_mask, unsharp_mask_color,
    unsharp_mask_gray,
};
pub use leptonica_core::TrcLut;
