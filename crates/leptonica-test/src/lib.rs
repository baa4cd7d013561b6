//! leptonica-test - Regression test framework for Leptonica
//!
//! This crate provides a regression test framework similar to the C version's
//! regutils.c. All comparisons run in memory against values and images the
//! test computes itself; [`images`] builds the synthetic inputs.
//!
//! - **Compare**: Record failures and report them at cleanup (default)
//! - **Generate**: Same as compare; kept so existing scripts keep working
//! - **Display**: Also report every passing check
//!
//! # Usage
//!
//! ```
//! use leptonica_test::{RegParams, images};
//!
//! let mut rp = RegParams::new("doc");
//! let pix = images::gray_ramp(16, 4).unwrap();
//! rp.compare_values(16.0, pix.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "generate", "compare", or "display"

mod error;
pub mod images;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};
