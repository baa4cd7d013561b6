//! Colormap quantization regression test
//!
//! C版: reference/leptonica/prog/colorquant_reg.c
//! オクトキューブによる正確なカラーマップ変換、オクトツリーへのフォールバック、
//! グレー画像のカラーマップ化をテスト。

use leptonica_color::{
    convert_gray_to_colormap, convert_gray_to_colormap_8, convert_rgb_to_colormap,
    octcube_histogram, octree_color_quant,
};
use leptonica_core::{PixelDepth, RemoveColormapTarget};
use leptonica_test::{RegParams, images};

/// `n` colors, each in its own level-6 octcube.
fn distinct_colors(n: usize) -> Vec<(u8, u8, u8)> {
    (0..n)
        .map(|i| {
            (
                ((i % 8) * 32) as u8,
                (((i / 8) % 8) * 32) as u8,
                ((i / 64) * 32 + 16) as u8,
            )
        })
        .collect()
}

#[test]
fn colorquant_reg() {
    let mut rp = RegParams::new("colorquant");

    // --- Test 1: few colors reproduce exactly, depth follows the count ---
    for (ncolors, depth) in [(3usize, 2u32), (12, 4), (200, 8)] {
        let colors = distinct_colors(ncolors);
        let pix = images::palette_image(40, 30, &colors).expect("palette image");
        let conv = convert_rgb_to_colormap(&pix, 6).expect("to colormap");
        rp.compare_values(0.0, conv.diagnostics().len() as f64, 0.0);
        let conv = conv.into_value();
        rp.compare_values(0.0, conv.collisions.unwrap_or(u32::MAX) as f64, 0.0);
        rp.compare_values(depth as f64, conv.pix.depth().bits() as f64, 0.0);
        let cmap_len = conv.pix.colormap().map_or(0, |c| c.len());
        rp.compare_values(ncolors as f64, cmap_len as f64, 0.0);

        // Removing the colormap gives back the source
        let restored = conv
            .pix
            .remove_colormap(RemoveColormapTarget::ToFullColor)
            .expect("restore")
            .into_value();
        rp.compare_pix(&pix, &restored);
    }

    // --- Test 2: two colors sharing an octcube collide ---
    let shared = [(100, 100, 100), (101, 100, 100), (0, 0, 0)];
    let pix = images::palette_image(9, 1, &shared).expect("shared");
    let conv = convert_rgb_to_colormap(&pix, 6).expect("shared conv").into_value();
    // Three pixels of (101, 100, 100) lose to (100, 100, 100)
    rp.compare_values(3.0, conv.collisions.unwrap_or(0) as f64, 0.0);
    rp.compare_values(2.0, conv.pix.colormap().map_or(0, |c| c.len()) as f64, 0.0);
    let hist = octcube_histogram(&pix, 6).expect("histogram");
    rp.compare_values(4096.0 * 64.0, hist.len() as f64, 0.0);
    rp.compare_values(6.0, hist.iter().copied().max().unwrap_or(0) as f64, 0.0);

    // --- Test 3: too many colors falls back to the octree quantizer ---
    let noise = images::rgb_noise(64, 64, 17).expect("noise");
    let conv = convert_rgb_to_colormap(&noise, 6).expect("fallback");
    rp.compare_values(1.0, if conv.has_warnings() { 1.0 } else { 0.0 }, 0.0);
    let conv = conv.into_value();
    rp.compare_values(1.0, if conv.collisions.is_none() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(8.0, conv.pix.depth().bits() as f64, 0.0);
    let n = conv.pix.colormap().map_or(0, |c| c.len());
    rp.compare_values(1.0, if (2..=220).contains(&n) { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: octree quantization of a smooth gradient ---
    let gradient = images::rgb_gradient(64, 64).expect("gradient");
    for dither in [false, true] {
        let quant = octree_color_quant(&gradient, 64, dither).expect("octree");
        let n = quant.colormap().map_or(0, |c| c.len());
        rp.compare_values(1.0, if n > 1 && n <= 64 { 1.0 } else { 0.0 }, 0.0);
        let approx = quant
            .remove_colormap(RemoveColormapTarget::ToFullColor)
            .expect("approx")
            .into_value();
        if dither {
            // Dithering preserves the average color
            let mean_red = |p: &leptonica_core::Pix| {
                p.data().iter().map(|&w| leptonica_core::color::red(w) as f64).sum::<f64>()
                    / p.data().len() as f64
            };
            rp.compare_values(mean_red(&gradient), mean_red(&approx), 4.0);
        } else {
            // Each leaf is at most a 32-wide cube around its mean
            rp.compare_pix_within(&gradient, &approx, 24);
        }
    }
    rp.compare_values(
        1.0,
        if octree_color_quant(&gradient, 1, false).is_err() { 1.0 } else { 0.0 },
        0.0,
    );

    // --- Test 5: gray to colormap ---
    let levels = images::from_fn(20, 5, PixelDepth::Bit8, |x, _| [0, 60, 200][(x % 3) as usize])
        .expect("levels");
    let cm = convert_gray_to_colormap_8(&levels, 2).expect("gray cmap").into_value();
    rp.compare_values(2.0, cm.depth().bits() as f64, 0.0);
    let entries: Vec<_> = cm.colormap().map_or(Vec::new(), |c| {
        (0..c.len()).filter_map(|i| c.get_rgb(i)).map(|(r, _, _)| r).collect()
    });
    rp.compare_strings(&[0, 60, 200], &entries);
    let back = cm
        .remove_colormap(RemoveColormapTarget::ToGrayscale)
        .expect("gray back")
        .into_value();
    rp.compare_pix(&levels, &back);

    let forced = convert_gray_to_colormap_8(&levels, 3).expect("bad mindepth");
    rp.compare_values(1.0, if forced.has_warnings() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(8.0, forced.value.depth().bits() as f64, 0.0);

    let qbits = images::from_fn(16, 2, PixelDepth::Bit4, |x, _| x).expect("4 bpp");
    let cm4 = convert_gray_to_colormap(&qbits).expect("4 bpp cmap").into_value();
    rp.compare_values(4.0, cm4.depth().bits() as f64, 0.0);
    rp.compare_values(
        1.0,
        if cm4.colormap().and_then(|c| c.get_rgb(15)) == Some((255, 255, 255)) { 1.0 } else { 0.0 },
        0.0,
    );

    assert!(rp.cleanup(), "colorquant regression test failed");
}
