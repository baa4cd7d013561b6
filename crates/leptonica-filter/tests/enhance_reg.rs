//! Tone reproduction curve regression test
//!
//! C版: reference/leptonica/prog/enhance_reg.c
//! ガンマ・コントラスト TRC の生成と、マスク付き適用をテスト。

use leptonica_core::{Pix, PixColormap, PixMut, PixelDepth, TrcLut, color};
use leptonica_filter::{
    contrast_trc, contrast_trc_in_place, contrast_trc_masked, gamma_trc, gamma_trc_masked,
    gamma_trc_masked_in_place, gamma_trc_pix, trc_map,
};
use leptonica_test::{RegParams, images};

fn as_bytes(lut: &TrcLut) -> Vec<u8> {
    lut.to_vec()
}

#[test]
fn enhance_reg() {
    let mut rp = RegParams::new("enhance");
    let identity: Vec<u8> = (0..=255).collect();

    // --- Test 1: identity curves ---
    let lut = gamma_trc(1.0, 0, 255).expect("gamma 1.0");
    rp.compare_strings(&identity, &as_bytes(&lut.value));
    let lut = contrast_trc(0.0);
    rp.compare_values(0.0, lut.diagnostics().len() as f64, 0.0);
    rp.compare_strings(&identity, &as_bytes(&lut.value));

    let ramp = images::gray_ramp(256, 4).expect("ramp");
    let same = gamma_trc_pix(&ramp, 1.0, 0, 255).expect("gamma pix").into_value();
    rp.compare_pix(&ramp, &same);

    // --- Test 2: corrected parameters are reported ---
    let lut = gamma_trc(-2.0, 0, 255).expect("bad gamma");
    rp.compare_values(1.0, lut.diagnostics().len() as f64, 0.0);
    rp.compare_strings(&identity, &as_bytes(&lut.value));
    rp.compare_values(1.0, if contrast_trc(-1.0).has_warnings() { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if gamma_trc(1.0, 10, 10).is_err() { 1.0 } else { 0.0 }, 0.0);

    // --- Test 3: applying T twice equals applying it once iff T o T = T ---
    let step: TrcLut = core::array::from_fn(|i| if i < 100 { 0 } else { 255 });
    let mut once = ramp.to_mut();
    trc_map(&mut once, None, &step).expect("step once");
    let once: Pix = once.into();
    let mut twice = once.to_mut();
    trc_map(&mut twice, None, &step).expect("step twice");
    rp.compare_values(1.0, if once.data() == twice.data() { 1.0 } else { 0.0 }, 0.0);

    let bright = gamma_trc(2.0, 0, 255).expect("gamma 2").into_value();
    let mut once = ramp.to_mut();
    trc_map(&mut once, None, &bright).expect("gamma once");
    let once: Pix = once.into();
    let mut twice = once.to_mut();
    trc_map(&mut twice, None, &bright).expect("gamma twice");
    rp.compare_values(0.0, if once.data() == twice.data() { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: 4x4 masked all-zero curve touches only the masked pixels ---
    let src = images::from_fn(4, 4, PixelDepth::Bit8, |x, y| 100 + 10 * y + x).expect("4x4");
    let mut mask = PixMut::new(4, 4, PixelDepth::Bit1).expect("mask");
    mask.set_pixel(0, 0, 1).expect("mask bit");
    mask.set_pixel(3, 3, 1).expect("mask bit");
    let mask: Pix = mask.into();
    let mut pm = src.to_mut();
    trc_map(&mut pm, Some(&mask), &[0u8; 256]).expect("masked zero");
    let mut ok = true;
    for y in 0..4 {
        for x in 0..4 {
            let expected = if (x, y) == (0, 0) || (x, y) == (3, 3) {
                0
            } else {
                src.get_pixel(x, y).unwrap()
            };
            ok &= pm.get_pixel(x, y) == Some(expected);
        }
    }
    rp.compare_values(1.0, if ok { 1.0 } else { 0.0 }, 0.0);

    // --- Test 5: masked gamma on RGB keeps alpha and unmasked pixels ---
    let rgb = images::from_fn(8, 8, PixelDepth::Bit32, |x, y| {
        color::compose_rgba(8 * x as u8, 8 * y as u8, 64, 200)
    })
    .expect("rgba");
    let half = images::from_fn(4, 8, PixelDepth::Bit1, |_, _| 1).expect("half mask");
    let out = gamma_trc_masked(&rgb, Some(&half), 2.0, 0, 255)
        .expect("masked gamma")
        .into_value();
    let lut = gamma_trc(2.0, 0, 255).expect("lut").into_value();
    let (_, _, b, a) = color::extract_rgba(out.get_pixel(1, 5).unwrap());
    rp.compare_values(lut[64] as f64, b as f64, 0.0);
    rp.compare_values(200.0, a as f64, 0.0);
    rp.compare_values(rgb.get_pixel(6, 5).unwrap() as f64, out.get_pixel(6, 5).unwrap() as f64, 0.0);

    let mut in_place = rgb.to_mut();
    gamma_trc_masked_in_place(&mut in_place, Some(&half), 2.0, 0, 255).expect("in place");
    let in_place: Pix = in_place.into();
    rp.compare_pix(&out, &in_place);

    // --- Test 6: colormapped images transform only the colormap ---
    let palette = [(10, 20, 30), (128, 128, 128), (240, 200, 10)];
    let cmapped = images::colormapped(6, 6, PixelDepth::Bit2, &palette).expect("cmapped");
    let mut pm = cmapped.to_mut();
    contrast_trc_in_place(&mut pm, 0.8).expect("contrast cmap");
    let lut = contrast_trc(0.8).into_value();
    rp.compare_values(1.0, if pm.data() == cmapped.data() { 1.0 } else { 0.0 }, 0.0);
    let entry = pm.colormap().and_then(|c| c.get_rgb(2));
    rp.compare_values(
        1.0,
        if entry == Some((lut[240], lut[200], lut[10])) { 1.0 } else { 0.0 },
        0.0,
    );
    let mask = images::from_fn(6, 6, PixelDepth::Bit1, |_, _| 1).expect("mask");
    rp.compare_values(
        1.0,
        if contrast_trc_masked(&cmapped, Some(&mask), 0.8).is_err() { 1.0 } else { 0.0 },
        0.0,
    );
    let mut cmap = PixColormap::new(8).expect("cmap");
    cmap.add_rgb(1, 2, 3).expect("entry");
    let mut pm8 = PixMut::new(2, 2, PixelDepth::Bit8).expect("8 bpp");
    pm8.set_colormap(Some(cmap)).expect("set cmap");
    rp.compare_values(1.0, if trc_map(&mut pm8, None, &lut).is_err() { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "enhance regression test failed");
}
