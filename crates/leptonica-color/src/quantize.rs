//! Colormap quantization
//!
//! Converts 32 bpp RGB and 2/4/8 bpp gray images to colormapped form:
//! - Exact conversion through an octcube histogram, for images with at
//!   most 256 occupied octcubes
//! - Approximate octree quantization, used as the fallback when there are
//!   too many colors
//! - Lossless gray to colormap conversion
//!
//! # See also
//!
//! C Leptonica: `pixconv.c`, `colorquant1.c`

use crate::{ColorError, ColorResult};
use leptonica_core::pix::{get_data_byte, get_data_dibit, get_data_qbit, set_data_byte};
use leptonica_core::{Diagnosed, Pix, PixColormap, PixMut, PixelDepth, color};

/// Number of colors requested from the octree quantizer when exact
/// conversion is impossible.
pub const FALLBACK_COLORS: u32 = 220;

/// Deepest octcube level supported by [`rgb_to_index_tables`].
pub const MAX_OCTCUBE_LEVEL: u32 = 6;

fn require_depth(pix: &Pix, depth: PixelDepth, expected: &'static str) -> ColorResult<()> {
    if pix.depth() != depth {
        return Err(ColorError::UnsupportedDepth {
            expected,
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

// =============================================================================
// Octcube indexing
// =============================================================================

/// Lookup tables mapping each color component to its octcube index bits.
///
/// The octcube index of `(r, g, b)` is `rtab[r] | gtab[g] | btab[b]`.
#[derive(Debug, Clone)]
pub struct RgbIndexTables {
    pub rtab: [u32; 256],
    pub gtab: [u32; 256],
    pub btab: [u32; 256],
    level: u32,
}

impl RgbIndexTables {
    /// Octcube level the tables were built for.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Number of octcubes at this level (`2^(3 * level)`).
    pub fn num_cubes(&self) -> usize {
        1 << (3 * self.level)
    }

    /// Octcube index of a color.
    #[inline]
    pub fn index(&self, r: u8, g: u8, b: u8) -> usize {
        (self.rtab[r as usize] | self.gtab[g as usize] | self.btab[b as usize]) as usize
    }

    /// Octcube index of a 32-bit RGBA pixel.
    #[inline]
    pub fn index_of_pixel(&self, pixel: u32) -> usize {
        let (r, g, b) = color::extract_rgb(pixel);
        self.index(r, g, b)
    }
}

/// Build the component-to-octcube tables for `level` (1 to 6).
///
/// The top `level` bits of r, g and b are interleaved with red most
/// significant, so bit `k` from the top of each component lands in bit
/// `3 * (level - 1 - k) + {2, 1, 0}` of the index.
///
/// # See also
///
/// C Leptonica: `makeRGBToIndexTables()` in `colorquant1.c`
pub fn rgb_to_index_tables(level: u32) -> ColorResult<RgbIndexTables> {
    if !(1..=MAX_OCTCUBE_LEVEL).contains(&level) {
        return Err(ColorError::InvalidParameters(format!(
            "octcube level {level} not in [1, {MAX_OCTCUBE_LEVEL}]"
        )));
    }

    let spread = |v: usize, lane: u32| -> u32 {
        (0..level).fold(0, |acc, k| {
            let bit = (v as u32 >> (7 - k)) & 1;
            acc | (bit << (3 * (level - 1 - k) + lane))
        })
    };
    Ok(RgbIndexTables {
        rtab: core::array::from_fn(|v| spread(v, 2)),
        gtab: core::array::from_fn(|v| spread(v, 1)),
        btab: core::array::from_fn(|v| spread(v, 0)),
        level,
    })
}

/// Count the pixels of a 32 bpp image in each octcube at `level`.
///
/// # See also
///
/// C Leptonica: `pixOctcubeHistogram()` in `colorquant1.c`
pub fn octcube_histogram(pix: &Pix, level: u32) -> ColorResult<Vec<u32>> {
    require_depth(pix, PixelDepth::Bit32, "32 bpp")?;
    let tabs = rgb_to_index_tables(level)?;
    Ok(histogram_with(pix, &tabs))
}

fn histogram_with(pix: &Pix, tabs: &RgbIndexTables) -> Vec<u32> {
    let mut hist = vec![0u32; tabs.num_cubes()];
    for y in 0..pix.height() {
        for &pixel in pix.row_data(y) {
            hist[tabs.index_of_pixel(pixel)] += 1;
        }
    }
    hist
}

// =============================================================================
// Exact RGB to colormap conversion
// =============================================================================

/// Result of [`convert_rgb_to_colormap`].
#[derive(Debug, Clone)]
pub struct ColormapConversion {
    /// Colormapped image (2, 4 or 8 bpp)
    pub pix: Pix,
    /// Pixels whose color was not reproduced exactly because another
    /// color claimed their octcube first. `None` when the octree fallback
    /// was used.
    pub collisions: Option<u32>,
}

/// Convert a 32 bpp RGB image with few colors to a colormapped image.
///
/// Each occupied octcube at `level` gets one colormap entry: the color of
/// the first pixel, in raster order, that falls into it. Later pixels in
/// the same octcube map to that entry; those whose full 32-bit value
/// differs from it are counted as collisions. The output depth is 2 bpp
/// for up to 4 entries, 4 bpp for up to 16 and 8 bpp otherwise.
///
/// With more than 256 occupied octcubes the image is passed to
/// [`octree_color_quant`] with [`FALLBACK_COLORS`] colors and dithering, and
/// a warning is attached.
///
/// # See also
///
/// C Leptonica: `pixConvertRGBToColormap()` in `pixconv.c`
pub fn convert_rgb_to_colormap(
    pix: &Pix,
    level: u32,
) -> ColorResult<Diagnosed<ColormapConversion>> {
    require_depth(pix, PixelDepth::Bit32, "32 bpp")?;
    let tabs = rgb_to_index_tables(level)?;

    let ncolors = histogram_with(pix, &tabs).iter().filter(|&&n| n > 0).count();
    if ncolors > 256 {
        let quantized = octree_color_quant(pix, FALLBACK_COLORS, true)?;
        return Ok(Diagnosed::warned(
            ColormapConversion {
                pix: quantized,
                collisions: None,
            },
            "convert_rgb_to_colormap",
            format!("{ncolors} colors; using octree quantization"),
        ));
    }

    let depth = if ncolors <= 4 {
        PixelDepth::Bit2
    } else if ncolors <= 16 {
        PixelDepth::Bit4
    } else {
        PixelDepth::Bit8
    };

    // Octcube -> colormap index + 1; 0 marks an unclaimed cube
    let mut octarray = vec![0u32; tabs.num_cubes()];
    let mut winners: Vec<u32> = Vec::with_capacity(ncolors);
    let mut collisions = 0u32;
    let mut pm = PixMut::new(pix.width(), pix.height(), depth)?;
    pm.copy_resolution_from(pix);
    for y in 0..pix.height() {
        for (x, &pixel) in pix.row_data(y).iter().enumerate() {
            let cube = tabs.index_of_pixel(pixel);
            let index = match octarray[cube] {
                0 => {
                    winners.push(pixel);
                    octarray[cube] = winners.len() as u32;
                    winners.len() - 1
                }
                claimed => {
                    let index = claimed as usize - 1;
                    if winners[index] != pixel {
                        collisions += 1;
                    }
                    index
                }
            };
            pm.set_pixel_unchecked(x as u32, y, index as u32);
        }
    }

    let mut cmap = PixColormap::new(depth.bits())?;
    for &pixel in &winners {
        let (r, g, b) = color::extract_rgb(pixel);
        cmap.add_rgb(r, g, b)?;
    }
    pm.set_colormap(Some(cmap))?;

    Ok(Diagnosed::clean(ColormapConversion {
        pix: pm.into(),
        collisions: Some(collisions),
    }))
}

// =============================================================================
// Octree quantization
// =============================================================================

/// Depth of octree leaves; each leaf covers a 4x4x4 block of RGB values.
const OCTREE_DEPTH: usize = 6;

#[derive(Debug, Clone, Default)]
struct OctreeNode {
    sums: [u64; 3],
    count: u64,
    children: [Option<u32>; 8],
    is_leaf: bool,
    palette_index: usize,
}

/// Octree stored in an arena; nodes refer to their children by index.
struct Octree {
    nodes: Vec<OctreeNode>,
    leaf_count: usize,
    reducible: [Vec<u32>; OCTREE_DEPTH],
}

#[inline]
fn child_slot(r: u8, g: u8, b: u8, level: usize) -> usize {
    let shift = 7 - level;
    let rb = ((r >> shift) & 1) as usize;
    let gb = ((g >> shift) & 1) as usize;
    let bb = ((b >> shift) & 1) as usize;
    (rb << 2) | (gb << 1) | bb
}

impl Octree {
    fn new() -> Self {
        Self {
            nodes: vec![OctreeNode::default()],
            leaf_count: 0,
            reducible: Default::default(),
        }
    }

    fn add_color(&mut self, r: u8, g: u8, b: u8) {
        let mut node = 0usize;
        let mut level = 0usize;
        loop {
            if level == OCTREE_DEPTH || self.nodes[node].is_leaf {
                let n = &mut self.nodes[node];
                n.sums[0] += r as u64;
                n.sums[1] += g as u64;
                n.sums[2] += b as u64;
                n.count += 1;
                if !n.is_leaf {
                    n.is_leaf = true;
                    self.leaf_count += 1;
                }
                return;
            }

            let slot = child_slot(r, g, b, level);
            node = match self.nodes[node].children[slot] {
                Some(child) => child as usize,
                None => {
                    if self.nodes[node].children.iter().all(Option::is_none) {
                        self.reducible[level].push(node as u32);
                    }
                    let child = self.nodes.len();
                    self.nodes.push(OctreeNode::default());
                    self.nodes[node].children[slot] = Some(child as u32);
                    child
                }
            };
            level += 1;
        }
    }

    /// Merge the children of the most recently split node at the deepest
    /// level that still has one.
    fn reduce(&mut self) -> bool {
        for level in (0..OCTREE_DEPTH).rev() {
            if let Some(node) = self.reducible[level].pop() {
                let node = node as usize;
                let children = std::mem::take(&mut self.nodes[node].children);
                let mut merged = 0;
                for child in children.into_iter().flatten() {
                    let c = std::mem::take(&mut self.nodes[child as usize]);
                    let n = &mut self.nodes[node];
                    for (s, cs) in n.sums.iter_mut().zip(c.sums) {
                        *s += cs;
                    }
                    n.count += c.count;
                    if c.is_leaf {
                        merged += 1;
                    }
                }
                self.nodes[node].is_leaf = true;
                self.leaf_count = self.leaf_count + 1 - merged;
                return true;
            }
        }
        false
    }

    /// Assign palette indices to leaves in tree order; returns mean colors.
    fn build_palette(&mut self) -> Vec<(u8, u8, u8)> {
        let mut palette = Vec::with_capacity(self.leaf_count);
        let mut stack = vec![0usize];
        while let Some(node) = stack.pop() {
            let n = &mut self.nodes[node];
            if n.is_leaf {
                if n.count > 0 {
                    let mean = |s: u64| ((s + n.count / 2) / n.count) as u8;
                    n.palette_index = palette.len();
                    palette.push((mean(n.sums[0]), mean(n.sums[1]), mean(n.sums[2])));
                }
                continue;
            }
            // Reverse so that slot 0 is visited first
            stack.extend(n.children.iter().rev().flatten().map(|&c| c as usize));
        }
        palette
    }

    /// Palette index of the leaf containing a color, if the color's path
    /// exists in the tree.
    fn lookup(&self, r: u8, g: u8, b: u8) -> Option<usize> {
        let mut node = 0usize;
        for level in 0..=OCTREE_DEPTH {
            let n = &self.nodes[node];
            if n.is_leaf {
                return Some(n.palette_index);
            }
            if level == OCTREE_DEPTH {
                break;
            }
            node = n.children[child_slot(r, g, b, level)]? as usize;
        }
        None
    }
}

fn nearest_in_palette(palette: &[(u8, u8, u8)], r: i32, g: i32, b: i32) -> usize {
    palette
        .iter()
        .enumerate()
        .min_by_key(|&(_, &(pr, pg, pb))| {
            let (dr, dg, db) = (pr as i32 - r, pg as i32 - g, pb as i32 - b);
            dr * dr + dg * dg + db * db
        })
        .map_or(0, |(i, _)| i)
}

/// Quantize a 32 bpp image to at most `colors` colors with an octree.
///
/// Leaves are merged deepest-first until at most `colors` remain; each
/// palette entry is the mean color of the pixels in its leaf. With
/// `dither`, Floyd-Steinberg error diffusion (weights 7, 3, 5, 1 over 16)
/// is applied while mapping pixels.
///
/// The output is always 8 bpp with a colormap.
///
/// # Errors
///
/// Returns an error if `pix` is not 32 bpp or `colors` is not in
/// `2..=256`.
///
/// # See also
///
/// C Leptonica: `pixOctreeColorQuant()` in `colorquant1.c`
pub fn octree_color_quant(pix: &Pix, colors: u32, dither: bool) -> ColorResult<Pix> {
    require_depth(pix, PixelDepth::Bit32, "32 bpp")?;
    if !(2..=256).contains(&colors) {
        return Err(ColorError::InvalidParameters(format!(
            "colors {colors} not in [2, 256]"
        )));
    }

    let (w, h) = (pix.width(), pix.height());
    let mut octree = Octree::new();
    for y in 0..h {
        for &pixel in pix.row_data(y) {
            let (r, g, b) = color::extract_rgb(pixel);
            octree.add_color(r, g, b);
            while octree.leaf_count > colors as usize && octree.reduce() {}
        }
    }
    let palette = octree.build_palette();

    let mut cmap = PixColormap::new(8)?;
    for &(r, g, b) in &palette {
        cmap.add_rgb(r, g, b)?;
    }
    let mut pm = PixMut::new(w, h, PixelDepth::Bit8)?;
    pm.copy_resolution_from(pix);

    if !dither {
        for y in 0..h {
            let src = pix.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &pixel) in src.iter().enumerate() {
                let (r, g, b) = color::extract_rgb(pixel);
                let index = octree
                    .lookup(r, g, b)
                    .unwrap_or_else(|| nearest_in_palette(&palette, r as i32, g as i32, b as i32));
                set_data_byte(dst, x as u32, index as u32);
            }
        }
    } else {
        // Error rows are padded by one on each side; values are 16x the error
        let width = w as usize;
        let mut cur = vec![[0i32; 3]; width + 2];
        let mut next = vec![[0i32; 3]; width + 2];
        for y in 0..h {
            let src = pix.row_data(y);
            let dst = pm.row_data_mut(y);
            for (x, &pixel) in src.iter().enumerate() {
                let (r, g, b) = color::extract_rgb(pixel);
                let want: [i32; 3] = core::array::from_fn(|c| {
                    let v = [r, g, b][c] as i32;
                    (v + cur[x + 1][c] / 16).clamp(0, 255)
                });
                let index = octree
                    .lookup(want[0] as u8, want[1] as u8, want[2] as u8)
                    .unwrap_or_else(|| nearest_in_palette(&palette, want[0], want[1], want[2]));
                set_data_byte(dst, x as u32, index as u32);

                let (pr, pg, pb) = palette[index];
                let got = [pr as i32, pg as i32, pb as i32];
                for c in 0..3 {
                    let err = want[c] - got[c];
                    cur[x + 2][c] += 7 * err;
                    next[x][c] += 3 * err;
                    next[x + 1][c] += 5 * err;
                    next[x + 2][c] += err;
                }
            }
            std::mem::swap(&mut cur, &mut next);
            next.iter_mut().for_each(|e| *e = [0; 3]);
        }
    }

    pm.set_colormap(Some(cmap))?;
    Ok(pm.into())
}

// =============================================================================
// Gray to colormap
// =============================================================================

/// Convert a 2, 4 or 8 bpp gray image to a colormapped image.
///
/// 8 bpp images go through [`convert_gray_to_colormap_8`] with a minimum
/// depth of 2. 2 and 4 bpp images are first expanded to 8 bpp with equally
/// spaced values (`255 * v / 3`, `255 * v / 15`) and converted back at their
/// own depth. An image that already has a colormap is returned as a copy
/// with a warning.
///
/// # See also
///
/// C Leptonica: `pixConvertGrayToColormap()` in `pixconv.c`
pub fn convert_gray_to_colormap(pix: &Pix) -> ColorResult<Diagnosed<Pix>> {
    let depth = pix.depth();
    let levels = match depth {
        PixelDepth::Bit2 => 3,
        PixelDepth::Bit4 => 15,
        PixelDepth::Bit8 => 0,
        _ => {
            return Err(ColorError::UnsupportedDepth {
                expected: "2, 4 or 8 bpp",
                actual: depth.bits(),
            });
        }
    };
    if pix.has_colormap() {
        return Ok(Diagnosed::warned(
            pix.clone(),
            "convert_gray_to_colormap",
            "image already has a colormap",
        ));
    }
    if depth == PixelDepth::Bit8 {
        return convert_gray_to_colormap_8(pix, 2);
    }

    let mut expanded = PixMut::new(pix.width(), pix.height(), PixelDepth::Bit8)?;
    expanded.copy_resolution_from(pix);
    for y in 0..pix.height() {
        let src = pix.row_data(y);
        let dst = expanded.row_data_mut(y);
        for x in 0..pix.width() {
            let v = if depth == PixelDepth::Bit2 {
                get_data_dibit(src, x)
            } else {
                get_data_qbit(src, x)
            };
            set_data_byte(dst, x, 255 * v / levels);
        }
    }
    convert_gray_to_colormap_8(&expanded.into(), depth.bits())
}

/// Convert an 8 bpp gray image to a colormapped image without loss.
///
/// The colormap holds one gray entry per gray value present in the image,
/// in ascending order. The output depth is the smallest of 2, 4 and 8 that
/// is at least `mindepth` and holds all values. An invalid `mindepth` is
/// replaced by 8 with a warning; an image that already has a colormap is
/// returned as a copy with a warning.
///
/// # See also
///
/// C Leptonica: `pixConvertGrayToColormap8()` in `pixconv.c`
pub fn convert_gray_to_colormap_8(pix: &Pix, mindepth: u32) -> ColorResult<Diagnosed<Pix>> {
    require_depth(pix, PixelDepth::Bit8, "8 bpp")?;
    let mut result = Diagnosed::clean(());
    let mindepth = if matches!(mindepth, 2 | 4 | 8) {
        mindepth
    } else {
        result.warn(
            "convert_gray_to_colormap_8",
            format!("invalid mindepth {mindepth}; using 8"),
        );
        8
    };
    if pix.has_colormap() {
        result.warn("convert_gray_to_colormap_8", "image already has a colormap");
        return Ok(result.map(|_| pix.clone()));
    }

    let mut hist = [0u32; 256];
    for y in 0..pix.height() {
        let line = pix.row_data(y);
        for x in 0..pix.width() {
            hist[get_data_byte(line, x) as usize] += 1;
        }
    }
    let ncolors = hist.iter().filter(|&&n| n > 0).count();
    let depth = if mindepth == 8 || ncolors > 16 {
        PixelDepth::Bit8
    } else if mindepth == 4 || ncolors > 4 {
        PixelDepth::Bit4
    } else {
        PixelDepth::Bit2
    };

    let mut cmap = PixColormap::new(depth.bits())?;
    let mut index_of = [0u32; 256];
    for (value, _) in hist.iter().enumerate().filter(|(_, n)| **n > 0) {
        index_of[value] = cmap.add_color(leptonica_core::RgbaQuad::gray(value as u8))? as u32;
    }

    let mut pm = PixMut::new(pix.width(), pix.height(), depth)?;
    pm.copy_resolution_from(pix);
    for y in 0..pix.height() {
        let line = pix.row_data(y);
        for x in 0..pix.width() {
            pm.set_pixel_unchecked(x, y, index_of[get_data_byte(line, x) as usize]);
        }
    }
    pm.set_colormap(Some(cmap))?;
    Ok(result.map(|_| pm.into()))
}
