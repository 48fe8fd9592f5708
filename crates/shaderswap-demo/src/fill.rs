//! Fill patterns that write pixel data into a locked texture region.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use shaderswap_engine::render::{PixelRegion, BYTES_PER_PIXEL};

const OPAQUE: u8 = 255;
const BLACK: [u8; 4] = [0, 0, 0, OPAQUE];
const WHITE: [u8; 4] = [OPAQUE, OPAQUE, OPAQUE, OPAQUE];

/// Pixel content of a demo texture.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Pattern {
    /// Random opaque RGB; the same seed and frame give the same pixels.
    Noise { seed: u64 },
    /// Black and white squares of `cell` pixels, white at the origin.
    Checkerboard { cell: u32 },
    /// Black background with the frame index encoded in pixel (0, 0).
    Counter,
    /// Mandelbrot set, escape time mapped to a color ramp.
    Fractal { max_iter: u32 },
}

impl Pattern {
    pub fn fill(&self, region: &mut PixelRegion<'_>, frame_index: u64) {
        match *self {
            Pattern::Noise { seed } => noise(region, seed ^ frame_index),
            Pattern::Checkerboard { cell } => checkerboard(region, cell.max(1)),
            Pattern::Counter => counter(region, frame_index),
            Pattern::Fractal { max_iter } => fractal(region, max_iter.max(1)),
        }
    }
}

fn noise(region: &mut PixelRegion<'_>, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    for y in 0..region.height() {
        let row = region.row_mut(y);
        rng.fill_bytes(row);
        for px in row.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[3] = OPAQUE;
        }
    }
}

fn checkerboard(region: &mut PixelRegion<'_>, cell: u32) {
    for y in 0..region.height() {
        for x in 0..region.width() {
            let even = (x / cell + y / cell) % 2 == 0;
            region.put_pixel(x, y, if even { WHITE } else { BLACK });
        }
    }
}

fn counter(region: &mut PixelRegion<'_>, frame_index: u64) {
    region.fill(BLACK);
    let [r, g, b, ..] = frame_index.to_le_bytes();
    region.put_pixel(0, 0, [r, g, b, OPAQUE]);
}

/// Complex-plane window shown by the fractal pattern.
const RE_RANGE: (f32, f32) = (-2.5, 1.0);
const IM_RANGE: (f32, f32) = (-1.2, 1.2);

fn fractal(region: &mut PixelRegion<'_>, max_iter: u32) {
    let (w, h) = (region.width(), region.height());
    for y in 0..h {
        let ci = IM_RANGE.0 + (y as f32 / h as f32) * (IM_RANGE.1 - IM_RANGE.0);
        for x in 0..w {
            let cr = RE_RANGE.0 + (x as f32 / w as f32) * (RE_RANGE.1 - RE_RANGE.0);
            let n = escape_time(cr, ci, max_iter);
            region.put_pixel(x, y, ramp(n, max_iter));
        }
    }
}

/// Iterations before |z| exceeds 2, or `max_iter` if it never does.
fn escape_time(cr: f32, ci: f32, max_iter: u32) -> u32 {
    let (mut zr, mut zi) = (0.0f32, 0.0f32);
    for i in 0..max_iter {
        if zr * zr + zi * zi > 4.0 {
            return i;
        }
        let t = zr * zr - zi * zi + cr;
        zi = 2.0 * zr * zi + ci;
        zr = t;
    }
    max_iter
}

/// Points inside the set are black; escaping points get a blue-to-orange ramp.
fn ramp(n: u32, max_iter: u32) -> [u8; 4] {
    if n >= max_iter {
        return BLACK;
    }
    let t = n as f32 / max_iter as f32;
    let s = 1.0 - t;
    let r = 9.0 * s * t * t * t;
    let g = 15.0 * s * s * t * t;
    let b = 8.5 * s * s * s * t;
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    [to_u8(r), to_u8(g), to_u8(b), OPAQUE]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(w: u32, h: u32) -> Vec<u8> {
        vec![0; (w * h) as usize * BYTES_PER_PIXEL]
    }

    fn pixel(buf: &[u8], w: u32, x: u32, y: u32) -> [u8; 4] {
        let i = (y * w + x) as usize * BYTES_PER_PIXEL;
        [buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]
    }

    fn render(pattern: Pattern, w: u32, h: u32, frame: u64) -> Vec<u8> {
        let mut buf = buffer(w, h);
        let mut region = PixelRegion::new(&mut buf, w as usize * BYTES_PER_PIXEL, w, h).unwrap();
        pattern.fill(&mut region, frame);
        buf
    }

    // ── noise ─────────────────────────────────────────────────────────────

    #[test]
    fn noise_is_opaque_and_reproducible() {
        let a = render(Pattern::Noise { seed: 7 }, 16, 8, 0);
        let b = render(Pattern::Noise { seed: 7 }, 16, 8, 0);
        assert_eq!(a, b);
        assert!(a.chunks_exact(4).all(|px| px[3] == OPAQUE));
    }

    #[test]
    fn noise_changes_with_frame() {
        let a = render(Pattern::Noise { seed: 7 }, 16, 8, 0);
        let b = render(Pattern::Noise { seed: 7 }, 16, 8, 1);
        assert_ne!(a, b);
    }

    // ── checkerboard ──────────────────────────────────────────────────────

    #[test]
    fn checkerboard_alternates_cells() {
        let buf = render(Pattern::Checkerboard { cell: 2 }, 8, 8, 0);
        assert_eq!(pixel(&buf, 8, 0, 0), WHITE);
        assert_eq!(pixel(&buf, 8, 1, 1), WHITE);
        assert_eq!(pixel(&buf, 8, 2, 0), BLACK);
        assert_eq!(pixel(&buf, 8, 0, 2), BLACK);
        assert_eq!(pixel(&buf, 8, 2, 2), WHITE);
    }

    #[test]
    fn checkerboard_zero_cell_is_treated_as_one() {
        let buf = render(Pattern::Checkerboard { cell: 0 }, 2, 1, 0);
        assert_eq!(pixel(&buf, 2, 0, 0), WHITE);
        assert_eq!(pixel(&buf, 2, 1, 0), BLACK);
    }

    // ── counter ───────────────────────────────────────────────────────────

    #[test]
    fn counter_encodes_frame_in_first_pixel() {
        let buf = render(Pattern::Counter, 4, 4, 0x01_0203);
        assert_eq!(pixel(&buf, 4, 0, 0), [0x03, 0x02, 0x01, OPAQUE]);
        assert_eq!(pixel(&buf, 4, 1, 0), BLACK);
        assert_eq!(pixel(&buf, 4, 3, 3), BLACK);
    }

    // ── fractal ───────────────────────────────────────────────────────────

    #[test]
    fn escape_time_inside_and_outside() {
        assert_eq!(escape_time(0.0, 0.0, 50), 50);
        assert!(escape_time(2.0, 2.0, 50) < 3);
    }

    #[test]
    fn fractal_interior_is_black() {
        // Pixel (36, 24) of a 64x48 region lies at about (-0.53, 0.0).
        let buf = render(Pattern::Fractal { max_iter: 32 }, 64, 48, 0);
        assert_eq!(pixel(&buf, 64, 36, 24), BLACK);
        assert!(buf.chunks_exact(4).any(|px| px[..3] != [0, 0, 0]));
    }

    #[test]
    fn ramp_is_opaque() {
        for n in 0..=16 {
            assert_eq!(ramp(n, 16)[3], OPAQUE);
        }
    }
}
