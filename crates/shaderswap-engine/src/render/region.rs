use super::BYTES_PER_PIXEL;

/// Locked pixel memory handed to a fill routine.
///
/// Rows are `pitch` bytes apart; each row holds `width` RGBA8 pixels followed
/// by padding (if any).
pub struct PixelRegion<'a> {
    pixels: &'a mut [u8],
    pitch: usize,
    width: u32,
    height: u32,
}

impl<'a> PixelRegion<'a> {
    /// Wraps caller memory. Returns `None` if `pixels` cannot hold the region.
    pub fn new(pixels: &'a mut [u8], pitch: usize, width: u32, height: u32) -> Option<Self> {
        let row = width as usize * BYTES_PER_PIXEL;
        if pitch < row || pixels.len() < pitch * height as usize {
            return None;
        }
        Some(Self::from_parts(pixels, pitch, width, height))
    }

    pub(crate) fn from_parts(pixels: &'a mut [u8], pitch: usize, width: u32, height: u32) -> Self {
        debug_assert!(pixels.len() >= pitch * height as usize);
        Self {
            pixels,
            pitch,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes between the starts of two rows.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn pixels(&self) -> &[u8] {
        &*self.pixels
    }

    /// Pixel bytes of row `y`, without padding.
    ///
    /// Panics if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of range (height {})", self.height);
        let start = y as usize * self.pitch;
        &mut self.pixels[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Writes one RGBA pixel. Out-of-range coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y as usize * self.pitch + x as usize * BYTES_PER_PIXEL;
        self.pixels[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Sets every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for y in 0..self.height {
            for px in self.row_mut(y).chunks_exact_mut(BYTES_PER_PIXEL) {
                px.copy_from_slice(&rgba);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_short_buffers() {
        let mut buf = vec![0u8; 15];
        assert!(PixelRegion::new(&mut buf, 8, 2, 2).is_none());
    }

    #[test]
    fn new_rejects_pitch_narrower_than_row() {
        let mut buf = vec![0u8; 64];
        assert!(PixelRegion::new(&mut buf, 4, 2, 2).is_none());
    }

    #[test]
    fn put_pixel_honours_pitch() {
        // 2x2 region with 4 bytes of padding per row.
        let mut buf = vec![0u8; 24];
        let mut region = PixelRegion::new(&mut buf, 12, 2, 2).unwrap();
        region.put_pixel(1, 1, [1, 2, 3, 4]);
        assert_eq!(&buf[16..20], &[1, 2, 3, 4]);
    }

    #[test]
    fn put_pixel_out_of_range_is_ignored() {
        let mut buf = vec![0u8; 16];
        let mut region = PixelRegion::new(&mut buf, 8, 2, 2).unwrap();
        region.put_pixel(2, 0, [9; 4]);
        region.put_pixel(0, 2, [9; 4]);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn fill_leaves_padding_untouched() {
        let mut buf = vec![0u8; 24];
        let mut region = PixelRegion::new(&mut buf, 12, 2, 2).unwrap();
        region.fill([255, 0, 0, 255]);
        assert_eq!(&buf[0..8], &[255, 0, 0, 255, 255, 0, 0, 255]);
        assert_eq!(&buf[8..12], &[0, 0, 0, 0]);
        assert_eq!(&buf[20..24], &[0, 0, 0, 0]);
    }
}
