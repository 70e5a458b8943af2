//! RGBA pixel buffers.

/// Fixed-size RGBA grid, row-major, four bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A black, fully opaque buffer.
    pub fn new(width: usize, height: usize) -> Self {
        let mut data = vec![0; width * height * 4];
        for pixel in data.chunks_exact_mut(4) {
            pixel[3] = 255;
        }
        PixelBuffer {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        let offset = self.offset(x, y)?;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.data[offset..offset + 4]);
        Some(rgba)
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
    }

    /// Write one pixel. Returns `false` when `(x, y)` is outside the grid.
    pub fn set_pixel(&mut self, x: usize, y: usize, rgba: [u8; 4]) -> bool {
        match self.offset(x, y) {
            Some(offset) => {
                self.data[offset..offset + 4].copy_from_slice(&rgba);
                true
            }
            None => false,
        }
    }

    fn offset(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * 4)
    }
}

/// Round to the nearest integer, then clamp into a channel byte.
///
/// Halves round away from zero (`127.5` stores as `128`). NaN stores as `0`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "value is clamped to 0..=255 first"
)]
pub fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_buffer_is_opaque_black() {
        let buffer = PixelBuffer::new(2, 3);
        assert_eq!(buffer.data().len(), 2 * 3 * 4);
        assert_eq!(buffer.pixel(1, 2), Some([0, 0, 0, 255]));
    }

    #[test]
    fn set_and_read_back() {
        let mut buffer = PixelBuffer::new(4, 4);
        assert!(buffer.set_pixel(3, 1, [1, 2, 3, 4]));
        assert_eq!(buffer.pixel(3, 1), Some([1, 2, 3, 4]));
        // Row-major: (3, 1) sits at index (1 * 4 + 3) * 4.
        assert_eq!(&buffer.data()[28..32], &[1, 2, 3, 4]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut buffer = PixelBuffer::new(4, 4);
        assert!(!buffer.set_pixel(4, 0, [9; 4]));
        assert!(!buffer.set_pixel(0, 4, [9; 4]));
        assert_eq!(buffer.pixel(4, 0), None);
    }

    #[test]
    fn fill_overwrites_everything() {
        let mut buffer = PixelBuffer::new(3, 2);
        buffer.fill([10, 20, 30, 40]);
        assert!(buffer.data().chunks_exact(4).all(|p| p == [10, 20, 30, 40]));
    }

    #[test]
    fn channels_round_then_clamp() {
        assert_eq!(clamp_channel(127.6), 128);
        assert_eq!(clamp_channel(127.4), 127);
        assert_eq!(clamp_channel(300.0), 255);
        assert_eq!(clamp_channel(-20.0), 0);
        assert_eq!(clamp_channel(f64::NAN), 0);
        assert_eq!(clamp_channel(f64::INFINITY), 255);
    }
}
