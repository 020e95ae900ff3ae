//! Decoded RGBA8 bitmap.
//!
//! The collaborator that decodes files hands the engine a [`Bitmap`] once per
//! editor session; the export path hands one back. Pixels are stored
//! row-major, top-to-bottom, 4 bytes per pixel:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//! ```

use crate::{Error, Result};

/// Bytes per pixel (RGBA8).
pub const BYTES_PER_PIXEL: usize = 4;

/// Owned RGBA8 image buffer.
///
/// # Example
///
/// ```rust
/// use darkroom_core::Bitmap;
///
/// let mut bmp = Bitmap::filled(4, 2, [10, 20, 30, 255]).unwrap();
/// bmp.set_pixel(1, 1, [255, 0, 0, 255]).unwrap();
/// assert_eq!(bmp.pixel(1, 1), Some([255, 0, 0, 255]));
/// assert_eq!(bmp.pixel(0, 0), Some([10, 20, 30, 255]));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Bitmap {
    /// Wraps an RGBA8 buffer, validating its size.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::byte_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch { expected, actual: data.len() });
        }
        Ok(Self { width, height, data })
    }

    /// Creates a bitmap filled with a single colour.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = Self::byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..len / BYTES_PER_PIXEL {
            data.extend_from_slice(&rgba);
        }
        Ok(Self { width, height, data })
    }

    /// Builds a bitmap by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Result<Self> {
        let len = Self::byte_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Ok(Self { width, height, data })
    }

    fn byte_len(width: u32, height: u32) -> Result<usize> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
            .ok_or(Error::InvalidDimensions { width, height })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 bytes.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw RGBA8 bytes.
    #[inline]
    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the bitmap, returning its bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Bytes in one row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// Returns the pixel at `(x, y)`, or `None` when outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let o = self.offset(x, y);
        Some([self.data[o], self.data[o + 1], self.data[o + 2], self.data[o + 3]])
    }

    /// Reads a pixel with edge clamping, normalized to `[0, 1]`.
    ///
    /// Coordinates outside the bitmap are clamped to the nearest edge texel,
    /// which is what neighbourhood filters expect at the borders.
    #[inline]
    pub fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let cx = x.clamp(0, self.width as i64 - 1) as u32;
        let cy = y.clamp(0, self.height as i64 - 1) as u32;
        let o = self.offset(cx, cy);
        [
            self.data[o] as f32 / 255.0,
            self.data[o + 1] as f32 / 255.0,
            self.data[o + 2] as f32 / 255.0,
            self.data[o + 3] as f32 / 255.0,
        ]
    }

    /// Writes a pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        let o = self.offset(x, y);
        self.data[o..o + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        Ok(())
    }

    /// Largest per-byte difference to another bitmap of the same size.
    ///
    /// Returns `None` when dimensions differ.
    pub fn max_abs_diff(&self, other: &Bitmap) -> Option<u8> {
        if self.dimensions() != other.dimensions() {
            return None;
        }
        Some(
            self.data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| a.abs_diff(*b))
                .max()
                .unwrap_or(0),
        )
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_rgba8_validates_size() {
        assert!(Bitmap::from_rgba8(2, 2, vec![0; 16]).is_ok());
        let err = Bitmap::from_rgba8(2, 2, vec![0; 12]).unwrap_err();
        assert!(matches!(err, Error::BufferSizeMismatch { expected: 16, actual: 12 }));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Bitmap::filled(0, 4, [0; 4]),
            Err(Error::InvalidDimensions { width: 0, height: 4 })
        ));
        assert!(Bitmap::from_rgba8(3, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_texel_clamps_to_edges() {
        let bmp = Bitmap::from_fn(3, 1, |x, _| [x as u8 * 100, 0, 0, 255]).unwrap();
        assert_eq!(bmp.texel(-5, 0)[0], 0.0);
        assert_relative_eq!(bmp.texel(10, 3)[0], 0.784_313_7, epsilon = 1e-6);
        assert_relative_eq!(bmp.texel(1, 0)[0], 0.392_156_9, epsilon = 1e-6);
        assert_eq!(bmp.texel(1, 0)[3], 1.0);
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut bmp = Bitmap::filled(2, 2, [0; 4]).unwrap();
        assert!(bmp.set_pixel(2, 0, [1; 4]).is_err());
        assert_eq!(bmp.pixel(5, 5), None);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = Bitmap::filled(2, 2, [10, 10, 10, 255]).unwrap();
        let mut b = a.clone();
        b.set_pixel(1, 1, [13, 10, 8, 255]).unwrap();
        assert_eq!(a.max_abs_diff(&b), Some(3));
        let c = Bitmap::filled(1, 2, [0; 4]).unwrap();
        assert_eq!(a.max_abs_diff(&c), None);
    }
}
