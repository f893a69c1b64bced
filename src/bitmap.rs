//! Provides the heap-allocated pixel grid type.

use crate::PngError;

/// Converts an `(x,y)` position within a given `width` 2D space into a linear
/// index.
#[inline]
#[must_use]
pub const fn xy_width_to_index(x: u32, y: u32, width: u32) -> usize {
  (y as usize) * (width as usize) + (x as usize)
}

/// Packs 8-bit channels into a single `0xAARRGGBB` value.
#[inline]
#[must_use]
pub const fn pack_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
  ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Splits a packed `0xAARRGGBB` value into `[a, r, g, b]`.
#[inline]
#[must_use]
pub const fn unpack_argb(argb: u32) -> [u8; 4] {
  argb.to_be_bytes()
}

/// A grid of packed `0xAARRGGBB` pixels, stored row-major, top row first.
///
/// An image with no rows (or rows of zero pixels) is a valid value. The
/// decoder hands one back when it can't reconstruct anything, and the encoder
/// refuses it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub struct Bitmap {
  pub width: u32,
  pub height: u32,
  pub pixels: Vec<u32>,
}
impl Bitmap {
  /// Makes a bitmap of the given size with every pixel set to `fill`.
  #[inline]
  #[must_use]
  pub fn new(width: u32, height: u32, fill: u32) -> Self {
    let pixels = vec![fill; (width as usize) * (height as usize)];
    Self { width, height, pixels }
  }

  /// Builds a bitmap from a list of rows.
  ///
  /// ## Failure
  /// * Every row must have the same length as the first row.
  /// * The width and height must each fit in a `u32`.
  pub fn from_rows<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, PngError> {
    let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let mut pixels = Vec::with_capacity(width * rows.len());
    for (row, r) in rows.iter().enumerate() {
      let r = r.as_ref();
      if r.len() != width {
        return Err(PngError::RaggedRows { row, expected: width, found: r.len() });
      }
      pixels.extend_from_slice(r);
    }
    Ok(Self {
      width: u32::try_from(width).map_err(|_| PngError::DimensionsTooLarge)?,
      height: u32::try_from(rows.len()).map_err(|_| PngError::DimensionsTooLarge)?,
      pixels,
    })
  }

  /// If the image has no pixels at all.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  /// Iterates the rows of the image, top to bottom.
  #[inline]
  pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
    // `chunks_exact` panics on a zero size, and a zero width image has no
    // meaningful rows anyway.
    let width = (self.width as usize).max(1);
    let used = if self.width == 0 { 0 } else { self.pixels.len() };
    self.pixels[..used].chunks_exact(width)
  }

  /// Copies the image out as a list of rows.
  #[must_use]
  pub fn to_rows(&self) -> Vec<Vec<u32>> {
    self.rows().map(|r| r.to_vec()).collect()
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get(&self, x: u32, y: u32) -> Option<u32> {
    if x < self.width && y < self.height {
      self.pixels.get(xy_width_to_index(x, y, self.width)).copied()
    } else {
      None
    }
  }

  /// Gets the pixel at the position, or `None` if the position is out of
  /// bounds.
  #[inline]
  #[must_use]
  pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut u32> {
    if x < self.width && y < self.height {
      let i = xy_width_to_index(x, y, self.width);
      self.pixels.get_mut(i)
    } else {
      None
    }
  }
}

#[test]
fn test_bitmap_from_rows() {
  let b = Bitmap::from_rows(&[[1_u32, 2], [3, 4]]).unwrap();
  assert_eq!((b.width, b.height), (2, 2));
  assert_eq!(b.get(1, 1), Some(4));
  assert_eq!(b.get(2, 0), None);
  assert_eq!(b.to_rows(), vec![vec![1, 2], vec![3, 4]]);

  let ragged: Vec<Vec<u32>> = vec![vec![1, 2], vec![3]];
  assert_eq!(
    Bitmap::from_rows(&ragged),
    Err(PngError::RaggedRows { row: 1, expected: 2, found: 1 })
  );

  let empty: Vec<Vec<u32>> = vec![];
  assert!(Bitmap::from_rows(&empty).unwrap().is_empty());
  assert_eq!(Bitmap::default().rows().count(), 0);
}

#[test]
fn test_pack_argb() {
  assert_eq!(pack_argb(0xFF, 0x11, 0x22, 0x33), 0xFF112233);
  assert_eq!(unpack_argb(0x80FF0001), [0x80, 0xFF, 0x00, 0x01]);
}
