//! Adam7 interlacing geometry.
//!
//! The pass of each pixel within an 8x8 tile:
//! ```txt
//! 1 6 4 6 2 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! 3 6 4 6 3 6 4 6
//! 7 7 7 7 7 7 7 7
//! 5 6 5 6 5 6 5 6
//! 7 7 7 7 7 7 7 7
//! ```
//!
//! PS: Interlacing is terrible, don't interlace your images.

use super::*;

/// `(x_start, y_start, x_step, y_step)` of passes 1 through 7.
pub const ADAM7_PASSES: [(u32, u32, u32, u32); 7] = [
  (0, 0, 8, 8),
  (4, 0, 8, 8),
  (0, 4, 4, 8),
  (2, 0, 4, 4),
  (0, 2, 2, 4),
  (1, 0, 2, 2),
  (0, 1, 1, 2),
];

/// The pass (1 through 7) of each position in an 8x8 tile, indexed `[y][x]`.
pub const ADAM7_PASS_TABLE: [[u8; 8]; 8] = [
  [1, 6, 4, 6, 2, 6, 4, 6],
  [7, 7, 7, 7, 7, 7, 7, 7],
  [5, 6, 5, 6, 5, 6, 5, 6],
  [7, 7, 7, 7, 7, 7, 7, 7],
  [3, 6, 4, 6, 3, 6, 4, 6],
  [7, 7, 7, 7, 7, 7, 7, 7],
  [5, 6, 5, 6, 5, 6, 5, 6],
  [7, 7, 7, 7, 7, 7, 7, 7],
];

/// Number of positions `start, start+step, ...` below `full`.
#[inline]
#[must_use]
const fn pass_len(full: u32, start: u32, step: u32) -> u32 {
  if full > start {
    (full - start + step - 1) / step
  } else {
    0
  }
}

/// Gets the dimensions of the reduced images of an interlaced image.
///
/// The output uses index 0 as the base image size, and indexes 1 through 7 for
/// the size of reduced images 1 through 7. Any reduced image can have a width
/// or height of 0 when the full image is small.
#[inline]
#[must_use]
pub const fn reduced_image_dimensions(full_width: u32, full_height: u32) -> [(u32, u32); 8] {
  let mut out = [(full_width, full_height); 8];
  let mut i = 0;
  while i < 7 {
    let (x0, y0, dx, dy) = ADAM7_PASSES[i];
    out[i + 1] = (pass_len(full_width, x0, dx), pass_len(full_height, y0, dy));
    i += 1;
  }
  out
}

/// Converts a reduced image location into the full image location.
///
/// Level 0 is the full image, and gives back the input.
#[inline]
#[must_use]
pub const fn interlaced_pos_to_full_pos(image_level: usize, reduced_x: u32, reduced_y: u32) -> (u32, u32) {
  if image_level == 0 || image_level > 7 {
    return (reduced_x, reduced_y);
  }
  let (x0, y0, dx, dy) = ADAM7_PASSES[image_level - 1];
  (reduced_x * dx + x0, reduced_y * dy + y0)
}

/// Splits a full image into its seven reduced images.
#[must_use]
pub fn adam7_split(full: &Bitmap) -> [Bitmap; 7] {
  let dims = reduced_image_dimensions(full.width, full.height);
  core::array::from_fn(|i| {
    let (w, h) = dims[i + 1];
    let mut pass = Bitmap::new(w, h, 0);
    for ry in 0..h {
      for rx in 0..w {
        let (x, y) = interlaced_pos_to_full_pos(i + 1, rx, ry);
        if let (Some(dst), Some(src)) = (pass.get_mut(rx, ry), full.get(x, y)) {
          *dst = src;
        }
      }
    }
    pass
  })
}

/// Rebuilds the full image from its seven reduced images.
///
/// Each full position looks up its pass in [`ADAM7_PASS_TABLE`]. Positions
/// whose reduced image is too small (only possible with bad input) stay 0.
#[must_use]
pub fn adam7_interleave(passes: &[Bitmap; 7], width: u32, height: u32) -> Bitmap {
  let mut full = Bitmap::new(width, height, 0);
  for y in 0..height {
    for x in 0..width {
      let pass = ADAM7_PASS_TABLE[(y % 8) as usize][(x % 8) as usize] as usize;
      let (x0, y0, dx, dy) = ADAM7_PASSES[pass - 1];
      let src = passes[pass - 1].get((x - x0) / dx, (y - y0) / dy);
      if let (Some(dst), Some(src)) = (full.get_mut(x, y), src) {
        *dst = src;
      }
    }
  }
  full
}

#[test]
fn test_pass_table_matches_passes() {
  for (y, row) in ADAM7_PASS_TABLE.iter().enumerate() {
    for (x, &pass) in row.iter().enumerate() {
      let (x0, y0, dx, dy) = ADAM7_PASSES[pass as usize - 1];
      let (x, y) = (x as u32, y as u32);
      assert!(x >= x0 && (x - x0) % dx == 0, "x:{x} y:{y}");
      assert!(y >= y0 && (y - y0) % dy == 0, "x:{x} y:{y}");
    }
  }
}

#[test]
fn test_reduced_image_dimensions() {
  assert_eq!(reduced_image_dimensions(0, 0), [(0, 0); 8]);
  let widths: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
    [1, 2, 3, 4, 5, 6, 7, 8],
  ];
  let heights: [[u32; 8]; 7] = [
    [1, 1, 1, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 1, 1, 1, 1],
    [0, 0, 0, 0, 1, 1, 1, 1],
    [1, 1, 1, 1, 2, 2, 2, 2],
    [0, 0, 1, 1, 1, 1, 2, 2],
    [1, 1, 2, 2, 3, 3, 4, 4],
    [0, 1, 1, 2, 2, 3, 3, 4],
  ];
  for level in 1..=7 {
    for (n, (&ex_w, &ex_h)) in (1..=8).zip(widths[level - 1].iter().zip(heights[level - 1].iter())) {
      assert_eq!(reduced_image_dimensions(n, 0)[level].0, ex_w, "level:{level} w:{n}");
      assert_eq!(reduced_image_dimensions(0, n)[level].1, ex_h, "level:{level} h:{n}");
    }
  }
  assert_eq!(
    reduced_image_dimensions(8, 8),
    [(8, 8), (1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)]
  );
}

#[test]
fn test_adam7_split_then_interleave() {
  for (w, h) in [(1, 1), (3, 5), (8, 8), (13, 9), (17, 2)] {
    let mut full = Bitmap::new(w, h, 0);
    for (i, p) in full.pixels.iter_mut().enumerate() {
      *p = 0xFF00_0000 | (i as u32).wrapping_mul(2_654_435_761) >> 8;
    }
    let passes = adam7_split(&full);
    let total: usize = passes.iter().map(|p| p.pixels.len()).sum();
    assert_eq!(total, full.pixels.len());
    assert_eq!(adam7_interleave(&passes, w, h), full, "w:{w} h:{h}");
  }
}
