//! Holds the tools for encoding PNG data.
//!
//! The encoder always writes a single `IDAT` stream, and tries to make the
//! file small by searching over three things:
//! * **Encodings** - every colour type and bit depth that can hold the image
//!   exactly ([`encoding_options`]).
//! * **Filters** - a filter type per scanline, chosen by each
//!   [`FilterPicker`].
//! * **Compression** - a few [`ZlibConfig`] settings for `miniz_oxide`.
//!
//! The search ([`run_search`]) tries the combinations in order of how likely
//! they are to win, and stops once the [`TimeBudget`] runs out.
//!
//! ```no_run
//! use pngsift::{encode::*, Bitmap};
//! let image = Bitmap::new(16, 16, 0xFF_00_80_FF);
//! let png = encode_png(&image, &EncodeOptions::default()).unwrap();
//! assert_eq!(pngsift::png::decode_png(&png).bitmap, image);
//! ```

use core::fmt::Display;
use std::time::Duration;

use crate::{bitmap::*, error::PngError, png::*};

mod options;
pub use options::*;

mod picker;
pub use picker::*;

mod cache;
pub use cache::*;

mod zlib;
pub use zlib::*;

mod search;
pub use search::*;

mod writer;
pub use writer::*;

/// The longest side PNG allows.
const MAX_PNG_DIMENSION: u32 = 0x7FFF_FFFF;

/// How long the compression search may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeBudget {
  /// Try everything, in a fixed order.
  Unlimited,
  /// Stop starting new attempts after this long.
  Limited(Duration),
}
impl Default for TimeBudget {
  #[inline]
  fn default() -> Self {
    Self::Limited(Duration::from_millis(250))
  }
}
impl TimeBudget {
  /// Infinite (or NaN) becomes [`TimeBudget::Unlimited`], negative becomes
  /// zero.
  #[must_use]
  pub fn from_millis(millis: f64) -> Self {
    if millis.is_nan() || (millis.is_infinite() && millis > 0.0) {
      Self::Unlimited
    } else {
      Duration::try_from_secs_f64(millis.max(0.0) / 1000.0).map(Self::Limited).unwrap_or(Self::Unlimited)
    }
  }
}

/// Settings for [`encode_png`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
  /// Keep the colour channels of fully transparent pixels.
  ///
  /// When this is off they're all stored as `0`, which often lets more
  /// images use a palette.
  pub preserve_transparent_colour: bool,
  /// Allow a single colour key (`tRNS` on a greyscale or RGB image) to
  /// stand in for an alpha channel.
  pub allow_matte_transparency: bool,
  pub time_budget: TimeBudget,
}
impl Default for EncodeOptions {
  #[inline]
  fn default() -> Self {
    Self {
      preserve_transparent_colour: false,
      allow_matte_transparency: true,
      time_budget: TimeBudget::default(),
    }
  }
}
impl EncodeOptions {
  #[inline]
  #[must_use]
  pub const fn with_preserve_transparent_colour(self, preserve_transparent_colour: bool) -> Self {
    Self { preserve_transparent_colour, ..self }
  }
  #[inline]
  #[must_use]
  pub const fn with_allow_matte_transparency(self, allow_matte_transparency: bool) -> Self {
    Self { allow_matte_transparency, ..self }
  }
  #[inline]
  #[must_use]
  pub const fn with_time_budget(self, time_budget: TimeBudget) -> Self {
    Self { time_budget, ..self }
  }
}

/// Encodes the image as a PNG, searching for a small output.
///
/// ## Failure
/// * [`PngError::EmptyImage`] if the image has no pixels.
/// * [`PngError::DimensionsTooLarge`] if either side is too big for PNG.
/// * [`PngError::PixelCountMismatch`] if the pixel buffer doesn't match the
///   width and height.
/// * [`PngError::NoCompressionCandidate`] if compression never succeeded.
/// * [`PngError::ChunkTooLarge`] if the compressed data doesn't fit in one
///   chunk.
pub fn encode_png(image: &Bitmap, options: &EncodeOptions) -> Result<Vec<u8>, PngError> {
  if image.is_empty() {
    return Err(PngError::EmptyImage);
  }
  if image.width > MAX_PNG_DIMENSION || image.height > MAX_PNG_DIMENSION {
    return Err(PngError::DimensionsTooLarge);
  }
  let expected = (image.width as usize).saturating_mul(image.height as usize);
  if image.pixels.len() != expected {
    return Err(PngError::PixelCountMismatch { expected, found: image.pixels.len() });
  }
  let space = SearchSpace::for_image(image, options);
  let (best, _stats) = run_search(image, &space)?;
  let encoding = &space.encodings[best.encoding];
  write_png(
    &encoding.header(image.width, image.height),
    encoding.palette.as_deref(),
    encoding.transparency.as_deref(),
    &best.zlib_data,
  )
}

/// Encodes a list of equal length rows, see [`encode_png`].
///
/// ## Failure
/// * [`PngError::RaggedRows`] if the rows aren't all the same length.
pub fn encode_rows<R: AsRef<[u32]>>(rows: &[R], options: &EncodeOptions) -> Result<Vec<u8>, PngError> {
  encode_png(&Bitmap::from_rows(rows)?, options)
}

#[test]
fn test_time_budget_from_millis() {
  assert_eq!(TimeBudget::from_millis(f64::INFINITY), TimeBudget::Unlimited);
  assert_eq!(TimeBudget::from_millis(f64::NAN), TimeBudget::Unlimited);
  assert_eq!(TimeBudget::from_millis(-5.0), TimeBudget::Limited(Duration::ZERO));
  assert_eq!(TimeBudget::from_millis(f64::NEG_INFINITY), TimeBudget::Limited(Duration::ZERO));
  assert_eq!(TimeBudget::from_millis(1500.0), TimeBudget::Limited(Duration::from_millis(1500)));
}

#[test]
fn test_encode_rejects_empty() {
  assert_eq!(encode_png(&Bitmap::default(), &EncodeOptions::default()), Err(PngError::EmptyImage));
  let rows: [&[u32]; 2] = [&[1, 2], &[3]];
  assert!(matches!(encode_rows(&rows, &EncodeOptions::default()), Err(PngError::RaggedRows { row: 1, .. })));
}

#[test]
fn test_encode_rejects_wrong_pixel_count() {
  let hollow = Bitmap { width: 2, height: 2, pixels: vec![] };
  assert_eq!(
    encode_png(&hollow, &EncodeOptions::default()),
    Err(PngError::PixelCountMismatch { expected: 4, found: 0 })
  );
  let long = Bitmap { width: 1, height: 2, pixels: vec![0xFF00_0000; 3] };
  assert_eq!(
    encode_png(&long, &EncodeOptions::default()),
    Err(PngError::PixelCountMismatch { expected: 2, found: 3 })
  );
}
