use core::fmt;

use crate::png::ChunkTy;

/// A hard failure from the `pngsift` crate.
///
/// Problems with the *input data* of a decode are never reported this way,
/// they become [`PngWarning`](crate::png::PngWarning) values instead. A
/// `PngError` means that the call itself could not do its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngError {
  /// The pixel grid given to the encoder has no rows, or rows of zero pixels.
  EmptyImage,

  /// A row of the pixel grid has a different length than the first row.
  RaggedRows {
    /// index of the offending row
    row: usize,
    /// length of the first row
    expected: usize,
    /// length of the offending row
    found: usize,
  },

  /// The pixel buffer doesn't hold exactly `width * height` pixels.
  PixelCountMismatch {
    /// `width * height`, saturating
    expected: usize,
    /// length of the pixel buffer
    found: usize,
  },

  /// The image is too large to be written as a PNG.
  ///
  /// Width and height must each fit in 31 bits.
  DimensionsTooLarge,

  /// No combination of encoding, filter picker, and zlib configuration
  /// produced any compressed data.
  NoCompressionCandidate,

  /// Two rules were registered for the same chunk type.
  DuplicateChunkRule(ChunkTy),

  /// A chunk payload is longer than the `0x7FFF_FFFF` byte PNG limit.
  ChunkTooLarge(usize),
}

impl fmt::Display for PngError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::EmptyImage => write!(f, "cannot encode an image with no pixels"),
      Self::RaggedRows { row, expected, found } => {
        write!(f, "row {row} has {found} pixels but the first row has {expected}")
      }
      Self::PixelCountMismatch { expected, found } => {
        write!(f, "image has {found} pixels but its dimensions call for {expected}")
      }
      Self::DimensionsTooLarge => write!(f, "image dimensions exceed the PNG limit"),
      Self::NoCompressionCandidate => write!(f, "no compression attempt produced any output"),
      Self::DuplicateChunkRule(ty) => write!(f, "chunk type {ty} was registered twice"),
      Self::ChunkTooLarge(len) => write!(f, "chunk payload of {len} bytes is too large"),
    }
  }
}

impl std::error::Error for PngError {}
