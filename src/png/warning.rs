use super::*;

/// A recoverable problem found while decoding.
///
/// Decoding never stops because of one of these. They're gathered up, in
/// the order they were found, and handed back next to whatever image could be
/// reconstructed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PngWarning {
  /// The first eight bytes aren't the PNG signature.
  BadSignature,
  /// A chunk declared a length over `0x7FFF_FFFF`.
  ChunkLengthTooLarge { ty: ChunkTy, declared: u32 },
  /// A chunk's payload runs past the end of the data.
  TruncatedChunk { ty: ChunkTy, declared: u32, available: usize },
  /// The data ended before a chunk's CRC.
  MissingCrc { ty: ChunkTy },
  /// The declared CRC doesn't match the chunk's content.
  CrcMismatch { ty: ChunkTy, declared: u32, actual: u32 },
  /// Bytes that don't form a whole chunk header were left at the end.
  TrailingBytes { count: usize },
  /// Fewer chunks of a type than required.
  TooFewChunks { ty: ChunkTy, min: usize, found: usize },
  /// More chunks of a type than allowed.
  TooManyChunks { ty: ChunkTy, max: usize, found: usize },
  /// Chunks of this type must be one contiguous run.
  NotSequential { ty: ChunkTy },
  /// `ty` appeared after `other`, which isn't allowed.
  ChunkAfter { ty: ChunkTy, other: ChunkTy },
  /// `ty` appeared before `other`, which isn't allowed.
  ChunkBefore { ty: ChunkTy, other: ChunkTy },
  /// `ty` is present but the `requires` chunk it depends on is not.
  MissingDependency { ty: ChunkTy, requires: ChunkTy },
  /// A chunk type that no rule was registered for.
  UnknownChunk { ty: ChunkTy, critical: bool },
  /// A chunk payload has the wrong length.
  BadChunkLength { ty: ChunkTy, found: usize },
  /// A chunk payload has the right shape but holds illegal values.
  InvalidChunkData { ty: ChunkTy, reason: &'static str },
  /// The image header couldn't be used, so no pixels can be decoded.
  MissingHeader,
  /// An indexed image has no usable palette.
  MissingPalette,
  /// The IHDR compression method isn't 0.
  UnsupportedCompressionMethod(u8),
  /// The IHDR filter method isn't 0.
  UnsupportedFilterMethod(u8),
  /// A scanline used a filter type other than 0 through 4.
  UnsupportedFilterType { pass: usize, row: u32, filter: u8 },
  /// The IHDR interlace method isn't 0 or 1.
  UnsupportedInterlaceMethod(u8),
  /// The bit depth isn't allowed for the colour type.
  UnsupportedPixelFormat { bit_depth: u8, colour_type: u8 },
  /// The image is larger than the decoder is configured to accept.
  DimensionsTooLarge { width: u32, height: u32 },
  /// The buffer for the inflated image data couldn't be allocated.
  AllocationFailed { bytes: usize },
  /// The zlib stream in the image data didn't inflate cleanly.
  InflateFailed,
  /// Compressed text or profile data didn't inflate cleanly.
  AncillaryInflateFailed { ty: ChunkTy },
  /// At least one pixel used a palette index past the end of the palette.
  PaletteIndexOutOfRange { index: u8, palette_len: usize },
  /// The inflated image data wasn't exactly the size the header implies.
  DataLengthMismatch { expected: usize, found: usize },
  /// An animation chunk had an unexpected sequence number.
  SequenceMismatch { ty: ChunkTy, expected: u32, found: u32 },
}

impl Display for PngWarning {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::BadSignature => write!(f, "the PNG signature is missing or wrong"),
      Self::ChunkLengthTooLarge { ty, declared } => {
        write!(f, "{ty} declares a length of {declared}, over the 2^31-1 limit")
      }
      Self::TruncatedChunk { ty, declared, available } => {
        write!(f, "{ty} declares {declared} bytes but only {available} remain")
      }
      Self::MissingCrc { ty } => write!(f, "{ty} has no CRC"),
      Self::CrcMismatch { ty, declared, actual } => {
        write!(f, "{ty} CRC mismatch: declared {declared:08X}, actual {actual:08X}")
      }
      Self::TrailingBytes { count } => write!(f, "{count} trailing bytes after the last chunk"),
      Self::TooFewChunks { ty, min, found } => {
        write!(f, "expected at least {min} {ty} chunk(s), found {found}")
      }
      Self::TooManyChunks { ty, max, found } => {
        write!(f, "expected at most {max} {ty} chunk(s), found {found}")
      }
      Self::NotSequential { ty } => write!(f, "{ty} chunks are not consecutive"),
      Self::ChunkAfter { ty, other } => write!(f, "{ty} must not appear after {other}"),
      Self::ChunkBefore { ty, other } => write!(f, "{ty} must not appear before {other}"),
      Self::MissingDependency { ty, requires } => write!(f, "{ty} requires {requires}"),
      Self::UnknownChunk { ty, critical: true } => write!(f, "unknown critical chunk {ty}"),
      Self::UnknownChunk { ty, critical: false } => write!(f, "unknown ancillary chunk {ty}"),
      Self::BadChunkLength { ty, found } => write!(f, "{ty} has an invalid length of {found}"),
      Self::InvalidChunkData { ty, reason } => write!(f, "{ty} is invalid: {reason}"),
      Self::MissingHeader => write!(f, "no usable IHDR, the image can't be decoded"),
      Self::MissingPalette => write!(f, "indexed image has no usable PLTE"),
      Self::UnsupportedCompressionMethod(m) => write!(f, "unsupported compression method {m}"),
      Self::UnsupportedFilterMethod(m) => write!(f, "unsupported filter method {m}"),
      Self::UnsupportedFilterType { pass, row, filter } => {
        write!(f, "unsupported filter type {filter} (pass {pass}, row {row})")
      }
      Self::UnsupportedInterlaceMethod(m) => write!(f, "unsupported interlace method {m}"),
      Self::UnsupportedPixelFormat { bit_depth, colour_type } => {
        write!(f, "bit depth {bit_depth} is not allowed with colour type {colour_type}")
      }
      Self::DimensionsTooLarge { width, height } => {
        write!(f, "image of {width}x{height} exceeds the decoder's limit")
      }
      Self::AllocationFailed { bytes } => write!(f, "couldn't allocate {bytes} bytes for the image data"),
      Self::InflateFailed => write!(f, "the image data failed to inflate"),
      Self::AncillaryInflateFailed { ty } => write!(f, "{ty} compressed data failed to inflate"),
      Self::PaletteIndexOutOfRange { index, palette_len } => {
        write!(f, "palette index {index} used, but the palette has {palette_len} entries")
      }
      Self::DataLengthMismatch { expected, found } => {
        write!(f, "expected {expected} bytes of inflated image data, found {found}")
      }
      Self::SequenceMismatch { ty, expected, found } => {
        write!(f, "{ty} has sequence number {found}, expected {expected}")
      }
    }
  }
}
