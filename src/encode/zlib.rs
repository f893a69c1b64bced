//! DEFLATE settings tried by the search.

use super::*;

use miniz_oxide::deflate::core::{
  compress_to_output, create_comp_flags_from_zip_params, CompressionStrategy, CompressorOxide, TDEFLFlush,
  TDEFLStatus,
};

/// One set of compressor parameters.
///
/// The window is always the full 32 KiB and the stream always has a zlib
/// wrapper, since `IDAT` requires one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZlibConfig {
  /// 0 to 10, where 10 is the slowest and most thorough.
  pub level: u8,
  pub strategy: CompressionStrategy,
  /// Search priority, bigger goes first.
  pub weight: f64,
}
impl ZlibConfig {
  #[inline]
  #[must_use]
  pub const fn new(level: u8, strategy: CompressionStrategy, weight: f64) -> Self {
    Self { level, strategy, weight }
  }

  /// The configs tried by default, most promising first.
  #[must_use]
  pub fn defaults() -> Vec<Self> {
    vec![
      Self::new(10, CompressionStrategy::Default, 1.0),
      Self::new(9, CompressionStrategy::Filtered, 0.9),
      Self::new(6, CompressionStrategy::Default, 0.7),
      Self::new(10, CompressionStrategy::RLE, 0.6),
      Self::new(10, CompressionStrategy::HuffmanOnly, 0.4),
    ]
  }

  /// Compresses `data` into a zlib stream.
  ///
  /// Gives `None` if the compressor doesn't finish cleanly.
  #[must_use]
  pub fn compress(&self, data: &[u8]) -> Option<Vec<u8>> {
    let flags = create_comp_flags_from_zip_params(i32::from(self.level.min(10)), 15, self.strategy as i32);
    let mut compressor = CompressorOxide::new(flags);
    let mut out = Vec::with_capacity(data.len() / 2 + 64);
    let (status, _consumed) = compress_to_output(&mut compressor, data, TDEFLFlush::Finish, |bytes| {
      out.extend_from_slice(bytes);
      true
    });
    match status {
      TDEFLStatus::Done => Some(out),
      other => {
        log::debug!("zlib {self}: compressor stopped with {other:?}");
        None
      }
    }
  }
}
impl Display for ZlibConfig {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "L{} {:?}", self.level, self.strategy)
  }
}

#[test]
fn test_zlib_configs_inflate_back() {
  let data: Vec<u8> = (0..5000_u32).map(|i| (i % 251) as u8 ^ (i / 97) as u8).collect();
  for config in ZlibConfig::defaults() {
    let packed = config.compress(&data).unwrap();
    let unpacked = miniz_oxide::inflate::decompress_to_vec_zlib(&packed).unwrap();
    assert_eq!(unpacked, data, "{config}");
  }
}
