use super::*;

/// Images wider or taller than this aren't decoded by default.
pub const DEFAULT_MAX_DIMENSION: u32 = 16_384;

/// The result of decoding a PNG.
///
/// Decoding doesn't fail. If the image couldn't be reconstructed the bitmap
/// is empty, and the warnings say why.
#[derive(Debug, Clone)]
pub struct DecodedPng<'b> {
  /// Every problem found, in the order found.
  pub warnings: Vec<PngWarning>,
  /// Every chunk in the file, in file order.
  pub chunks: Vec<RawChunk<'b>>,
  pub bitmap: Bitmap,
  /// The stored bit depth, or 0 without a header.
  pub bit_depth: u8,
  pub header: Option<IHDR>,
  pub text: Vec<TextEntry>,
  pub animation: AnimationState<'b>,
}
impl DecodedPng<'_> {
  /// Each chunk parsed into its typed form, or the warning it would give.
  pub fn parsed_chunks(&self) -> impl Iterator<Item = Result<PngChunk<'_>, PngWarning>> + '_ {
    self.chunks.iter().map(|&raw| PngChunk::parse_or_warn(raw))
  }
}

/// Decodes PNG data, with settings.
#[derive(Debug, Clone)]
pub struct Decoder {
  pub registry: ChunkRegistry,
  /// Images wider or taller than this decode as empty.
  pub max_dimension: u32,
}
impl Default for Decoder {
  #[inline]
  fn default() -> Self {
    Self { registry: ChunkRegistry::standard(), max_dimension: DEFAULT_MAX_DIMENSION }
  }
}
impl Decoder {
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[inline]
  #[must_use]
  pub fn with_max_dimension(self, max_dimension: u32) -> Self {
    Self { max_dimension, ..self }
  }

  #[inline]
  #[must_use]
  pub fn with_registry(self, registry: ChunkRegistry) -> Self {
    Self { registry, ..self }
  }

  /// Decodes as much of the PNG as possible.
  pub fn decode<'b>(&self, bytes: &'b [u8]) -> DecodedPng<'b> {
    let mut ctx = DecodeContext::new();
    let mut found = Vec::new();
    let chunks = read_chunks(bytes, &mut found);
    found.extend(validate(&chunks, &self.registry));
    found.into_iter().for_each(|w| ctx.warn(w));
    dispatch(&chunks, &self.registry, &mut ctx);
    let bitmap = decode_image_data(&mut ctx, self.max_dimension);
    log::debug!(
      "decoded {}x{} from {} chunks with {} warning(s)",
      bitmap.width,
      bitmap.height,
      chunks.len(),
      ctx.warnings.len()
    );
    DecodedPng {
      warnings: ctx.warnings,
      chunks,
      bitmap,
      bit_depth: ctx.header.map(|h| h.bit_depth).unwrap_or(0),
      header: ctx.header,
      text: ctx.text,
      animation: ctx.animation,
    }
  }
}

/// Decodes PNG bytes with the default [`Decoder`].
#[inline]
pub fn decode_png(bytes: &[u8]) -> DecodedPng<'_> {
  Decoder::default().decode(bytes)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_garbage_decodes_to_nothing() {
    let d = decode_png(b"definitely not a png");
    assert!(d.bitmap.is_empty());
    assert_eq!(d.bit_depth, 0);
    assert_eq!(d.warnings.first(), Some(&PngWarning::BadSignature));
    assert!(d.warnings.contains(&PngWarning::MissingHeader));

    let d = decode_png(&[]);
    assert!(d.bitmap.is_empty());
    assert!(d.chunks.is_empty());
  }

  #[test]
  fn test_custom_registry_skips_unregistered_chunks() {
    fn ihdr_only<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
      ctx.header = IHDR::parse(raw.data);
    }
    let mut registry = ChunkRegistry::new();
    registry.register(ChunkTy::IHDR, ChunkRule::OPTIONAL, ihdr_only).unwrap();
    let ihdr = IHDR {
      width: 1,
      height: 1,
      bit_depth: 8,
      colour_type: 0,
      compression_method: 0,
      filter_method: 0,
      interlace_method: 0,
    };
    let mut png = PNG_SIGNATURE.to_vec();
    for (ty, data) in [(ChunkTy::IHDR, &ihdr.to_bytes()[..]), (ChunkTy::IEND, &[][..])] {
      png.extend_from_slice(&(data.len() as u32).to_be_bytes());
      png.extend_from_slice(&ty.0);
      png.extend_from_slice(data);
      png.extend_from_slice(&png_crc(ty.0.iter().chain(data.iter()).copied()).to_be_bytes());
    }
    let d = Decoder::new().with_registry(registry).decode(&png);
    assert_eq!(d.header, Some(ihdr));
    assert!(d.warnings.contains(&PngWarning::UnknownChunk { ty: ChunkTy::IEND, critical: true }));
    // no IDAT at all inflates to nothing
    assert!(d.warnings.contains(&PngWarning::DataLengthMismatch { expected: 2, found: 0 }));
  }
}
