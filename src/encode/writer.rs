//! Assembling the final file.

use super::*;

/// Appends whole chunks to a byte buffer.
#[derive(Debug, Clone, Default)]
pub struct ChunkWriter {
  out: Vec<u8>,
}
impl ChunkWriter {
  /// A writer that has already written the PNG signature.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self { out: PNG_SIGNATURE.to_vec() }
  }

  /// Writes one chunk: length, type, payload, then the CRC of type and
  /// payload.
  pub fn write_chunk(&mut self, ty: ChunkTy, data: &[u8]) -> Result<(), PngError> {
    if data.len() > MAX_CHUNK_LEN as usize {
      return Err(PngError::ChunkTooLarge(data.len()));
    }
    let mut crc = Crc32::new();
    crc.update(&ty.0);
    crc.update(data);
    self.out.reserve(12 + data.len());
    self.out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    self.out.extend_from_slice(&ty.0);
    self.out.extend_from_slice(data);
    self.out.extend_from_slice(&crc.finish().to_be_bytes());
    Ok(())
  }

  #[inline]
  #[must_use]
  pub fn finish(self) -> Vec<u8> {
    self.out
  }
}

/// Writes a complete single-image PNG.
pub fn write_png(
  header: &IHDR, palette: Option<&[u8]>, transparency: Option<&[u8]>, zlib_data: &[u8],
) -> Result<Vec<u8>, PngError> {
  let mut w = ChunkWriter::new();
  w.write_chunk(ChunkTy::IHDR, &header.to_bytes())?;
  if let Some(palette) = palette {
    w.write_chunk(ChunkTy::PLTE, palette)?;
  }
  if let Some(transparency) = transparency {
    w.write_chunk(ChunkTy::tRNS, transparency)?;
  }
  w.write_chunk(ChunkTy::IDAT, zlib_data)?;
  w.write_chunk(ChunkTy::IEND, &[])?;
  Ok(w.finish())
}

#[test]
fn test_write_png_chunks() {
  let header = IHDR {
    width: 1,
    height: 1,
    bit_depth: 8,
    colour_type: 3,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  };
  let bytes = write_png(&header, Some(&[1, 2, 3]), Some(&[7]), &[0x78, 0x01]).unwrap();
  assert_eq!(&bytes[..8], &PNG_SIGNATURE);
  let mut warnings = Vec::new();
  let chunks = read_chunks(&bytes, &mut warnings);
  assert!(warnings.is_empty(), "{warnings:?}");
  let types: Vec<ChunkTy> = chunks.iter().map(|c| c.ty).collect();
  assert_eq!(types, vec![ChunkTy::IHDR, ChunkTy::PLTE, ChunkTy::tRNS, ChunkTy::IDAT, ChunkTy::IEND]);
  assert!(chunks.iter().all(|c| c.is_crc_ok()));
  assert_eq!(chunks[3].declared_crc, Some(png_crc(b"IDAT\x78\x01".iter().copied())));
}
