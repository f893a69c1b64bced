use super::*;

/// The first eight bytes of a PNG datastream should match these bytes.
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// The largest chunk length the PNG format allows.
pub const MAX_CHUNK_LEN: u32 = 0x7FFF_FFFF;

/// Checks if the PNG's initial 8 bytes are correct.
#[inline]
#[must_use]
pub const fn is_png_signature_correct(bytes: &[u8]) -> bool {
  matches!(bytes, [137, 80, 78, 71, 13, 10, 26, 10, ..])
}

/// An unparsed chunk from a PNG.
///
/// The payload borrows from the source bytes, nothing is copied.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawChunk<'b> {
  /// The chunk's type tag.
  pub ty: ChunkTy,
  /// The length the chunk declared, which can disagree with `data.len()` if
  /// the chunk was truncated.
  pub declared_len: u32,
  /// The payload (clamped to the available data).
  pub data: &'b [u8],
  /// The CRC stored after the payload, if the data didn't end first.
  pub declared_crc: Option<u32>,
}
impl Debug for RawChunk<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("RawChunk")
      .field("ty", &self.ty)
      .field("data", &(&self.data[..self.data.len().min(12)], self.data.len()))
      .field("declared_crc", &self.declared_crc)
      .finish()
  }
}
impl<'b> RawChunk<'b> {
  /// Computes the CRC over this chunk's type and payload.
  #[inline]
  #[must_use]
  pub fn actual_crc(&self) -> u32 {
    png_crc(self.ty.0.iter().copied().chain(self.data.iter().copied()))
  }

  /// If the declared CRC is present and matches the content.
  #[inline]
  #[must_use]
  pub fn is_crc_ok(&self) -> bool {
    self.declared_crc == Some(self.actual_crc())
  }
}

/// An iterator that produces successive raw chunks from PNG bytes.
///
/// The iterator never panics and never reads out of bounds. A chunk whose
/// payload runs off the end of the data is still produced, with the payload
/// clamped and no CRC. Use [`read_chunks`] if you also want the problems
/// reported.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct RawChunkIter<'b>(pub(crate) &'b [u8]);
impl<'b> RawChunkIter<'b> {
  /// Pass the full PNG bytes, it will remove the PNG signature automatically.
  #[inline]
  pub const fn new(bytes: &'b [u8]) -> Self {
    match bytes {
      [_, _, _, _, _, _, _, _, rest @ ..] => Self(rest),
      _ => Self(&[]),
    }
  }

  /// The bytes not yet consumed.
  #[inline]
  #[must_use]
  pub const fn remaining(&self) -> &'b [u8] {
    self.0
  }
}
impl<'b> Iterator for RawChunkIter<'b> {
  type Item = RawChunk<'b>;
  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    // need at least a length and a type to call it a chunk at all.
    let (len_bytes, rest) = try_pull_byte_array::<4>(self.0)?;
    let (ty_bytes, rest) = try_pull_byte_array::<4>(rest)?;
    let declared_len = u32::from_be_bytes(len_bytes);
    let (data, truncated) = clamp_view(rest, 0, declared_len as usize);
    let rest = &rest[data.len()..];
    let declared_crc = if truncated {
      None
    } else {
      match try_pull_byte_array::<4>(rest) {
        Some((crc_bytes, after)) => {
          self.0 = after;
          Some(u32::from_be_bytes(crc_bytes))
        }
        None => None,
      }
    };
    if declared_crc.is_none() {
      self.0 = &[];
    }
    Some(RawChunk { ty: ChunkTy(ty_bytes), declared_len, data, declared_crc })
  }
}

/// Walks every chunk after the signature, checking lengths and CRCs.
///
/// Problems are pushed to `warnings` and the walk goes on as best it can.
pub fn read_chunks<'b>(bytes: &'b [u8], warnings: &mut Vec<PngWarning>) -> Vec<RawChunk<'b>> {
  if !is_png_signature_correct(bytes) {
    warnings.push(PngWarning::BadSignature);
  }
  let mut it = RawChunkIter::new(bytes);
  let mut chunks = Vec::new();
  for chunk in it.by_ref() {
    if chunk.declared_len > MAX_CHUNK_LEN {
      warnings.push(PngWarning::ChunkLengthTooLarge { ty: chunk.ty, declared: chunk.declared_len });
    }
    if chunk.data.len() < chunk.declared_len as usize {
      warnings.push(PngWarning::TruncatedChunk {
        ty: chunk.ty,
        declared: chunk.declared_len,
        available: chunk.data.len(),
      });
    } else {
      match chunk.declared_crc {
        None => warnings.push(PngWarning::MissingCrc { ty: chunk.ty }),
        Some(declared) => {
          let actual = chunk.actual_crc();
          if declared != actual {
            warnings.push(PngWarning::CrcMismatch { ty: chunk.ty, declared, actual });
          }
        }
      }
    }
    chunks.push(chunk);
  }
  if !it.remaining().is_empty() {
    warnings.push(PngWarning::TrailingBytes { count: it.remaining().len() });
  }
  chunks
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chunk_bytes(ty: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(data.len() as u32).to_be_bytes());
    v.extend_from_slice(ty);
    v.extend_from_slice(data);
    let crc = png_crc(ty.iter().copied().chain(data.iter().copied()));
    v.extend_from_slice(&crc.to_be_bytes());
    v
  }

  #[test]
  fn test_read_chunks_clean() {
    let mut png = PNG_SIGNATURE.to_vec();
    png.extend(chunk_bytes(b"abCD", &[1, 2, 3]));
    png.extend(chunk_bytes(b"IEND", &[]));
    let mut warnings = Vec::new();
    let chunks = read_chunks(&png, &mut warnings);
    assert_eq!(warnings, vec![]);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].data, &[1, 2, 3]);
    assert!(chunks[1].is_crc_ok());
  }

  #[test]
  fn test_read_chunks_damaged() {
    let mut png = PNG_SIGNATURE.to_vec();
    let mut c = chunk_bytes(b"teST", &[9, 9, 9, 9]);
    c[9] ^= 0xFF;
    png.extend(c);
    // a chunk claiming more data than exists
    png.extend_from_slice(&100_u32.to_be_bytes());
    png.extend_from_slice(b"IDAT");
    png.extend_from_slice(&[1, 2, 3]);
    let mut warnings = Vec::new();
    let chunks = read_chunks(&png, &mut warnings);
    assert_eq!(chunks.len(), 2);
    assert!(matches!(warnings[0], PngWarning::CrcMismatch { .. }));
    assert_eq!(
      warnings[1],
      PngWarning::TruncatedChunk { ty: ChunkTy::IDAT, declared: 100, available: 3 }
    );
    assert_eq!(chunks[1].data, &[1, 2, 3]);
  }

  #[test]
  fn test_read_chunks_bad_signature_and_trailing() {
    let mut png = vec![0_u8; 8];
    png.extend(chunk_bytes(b"IEND", &[]));
    png.extend_from_slice(&[1, 2]);
    let mut warnings = Vec::new();
    let chunks = read_chunks(&png, &mut warnings);
    assert_eq!(chunks.len(), 1);
    assert_eq!(warnings, vec![PngWarning::BadSignature, PngWarning::TrailingBytes { count: 2 }]);
  }
}
