use super::*;

/// A four byte chunk type tag, such as `IHDR`.
///
/// Bit 5 of each byte is a property flag. The one that matters to a decoder
/// is on the first byte: lower-case means the chunk is ancillary and can be
/// skipped, upper-case means it's critical to displaying the image.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkTy(pub [u8; 4]);
#[allow(nonstandard_style)]
impl ChunkTy {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const cHRM: Self = Self(*b"cHRM");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sPLT: Self = Self(*b"sPLT");
  pub const tIME: Self = Self(*b"tIME");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const eXIf: Self = Self(*b"eXIf");
  pub const acTL: Self = Self(*b"acTL");
  pub const fcTL: Self = Self(*b"fcTL");
  pub const fdAT: Self = Self(*b"fdAT");

  /// Sentinel for ordering rules: stands for "every other chunk type".
  ///
  /// This is never a valid tag in a file because it isn't made of letters.
  pub const ANY: Self = Self(*b"****");

  /// If this chunk type can be ignored by a decoder that doesn't know it.
  #[inline]
  #[must_use]
  pub const fn is_ancillary(self) -> bool {
    (self.0[0] & 0b0010_0000) != 0
  }

  /// If this chunk type is required to display the image.
  #[inline]
  #[must_use]
  pub const fn is_critical(self) -> bool {
    !self.is_ancillary()
  }
}
impl Debug for ChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('"')?;
    Display::fmt(self, f)?;
    f.write_char('"')
  }
}
impl Display for ChunkTy {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    for ch in self.0.iter().copied() {
      if ch.is_ascii_graphic() {
        f.write_char(ch as char)?;
      } else {
        write!(f, "\\x{ch:02X}")?;
      }
    }
    Ok(())
  }
}
impl From<[u8; 4]> for ChunkTy {
  #[inline]
  fn from(array: [u8; 4]) -> Self {
    Self(array)
  }
}

#[test]
fn test_chunk_ty_flags() {
  assert!(ChunkTy::IHDR.is_critical());
  assert!(ChunkTy::tRNS.is_ancillary());
  assert!(ChunkTy(*b"abCD").is_ancillary());
  assert!(ChunkTy(*b"ZzZz").is_critical());
  assert_eq!(format!("{}", ChunkTy::gAMA), "gAMA");
  assert_eq!(format!("{:?}", ChunkTy([b'a', 0, b'c', b'd'])), "\"a\\x00cd\"");
}
