use super::*;

/// Palette data
///
/// Palette entries are always RGB.
///
/// If you want to have a paletted image with transparency then the transparency
/// info goes in a separate transparency chunk.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PLTE<'b>(&'b [[u8; 3]]);
impl<'b> From<&'b [[u8; 3]]> for PLTE<'b> {
  #[inline]
  fn from(entries: &'b [[u8; 3]]) -> Self {
    Self(entries)
  }
}
impl Debug for PLTE<'_> {
  #[inline]
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    // currently prints no more than 4 palette entries
    f.debug_tuple("PLTE").field(&&self.0[..self.0.len().min(4)]).field(&self.0.len()).finish()
  }
}
impl<'b> PLTE<'b> {
  /// Parses a palette payload: 1 to 256 RGB triples.
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    if data.is_empty() || data.len() > 256 * 3 {
      return Err(PayloadError::Length(data.len()));
    }
    match bytemuck::try_cast_slice::<u8, [u8; 3]>(data) {
      Ok(entries) => Ok(Self(entries)),
      Err(_) => Err(PayloadError::Length(data.len())),
    }
  }

  /// Gets the entries as a slice.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &'b [[u8; 3]] {
    self.0
  }
}

#[test]
fn test_plte_parse() {
  let p = PLTE::parse(&[1, 2, 3, 4, 5, 6]).unwrap();
  assert_eq!(p.entries(), &[[1, 2, 3], [4, 5, 6]]);
  assert_eq!(PLTE::parse(&[1, 2]), Err(PayloadError::Length(2)));
  assert_eq!(PLTE::parse(&[]), Err(PayloadError::Length(0)));
  assert_eq!(PLTE::parse(&[0; 257 * 3]), Err(PayloadError::Length(771)));
}
