use super::*;

/// Transparency data
///
/// The meaning of the bytes depends on the image's colour type, so this
/// just holds the payload and offers views for each case:
/// * greyscale: one `u16` sample that is fully transparent
/// * RGB: three `u16` samples that together are fully transparent
/// * indexed: one alpha byte per palette entry. There can be less alpha
///   entries than palette entries (missing entries are fully opaque).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tRNS<'b>(&'b [u8]);
impl<'b> From<&'b [u8]> for tRNS<'b> {
  #[inline]
  fn from(data: &'b [u8]) -> Self {
    Self(data)
  }
}
impl Debug for tRNS<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("tRNS").field(&&self.0[..self.0.len().min(8)]).field(&self.0.len()).finish()
  }
}
impl<'b> tRNS<'b> {
  /// Gets the greyscale value that is transparent.
  ///
  /// Fails when the chunk has the wrong length for greyscale.
  #[inline]
  #[must_use]
  pub const fn try_to_grayscale(&self) -> Option<u16> {
    match self.0 {
      [y0, y1] => Some(u16::from_be_bytes([*y0, *y1])),
      _ => None,
    }
  }
  /// Gets the RGB value that is transparent.
  ///
  /// Fails when the chunk has the wrong length for rgb.
  #[inline]
  #[must_use]
  pub const fn try_to_rgb(&self) -> Option<[u16; 3]> {
    match self.0 {
      [r0, r1, g0, g1, b0, b1] => Some([
        u16::from_be_bytes([*r0, *r1]),
        u16::from_be_bytes([*g0, *g1]),
        u16::from_be_bytes([*b0, *b1]),
      ]),
      _ => None,
    }
  }
  /// Gets the alpha values for each palette index.
  #[inline]
  #[must_use]
  pub const fn to_alphas(&self) -> &'b [u8] {
    self.0
  }

  /// Checks that the payload fits the colour type (and palette size for
  /// indexed images).
  pub fn check_shape(&self, colour_type: ColourType, palette_len: Option<usize>) -> Result<(), PayloadError> {
    match colour_type {
      ColourType::Y if self.try_to_grayscale().is_some() => Ok(()),
      ColourType::RGB if self.try_to_rgb().is_some() => Ok(()),
      ColourType::Index => match palette_len {
        Some(n) if self.0.len() > n => Err(PayloadError::Invalid("more alpha entries than palette entries")),
        _ if self.0.len() > 256 => Err(PayloadError::Length(self.0.len())),
        _ => Ok(()),
      },
      ColourType::YA | ColourType::RGBA => {
        Err(PayloadError::Invalid("not allowed with an alpha channel colour type"))
      }
      _ => Err(PayloadError::Length(self.0.len())),
    }
  }
}

#[test]
fn test_trns_shapes() {
  let t = tRNS::from(&[0x01, 0x02][..]);
  assert_eq!(t.try_to_grayscale(), Some(0x0102));
  assert_eq!(t.try_to_rgb(), None);
  assert_eq!(t.check_shape(ColourType::Y, None), Ok(()));
  assert_eq!(t.check_shape(ColourType::RGB, None), Err(PayloadError::Length(2)));
  assert_eq!(t.check_shape(ColourType::Index, Some(2)), Ok(()));
  assert!(t.check_shape(ColourType::Index, Some(1)).is_err());
  assert!(t.check_shape(ColourType::RGBA, None).is_err());

  let t = tRNS::from(&[0, 1, 0, 2, 0, 3][..]);
  assert_eq!(t.try_to_rgb(), Some([1, 2, 3]));
}
