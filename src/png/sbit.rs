use super::*;

/// Significant bits
///
/// Records how many bits of each channel were significant in the original
/// image before it was scaled up to the stored bit depth. Indexed images use
/// the `RGB` form, describing the palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub enum sBIT {
  Y { y: u8 },
  YA { y: u8, a: u8 },
  RGB { r: u8, g: u8, b: u8 },
  RGBA { r: u8, g: u8, b: u8, a: u8 },
}
impl sBIT {
  /// Parses the payload by length alone.
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    Ok(match *data {
      [y] => Self::Y { y },
      [y, a] => Self::YA { y, a },
      [r, g, b] => Self::RGB { r, g, b },
      [r, g, b, a] => Self::RGBA { r, g, b, a },
      _ => return Err(PayloadError::Length(data.len())),
    })
  }

  /// The per-channel significant bits, in the colour type's channel order.
  ///
  /// Fails if this chunk's shape doesn't fit the colour type, or if any value
  /// is 0 or exceeds the stored depth (8 for palette entries).
  pub fn channel_bits(&self, colour_type: ColourType, bit_depth: u8) -> Result<[u8; 4], PayloadError> {
    let (bits, count): ([u8; 4], usize) = match (*self, colour_type) {
      (Self::Y { y }, ColourType::Y) => ([y, 0, 0, 0], 1),
      (Self::YA { y, a }, ColourType::YA) => ([y, a, 0, 0], 2),
      (Self::RGB { r, g, b }, ColourType::RGB | ColourType::Index) => ([r, g, b, 0], 3),
      (Self::RGBA { r, g, b, a }, ColourType::RGBA) => ([r, g, b, a], 4),
      _ => return Err(PayloadError::Invalid("shape doesn't match the colour type")),
    };
    let limit = if colour_type == ColourType::Index { 8 } else { bit_depth };
    if bits[..count].iter().any(|&b| b == 0 || b > limit) {
      return Err(PayloadError::Invalid("significant bits out of range"));
    }
    Ok(bits)
  }
}

#[test]
fn test_sbit() {
  let s = sBIT::parse(&[5, 6, 5]).unwrap();
  assert_eq!(s, sBIT::RGB { r: 5, g: 6, b: 5 });
  assert_eq!(s.channel_bits(ColourType::RGB, 8), Ok([5, 6, 5, 0]));
  assert_eq!(s.channel_bits(ColourType::Index, 2), Ok([5, 6, 5, 0]));
  assert!(s.channel_bits(ColourType::RGBA, 8).is_err());
  assert!(sBIT::parse(&[9]).unwrap().channel_bits(ColourType::Y, 8).is_err());
  assert!(sBIT::parse(&[0]).unwrap().channel_bits(ColourType::Y, 8).is_err());
  assert_eq!(sBIT::parse(&[]), Err(PayloadError::Length(0)));
}
