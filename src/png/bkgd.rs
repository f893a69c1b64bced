use super::*;

/// Background color.
///
/// RGB and Greyscale colors are always given as `u16` values. The actual color
/// selected should stay within the bit depth range of the rest of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub enum bKGD {
  Greyscale { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
  Index { i: u8 },
}
impl bKGD {
  /// Parses by length, then checks the form against the colour type.
  pub fn parse(data: &[u8], colour_type: Option<ColourType>) -> Result<Self, PayloadError> {
    let out = match *data {
      [y0, y1] => bKGD::Greyscale { y: u16::from_be_bytes([y0, y1]) },
      [r0, r1, g0, g1, b0, b1] => bKGD::RGB {
        r: u16::from_be_bytes([r0, r1]),
        g: u16::from_be_bytes([g0, g1]),
        b: u16::from_be_bytes([b0, b1]),
      },
      [i] => bKGD::Index { i },
      _ => return Err(PayloadError::Length(data.len())),
    };
    match (out, colour_type) {
      (_, None)
      | (bKGD::Greyscale { .. }, Some(ColourType::Y | ColourType::YA))
      | (bKGD::RGB { .. }, Some(ColourType::RGB | ColourType::RGBA))
      | (bKGD::Index { .. }, Some(ColourType::Index)) => Ok(out),
      _ => Err(PayloadError::Invalid("form doesn't match the colour type")),
    }
  }
}

#[test]
fn test_bkgd_parse() {
  assert_eq!(bKGD::parse(&[0, 7], Some(ColourType::YA)), Ok(bKGD::Greyscale { y: 7 }));
  assert_eq!(bKGD::parse(&[3], None), Ok(bKGD::Index { i: 3 }));
  assert!(bKGD::parse(&[3], Some(ColourType::RGB)).is_err());
  assert_eq!(bKGD::parse(&[0; 4], None), Err(PayloadError::Length(4)));
}
