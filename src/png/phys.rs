use super::*;

/// Physical pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct pHYs {
  pub pixels_per_x: u32,
  pub pixels_per_y: u32,
  /// otherwise the values only give an aspect ratio
  pub is_meters: bool,
}
impl pHYs {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    match *data {
      [x0, x1, x2, x3, y0, y1, y2, y3, unit @ (0 | 1)] => Ok(Self {
        pixels_per_x: u32::from_be_bytes([x0, x1, x2, x3]),
        pixels_per_y: u32::from_be_bytes([y0, y1, y2, y3]),
        is_meters: unit == 1,
      }),
      [_, _, _, _, _, _, _, _, _] => Err(PayloadError::Invalid("unknown unit specifier")),
      _ => Err(PayloadError::Length(data.len())),
    }
  }
}

#[test]
fn test_phys_parse() {
  let p = pHYs::parse(&[0, 0, 0, 1, 0, 0, 0, 2, 1]).unwrap();
  assert_eq!((p.pixels_per_x, p.pixels_per_y, p.is_meters), (1, 2, true));
  assert!(pHYs::parse(&[0, 0, 0, 1, 0, 0, 0, 2, 2]).is_err());
}
