use super::*;

/// Primary chromaticities and white point, each times 100,000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub struct cHRM {
  pub white_x: u32,
  pub white_y: u32,
  pub red_x: u32,
  pub red_y: u32,
  pub green_x: u32,
  pub green_y: u32,
  pub blue_x: u32,
  pub blue_y: u32,
}
impl cHRM {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    if data.len() != 4 * 8 {
      return Err(PayloadError::Length(data.len()));
    }
    let mut v = [0_u32; 8];
    for (out, bytes) in v.iter_mut().zip(data.chunks_exact(4)) {
      *out = be_u32(bytes).unwrap_or_default();
    }
    let [white_x, white_y, red_x, red_y, green_x, green_y, blue_x, blue_y] = v;
    Ok(Self { white_x, white_y, red_x, red_y, green_x, green_y, blue_x, blue_y })
  }
}
