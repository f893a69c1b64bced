use super::*;

/// Frame control
///
/// Describes the region and timing of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub struct fcTL {
  pub sequence_number: u32,
  pub width: u32,
  pub height: u32,
  pub x_offset: u32,
  pub y_offset: u32,
  pub delay_num: u16,
  pub delay_den: u16,
  pub dispose_op: u8,
  pub blend_op: u8,
}
impl fcTL {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    if data.len() != 26 {
      return Err(PayloadError::Length(data.len()));
    }
    let u32_at = |i: usize| be_u32(&data[i..]).unwrap_or_default();
    let u16_at = |i: usize| be_u16(&data[i..]).unwrap_or_default();
    let out = Self {
      sequence_number: u32_at(0),
      width: u32_at(4),
      height: u32_at(8),
      x_offset: u32_at(12),
      y_offset: u32_at(16),
      delay_num: u16_at(20),
      delay_den: u16_at(22),
      dispose_op: data[24],
      blend_op: data[25],
    };
    if out.width == 0 || out.height == 0 {
      return Err(PayloadError::Invalid("empty frame"));
    }
    if out.dispose_op > 2 || out.blend_op > 1 {
      return Err(PayloadError::Invalid("unknown dispose or blend op"));
    }
    Ok(out)
  }

  /// Frame delay in seconds. A zero denominator means hundredths.
  #[inline]
  #[must_use]
  pub fn delay_seconds(&self) -> f64 {
    let den = if self.delay_den == 0 { 100 } else { self.delay_den };
    f64::from(self.delay_num) / f64::from(den)
  }
}

#[test]
fn test_fctl_parse() {
  let mut data = [0_u8; 26];
  data[3] = 1; // sequence
  data[7] = 4; // width
  data[11] = 2; // height
  data[21] = 1; // delay_num
  let f = fcTL::parse(&data).unwrap();
  assert_eq!((f.sequence_number, f.width, f.height), (1, 4, 2));
  assert!((f.delay_seconds() - 0.01).abs() < 1e-9);
  data[24] = 3;
  assert!(fcTL::parse(&data).is_err());
  assert_eq!(fcTL::parse(&data[..25]), Err(PayloadError::Length(25)));
}
