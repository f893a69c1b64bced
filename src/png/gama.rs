use super::*;

/// Image gamma, times 100,000.
///
/// When present the decoder applies `1 / (gamma * 2.2)` as a display
/// exponent while building its channel tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct gAMA {
  pub gamma: u32,
}
impl gAMA {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    match *data {
      [a, b, c, d] => match u32::from_be_bytes([a, b, c, d]) {
        0 => Err(PayloadError::Invalid("gamma of zero")),
        gamma => Ok(Self { gamma }),
      },
      _ => Err(PayloadError::Length(data.len())),
    }
  }

  /// The exponent that takes a stored sample to a display sample.
  #[inline]
  #[must_use]
  pub fn display_exponent(&self) -> f64 {
    1.0 / ((self.gamma as f64 / 100_000.0) * 2.2)
  }
}

#[test]
fn test_gama_parse() {
  let g = gAMA::parse(&[0, 0, 0xB1, 0x8F]).unwrap();
  assert_eq!(g, gAMA { gamma: 45455 });
  assert!((g.display_exponent() - 1.0).abs() < 0.001);
  assert!(gAMA::parse(&[0, 0, 0, 0]).is_err());
  assert_eq!(gAMA::parse(&[0, 0, 1]), Err(PayloadError::Length(3)));
}
