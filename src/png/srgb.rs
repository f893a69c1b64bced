use super::*;

/// The sRGB rendering intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SrgbIntent {
  Perceptual,
  RelativeColorimetric,
  Saturation,
  AbsoluteColorimetric,
}

/// Standard RGB colour space
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct sRGB {
  pub intent: SrgbIntent,
}
impl sRGB {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    Ok(Self {
      intent: match *data {
        [0] => SrgbIntent::Perceptual,
        [1] => SrgbIntent::RelativeColorimetric,
        [2] => SrgbIntent::Saturation,
        [3] => SrgbIntent::AbsoluteColorimetric,
        [_] => return Err(PayloadError::Invalid("unknown rendering intent")),
        _ => return Err(PayloadError::Length(data.len())),
      },
    })
  }
}

#[test]
fn test_srgb_parse() {
  assert_eq!(sRGB::parse(&[3]).map(|s| s.intent), Ok(SrgbIntent::AbsoluteColorimetric));
  assert!(sRGB::parse(&[4]).is_err());
  assert_eq!(sRGB::parse(&[]), Err(PayloadError::Length(0)));
}
