use super::*;

/// Animation control
///
/// Marks the file as an animated PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct acTL {
  pub num_frames: u32,
  /// 0 means loop forever
  pub num_plays: u32,
}
impl acTL {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    match *data {
      [f0, f1, f2, f3, p0, p1, p2, p3] => match u32::from_be_bytes([f0, f1, f2, f3]) {
        0 => Err(PayloadError::Invalid("zero frames")),
        num_frames => Ok(Self { num_frames, num_plays: u32::from_be_bytes([p0, p1, p2, p3]) }),
      },
      _ => Err(PayloadError::Length(data.len())),
    }
  }
}
