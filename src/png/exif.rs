use super::*;

/// Exchangeable Image File (Exif) Profile
///
/// The format of this data is well outside of PNG, so it's only checked for
/// a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct eXIf<'b> {
  pub data: &'b [u8],
}
impl<'b> eXIf<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    match data {
      [b'M', b'M', ..] | [b'I', b'I', ..] => Ok(Self { data }),
      _ => Err(PayloadError::Invalid("no byte order mark")),
    }
  }
}
