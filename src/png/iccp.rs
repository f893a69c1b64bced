use super::*;

/// Embedded ICC profile
///
/// The profile itself stays compressed, nothing here interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct iCCP<'b> {
  pub name: &'b [u8],
  pub zlib_data: &'b [u8],
}
impl<'b> iCCP<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    let (name, rest) = split_keyword(data)?;
    match rest {
      [0, zlib_data @ ..] => Ok(Self { name, zlib_data }),
      _ => Err(PayloadError::Invalid("unknown compression method")),
    }
  }
}

#[test]
fn test_iccp_parse() {
  assert_eq!(iCCP::parse(b"sRGB\0\0zz").map(|i| (i.name, i.zlib_data)), Ok((&b"sRGB"[..], &b"zz"[..])));
  assert!(iCCP::parse(b"sRGB\0\x01zz").is_err());
  assert!(iCCP::parse(b"sRGB").is_err());
}
