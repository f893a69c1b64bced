use super::*;

/// Suggested palette
///
/// Each entry is either six or ten bytes, depending on the sample depth of
/// the RGBA channels (1 byte each or 2 bytes each), plus a `u16` frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct sPLT<'b> {
  pub palette_name: &'b [u8],
  pub is_16bit: bool,
  pub entries: &'b [u8],
}
impl<'b> sPLT<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    let (palette_name, rest) = split_keyword(data)?;
    let (is_16bit, entries, entry_size) = match rest {
      [8, entries @ ..] => (false, entries, 6),
      [16, entries @ ..] => (true, entries, 10),
      _ => return Err(PayloadError::Invalid("sample depth must be 8 or 16")),
    };
    if entries.len() % entry_size != 0 {
      return Err(PayloadError::Length(data.len()));
    }
    Ok(Self { palette_name, is_16bit, entries })
  }

  #[inline]
  #[must_use]
  pub fn entry_count(&self) -> usize {
    self.entries.len() / if self.is_16bit { 10 } else { 6 }
  }
}

#[test]
fn test_splt_parse() {
  let s = sPLT::parse(b"p\0\x08abcdef").unwrap();
  assert_eq!(s.entry_count(), 1);
  assert!(sPLT::parse(b"p\0\x10abcdef").is_err());
}
