use super::*;

/// Image histogram
///
/// One big-endian `u16` frequency per palette entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct hIST<'b> {
  data: &'b [u8],
}
impl<'b> hIST<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    if data.len() % 2 == 0 && !data.is_empty() && data.len() <= 512 {
      Ok(Self { data })
    } else {
      Err(PayloadError::Length(data.len()))
    }
  }

  /// The number of palette entries described.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.data.len() / 2
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// histogram data
  #[inline]
  pub fn frequencies(&self) -> impl Iterator<Item = u16> + 'b {
    self.data.chunks_exact(2).map(|b| u16::from_be_bytes([b[0], b[1]]))
  }
}

#[test]
fn test_hist_parse() {
  let h = hIST::parse(&[0, 1, 0, 2]).unwrap();
  assert_eq!(h.len(), 2);
  assert_eq!(h.frequencies().collect::<Vec<_>>(), vec![1, 2]);
  assert!(hIST::parse(&[0, 1, 0]).is_err());
}
