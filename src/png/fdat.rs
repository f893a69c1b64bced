use super::*;

/// Frame Data Chunk
///
/// Same as an `IDAT` payload, behind a sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct fdAT<'b> {
  pub sequence_number: u32,
  pub data: &'b [u8],
}
impl<'b> fdAT<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    match try_pull_byte_array::<4>(data) {
      Some((seq, data)) => Ok(Self { sequence_number: u32::from_be_bytes(seq), data }),
      None => Err(PayloadError::Length(data.len())),
    }
  }
}

#[test]
fn test_fdat_parse() {
  let f = fdAT::parse(&[0, 0, 0, 7, 1, 2]).unwrap();
  assert_eq!(f.sequence_number, 7);
  assert_eq!(f.data, &[1, 2]);
  assert!(fdAT::parse(&[0, 0, 7]).is_err());
}
