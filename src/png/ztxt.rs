use super::*;

/// Compressed textual data
///
/// * keyword (should be 1-79 bytes)
/// * null byte
/// * compression method (only defined for zlib compression)
/// * zlib compressed data stream of Latin-1 text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct zTXt<'b> {
  pub keyword: &'b [u8],
  pub zlib_data: &'b [u8],
}
impl<'b> zTXt<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    let (keyword, rest) = split_keyword(data)?;
    match rest {
      [0, zlib_data @ ..] => Ok(Self { keyword, zlib_data }),
      _ => Err(PayloadError::Invalid("unknown compression method")),
    }
  }
}

#[test]
fn test_ztxt_parse() {
  let packed = miniz_oxide::deflate::compress_to_vec_zlib(b"hello", 6);
  let mut payload = b"Comment\0\0".to_vec();
  payload.extend_from_slice(&packed);
  let z = zTXt::parse(&payload).unwrap();
  assert_eq!(z.keyword, b"Comment");
  assert_eq!(TextEntry::from_ztxt(z).map(|e| e.text), Some(String::from("hello")));

  let broken = zTXt { keyword: b"k", zlib_data: &[1, 2, 3] };
  assert_eq!(TextEntry::from_ztxt(broken), None);
  assert!(zTXt::parse(b"Comment\0\x02").is_err());
}
