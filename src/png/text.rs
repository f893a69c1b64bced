use super::*;

/// Splits a 1 to 79 byte keyword off the front of a payload, at its null
/// terminator.
pub(crate) fn split_keyword(data: &[u8]) -> Result<(&[u8], &[u8]), PayloadError> {
  let nul = data.iter().position(|&b| b == 0).ok_or(PayloadError::Invalid("keyword has no terminator"))?;
  if nul == 0 || nul > 79 {
    return Err(PayloadError::Invalid("keyword must be 1 to 79 bytes"));
  }
  Ok((&data[..nul], &data[nul + 1..]))
}

/// Latin-1 bytes map directly onto the first 256 code points.
#[inline]
#[must_use]
pub(crate) fn latin1_to_string(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| b as char).collect()
}

/// Largest inflated size accepted for text or an ICC profile.
pub const MAX_ANCILLARY_INFLATE: usize = 8 << 20;

/// Inflates compressed text or profile data. `None` when the stream is bad
/// or would inflate past [`MAX_ANCILLARY_INFLATE`].
#[must_use]
pub(crate) fn inflate_ancillary(zlib_data: &[u8]) -> Option<Vec<u8>> {
  miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(zlib_data, MAX_ANCILLARY_INFLATE).ok()
}

/// Textual data
///
/// Key/val pair, Latin-1 encoded. A single null byte separates the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct tEXt<'b> {
  pub keyword: &'b [u8],
  pub text: &'b [u8],
}
impl<'b> tEXt<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    let (keyword, text) = split_keyword(data)?;
    Ok(Self { keyword, text })
  }
}

/// International textual data
///
/// UTF-8 text, optionally zlib compressed, with a language tag and a
/// translated keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
pub struct iTXt<'b> {
  pub keyword: &'b [u8],
  pub compressed: bool,
  pub language_tag: &'b [u8],
  pub translated_keyword: &'b [u8],
  /// raw bytes, still compressed if `compressed` is set
  pub text: &'b [u8],
}
impl<'b> iTXt<'b> {
  pub fn parse(data: &'b [u8]) -> Result<Self, PayloadError> {
    let (keyword, rest) = split_keyword(data)?;
    let (compressed, rest) = match rest {
      [0, 0, rest @ ..] => (false, rest),
      [1, 0, rest @ ..] => (true, rest),
      [1, _, ..] => return Err(PayloadError::Invalid("unknown compression method")),
      _ => return Err(PayloadError::Invalid("bad compression flag")),
    };
    let mut fields = rest.splitn(3, |&b| b == 0);
    let language_tag = fields.next().unwrap_or_default();
    let translated_keyword = fields.next().ok_or(PayloadError::Invalid("language tag has no terminator"))?;
    let text = fields.next().ok_or(PayloadError::Invalid("translated keyword has no terminator"))?;
    Ok(Self { keyword, compressed, language_tag, translated_keyword, text })
  }
}

/// One decoded text entry, from any of the three text chunk types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextEntry {
  pub keyword: String,
  pub text: String,
  /// only set by `iTXt`
  pub language_tag: Option<String>,
  /// only set by `iTXt`
  pub translated_keyword: Option<String>,
  pub was_compressed: bool,
}
impl TextEntry {
  #[must_use]
  pub fn from_text(t: tEXt<'_>) -> Self {
    Self { keyword: latin1_to_string(t.keyword), text: latin1_to_string(t.text), ..Self::default() }
  }

  /// Inflates the text. `None` when the zlib stream is bad.
  #[must_use]
  pub fn from_ztxt(z: zTXt<'_>) -> Option<Self> {
    let text = inflate_ancillary(z.zlib_data)?;
    Some(Self {
      keyword: latin1_to_string(z.keyword),
      text: latin1_to_string(&text),
      was_compressed: true,
      ..Self::default()
    })
  }

  /// Inflates the text if needed. `None` when the zlib stream is bad.
  #[must_use]
  pub fn from_itxt(i: iTXt<'_>) -> Option<Self> {
    let text = if i.compressed {
      String::from_utf8_lossy(&inflate_ancillary(i.text)?).into_owned()
    } else {
      String::from_utf8_lossy(i.text).into_owned()
    };
    Some(Self {
      keyword: latin1_to_string(i.keyword),
      text,
      language_tag: Some(String::from_utf8_lossy(i.language_tag).into_owned()),
      translated_keyword: Some(String::from_utf8_lossy(i.translated_keyword).into_owned()),
      was_compressed: i.compressed,
    })
  }
}

#[test]
fn test_text_chunks() {
  assert!(split_keyword(b"\0abc").is_err());
  assert!(split_keyword(&[b'k'; 80]).is_err());

  let t = tEXt::parse(b"Title\0caf\xE9").unwrap();
  assert_eq!(TextEntry::from_text(t).text, "café");

  let i = iTXt::parse(b"Title\0\0\0en\0Titel\0hello").unwrap();
  assert_eq!((i.language_tag, i.translated_keyword, i.text), (&b"en"[..], &b"Titel"[..], &b"hello"[..]));
  let e = TextEntry::from_itxt(i).unwrap();
  assert_eq!(e.language_tag.as_deref(), Some("en"));
  assert!(iTXt::parse(b"Title\0\0\0en").is_err());

  let packed = miniz_oxide::deflate::compress_to_vec_zlib(b"squished", 6);
  let mut payload = b"k\0\x01\0\0\0".to_vec();
  payload.extend_from_slice(&packed);
  let e = TextEntry::from_itxt(iTXt::parse(&payload).unwrap()).unwrap();
  assert_eq!(e.text, "squished");
  assert!(e.was_compressed);
}

#[test]
fn test_text_inflate_is_bounded() {
  let zeros = vec![0_u8; MAX_ANCILLARY_INFLATE + 1];
  let packed = miniz_oxide::deflate::compress_to_vec_zlib(&zeros, 10);
  assert!(packed.len() < 64 * 1024);
  let mut payload = b"k\0\0".to_vec();
  payload.extend_from_slice(&packed);
  let z = zTXt::parse(&payload).unwrap();
  assert_eq!(TextEntry::from_ztxt(z), None);

  let fits = miniz_oxide::deflate::compress_to_vec_zlib(&zeros[..1000], 10);
  let mut payload = b"k\0\0".to_vec();
  payload.extend_from_slice(&fits);
  let e = TextEntry::from_ztxt(zTXt::parse(&payload).unwrap()).unwrap();
  assert_eq!(e.text.len(), 1000);
}
