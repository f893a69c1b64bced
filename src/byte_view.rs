//! Bounds-checked views over byte buffers.
//!
//! None of these know anything about PNG. They exist so that the chunk reader
//! and the payload parsers can clamp to whatever data is actually present
//! instead of indexing out of bounds.

/// Gets the sub-slice `bytes[start..start+len]`, clamped to the available
/// data.
///
/// The `bool` is `true` when the requested view had to be shortened.
#[inline]
#[must_use]
pub fn clamp_view(bytes: &[u8], start: usize, len: usize) -> (&[u8], bool) {
  let start = start.min(bytes.len());
  let available = bytes.len() - start;
  if len <= available {
    (&bytes[start..start + len], false)
  } else {
    (&bytes[start..], true)
  }
}

/// Splits off the first `N` bytes as an array, if there's enough data.
#[inline]
#[must_use]
pub fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> Option<([u8; N], &[u8])> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().ok()?;
    Some((a, tail))
  } else {
    None
  }
}

/// Reads a big-endian `u32` from the start of the slice.
#[inline]
#[must_use]
pub fn be_u32(bytes: &[u8]) -> Option<u32> {
  try_pull_byte_array::<4>(bytes).map(|(a, _)| u32::from_be_bytes(a))
}

/// Reads a big-endian `u16` from the start of the slice.
#[inline]
#[must_use]
pub fn be_u16(bytes: &[u8]) -> Option<u16> {
  try_pull_byte_array::<2>(bytes).map(|(a, _)| u16::from_be_bytes(a))
}

#[test]
fn test_clamp_view() {
  let data = [1_u8, 2, 3, 4, 5];
  assert_eq!(clamp_view(&data, 1, 3), (&data[1..4], false));
  assert_eq!(clamp_view(&data, 3, 10), (&data[3..], true));
  assert_eq!(clamp_view(&data, 9, 1), (&data[5..], true));
  assert_eq!(clamp_view(&data, 5, 0), (&data[5..], false));
}

#[test]
fn test_be_reads() {
  assert_eq!(be_u32(&[0, 0, 1, 2, 99]), Some(0x0102));
  assert_eq!(be_u32(&[0, 0, 1]), None);
  assert_eq!(be_u16(&[0xAB, 0xCD]), Some(0xABCD));
  assert_eq!(try_pull_byte_array::<2>(&[1, 2, 3]), Some(([1, 2], &[3_u8][..])));
}
