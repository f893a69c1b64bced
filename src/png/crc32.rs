const CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
  let mut out = [0; 256];
  let mut n = 0;
  while n < 256 {
    let mut c = n as u32;
    let mut k = 0;
    while k < 8 {
      if (c & 1) != 0 {
        c = 0xEDB8_8320_u32 ^ (c >> 1);
      } else {
        c >>= 1;
      }
      //
      k += 1;
    }
    out[n] = c;
    //
    n += 1;
  }
  out
}

fn update_crc(mut crc: u32, iter: impl Iterator<Item = u8>) -> u32 {
  for byte in iter {
    let i = (crc ^ u32::from(byte)) as u8 as usize;
    crc = CRC_TABLE[i] ^ (crc >> 8);
  }
  crc
}

/// Computes the PNG CRC-32 of all bytes in the iterator.
#[inline]
#[must_use]
pub fn png_crc(iter: impl Iterator<Item = u8>) -> u32 {
  update_crc(u32::MAX, iter) ^ u32::MAX
}

/// An incremental CRC-32, for when the bytes arrive in pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32(u32);
impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl Crc32 {
  /// A hasher that hasn't seen any bytes yet.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self(u32::MAX)
  }
  /// Feeds more bytes in.
  #[inline]
  pub fn update(&mut self, bytes: &[u8]) {
    self.0 = update_crc(self.0, bytes.iter().copied());
  }
  /// The CRC of everything fed in so far.
  #[inline]
  #[must_use]
  pub const fn finish(&self) -> u32 {
    self.0 ^ u32::MAX
  }
}

#[test]
fn test_png_crc() {
  // The CRC of an empty IEND chunk is a fixed value seen at the end of every
  // PNG file.
  assert_eq!(png_crc(b"IEND".iter().copied()), 0xAE42_6082);
  assert_eq!(png_crc(b"123456789".iter().copied()), 0xCBF4_3926);

  let mut c = Crc32::new();
  c.update(b"1234");
  c.update(b"56789");
  assert_eq!(c.finish(), 0xCBF4_3926);
}
