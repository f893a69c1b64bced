use super::*;

/// Image last-modification time, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(nonstandard_style)]
#[allow(missing_docs)]
pub struct tIME {
  pub year: u16,
  pub month: u8,
  pub day: u8,
  pub hour: u8,
  pub minute: u8,
  pub second: u8,
}
impl tIME {
  pub fn parse(data: &[u8]) -> Result<Self, PayloadError> {
    match *data {
      [y0, y1, month, day, hour, minute, second] => {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
          return Err(PayloadError::Invalid("date out of range"));
        }
        // 60 allows for leap seconds
        if hour > 23 || minute > 59 || second > 60 {
          return Err(PayloadError::Invalid("time out of range"));
        }
        Ok(Self { year: u16::from_be_bytes([y0, y1]), month, day, hour, minute, second })
      }
      _ => Err(PayloadError::Length(data.len())),
    }
  }
}
impl Display for tIME {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(
      f,
      "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
      self.year, self.month, self.day, self.hour, self.minute, self.second
    )
  }
}

#[test]
fn test_time_parse() {
  let t = tIME::parse(&[0x07, 0xE8, 2, 29, 23, 59, 60]).unwrap();
  assert_eq!(t.to_string(), "2024-02-29 23:59:60");
  assert!(tIME::parse(&[0x07, 0xE8, 13, 1, 0, 0, 0]).is_err());
}
