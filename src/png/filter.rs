//! Scanline filters, in both directions.
//!
//! Every filter works on bytes, not samples. The "left" byte is `step` bytes
//! back (the size of one whole pixel, or 1 for sub-byte pixels), and all
//! positions outside the image count as 0.

use super::*;

/// The five PNG filter types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FilterType {
  None = 0,
  Sub = 1,
  Up = 2,
  Average = 3,
  Paeth = 4,
}
impl FilterType {
  pub const ALL: [Self; 5] = [Self::None, Self::Sub, Self::Up, Self::Average, Self::Paeth];
}
impl TryFrom<u8> for FilterType {
  type Error = u8;
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => Self::None,
      1 => Self::Sub,
      2 => Self::Up,
      3 => Self::Average,
      4 => Self::Paeth,
      other => return Err(other),
    })
  }
}

#[inline]
#[must_use]
pub const fn paeth_predict(a: u8, b: u8, c: u8) -> u8 {
  let a_ = a as i32;
  let b_ = b as i32;
  let c_ = c as i32;
  let p: i32 = a_ + b_ - c_;
  let pa = (p - a_).abs();
  let pb = (p - b_).abs();
  let pc = (p - c_).abs();
  // The order of these tests is fixed by the format, ties go left first.
  if pa <= pb && pa <= pc {
    a
  } else if pb <= pc {
    b
  } else {
    c
  }
}

/// The prediction for byte `i`, given the left (`a`), above (`b`) and
/// upper-left (`c`) bytes.
#[inline]
#[must_use]
const fn predict(filter: FilterType, a: u8, b: u8, c: u8) -> u8 {
  match filter {
    FilterType::None => 0,
    FilterType::Sub => a,
    FilterType::Up => b,
    FilterType::Average => ((a as u16 + b as u16) / 2) as u8,
    FilterType::Paeth => paeth_predict(a, b, c),
  }
}

/// Filters one row into `out`.
///
/// `above` is the previous *unfiltered* row, or empty for the first row of an
/// image. `out` must be the same length as `row`.
pub fn filter_row(filter: FilterType, row: &[u8], above: &[u8], step: usize, out: &mut [u8]) {
  let step = step.max(1);
  for (i, (o, &x)) in out.iter_mut().zip(row.iter()).enumerate() {
    let a = if i >= step { row[i - step] } else { 0 };
    let b = above.get(i).copied().unwrap_or(0);
    let c = if i >= step { above.get(i - step).copied().unwrap_or(0) } else { 0 };
    *o = x.wrapping_sub(predict(filter, a, b, c));
  }
}

/// Reverses a filter in place.
///
/// `above` is the previous *reconstructed* row, or empty for the first row of
/// an image.
pub fn defilter_row(filter: FilterType, row: &mut [u8], above: &[u8], step: usize) {
  let step = step.max(1);
  match filter {
    FilterType::None => (),
    FilterType::Up => {
      row.iter_mut().zip(above.iter()).for_each(|(p, &b)| *p = p.wrapping_add(b));
    }
    _ => {
      for i in 0..row.len() {
        let a = if i >= step { row[i - step] } else { 0 };
        let b = above.get(i).copied().unwrap_or(0);
        let c = if i >= step { above.get(i - step).copied().unwrap_or(0) } else { 0 };
        row[i] = row[i].wrapping_add(predict(filter, a, b, c));
      }
    }
  }
}

#[test]
fn test_paeth_predict() {
  assert_eq!(paeth_predict(10, 20, 10), 20);
  assert_eq!(paeth_predict(20, 10, 10), 20);
  assert_eq!(paeth_predict(0, 0, 0), 0);
  // p = 5+5-5 = 5, all tied, left wins
  assert_eq!(paeth_predict(5, 5, 5), 5);
  assert_eq!(paeth_predict(1, 200, 255), 1);
}

#[test]
fn test_filter_round_trip() {
  let row: Vec<u8> = (0..37_u32).map(|i| (i * 71 + 13) as u8).collect();
  let above: Vec<u8> = (0..37_u32).map(|i| (i * 151 + 200) as u8).collect();
  for step in [1, 2, 3, 4, 8] {
    for filter in FilterType::ALL {
      for above in [&above[..], &[][..]] {
        let mut filtered = vec![0; row.len()];
        filter_row(filter, &row, above, step, &mut filtered);
        defilter_row(filter, &mut filtered, above, step);
        assert_eq!(filtered, row, "{filter:?} step {step}");
      }
    }
  }
}

#[test]
fn test_filter_values() {
  let mut out = [0; 4];
  filter_row(FilterType::Sub, &[1, 2, 3, 4], &[], 1, &mut out);
  assert_eq!(out, [1, 1, 1, 1]);
  filter_row(FilterType::Up, &[1, 2, 3, 4], &[1, 1, 1, 1], 1, &mut out);
  assert_eq!(out, [0, 1, 2, 3]);
  filter_row(FilterType::Average, &[10, 10], &[4, 6], 1, &mut out[..2]);
  assert_eq!(out[..2], [8, 2]);
  assert_eq!(FilterType::try_from(5), Err(5));
}
