use pngsift::{
  encode::{encode_png, encode_rows, EncodeOptions, TimeBudget},
  png::{decode_png, ChunkTy, ColourType, PngWarning},
  Bitmap, PngError,
};

fn preserve() -> EncodeOptions {
  EncodeOptions::default().with_preserve_transparent_colour(true)
}

/// Bit depth and colour type straight out of the IHDR bytes.
fn depth_and_colour_type(png: &[u8]) -> (u8, u8) {
  (png[24], png[25])
}

fn grey(level: u32) -> u32 {
  0xFF00_0000 | level << 16 | level << 8 | level
}

/// Encodes with the transparent colours kept, checks the decode is exact,
/// and hands back the bit depth and colour type used.
fn round_trip_preserving(pixels: &[u32], width: usize) -> (u8, u8) {
  let rows: Vec<&[u32]> = pixels.chunks(width).collect();
  let png = encode_rows(&rows, &preserve().with_time_budget(TimeBudget::Unlimited)).unwrap();
  let decoded = decode_png(&png);
  assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
  let mismatches: Vec<(usize, u32, u32)> = pixels
    .iter()
    .zip(&decoded.bitmap.pixels)
    .enumerate()
    .filter(|(_, (a, b))| a != b)
    .map(|(i, (&a, &b))| (i, a, b))
    .collect();
  assert_eq!(mismatches, vec![]);
  assert_eq!(decoded.bitmap.pixels.len(), pixels.len());
  depth_and_colour_type(&png)
}

fn random_image(w: usize, h: usize) -> Bitmap {
  let rows: Vec<Vec<u32>> = (0..h).map(|_| super::rand_pixels(w)).collect();
  Bitmap::from_rows(&rows).unwrap()
}

#[test]
fn test_random_image_round_trips() {
  for (w, h) in [(1, 1), (7, 3), (20, 17)] {
    let image = random_image(w, h);
    let png = encode_png(&image, &preserve()).unwrap();
    let decoded = decode_png(&png);
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded.bitmap, image);
  }
}

#[test]
fn test_many_colours_round_trip() {
  // more than 256 colours, opaque, then with one fully transparent pixel
  let mut pixels: Vec<u32> = (0..600_u32).map(|i| 0xFF00_0000 | (i.wrapping_mul(0x01_0307) & 0xFF_FFFF)).collect();
  for extra in [None, Some(0x0000_0000), Some(0x0012_3456), Some(0x8012_3456)] {
    if let Some(px) = extra {
      pixels[17] = px;
    }
    let rows: Vec<&[u32]> = pixels.chunks(30).collect();
    let png = encode_rows(&rows, &preserve()).unwrap();
    let decoded = decode_png(&png);
    assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
    assert_eq!(decoded.bitmap.pixels, pixels, "{extra:?}");
  }
}

#[test]
fn test_transparent_pixels_become_zero() {
  let image = Bitmap::from_rows(&[[0x0012_3456_u32, 0xFF12_3456], [0x00AB_CDEF, 0xFF00_0000]]).unwrap();
  let png = encode_png(&image, &EncodeOptions::default()).unwrap();
  let decoded = decode_png(&png);
  assert_eq!(decoded.bitmap.pixels, vec![0, 0xFF12_3456, 0, 0xFF00_0000]);
}

#[test]
fn test_re_encode_is_no_bigger() {
  let image = random_image(9, 9);
  let options = EncodeOptions::default().with_time_budget(TimeBudget::Unlimited);
  let first = encode_png(&image, &options).unwrap();
  let second = encode_png(&decode_png(&first).bitmap, &options).unwrap();
  assert!(second.len() <= first.len());
}

#[test]
fn test_crc_flip_is_reported() {
  let image = random_image(5, 5);
  let png = encode_png(&image, &preserve()).unwrap();
  // first byte of the IHDR payload
  let mut bad = png.clone();
  bad[16] ^= 0x01;
  let decoded = decode_png(&bad);
  assert!(decoded.warnings.iter().any(|w| matches!(w, PngWarning::CrcMismatch { ty: ChunkTy::IHDR, .. })));
  // last byte of the IDAT payload (IEND is the final 12 bytes)
  let mut bad = png;
  let i = bad.len() - 12 - 4 - 1;
  bad[i] ^= 0x80;
  let decoded = decode_png(&bad);
  assert!(decoded.warnings.iter().any(|w| matches!(w, PngWarning::CrcMismatch { ty: ChunkTy::IDAT, .. })));
}

#[test]
fn test_few_colours_use_a_palette() {
  let colours = [0xFFFF_0000, 0xFF00_FF00, 0xFF00_00FF, 0x80FF_FF00, 0x0000_0000];
  let pixels: Vec<u32> = (0..64_usize).map(|i| colours[(i * 7 + i / 8) % colours.len()]).collect();
  let rows: Vec<&[u32]> = pixels.chunks(8).collect();
  let png = encode_rows(&rows, &preserve()).unwrap();
  let (bit_depth, colour_type) = depth_and_colour_type(&png);
  assert_eq!(colour_type, ColourType::Index as u8);
  assert!(bit_depth == 4 || bit_depth == 8);
  assert_eq!(decode_png(&png).bitmap.pixels, pixels);
}

#[test]
fn test_unlimited_budget_is_no_worse() {
  let image = random_image(12, 12);
  let quick = encode_png(&image, &preserve().with_time_budget(TimeBudget::Limited(Default::default()))).unwrap();
  let full = encode_png(&image, &preserve().with_time_budget(TimeBudget::Unlimited)).unwrap();
  assert!(full.len() <= quick.len());
}

#[test]
fn test_black_and_white_is_one_bit_grey() {
  let rows: [[u32; 2]; 2] = [[0xFFFF_FFFF, 0xFF00_0000], [0xFF00_0000, 0xFFFF_FFFF]];
  let png = encode_rows(&rows, &EncodeOptions::default()).unwrap();
  assert_eq!(depth_and_colour_type(&png), (1, ColourType::Y as u8));
  let decoded = decode_png(&png);
  assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
  assert_eq!(decoded.bitmap.to_rows(), rows.map(|r| r.to_vec()).to_vec());
}

#[test]
fn test_empty_image_is_an_error() {
  let rows: [&[u32]; 0] = [];
  assert_eq!(encode_rows(&rows, &EncodeOptions::default()), Err(PngError::EmptyImage));
  let rows: [&[u32]; 3] = [&[], &[], &[]];
  assert_eq!(encode_rows(&rows, &EncodeOptions::default()), Err(PngError::EmptyImage));
}

#[test]
fn test_grey_with_colour_key_round_trips() {
  // every level but 0x80, plus transparent pixels, in four rows
  let row: Vec<u32> = core::iter::once(0).chain((0..=255).filter(|&l| l != 0x80).map(grey)).collect();
  let pixels: Vec<u32> = row.iter().cycle().take(row.len() * 4).copied().collect();
  assert_eq!(round_trip_preserving(&pixels, row.len()), (8, ColourType::Y as u8));
}

#[test]
fn test_every_grey_level_plus_transparent_round_trips() {
  // no grey level is free for a key, so alpha has to be stored
  let pixels: Vec<u32> = core::iter::once(0).chain((0..=255).map(grey)).collect();
  assert_eq!(round_trip_preserving(&pixels, 257), (8, ColourType::YA as u8));
}

#[test]
fn test_grey_with_partial_alpha_round_trips() {
  let pixels: Vec<u32> =
    (0..=255_u32).flat_map(|l| [l << 24 | (255 - l) * 0x01_0101, grey(l)]).collect();
  assert_eq!(round_trip_preserving(&pixels, 32), (8, ColourType::YA as u8));
}

#[test]
fn test_all_grey_levels_round_trip_as_grey() {
  let pixels: Vec<u32> = (0..=255).rev().chain(0..=255).map(grey).collect();
  assert_eq!(round_trip_preserving(&pixels, 64).1, ColourType::Y as u8);
}
