use pngsift::{
  encode::{encode_png, ChunkWriter, EncodeOptions, TimeBudget},
  png::{decode_png, ChunkTy, PngChunk, IHDR, PNG_SIGNATURE},
  Bitmap,
};
use walkdir::WalkDir;

#[test]
fn test_decode_png_no_panics() {
  // iter ALL files in the test folder, even non-png files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    let png = decode_png(&v);
    for chunk in png.parsed_chunks() {
      let _ = chunk.map(|c| c.to_string());
    }
  }
  // even totally random data should never panic the decoder!
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    let png = decode_png(&v);
    assert!(!png.warnings.is_empty());
    let mut v = v;
    v[..8].copy_from_slice(&PNG_SIGNATURE);
    decode_png(&v);
  }
}

#[test]
fn test_damaged_png_no_panics() {
  let image = Bitmap::from_rows(&[super::rand_pixels(12), super::rand_pixels(12), super::rand_pixels(12)]).unwrap();
  let options = EncodeOptions::default().with_time_budget(TimeBudget::Limited(Default::default()));
  let good = encode_png(&image, &options).unwrap();
  for cut in 0..good.len() {
    decode_png(&good[..cut]);
  }
  let noise = super::rand_bytes(good.len());
  for i in 8..good.len() {
    let mut bad = good.clone();
    bad[i] ^= noise[i] | 1;
    let png = decode_png(&bad);
    assert!(!png.warnings.is_empty(), "flipping byte {i} went unnoticed");
  }
}

#[test]
fn test_chunk_display() {
  let png = encode_png(&Bitmap::new(2, 1, 0xFF00_00FF), &EncodeOptions::default()).unwrap();
  let decoded = decode_png(&png);
  let lines: Vec<String> = decoded.parsed_chunks().map(|c| c.unwrap().to_string()).collect();
  assert!(lines[0].starts_with("IHDR"), "{lines:?}");
  assert!(lines.last().unwrap().starts_with("IEND"), "{lines:?}");
  assert!(matches!(PngChunk::parse(decoded.chunks[0]), Ok(PngChunk::IHDR(_))));
}

/// A 2x1 16-bit greyscale image with the given extra chunks before `IDAT`.
fn sixteen_bit_grey(extra: &[(ChunkTy, &[u8])]) -> Vec<u8> {
  let header = IHDR {
    width: 2,
    height: 1,
    bit_depth: 16,
    colour_type: 0,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  };
  let mut w = ChunkWriter::new();
  w.write_chunk(ChunkTy::IHDR, &header.to_bytes()).unwrap();
  for &(ty, data) in extra {
    w.write_chunk(ty, data).unwrap();
  }
  let scanline = [0, 0x80, 0x80, 0xFF, 0xFF];
  w.write_chunk(ChunkTy::IDAT, &miniz_oxide::deflate::compress_to_vec_zlib(&scanline, 6)).unwrap();
  w.write_chunk(ChunkTy::IEND, &[]).unwrap();
  w.finish()
}

#[test]
fn test_sixteen_bit_significant_bits_and_gamma() {
  let png = sixteen_bit_grey(&[(ChunkTy::sBIT, &[8][..])]);
  let decoded = decode_png(&png);
  assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
  assert_eq!(decoded.bit_depth, 16);
  assert_eq!(decoded.bitmap.pixels, vec![0xFF80_8080, 0xFFFF_FFFF]);

  // gamma 0.22727 squares the normalised sample
  let gamma = 22727_u32.to_be_bytes();
  let png = sixteen_bit_grey(&[(ChunkTy::gAMA, &gamma[..]), (ChunkTy::sBIT, &[8][..])]);
  let decoded = decode_png(&png);
  assert!(decoded.warnings.is_empty(), "{:?}", decoded.warnings);
  assert_eq!(decoded.bitmap.pixels, vec![0xFF40_4040, 0xFFFF_FFFF]);
}
