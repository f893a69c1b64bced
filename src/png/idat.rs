//! Turning the `IDAT` data back into pixels.
//!
//! The whole pipeline works with the decode context that the chunk callbacks
//! filled in: inflate, unfilter each reduced image, resolve every pixel to
//! ARGB, then put interlaced images back together.

use super::*;

/// Everything needed to turn one pixel's stored samples into ARGB.
struct PixelResolver<'b> {
  colour_type: ColourType,
  bit_depth: u8,
  tables: ChannelTables,
  palette: &'b [[u8; 3]],
  alphas: &'b [u8],
  /// The colour-key, in stored sample values.
  key: Option<[u16; 3]>,
  /// The first out of range palette index, once one is seen.
  bad_index: Option<u8>,
}
impl<'b> PixelResolver<'b> {
  fn new(ctx: &DecodeContext<'b>, colour_type: ColourType, bit_depth: u8) -> Self {
    let significant_bits = ctx
      .significant_bits
      .and_then(|s| s.channel_bits(colour_type, bit_depth).ok())
      .unwrap_or([0; 4]);
    let tables = if colour_type == ColourType::Index {
      ChannelTables { tables: Vec::new() }
    } else {
      ChannelTables::new(colour_type, bit_depth, significant_bits, ctx.gamma)
    };
    let key = ctx.transparency.and_then(|t| match colour_type {
      ColourType::Y => t.try_to_grayscale().map(|y| [y, 0, 0]),
      ColourType::RGB => t.try_to_rgb(),
      _ => None,
    });
    let alphas = match (colour_type, ctx.transparency) {
      (ColourType::Index, Some(t)) => t.to_alphas(),
      _ => &[],
    };
    Self {
      colour_type,
      bit_depth,
      tables,
      palette: ctx.palette.map(|p| p.entries()).unwrap_or(&[]),
      alphas,
      key,
      bad_index: None,
    }
  }

  /// Reads the samples of pixel `x` from an unfiltered row.
  #[inline]
  fn samples(&self, row: &[u8], x: usize) -> [u16; 4] {
    let mut out = [0_u16; 4];
    match self.bit_depth {
      1 | 2 | 4 => {
        let depth = self.bit_depth as usize;
        let bit = x * depth;
        let byte = row.get(bit / 8).copied().unwrap_or(0);
        let shift = 8 - depth - (bit % 8);
        out[0] = u16::from((byte >> shift) & ((1 << depth) - 1) as u8);
      }
      8 => {
        let n = self.colour_type.channel_count();
        for (c, o) in out.iter_mut().take(n).enumerate() {
          *o = u16::from(row.get(x * n + c).copied().unwrap_or(0));
        }
      }
      _ => {
        let n = self.colour_type.channel_count();
        for (c, o) in out.iter_mut().take(n).enumerate() {
          let i = (x * n + c) * 2;
          *o = row.get(i..).and_then(be_u16).unwrap_or(0);
        }
      }
    }
    out
  }

  #[inline]
  fn resolve(&mut self, s: [u16; 4]) -> u32 {
    let t = &self.tables;
    match self.colour_type {
      ColourType::Index => {
        let index = s[0] as u8;
        match self.palette.get(usize::from(index)) {
          Some(&[r, g, b]) => {
            let a = self.alphas.get(usize::from(index)).copied().unwrap_or(255);
            pack_argb(a, r, g, b)
          }
          None => {
            if self.bad_index.is_none() {
              self.bad_index = Some(index);
            }
            pack_argb(255, 0, 0, 0)
          }
        }
      }
      ColourType::Y if self.key == Some([s[0], 0, 0]) => 0,
      ColourType::RGB if self.key == Some([s[0], s[1], s[2]]) => 0,
      ColourType::Y => {
        let y = t.get(0, s[0]);
        pack_argb(255, y, y, y)
      }
      ColourType::YA => {
        let y = t.get(0, s[0]);
        pack_argb(t.get(1, s[1]), y, y, y)
      }
      ColourType::RGB => pack_argb(255, t.get(0, s[0]), t.get(1, s[1]), t.get(2, s[2])),
      ColourType::RGBA => pack_argb(t.get(3, s[3]), t.get(0, s[0]), t.get(1, s[1]), t.get(2, s[2])),
    }
  }
}

/// Inflates all the `IDAT` data into a buffer of exactly `expected` bytes.
///
/// A stream that fails to inflate counts as no data at all. Missing data is
/// zero filled, and extra data is dropped, with a warning either way. `None`
/// when the buffer can't be allocated.
fn inflate_idat(ctx: &mut DecodeContext<'_>, expected: usize) -> Option<Vec<u8>> {
  let mut buffer: Vec<u8> = Vec::new();
  // one extra byte lets us notice data past the expected end
  let bytes = expected.saturating_add(1);
  if buffer.try_reserve(bytes).is_err() {
    ctx.warn(PngWarning::AllocationFailed { bytes });
    return None;
  }
  buffer.resize(expected + 1, 0);
  let result =
    miniz_oxide::inflate::decompress_slice_iter_to_slice(&mut buffer, ctx.idat.iter().copied(), true, true);
  let found = match result {
    Ok(count) => count,
    Err(miniz_oxide::inflate::TINFLStatus::HasMoreOutput) => buffer.len(),
    Err(e) => {
      log::trace!("inflate error: {e:?}");
      ctx.warn(PngWarning::InflateFailed);
      buffer.iter_mut().for_each(|b| *b = 0);
      0
    }
  };
  if found != expected {
    ctx.warn(PngWarning::DataLengthMismatch { expected, found });
  }
  if found < expected {
    buffer[found..].iter_mut().for_each(|b| *b = 0);
  }
  buffer.truncate(expected);
  Some(buffer)
}

/// Unfilters and resolves one (reduced) image.
///
/// `None` means a row used a filter type that doesn't exist.
fn decode_reduced_image(
  ctx: &mut DecodeContext<'_>, header: &IHDR, resolver: &mut PixelResolver<'_>, data: &[u8], pass: usize,
  width: u32, height: u32,
) -> Option<Bitmap> {
  let mut image = Bitmap::new(width, height, 0);
  if width == 0 || height == 0 {
    return Some(image);
  }
  let step = header.filter_step();
  let line_len = header.bytes_per_scanline(width);
  let mut above: Vec<u8> = Vec::new();
  let mut row = vec![0_u8; line_len];
  for (y, line) in data.chunks_exact(line_len + 1).take(height as usize).enumerate() {
    let filter = match FilterType::try_from(line[0]) {
      Ok(f) => f,
      Err(filter) => {
        ctx.warn(PngWarning::UnsupportedFilterType { pass, row: y as u32, filter });
        return None;
      }
    };
    row.copy_from_slice(&line[1..]);
    defilter_row(filter, &mut row, &above, step);
    let out_row = &mut image.pixels[y * width as usize..][..width as usize];
    for (x, px) in out_row.iter_mut().enumerate() {
      *px = resolver.resolve(resolver.samples(&row, x));
    }
    core::mem::swap(&mut above, &mut row);
    row.resize(line_len, 0);
  }
  Some(image)
}

/// Runs the full image data pipeline over a filled in decode context.
///
/// Any problem that prevents decoding gives an empty bitmap and a warning.
pub fn decode_image_data(ctx: &mut DecodeContext<'_>, max_dimension: u32) -> Bitmap {
  let Some(header) = ctx.header else {
    ctx.warn(PngWarning::MissingHeader);
    return Bitmap::default();
  };
  if header.compression_method != 0 {
    ctx.warn(PngWarning::UnsupportedCompressionMethod(header.compression_method));
    return Bitmap::default();
  }
  if header.filter_method != 0 {
    ctx.warn(PngWarning::UnsupportedFilterMethod(header.filter_method));
    return Bitmap::default();
  }
  if header.interlace_method > 1 {
    ctx.warn(PngWarning::UnsupportedInterlaceMethod(header.interlace_method));
    return Bitmap::default();
  }
  let colour_type = match header.colour_type() {
    Some(c) if c.allows_bit_depth(header.bit_depth) => c,
    _ => {
      ctx.warn(PngWarning::UnsupportedPixelFormat {
        bit_depth: header.bit_depth,
        colour_type: header.colour_type,
      });
      return Bitmap::default();
    }
  };
  if header.width == 0 || header.height == 0 {
    ctx.warn(PngWarning::InvalidChunkData { ty: ChunkTy::IHDR, reason: "zero width or height" });
    return Bitmap::default();
  }
  if header.width > max_dimension || header.height > max_dimension {
    ctx.warn(PngWarning::DimensionsTooLarge { width: header.width, height: header.height });
    return Bitmap::default();
  }
  if colour_type == ColourType::Index && ctx.palette.is_none() {
    ctx.warn(PngWarning::MissingPalette);
  }

  let expected = header.inflated_len();
  let Some(data) = inflate_idat(ctx, expected) else { return Bitmap::default() };
  let mut resolver = PixelResolver::new(ctx, colour_type, header.bit_depth);
  let dims = reduced_image_dimensions(header.width, header.height);

  let out = if header.interlace_method == 0 {
    decode_reduced_image(ctx, &header, &mut resolver, &data, 0, header.width, header.height)
  } else {
    let mut rest: &[u8] = &data;
    let mut passes: [Bitmap; 7] = Default::default();
    let mut ok = true;
    for (i, pass) in passes.iter_mut().enumerate() {
      let (w, h) = dims[i + 1];
      let used = if w == 0 || h == 0 { 0 } else { (header.bytes_per_scanline(w) + 1) * h as usize };
      let (this_pass, more) = rest.split_at(used.min(rest.len()));
      rest = more;
      match decode_reduced_image(ctx, &header, &mut resolver, this_pass, i + 1, w, h) {
        Some(image) => *pass = image,
        None => {
          ok = false;
          break;
        }
      }
    }
    ok.then(|| adam7_interleave(&passes, header.width, header.height))
  };

  if let (Some(index), Some(p)) = (resolver.bad_index, ctx.palette) {
    ctx.warn(PngWarning::PaletteIndexOutOfRange { index, palette_len: p.entries().len() });
  }
  out.unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn zlib(data: &[u8]) -> Vec<u8> {
    miniz_oxide::deflate::compress_to_vec_zlib(data, 6)
  }

  fn ctx_for<'b>(header: IHDR, idat: &'b [u8]) -> DecodeContext<'b> {
    let mut ctx = DecodeContext::new();
    ctx.header = Some(header);
    ctx.idat.push(idat);
    ctx
  }

  fn header(width: u32, height: u32, bit_depth: u8, colour_type: u8, interlace_method: u8) -> IHDR {
    IHDR { width, height, bit_depth, colour_type, compression_method: 0, filter_method: 0, interlace_method }
  }

  #[test]
  fn test_one_bit_grey() {
    let z = zlib(&[0, 0b1000_0000, 1, 0b0100_0000]);
    let mut ctx = ctx_for(header(2, 2, 1, 0, 0), &z);
    let bitmap = decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION);
    assert_eq!(ctx.warnings, vec![]);
    assert_eq!(bitmap.pixels, vec![0xFFFF_FFFF, 0xFF00_0000, 0xFF00_0000, 0xFFFF_FFFF]);
  }

  #[test]
  fn test_rgb_colour_key() {
    let z = zlib(&[0, 1, 2, 3, 4, 5, 6]);
    let mut ctx = ctx_for(header(2, 1, 8, 2, 0), &z);
    ctx.transparency = Some(tRNS::from(&[0, 4, 0, 5, 0, 6][..]));
    let bitmap = decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION);
    assert_eq!(bitmap.pixels, vec![0xFF01_0203, 0]);
  }

  #[test]
  fn test_palette_with_alpha_and_bad_index() {
    let z = zlib(&[0, 0x01, 0x23]);
    let mut ctx = ctx_for(header(4, 1, 4, 3, 0), &z);
    ctx.palette = Some(PLTE::parse(&[10, 20, 30, 40, 50, 60]).unwrap());
    ctx.transparency = Some(tRNS::from(&[128][..]));
    let bitmap = decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION);
    assert_eq!(bitmap.pixels, vec![0x800A_141E, 0xFF28_323C, 0xFF00_0000, 0xFF00_0000]);
    assert_eq!(ctx.warnings, vec![PngWarning::PaletteIndexOutOfRange { index: 2, palette_len: 2 }]);
  }

  #[test]
  fn test_short_data_and_bad_stream() {
    let z = zlib(&[0, 9]);
    let mut ctx = ctx_for(header(2, 2, 8, 0, 0), &z);
    let bitmap = decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION);
    assert_eq!(ctx.warnings, vec![PngWarning::DataLengthMismatch { expected: 6, found: 2 }]);
    assert_eq!(bitmap.pixels, vec![0xFF09_0909, 0xFF00_0000, 0xFF00_0000, 0xFF00_0000]);

    let mut ctx = ctx_for(header(2, 2, 8, 0, 0), &[1, 2, 3]);
    let bitmap = decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION);
    assert_eq!(ctx.warnings[0], PngWarning::InflateFailed);
    assert_eq!(bitmap.pixels.len(), 4);
  }

  #[test]
  fn test_unallocatable_buffer_warns() {
    let mut ctx = DecodeContext::new();
    assert_eq!(inflate_idat(&mut ctx, usize::MAX), None);
    assert_eq!(ctx.warnings, vec![PngWarning::AllocationFailed { bytes: usize::MAX }]);
  }

  #[test]
  fn test_unsupported_things_give_empty_images() {
    let z = zlib(&[7, 0]);
    let mut ctx = ctx_for(header(1, 1, 8, 0, 0), &z);
    assert!(decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION).is_empty());
    assert_eq!(ctx.warnings, vec![PngWarning::UnsupportedFilterType { pass: 0, row: 0, filter: 7 }]);

    let mut ctx = ctx_for(header(1, 1, 8, 0, 2), &z);
    assert!(decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION).is_empty());
    assert_eq!(ctx.warnings, vec![PngWarning::UnsupportedInterlaceMethod(2)]);

    let mut ctx = ctx_for(header(1, 1, 4, 2, 0), &z);
    assert!(decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION).is_empty());

    let mut ctx = ctx_for(header(20, 1, 8, 0, 0), &z);
    assert!(decode_image_data(&mut ctx, 10).is_empty());
    assert_eq!(ctx.warnings, vec![PngWarning::DimensionsTooLarge { width: 20, height: 1 }]);

    let mut ctx = DecodeContext::new();
    assert!(decode_image_data(&mut ctx, 10).is_empty());
    assert_eq!(ctx.warnings, vec![PngWarning::MissingHeader]);
  }

  #[test]
  fn test_interlaced_rgba() {
    // 3x3 RGBA, every pixel different, stored as 8-bit interlaced
    let full: Vec<u32> = (0..9).map(|i| 0x8000_0000 | (i * 0x0001_0203)).collect();
    let full = Bitmap { width: 3, height: 3, pixels: full };
    let mut raw = Vec::new();
    for pass in adam7_split(&full).iter() {
      for row in pass.rows() {
        raw.push(0);
        for &px in row {
          let [a, r, g, b] = unpack_argb(px);
          raw.extend_from_slice(&[r, g, b, a]);
        }
      }
    }
    let z = zlib(&raw);
    let mut ctx = ctx_for(header(3, 3, 8, 6, 1), &z);
    assert_eq!(decode_image_data(&mut ctx, DEFAULT_MAX_DIMENSION), full);
    assert_eq!(ctx.warnings, vec![]);
  }
}
