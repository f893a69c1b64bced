//! The decode callbacks of the standard registry.
//!
//! A callback that can't make sense of its chunk records a warning and
//! stores nothing.

use super::*;

/// Parses the raw chunk with `parse`, warning on failure.
#[inline]
fn parse_with<'b, T>(
  raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>, parse: impl FnOnce(&'b [u8]) -> Result<T, PayloadError>,
) -> Option<T> {
  match parse(raw.data) {
    Ok(t) => Some(t),
    Err(e) => {
      ctx.warn(e.to_warning(raw.ty));
      None
    }
  }
}

pub(crate) fn decode_ihdr<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if ctx.header.is_some() {
    return;
  }
  match IHDR::parse(raw.data) {
    Some(h) => ctx.header = Some(h),
    None => ctx.warn(PngWarning::BadChunkLength { ty: raw.ty, found: raw.data.len() }),
  }
}

pub(crate) fn decode_plte<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if ctx.palette.is_some() {
    return;
  }
  let Some(plte) = parse_with(raw, ctx, PLTE::parse) else { return };
  match ctx.header {
    Some(h) if matches!(h.colour_type(), Some(ColourType::Y | ColourType::YA)) => {
      ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "palette with a greyscale colour type" });
      return;
    }
    Some(h) if h.colour_type() == Some(ColourType::Index) && h.bit_depth < 8 => {
      if plte.entries().len() > (1 << h.bit_depth) {
        ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "more entries than the bit depth can index" });
      }
    }
    _ => (),
  }
  ctx.palette = Some(plte);
}

pub(crate) fn decode_idat<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  ctx.idat.push(raw.data);
  if let Some(frame) = ctx.animation.frames.last_mut() {
    if frame.is_default_image {
      frame.data.push(raw.data);
    }
  }
}

pub(crate) fn decode_iend<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if !raw.data.is_empty() {
    ctx.warn(PngWarning::BadChunkLength { ty: raw.ty, found: raw.data.len() });
  }
}

pub(crate) fn decode_trns<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let trns = tRNS::from(raw.data);
  if let Some(colour_type) = ctx.colour_type() {
    let palette_len = ctx.palette.map(|p| p.entries().len());
    if let Err(e) = trns.check_shape(colour_type, palette_len) {
      ctx.warn(e.to_warning(raw.ty));
      return;
    }
  }
  ctx.transparency = Some(trns);
}

pub(crate) fn decode_gama<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if let Some(g) = parse_with(raw, ctx, gAMA::parse) {
    ctx.gamma = Some(g);
  }
}

pub(crate) fn decode_sbit<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(sbit) = parse_with(raw, ctx, sBIT::parse) else { return };
  if let Some(h) = ctx.header {
    if let Some(colour_type) = h.colour_type() {
      if let Err(e) = sbit.channel_bits(colour_type, h.bit_depth) {
        ctx.warn(e.to_warning(raw.ty));
        return;
      }
    }
  }
  ctx.significant_bits = Some(sbit);
}

pub(crate) fn decode_srgb<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  ctx.srgb = parse_with(raw, ctx, sRGB::parse).or(ctx.srgb);
}

pub(crate) fn decode_chrm<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  ctx.chromaticities = parse_with(raw, ctx, cHRM::parse).or(ctx.chromaticities);
}

pub(crate) fn decode_iccp<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(iccp) = parse_with(raw, ctx, iCCP::parse) else { return };
  if inflate_ancillary(iccp.zlib_data).is_none() {
    ctx.warn(PngWarning::AncillaryInflateFailed { ty: raw.ty });
    return;
  }
  ctx.icc_profile = Some(iccp);
}

pub(crate) fn decode_bkgd<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let colour_type = ctx.colour_type();
  let Some(bkgd) = parse_with(raw, ctx, |data| bKGD::parse(data, colour_type)) else { return };
  if let (bKGD::Index { i }, Some(p)) = (bkgd, ctx.palette) {
    if usize::from(i) >= p.entries().len() {
      ctx.warn(PngWarning::PaletteIndexOutOfRange { index: i, palette_len: p.entries().len() });
      return;
    }
  }
  ctx.background = Some(bkgd);
}

pub(crate) fn decode_hist<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(hist) = parse_with(raw, ctx, hIST::parse) else { return };
  if let Some(p) = ctx.palette {
    if hist.len() != p.entries().len() {
      ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "entry count differs from the palette" });
      return;
    }
  }
  ctx.histogram = Some(hist);
}

pub(crate) fn decode_phys<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  ctx.physical_size = parse_with(raw, ctx, pHYs::parse).or(ctx.physical_size);
}

pub(crate) fn decode_splt<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(splt) = parse_with(raw, ctx, sPLT::parse) else { return };
  if ctx.suggested_palettes.iter().any(|s| s.palette_name == splt.palette_name) {
    ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "palette name used twice" });
    return;
  }
  ctx.suggested_palettes.push(splt);
}

pub(crate) fn decode_time<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  ctx.modified = parse_with(raw, ctx, tIME::parse).or(ctx.modified);
}

pub(crate) fn decode_text<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if let Some(t) = parse_with(raw, ctx, tEXt::parse) {
    ctx.text.push(TextEntry::from_text(t));
  }
}

pub(crate) fn decode_ztxt<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(z) = parse_with(raw, ctx, zTXt::parse) else { return };
  match TextEntry::from_ztxt(z) {
    Some(entry) => ctx.text.push(entry),
    None => ctx.warn(PngWarning::AncillaryInflateFailed { ty: raw.ty }),
  }
}

pub(crate) fn decode_itxt<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(i) = parse_with(raw, ctx, iTXt::parse) else { return };
  match TextEntry::from_itxt(i) {
    Some(entry) => ctx.text.push(entry),
    None => ctx.warn(PngWarning::AncillaryInflateFailed { ty: raw.ty }),
  }
}

pub(crate) fn decode_exif<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if let Some(e) = parse_with(raw, ctx, eXIf::parse) {
    ctx.exif = Some(e);
  }
}

pub(crate) fn decode_actl<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  if ctx.animation.control.is_none() {
    ctx.animation.control = parse_with(raw, ctx, acTL::parse);
  }
}

pub(crate) fn decode_fctl<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(control) = parse_with(raw, ctx, fcTL::parse) else { return };
  if let Some(w) = ctx.animation.take_sequence(raw.ty, control.sequence_number) {
    ctx.warn(w);
  }
  if let Some(h) = ctx.header {
    let fits_x = control.x_offset.checked_add(control.width).map_or(false, |r| r <= h.width);
    let fits_y = control.y_offset.checked_add(control.height).map_or(false, |b| b <= h.height);
    if !fits_x || !fits_y {
      ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "frame outside of the image" });
    }
  }
  let is_default_image = ctx.idat.is_empty();
  ctx.animation.frames.push(Frame { control, data: Vec::new(), is_default_image });
}

pub(crate) fn decode_fdat<'b>(raw: RawChunk<'b>, ctx: &mut DecodeContext<'b>) {
  let Some(fdat) = parse_with(raw, ctx, fdAT::parse) else { return };
  if let Some(w) = ctx.animation.take_sequence(raw.ty, fdat.sequence_number) {
    ctx.warn(w);
  }
  match ctx.animation.frames.last_mut() {
    Some(frame) if !frame.is_default_image => frame.data.push(fdat.data),
    _ => ctx.warn(PngWarning::InvalidChunkData { ty: raw.ty, reason: "frame data without a frame" }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn raw(ty: ChunkTy, data: &[u8]) -> RawChunk<'_> {
    RawChunk { ty, declared_len: data.len() as u32, data, declared_crc: None }
  }

  fn header(colour_type: u8, bit_depth: u8) -> IHDR {
    IHDR {
      width: 4,
      height: 4,
      bit_depth,
      colour_type,
      compression_method: 0,
      filter_method: 0,
      interlace_method: 0,
    }
  }

  #[test]
  fn test_bad_payloads_store_nothing() {
    let mut ctx = DecodeContext::new();
    decode_gama(raw(ChunkTy::gAMA, &[0, 0, 1]), &mut ctx);
    assert_eq!(ctx.gamma, None);
    assert_eq!(ctx.warnings, vec![PngWarning::BadChunkLength { ty: ChunkTy::gAMA, found: 3 }]);

    ctx.header = Some(header(2, 8));
    decode_trns(raw(ChunkTy::tRNS, &[0, 1]), &mut ctx);
    assert_eq!(ctx.transparency, None);
    decode_sbit(raw(ChunkTy::sBIT, &[9, 9, 9]), &mut ctx);
    assert_eq!(ctx.significant_bits, None);
    assert_eq!(ctx.warnings.len(), 3);
  }

  #[test]
  fn test_palette_checks() {
    let mut ctx = DecodeContext::new();
    ctx.header = Some(header(0, 8));
    decode_plte(raw(ChunkTy::PLTE, &[1, 2, 3]), &mut ctx);
    assert!(ctx.palette.is_none());

    let mut ctx = DecodeContext::new();
    ctx.header = Some(header(3, 1));
    decode_plte(raw(ChunkTy::PLTE, &[0; 9]), &mut ctx);
    assert_eq!(ctx.palette.map(|p| p.entries().len()), Some(3));
    assert_eq!(ctx.warnings.len(), 1);
    decode_bkgd(raw(ChunkTy::bKGD, &[3]), &mut ctx);
    assert_eq!(ctx.background, None);
    decode_bkgd(raw(ChunkTy::bKGD, &[2]), &mut ctx);
    assert_eq!(ctx.background, Some(bKGD::Index { i: 2 }));
  }

  #[test]
  fn test_oversized_text_warns() {
    let zeros = vec![0_u8; MAX_ANCILLARY_INFLATE + 1];
    let mut payload = b"Comment\0\0".to_vec();
    payload.extend_from_slice(&miniz_oxide::deflate::compress_to_vec_zlib(&zeros, 10));
    let mut ctx = DecodeContext::new();
    decode_ztxt(raw(ChunkTy::zTXt, &payload), &mut ctx);
    assert!(ctx.text.is_empty());
    assert_eq!(ctx.warnings, vec![PngWarning::AncillaryInflateFailed { ty: ChunkTy::zTXt }]);
  }

  #[test]
  fn test_animation_frames() {
    let mut ctx = DecodeContext::new();
    ctx.header = Some(header(6, 8));
    decode_actl(raw(ChunkTy::acTL, &[0, 0, 0, 2, 0, 0, 0, 0]), &mut ctx);
    let mut fctl = [0_u8; 26];
    fctl[7] = 4;
    fctl[11] = 4;
    decode_fctl(raw(ChunkTy::fcTL, &fctl), &mut ctx);
    decode_idat(raw(ChunkTy::IDAT, &[1, 2]), &mut ctx);
    let mut next_fctl = fctl;
    next_fctl[3] = 1;
    decode_fctl(raw(ChunkTy::fcTL, &next_fctl), &mut ctx);
    decode_fdat(raw(ChunkTy::fdAT, &[0, 0, 0, 2, 7, 7]), &mut ctx);
    assert_eq!(ctx.warnings, vec![]);
    let frames = &ctx.animation.frames;
    assert_eq!(frames.len(), 2);
    assert!(frames[0].is_default_image);
    assert_eq!(frames[0].data, vec![&[1_u8, 2][..]]);
    assert_eq!(frames[1].data, vec![&[7_u8, 7][..]]);
    assert_eq!(ctx.animation.control.map(|a| a.num_frames), Some(2));
  }
}
