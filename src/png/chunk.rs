use super::*;

/// Why a payload couldn't be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadError {
  /// The payload can't be this many bytes long.
  Length(usize),
  /// The length is fine but a field holds a value that isn't allowed.
  Invalid(&'static str),
}

/// A parsed PNG chunk
///
/// Parsing here only looks at the one chunk. Checks that need other chunks
/// (such as `tRNS` against the colour type) happen during decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(nonstandard_style)]
pub enum PngChunk<'b> {
  IHDR(IHDR),
  PLTE(PLTE<'b>),
  /// Image Data, still compressed.
  IDAT(&'b [u8]),
  IEND,
  tRNS(tRNS<'b>),
  gAMA(gAMA),
  sBIT(sBIT),
  sRGB(sRGB),
  cHRM(cHRM),
  iCCP(iCCP<'b>),
  bKGD(bKGD),
  hIST(hIST<'b>),
  pHYs(pHYs),
  sPLT(sPLT<'b>),
  tIME(tIME),
  tEXt(tEXt<'b>),
  zTXt(zTXt<'b>),
  iTXt(iTXt<'b>),
  eXIf(eXIf<'b>),
  acTL(acTL),
  fcTL(fcTL),
  fdAT(fdAT<'b>),
  /// Any chunk type without a parser.
  Unknown(RawChunk<'b>),
}
impl<'b> PngChunk<'b> {
  /// Parses the payload according to the chunk's type.
  pub fn parse(raw: RawChunk<'b>) -> Result<Self, PayloadError> {
    let data = raw.data;
    Ok(match raw.ty {
      ChunkTy::IHDR => {
        PngChunk::IHDR(IHDR::parse(data).ok_or(PayloadError::Length(data.len()))?)
      }
      ChunkTy::PLTE => PngChunk::PLTE(PLTE::parse(data)?),
      ChunkTy::IDAT => PngChunk::IDAT(data),
      ChunkTy::IEND => match data {
        [] => PngChunk::IEND,
        _ => return Err(PayloadError::Length(data.len())),
      },
      ChunkTy::tRNS => match data.len() {
        0..=256 => PngChunk::tRNS(tRNS::from(data)),
        n => return Err(PayloadError::Length(n)),
      },
      ChunkTy::gAMA => PngChunk::gAMA(gAMA::parse(data)?),
      ChunkTy::sBIT => PngChunk::sBIT(sBIT::parse(data)?),
      ChunkTy::sRGB => PngChunk::sRGB(sRGB::parse(data)?),
      ChunkTy::cHRM => PngChunk::cHRM(cHRM::parse(data)?),
      ChunkTy::iCCP => PngChunk::iCCP(iCCP::parse(data)?),
      ChunkTy::bKGD => PngChunk::bKGD(bKGD::parse(data, None)?),
      ChunkTy::hIST => PngChunk::hIST(hIST::parse(data)?),
      ChunkTy::pHYs => PngChunk::pHYs(pHYs::parse(data)?),
      ChunkTy::sPLT => PngChunk::sPLT(sPLT::parse(data)?),
      ChunkTy::tIME => PngChunk::tIME(tIME::parse(data)?),
      ChunkTy::tEXt => PngChunk::tEXt(tEXt::parse(data)?),
      ChunkTy::zTXt => PngChunk::zTXt(zTXt::parse(data)?),
      ChunkTy::iTXt => PngChunk::iTXt(iTXt::parse(data)?),
      ChunkTy::eXIf => PngChunk::eXIf(eXIf::parse(data)?),
      ChunkTy::acTL => PngChunk::acTL(acTL::parse(data)?),
      ChunkTy::fcTL => PngChunk::fcTL(fcTL::parse(data)?),
      ChunkTy::fdAT => PngChunk::fdAT(fdAT::parse(data)?),
      _ => PngChunk::Unknown(raw),
    })
  }

  /// Parses, turning a failure into the matching warning.
  pub fn parse_or_warn(raw: RawChunk<'b>) -> Result<Self, PngWarning> {
    Self::parse(raw).map_err(|e| e.to_warning(raw.ty))
  }
}
impl PayloadError {
  #[inline]
  #[must_use]
  pub fn to_warning(self, ty: ChunkTy) -> PngWarning {
    match self {
      PayloadError::Length(found) => PngWarning::BadChunkLength { ty, found },
      PayloadError::Invalid(reason) => PngWarning::InvalidChunkData { ty, reason },
    }
  }
}

/// Shows at most this many bytes of any byte string field.
const SHOWN_BYTES: usize = 40;

fn write_bytes(f: &mut core::fmt::Formatter<'_>, bytes: &[u8]) -> core::fmt::Result {
  f.write_char('"')?;
  for &b in bytes.iter().take(SHOWN_BYTES) {
    if b.is_ascii_graphic() || b == b' ' {
      f.write_char(b as char)?;
    } else {
      write!(f, "\\x{b:02X}")?;
    }
  }
  f.write_char('"')?;
  if bytes.len() > SHOWN_BYTES {
    write!(f, "...")?;
  }
  Ok(())
}

impl Display for PngChunk<'_> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      PngChunk::IHDR(h) => write!(
        f,
        "IHDR {}x{}, depth {}, colour type {}, interlace {}",
        h.width, h.height, h.bit_depth, h.colour_type, h.interlace_method
      ),
      PngChunk::PLTE(p) => write!(f, "PLTE {} entries", p.entries().len()),
      PngChunk::IDAT(d) => write!(f, "IDAT {} bytes", d.len()),
      PngChunk::IEND => write!(f, "IEND"),
      PngChunk::tRNS(t) => write!(f, "tRNS {} bytes", t.to_alphas().len()),
      PngChunk::gAMA(g) => write!(f, "gAMA {:.5}", g.gamma as f64 / 100_000.0),
      PngChunk::sBIT(s) => write!(f, "sBIT {s:?}"),
      PngChunk::sRGB(s) => write!(f, "sRGB {:?}", s.intent),
      PngChunk::cHRM(c) => write!(
        f,
        "cHRM white ({}, {}) red ({}, {}) green ({}, {}) blue ({}, {})",
        c.white_x, c.white_y, c.red_x, c.red_y, c.green_x, c.green_y, c.blue_x, c.blue_y
      ),
      PngChunk::iCCP(i) => {
        write!(f, "iCCP ")?;
        write_bytes(f, i.name)?;
        write!(f, ", {} compressed bytes", i.zlib_data.len())
      }
      PngChunk::bKGD(b) => write!(f, "bKGD {b:?}"),
      PngChunk::hIST(h) => write!(f, "hIST {} entries", h.len()),
      PngChunk::pHYs(p) => write!(
        f,
        "pHYs {}x{} {}",
        p.pixels_per_x,
        p.pixels_per_y,
        if p.is_meters { "per metre" } else { "(aspect ratio)" }
      ),
      PngChunk::sPLT(s) => {
        write!(f, "sPLT ")?;
        write_bytes(f, s.palette_name)?;
        write!(f, ", {} entries", s.entry_count())
      }
      PngChunk::tIME(t) => write!(f, "tIME {t}"),
      PngChunk::tEXt(t) => {
        write!(f, "tEXt ")?;
        write_bytes(f, t.keyword)?;
        write!(f, " = ")?;
        write_bytes(f, t.text)
      }
      PngChunk::zTXt(z) => {
        write!(f, "zTXt ")?;
        write_bytes(f, z.keyword)?;
        write!(f, ", {} compressed bytes", z.zlib_data.len())
      }
      PngChunk::iTXt(i) => {
        write!(f, "iTXt ")?;
        write_bytes(f, i.keyword)?;
        write!(f, " [")?;
        write_bytes(f, i.language_tag)?;
        write!(f, "]")?;
        if i.compressed {
          write!(f, ", {} compressed bytes", i.text.len())
        } else {
          write!(f, " = ")?;
          write_bytes(f, i.text)
        }
      }
      PngChunk::eXIf(e) => write!(f, "eXIf {} bytes", e.data.len()),
      PngChunk::acTL(a) => write!(f, "acTL {} frames, {} plays", a.num_frames, a.num_plays),
      PngChunk::fcTL(c) => write!(
        f,
        "fcTL #{} {}x{} at ({}, {}), {:.3}s",
        c.sequence_number,
        c.width,
        c.height,
        c.x_offset,
        c.y_offset,
        c.delay_seconds()
      ),
      PngChunk::fdAT(d) => write!(f, "fdAT #{} {} bytes", d.sequence_number, d.data.len()),
      PngChunk::Unknown(raw) => write!(
        f,
        "{} ({}) {} bytes",
        raw.ty,
        if raw.ty.is_critical() { "critical" } else { "ancillary" },
        raw.data.len()
      ),
    }
  }
}

#[test]
fn test_png_chunk_parse_and_display() {
  let raw = |ty: ChunkTy, data: &'static [u8]| RawChunk {
    ty,
    declared_len: data.len() as u32,
    data,
    declared_crc: None,
  };
  let c = PngChunk::parse(raw(ChunkTy::gAMA, &[0, 0, 0xB1, 0x8F])).unwrap();
  assert_eq!(c.to_string(), "gAMA 0.45455");
  assert_eq!(PngChunk::parse(raw(ChunkTy::IEND, &[])).unwrap().to_string(), "IEND");
  assert_eq!(PngChunk::parse(raw(ChunkTy::IEND, &[1])), Err(PayloadError::Length(1)));
  let t = PngChunk::parse(raw(ChunkTy::tEXt, b"Title\0hi\n")).unwrap();
  assert_eq!(t.to_string(), "tEXt \"Title\" = \"hi\\x0A\"");
  let u = PngChunk::parse(raw(ChunkTy(*b"zzZz"), &[1, 2])).unwrap();
  assert!(matches!(u, PngChunk::Unknown(_)));
  assert_eq!(u.to_string(), "zzZz (ancillary) 2 bytes");
  assert_eq!(
    PngChunk::parse_or_warn(raw(ChunkTy::sRGB, &[9])),
    Err(PngWarning::InvalidChunkData { ty: ChunkTy::sRGB, reason: "unknown rendering intent" })
  );
}
