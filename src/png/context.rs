use super::*;

/// One frame of an animated PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'b> {
  pub control: fcTL,
  /// The compressed data pieces, in order. Together they form one zlib stream.
  pub data: Vec<&'b [u8]>,
  /// The frame's data is the `IDAT` data (its `fcTL` came before any `IDAT`).
  pub is_default_image: bool,
}

/// Animation chunks seen so far.
///
/// Only the default image is decoded into pixels. The frames are kept as raw
/// data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationState<'b> {
  pub control: Option<acTL>,
  pub frames: Vec<Frame<'b>>,
  /// The sequence number the next `fcTL` or `fdAT` should carry.
  pub next_sequence: u32,
}
impl AnimationState<'_> {
  /// Checks and advances the sequence counter.
  pub(crate) fn take_sequence(&mut self, ty: ChunkTy, found: u32) -> Option<PngWarning> {
    let expected = self.next_sequence;
    self.next_sequence = found.wrapping_add(1);
    if found == expected {
      None
    } else {
      Some(PngWarning::SequenceMismatch { ty, expected, found })
    }
  }
}

/// Everything the chunk callbacks gather while decoding one PNG.
///
/// A context belongs to a single decode call.
#[derive(Debug, Clone, Default)]
pub struct DecodeContext<'b> {
  pub warnings: Vec<PngWarning>,
  pub header: Option<IHDR>,
  pub palette: Option<PLTE<'b>>,
  pub transparency: Option<tRNS<'b>>,
  pub gamma: Option<gAMA>,
  pub significant_bits: Option<sBIT>,
  pub srgb: Option<sRGB>,
  pub chromaticities: Option<cHRM>,
  pub icc_profile: Option<iCCP<'b>>,
  pub background: Option<bKGD>,
  pub histogram: Option<hIST<'b>>,
  pub physical_size: Option<pHYs>,
  pub suggested_palettes: Vec<sPLT<'b>>,
  pub modified: Option<tIME>,
  pub exif: Option<eXIf<'b>>,
  pub text: Vec<TextEntry>,
  /// `IDAT` payloads in file order.
  pub idat: Vec<&'b [u8]>,
  pub animation: AnimationState<'b>,
}
impl<'b> DecodeContext<'b> {
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Records a warning.
  #[inline]
  pub fn warn(&mut self, warning: PngWarning) {
    log::debug!("png warning: {warning}");
    self.warnings.push(warning);
  }

  /// The header's colour type, when there's a header with a known one.
  #[inline]
  #[must_use]
  pub fn colour_type(&self) -> Option<ColourType> {
    self.header.and_then(|h| h.colour_type())
  }
}

#[test]
fn test_animation_sequence() {
  let mut a = AnimationState::default();
  assert_eq!(a.take_sequence(ChunkTy::fcTL, 0), None);
  assert_eq!(a.take_sequence(ChunkTy::fdAT, 1), None);
  assert_eq!(
    a.take_sequence(ChunkTy::fcTL, 5),
    Some(PngWarning::SequenceMismatch { ty: ChunkTy::fcTL, expected: 2, found: 5 })
  );
  assert_eq!(a.next_sequence, 6);
}
