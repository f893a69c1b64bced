//! The table of chunk types a decoder knows about.

use super::*;

use std::collections::HashMap;

/// A chunk decode callback.
///
/// It gets the raw chunk and the decode context, and records whatever it
/// learns (or a warning) in the context.
pub type DecodeFn = for<'b> fn(RawChunk<'b>, &mut DecodeContext<'b>);

/// How often and where a chunk type can appear.
///
/// [`ChunkTy::ANY`] in `not_after` means "before every other type", and in
/// `not_before` means "after every other type".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRule {
  pub min: usize,
  /// `usize::MAX` for no limit.
  pub max: usize,
  /// All chunks of the type must form a single unbroken run.
  pub sequential: bool,
  /// This type must not appear after any of these.
  pub not_after: &'static [ChunkTy],
  /// This type must not appear before any of these.
  pub not_before: &'static [ChunkTy],
  /// These must be present somewhere in the file.
  pub requires: &'static [ChunkTy],
}
impl ChunkRule {
  /// At most one, anywhere, no dependencies.
  pub const OPTIONAL: Self =
    Self { min: 0, max: 1, sequential: false, not_after: &[], not_before: &[], requires: &[] };
  /// Any number, anywhere, no dependencies.
  pub const REPEATABLE: Self = Self { max: usize::MAX, ..Self::OPTIONAL };
}

/// A registered chunk type.
#[derive(Clone, Copy)]
pub struct ChunkEntry {
  pub rule: ChunkRule,
  pub decode: DecodeFn,
}
impl Debug for ChunkEntry {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ChunkEntry").field("rule", &self.rule).finish_non_exhaustive()
  }
}

/// Chunk rules and callbacks, by type.
///
/// Build one (or use [`ChunkRegistry::standard`]) and then only read from
/// it. Types are kept in registration order so that validation reports
/// problems in a stable order.
#[derive(Debug, Clone, Default)]
pub struct ChunkRegistry {
  entries: HashMap<ChunkTy, ChunkEntry>,
  order: Vec<ChunkTy>,
}
impl ChunkRegistry {
  /// A registry with nothing in it.
  #[inline]
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a chunk type.
  ///
  /// ## Failure
  /// * Registering the same type twice is a programming error, and gives
  ///   [`PngError::DuplicateChunkRule`].
  pub fn register(&mut self, ty: ChunkTy, rule: ChunkRule, decode: DecodeFn) -> Result<(), PngError> {
    if self.entries.contains_key(&ty) {
      return Err(PngError::DuplicateChunkRule(ty));
    }
    self.entries.insert(ty, ChunkEntry { rule, decode });
    self.order.push(ty);
    Ok(())
  }

  #[inline]
  #[must_use]
  pub fn get(&self, ty: ChunkTy) -> Option<&ChunkEntry> {
    self.entries.get(&ty)
  }

  #[inline]
  #[must_use]
  pub fn contains(&self, ty: ChunkTy) -> bool {
    self.entries.contains_key(&ty)
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.order.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.order.is_empty()
  }

  /// The entries in registration order.
  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = (ChunkTy, &ChunkEntry)> + '_ {
    self.order.iter().filter_map(|ty| self.entries.get(ty).map(|e| (*ty, e)))
  }

  /// Every chunk type this crate understands, with the rules from the PNG
  /// and APNG specifications.
  #[must_use]
  pub fn standard() -> Self {
    let mut out = Self::new();
    for &(ty, rule, decode) in STANDARD_CHUNKS {
      if let Err(e) = out.register(ty, rule, decode) {
        log::warn!("standard chunk table: {e}");
      }
    }
    out
  }
}

const BEFORE_IDAT: &[ChunkTy] = &[ChunkTy::IDAT];
const BEFORE_PLTE_AND_IDAT: &[ChunkTy] = &[ChunkTy::PLTE, ChunkTy::IDAT];
const AFTER_PLTE: &[ChunkTy] = &[ChunkTy::PLTE];
const NEEDS_IHDR: &[ChunkTy] = &[ChunkTy::IHDR];

const COLOUR_INFO: ChunkRule =
  ChunkRule { not_after: BEFORE_PLTE_AND_IDAT, requires: NEEDS_IHDR, ..ChunkRule::OPTIONAL };
const PALETTE_INFO: ChunkRule =
  ChunkRule { not_after: BEFORE_IDAT, not_before: AFTER_PLTE, requires: NEEDS_IHDR, ..ChunkRule::OPTIONAL };

#[rustfmt::skip]
const STANDARD_CHUNKS: &[(ChunkTy, ChunkRule, DecodeFn)] = &[
  (ChunkTy::IHDR, ChunkRule { min: 1, not_after: &[ChunkTy::ANY], ..ChunkRule::OPTIONAL }, decode_ihdr),
  (ChunkTy::PLTE, ChunkRule { not_after: BEFORE_IDAT, requires: NEEDS_IHDR, ..ChunkRule::OPTIONAL }, decode_plte),
  (ChunkTy::IDAT, ChunkRule { min: 1, sequential: true, requires: NEEDS_IHDR, ..ChunkRule::REPEATABLE }, decode_idat),
  (ChunkTy::IEND, ChunkRule { min: 1, not_before: &[ChunkTy::ANY], requires: NEEDS_IHDR, ..ChunkRule::OPTIONAL }, decode_iend),
  (ChunkTy::tRNS, PALETTE_INFO, decode_trns),
  (ChunkTy::gAMA, COLOUR_INFO, decode_gama),
  (ChunkTy::sBIT, COLOUR_INFO, decode_sbit),
  (ChunkTy::sRGB, COLOUR_INFO, decode_srgb),
  (ChunkTy::cHRM, COLOUR_INFO, decode_chrm),
  (ChunkTy::iCCP, COLOUR_INFO, decode_iccp),
  (ChunkTy::bKGD, PALETTE_INFO, decode_bkgd),
  (ChunkTy::hIST, ChunkRule { requires: &[ChunkTy::IHDR, ChunkTy::PLTE], ..PALETTE_INFO }, decode_hist),
  (ChunkTy::pHYs, ChunkRule { not_after: BEFORE_IDAT, requires: NEEDS_IHDR, ..ChunkRule::OPTIONAL }, decode_phys),
  (ChunkTy::sPLT, ChunkRule { not_after: BEFORE_IDAT, requires: NEEDS_IHDR, ..ChunkRule::REPEATABLE }, decode_splt),
  (ChunkTy::tIME, ChunkRule::OPTIONAL, decode_time),
  (ChunkTy::tEXt, ChunkRule::REPEATABLE, decode_text),
  (ChunkTy::zTXt, ChunkRule::REPEATABLE, decode_ztxt),
  (ChunkTy::iTXt, ChunkRule::REPEATABLE, decode_itxt),
  (ChunkTy::eXIf, ChunkRule { not_after: BEFORE_IDAT, ..ChunkRule::OPTIONAL }, decode_exif),
  (ChunkTy::acTL, ChunkRule { not_after: BEFORE_IDAT, ..ChunkRule::OPTIONAL }, decode_actl),
  (ChunkTy::fcTL, ChunkRule { requires: &[ChunkTy::acTL], ..ChunkRule::REPEATABLE }, decode_fctl),
  (ChunkTy::fdAT, ChunkRule { not_before: BEFORE_IDAT, requires: &[ChunkTy::acTL, ChunkTy::fcTL], ..ChunkRule::REPEATABLE }, decode_fdat),
];

#[cfg(test)]
mod tests {
  use super::*;

  fn ignore(_: RawChunk<'_>, _: &mut DecodeContext<'_>) {}

  #[test]
  fn test_register_rejects_duplicates() {
    let mut r = ChunkRegistry::new();
    assert!(r.register(ChunkTy(*b"teST"), ChunkRule::OPTIONAL, ignore).is_ok());
    assert_eq!(
      r.register(ChunkTy(*b"teST"), ChunkRule::REPEATABLE, ignore),
      Err(PngError::DuplicateChunkRule(ChunkTy(*b"teST")))
    );
    assert_eq!(r.get(ChunkTy(*b"teST")).map(|e| e.rule), Some(ChunkRule::OPTIONAL));
  }

  #[test]
  fn test_standard_registry() {
    let r = ChunkRegistry::standard();
    assert_eq!(r.len(), STANDARD_CHUNKS.len());
    assert_eq!(r.iter().next().map(|(ty, _)| ty), Some(ChunkTy::IHDR));
    let idat = r.get(ChunkTy::IDAT).unwrap().rule;
    assert!(idat.sequential);
    assert_eq!((idat.min, idat.max), (1, usize::MAX));
    assert!(!r.contains(ChunkTy::ANY));
  }
}
