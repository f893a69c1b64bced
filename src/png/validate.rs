//! Checks chunk counts and ordering against a registry.

use super::*;

/// Where a sequential chunk type is, in a walk over the chunk list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
  NotYetSeen,
  InRun,
  RunEnded,
}

/// If every chunk of type `ty` forms one unbroken run.
fn is_one_run(chunks: &[RawChunk<'_>], ty: ChunkTy) -> bool {
  let mut state = RunState::NotYetSeen;
  for chunk in chunks {
    state = match (state, chunk.ty == ty) {
      (RunState::NotYetSeen, false) => RunState::NotYetSeen,
      (RunState::NotYetSeen, true) | (RunState::InRun, true) => RunState::InRun,
      (RunState::InRun, false) | (RunState::RunEnded, false) => RunState::RunEnded,
      (RunState::RunEnded, true) => return false,
    };
  }
  true
}

/// If `found` counts as `other` for the rules of `ty`: [`ChunkTy::ANY`]
/// matches every type except `ty` itself.
#[inline]
fn matches_rule_ty(found: ChunkTy, ty: ChunkTy, other: ChunkTy) -> bool {
  if other == ChunkTy::ANY {
    found != ty
  } else {
    found == other
  }
}

/// Checks every registered rule, then reports unknown chunk types.
///
/// Nothing here stops decoding, every problem is only a warning.
#[must_use]
pub fn validate(chunks: &[RawChunk<'_>], registry: &ChunkRegistry) -> Vec<PngWarning> {
  let mut warnings = Vec::new();
  for (ty, entry) in registry.iter() {
    let rule = entry.rule;
    let found = chunks.iter().filter(|c| c.ty == ty).count();
    if found < rule.min {
      warnings.push(PngWarning::TooFewChunks { ty, min: rule.min, found });
    }
    if found > rule.max {
      warnings.push(PngWarning::TooManyChunks { ty, max: rule.max, found });
    }
    if found == 0 {
      continue;
    }
    if rule.sequential && !is_one_run(chunks, ty) {
      warnings.push(PngWarning::NotSequential { ty });
    }
    let first = chunks.iter().position(|c| c.ty == ty).unwrap_or(0);
    let last = chunks.iter().rposition(|c| c.ty == ty).unwrap_or(0);
    for &other in rule.not_after {
      // anything of type `other` before our last chunk is a violation
      if let Some(other) = chunks[..last].iter().map(|c| c.ty).find(|&c| matches_rule_ty(c, ty, other)) {
        warnings.push(PngWarning::ChunkAfter { ty, other });
      }
    }
    for &other in rule.not_before {
      // anything of type `other` after our first chunk is a violation
      if let Some(other) = chunks[first + 1..].iter().map(|c| c.ty).find(|&c| matches_rule_ty(c, ty, other)) {
        warnings.push(PngWarning::ChunkBefore { ty, other });
      }
    }
    for &requires in rule.requires {
      if !chunks.iter().any(|c| c.ty == requires) {
        warnings.push(PngWarning::MissingDependency { ty, requires });
      }
    }
  }
  let mut unknown: Vec<ChunkTy> = Vec::new();
  for chunk in chunks {
    if !registry.contains(chunk.ty) && !unknown.contains(&chunk.ty) {
      unknown.push(chunk.ty);
      warnings.push(PngWarning::UnknownChunk { ty: chunk.ty, critical: chunk.ty.is_critical() });
    }
  }
  warnings
}

/// Hands every registered chunk to its callback, in file order.
pub fn dispatch<'b>(chunks: &[RawChunk<'b>], registry: &ChunkRegistry, ctx: &mut DecodeContext<'b>) {
  for &chunk in chunks {
    if let Some(entry) = registry.get(chunk.ty) {
      (entry.decode)(chunk, ctx);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn list(tys: &[&[u8; 4]]) -> Vec<RawChunk<'static>> {
    tys
      .iter()
      .map(|ty| RawChunk { ty: ChunkTy(**ty), declared_len: 0, data: &[], declared_crc: Some(0) })
      .collect()
  }

  #[test]
  fn test_run_state_machine() {
    let c = list(&[b"IHDR", b"IDAT", b"IDAT", b"IEND"]);
    assert!(is_one_run(&c, ChunkTy::IDAT));
    let c = list(&[b"IHDR", b"IDAT", b"tEXt", b"IDAT", b"IEND"]);
    assert!(!is_one_run(&c, ChunkTy::IDAT));
    assert!(is_one_run(&c, ChunkTy::PLTE));
  }

  #[test]
  fn test_clean_file_has_no_warnings() {
    let r = ChunkRegistry::standard();
    let c = list(&[b"IHDR", b"gAMA", b"PLTE", b"tRNS", b"IDAT", b"IDAT", b"tEXt", b"IEND"]);
    assert_eq!(validate(&c, &r), vec![]);
  }

  #[test]
  fn test_ordering_problems() {
    let r = ChunkRegistry::standard();
    let c = list(&[b"IHDR", b"IDAT", b"PLTE", b"tEXt", b"IDAT", b"IEND", b"IEND", b"zzZz", b"ZZZZ"]);
    let w = validate(&c, &r);
    assert_eq!(
      w,
      vec![
        PngWarning::ChunkAfter { ty: ChunkTy::PLTE, other: ChunkTy::IDAT },
        PngWarning::NotSequential { ty: ChunkTy::IDAT },
        PngWarning::TooManyChunks { ty: ChunkTy::IEND, max: 1, found: 2 },
        PngWarning::ChunkBefore { ty: ChunkTy::IEND, other: ChunkTy(*b"zzZz") },
        PngWarning::UnknownChunk { ty: ChunkTy(*b"zzZz"), critical: false },
        PngWarning::UnknownChunk { ty: ChunkTy(*b"ZZZZ"), critical: true },
      ]
    );
  }

  #[test]
  fn test_missing_and_misplaced() {
    let r = ChunkRegistry::standard();
    let c = list(&[b"tRNS", b"IHDR", b"fdAT", b"IDAT"]);
    let w = validate(&c, &r);
    assert!(w.contains(&PngWarning::ChunkAfter { ty: ChunkTy::IHDR, other: ChunkTy::tRNS }));
    assert!(w.contains(&PngWarning::TooFewChunks { ty: ChunkTy::IEND, min: 1, found: 0 }));
    assert!(w.contains(&PngWarning::ChunkBefore { ty: ChunkTy::fdAT, other: ChunkTy::IDAT }));
    assert!(w.contains(&PngWarning::MissingDependency { ty: ChunkTy::fdAT, requires: ChunkTy::acTL }));
    assert!(w.contains(&PngWarning::MissingDependency { ty: ChunkTy::fdAT, requires: ChunkTy::fcTL }));
  }
}
