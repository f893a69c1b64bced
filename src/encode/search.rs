//! Trying combinations of encoding, filters, and compression to find the
//! smallest file.

use super::*;

use std::{
  collections::{HashMap, HashSet},
  time::Instant,
};

/// Everything the search may combine.
#[derive(Debug, Clone)]
pub struct SearchSpace {
  pub encodings: Vec<EncodingOption>,
  pub pickers: Vec<FilterPicker>,
  pub zlib_configs: Vec<ZlibConfig>,
  pub budget: TimeBudget,
}
impl SearchSpace {
  /// The default space for an image under the given options.
  #[must_use]
  pub fn for_image(image: &Bitmap, options: &EncodeOptions) -> Self {
    Self {
      encodings: encoding_options(image, options.preserve_transparent_colour, options.allow_matte_transparency),
      pickers: FilterPicker::defaults(),
      zlib_configs: ZlibConfig::defaults(),
      budget: options.time_budget,
    }
  }

  /// Every combination as `(encoding, picker, zlib config, weight)`, in the
  /// order the search tries them.
  ///
  /// With a time limit the most promising combinations go first, otherwise
  /// the order is encoding major, then picker, then config.
  #[must_use]
  pub fn combinations(&self) -> Vec<(usize, usize, usize, f64)> {
    let mut out = Vec::with_capacity(self.encodings.len() * self.pickers.len() * self.zlib_configs.len());
    for (e, encoding) in self.encodings.iter().enumerate() {
      for (p, picker) in self.pickers.iter().enumerate() {
        for (z, zlib) in self.zlib_configs.iter().enumerate() {
          out.push((e, p, z, encoding.weight * picker.weight() * zlib.weight));
        }
      }
    }
    if matches!(self.budget, TimeBudget::Limited(_)) {
      out.sort_by(|a, b| b.3.total_cmp(&a.3));
    }
    out
  }
}

/// The best attempt found.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionChoice {
  /// Index into [`SearchSpace::encodings`].
  pub encoding: usize,
  /// Index into [`SearchSpace::pickers`].
  pub picker: usize,
  pub zlib: ZlibConfig,
  pub filters: Vec<FilterType>,
  pub zlib_data: Vec<u8>,
  /// Compressed size plus the `PLTE`/`tRNS` chunks the encoding needs.
  pub total_size: usize,
}

/// Bookkeeping from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
  pub attempts: usize,
  pub cache_hits: usize,
  pub cache_misses: usize,
  pub evictions: usize,
  pub duplicates_skipped: usize,
  pub failures: usize,
}

/// Runs the search, stopping once the time budget has passed.
///
/// At least one attempt always completes (if any can succeed), no matter
/// the budget.
///
/// ## Failure
/// * [`PngError::NoCompressionCandidate`] if nothing could be compressed.
pub fn run_search(image: &Bitmap, space: &SearchSpace) -> Result<(CompressionChoice, SearchStats), PngError> {
  let deadline = match space.budget {
    TimeBudget::Unlimited => None,
    TimeBudget::Limited(d) => Instant::now().checked_add(d),
  };
  let mut stats = SearchStats::default();
  let mut cache = IdatCache::default();
  let mut scratch = FilterScratch::default();
  let mut mapped: HashMap<usize, Vec<Vec<u8>>> = HashMap::new();
  let mut picked: HashMap<(usize, usize), Vec<FilterType>> = HashMap::new();
  let mut tried: HashSet<(usize, Vec<FilterType>, usize)> = HashSet::new();
  let mut best: Option<CompressionChoice> = None;

  for (e, p, z, weight) in space.combinations() {
    if best.is_some() && deadline.map_or(false, |d| Instant::now() >= d) {
      break;
    }
    let encoding = &space.encodings[e];
    let zlib = space.zlib_configs[z];
    let rows = mapped.entry(e).or_insert_with(|| encoding.map_rows(image));
    let filters = picked
      .entry((e, p))
      .or_insert_with(|| space.pickers[p].pick(rows, encoding.filter_step, &mut scratch))
      .clone();
    if !tried.insert((e, filters.clone(), z)) {
      stats.duplicates_skipped += 1;
      continue;
    }
    let data = cache.get_or_insert_with((e, filters.clone()), || build_filtered_data(rows, &filters, encoding.filter_step));
    stats.attempts += 1;
    let Some(zlib_data) = zlib.compress(&data) else {
      stats.failures += 1;
      continue;
    };
    let total_size = zlib_data.len() + encoding.chunk_overhead();
    log::trace!(
      "attempt {}: {encoding} / {} / {zlib} (weight {weight:.3}) = {total_size} bytes",
      stats.attempts,
      space.pickers[p]
    );
    if best.as_ref().map_or(true, |b| total_size < b.total_size) {
      best = Some(CompressionChoice { encoding: e, picker: p, zlib, filters, zlib_data, total_size });
    }
  }
  stats.cache_hits = cache.hits;
  stats.cache_misses = cache.misses;
  stats.evictions = cache.evictions;

  let best = best.ok_or(PngError::NoCompressionCandidate)?;
  log::debug!(
    "search: {} attempts, {} cache misses, {} duplicates skipped, best {} / {} / {} = {} bytes",
    stats.attempts,
    stats.cache_misses,
    stats.duplicates_skipped,
    space.encodings[best.encoding],
    space.pickers[best.picker],
    best.zlib,
    best.total_size
  );
  Ok((best, stats))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn gradient(w: u32, h: u32) -> Bitmap {
    let rows: Vec<Vec<u32>> =
      (0..h).map(|y| (0..w).map(|x| pack_argb(255, (x * 9) as u8, (y * 5) as u8, (x ^ y) as u8)).collect()).collect();
    Bitmap::from_rows(&rows).unwrap()
  }

  #[test]
  fn test_unlimited_order_is_fixed() {
    let img = gradient(4, 4);
    let space = SearchSpace::for_image(&img, &EncodeOptions::default().with_time_budget(TimeBudget::Unlimited));
    let combos = space.combinations();
    assert_eq!(combos.len(), space.encodings.len() * 7 * 5);
    assert_eq!((combos[0].0, combos[0].1, combos[0].2), (0, 0, 0));
    assert_eq!((combos[1].0, combos[1].1, combos[1].2), (0, 0, 1));
  }

  #[test]
  fn test_limited_order_is_by_weight() {
    let img = gradient(4, 4);
    let space = SearchSpace::for_image(&img, &EncodeOptions::default());
    let combos = space.combinations();
    assert!(combos.windows(2).all(|w| w[0].3 >= w[1].3));
  }

  #[test]
  fn test_search_skips_duplicate_filter_choices() {
    let img = Bitmap::new(3, 3, 0xFF80_8080);
    let space = SearchSpace::for_image(&img, &EncodeOptions::default().with_time_budget(TimeBudget::Unlimited));
    let (best, stats) = run_search(&img, &space).unwrap();
    assert!(stats.duplicates_skipped > 0);
    assert_eq!(stats.attempts + stats.duplicates_skipped, space.combinations().len());
    assert!(stats.cache_hits > 0);
    assert_eq!(best.filters.len(), 3);
  }

  #[test]
  fn test_zero_budget_still_finds_something() {
    let img = gradient(20, 20);
    let space = SearchSpace::for_image(&img, &EncodeOptions::default().with_time_budget(TimeBudget::Limited(Duration::ZERO)));
    let (_, stats) = run_search(&img, &space).unwrap();
    assert_eq!(stats.attempts, 1);
  }

  #[test]
  fn test_empty_space_fails() {
    let img = gradient(2, 2);
    let mut space = SearchSpace::for_image(&img, &EncodeOptions::default());
    space.zlib_configs.clear();
    assert_eq!(run_search(&img, &space), Err(PngError::NoCompressionCandidate));
  }
}
