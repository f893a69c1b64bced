//! Strategies for choosing one filter type per scanline.

use super::*;

use std::collections::HashMap;

/// Bits for a byte that DEFLATE can only store as a literal.
const LITERAL_COST: f64 = 8.5;

/// Extra bits for a token that repeats within its own row.
const IN_ROW_REPEAT_COST: f64 = 1.0;

/// Back-references can't reach further than this.
const DEFLATE_WINDOW: usize = 32 * 1024;

/// Estimated bits per byte covered by a 3 byte back-reference.
#[inline]
#[must_use]
fn match_cost(distance: usize) -> f64 {
  (10.0 + ((distance + 1) as f64).log2()) / 3.0
}

/// Every filter applied to one row.
#[derive(Debug, Clone, Default)]
pub struct FilterScratch {
  variants: [Vec<u8>; 5],
}
impl FilterScratch {
  /// Fills in all five filtered versions of `row`.
  pub fn fill(&mut self, row: &[u8], above: &[u8], step: usize) {
    for (filter, out) in FilterType::ALL.into_iter().zip(self.variants.iter_mut()) {
      out.clear();
      out.resize(row.len(), 0);
      filter_row(filter, row, above, step, out);
    }
  }

  /// The row as filtered by `filter`.
  #[inline]
  #[must_use]
  pub fn get(&self, filter: FilterType) -> &[u8] {
    &self.variants[filter as usize]
  }
}

/// A way to pick the filter for each row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterPicker {
  /// The same filter on every row.
  Fixed(FilterType),
  /// The filter with the smallest sum of absolute signed bytes, with the
  /// previous row's filter getting its score scaled by `hysteresis`.
  MinSum { hysteresis: f64 },
  /// Shortest path through row and filter pairs, with costs estimated from
  /// how many 3 byte tokens DEFLATE could back-reference.
  TokenDistance,
}
impl FilterPicker {
  /// All five fixed pickers, then min-sum, then token distance.
  #[must_use]
  pub fn defaults() -> Vec<Self> {
    let mut out: Vec<Self> = FilterType::ALL.into_iter().map(Self::Fixed).collect();
    out.push(Self::MinSum { hysteresis: 0.9 });
    out.push(Self::TokenDistance);
    out
  }

  /// Search priority, bigger goes first.
  #[must_use]
  pub fn weight(&self) -> f64 {
    match self {
      Self::Fixed(FilterType::None) => 0.5,
      Self::Fixed(FilterType::Sub) | Self::Fixed(FilterType::Up) => 0.6,
      Self::Fixed(FilterType::Average) => 0.5,
      Self::Fixed(FilterType::Paeth) => 0.7,
      Self::MinSum { .. } => 0.9,
      Self::TokenDistance => 1.0,
    }
  }

  /// Picks a filter for every row.
  ///
  /// `rows` are the unfiltered scanlines (without filter type bytes) and
  /// `step` is the filter byte stride.
  #[must_use]
  pub fn pick(&self, rows: &[Vec<u8>], step: usize, scratch: &mut FilterScratch) -> Vec<FilterType> {
    match *self {
      Self::Fixed(filter) => vec![filter; rows.len()],
      Self::MinSum { hysteresis } => pick_min_sum(rows, step, hysteresis, scratch),
      Self::TokenDistance => pick_token_distance(rows, step, scratch),
    }
  }
}
impl Display for FilterPicker {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    match self {
      Self::Fixed(filter) => write!(f, "{filter:?}"),
      Self::MinSum { hysteresis } => write!(f, "MinSum({hysteresis})"),
      Self::TokenDistance => write!(f, "TokenDistance"),
    }
  }
}

/// The sum of each byte's distance from zero, reading bytes as `i8`.
#[inline]
#[must_use]
fn abs_sum(filtered: &[u8]) -> u64 {
  filtered.iter().map(|&b| u64::from((b as i8).unsigned_abs())).sum()
}

fn pick_min_sum(rows: &[Vec<u8>], step: usize, hysteresis: f64, scratch: &mut FilterScratch) -> Vec<FilterType> {
  let mut out = Vec::with_capacity(rows.len());
  let mut above: &[u8] = &[];
  let mut previous: Option<FilterType> = None;
  for row in rows {
    scratch.fill(row, above, step);
    let mut best = (f64::INFINITY, FilterType::None);
    for filter in FilterType::ALL {
      let mut score = abs_sum(scratch.get(filter)) as f64;
      if previous == Some(filter) {
        score *= hysteresis;
      }
      if score < best.0 {
        best = (score, filter);
      }
    }
    out.push(best.1);
    previous = Some(best.1);
    above = row;
  }
  out
}

#[inline]
fn token_at(bytes: &[u8], i: usize) -> u32 {
  u32::from_be_bytes([0, bytes[i], bytes[i + 1], bytes[i + 2]])
}

/// What one filtered row costs on its own, plus what it leaves for the next
/// row to match against.
struct TokenNode {
  /// Cost of everything that didn't depend on the row above.
  own_cost: f64,
  /// Tokens with no earlier copy in the row, with their positions.
  unmatched: Vec<(u32, usize)>,
  /// Last position of every token in the row.
  last_seen: HashMap<u32, usize>,
  /// Filtered length plus the filter type byte.
  stored_len: usize,
}
impl TokenNode {
  fn new(filtered: &[u8]) -> Self {
    let token_count = filtered.len().saturating_sub(2);
    // bytes at the end too short to start a token
    let mut own_cost = (filtered.len() - token_count) as f64 * LITERAL_COST;
    let mut unmatched = Vec::new();
    let mut last_seen: HashMap<u32, usize> = HashMap::with_capacity(token_count);
    for i in 0..token_count {
      let token = token_at(filtered, i);
      match last_seen.insert(token, i) {
        Some(j) => own_cost += match_cost(i - j) + IN_ROW_REPEAT_COST,
        None => unmatched.push((token, i)),
      }
    }
    Self { own_cost, unmatched, last_seen, stored_len: filtered.len() + 1 }
  }

  /// Cost of this node when `prev` is the row stored just before it.
  fn cost_after(&self, prev: Option<&TokenNode>) -> f64 {
    self.own_cost
      + self
        .unmatched
        .iter()
        .map(|&(token, i)| {
          // counting from the previous row's position `j` to this row's `i`,
          // with this row's filter type byte in between
          let distance = prev.and_then(|p| p.last_seen.get(&token).map(|&j| p.stored_len - j + i));
          match distance {
            Some(d) if d <= DEFLATE_WINDOW => match_cost(d),
            _ => LITERAL_COST,
          }
        })
        .sum::<f64>()
  }
}

fn pick_token_distance(rows: &[Vec<u8>], step: usize, scratch: &mut FilterScratch) -> Vec<FilterType> {
  if rows.is_empty() {
    return Vec::new();
  }
  // back[r][f] is the filter of row r-1 on the cheapest path to (r, f)
  let mut back: Vec<[usize; 5]> = Vec::with_capacity(rows.len());
  let mut costs = [0.0_f64; 5];
  let mut prev_nodes: Vec<TokenNode> = Vec::new();
  let mut above: &[u8] = &[];
  for row in rows {
    scratch.fill(row, above, step);
    let nodes: Vec<TokenNode> = FilterType::ALL.iter().map(|&f| TokenNode::new(scratch.get(f))).collect();
    let mut next_costs = [0.0_f64; 5];
    let mut links = [0_usize; 5];
    for (f, node) in nodes.iter().enumerate() {
      if prev_nodes.is_empty() {
        next_costs[f] = node.cost_after(None);
        continue;
      }
      let mut best = (f64::INFINITY, 0);
      for (g, prev) in prev_nodes.iter().enumerate() {
        let total = costs[g] + node.cost_after(Some(prev));
        if total < best.0 {
          best = (total, g);
        }
      }
      next_costs[f] = best.0;
      links[f] = best.1;
    }
    back.push(links);
    costs = next_costs;
    prev_nodes = nodes;
    above = row;
  }
  let mut current = (0..5).fold(0, |best, f| if costs[f] < costs[best] { f } else { best });
  let mut out = vec![FilterType::None; rows.len()];
  for r in (0..rows.len()).rev() {
    out[r] = FilterType::ALL[current];
    current = back[r][current];
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fixed_picker() {
    let rows = vec![vec![1, 2, 3]; 4];
    let mut scratch = FilterScratch::default();
    assert_eq!(FilterPicker::Fixed(FilterType::Up).pick(&rows, 1, &mut scratch), vec![FilterType::Up; 4]);
    assert_eq!(FilterPicker::defaults().len(), 7);
  }

  #[test]
  fn test_min_sum_prefers_small_residuals() {
    // a smooth ramp: Sub leaves all ones, Up then leaves all zeros
    let rows: Vec<Vec<u8>> = vec![(0..16).collect(), (0..16).collect()];
    let mut scratch = FilterScratch::default();
    let picked = FilterPicker::MinSum { hysteresis: 0.9 }.pick(&rows, 1, &mut scratch);
    assert_eq!(picked[0], FilterType::Sub);
    assert_eq!(picked[1], FilterType::Up);
  }

  #[test]
  fn test_min_sum_hysteresis_breaks_ties() {
    let rows = vec![vec![0_u8; 8]; 3];
    let mut scratch = FilterScratch::default();
    // every filter scores 0 on all-zero rows, the first one found stays
    let picked = FilterPicker::MinSum { hysteresis: 0.5 }.pick(&rows, 1, &mut scratch);
    assert_eq!(picked, vec![FilterType::None; 3]);
  }

  #[test]
  fn test_token_node_costs() {
    let node = TokenNode::new(&[1, 2, 3, 1, 2, 3]);
    // tokens 123, 231, 312 are new; the second 123 repeats at distance 3
    assert_eq!(node.unmatched.len(), 3);
    let expected = 2.0 * LITERAL_COST + match_cost(3) + IN_ROW_REPEAT_COST;
    assert!((node.own_cost - expected).abs() < 1e-9);
    let prev = TokenNode::new(&[1, 2, 3, 9]);
    assert!(node.cost_after(Some(&prev)) < node.cost_after(None));
  }

  #[test]
  fn test_token_distance_picks_a_filter_per_row() {
    let rows: Vec<Vec<u8>> = (0..6_u8).map(|y| (0..30_u8).map(|x| x.wrapping_mul(3).wrapping_add(y)).collect()).collect();
    let mut scratch = FilterScratch::default();
    let picked = FilterPicker::TokenDistance.pick(&rows, 1, &mut scratch);
    assert_eq!(picked.len(), rows.len());
    // after the first row, every row is the row above plus one
    assert!(picked[1..].iter().all(|&f| f != FilterType::None));
    assert!(FilterPicker::TokenDistance.pick(&[], 1, &mut scratch).is_empty());
  }
}
