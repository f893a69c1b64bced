//! Memoizes filtered image data between compression attempts.

use super::*;

use std::{
  collections::{HashMap, VecDeque},
  rc::Rc,
};

/// Filtered buffers kept at once before the oldest is evicted.
pub const IDAT_CACHE_CAPACITY: usize = 4;

/// One encoding option with one filter per row.
pub type IdatKey = (usize, Vec<FilterType>);

/// A small LRU of filtered (not yet compressed) image data.
///
/// Every zlib config tried for the same filter assignment reuses the buffer,
/// so the rows are only filtered once per assignment.
#[derive(Debug, Clone)]
pub struct IdatCache {
  capacity: usize,
  entries: HashMap<IdatKey, Rc<Vec<u8>>>,
  /// Least recently used at the front.
  order: VecDeque<IdatKey>,
  pub hits: usize,
  pub misses: usize,
  pub evictions: usize,
}
impl Default for IdatCache {
  #[inline]
  fn default() -> Self {
    Self::with_capacity(IDAT_CACHE_CAPACITY)
  }
}
impl IdatCache {
  /// A cache holding at most `capacity` buffers (at least 1).
  #[inline]
  #[must_use]
  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      entries: HashMap::new(),
      order: VecDeque::new(),
      hits: 0,
      misses: 0,
      evictions: 0,
    }
  }

  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  fn touch(&mut self, key: &IdatKey) {
    if let Some(pos) = self.order.iter().position(|k| k == key) {
      if let Some(k) = self.order.remove(pos) {
        self.order.push_back(k);
      }
    }
  }

  /// Gets the buffer for `key`, building it with `build` on a miss.
  pub fn get_or_insert_with(&mut self, key: IdatKey, build: impl FnOnce() -> Vec<u8>) -> Rc<Vec<u8>> {
    if let Some(found) = self.entries.get(&key).cloned() {
      self.hits += 1;
      self.touch(&key);
      return found;
    }
    self.misses += 1;
    let data = Rc::new(build());
    while self.entries.len() >= self.capacity {
      let Some(oldest) = self.order.pop_front() else { break };
      self.entries.remove(&oldest);
      self.evictions += 1;
      log::trace!("idat cache: evicted option #{} ({} rows)", oldest.0, oldest.1.len());
    }
    self.order.push_back(key.clone());
    self.entries.insert(key, Rc::clone(&data));
    data
  }
}

/// Filters every row and prefixes each with its filter type byte.
#[must_use]
pub fn build_filtered_data(rows: &[Vec<u8>], filters: &[FilterType], step: usize) -> Vec<u8> {
  let total: usize = rows.iter().map(|r| r.len() + 1).sum();
  let mut out = Vec::with_capacity(total);
  let mut above: &[u8] = &[];
  for (row, &filter) in rows.iter().zip(filters.iter()) {
    out.push(filter as u8);
    let start = out.len();
    out.resize(start + row.len(), 0);
    filter_row(filter, row, above, step, &mut out[start..]);
    above = row;
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(id: usize) -> IdatKey {
    (id, vec![FilterType::None])
  }

  #[test]
  fn test_cache_hits_and_misses() {
    let mut cache = IdatCache::default();
    let a = cache.get_or_insert_with(key(0), || vec![1, 2, 3]);
    let b = cache.get_or_insert_with(key(0), || unreachable!());
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!((cache.hits, cache.misses), (1, 1));
  }

  #[test]
  fn test_cache_evicts_least_recent() {
    let mut cache = IdatCache::with_capacity(2);
    cache.get_or_insert_with(key(0), Vec::new);
    cache.get_or_insert_with(key(1), Vec::new);
    // refreshes 0, so 1 is now the oldest
    cache.get_or_insert_with(key(0), Vec::new);
    cache.get_or_insert_with(key(2), Vec::new);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.evictions, 1);
    cache.get_or_insert_with(key(0), Vec::new);
    assert_eq!(cache.hits, 2);
    cache.get_or_insert_with(key(1), Vec::new);
    assert_eq!(cache.misses, 4);
  }

  #[test]
  fn test_build_filtered_data() {
    let rows = vec![vec![1, 2], vec![1, 2]];
    let data = build_filtered_data(&rows, &[FilterType::Sub, FilterType::Up], 1);
    assert_eq!(data, vec![1, 1, 1, 2, 0, 0]);
  }
}
