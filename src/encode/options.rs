//! Proposing the PNG pixel formats that can hold an image exactly.

use super::*;

use std::collections::{HashMap, HashSet};

/// Step between grey levels at bit depths 1, 2, 4, and 8.
const GREY_STEPS: [(u8, u8); 4] = [(1, 255), (2, 85), (4, 17), (8, 1)];

/// How rows of ARGB become the stored bytes of one encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowMapper {
  /// Palette lookup of the canonical colour.
  Indexed { lookup: HashMap<u32, u8> },
  /// Grey level (`r / step`), with transparent pixels written as `key`.
  Grey { step: u8, key: Option<u8> },
  GreyAlpha,
  /// Transparent pixels are written as `key`.
  Rgb { key: Option<[u8; 3]> },
  Rgba,
}

/// One way to store the image.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingOption {
  /// Position in the option list.
  pub id: usize,
  pub bit_depth: u8,
  pub colour_type: ColourType,
  pub mapper: RowMapper,
  /// Filter byte stride.
  pub filter_step: usize,
  /// `PLTE` payload.
  pub palette: Option<Vec<u8>>,
  /// `tRNS` payload.
  pub transparency: Option<Vec<u8>>,
  /// Search priority, bigger goes first.
  pub weight: f64,
  /// Transparent pixels are turned into `0` before mapping.
  pub canonical_transparent: bool,
}
impl EncodingOption {
  /// The header for an image of this size in this encoding.
  #[inline]
  #[must_use]
  pub fn header(&self, width: u32, height: u32) -> IHDR {
    IHDR {
      width,
      height,
      bit_depth: self.bit_depth,
      colour_type: self.colour_type as u8,
      compression_method: 0,
      filter_method: 0,
      interlace_method: 0,
    }
  }

  /// Bytes added to the file by `PLTE` and `tRNS`, framing included.
  #[inline]
  #[must_use]
  pub fn chunk_overhead(&self) -> usize {
    [&self.palette, &self.transparency].iter().filter_map(|c| c.as_ref()).map(|c| 12 + c.len()).sum()
  }

  /// Maps one row of pixels to stored bytes, appending to `out`.
  pub fn map_row(&self, row: &[u32], out: &mut Vec<u8>) {
    let canon = |px: u32| if self.canonical_transparent && px >> 24 == 0 { 0 } else { px };
    match &self.mapper {
      RowMapper::Indexed { lookup } => {
        pack_samples(row.iter().map(|&px| lookup.get(&canon(px)).copied().unwrap_or(0)), self.bit_depth, out)
      }
      RowMapper::Grey { step, key } => pack_samples(
        row.iter().map(|&px| {
          let [a, r, _, _] = unpack_argb(canon(px));
          match key {
            Some(k) if a == 0 => *k,
            _ => r / (*step).max(1),
          }
        }),
        self.bit_depth,
        out,
      ),
      RowMapper::GreyAlpha => row.iter().for_each(|&px| {
        let [a, r, _, _] = unpack_argb(canon(px));
        out.extend_from_slice(&[r, a]);
      }),
      RowMapper::Rgb { key } => row.iter().for_each(|&px| {
        let [a, r, g, b] = unpack_argb(canon(px));
        match key {
          Some(k) if a == 0 => out.extend_from_slice(k),
          _ => out.extend_from_slice(&[r, g, b]),
        }
      }),
      RowMapper::Rgba => row.iter().for_each(|&px| {
        let [a, r, g, b] = unpack_argb(canon(px));
        out.extend_from_slice(&[r, g, b, a]);
      }),
    }
  }

  /// Maps every row of the image.
  #[must_use]
  pub fn map_rows(&self, image: &Bitmap) -> Vec<Vec<u8>> {
    let line_len = self.header(image.width, image.height).bytes_per_scanline(image.width);
    image
      .rows()
      .map(|row| {
        let mut out = Vec::with_capacity(line_len);
        self.map_row(row, &mut out);
        out
      })
      .collect()
  }
}
impl Display for EncodingOption {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "#{} {:?}{}", self.id, self.colour_type, self.bit_depth)?;
    if self.transparency.is_some() {
      write!(f, "+tRNS")?;
    }
    Ok(())
  }
}

/// Packs samples of `bit_depth` bits (1 to 8), high bits first.
fn pack_samples(samples: impl Iterator<Item = u8>, bit_depth: u8, out: &mut Vec<u8>) {
  if bit_depth >= 8 {
    out.extend(samples);
    return;
  }
  let mut acc = 0_u8;
  let mut used = 0_u8;
  for s in samples {
    acc |= (s & ((1 << bit_depth) - 1)) << (8 - bit_depth - used);
    used += bit_depth;
    if used == 8 {
      out.push(acc);
      acc = 0;
      used = 0;
    }
  }
  if used > 0 {
    out.push(acc);
  }
}

/// What one pass over the image learns.
struct ImageStats {
  /// Canonical colours in first-seen order, up to 256 of them.
  colours: Vec<u32>,
  too_many_colours: bool,
  partial_alpha: bool,
  /// Distinct transparent canonical values, up to 2.
  transparent: Vec<u32>,
  /// Every canonical pixel has `r == g == b`.
  achromatic: bool,
  /// Red levels of visible pixels, over the whole image.
  visible_levels: [bool; 256],
}
impl ImageStats {
  fn new(image: &Bitmap, canonical: bool) -> Self {
    let mut seen: HashSet<u32> = HashSet::new();
    let mut out = Self {
      colours: Vec::new(),
      too_many_colours: false,
      partial_alpha: false,
      transparent: Vec::new(),
      achromatic: true,
      visible_levels: [false; 256],
    };
    for &px in &image.pixels {
      let px = if canonical && px >> 24 == 0 { 0 } else { px };
      let [a, r, g, b] = unpack_argb(px);
      if !out.too_many_colours && seen.insert(px) {
        if out.colours.len() == 256 {
          out.too_many_colours = true;
        } else {
          out.colours.push(px);
        }
      }
      match a {
        0 if out.transparent.len() < 2 && !out.transparent.contains(&px) => out.transparent.push(px),
        0 | 255 => (),
        _ => out.partial_alpha = true,
      }
      if r != g || g != b {
        out.achromatic = false;
      }
      if a != 0 {
        out.visible_levels[usize::from(r)] = true;
      }
    }
    out
  }

  /// A single colour-key can stand in for all transparent pixels.
  fn key_possible(&self, allow_matte: bool) -> bool {
    allow_matte && !self.partial_alpha && self.transparent == [0]
  }
}

/// Builds the palette option at each viable bit depth.
fn palette_options(stats: &ImageStats, canonical: bool, out: &mut Vec<EncodingOption>) {
  let mut order: Vec<u32> = stats.colours.clone();
  // entries with some transparency first, so tRNS stays short
  order.sort_by_key(|&px| px >> 24 == 255);
  let palette: Vec<u8> = order.iter().flat_map(|&px| unpack_argb(px)[1..].to_vec()).collect();
  let alphas: Vec<u8> = order.iter().map(|&px| unpack_argb(px)[0]).take_while(|&a| a < 255).collect();
  let lookup: HashMap<u32, u8> = order.iter().enumerate().map(|(i, &px)| (px, i as u8)).collect();
  for (bit_depth, weight) in [(1_u8, 0.6), (2, 0.7), (4, 0.8), (8, 1.0)] {
    if order.len() > (1 << bit_depth) {
      continue;
    }
    out.push(EncodingOption {
      id: 0,
      bit_depth,
      colour_type: ColourType::Index,
      mapper: RowMapper::Indexed { lookup: lookup.clone() },
      filter_step: 1,
      palette: Some(palette.clone()),
      transparency: (!alphas.is_empty()).then(|| alphas.clone()),
      weight,
      canonical_transparent: canonical,
    });
  }
}

/// The smallest greyscale option, if every grey value lands on a level.
fn grey_option(stats: &ImageStats, needs_key: bool, canonical: bool) -> Option<EncodingOption> {
  let greys: HashSet<u8> = (0..=255).filter(|&l| stats.visible_levels[usize::from(l)]).collect();
  GREY_STEPS.iter().find_map(|&(bit_depth, step)| {
    if greys.iter().any(|g| g % step != 0) {
      return None;
    }
    let levels = 255 / step;
    let key = if needs_key {
      Some((0..=levels).find(|l| !greys.contains(&(l * step)))?)
    } else {
      None
    };
    let transparency = key.map(|k| u16::from(k).to_be_bytes().to_vec());
    Some(EncodingOption {
      id: 0,
      bit_depth,
      colour_type: ColourType::Y,
      mapper: RowMapper::Grey { step, key },
      filter_step: 1,
      palette: None,
      transparency,
      weight: 1.0,
      canonical_transparent: canonical,
    })
  })
}

/// Finds a 24-bit colour no visible pixel uses.
fn unused_rgb(image: &Bitmap) -> Option<[u8; 3]> {
  let mut used = vec![0_u64; (1 << 24) / 64];
  for &px in &image.pixels {
    if px >> 24 != 0 {
      let rgb = (px & 0xFF_FFFF) as usize;
      used[rgb / 64] |= 1 << (rgb % 64);
    }
  }
  let (word, bits) = used.iter().enumerate().find(|(_, &w)| w != u64::MAX)?;
  let rgb = word * 64 + bits.trailing_ones() as usize;
  Some([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

fn alpha_option(colour_type: ColourType, canonical: bool) -> EncodingOption {
  EncodingOption {
    id: 0,
    bit_depth: 8,
    colour_type,
    mapper: if colour_type == ColourType::YA { RowMapper::GreyAlpha } else { RowMapper::Rgba },
    filter_step: colour_type.channel_count(),
    palette: None,
    transparency: None,
    weight: 1.0,
    canonical_transparent: canonical,
  }
}

/// Proposes every encoding worth trying for the image.
///
/// Each option reproduces the image exactly when decoded, except that with
/// `preserve_transparent_colour` off every fully transparent pixel comes
/// back as `0`.
#[must_use]
pub fn encoding_options(
  image: &Bitmap, preserve_transparent_colour: bool, allow_matte_transparency: bool,
) -> Vec<EncodingOption> {
  let canonical = !preserve_transparent_colour;
  let stats = ImageStats::new(image, canonical);
  let has_transparent = !stats.transparent.is_empty();
  let key_possible = stats.key_possible(allow_matte_transparency);
  let mut out = Vec::new();

  if !stats.too_many_colours {
    palette_options(&stats, canonical, &mut out);
  }
  if stats.achromatic {
    let plain_grey = !stats.partial_alpha && (!has_transparent || key_possible);
    match plain_grey.then(|| grey_option(&stats, has_transparent, canonical)).flatten() {
      Some(grey) => out.push(grey),
      None => out.push(alpha_option(ColourType::YA, canonical)),
    }
  } else if stats.too_many_colours {
    let key = if has_transparent && key_possible { unused_rgb(image) } else { None };
    if stats.partial_alpha || (has_transparent && key.is_none()) {
      out.push(alpha_option(ColourType::RGBA, canonical));
    } else {
      out.push(EncodingOption {
        id: 0,
        bit_depth: 8,
        colour_type: ColourType::RGB,
        mapper: RowMapper::Rgb { key },
        filter_step: 3,
        palette: None,
        transparency: key.map(|[r, g, b]| vec![0, r, 0, g, 0, b]),
        weight: 1.0,
        canonical_transparent: canonical,
      });
    }
  }
  for (id, option) in out.iter_mut().enumerate() {
    option.id = id;
  }
  log::debug!(
    "encoding options: {}",
    out.iter().map(|o| o.to_string()).collect::<Vec<_>>().join(", ")
  );
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  fn image(rows: &[&[u32]]) -> Bitmap {
    Bitmap::from_rows(rows).unwrap()
  }

  #[test]
  fn test_pack_samples() {
    let mut out = Vec::new();
    pack_samples([1, 0, 1].into_iter(), 1, &mut out);
    assert_eq!(out, vec![0b1010_0000]);
    out.clear();
    pack_samples([3, 2, 1, 0, 3].into_iter(), 2, &mut out);
    assert_eq!(out, vec![0b1110_0100, 0b1100_0000]);
  }

  #[test]
  fn test_black_and_white_gets_one_bit_grey() {
    let img = image(&[&[0xFFFF_FFFF, 0xFF00_0000], &[0xFF00_0000, 0xFFFF_FFFF]]);
    let opts = encoding_options(&img, true, true);
    let grey: Vec<_> = opts.iter().filter(|o| o.colour_type == ColourType::Y).collect();
    assert_eq!(grey.len(), 1);
    assert_eq!(grey[0].bit_depth, 1);
    assert_eq!(grey[0].map_rows(&img), vec![vec![0b1000_0000], vec![0b0100_0000]]);
    assert!(opts.iter().any(|o| o.colour_type == ColourType::Index && o.bit_depth == 1));
    assert!(opts.iter().all(|o| o.colour_type != ColourType::RGB));
  }

  #[test]
  fn test_grey_key_uses_an_unused_level() {
    let img = image(&[&[0xFF00_0000, 0xFFFF_FFFF, 0x0012_3456]]);
    let opts = encoding_options(&img, false, true);
    let grey = opts.iter().find(|o| o.colour_type == ColourType::Y).unwrap();
    assert_eq!(grey.bit_depth, 2);
    assert_eq!(grey.mapper, RowMapper::Grey { step: 85, key: Some(1) });
    assert_eq!(grey.transparency, Some(vec![0, 1]));
    // a transparent colour that must survive rules out a key
    let opts = encoding_options(&img, true, true);
    assert!(opts.iter().all(|o| o.colour_type != ColourType::Y));
  }

  #[test]
  fn test_palette_puts_transparent_entries_first() {
    let img = image(&[&[0xFF11_2233, 0x8044_5566, 0xFF11_2233]]);
    let opts = encoding_options(&img, true, true);
    assert_eq!(opts.iter().map(|o| o.bit_depth).collect::<Vec<_>>(), vec![1, 2, 4, 8]);
    let o = &opts[0];
    assert_eq!(o.palette, Some(vec![0x44, 0x55, 0x66, 0x11, 0x22, 0x33]));
    assert_eq!(o.transparency, Some(vec![0x80]));
    assert_eq!(o.map_rows(&img), vec![vec![0b1010_0000]]);
    assert_eq!(o.chunk_overhead(), (12 + 6) + (12 + 1));
  }

  #[test]
  fn test_many_colours() {
    let opaque: Vec<u32> = (0..300).map(|i| 0xFF00_0000 | i * 7).collect();
    let img = image(&[&opaque[..]]);
    let opts = encoding_options(&img, true, true);
    assert_eq!(opts.len(), 1);
    assert_eq!(opts[0].colour_type, ColourType::RGB);
    assert_eq!(opts[0].transparency, None);

    let mut keyed = opaque.clone();
    keyed.push(0);
    let opts = encoding_options(&image(&[&keyed[..]]), true, true);
    assert_eq!(opts[0].mapper, RowMapper::Rgb { key: Some([0, 0, 1]) });
    let opts = encoding_options(&image(&[&keyed[..]]), true, false);
    assert_eq!(opts[0].colour_type, ColourType::RGBA);

    let mut partial = opaque;
    partial.push(0x7F00_0000);
    let opts = encoding_options(&image(&[&partial[..]]), true, true);
    assert_eq!(opts[0].colour_type, ColourType::RGBA);
  }

  #[test]
  fn test_grey_key_sees_every_level() {
    // 257 distinct values: past the colour list, yet every level is in use
    let mut row: Vec<u32> = vec![0];
    row.extend((0..=255_u32).map(|l| 0xFF00_0000 | l << 16 | l << 8 | l));
    let img = image(&[&row[..]]);
    let opts = encoding_options(&img, true, true);
    assert_eq!(opts.len(), 1);
    assert_eq!(opts[0].colour_type, ColourType::YA);

    // with one level free, the key lands on it
    row.retain(|&px| px != 0xFF80_8080);
    let img = image(&[&row[..]]);
    let opts = encoding_options(&img, true, true);
    let grey = opts.iter().find(|o| o.colour_type == ColourType::Y).unwrap();
    assert_eq!(grey.mapper, RowMapper::Grey { step: 1, key: Some(0x80) });
  }
}
