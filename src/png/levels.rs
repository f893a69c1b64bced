//! Per-channel lookup tables from stored samples to 8-bit display samples.

use super::*;

use bitfrob::u8_replicate_bits;

/// Maps every possible stored sample of one channel to its 8-bit output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable(Vec<u8>);
impl ChannelTable {
  /// Builds the table for samples stored at `bit_depth` bits that really only
  /// had `significant_bits` bits of precision.
  ///
  /// Samples are first rescaled (rounding) down to the significant depth.
  /// Then either the gamma exponent is applied while scaling to 0..=255
  /// (rounding again), or without gamma the significant bits are replicated
  /// out to 8 bits.
  #[must_use]
  pub fn new(bit_depth: u8, significant_bits: u8, gamma: Option<gAMA>) -> Self {
    let bit_depth = bit_depth.clamp(1, 16);
    let significant_bits = if significant_bits == 0 { bit_depth } else { significant_bits.min(bit_depth) };
    let stored_max = (1_u32 << bit_depth) - 1;
    let sig_max = (1_u32 << significant_bits) - 1;
    let exponent = gamma.map(|g| g.display_exponent());
    let table = (0..=stored_max)
      .map(|v| {
        let s = if significant_bits == bit_depth { v } else { (v * sig_max + stored_max / 2) / stored_max };
        match exponent {
          Some(e) => (255.0 * (s as f64 / sig_max as f64).powf(e)).round().clamp(0.0, 255.0) as u8,
          None if significant_bits == 8 => s as u8,
          None if significant_bits < 8 => u8_replicate_bits(u32::from(significant_bits), s as u8),
          None => ((s * 255 + sig_max / 2) / sig_max) as u8,
        }
      })
      .collect();
    Self(table)
  }

  /// The output for a stored sample. Out of range samples give 0.
  #[inline]
  #[must_use]
  pub fn get(&self, sample: u16) -> u8 {
    self.0.get(sample as usize).copied().unwrap_or(0)
  }
}

/// The tables for each channel of an image, in colour type channel order.
///
/// Indexed images don't use these, their palette already holds 8-bit values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTables {
  pub tables: Vec<ChannelTable>,
}
impl ChannelTables {
  /// Builds one table per channel. Alpha is never gamma corrected.
  ///
  /// `significant_bits` is in the same order as the channels, with 0 meaning
  /// "all of them".
  #[must_use]
  pub fn new(colour_type: ColourType, bit_depth: u8, significant_bits: [u8; 4], gamma: Option<gAMA>) -> Self {
    let channels = colour_type.channel_count();
    let has_alpha = matches!(colour_type, ColourType::YA | ColourType::RGBA);
    let tables = (0..channels)
      .map(|i| {
        let is_alpha = has_alpha && i == channels - 1;
        ChannelTable::new(bit_depth, significant_bits[i], if is_alpha { None } else { gamma })
      })
      .collect();
    Self { tables }
  }

  #[inline]
  #[must_use]
  pub fn get(&self, channel: usize, sample: u16) -> u8 {
    self.tables.get(channel).map(|t| t.get(sample)).unwrap_or(0)
  }
}

#[test]
fn test_channel_table_replicates_bits() {
  let t = ChannelTable::new(1, 0, None);
  assert_eq!((t.get(0), t.get(1)), (0, 255));
  let t = ChannelTable::new(2, 0, None);
  assert_eq!([t.get(0), t.get(1), t.get(2), t.get(3)], [0, 85, 170, 255]);
  let t = ChannelTable::new(4, 0, None);
  assert_eq!(t.get(0xA), 0xAA);
  let t = ChannelTable::new(8, 0, None);
  assert!((0..=255).all(|v| t.get(v) == v as u8));
  let t = ChannelTable::new(16, 0, None);
  assert_eq!((t.get(0), t.get(0x8080), t.get(0xFFFF)), (0, 0x80, 0xFF));
  assert_eq!(t.get(0x807F), 0x80);
}

#[test]
fn test_channel_table_significant_bits() {
  // 5 significant bits stored in 8, rescaled with rounding
  let t = ChannelTable::new(8, 5, None);
  assert_eq!(t.get(0xFF), 0xFF);
  assert_eq!(t.get(0xF8), u8_replicate_bits(5, 30));
  assert_eq!(t.get(0), 0);
  assert_eq!(t.get(0x84), u8_replicate_bits(5, 16));
}

#[test]
fn test_channel_table_gamma() {
  // 1/(0.45455*2.2) is close enough to 1 that the table is near identity
  let t = ChannelTable::new(8, 0, Some(gAMA { gamma: 45455 }));
  assert!((0..=255_u16).all(|v| (t.get(v) as i32 - v as i32).abs() <= 1));
  // a display exponent of 2 darkens mid tones
  let t = ChannelTable::new(8, 0, Some(gAMA { gamma: 22727 }));
  assert_eq!((t.get(0), t.get(255)), (0, 255));
  assert!(t.get(128) < 80);
  let tables = ChannelTables::new(ColourType::YA, 8, [0; 4], Some(gAMA { gamma: 22727 }));
  assert_eq!(tables.get(1, 128), 128);
}
