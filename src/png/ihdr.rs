use super::*;

/// The types of colour that PNG supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ColourType {
  /// Greyscale
  Y = 0,
  /// Red, Green, Blue
  RGB = 2,
  /// Index into a palette.
  ///
  /// The palette will have RGB8 data. There may optionally be a transparency
  /// chunk.
  Index = 3,
  /// Greyscale + Alpha
  YA = 4,
  /// Red, Green, Blue, Alpha
  RGBA = 6,
}
impl ColourType {
  /// The number of channels in this type of colour.
  #[inline]
  #[must_use]
  pub const fn channel_count(self) -> usize {
    match self {
      Self::Y => 1,
      Self::RGB => 3,
      Self::Index => 1,
      Self::YA => 2,
      Self::RGBA => 4,
    }
  }

  /// If the bit depth is allowed with this colour type.
  #[inline]
  #[must_use]
  pub const fn allows_bit_depth(self, bit_depth: u8) -> bool {
    match self {
      Self::Y => matches!(bit_depth, 1 | 2 | 4 | 8 | 16),
      Self::Index => matches!(bit_depth, 1 | 2 | 4 | 8),
      Self::RGB | Self::YA | Self::RGBA => matches!(bit_depth, 8 | 16),
    }
  }
}
impl TryFrom<u8> for ColourType {
  type Error = ();
  #[inline]
  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Ok(match value {
      0 => ColourType::Y,
      2 => ColourType::RGB,
      3 => ColourType::Index,
      4 => ColourType::YA,
      6 => ColourType::RGBA,
      _ => return Err(()),
    })
  }
}

/// Image Header
///
/// The fields are kept exactly as stored, even when they hold values the
/// format doesn't allow, so that the image data pipeline can report the
/// specific problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IHDR {
  /// width in pixels
  pub width: u32,
  /// height in pixels
  pub height: u32,
  /// bits per channel (or per index)
  pub bit_depth: u8,
  /// raw colour type value, see [`ColourType`]
  pub colour_type: u8,
  /// must be 0
  pub compression_method: u8,
  /// must be 0
  pub filter_method: u8,
  /// 0 is no interlace, 1 is Adam7
  pub interlace_method: u8,
}
impl IHDR {
  /// Parses the 13 byte payload.
  #[inline]
  pub fn parse(data: &[u8]) -> Option<Self> {
    match *data {
      [w0, w1, w2, w3, h0, h1, h2, h3, bit_depth, colour_type, compression_method, filter_method, interlace_method] => {
        Some(Self {
          width: u32::from_be_bytes([w0, w1, w2, w3]),
          height: u32::from_be_bytes([h0, h1, h2, h3]),
          bit_depth,
          colour_type,
          compression_method,
          filter_method,
          interlace_method,
        })
      }
      _ => None,
    }
  }

  /// Serialises back to the 13 byte payload.
  #[inline]
  #[must_use]
  pub fn to_bytes(&self) -> [u8; 13] {
    let mut out = [0_u8; 13];
    out[0..4].copy_from_slice(&self.width.to_be_bytes());
    out[4..8].copy_from_slice(&self.height.to_be_bytes());
    out[8] = self.bit_depth;
    out[9] = self.colour_type;
    out[10] = self.compression_method;
    out[11] = self.filter_method;
    out[12] = self.interlace_method;
    out
  }

  /// The colour type, if it's one PNG defines.
  #[inline]
  #[must_use]
  pub fn colour_type(&self) -> Option<ColourType> {
    ColourType::try_from(self.colour_type).ok()
  }

  /// Bits used by one whole pixel.
  #[inline]
  #[must_use]
  pub fn bits_per_pixel(&self) -> usize {
    let channels = self.colour_type().map(ColourType::channel_count).unwrap_or(0);
    (self.bit_depth as usize) * channels
  }

  /// Filters operate on bytes, using the byte this many positions to the
  /// left. Sub-byte pixels use 1.
  #[inline]
  #[must_use]
  pub fn filter_step(&self) -> usize {
    ((self.bits_per_pixel() + 7) / 8).max(1)
  }

  /// Bytes per scanline of a (reduced) image of the given width, not counting
  /// the filter type byte.
  #[inline]
  #[must_use]
  pub fn bytes_per_scanline(&self, width: u32) -> usize {
    (self.bits_per_pixel().saturating_mul(width as usize) + 7) / 8
  }

  /// The total size of the inflated image data, including filter bytes.
  #[must_use]
  pub fn inflated_len(&self) -> usize {
    let image_bytes = |w: u32, h: u32| {
      if w == 0 || h == 0 {
        0
      } else {
        self.bytes_per_scanline(w).saturating_add(1).saturating_mul(h as usize)
      }
    };
    if self.interlace_method == 1 {
      reduced_image_dimensions(self.width, self.height)[1..]
        .iter()
        .fold(0_usize, |total, &(w, h)| total.saturating_add(image_bytes(w, h)))
    } else {
      image_bytes(self.width, self.height)
    }
  }
}

#[test]
fn test_image_header_parse() {
  let h = IHDR {
    width: 300,
    height: 2,
    bit_depth: 4,
    colour_type: 3,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 0,
  };
  assert_eq!(IHDR::parse(&h.to_bytes()), Some(h));
  assert_eq!(IHDR::parse(&[0; 12]), None);
  assert_eq!(h.colour_type(), Some(ColourType::Index));
  assert_eq!(h.bytes_per_scanline(3), 2);
  assert_eq!(h.filter_step(), 1);
  assert_eq!(h.inflated_len(), (150 + 1) * 2);
}

#[test]
fn test_image_header_interlaced_len() {
  let h = IHDR {
    width: 8,
    height: 8,
    bit_depth: 8,
    colour_type: 6,
    compression_method: 0,
    filter_method: 0,
    interlace_method: 1,
  };
  assert_eq!(h.filter_step(), 4);
  // reduced images: 1x1, 1x1, 2x1, 2x2, 4x2, 4x4, 8x4
  let expected = (1 + 4) + (1 + 4) + (1 + 8) + 2 * (1 + 8) + 2 * (1 + 16) + 4 * (1 + 16) + 4 * (1 + 32);
  assert_eq!(h.inflated_len(), expected);
  assert!(ColourType::RGBA.allows_bit_depth(16));
  assert!(!ColourType::RGBA.allows_bit_depth(4));
}
