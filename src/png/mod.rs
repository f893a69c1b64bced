//! Holds all the tools for decoding PNG data.
//!
//! The general format of a PNG is that the information is stored in "chunks".
//! There's four "critical" chunk types:
//! * **Header** - This has all the important information about the image's
//!   dimensions, pixel format, and if the image is interlaced or not.
//! * **Palette** - If an image uses indexed color it will have a palette of
//!   what index values map to what `RGB8` values.
//! * **Image Data** - One or more chunks of compressed data. All of the
//!   compressed data forms a single zlib data stream. All of the image data
//!   chunks should appear one after the other.
//! * **End** - The last chunk, lets you know you had the full PNG and your data
//!   wasn't truncated accidentally.
//!
//! After the header and before the image data there are also zero or more
//! "ancillary" chunks which might give you additional information about the
//! image.
//!
//! ## Decoding
//! [`decode_png`] never fails. It walks the chunks ([`read_chunks`]), checks
//! their counts and order against a [`ChunkRegistry`] ([`validate`]), hands
//! each one to its registered callback to fill in a [`DecodeContext`]
//! ([`dispatch`]), and finally rebuilds the pixels ([`decode_image_data`]).
//! Every problem along the way becomes a [`PngWarning`] instead of an error,
//! and you get back whatever image could be reconstructed.
//!
//! ```no_run
//! let bytes: &[u8] = unimplemented!("data from somewhere");
//! let png = pngsift::png::decode_png(bytes);
//! for warning in &png.warnings {
//!   println!("{warning}");
//! }
//! println!("{}x{}", png.bitmap.width, png.bitmap.height);
//! ```

use core::fmt::{Debug, Display, Write};

use crate::{bitmap::*, byte_view::*, error::PngError};

mod crc32;
pub use crc32::*;

mod chunk_ty;
pub use chunk_ty::*;

mod warning;
pub use warning::*;

mod raw_chunk;
pub use raw_chunk::*;

mod chunk;
pub use chunk::*;

mod ihdr;
pub use ihdr::*;

mod plte;
pub use plte::*;

mod trns;
pub use trns::*;

mod gama;
pub use gama::*;

mod sbit;
pub use sbit::*;

mod srgb;
pub use srgb::*;

mod chrm;
pub use chrm::*;

mod iccp;
pub use iccp::*;

mod bkgd;
pub use bkgd::*;

mod hist;
pub use hist::*;

mod phys;
pub use phys::*;

mod splt;
pub use splt::*;

mod time;
pub use time::*;

mod text;
pub use text::*;

mod ztxt;
pub use ztxt::*;

mod exif;
pub use exif::*;

mod actl;
pub use actl::*;

mod fctl;
pub use fctl::*;

mod fdat;
pub use fdat::*;

mod filter;
pub use filter::*;

mod adam7;
pub use adam7::*;

mod levels;
pub use levels::*;

mod context;
pub use context::*;

mod registry;
pub use registry::*;

mod callbacks;
pub(crate) use callbacks::*;

mod validate;
pub use validate::*;

mod idat;
pub use idat::*;

mod decode;
pub use decode::*;
