#![forbid(unsafe_code)]
#![cfg_attr(docs_rs, feature(doc_cfg))]

//! A PNG codec with a forgiving decoder and a searching encoder.
//!
//! * [`png::decode_png`] never fails. Any PNG data, however damaged, gives
//!   back the best image that could be rebuilt along with a list of every
//!   problem found ([`png::PngWarning`]).
//! * [`encode::encode_png`] tries many encodings, filter choices, and
//!   compression settings within a time budget and writes the smallest file
//!   it found.
//!
//! Pixels are always packed `0xAARRGGBB` values in a [`Bitmap`].

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

mod bitmap;
pub use bitmap::*;

mod byte_view;
pub use byte_view::*;

mod error;
pub use error::*;

pub mod png;

pub mod encode;
