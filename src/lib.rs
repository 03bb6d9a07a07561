//! Construction and deconstruction of bit-level binary data, following
//! the semantics of Erlang's bit syntax.
//!
//! A [`Builder`] packs a sequence of typed segments (integers, floats,
//! binaries, nested bit strings, UTF code points) into one [`BitString`];
//! a [`Matcher`] runs the reverse direction, consuming a [`BitString`]
//! against a pattern and binding values into caller-supplied
//! destinations. Both directions are bit-exact and never insert padding
//! between segments, so build → match round-trips losslessly.
//!
//! ```
//! use bitsyntax::{Builder, Matcher, SegmentOpt};
//!
//! // <<5:4, 2:4, "abc"/binary>>
//! let packet = Builder::new()
//!     .add_integer(5u8, &[SegmentOpt::Size(4)])
//!     .add_integer(2u8, &[SegmentOpt::Size(4)])
//!     .add_binary(&b"abc"[..], &[SegmentOpt::Size(3)])
//!     .build()
//!     .unwrap();
//! assert_eq!(packet.to_bytes(), b"\x52abc");
//!
//! let (mut hi, mut lo, mut body) = (0u8, 0u8, Vec::new());
//! Matcher::new()
//!     .integer(&mut hi, &[SegmentOpt::Size(4)])
//!     .integer(&mut lo, &[SegmentOpt::Size(4)])
//!     .rest_binary(&mut body)
//!     .match_bits(&packet)
//!     .unwrap();
//! assert_eq!((hi, lo), (5, 2));
//! assert_eq!(body, b"abc");
//! ```

#![deny(
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]
#![forbid(unsafe_code)]
#![warn(
/* missing_docs, */
missing_debug_implementations,
)]
// pragmas for doc
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bitstring;
mod builder;
mod debug;
mod endian;
mod error;
mod expr;
mod float16;
mod matcher;
mod reader;
mod segment;
mod utf;
mod validate;
mod writer;

pub use bitstring::*;
pub use builder::*;
pub use endian::*;
pub use error::*;
pub use float16::*;
pub use matcher::*;
pub use reader::*;
pub use segment::*;
pub use utf::*;
pub use validate::*;
pub use writer::*;
