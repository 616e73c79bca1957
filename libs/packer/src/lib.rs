//! # Packer
//!
//! Schema-less binary serialization. Types describe their own layout through
//! the [`Pack`] trait, usually via [`#[derive(Pack)]`](derive@Pack), and a
//! codec is built once per type and cached by the [`Encoder`] or [`Decoder`]
//! that first needs it.
//!
//! The format is not self-describing: the decoder must already know what type
//! comes next. Values are encoded as follows:
//!
//! - [`i64`], [`isize`]: unsigned LEB128 of the two's complement bit pattern,
//!   1 to 10 bytes. Negative values always take 10 bytes.
//! - [`Vec<u8>`], [`String`]: LEB128 length, followed by the raw bytes.
//! - records: the concatenation of their packed fields in declaration order,
//!   without tags, padding, or a length prefix. Only `pub` fields are packed.
//!   Fields marked `#[pack(flatten)]` are spliced in place, depth-first.
//! - [`Box<T>`], `Option<Box<T>>`: the encoding of the pointee. An unset
//!   reference encodes as `T::default()`.
//!
//! ```
//! use packer::{Pack, marshal, unmarshal};
//!
//! #[derive(Debug, Default, PartialEq, Pack)]
//! pub struct Entry {
//!     pub n: i64,
//!     pub s: Vec<u8>,
//!     // private fields are never packed
//!     hits: i64,
//! }
//!
//! let entry = Entry { n: 1, s: b"x".to_vec(), hits: 9 };
//! let buf = marshal(&entry)?;
//! assert_eq!(buf, [0x01, 0x01, b'x']);
//!
//! let mut out = Entry::default();
//! unmarshal(&buf, &mut out)?;
//! assert_eq!((out.n, out.s.as_slice(), out.hits), (1, &b"x"[..], 0));
//! # Ok::<(), packer::Error>(())
//! ```

// the derive expands to `::packer` paths
extern crate self as packer;

mod bytes;
mod cache;
mod codec;
mod config;
pub mod de;
mod error;
mod indirect;
mod int;
pub mod leb128;
mod record;
pub mod ser;
mod stream;

pub use bytes::{BytesCodec, StringCodec};
pub use cache::{Builder, CodecCache};
pub use codec::{Codec, Pack};
pub use config::Config;
pub use de::{Decoder, unmarshal};
pub use error::{Error, Partial, Result};
pub use indirect::{BoxCodec, OptionBoxCodec};
pub use int::{Int64, IntCodec};
pub use packer_macros::Pack;
pub use record::{StructBuilder, StructCodec};
pub use ser::{Encoder, marshal, size_of};
