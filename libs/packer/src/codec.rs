use std::io;

use crate::cache::Builder;
use crate::error::{Partial, Result};

/// Sizes, writes, and reads values of one type.
///
/// A codec is built once per type and then shared through the
/// [`CodecCache`](crate::CodecCache). Implementations uphold that:
///
/// - [`size`](Self::size) equals the number of bytes [`write`](Self::write)
///   produces for the same value.
/// - [`read`](Self::read) consumes exactly the bytes [`write`](Self::write)
///   produced for the same logical value.
///
/// On failure, the returned [`Partial`] carries the number of bytes already
/// written or consumed.
pub trait Codec: Send + Sync + 'static {
    /// The type this codec handles.
    type Value: ?Sized;

    /// Returns the encoded length of `value`.
    fn size(&self, value: &Self::Value) -> usize;

    /// Writes `value` and returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns the writer's error if it fails.
    fn write(&self, writer: &mut dyn io::Write, value: &Self::Value) -> Result<usize, Partial>;

    /// Reads a value into `dst` and returns the number of bytes consumed.
    ///
    /// Storage already owned by `dst` may be reused.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails, the input ends early, or the
    /// data is malformed. `dst` may then be partially overwritten: a record
    /// keeps the fields decoded before the failing one, and a byte sequence
    /// cut short holds a zero-padded prefix of its payload. A [`String`] that
    /// is not valid UTF-8 is left empty, keeping its allocation.
    fn read(&self, reader: &mut dyn io::Read, dst: &mut Self::Value) -> Result<usize, Partial>;
}

/// A type that can be packed without a schema.
///
/// Implemented for [`i64`], [`isize`], [`Vec<u8>`], [`String`], [`Box<T>`],
/// and `Option<Box<T>>`. Records implement this via
/// [`#[derive(Pack)]`](derive@crate::Pack).
///
/// Types that aren't listed here simply don't implement this trait, so they
/// are rejected when compiling rather than when encoding.
pub trait Pack: 'static {
    /// The codec built for this type.
    type Codec: Codec<Value = Self>;

    /// Builds the codec for this type.
    ///
    /// Codecs of nested types must be resolved through `builder` so each type
    /// maps to a single shared codec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursiveType`](crate::Error::RecursiveType) if the
    /// type contains itself.
    fn build_codec(builder: &mut Builder<'_>) -> Result<Self::Codec>;
}
