//! Exposes the stream encoder and encoding helper functions.

use std::io;

use crate::cache::CodecCache;
use crate::codec::{Codec as _, Pack};
use crate::config::Config;
use crate::error::Result;

/// Encodes a value into a new [`Vec<u8>`].
///
/// The buffer is allocated with exactly the encoded size up-front.
///
/// # Errors
///
/// Returns an error if the value's codec can't be built.
pub fn marshal<T: Pack>(value: &T) -> Result<Vec<u8>> {
    let mut cache = CodecCache::new();
    let codec = cache.get::<T>()?;

    let mut buf = Vec::with_capacity(codec.size(value));
    codec.write(&mut buf, value)?;
    Ok(buf)
}

/// Returns the number of bytes [`marshal`] would produce for `value`.
///
/// # Errors
///
/// Returns an error if the value's codec can't be built.
pub fn size_of<T: Pack>(value: &T) -> Result<usize> {
    Ok(CodecCache::new().get::<T>()?.size(value))
}

/// Encodes values into an [`io::Write`].
///
/// Codecs are built the first time a type is encoded and then reused for
/// every later value of that type.
#[derive(Debug)]
pub struct Encoder<W> {
    writer: W,
    cache: CodecCache,
}

impl<W: io::Write> Encoder<W> {
    /// Creates a new encoder with default settings.
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, Config::new())
    }

    /// Creates a new encoder that builds its codecs with `config`.
    pub fn with_config(writer: W, config: Config) -> Self {
        Self {
            writer,
            cache: CodecCache::with_config(config),
        }
    }

    /// Encodes one value into the writer.
    ///
    /// The writer is not flushed.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec can't be built or the writer fails. In
    /// the latter case, part of the value may already have been written.
    pub fn encode<T: Pack>(&mut self, value: &T) -> Result<()> {
        let codec = self.cache.get::<T>()?;
        codec.write(&mut self.writer, value)?;
        Ok(())
    }

    /// Returns the number of bytes [`Self::encode`] would write for `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec can't be built.
    pub fn size_of<T: Pack>(&mut self, value: &T) -> Result<usize> {
        Ok(self.cache.get::<T>()?.size(value))
    }
}

impl<W> Encoder<W> {
    /// The codecs built so far.
    pub fn cache(&self) -> &CodecCache {
        &self.cache
    }

    /// Gets a reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Gets a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Unwraps the encoder into its inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_a_stream() {
        let mut enc = Encoder::new(Vec::new());
        enc.encode(&0i64).expect("vec write can't fail");
        enc.encode(&300i64).expect("vec write can't fail");
        enc.encode(&b"AB".to_vec()).expect("vec write can't fail");

        assert_eq!(enc.cache().len(), 2, "one codec per type");
        assert_eq!(enc.into_inner(), [0x00, 0xAC, 0x02, 0x02, 0x41, 0x42]);
    }

    #[test]
    fn size_matches_marshal() {
        let values = [0i64, 1, 127, 128, 300, -1, i64::MIN, i64::MAX];
        for v in values {
            let buf = marshal(&v).expect("encodable");
            assert_eq!(size_of(&v).expect("encodable"), buf.len(), "size of {v}");
        }

        let mut enc = Encoder::new(Vec::new());
        let s = "x".repeat(200);
        assert_eq!(enc.size_of(&s).expect("encodable"), 202);
    }

    #[test]
    fn marshal_is_exact() {
        let buf = marshal(&vec![1u8; 1000]).expect("encodable");
        assert_eq!(buf.len(), 1002);
        assert_eq!(buf.capacity(), 1002, "must allocate the exact size");
    }
}
