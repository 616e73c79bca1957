//! Exposes the stream decoder and decoding helper functions.

use std::io;

use crate::cache::CodecCache;
use crate::codec::{Codec as _, Pack};
use crate::config::Config;
use crate::error::Result;

/// Decodes a value from a byte slice into `dst`.
///
/// Bytes past the end of the value are ignored.
///
/// # Errors
///
/// Returns an error if the data is malformed or ends early. Fields decoded
/// before the failure keep their new values, the remaining ones keep their
/// previous contents.
pub fn unmarshal<T: Pack>(buf: &[u8], dst: &mut T) -> Result<()> {
    Decoder::new(buf).decode(dst)
}

/// Decodes values from an [`io::Read`].
///
/// Codecs are built the first time a type is decoded and then reused for
/// every later value of that type.
#[derive(Debug)]
pub struct Decoder<R> {
    reader: R,
    cache: CodecCache,
}

impl<R: io::Read> Decoder<R> {
    /// Creates a new decoder with default settings.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, Config::new())
    }

    /// Creates a new decoder that builds its codecs with `config`.
    pub fn with_config(reader: R, config: Config) -> Self {
        Self {
            reader,
            cache: CodecCache::with_config(config),
        }
    }

    /// Decodes the next value into `dst`, overwriting it in place.
    ///
    /// Storage already owned by `dst` is reused where possible, so decoding
    /// repeatedly into the same value avoids reallocating.
    ///
    /// # Errors
    ///
    /// Returns an error if the codec can't be built, the reader fails, or the
    /// data is malformed. `dst` is not restored on failure: fields decoded
    /// before the failure keep their new values, the remaining ones keep
    /// their previous contents.
    pub fn decode<T: Pack>(&mut self, dst: &mut T) -> Result<()> {
        let codec = self.cache.get::<T>()?;
        codec.read(&mut self.reader, dst)?;
        Ok(())
    }
}

impl<R> Decoder<R> {
    /// The codecs built so far.
    pub fn cache(&self) -> &CodecCache {
        &self.cache
    }

    /// Gets a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Gets a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Unwraps the decoder into its inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
