//! Pointer indirection. A boxed value encodes exactly like the value itself.

use std::io;
use std::sync::Arc;

use crate::cache::Builder;
use crate::codec::{Codec, Pack};
use crate::error::{Partial, Result};

/// Codec for [`Box<T>`], delegating to the codec of `T`.
pub struct BoxCodec<T: Pack> {
    inner: Arc<T::Codec>,
}

impl<T: Pack> Codec for BoxCodec<T> {
    type Value = Box<T>;

    fn size(&self, value: &Box<T>) -> usize {
        self.inner.size(value)
    }

    fn write(&self, writer: &mut dyn io::Write, value: &Box<T>) -> Result<usize, Partial> {
        self.inner.write(writer, value)
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut Box<T>) -> Result<usize, Partial> {
        self.inner.read(reader, dst)
    }
}

impl<T: Pack> Pack for Box<T> {
    type Codec = BoxCodec<T>;

    fn build_codec(builder: &mut Builder<'_>) -> Result<Self::Codec> {
        Ok(BoxCodec {
            inner: builder.resolve::<T>()?,
        })
    }
}

/// Codec for an optional reference, `Option<Box<T>>`.
///
/// The wire format has no notion of absence: an unset reference is written as
/// `T::default()`. Reading into an unset reference allocates a default value
/// first and then decodes into it, so the result is always set.
pub struct OptionBoxCodec<T: Pack> {
    inner: Arc<T::Codec>,
}

impl<T: Pack + Default> Codec for OptionBoxCodec<T> {
    type Value = Option<Box<T>>;

    fn size(&self, value: &Option<Box<T>>) -> usize {
        match value {
            Some(v) => self.inner.size(v),
            None => self.inner.size(&T::default()),
        }
    }

    fn write(&self, writer: &mut dyn io::Write, value: &Option<Box<T>>) -> Result<usize, Partial> {
        match value {
            Some(v) => self.inner.write(writer, v),
            None => self.inner.write(writer, &T::default()),
        }
    }

    fn read(&self, reader: &mut dyn io::Read, dst: &mut Option<Box<T>>) -> Result<usize, Partial> {
        let dst = dst.get_or_insert_with(Box::default);
        self.inner.read(reader, dst)
    }
}

impl<T: Pack + Default> Pack for Option<Box<T>> {
    type Codec = OptionBoxCodec<T>;

    fn build_codec(builder: &mut Builder<'_>) -> Result<Self::Codec> {
        Ok(OptionBoxCodec {
            inner: builder.resolve::<T>()?,
        })
    }
}
